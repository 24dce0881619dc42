//! # 대화 턴(Turn) 모델
//!
//! 대화에서 주고받은 메시지 하나를 나타냅니다.
//! 턴은 생성된 후 바뀌지 않으며, 대화 안에서 시간순으로 뒤에 덧붙여지기만 합니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 메시지 작성자의 역할
///
/// JSON으로는 `"user"`, `"assistant"`, `"system"` 소문자 문자열로 직렬화됩니다.
/// Ollama 채팅 API의 `role` 필드와 같은 표기입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// 대화 턴 하나
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
    /// 턴이 생성된 시각 (ISO 8601, UTC)
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    /// 현재 시각으로 새 턴을 만듭니다.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}
