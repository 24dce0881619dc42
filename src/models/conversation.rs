//! # 대화(Conversation) 모델
//!
//! 메모리에 있는 세션 대화, DB에 저장된 대화 기록,
//! 그리고 대화 관련 API의 요청/응답 본문을 정의합니다.

use super::{Correction, GrammarJudgment, Hint, Turn};
use serde::{Deserialize, Serialize};

/// 제목으로 사용할 첫 메시지의 최대 글자 수
pub const TITLE_MAX_CHARS: usize = 50;
/// 첫 메시지가 없을 때의 제목
pub const UNTITLED: &str = "Untitled";

/// 세션 하나의 대화 상태 (메모리에만 존재)
///
/// 세션 ID로 처음 채팅 요청이 들어올 때 만들어지고,
/// 명시적으로 저장하지 않으면 프로세스가 끝날 때 사라집니다.
/// `language`는 생성 시점에 고정됩니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conversation {
    pub session_id: String,
    pub language: String,
    pub turns: Vec<Turn>,
    /// 시간순 (먼저 기록된 것이 앞)
    pub corrections: Vec<Correction>,
    pub hints: Vec<Hint>,
}

impl Conversation {
    pub fn new(session_id: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            language: language.into(),
            turns: Vec::new(),
            corrections: Vec::new(),
            hints: Vec::new(),
        }
    }

    /// 저장용 제목: 첫 턴 내용의 앞 50자, 없거나 비어 있으면 "Untitled"
    ///
    /// `.chars().take()`로 문자 단위로 자릅니다.
    /// 바이트 단위로 자르면 멀티바이트 문자 중간에서 패닉할 수 있습니다.
    pub fn title(&self) -> String {
        match self.turns.first() {
            Some(turn) if !turn.content.is_empty() => {
                turn.content.chars().take(TITLE_MAX_CHARS).collect()
            }
            _ => UNTITLED.to_string(),
        }
    }
}

/// DB `conversations` 테이블 한 행 — JSON 컬럼은 문자열 그대로입니다.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ConversationRow {
    pub id: String,
    pub title: String,
    pub language: String,
    pub created_at: String,
    pub turns: String,
    pub corrections: String,
    pub hints: String,
}

/// 저장된 대화 전체 — `GET /api/conversations/{id}`의 응답 본문
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavedConversation {
    pub id: String,
    pub title: String,
    pub language: String,
    pub created_at: String,
    pub turns: Vec<Turn>,
    pub corrections: Vec<Correction>,
    pub hints: Vec<Hint>,
}

impl TryFrom<ConversationRow> for SavedConversation {
    type Error = serde_json::Error;

    fn try_from(row: ConversationRow) -> Result<Self, Self::Error> {
        Ok(Self {
            turns: serde_json::from_str(&row.turns)?,
            corrections: serde_json::from_str(&row.corrections)?,
            hints: serde_json::from_str(&row.hints)?,
            id: row.id,
            title: row.title,
            language: row.language,
            created_at: row.created_at,
        })
    }
}

/// 저장된 대화 목록의 요약 항목
///
/// `message_count`는 따로 저장하지 않고 조회할 때 JSON 배열 길이로 계산합니다.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ConversationSummary {
    pub id: String,
    pub title: String,
    pub language: String,
    pub created_at: String,
    pub message_count: i64,
}

// ── 요청/응답 본문 ──
// 누락된 필드는 #[serde(default)]로 빈 값이 되고, 핸들러가 기본값을 채웁니다.

/// `POST /api/chat` 요청
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub session_id: Option<String>,
    #[serde(default)]
    pub message: String,
    pub language: Option<String>,
}

/// `POST /api/chat` 응답
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    /// 오류가 있었을 때만 판정, 아니면 null
    pub correction: Option<GrammarJudgment>,
    pub hint: Option<Hint>,
    pub messages: Vec<Turn>,
}

/// `POST /api/practice` 요청
#[derive(Debug, Deserialize)]
pub struct PracticeRequest {
    #[serde(default)]
    pub sentence: String,
    pub language: Option<String>,
}

/// `POST /api/translate` 요청
#[derive(Debug, Deserialize)]
pub struct TranslateRequest {
    #[serde(default)]
    pub phrase: String,
    pub language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TranslateResponse {
    pub translation: String,
}

/// `POST /api/save` 요청
#[derive(Debug, Deserialize)]
pub struct SaveRequest {
    pub session_id: Option<String>,
}

/// `GET /api/corrections?session_id=` 쿼리
#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    pub session_id: Option<String>,
}
