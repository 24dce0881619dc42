//! # 교정(Correction)과 힌트(Hint) 모델
//!
//! 사용자 메시지마다 LLM이 내려주는 두 가지 판정과,
//! 그 판정으로부터 만들어지는 학습 포인트 엔티티를 정의합니다.
//!
//! ```text
//! GrammarJudgment (has_errors = true)  → Correction
//! HintJudgment    (has_hints  = true)  → Hint
//! ```
//!
//! 판정은 모델이 만든 최선의 추정일 뿐 검증된 정답이 아닙니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 교정 설명 — 모델이 문자열 하나 또는 문자열 목록으로 돌려줄 수 있습니다.
///
/// `#[serde(untagged)]`: JSON 값의 모양(문자열/배열)을 보고 variant를 고릅니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Explanation {
    Text(String),
    Points(Vec<String>),
}

impl Default for Explanation {
    fn default() -> Self {
        Explanation::Text(String::new())
    }
}

/// 문법 검사 판정 — `POST /api/practice`의 응답 본문이기도 합니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrammarJudgment {
    pub has_errors: bool,
    pub corrected: String,
    pub explanation: Explanation,
}

impl GrammarJudgment {
    /// 백엔드 호출이나 파싱이 실패했을 때의 대체 판정
    pub fn unchecked(message: &str) -> Self {
        Self {
            has_errors: false,
            corrected: message.to_string(),
            explanation: Explanation::Text("could not check".to_string()),
        }
    }

    /// 빈 메시지에 대한 판정 (백엔드를 호출하지 않음)
    pub fn nothing_to_check() -> Self {
        Self {
            has_errors: false,
            corrected: String::new(),
            explanation: Explanation::Text("nothing to check".to_string()),
        }
    }
}

/// 자연스러움 힌트 판정
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HintJudgment {
    pub has_hints: bool,
    pub hints: Vec<String>,
}

impl HintJudgment {
    pub fn none() -> Self {
        Self::default()
    }
}

/// 문법 오류가 있다고 판정된 메시지의 교정 기록
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Correction {
    pub source_message: String,
    pub corrected_text: String,
    pub explanation: Explanation,
    pub timestamp: DateTime<Utc>,
}

impl Correction {
    /// 판정에 오류가 있을 때만 교정 기록을 만듭니다.
    ///
    /// `has_errors`가 false이면 다른 필드가 무엇이든 None입니다.
    pub fn from_judgment(message: &str, judgment: &GrammarJudgment) -> Option<Self> {
        if !judgment.has_errors {
            return None;
        }
        Some(Self {
            source_message: message.to_string(),
            corrected_text: judgment.corrected.clone(),
            explanation: judgment.explanation.clone(),
            timestamp: Utc::now(),
        })
    }
}

/// 문법적으로는 맞지만 더 자연스럽게 다듬을 수 있는 메시지의 힌트 기록
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hint {
    pub source_message: String,
    pub hints: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

impl Hint {
    pub fn from_judgment(message: &str, judgment: &HintJudgment) -> Option<Self> {
        if !judgment.has_hints {
            return None;
        }
        Some(Self {
            source_message: message.to_string(),
            hints: judgment.hints.clone(),
            timestamp: Utc::now(),
        })
    }
}

/// 교정/힌트 피드의 항목 하나 — 종류(kind)로 구분됩니다.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedItem {
    Correction(Correction),
    Hint(Hint),
}

impl FeedItem {
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            FeedItem::Correction(c) => c.timestamp,
            FeedItem::Hint(h) => h.timestamp,
        }
    }
}
