//! # 주석기(Annotator) — 문법 교정과 자연스러움 힌트
//!
//! 사용자 메시지마다 두 가지 판정을 LLM에게 요청합니다.
//! - `check_grammar()`: 오류가 있는지, 교정문과 설명
//! - `suggest_hints()`: 더 자연스럽게 말하는 방법
//!
//! 두 판정은 서로 독립적이며 모두 최선의 노력(best-effort)입니다.
//! 백엔드 호출 실패, 타임아웃, 해석할 수 없는 답변은
//! 호출자에게 에러로 전달되지 않고 "주석 없음"에 해당하는 대체 판정이 됩니다.

use crate::models::{Explanation, GrammarJudgment, HintJudgment, Role, Turn};
use crate::services::backend::{ChatBackend, ChatMessage};
use crate::services::judgment::{self, Judgment};
use crate::services::prompts;
use serde::Deserialize;
use std::sync::Arc;

/// 힌트 프롬프트에 함께 보낼 직전 대화 턴 수
const HINT_HISTORY_TURNS: usize = 4;

/// 모델이 돌려준 문법 판정
///
/// 모델은 필드를 빼먹거나 `null`로 채우기도 합니다.
/// 객체 자체가 파싱되면 판정으로 인정하고, 빈 자리는 기본값으로 채웁니다.
#[derive(Debug, Deserialize)]
struct RawGrammarJudgment {
    has_errors: Option<bool>,
    corrected: Option<String>,
    explanation: Option<Explanation>,
}

impl RawGrammarJudgment {
    fn into_judgment(self, message: &str) -> GrammarJudgment {
        GrammarJudgment {
            has_errors: self.has_errors.unwrap_or(false),
            corrected: self.corrected.unwrap_or_else(|| message.to_string()),
            explanation: self.explanation.unwrap_or_default(),
        }
    }
}

/// 모델이 돌려준 힌트 판정 (`"hints": null`도 빈 목록으로 받습니다)
#[derive(Debug, Deserialize)]
struct RawHintJudgment {
    has_hints: Option<bool>,
    hints: Option<Vec<String>>,
}

impl From<RawHintJudgment> for HintJudgment {
    fn from(raw: RawHintJudgment) -> Self {
        Self {
            has_hints: raw.has_hints.unwrap_or(false),
            hints: raw.hints.unwrap_or_default(),
        }
    }
}

#[derive(Clone)]
pub struct Annotator {
    backend: Arc<dyn ChatBackend>,
}

impl Annotator {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self { backend }
    }

    /// 메시지의 문법을 검사합니다. 실패하면 `GrammarJudgment::unchecked`를 돌려줍니다.
    pub async fn check_grammar(&self, message: &str, language: &str) -> GrammarJudgment {
        if message.trim().is_empty() {
            return GrammarJudgment::nothing_to_check();
        }

        let messages = [
            ChatMessage::system(prompts::grammar(language)),
            ChatMessage::user(format!("Check this message: {}", message)),
        ];

        let reply = match self.backend.chat(&messages).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!("Grammar check failed: {}", e);
                return GrammarJudgment::unchecked(message);
            }
        };

        match judgment::extract::<RawGrammarJudgment>(&reply) {
            Judgment::Parsed(raw) => raw.into_judgment(message),
            Judgment::Unparseable => {
                tracing::warn!("Unparseable grammar judgment: {:?}", reply);
                GrammarJudgment::unchecked(message)
            }
        }
    }

    /// 자연스러움 힌트를 요청합니다. 실패하면 `has_hints = false`입니다.
    ///
    /// `history`는 이 메시지 이전의 대화이며, 마지막 몇 턴만 문맥으로 보냅니다.
    pub async fn suggest_hints(
        &self,
        message: &str,
        history: &[Turn],
        language: &str,
    ) -> HintJudgment {
        if message.trim().is_empty() {
            return HintJudgment::none();
        }

        let recent = &history[history.len().saturating_sub(HINT_HISTORY_TURNS)..];
        let mut prompt = String::new();
        if !recent.is_empty() {
            prompt.push_str("Conversation so far:\n");
            for turn in recent {
                let role = match turn.role {
                    Role::User => "student",
                    Role::Assistant => "tutor",
                    Role::System => "system",
                };
                prompt.push_str(&format!("{}: {}\n", role, turn.content));
            }
            prompt.push('\n');
        }
        prompt.push_str(&format!("Suggest improvements for this message: {}", message));

        let messages = [
            ChatMessage::system(prompts::hints(language)),
            ChatMessage::user(prompt),
        ];

        let reply = match self.backend.chat(&messages).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!("Hint check failed: {}", e);
                return HintJudgment::none();
            }
        };

        match judgment::extract::<RawHintJudgment>(&reply) {
            Judgment::Parsed(raw) => raw.into(),
            Judgment::Unparseable => {
                tracing::warn!("Unparseable hint judgment: {:?}", reply);
                HintJudgment::none()
            }
        }
    }
}
