//! # 튜터 서비스 — 채팅 턴 오케스트레이션
//!
//! 사용자 메시지 하나를 처리하는 전체 흐름을 담당합니다.
//!
//! ```text
//! 사용자 턴 추가 → ┬ 문법 검사 ┐
//!                 ├ 힌트 요청 ┼→ 교정/힌트 기록 → 어시스턴트 턴 추가 → 응답
//!                 └ 튜터 답변 ┘
//! ```
//!
//! 세 LLM 호출은 `tokio::join!`으로 동시에 보냅니다. 순서 보장:
//! 1. 사용자 턴은 어떤 호출보다도 먼저 세션에 추가됩니다.
//! 2. 어시스턴트 턴은 답변 호출이 끝난 뒤에 추가됩니다.
//! 3. 교정/힌트는 응답을 만들기 전에 기록되므로, 클라이언트는 항상 일관된 스냅샷을 받습니다.

use crate::error::AppError;
use crate::models::{ChatResponse, Correction, GrammarJudgment, Hint, Role};
use crate::services::annotator::Annotator;
use crate::services::backend::{self, ChatBackend, ChatMessage};
use crate::services::conversations::ConversationStore;
use crate::services::prompts;
use std::sync::Arc;

pub struct Tutor {
    backend: Arc<dyn ChatBackend>,
    annotator: Annotator,
    store: ConversationStore,
}

impl Tutor {
    pub fn new(backend: Arc<dyn ChatBackend>, store: ConversationStore) -> Self {
        Self {
            annotator: Annotator::new(backend.clone()),
            backend,
            store,
        }
    }

    /// 채팅 턴 하나를 처리합니다.
    ///
    /// LLM 호출 실패는 에러가 아닙니다. 답변 자리에는 `"Error: ..."` 문구가,
    /// 교정/힌트 자리에는 "없음"이 들어갑니다.
    pub async fn chat_turn(
        &self,
        session_id: &str,
        message: &str,
        language: &str,
    ) -> Result<ChatResponse, AppError> {
        // 세션 언어는 생성 시점에 고정되므로 요청의 언어가 아니라 세션의 언어를 씁니다.
        let conv = self.store.get_or_create(session_id, language);
        let language = conv.language;
        let history = conv.turns;

        self.store.append_turn(session_id, Role::User, message)?;

        let context: Vec<ChatMessage> = self
            .store
            .build_model_context(session_id, &prompts::tutor(&language))?
            .iter()
            .map(ChatMessage::from)
            .collect();

        let (judgment, hints, reply) = tokio::join!(
            self.annotator.check_grammar(message, &language),
            self.annotator.suggest_hints(message, &history, &language),
            self.backend.chat(&context),
        );

        if let Some(correction) = Correction::from_judgment(message, &judgment) {
            self.store.record_correction(session_id, correction)?;
        }
        let hint = Hint::from_judgment(message, &hints);
        if let Some(hint) = &hint {
            self.store.record_hint(session_id, hint.clone())?;
        }

        let response = backend::reply_text(reply);
        self.store.append_turn(session_id, Role::Assistant, &response)?;

        let messages = self
            .store
            .snapshot(session_id)
            .map(|conv| conv.turns)
            .unwrap_or_default();

        Ok(ChatResponse {
            response,
            correction: judgment.has_errors.then_some(judgment),
            hint,
            messages,
        })
    }

    /// 연습 문장 하나를 검사합니다. 세션 상태는 바꾸지 않습니다.
    pub async fn practice(&self, sentence: &str, language: &str) -> GrammarJudgment {
        self.annotator.check_grammar(sentence, language).await
    }

    /// 구절 하나를 번역합니다.
    ///
    /// 채팅과 달리 실패를 클라이언트에 알려야 하므로 `AppError::Backend`를 돌려줍니다.
    pub async fn translate(&self, phrase: &str, language: &str) -> Result<String, AppError> {
        let phrase = phrase.trim();
        if phrase.is_empty() {
            return Err(AppError::BadRequest("Phrase cannot be empty".to_string()));
        }

        let messages = [
            ChatMessage::system(prompts::translate(language)),
            ChatMessage::user(phrase),
        ];
        let translation = self
            .backend
            .chat(&messages)
            .await
            .map_err(|e| AppError::Backend(e.to_string()))?;

        Ok(translation.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Explanation;
    use crate::services::backend::{scripted_backend, BackendError, MockChatBackend};
    use std::time::Duration;

    const GRAMMAR_ERR: &str =
        r#"{"has_errors": true, "corrected": "Yo soy de México", "explanation": "ser, not estar, for origin"}"#;
    const GRAMMAR_OK: &str = r#"{"has_errors": false, "corrected": "Hola", "explanation": ""}"#;
    const HINTS: &str = r#"{"has_hints": true, "hints": ["Di «Soy mexicano»"]}"#;
    const NO_HINTS: &str = r#"{"has_hints": false, "hints": []}"#;

    fn tutor(mock: MockChatBackend) -> (Tutor, ConversationStore) {
        let store = ConversationStore::new();
        (Tutor::new(Arc::new(mock), store.clone()), store)
    }

    #[tokio::test]
    async fn chat_turn_records_annotations_and_both_turns() {
        let (tutor, store) = tutor(scripted_backend(GRAMMAR_ERR, HINTS, "¡Qué bien! ¿De qué ciudad?"));

        let res = tutor.chat_turn("s1", "Yo estoy de México", "es").await.unwrap();

        assert_eq!(res.response, "¡Qué bien! ¿De qué ciudad?");
        let correction = res.correction.unwrap();
        assert_eq!(correction.corrected, "Yo soy de México");
        assert_eq!(res.hint.unwrap().hints, vec!["Di «Soy mexicano»"]);

        assert_eq!(res.messages.len(), 2);
        assert_eq!(res.messages[0].role, Role::User);
        assert_eq!(res.messages[0].content, "Yo estoy de México");
        assert_eq!(res.messages[1].role, Role::Assistant);

        let conv = store.snapshot("s1").unwrap();
        assert_eq!(conv.corrections.len(), 1);
        assert_eq!(
            conv.corrections[0].explanation,
            Explanation::Text("ser, not estar, for origin".into())
        );
        assert_eq!(conv.hints.len(), 1);
        assert_eq!(store.feed("s1").len(), 2);
    }

    #[tokio::test]
    async fn clean_message_has_null_correction() {
        let (tutor, store) = tutor(scripted_backend(GRAMMAR_OK, NO_HINTS, "¡Hola!"));

        let res = tutor.chat_turn("s1", "Hola", "es").await.unwrap();
        assert!(res.correction.is_none());
        assert!(res.hint.is_none());
        assert!(store.feed("s1").is_empty());
    }

    #[tokio::test]
    async fn backend_outage_degrades_to_error_text() {
        let mut mock = MockChatBackend::new();
        mock.expect_chat()
            .returning(|_| Err(BackendError::Timeout(Duration::from_secs(30))));
        let (tutor, store) = tutor(mock);

        let res = tutor.chat_turn("s1", "Hola", "es").await.unwrap();
        assert!(res.response.starts_with("Error: "));
        assert!(res.correction.is_none());
        assert!(res.hint.is_none());
        assert_eq!(store.snapshot("s1").unwrap().turns.len(), 2);
        assert!(store.feed("s1").is_empty());
    }

    /// 문법 검사나 힌트 요청 중 하나만 실패시키는 목 백엔드
    fn failing_only(marker: &'static str, grammar: &'static str, hints: &'static str) -> MockChatBackend {
        let mut mock = MockChatBackend::new();
        mock.expect_chat().returning(move |messages| {
            let system = &messages[0].content;
            if system.contains(marker) {
                Err(BackendError::Timeout(Duration::from_secs(30)))
            } else if system.contains("has_errors") {
                Ok(grammar.to_string())
            } else if system.contains("has_hints") {
                Ok(hints.to_string())
            } else {
                Ok("¿De qué ciudad eres?".to_string())
            }
        });
        mock
    }

    #[tokio::test]
    async fn grammar_failure_keeps_hint_and_reply() {
        let (tutor, store) = tutor(failing_only("has_errors", GRAMMAR_ERR, HINTS));

        let res = tutor.chat_turn("s1", "Yo estoy de México", "es").await.unwrap();
        assert_eq!(res.response, "¿De qué ciudad eres?");
        assert!(res.correction.is_none());
        assert_eq!(res.hint.unwrap().hints, vec!["Di «Soy mexicano»"]);

        let conv = store.snapshot("s1").unwrap();
        assert!(conv.corrections.is_empty());
        assert_eq!(conv.hints.len(), 1);
        assert_eq!(conv.turns[1].content, "¿De qué ciudad eres?");
    }

    #[tokio::test]
    async fn hint_failure_keeps_correction_and_reply() {
        let (tutor, store) = tutor(failing_only("has_hints", GRAMMAR_ERR, HINTS));

        let res = tutor.chat_turn("s1", "Yo estoy de México", "es").await.unwrap();
        assert_eq!(res.response, "¿De qué ciudad eres?");
        assert_eq!(res.correction.unwrap().corrected, "Yo soy de México");
        assert!(res.hint.is_none());

        let conv = store.snapshot("s1").unwrap();
        assert_eq!(conv.corrections.len(), 1);
        assert!(conv.hints.is_empty());
    }

    #[tokio::test]
    async fn reply_sees_the_new_user_turn_under_the_session_language() {
        let mut mock = MockChatBackend::new();
        mock.expect_chat().returning(|messages| {
            let system = &messages[0].content;
            if system.contains("has_errors") || system.contains("has_hints") {
                return Ok("{}".to_string());
            }
            // 세션은 "fr"로 만들어졌으므로 두 번째 요청의 "es"는 무시됩니다.
            assert!(system.contains("French"));
            let last = messages.last().unwrap();
            assert_eq!(last.role, Role::User);
            Ok(format!("echo: {}", last.content))
        });
        let (tutor, _) = tutor(mock);

        tutor.chat_turn("s1", "Bonjour", "fr").await.unwrap();
        let res = tutor.chat_turn("s1", "Ça va?", "es").await.unwrap();
        assert_eq!(res.response, "echo: Ça va?");
        assert_eq!(res.messages.len(), 4);
    }

    #[tokio::test]
    async fn practice_does_not_touch_sessions() {
        let (tutor, store) = tutor(scripted_backend(GRAMMAR_ERR, NO_HINTS, ""));
        let judgment = tutor.practice("Yo estoy de México", "es").await;
        assert!(judgment.has_errors);
        assert!(store.snapshot("default").is_none());
    }

    #[tokio::test]
    async fn translate_validates_and_reports_failures() {
        let mut mock = MockChatBackend::new();
        mock.expect_chat().never();
        let (tutor_blank, _) = tutor(mock);
        assert!(matches!(
            tutor_blank.translate("   ", "es").await,
            Err(AppError::BadRequest(_))
        ));

        let mut failing = MockChatBackend::new();
        failing.expect_chat().returning(|_| Err(BackendError::Status(500)));
        let (tutor_failing, _) = tutor(failing);
        assert!(matches!(
            tutor_failing.translate("good morning", "es").await,
            Err(AppError::Backend(_))
        ));

        let mut ok = MockChatBackend::new();
        ok.expect_chat()
            .withf(|messages| messages[0].content.contains("Spanish") && messages[1].content == "good morning")
            .returning(|_| Ok("  buenos días\n".to_string()));
        let (tutor_ok, _) = tutor(ok);
        assert_eq!(tutor_ok.translate(" good morning ", "es").await.unwrap(), "buenos días");
    }
}
