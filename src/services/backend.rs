//! # LLM 채팅 백엔드 어댑터
//!
//! 로컬 LLM 서버(Ollama)의 채팅 API를 감싸는 모듈입니다.
//! 상태가 없는 순수한 요청/응답 호출이며, 모든 호출에 타임아웃이 걸려 있습니다.
//!
//! `ChatBackend` 트레이트로 추상화되어 있어서,
//! 서비스 코드는 `Arc<dyn ChatBackend>`만 알고 실제 HTTP 클라이언트는 모릅니다.
//! 테스트에서는 mockall이 만든 `MockChatBackend`를 주입합니다.

use crate::models::{Role, Turn};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// 백엔드로 보내는 메시지 하나 — `{ "role": ..., "content": ... }`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

impl From<&Turn> for ChatMessage {
    fn from(turn: &Turn) -> Self {
        Self {
            role: turn.role,
            content: turn.content.clone(),
        }
    }
}

/// 백엔드 호출 실패 종류
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("backend returned status {0}")]
    Status(u16),

    #[error("could not decode backend reply: {0}")]
    Decode(String),
}

/// 채팅 완성(chat completion) 백엔드
///
/// 순서가 있는 메시지 목록을 받아 모델의 답변 텍스트를 돌려줍니다.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String, BackendError>;
}

/// 채팅 응답으로 쓸 텍스트 — 실패하면 `"Error: ..."` 문구가 답변 자리에 들어갑니다.
pub fn reply_text(result: Result<String, BackendError>) -> String {
    match result {
        Ok(reply) => reply,
        Err(e) => {
            tracing::warn!("Chat reply failed: {}", e);
            format!("Error: {}", e)
        }
    }
}

// ── Ollama 구현 ──

/// `POST {base_url}/api/chat` 요청 본문
#[derive(Debug, Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: OllamaMessage,
}

#[derive(Debug, Deserialize)]
struct OllamaMessage {
    content: String,
}

/// Ollama 채팅 API 클라이언트
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl OllamaClient {
    /// 클라이언트를 만듭니다. `timeout`은 요청 하나 전체(연결~본문 수신)에 적용됩니다.
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Request(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            model: model.into(),
            timeout,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn classify(&self, e: reqwest::Error) -> BackendError {
        if e.is_timeout() {
            BackendError::Timeout(self.timeout)
        } else if e.is_decode() {
            BackendError::Decode(e.to_string())
        } else {
            BackendError::Request(e.to_string())
        }
    }
}

#[async_trait]
impl ChatBackend for OllamaClient {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String, BackendError> {
        let url = format!("{}/api/chat", self.base_url.trim_end_matches('/'));
        let payload = OllamaChatRequest {
            model: &self.model,
            messages,
            stream: false,
        };

        tracing::debug!(model = %self.model, messages = messages.len(), "Sending chat request");

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        if !response.status().is_success() {
            return Err(BackendError::Status(response.status().as_u16()));
        }

        let body: OllamaChatResponse = response.json().await.map_err(|e| self.classify(e))?;
        Ok(body.message.content)
    }
}

/// 시스템 프롬프트의 내용으로 어떤 호출인지 구분해 고정 답변을 돌려주는 목 백엔드
///
/// 문법 검사 프롬프트에는 `has_errors`, 힌트 프롬프트에는 `has_hints`가 들어 있습니다.
#[cfg(test)]
pub(crate) fn scripted_backend(
    grammar: &'static str,
    hints: &'static str,
    reply: &'static str,
) -> MockChatBackend {
    let mut mock = MockChatBackend::new();
    mock.expect_chat().returning(move |messages| {
        let system = messages.first().map(|m| m.content.as_str()).unwrap_or("");
        if system.contains("has_errors") {
            Ok(grammar.to_string())
        } else if system.contains("has_hints") {
            Ok(hints.to_string())
        } else {
            Ok(reply.to_string())
        }
    });
    mock
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};

    /// 주어진 라우터로 임시 포트에 서버를 띄우고 기본 주소를 돌려줍니다.
    async fn spawn_server(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn sends_non_streaming_request_and_reads_reply() {
        let app = Router::new().route(
            "/api/chat",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["model"], "gemma2:27b");
                assert_eq!(body["stream"], false);
                assert_eq!(body["messages"][0]["role"], "system");
                assert_eq!(body["messages"][1]["content"], "Hola");
                Json(json!({ "message": { "role": "assistant", "content": "¡Hola! ¿Qué tal?" } }))
            }),
        );
        let base = spawn_server(app).await;
        let client = OllamaClient::new(base, "gemma2:27b", Duration::from_secs(5)).unwrap();

        let reply = client
            .chat(&[ChatMessage::system("tutor"), ChatMessage::user("Hola")])
            .await
            .unwrap();
        assert_eq!(reply, "¡Hola! ¿Qué tal?");
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let app = Router::new().route(
            "/api/chat",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "model not loaded") }),
        );
        let base = spawn_server(app).await;
        let client = OllamaClient::new(base, "m", Duration::from_secs(5)).unwrap();

        let err = client.chat(&[ChatMessage::user("hi")]).await.unwrap_err();
        assert!(matches!(err, BackendError::Status(500)));
    }

    #[tokio::test]
    async fn slow_backend_times_out() {
        let app = Router::new().route(
            "/api/chat",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!({ "message": { "content": "too late" } }))
            }),
        );
        let base = spawn_server(app).await;
        let client = OllamaClient::new(base, "m", Duration::from_millis(100)).unwrap();

        let err = client.chat(&[ChatMessage::user("hi")]).await.unwrap_err();
        assert!(matches!(err, BackendError::Timeout(_)));
    }

    #[test]
    fn failed_reply_becomes_error_text() {
        assert_eq!(reply_text(Ok("Bien".into())), "Bien");
        let text = reply_text(Err(BackendError::Status(503)));
        assert!(text.starts_with("Error: "));
        assert!(text.contains("503"));
    }
}
