//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들을 모아둔 모듈입니다.
//!
//! 각 하위 모듈:
//! - `chat`: 채팅, 연습 문장 검사, 번역
//! - `corrections`: 교정/힌트 피드 (HTML 조각)
//! - `conversations`: 대화 저장, 저장된 대화 목록/상세
//! - `health`: 서버 상태 확인 (헬스체크)

pub mod chat;
pub mod conversations;
pub mod corrections;
pub mod health;

pub use chat::*;
pub use conversations::*;
pub use corrections::*;
pub use health::*;

use crate::services::{ConversationStore, Tutor};
use axum::{
    routing::{get, post},
    Router,
};
use sqlx::SqlitePool;
use std::sync::Arc;

/// 요청에 session_id가 없을 때 쓰는 세션 ID
pub const DEFAULT_SESSION: &str = "default";

/// 애플리케이션 공유 상태
///
/// 모든 요청 핸들러가 `State(state): State<AppState>`로 접근합니다.
/// 모든 필드가 내부적으로 Arc이므로 clone해도 같은 자원을 가리킵니다.
#[derive(Clone)]
pub struct AppState {
    /// SQLite 연결 풀 (저장된 대화)
    pub pool: SqlitePool,
    /// 세션별 대화 상태 (메모리)
    pub store: ConversationStore,
    /// 채팅/교정/번역 흐름
    pub tutor: Arc<Tutor>,
    /// 요청에 language가 없을 때의 학습 언어
    pub default_language: String,
    /// 사용 중인 모델 이름 (헬스체크 표시용)
    pub model: String,
}

impl AppState {
    /// 요청의 언어 코드, 없거나 비어 있으면 기본 언어
    pub fn language_or_default(&self, language: Option<&str>) -> String {
        match language.map(str::trim) {
            Some(code) if !code.is_empty() => code.to_string(),
            _ => self.default_language.clone(),
        }
    }
}

/// `/api` 아래의 모든 라우트를 담은 라우터를 만듭니다.
///
/// 미들웨어(CORS, 로깅)와 정적 파일 서빙은 main.rs에서 덧붙입니다.
pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/chat", post(chat))
        .route("/practice", post(practice))
        .route("/translate", post(translate))
        .route("/corrections", get(corrections_feed))
        .route("/save", post(save_conversation))
        .route("/conversations", get(list_conversations))
        // {id}: URL 경로 파라미터 (axum 0.8 문법)
        .route("/conversations/{id}", get(get_conversation))
        .route("/health", get(health_check))
        .with_state(state);

    Router::new().nest("/api", api_routes)
}

/// 라우터 테스트용 상태: 인메모리 DB + 목 백엔드
#[cfg(test)]
pub(crate) async fn test_state(backend: crate::services::backend::MockChatBackend) -> AppState {
    let store = ConversationStore::new();
    AppState {
        pool: crate::db::test_pool().await,
        tutor: Arc::new(Tutor::new(Arc::new(backend), store.clone())),
        store,
        default_language: "es".to_string(),
        model: "test-model".to_string(),
    }
}

/// 라우터에 요청 하나를 보내고 (상태 코드, 본문 문자열)을 돌려줍니다.
#[cfg(test)]
pub(crate) async fn send(
    app: Router,
    request: axum::http::Request<axum::body::Body>,
) -> (axum::http::StatusCode, String) {
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

/// JSON 본문을 가진 POST 요청
#[cfg(test)]
pub(crate) fn post_json(uri: &str, body: serde_json::Value) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::post(uri)
        .header("content-type", "application/json")
        .body(axum::body::Body::from(body.to_string()))
        .unwrap()
}

#[cfg(test)]
pub(crate) fn get_request(uri: &str) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::get(uri)
        .body(axum::body::Body::empty())
        .unwrap()
}
