//! # 채팅 API 라우트 핸들러
//!
//! ## 엔드포인트 목록
//! | 메서드 | 경로 | 핸들러 | 설명 |
//! |--------|------|--------|------|
//! | POST | /api/chat | `chat` | 채팅 턴 (세션 상태 변경) |
//! | POST | /api/practice | `practice` | 연습 문장 문법 검사 (세션 변경 없음) |
//! | POST | /api/translate | `translate` | 구절 번역 (세션과 무관) |

use crate::{
    error::AppError,
    models::*,
    routes::{AppState, DEFAULT_SESSION},
};
use axum::{extract::State, Json};

/// 채팅 메시지 하나를 처리합니다.
///
/// `POST /api/chat` + `{ "session_id": "...", "message": "...", "language": "es" }`
/// → `{ "response", "correction", "hint", "messages" }`
///
/// 세션이 없으면 새로 만들고, 메시지가 비어 있으면 400입니다.
pub async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    if req.message.trim().is_empty() {
        return Err(AppError::BadRequest("Message cannot be empty".to_string()));
    }

    let session_id = req.session_id.as_deref().unwrap_or(DEFAULT_SESSION);
    let language = state.language_or_default(req.language.as_deref());

    let response = state
        .tutor
        .chat_turn(session_id, &req.message, &language)
        .await?;
    Ok(Json(response))
}

/// 연습 문장의 문법만 검사합니다.
///
/// `POST /api/practice` + `{ "sentence": "...", "language": "es" }`
/// → `{ "has_errors", "corrected", "explanation" }`
pub async fn practice(
    State(state): State<AppState>,
    Json(req): Json<PracticeRequest>,
) -> Json<GrammarJudgment> {
    let language = state.language_or_default(req.language.as_deref());
    Json(state.tutor.practice(&req.sentence, &language).await)
}

/// 구절을 번역합니다.
///
/// `POST /api/translate` + `{ "phrase": "...", "language": "es" }` → `{ "translation": "..." }`
/// 빈 구절은 400, 백엔드 실패는 502입니다.
pub async fn translate(
    State(state): State<AppState>,
    Json(req): Json<TranslateRequest>,
) -> Result<Json<TranslateResponse>, AppError> {
    let language = state.language_or_default(req.language.as_deref());
    let translation = state.tutor.translate(&req.phrase, &language).await?;
    Ok(Json(TranslateResponse { translation }))
}
