//! # 대화 저장/조회 API 라우트 핸들러
//!
//! ## 엔드포인트 목록
//! | 메서드 | 경로 | 핸들러 | 설명 |
//! |--------|------|--------|------|
//! | POST | /api/save | `save_conversation` | 세션 대화를 DB에 저장 (HTML 조각 응답) |
//! | GET | /api/conversations | `list_conversations` | 저장된 대화 목록 (최신순) |
//! | GET | /api/conversations/{id} | `get_conversation` | 저장된 대화 전체 |

use crate::{
    db,
    error::AppError,
    models::*,
    routes::{AppState, DEFAULT_SESSION},
    services::render,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Html,
    Json,
};
use serde_json::{json, Value};

/// 세션 대화를 저장합니다.
///
/// `POST /api/save` + `{ "session_id": "..." }`
///
/// 프론트엔드가 결과를 그대로 보여주므로 HTML 조각으로 응답합니다.
/// 세션이 없으면 에러 조각과 함께 400입니다 (새 기록은 만들지 않음).
pub async fn save_conversation(
    State(state): State<AppState>,
    Json(req): Json<SaveRequest>,
) -> Result<(StatusCode, Html<&'static str>), AppError> {
    let session_id = req.session_id.as_deref().unwrap_or(DEFAULT_SESSION);

    let Some(conversation) = state.store.snapshot(session_id) else {
        tracing::debug!(session_id, "Nothing to save");
        return Ok((StatusCode::BAD_REQUEST, Html(render::NOTHING_TO_SAVE)));
    };

    let id = db::save_conversation(&state.pool, &conversation).await?;
    tracing::info!(session_id, id = %id, turns = conversation.turns.len(), "Saved conversation");

    Ok((StatusCode::OK, Html(render::SAVED)))
}

/// 저장된 대화 목록을 조회합니다.
///
/// `GET /api/conversations` → `{ "conversations": [...] }`
pub async fn list_conversations(
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    let conversations = db::list_conversations(&state.pool).await?;
    Ok(Json(json!({ "conversations": conversations })))
}

/// 저장된 대화 하나를 조회합니다. 없으면 404입니다.
pub async fn get_conversation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SavedConversation>, AppError> {
    let conversation = db::get_conversation(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(conversation))
}
