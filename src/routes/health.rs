//! # 헬스체크(Health Check) 핸들러
//!
//! ## 엔드포인트
//! - `GET /api/health` → `{ "status": "ok", "model": "gemma2:27b" }`
//!
//! LLM 서버까지 확인하지는 않습니다. 이 서버 프로세스가 살아 있는지와
//! 어떤 모델로 설정되어 있는지만 알려줍니다.

use crate::routes::AppState;
use axum::{extract::State, Json};
use serde_json::{json, Value};

/// `GET /api/health` — 서버 상태를 확인합니다.
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "model": state.model,
    }))
}
