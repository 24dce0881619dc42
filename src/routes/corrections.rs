//! # 학습 포인트 피드 핸들러
//!
//! ## 엔드포인트
//! - `GET /api/corrections?session_id=...` → HTML 조각
//!
//! 프론트엔드가 응답을 그대로 DOM에 끼워 넣으므로 JSON이 아니라 HTML을 돌려줍니다.
//! 텍스트 필드는 모두 `services::render`에서 이스케이프됩니다.

use crate::{
    models::FeedQuery,
    routes::{AppState, DEFAULT_SESSION},
};
use axum::{
    extract::{Query, State},
    response::Html,
};

/// 세션의 교정과 힌트를 최신순으로 렌더링합니다.
/// 세션이 없거나 기록이 없으면 안내 문구를 돌려줍니다.
pub async fn corrections_feed(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> Html<String> {
    let session_id = query.session_id.as_deref().unwrap_or(DEFAULT_SESSION);
    Html(state.store.render(session_id))
}
