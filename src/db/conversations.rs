//! # 저장된 대화 데이터베이스 쿼리 모듈
//!
//! 세션 대화를 `conversations` 테이블에 저장하고, 목록/상세를 조회합니다.
//!
//! ## 저장 형식
//! 턴, 교정, 힌트는 각각 JSON 배열 문자열로 TEXT 컬럼에 들어갑니다.
//! 한 번 저장된 기록은 수정되지 않습니다 (수정 API 없음).
//!
//! 조회 결과는 메모리 세션과 연결되지 않은 독립된 복사본입니다.

use crate::error::AppError;
use crate::models::{Conversation, ConversationRow, ConversationSummary, SavedConversation};
use sqlx::SqlitePool;

/// 대화를 저장하고 새 기록의 ID를 반환합니다.
///
/// 직렬화를 모두 끝낸 뒤 INSERT 한 번으로 쓰므로,
/// 일부만 기록된 행이 보이는 일은 없습니다.
/// `created_at`은 DB의 DEFAULT 값(서버 UTC 시각)으로 채워집니다.
pub async fn save_conversation(
    pool: &SqlitePool,
    conversation: &Conversation,
) -> Result<String, AppError> {
    let turns = serde_json::to_string(&conversation.turns)?;
    let corrections = serde_json::to_string(&conversation.corrections)?;
    let hints = serde_json::to_string(&conversation.hints)?;

    // UUIDv7: 시간순 정렬이 가능하므로 같은 밀리초에 저장된 기록의 순서도 유지됩니다.
    let id = uuid::Uuid::now_v7().to_string();

    sqlx::query(
        r#"
        INSERT INTO conversations (id, title, language, turns, corrections, hints)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(conversation.title())
    .bind(&conversation.language)
    .bind(turns)
    .bind(corrections)
    .bind(hints)
    .execute(pool)
    .await?;

    Ok(id)
}

/// 저장된 대화 목록을 최신순으로 조회합니다.
///
/// `message_count`는 SQLite의 `json_array_length()`로 조회 시점에 계산합니다.
pub async fn list_conversations(pool: &SqlitePool) -> Result<Vec<ConversationSummary>, AppError> {
    let summaries = sqlx::query_as::<_, ConversationSummary>(
        r#"
        SELECT id, title, language, created_at,
               json_array_length(turns) AS message_count
        FROM conversations
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(summaries)
}

/// ID로 저장된 대화 하나를 조회합니다.
///
/// - `Ok(Some(..))`: 찾은 경우
/// - `Ok(None)`: 해당 ID가 없는 경우 → 라우트에서 404 처리
pub async fn get_conversation(
    pool: &SqlitePool,
    id: &str,
) -> Result<Option<SavedConversation>, AppError> {
    let row = sqlx::query_as::<_, ConversationRow>(
        r#"
        SELECT id, title, language, created_at, turns, corrections, hints
        FROM conversations
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    // Option<Row> → Option<Result<Saved>> → Result<Option<Saved>>
    Ok(row.map(SavedConversation::try_from).transpose()?)
}
