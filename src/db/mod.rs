//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 데이터베이스와 직접 상호작용하는 함수들을 모아둔 모듈입니다.
//! 라우트 핸들러(routes/)에서 이 모듈의 함수를 호출하여 DB 작업을 수행합니다.
//!
//! 하위 모듈:
//! - `conversations`: 저장된 대화 기록의 저장/목록/상세 조회

pub mod conversations;

pub use conversations::*;

/// 테스트용 인메모리 SQLite 풀 — 실제 마이그레이션을 적용합니다.
///
/// `sqlite::memory:`는 연결마다 별도의 DB가 되므로 연결을 1개로 제한합니다.
#[cfg(test)]
pub async fn test_pool() -> sqlx::SqlitePool {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    sqlx::migrate!("./migrations").run(&pool).await.unwrap();
    pool
}
