//! # 데이터 모델 모듈
//!
//! 애플리케이션에서 사용하는 데이터 구조체(struct)들을 정의합니다.
//! - `turn`: 대화 턴과 역할
//! - `annotation`: 문법 판정, 힌트 판정, 교정/힌트 기록, 피드 항목
//! - `conversation`: 세션 대화, 저장된 대화 기록, API 요청/응답 본문
//!
//! `pub use X::*;`로 재공개하므로 `crate::models::Turn`처럼 짧게 쓸 수 있습니다.

pub mod annotation;
pub mod conversation;
pub mod turn;

pub use annotation::*;
pub use conversation::*;
pub use turn::*;
