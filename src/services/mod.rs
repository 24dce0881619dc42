//! # 서비스 계층
//!
//! 라우트 핸들러와 DB 사이의 비즈니스 로직입니다.
//! - `backend`: LLM 채팅 API 어댑터 (`ChatBackend`, `OllamaClient`)
//! - `judgment`: 모델 답변에서 JSON 판정 추출
//! - `prompts`: 프롬프트 템플릿
//! - `annotator`: 문법 교정과 자연스러움 힌트
//! - `conversations`: 세션별 대화 상태 저장소
//! - `render`: 교정/힌트 피드 HTML 렌더링
//! - `tutor`: 채팅 턴 전체 흐름, 연습 문장 검사, 번역

pub mod annotator;
pub mod backend;
pub mod conversations;
pub mod judgment;
pub mod prompts;
pub mod render;
pub mod tutor;

pub use backend::OllamaClient;
pub use conversations::ConversationStore;
pub use tutor::Tutor;
