//! # 애플리케이션 설정(Configuration) 모듈
//!
//! 환경변수에서 서버 설정값을 읽어오는 모듈입니다.
//! `.env` 파일이나 시스템 환경변수에서 값을 가져옵니다.
//!
//! 설정 항목:
//! - `DATABASE_URL`: 저장된 대화를 보관할 SQLite 데이터베이스 경로
//! - `OLLAMA_URL`: 로컬 LLM(Ollama) 서버 주소
//! - `OLLAMA_MODEL`: 채팅/교정/힌트에 사용할 모델 이름
//! - `LLM_TIMEOUT_SECS`: LLM 호출 한 번에 허용하는 최대 시간(초)
//! - `DEFAULT_LANGUAGE`: 요청에 언어가 없을 때 사용할 학습 언어 코드
//! - `STATIC_DIR`: 프론트엔드 정적 파일 디렉토리
//! - `HOST`, `PORT`: 서버 바인딩 주소

use std::env;
use std::time::Duration;

/// 애플리케이션 전체 설정을 담는 구조체
///
/// 서버 시작 시 환경변수에서 한 번 읽어온 후,
/// 애플리케이션 전체에서 공유됩니다.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite 데이터베이스 URL (예: "sqlite:data/lingotutor.db")
    pub database_url: String,
    /// Ollama 서버 기본 주소 (예: "http://localhost:11434")
    pub ollama_url: String,
    /// 사용할 모델 이름 (예: "gemma2:27b")
    pub ollama_model: String,
    /// LLM 호출 타임아웃
    pub llm_timeout: Duration,
    /// 기본 학습 언어 코드 (예: "es")
    pub default_language: String,
    /// 정적 파일 디렉토리 (없으면 API만 서빙)
    pub static_dir: String,
    pub host: String,
    pub port: u16,
}

impl Config {
    /// 환경변수에서 설정값을 읽어 Config 인스턴스를 생성합니다.
    ///
    /// 모든 항목에 기본값이 있으므로 환경변수가 하나도 없어도 동작합니다.
    /// 숫자 항목은 파싱에 실패하면 기본값을 사용합니다.
    pub fn from_env() -> Self {
        Self {
            database_url: var_or("DATABASE_URL", "sqlite:data/lingotutor.db"),
            ollama_url: var_or("OLLAMA_URL", "http://localhost:11434"),
            ollama_model: var_or("OLLAMA_MODEL", "gemma2:27b"),
            llm_timeout: Duration::from_secs(
                var_or("LLM_TIMEOUT_SECS", "30").parse().unwrap_or(30),
            ),
            default_language: var_or("DEFAULT_LANGUAGE", "es"),
            static_dir: var_or("STATIC_DIR", "static"),
            host: var_or("HOST", "0.0.0.0"),
            // .parse(): "5000" → 5000u16, 실패 시 기본값
            port: var_or("PORT", "5000").parse().unwrap_or(5000),
        }
    }
}

/// 환경변수를 읽고, 없으면 기본값을 돌려줍니다.
fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
