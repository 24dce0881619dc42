//! # lingotutor 웹 서버 진입점
//!
//! 로컬 LLM과 대화하며 외국어를 연습하는 튜터 서비스입니다.
//! 사용자 메시지마다 문법 교정과 자연스러움 힌트를 붙이고,
//! 원하면 대화를 SQLite에 저장합니다.
//!
//! 이 파일이 수행하는 작업:
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. SQLite 연결 풀 생성과 마이그레이션
//! 4. LLM 백엔드 클라이언트와 세션 저장소 생성
//! 5. API 라우터 설정 (+ 정적 파일 서빙)
//! 6. HTTP 서버 시작

mod config;
mod db;
mod error;
mod models;
mod routes;
mod services;

use anyhow::Result;
use config::Config;
use routes::AppState;
use services::{ConversationStore, OllamaClient, Tutor};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::{path::Path, str::FromStr, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1단계: 환경변수 로딩 ──
    // .env 파일이 없어도 에러 없이 넘어갑니다.
    dotenvy::dotenv().ok();

    // ── 2단계: 로깅(tracing) 초기화 ──
    // RUST_LOG가 없으면 lingotutor, tower_http, axum 모듈을 debug 레벨로 설정
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lingotutor=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    tracing::info!("Starting lingotutor on {}:{}", config.host, config.port);

    // ── 3단계: SQLite 연결 풀 생성 ──
    // DB 파일이 들어갈 디렉토리가 없으면 먼저 만듭니다.
    let options = SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);
    if let Some(parent) = options.get_filename().parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            tokio::fs::create_dir_all(parent).await?;
            tracing::info!("Created database directory: {}", parent.display());
        }
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;

    // ── 4단계: LLM 백엔드와 세션 저장소 ──
    let backend = OllamaClient::new(
        config.ollama_url.clone(),
        config.ollama_model.clone(),
        config.llm_timeout,
    )?;
    tracing::info!(
        "Using model {} at {} (timeout {}s)",
        backend.model(),
        config.ollama_url,
        config.llm_timeout.as_secs()
    );

    let store = ConversationStore::new();
    let state = AppState {
        pool: pool.clone(),
        tutor: Arc::new(Tutor::new(Arc::new(backend), store.clone())),
        store,
        default_language: config.default_language.clone(),
        model: config.ollama_model.clone(),
    };

    // ── 5단계: 라우터, CORS, 정적 파일 ──
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let static_dir = Path::new(&config.static_dir);
    let app = if static_dir.exists() {
        tracing::info!("Serving static files from {}", config.static_dir);

        // 찾을 수 없는 경로는 index.html로 돌려보냅니다.
        let serve_dir = ServeDir::new(static_dir)
            .not_found_service(ServeFile::new(static_dir.join("index.html")));

        routes::router(state)
            .fallback_service(serve_dir)
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    } else {
        tracing::warn!("Static directory {} not found, serving API only", config.static_dir);

        routes::router(state)
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    };

    // ── 6단계: 서버 시작 ──
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
