mod analysis;
mod config;
mod errors;
mod interview;
mod llm_client;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::analysis::cleaner::LlmTranscriptCleaner;
use crate::analysis::question_generator::LlmQuestionGenerator;
use crate::analysis::skill_detector::LlmSkillDetector;
use crate::analysis::skill_extractor::LlmSkillExtractor;
use crate::analysis::transcriber::WhisperTranscriber;
use crate::config::Config;
use crate::interview::engine::InterviewEngine;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Interview API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(
        config.anthropic_api_key.clone(),
        config.collaborator_timeout(),
    );
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Initialize speech-to-text client
    let transcriber = WhisperTranscriber::new(
        &config.transcriber_url,
        config.transcriber_api_key.clone(),
        config.transcriber_model.clone(),
        config.collaborator_timeout(),
    );
    info!(
        "Transcriber initialized ({}, model: {})",
        config.transcriber_url, config.transcriber_model
    );

    let retry = config.retry_policy();
    info!(
        "Collaborator policy: {} attempts, {:?} timeout, {:?} backoff",
        retry.max_attempts, retry.call_timeout, retry.base_delay
    );

    let engine = InterviewEngine::new(
        Arc::new(transcriber),
        Arc::new(LlmTranscriptCleaner::new(llm.clone())),
        Arc::new(LlmSkillDetector::new(llm.clone())),
        retry,
    );

    // Build app state
    let state = AppState {
        engine: Arc::new(engine),
        skill_extractor: Arc::new(LlmSkillExtractor::new(
            llm.clone(),
            config.max_interview_skills,
        )),
        question_generator: Arc::new(LlmQuestionGenerator::new(llm)),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to the deployed frontend host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
