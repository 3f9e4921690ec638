mod config;
mod errors;
mod interview;
mod llm_client;
mod report;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::interview::controller::SessionController;
use crate::interview::store::{run_idle_sweeper, SessionStore};
use crate::llm_client::LlmClient;
use crate::report::default_page_config;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails before anything is served if the API key is missing)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting TalentScout API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(
        config.openai_api_key.clone(),
        config.openai_base_url.clone(),
        Duration::from_secs(config.llm_timeout_secs),
    )?;
    info!(
        "LLM client initialized (model: {}, timeout: {}s)",
        llm_client::MODEL,
        config.llm_timeout_secs
    );

    // Report layout: A4, Helvetica 12pt body
    let page_config = default_page_config();

    // Session store, swept for idle sessions in the background
    let sessions = SessionStore::new(chrono::Duration::seconds(i64::from(config.session_ttl_secs)));
    let sweep_period = Duration::from_secs(u64::from(config.session_ttl_secs).clamp(1, 60));
    tokio::spawn(run_idle_sweeper(sessions.clone(), sweep_period));
    info!(
        "Session store ready (idle ttl: {}s, sweep every {}s)",
        config.session_ttl_secs,
        sweep_period.as_secs()
    );

    // Build app state
    let state = AppState {
        sessions,
        controller: Arc::new(SessionController::new(Arc::new(llm), page_config)),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
