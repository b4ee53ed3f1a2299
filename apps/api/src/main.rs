mod config;
mod db;
mod errors;
mod interview;
mod llm_client;
mod models;
mod resume;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::interview::session::SessionLocks;
use crate::interview::store::{InMemoryInterviewStore, InterviewStore, PgInterviewStore};
use crate::llm_client::LlmClient;
use crate::resume::extract::ExtractorRegistry;
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

    // Initialize interview store
    let store: Arc<dyn InterviewStore> = match &config.database_url {
        Some(url) => Arc::new(PgInterviewStore::new(create_pool(url).await?)),
        None => {
            warn!("DATABASE_URL not set; interviews are kept in memory and lost on restart");
            Arc::new(InMemoryInterviewStore::new())
        }
    };
    info!("Interview store initialized (backend: {})", store.backend());

    // Initialize LLM client
    let llm = LlmClient::new(config.llm.clone())?;
    info!("LLM client initialized (model: {})", llm.model());

    let extractors = Arc::new(ExtractorRegistry::default());
    info!("Document extractors: {}", extractors.names().join(", "));

    // Build app state
    let state = AppState {
        store,
        llm: Arc::new(llm),
        extractors,
        session_locks: SessionLocks::new(),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
