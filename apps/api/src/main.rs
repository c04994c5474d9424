mod config;
mod errors;
mod llm_client;
mod matching;
mod profile;
mod routes;
mod session;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, ModelSettings};
use crate::llm_client::HttpCompletionFactory;
use crate::routes::build_router;
use crate::session::SessionStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Scout API v{}", env!("CARGO_PKG_VERSION"));

    match config.resolve_model(&ModelSettings::default())? {
        Some(model) => info!("Default LLM backend: {} ({})", model.provider, model.model),
        None => warn!(
            "No API key configured for {}; LLM features need a per-request key",
            config.llm_provider
        ),
    }
    info!(
        "CV text is truncated to {} chars before extraction",
        config.extraction.max_input_chars
    );
    info!("CV uploads accepted up to {} bytes", config.max_upload_bytes);

    let state = AppState {
        config: config.clone(),
        sessions: SessionStore::default(),
        completions: Arc::new(HttpCompletionFactory),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
