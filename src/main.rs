//! Susana - a farm-girl chat companion
//!
//! A Rust backend that keeps a single durable conversation log and answers
//! each turn from a local rule engine or, when a key is available, a remote
//! chat model.

mod api;
mod config;
mod db;
mod dispatcher;
mod llm;
mod persona;
mod rules;

use api::{create_router, AppState};
use config::AppConfig;
use db::Database;
use dispatcher::Dispatcher;
use llm::{CredentialResolver, GeminiBridge, LoggingBridge, SessionCredential, StaticCredential};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "susana=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let config = AppConfig::from_env()?;

    // Ensure database directory exists
    if !config.is_in_memory() {
        if let Some(parent) = PathBuf::from(&config.db_path).parent() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // Initialize database
    tracing::info!(path = %config.db_path, "Opening database");
    let db = Database::open(&config.db_path)?;

    // Credential tiers: configuration first, then the session
    let session = Arc::new(SessionCredential::default());
    let credentials = CredentialResolver::new()
        .with_source(Arc::new(StaticCredential::new(
            config.gemini_api_key.as_deref(),
        )))
        .with_source(session.clone());

    let gemini = GeminiBridge::new(
        &config.gemini_model,
        config.gateway.as_deref(),
        config.llm_timeout,
    )?;
    let bridge = Arc::new(LoggingBridge::new(Arc::new(gemini)));

    if let Some((_, source)) = credentials.resolve() {
        tracing::info!(model = %config.gemini_model, source, "Remote model enabled");
    } else {
        tracing::warn!("No GEMINI_API_KEY configured. Running in demo mode until a key is supplied.");
    }

    let dispatcher = Arc::new(Dispatcher::new(
        db.clone(),
        bridge,
        credentials,
        config.dispatch.clone(),
    ));

    // Create application state
    let state = AppState::new(db, dispatcher, session);

    // Create router
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let compression = CompressionLayer::new()
        .gzip(true)
        .br(true)
        .deflate(true)
        .zstd(true);

    let app = create_router(state)
        .layer(cors)
        .layer(compression)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Susana server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
