use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use interviewer_core::InterviewService;

use crate::handlers;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<InterviewService>,
}

/// Build the router with all routes, tracing and CORS layers.
pub fn create_router(service: Arc<InterviewService>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/start_interview", post(handlers::start_interview))
        .route("/evaluate_answer", post(handlers::evaluate_answer))
        .route("/end_interview", post(handlers::end_interview))
        .route("/health", get(handlers::health))
        .with_state(AppState { service })
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Bind the listener for `config`. `host` may be an IP address or a hostname.
pub async fn bind(config: &ServerConfig) -> Result<TcpListener> {
    TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("failed to bind {}:{}", config.host, config.port))
}

/// Start the HTTP server and run until Ctrl-C.
pub async fn start_server(config: ServerConfig, service: Arc<InterviewService>) -> Result<()> {
    let app = create_router(service);

    let listener = bind(&config).await?;
    info!("Starting server on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
