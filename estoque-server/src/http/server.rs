//! Axum server setup
//!
//! Server skeleton with:
//! - Fixed CORS/cache headers on every response
//! - Tracing middleware
//! - Graceful shutdown on SIGTERM/Ctrl+C, draining the pool afterwards

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{header, HeaderName, HeaderValue, StatusCode};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use super::routes;
use crate::config::DbConfig;
use crate::db::{create_pool, ItemRepo, ItemStore};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 0.0.0.0:3000)
    pub bind_addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
        }
    }
}

/// Shared application state
pub struct AppState {
    pub store: Box<dyn ItemStore>,
}

impl AppState {
    pub fn new(store: impl ItemStore + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }
}

/// Headers attached to every response, errors included.
const RESPONSE_HEADERS: [(HeaderName, &str); 5] = [
    (header::CONTENT_TYPE, "application/json; charset=utf-8"),
    (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
    (
        header::ACCESS_CONTROL_ALLOW_METHODS,
        "GET,POST,PUT,DELETE,OPTIONS",
    ),
    (
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        "content-type, authorization",
    ),
    (header::CACHE_CONTROL, "public, max-age=15, s-maxage=60"),
];

/// Build the application router over any item store.
pub fn build_router(state: Arc<AppState>) -> Router {
    let mut app = Router::new()
        .merge(routes::health::router())
        .merge(routes::items::router())
        .fallback(not_found)
        .with_state(state);

    for (name, value) in RESPONSE_HEADERS {
        app = app.layer(SetResponseHeaderLayer::overriding(
            name,
            HeaderValue::from_static(value),
        ));
    }

    app.layer(TraceLayer::new_for_http())
}

async fn not_found() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Rota não encontrada" })),
    )
}

/// Run the HTTP server.
///
/// # Example
///
/// ```ignore
/// let db = DbConfig::from_env()?;
/// run_server(&db, ServerConfig::default()).await?;
/// ```
pub async fn run_server(db: &DbConfig, config: ServerConfig) -> Result<(), ServerError> {
    let pool = create_pool(db);
    let state = AppState::new(ItemRepo::new(pool.clone()));
    let app = build_router(Arc::new(state));

    // Bind listener
    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    // Run with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
