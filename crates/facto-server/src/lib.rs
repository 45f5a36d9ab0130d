//! HTTP API for purchase-order PDF extraction.
//!
//! Endpoints:
//! - `POST /upload` - base64 JSON body, extracted fields as JSON
//! - `POST /convert` - raw PDF body, generated spreadsheet as a download
//! - `GET /status` - liveness

mod handlers;
mod types;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use facto_core::FactoConfig;

pub use types::*;

/// API server state shared across handlers.
#[derive(Clone)]
pub struct ApiState {
    /// Pipeline configuration applied to every request.
    pub config: Arc<FactoConfig>,
}

impl ApiState {
    /// Create new API state.
    pub fn new(config: FactoConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

impl Default for ApiState {
    fn default() -> Self {
        Self::new(FactoConfig::default())
    }
}

/// Build the API router with all endpoints.
pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/status", get(handlers::status))
        .route("/upload", post(handlers::upload))
        .route("/convert", post(handlers::convert))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the API server.
pub async fn start_server(addr: &str, state: ApiState) -> Result<(), std::io::Error> {
    tracing::info!("starting API server on {}", addr);

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await
}
