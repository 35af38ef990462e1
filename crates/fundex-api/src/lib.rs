//! Fundex API
//!
//! HTTP surface, upstream client and CLI plumbing for the Fundex mutual fund
//! explorer. The JSON endpoints live under `/api`; the HTML dashboard from
//! `fundex-web` is mounted at `/`.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use fundex_core::Catalog;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::info;

pub mod config;
pub mod error;
pub mod handlers;
pub mod refresh;
pub mod source;
pub mod table;
pub mod tracing_setup;

use config::ServerConfig;

/// Shared state for the JSON handlers
#[derive(Debug)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub start_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog, start_time: Utc::now() }
    }

    pub fn uptime(&self) -> Duration {
        (Utc::now() - self.start_time).to_std().unwrap_or_default()
    }
}

/// Build the full router: JSON API plus the HTML dashboard
pub fn create_app(catalog: Arc<Catalog>, server: &ServerConfig) -> Router {
    info!(max_body_kb = server.max_body_kb, "Building HTTP router");
    let state = Arc::new(AppState::new(Arc::clone(&catalog)));

    let api = Router::new()
        .route("/health", get(handlers::health))
        .route("/api/facets", get(handlers::facets))
        .route("/api/funds", get(handlers::list_funds))
        .route("/api/funds/query", post(handlers::query_funds))
        .route("/api/refresh", post(handlers::refresh))
        .layer(CorsLayer::permissive())
        .with_state(state);

    api.merge(fundex_web::routes(catalog)).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(RequestBodyLimitLayer::new(server.max_body_kb * 1024)),
    )
}
