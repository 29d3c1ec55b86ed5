//! HTTP surface for reference verification: a health check, a multipart
//! upload endpoint, and a ping.

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;

pub mod handlers;
pub mod models;
pub mod state;
pub mod upload;

pub use state::AppState;

/// Build the application router.
pub fn app(state: Arc<AppState>) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_mb * 1024 * 1024);

    Router::new()
        .route("/", get(handlers::index::index))
        .route("/verify", post(handlers::verify::verify))
        .route("/ping", post(handlers::ping::ping))
        .layer(body_limit)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
