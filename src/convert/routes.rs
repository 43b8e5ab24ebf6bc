//! Conversion server route configuration.

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};

use super::handlers;
use super::service::ConversionService;
use super::state::AppState;

/// Largest accepted upload. Phone photos in HEIC rarely exceed 10 MiB.
pub const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Create the conversion router.
pub fn create_router<S: ConversionService>(state: AppState<S>) -> Router {
    Router::new()
        .route("/convert", post(handlers::convert_image::<S>))
        .route("/health", get(handlers::health))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(middleware::from_fn(handlers::cors))
        .with_state(state)
}
