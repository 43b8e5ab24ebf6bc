//! Image conversion boundary.
//!
//! A small HTTP server that forwards HEIC uploads to a third-party
//! conversion API and streams the JPEG back to the caller.

mod error;
mod handlers;
mod routes;
mod service;
mod state;

use std::net::IpAddr;
use std::time::Duration;

use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Secret;

pub use error::{ConvertError, ErrorResponse, ServerError};
pub use handlers::{FILE_FIELD, jpeg_filename};
pub use routes::{MAX_UPLOAD_BYTES, create_router};
pub use service::{
    ConversionService, Converted, HttpConversionService, QUALITY, STRIP_METADATA, TARGET_FORMAT,
    Upload, UpstreamError,
};
pub use state::AppState;

/// Conversion server configuration
pub struct Config {
    /// Host address to bind to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Third-party conversion endpoint
    pub upstream_url: String,
    /// Credential for the conversion endpoint
    pub api_key: Option<Secret>,
    /// Per-call timeout against the upstream
    pub timeout: Duration,
}

/// Run the conversion server with the given configuration
pub async fn run(config: Config) -> Result<(), ServerError> {
    let service =
        HttpConversionService::new(config.upstream_url.clone(), config.api_key, config.timeout)?;
    let app = create_router(AppState::new(service)).layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.clone(),
            source,
        })?;
    info!(upstream = %config.upstream_url, "Conversion server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(crate::sync::interrupt_signal())
        .await
        .map_err(ServerError::Serve)?;
    Ok(())
}
