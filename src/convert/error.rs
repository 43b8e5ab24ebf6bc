//! HTTP-facing errors of the conversion boundary.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::service::UpstreamError;

/// JSON error envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Errors returned by the conversion handler.
#[derive(Error, Diagnostic, Debug)]
pub enum ConvertError {
    #[error("No file provided")]
    #[diagnostic(code(detail_ops::convert::no_file))]
    NoFile,

    #[error("Invalid upload: {0}")]
    #[diagnostic(code(detail_ops::convert::invalid_upload))]
    InvalidUpload(String),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Upstream(#[from] UpstreamError),
}

impl IntoResponse for ConvertError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ConvertError::NoFile => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: "No file provided".to_string(),
                    message: None,
                },
            ),
            ConvertError::InvalidUpload(message) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: "Invalid upload".to_string(),
                    message: Some(message.clone()),
                },
            ),
            ConvertError::Upstream(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse {
                    error: "Conversion failed".to_string(),
                    message: Some(err.to_string()),
                },
            ),
        };
        (status, Json(body)).into_response()
    }
}

/// Errors starting or running the HTTP server.
#[derive(Error, Diagnostic, Debug)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    #[diagnostic(code(detail_ops::convert::bind))]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    #[diagnostic(code(detail_ops::convert::serve))]
    Serve(#[source] std::io::Error),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Upstream(#[from] UpstreamError),
}
