//! Upstream HEIC-to-JPEG conversion service.

use std::future::Future;
use std::time::Duration;

use axum::body::Bytes;
use miette::Diagnostic;
use mime_guess::Mime;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use thiserror::Error;
use tracing::debug;

use crate::config::Secret;

/// Output format requested from the upstream.
pub const TARGET_FORMAT: &str = "jpeg";
/// JPEG quality requested from the upstream.
pub const QUALITY: u8 = 85;
/// Whether the upstream strips EXIF and other metadata.
pub const STRIP_METADATA: bool = true;

/// Errors reported by the conversion upstream.
#[derive(Error, Diagnostic, Debug)]
pub enum UpstreamError {
    #[error("Conversion API returned {status}: {body}")]
    #[diagnostic(code(detail_ops::convert::upstream_status))]
    Status { status: u16, body: String },

    #[error("Conversion API unreachable: {0}")]
    #[diagnostic(code(detail_ops::convert::upstream_network))]
    Network(String),

    #[error("Could not build conversion request: {0}")]
    #[diagnostic(code(detail_ops::convert::upstream_request))]
    Request(String),
}

/// A file received from a client.
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// Converted image returned by the upstream.
#[derive(Debug, Clone)]
pub struct Converted {
    pub bytes: Bytes,
    pub content_type: String,
}

/// Converts uploaded images. Implemented over HTTP in production and by
/// fakes in tests.
pub trait ConversionService: Send + Sync + 'static {
    fn convert(&self, upload: Upload)
    -> impl Future<Output = Result<Converted, UpstreamError>> + Send;
}

/// Forwards uploads to the third-party conversion API.
pub struct HttpConversionService {
    client: Client,
    url: String,
    api_key: Option<Secret>,
}

impl HttpConversionService {
    pub fn new(
        url: String,
        api_key: Option<Secret>,
        timeout: Duration,
    ) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| UpstreamError::Network(e.to_string()))?;
        Ok(Self {
            client,
            url,
            api_key,
        })
    }

    fn form(upload: Upload) -> Result<Form, UpstreamError> {
        let mime = content_type(&upload);
        let part = Part::bytes(upload.bytes.to_vec())
            .file_name(upload.filename)
            .mime_str(mime.as_ref())
            .map_err(|e| UpstreamError::Request(e.to_string()))?;

        Ok(Form::new()
            .part("file", part)
            .text("format", TARGET_FORMAT)
            .text("quality", QUALITY.to_string())
            .text("strip_metadata", STRIP_METADATA.to_string()))
    }
}

/// Client-declared type when it parses, otherwise a guess from the filename.
fn content_type(upload: &Upload) -> Mime {
    upload
        .content_type
        .as_deref()
        .and_then(|declared| declared.parse::<Mime>().ok())
        .unwrap_or_else(|| mime_guess::from_path(&upload.filename).first_or_octet_stream())
}

impl ConversionService for HttpConversionService {
    async fn convert(&self, upload: Upload) -> Result<Converted, UpstreamError> {
        debug!(filename = %upload.filename, bytes = upload.bytes.len(), "Forwarding upload");

        let mut request = self.client.post(&self.url).multipart(Self::form(upload)?);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key.expose());
        }

        let response = request
            .send()
            .await
            .map_err(|e| UpstreamError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status { status, body });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("image/jpeg")
            .to_string();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| UpstreamError::Network(e.to_string()))?;

        Ok(Converted {
            bytes,
            content_type,
        })
    }
}
