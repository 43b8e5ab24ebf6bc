//! Conversion boundary handlers.

use axum::Json;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, Request, State};
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    ACCESS_CONTROL_MAX_AGE, CONTENT_DISPOSITION, CONTENT_TYPE,
};
use axum::http::{HeaderValue, Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::{error, info, instrument};

use super::error::ConvertError;
use super::service::{ConversionService, Upload};
use super::state::AppState;

/// Multipart field carrying the image.
pub const FILE_FIELD: &str = "file";

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Health check endpoint
#[instrument]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Answers preflight requests and stamps permissive CORS headers on every
/// response. `OPTIONS` never reaches a handler.
pub async fn cors(request: Request, next: Next) -> Response {
    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::OK.into_response()
    } else {
        next.run(request).await
    };

    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("POST, OPTIONS"),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("authorization, x-client-info, apikey, content-type"),
    );
    headers.insert(ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static("86400"));
    response
}

/// Convert an uploaded HEIC image to JPEG
///
/// Expects `multipart/form-data` with the image in the `file` field.
#[instrument(skip_all)]
pub async fn convert_image<S: ConversionService>(
    State(state): State<AppState<S>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ConvertError> {
    let upload = read_upload(multipart.map_err(|_| ConvertError::NoFile)?).await?;
    let filename = jpeg_filename(&upload.filename);
    info!(original = %upload.filename, bytes = upload.bytes.len(), "Converting image");

    let converted = state.service().convert(upload).await.map_err(|err| {
        error!(cause = %err, "Image conversion failed");
        ConvertError::from(err)
    })?;

    Ok((
        [
            (CONTENT_TYPE, converted.content_type),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        converted.bytes,
    )
        .into_response())
}

async fn read_upload(mut multipart: Multipart) -> Result<Upload, ConvertError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ConvertError::InvalidUpload(e.to_string()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or("upload.heic").to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ConvertError::InvalidUpload(e.to_string()))?;

        if bytes.is_empty() {
            return Err(ConvertError::NoFile);
        }
        return Ok(Upload {
            filename,
            content_type,
            bytes,
        });
    }
    Err(ConvertError::NoFile)
}

/// Swap the extension of an uploaded filename for `.jpg`.
///
/// Directory components are dropped and the name is made safe for a
/// `Content-Disposition` header.
pub fn jpeg_filename(original: &str) -> String {
    let base = original.rsplit(['/', '\\']).next().unwrap_or(original);
    let stem = match base.rsplit_once('.') {
        Some((stem, _)) => stem,
        None => base,
    };
    let safe = sanitize_filename::sanitize(stem);
    if safe.trim().is_empty() {
        "converted.jpg".to_string()
    } else {
        format!("{}.jpg", safe)
    }
}
