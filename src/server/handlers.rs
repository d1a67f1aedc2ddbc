//! Route handlers for `/process_pdf` and `/process_pdf_url`.

use super::error::AppError;
use super::AppState;
use crate::error::Pdf2MdError;
use crate::input::download_pdf;
use crate::parse::parse_pdf_in_memory;
use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::QueryRejection,
        Multipart, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

pub const UPLOAD_OK: &str = "Processing complete (in-memory).";
pub const URL_OK: &str = "Successfully processed PDF from URL in-memory.";

/// Body of a successful response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessResponse {
    pub message: String,
    pub parsed_json: Value,
}

/// Query string of `GET /process_pdf_url`.
#[derive(Debug, Deserialize)]
pub struct UrlParams {
    pub url: Option<String>,
}

/// The `file` part of an upload.
struct Upload {
    filename: Option<String>,
    bytes: Vec<u8>,
}

/// `POST /process_pdf` — parse an uploaded PDF without touching disk.
pub async fn process_pdf(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ProcessResponse>, AppError> {
    let multipart =
        multipart.map_err(|e| AppError::bad_request_with("Invalid multipart request", e.to_string()))?;

    let upload = read_file_field(multipart)
        .await?
        .ok_or_else(|| AppError::bad_request("No file uploaded"))?;

    // A `file` part without a filename is a plain form field, not an upload.
    let filename = upload
        .filename
        .ok_or_else(|| AppError::bad_request("No file uploaded"))?;
    if filename.trim().is_empty() {
        return Err(AppError::bad_request("Empty filename"));
    }

    if upload.bytes.is_empty() {
        return Err(AppError::bad_request("Uploaded PDF is empty"));
    }

    info!("Received PDF in memory: {}", filename);

    let parsed_json = parse_pdf_in_memory(
        state.converter.as_ref(),
        &upload.bytes,
        &filename,
        state.config.backend.as_ref(),
    )
    .await
    .map_err(|e| AppError::processing("PDF processing failed", e))?;

    Ok(Json(ProcessResponse {
        message: UPLOAD_OK.to_string(),
        parsed_json,
    }))
}

/// `GET /process_pdf_url?url=...` — download a PDF into memory and parse it.
pub async fn process_pdf_url(
    State(state): State<AppState>,
    params: Result<Query<UrlParams>, QueryRejection>,
) -> Result<Json<ProcessResponse>, AppError> {
    let Query(params) =
        params.map_err(|e| AppError::bad_request_with("Invalid query string", e.body_text()))?;

    let url = params
        .url
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| AppError::bad_request("No URL provided"))?;

    let downloaded = download_pdf(&state.http, &url, state.config.download_timeout_secs)
        .await
        .map_err(|e| match e {
            Pdf2MdError::EmptyDownload { .. } => AppError::bad_request("Downloaded PDF is empty"),
            e if e.is_download_error() => {
                AppError::bad_request_with("Failed to download PDF", e.to_string())
            }
            e => AppError::processing("Failed to process online PDF", e),
        })?;

    info!(
        "Downloaded PDF in memory: {} ({} bytes)",
        downloaded.filename,
        downloaded.bytes.len()
    );

    let parsed_json = parse_pdf_in_memory(
        state.converter.as_ref(),
        &downloaded.bytes,
        &downloaded.filename,
        state.config.backend.as_ref(),
    )
    .await
    .map_err(|e| AppError::processing("Failed to process online PDF", e))?;

    Ok(Json(ProcessResponse {
        message: URL_OK.to_string(),
        parsed_json,
    }))
}

/// Read the first `file` part; other parts are skipped.
async fn read_file_field(mut multipart: Multipart) -> Result<Option<Upload>, AppError> {
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("Invalid multipart request", e))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name == "file" && upload.is_none() {
            let filename = field.file_name().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| multipart_error("Failed to read uploaded file", e))?;
            upload = Some(Upload {
                filename,
                bytes: bytes.to_vec(),
            });
        } else {
            warn!("Ignoring multipart field: {}", name);
        }
    }

    Ok(upload)
}

/// Map a body read failure, separating the upload size cap from malformed input.
fn multipart_error(error: &'static str, e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::payload_too_large(e.body_text())
    } else {
        AppError::bad_request_with(error, e.body_text())
    }
}
