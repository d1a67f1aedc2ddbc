//! HTTP error responses.
//!
//! Bad input and failed downloads answer 400, an upload over the configured
//! size cap answers 413, a failed parse answers 500. The body is always `{"error": ..., "details"?: ...}`.

use crate::error::Pdf2MdError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

pub const UPLOAD_TOO_LARGE: &str = "Uploaded PDF exceeds size limit";

/// JSON body of every error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Error type returned by the route handlers.
#[derive(Debug)]
pub enum AppError {
    /// Missing or unusable input, or a failed download.
    BadRequest {
        error: &'static str,
        details: Option<String>,
    },
    /// The request body exceeded the configured upload limit.
    PayloadTooLarge { details: String },
    /// The converter failed on a well-formed request.
    Processing {
        error: &'static str,
        source: Pdf2MdError,
    },
}

impl AppError {
    pub fn bad_request(error: &'static str) -> Self {
        AppError::BadRequest {
            error,
            details: None,
        }
    }

    pub fn bad_request_with(error: &'static str, details: impl Into<String>) -> Self {
        AppError::BadRequest {
            error,
            details: Some(details.into()),
        }
    }

    pub fn payload_too_large(details: impl Into<String>) -> Self {
        AppError::PayloadTooLarge {
            details: details.into(),
        }
    }

    pub fn processing(error: &'static str, source: Pdf2MdError) -> Self {
        AppError::Processing { error, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Processing { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            AppError::BadRequest { error, details } => {
                match &details {
                    Some(d) => warn!("{error}: {d}"),
                    None => warn!("{error}"),
                }
                ErrorBody {
                    error: error.to_string(),
                    details,
                }
            }
            AppError::PayloadTooLarge { details } => {
                warn!("{UPLOAD_TOO_LARGE}: {details}");
                ErrorBody {
                    error: UPLOAD_TOO_LARGE.to_string(),
                    details: Some(details),
                }
            }
            AppError::Processing { error, source } => {
                error!("{error}: {source:?}");
                ErrorBody {
                    error: error.to_string(),
                    details: Some(source.to_string()),
                }
            }
        };
        (status, Json(body)).into_response()
    }
}
