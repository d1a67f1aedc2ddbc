//! Remote input: fetch a PDF from a URL into memory.
//!
//! The whole body is buffered before anything else happens. There is no size
//! cap and no content-type check; the converter is the judge of whether the
//! bytes are a PDF. Only the timeout is optional.

use crate::error::Pdf2MdError;
use reqwest::Url;
use std::time::Duration;
use tracing::{debug, info};

/// Name used when the URL has no usable last path segment.
pub const DEFAULT_DOWNLOAD_NAME: &str = "downloaded.pdf";

/// A PDF downloaded into memory.
#[derive(Debug, Clone)]
pub struct DownloadedPdf {
    /// Label derived from the URL, always ending in `.pdf`.
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Check if the input string looks like an HTTP(S) URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Derive a filename from the URL's final path segment.
///
/// Falls back to [`DEFAULT_DOWNLOAD_NAME`] and appends `.pdf` when the
/// segment does not already end with it (case-insensitively).
pub fn filename_from_url(url: &str) -> String {
    let last = match Url::parse(url) {
        Ok(parsed) => parsed
            .path_segments()
            .and_then(|mut segments| segments.next_back().map(str::to_string))
            .unwrap_or_default(),
        Err(_) => url.rsplit('/').next().unwrap_or_default().to_string(),
    };

    let mut name = if last.is_empty() {
        DEFAULT_DOWNLOAD_NAME.to_string()
    } else {
        last
    };
    if !name.to_lowercase().ends_with(".pdf") {
        name.push_str(".pdf");
    }
    name
}

/// Download `url` fully into memory.
///
/// # Errors
/// - [`Pdf2MdError::InvalidUrl`] — not an absolute HTTP(S) URL
/// - [`Pdf2MdError::DownloadTimeout`] — `timeout_secs` elapsed
/// - [`Pdf2MdError::DownloadFailed`] — transport error or non-2xx status
/// - [`Pdf2MdError::EmptyDownload`] — the body was empty
pub async fn download_pdf(
    client: &reqwest::Client,
    url: &str,
    timeout_secs: Option<u64>,
) -> Result<DownloadedPdf, Pdf2MdError> {
    let parsed = Url::parse(url).map_err(|e| Pdf2MdError::InvalidUrl {
        input: url.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(Pdf2MdError::InvalidUrl {
            input: url.to_string(),
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }

    info!("Downloading PDF from {}", url);

    let mut request = client.get(parsed);
    if let Some(secs) = timeout_secs {
        request = request.timeout(Duration::from_secs(secs));
    }

    let map_transport = |e: reqwest::Error| match timeout_secs {
        Some(secs) if e.is_timeout() => Pdf2MdError::DownloadTimeout {
            url: url.to_string(),
            secs,
        },
        _ => Pdf2MdError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        },
    };

    let response = request.send().await.map_err(map_transport)?;
    if !response.status().is_success() {
        return Err(Pdf2MdError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let bytes = response.bytes().await.map_err(map_transport)?;
    if bytes.is_empty() {
        return Err(Pdf2MdError::EmptyDownload {
            url: url.to_string(),
        });
    }

    let filename = filename_from_url(url);
    debug!("Downloaded {} bytes as '{}'", bytes.len(), filename);

    Ok(DownloadedPdf {
        filename,
        bytes: bytes.to_vec(),
    })
}
