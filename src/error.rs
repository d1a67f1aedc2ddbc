//! Error types for the grobid-pdf2md library.
//!
//! A single enum, [`Pdf2MdError`], covers every failure the library can
//! report. Variants are grouped by where the failure happened so the HTTP
//! layer can map them onto status codes without string matching:
//!
//! * **Input** — the caller handed us nothing usable (empty buffer, bad URL).
//! * **Download** — fetching a remote PDF failed.
//! * **Converter** — the doc2json backend failed or answered nonsense.
//! * **I/O** — reading the input or writing an artifact failed.
//! * **Config** — builder validation failed.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the grobid-pdf2md library.
#[derive(Debug, Error)]
pub enum Pdf2MdError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The PDF byte buffer was empty.
    #[error("No PDF content provided or file is empty.")]
    EmptyInput,

    /// The input string is not a valid HTTP/HTTPS URL.
    #[error("Invalid URL '{input}': {reason}")]
    InvalidUrl { input: String, reason: String },

    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'")]
    FileNotFound { path: PathBuf },

    // ── Download errors ───────────────────────────────────────────────────
    /// The URL was valid but the download failed (transport error or non-2xx).
    #[error("Failed to download '{url}': {reason}")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'")]
    DownloadTimeout { url: String, secs: u64 },

    /// The download succeeded but the body was empty.
    #[error("Downloaded PDF is empty: '{url}'")]
    EmptyDownload { url: String },

    // ── Converter errors ──────────────────────────────────────────────────
    /// The converter service could not be reached.
    #[error("Converter request to '{endpoint}' failed: {reason}")]
    ConverterUnavailable { endpoint: String, reason: String },

    /// The converter answered with a non-success status.
    #[error("Converter returned HTTP {status}: {body}")]
    ConverterRejected { status: u16, body: String },

    /// The converter answered 2xx but the body is not a JSON object.
    #[error("Converter returned an invalid document: {0}")]
    InvalidDocument(String),

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not read an input file.
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not create or write an output artifact.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON artifact on disk could not be parsed.
    #[error("Failed to parse JSON in '{path}': {source}")]
    ArtifactParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Pdf2MdError {
    /// True for failures that happened while fetching a remote PDF.
    ///
    /// The URL endpoint reports these as a bad request rather than a
    /// processing failure.
    pub fn is_download_error(&self) -> bool {
        matches!(
            self,
            Pdf2MdError::InvalidUrl { .. }
                | Pdf2MdError::DownloadFailed { .. }
                | Pdf2MdError::DownloadTimeout { .. }
        )
    }
}
