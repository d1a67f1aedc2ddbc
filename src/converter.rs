//! The seam to the external document-parsing backend.
//!
//! Layout analysis, reference extraction and structure inference all happen
//! inside doc2json/GROBID. This crate only ever talks to that backend through
//! [`DocumentConverter`], which mirrors the two entry points doc2json exposes:
//!
//! * [`DocumentConverter::convert_stream`] — bytes in, parsed mapping out.
//! * [`DocumentConverter::convert_file`] — disk to disk; writes
//!   `<output_dir>/<stem>.json`.
//!
//! [`GrobidConverter`] is the production implementation: an HTTP client for a
//! doc2json conversion service. Tests substitute their own implementation.

use crate::config::{BackendConfig, ServiceConfig};
use crate::error::Pdf2MdError;
use crate::parse::content_sha1;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// An external PDF-to-JSON converter.
///
/// Implementations must be `Send + Sync`: the HTTP service shares one
/// instance across all in-flight requests behind an `Arc`.
#[async_trait]
pub trait DocumentConverter: Send + Sync {
    /// Convert an in-memory PDF.
    ///
    /// * `input_file` — display label, normally the original filename
    /// * `sha` — hex digest identifying the document
    /// * `input_stream` — raw PDF bytes
    /// * `backend` — optional GROBID options; `None` means backend defaults
    async fn convert_stream(
        &self,
        input_file: &str,
        sha: &str,
        input_stream: &[u8],
        backend: Option<&BackendConfig>,
    ) -> Result<Value, Pdf2MdError>;

    /// Convert a PDF on disk and write `<output_dir>/<stem>.json`.
    ///
    /// The JSON is staged in `temp_dir` and renamed into place, so a failed
    /// conversion never leaves a partial artifact behind. Keep `temp_dir` on
    /// the same filesystem as `output_dir`.
    async fn convert_file(
        &self,
        input_path: &Path,
        output_dir: &Path,
        temp_dir: &Path,
    ) -> Result<PathBuf, Pdf2MdError> {
        let bytes = tokio::fs::read(input_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Pdf2MdError::FileNotFound {
                    path: input_path.to_path_buf(),
                }
            } else {
                Pdf2MdError::ReadFailed {
                    path: input_path.to_path_buf(),
                    source: e,
                }
            }
        })?;
        if bytes.is_empty() {
            return Err(Pdf2MdError::EmptyInput);
        }

        let label = input_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "input.pdf".to_string());
        let sha = content_sha1(&bytes);
        let parsed = self.convert_stream(&label, &sha, &bytes, None).await?;

        let out_path = json_artifact_path(output_dir, input_path);
        let staged = temp_dir.join(format!("{}.tmp", artifact_stem(input_path)));
        let rendered = serde_json::to_vec_pretty(&parsed)
            .map_err(|e| Pdf2MdError::Internal(format!("serialise parsed document: {e}")))?;

        tokio::fs::write(&staged, rendered)
            .await
            .map_err(|e| Pdf2MdError::OutputWriteFailed {
                path: staged.clone(),
                source: e,
            })?;
        tokio::fs::rename(&staged, &out_path)
            .await
            .map_err(|e| Pdf2MdError::OutputWriteFailed {
                path: out_path.clone(),
                source: e,
            })?;

        debug!("Wrote parsed JSON to {}", out_path.display());
        Ok(out_path)
    }
}

/// `<output_dir>/<stem>.json` for the given input PDF.
pub fn json_artifact_path(output_dir: &Path, input_path: &Path) -> PathBuf {
    output_dir.join(format!("{}.json", artifact_stem(input_path)))
}

/// Base name of the input without its extension; `document` if there is none.
pub(crate) fn artifact_stem(input_path: &Path) -> String {
    input_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "document".to_string())
}

// ── doc2json over HTTP ───────────────────────────────────────────────────

/// HTTP client for a doc2json conversion service.
///
/// Each call is a single `POST <base>/process_pdf_stream` with a multipart
/// body:
///
/// | part            | content                                  |
/// |-----------------|------------------------------------------|
/// | `input`         | the PDF, filename = label                |
/// | `sha`           | hex digest of the PDF                    |
/// | `grobid_config` | JSON [`BackendConfig`], only when given  |
///
/// A 2xx response must carry a JSON object. Nothing is retried.
#[derive(Debug, Clone)]
pub struct GrobidConverter {
    client: reqwest::Client,
    endpoint: String,
}

impl GrobidConverter {
    /// Create a converter for the service at `base_url`.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, Pdf2MdError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| Pdf2MdError::Internal(format!("build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: format!("{}/process_pdf_stream", base_url.trim_end_matches('/')),
        })
    }

    /// Create a converter from the service configuration.
    pub fn from_config(config: &ServiceConfig) -> Result<Self, Pdf2MdError> {
        Self::new(&config.converter_url, config.converter_timeout_secs)
    }

    /// Full URL conversions are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl DocumentConverter for GrobidConverter {
    async fn convert_stream(
        &self,
        input_file: &str,
        sha: &str,
        input_stream: &[u8],
        backend: Option<&BackendConfig>,
    ) -> Result<Value, Pdf2MdError> {
        info!(
            "Converting '{}' ({} bytes, sha {}) via {}",
            input_file,
            input_stream.len(),
            sha,
            self.endpoint
        );

        let part = Part::bytes(input_stream.to_vec())
            .file_name(input_file.to_string())
            .mime_str("application/pdf")
            .map_err(|e| Pdf2MdError::Internal(format!("build multipart part: {e}")))?;
        let mut form = Form::new().part("input", part).text("sha", sha.to_string());
        if let Some(cfg) = backend {
            let rendered = serde_json::to_string(cfg)
                .map_err(|e| Pdf2MdError::Internal(format!("serialise backend config: {e}")))?;
            form = form.text("grobid_config", rendered);
        }

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| Pdf2MdError::ConverterUnavailable {
                endpoint: self.endpoint.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Pdf2MdError::ConverterRejected {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: Value = response
            .json()
            .await
            .map_err(|e| Pdf2MdError::InvalidDocument(e.to_string()))?;
        if !parsed.is_object() {
            return Err(Pdf2MdError::InvalidDocument(format!(
                "expected a JSON object, got {}",
                json_kind(&parsed)
            )));
        }

        debug!("Converter returned a document for '{}'", input_file);
        Ok(parsed)
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Echoes its arguments back as the parsed document.
    struct EchoConverter;

    #[async_trait]
    impl DocumentConverter for EchoConverter {
        async fn convert_stream(
            &self,
            input_file: &str,
            sha: &str,
            input_stream: &[u8],
            _backend: Option<&BackendConfig>,
        ) -> Result<Value, Pdf2MdError> {
            Ok(json!({
                "paper_id": sha,
                "title": input_file,
                "len": input_stream.len(),
            }))
        }
    }

    #[test]
    fn artifact_path_uses_stem() {
        let p = json_artifact_path(Path::new("out"), Path::new("in/dudev-lim-2013.pdf"));
        assert_eq!(p, PathBuf::from("out/dudev-lim-2013.json"));
    }

    #[test]
    fn artifact_stem_without_extension() {
        assert_eq!(artifact_stem(Path::new("notes")), "notes");
        assert_eq!(artifact_stem(Path::new("/")), "document");
    }

    #[test]
    fn endpoint_trims_trailing_slash() {
        let c = GrobidConverter::new("http://localhost:8071/", 5).unwrap();
        assert_eq!(c.endpoint(), "http://localhost:8071/process_pdf_stream");
    }

    #[tokio::test]
    async fn convert_file_writes_json_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("paper.pdf");
        std::fs::write(&pdf, b"%PDF-1.4 test").unwrap();
        let out_dir = dir.path().join("out");
        std::fs::create_dir_all(&out_dir).unwrap();

        let written = EchoConverter
            .convert_file(&pdf, &out_dir, &out_dir)
            .await
            .unwrap();

        assert_eq!(written, out_dir.join("paper.json"));
        let v: Value = serde_json::from_slice(&std::fs::read(&written).unwrap()).unwrap();
        assert_eq!(v["title"], "paper.pdf");
        assert_eq!(v["paper_id"], content_sha1(b"%PDF-1.4 test"));
        assert!(!out_dir.join("paper.tmp").exists());
    }

    #[tokio::test]
    async fn convert_file_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let err = EchoConverter
            .convert_file(&dir.path().join("nope.pdf"), dir.path(), dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, Pdf2MdError::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn convert_file_empty_input() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("empty.pdf");
        std::fs::write(&pdf, b"").unwrap();
        let err = EchoConverter
            .convert_file(&pdf, dir.path(), dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, Pdf2MdError::EmptyInput));
        assert!(!dir.path().join("empty.json").exists());
    }
}
