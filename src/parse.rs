//! In-memory parse adapter.
//!
//! The one place that turns raw PDF bytes into a parsed document. It hashes
//! the bytes (doc2json keys its output by SHA-1), hands everything to the
//! converter and returns the mapping untouched. The hash identifies the
//! document downstream; nothing here caches or deduplicates on it.

use crate::config::BackendConfig;
use crate::converter::DocumentConverter;
use crate::error::Pdf2MdError;
use serde_json::Value;
use sha1::{Digest, Sha1};
use tracing::{debug, error};

/// Lowercase hex SHA-1 digest of `bytes`.
pub fn content_sha1(bytes: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Parse a PDF held in memory.
///
/// # Errors
/// - [`Pdf2MdError::EmptyInput`] when `pdf_bytes` is empty; the converter is
///   not called.
/// - Whatever the converter returns, unchanged, after logging it.
pub async fn parse_pdf_in_memory(
    converter: &dyn DocumentConverter,
    pdf_bytes: &[u8],
    filename: &str,
    backend: Option<&BackendConfig>,
) -> Result<Value, Pdf2MdError> {
    if pdf_bytes.is_empty() {
        return Err(Pdf2MdError::EmptyInput);
    }

    let sha = content_sha1(pdf_bytes);
    debug!("Parsing '{}' in memory (sha1 {})", filename, sha);

    converter
        .convert_stream(filename, &sha, pdf_bytes, backend)
        .await
        .inspect_err(|e| error!("Failed to parse PDF in memory: {e:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    struct Call {
        input_file: String,
        sha: String,
        len: usize,
        backend: Option<BackendConfig>,
    }

    #[derive(Default)]
    struct RecordingConverter {
        calls: Mutex<Vec<Call>>,
        fail: bool,
    }

    #[async_trait]
    impl DocumentConverter for RecordingConverter {
        async fn convert_stream(
            &self,
            input_file: &str,
            sha: &str,
            input_stream: &[u8],
            backend: Option<&BackendConfig>,
        ) -> Result<Value, Pdf2MdError> {
            self.calls.lock().unwrap().push(Call {
                input_file: input_file.to_string(),
                sha: sha.to_string(),
                len: input_stream.len(),
                backend: backend.cloned(),
            });
            if self.fail {
                return Err(Pdf2MdError::ConverterRejected {
                    status: 500,
                    body: "GROBID exploded".into(),
                });
            }
            Ok(json!({ "paper_id": sha, "title": "T" }))
        }
    }

    #[test]
    fn sha1_known_vectors() {
        assert_eq!(content_sha1(b""), "da39a3ee5e6b4b0d3255bfef95601890afd80709");
        assert_eq!(
            content_sha1(b"abc"),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
    }

    #[tokio::test]
    async fn calls_converter_once_with_digest() {
        let converter = RecordingConverter::default();
        let bytes = b"%PDF-1.7 some bytes";

        let parsed = parse_pdf_in_memory(&converter, bytes, "my paper.pdf", None)
            .await
            .unwrap();

        let calls = converter.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].input_file, "my paper.pdf");
        assert_eq!(calls[0].sha, content_sha1(bytes));
        assert_eq!(calls[0].len, bytes.len());
        assert_eq!(calls[0].backend, None);
        assert_eq!(parsed["paper_id"], content_sha1(bytes));
    }

    #[tokio::test]
    async fn forwards_backend_config() {
        let converter = RecordingConverter::default();
        let backend = BackendConfig {
            consolidate_citations: true,
            ..BackendConfig::default()
        };

        parse_pdf_in_memory(&converter, b"%PDF", "a.pdf", Some(&backend))
            .await
            .unwrap();

        let calls = converter.calls.lock().unwrap();
        assert_eq!(calls[0].backend.as_ref(), Some(&backend));
    }

    #[tokio::test]
    async fn empty_buffer_never_reaches_converter() {
        let converter = RecordingConverter::default();
        let err = parse_pdf_in_memory(&converter, b"", "empty.pdf", None)
            .await
            .unwrap_err();
        assert!(matches!(err, Pdf2MdError::EmptyInput));
        assert!(converter.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn converter_error_is_returned_unchanged() {
        let converter = RecordingConverter {
            fail: true,
            ..Default::default()
        };
        let err = parse_pdf_in_memory(&converter, b"%PDF", "a.pdf", None)
            .await
            .unwrap_err();
        match err {
            Pdf2MdError::ConverterRejected { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "GROBID exploded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(converter.calls.lock().unwrap().len(), 1);
    }
}
