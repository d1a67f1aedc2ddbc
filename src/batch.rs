//! Disk-to-disk batch driver.
//!
//! For one PDF on disk:
//!
//! ```text
//! <dir>/paper.pdf ─▶ converter ─▶ <out>/paper.json ─▶ reload ─▶ extract ─▶ <out>/paper_main_text.md
//! ```
//!
//! Every step runs in order and the first failure stops the run. In
//! particular a failed conversion is returned as-is instead of surfacing
//! later as a missing `paper.json`.

use crate::converter::{artifact_stem, DocumentConverter};
use crate::error::Pdf2MdError;
use crate::extract::{extract_main_text, extract_metadata, Metadata};
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Options for [`run_batch`].
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Prepend YAML front matter with title/authors/abstract to the Markdown.
    pub include_metadata: bool,
}

/// What a batch run produced.
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutput {
    pub json_path: PathBuf,
    pub markdown_path: PathBuf,
    pub metadata: Metadata,
    #[serde(skip)]
    pub main_text: String,
}

/// `<output_dir>/<stem>_main_text.md` for the given input PDF.
pub fn markdown_artifact_path(output_dir: &Path, pdf_path: &Path) -> PathBuf {
    output_dir.join(format!("{}_main_text.md", artifact_stem(pdf_path)))
}

/// Convert `pdf_path` and save the parsed JSON in `output_dir`.
///
/// The converter stages its output in a scratch directory inside
/// `output_dir`, removed again when this returns.
pub async fn process_pdf_to_json(
    converter: &dyn DocumentConverter,
    pdf_path: &Path,
    output_dir: &Path,
) -> Result<PathBuf, Pdf2MdError> {
    tokio::fs::create_dir_all(output_dir)
        .await
        .map_err(|e| Pdf2MdError::OutputWriteFailed {
            path: output_dir.to_path_buf(),
            source: e,
        })?;

    let scratch = tempfile::Builder::new()
        .prefix(".pdf2md-")
        .tempdir_in(output_dir)
        .map_err(|e| Pdf2MdError::OutputWriteFailed {
            path: output_dir.to_path_buf(),
            source: e,
        })?;

    let json_path = converter
        .convert_file(pdf_path, output_dir, scratch.path())
        .await
        .inspect_err(|e| error!("Error processing PDF '{}': {e}", pdf_path.display()))?;

    info!("JSON output saved at: {}", json_path.display());
    Ok(json_path)
}

/// Load a parsed document previously written by the converter.
pub async fn load_parsed(json_path: &Path) -> Result<Value, Pdf2MdError> {
    let raw = tokio::fs::read(json_path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Pdf2MdError::FileNotFound {
                path: json_path.to_path_buf(),
            }
        } else {
            Pdf2MdError::ReadFailed {
                path: json_path.to_path_buf(),
                source: e,
            }
        }
    })?;
    serde_json::from_slice(&raw).map_err(|e| Pdf2MdError::ArtifactParse {
        path: json_path.to_path_buf(),
        source: e,
    })
}

/// Write `text` to `path` atomically (temp file + rename).
pub async fn write_markdown(path: &Path, text: &str) -> Result<(), Pdf2MdError> {
    let tmp_path = path.with_extension("md.tmp");
    tokio::fs::write(&tmp_path, text)
        .await
        .map_err(|e| Pdf2MdError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| Pdf2MdError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })
}

/// Run the whole pipeline for one PDF.
pub async fn run_batch(
    converter: &dyn DocumentConverter,
    pdf_path: &Path,
    output_dir: &Path,
    options: &BatchOptions,
) -> Result<BatchOutput, Pdf2MdError> {
    let json_path = process_pdf_to_json(converter, pdf_path, output_dir).await?;
    let parsed = load_parsed(&json_path).await?;

    let metadata = extract_metadata(&parsed);
    let main_text = extract_main_text(&parsed);

    let markdown_path = markdown_artifact_path(output_dir, pdf_path);
    let rendered = if options.include_metadata {
        format!("{}{}", metadata.to_front_matter(), main_text)
    } else {
        main_text.clone()
    };
    write_markdown(&markdown_path, &rendered).await?;
    info!("Main text has been written to: {}", markdown_path.display());

    Ok(BatchOutput {
        json_path,
        markdown_path,
        metadata,
        main_text,
    })
}
