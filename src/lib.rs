//! # grobid-pdf2md
//!
//! Forward PDF documents to a GROBID-based converter (doc2json) and reshape
//! the parsed JSON into metadata and Markdown.
//!
//! The parsing itself happens in the external backend. This crate provides
//! the plumbing around it:
//!
//! ```text
//! PDF bytes
//!  │
//!  ├─ 1. Input    upload, URL download, or file on disk
//!  ├─ 2. Parse    SHA-1 + one call into the converter
//!  ├─ 3. Extract  title / authors / abstract + body text as Markdown
//!  └─ 4. Output   JSON response, or <stem>.json + <stem>_main_text.md
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use grobid_pdf2md::{extract_main_text, extract_metadata, parse_pdf_in_memory, GrobidConverter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let converter = GrobidConverter::new("http://localhost:8071", 300)?;
//!     let bytes = std::fs::read("paper.pdf")?;
//!     let parsed = parse_pdf_in_memory(&converter, &bytes, "paper.pdf", None).await?;
//!
//!     let meta = extract_metadata(&parsed);
//!     println!("{} — {}", meta.title, meta.authors);
//!     println!("{}", extract_main_text(&parsed));
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2md-server` and `pdf2md-batch` binaries |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod batch;
pub mod config;
pub mod converter;
pub mod error;
pub mod extract;
pub mod input;
pub mod parse;
pub mod server;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use batch::{run_batch, BatchOptions, BatchOutput};
pub use config::{BackendConfig, ServiceConfig, ServiceConfigBuilder};
pub use converter::{DocumentConverter, GrobidConverter};
pub use error::Pdf2MdError;
pub use extract::{extract_main_text, extract_metadata, Metadata};
pub use parse::{content_sha1, parse_pdf_in_memory};
pub use server::{router, serve, AppState};
