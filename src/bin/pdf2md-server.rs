//! HTTP server binary for grobid-pdf2md.
//!
//! Maps CLI flags (or their environment fallbacks, `.env` included) onto a
//! `ServiceConfig` and serves the two PDF endpoints.

use anyhow::{Context, Result};
use clap::Parser;
use grobid_pdf2md::config::DEFAULT_CONVERTER_URL;
use grobid_pdf2md::{serve, AppState, BackendConfig, GrobidConverter, ServiceConfig};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"ENDPOINTS:
  POST /process_pdf                multipart field `file` → {message, parsed_json}
  GET  /process_pdf_url?url=<URL>  download, then parse   → {message, parsed_json}

EXAMPLES:
  # Serve on 0.0.0.0:8080 against a local doc2json service
  pdf2md-server

  # Custom converter and GROBID options
  pdf2md-server --converter-url http://doc2json:8071 --grobid-config grobid.json

  # Try it
  curl -F file=@paper.pdf http://localhost:8080/process_pdf
  curl 'http://localhost:8080/process_pdf_url?url=https://arxiv.org/pdf/1706.03762'

ENVIRONMENT VARIABLES:
  Every flag has a PDF2MD_* fallback (see --help). A `.env` file in the
  working directory is loaded first. RUST_LOG overrides the log filter.
"#;

/// Serve PDF parsing over HTTP through a GROBID/doc2json converter.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2md-server",
    version,
    about = "Serve PDF parsing over HTTP through a GROBID/doc2json converter",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Interface to bind.
    #[arg(long, env = "PDF2MD_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on.
    #[arg(short, long, env = "PDF2MD_PORT", default_value_t = 8080)]
    port: u16,

    /// Debug mode: DEBUG-level logs and per-request tracing. Not for public deployments.
    #[arg(long, env = "PDF2MD_DEBUG")]
    debug: bool,

    /// Base URL of the doc2json conversion service.
    #[arg(long, env = "PDF2MD_CONVERTER_URL", default_value = DEFAULT_CONVERTER_URL)]
    converter_url: String,

    /// Per-conversion timeout in seconds.
    #[arg(long, env = "PDF2MD_CONVERTER_TIMEOUT", default_value_t = 300)]
    converter_timeout: u64,

    /// Timeout for URL downloads in seconds (default: none).
    #[arg(long, env = "PDF2MD_DOWNLOAD_TIMEOUT")]
    download_timeout: Option<u64>,

    /// Maximum upload size in MiB (default: unbounded).
    #[arg(long, env = "PDF2MD_MAX_UPLOAD_MB")]
    max_upload_mb: Option<usize>,

    /// JSON file with GROBID options forwarded on every parse.
    #[arg(long, env = "PDF2MD_GROBID_CONFIG")]
    grobid_config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let config = build_config(&cli)?;
    let converter = GrobidConverter::from_config(&config).context("Failed to create converter")?;
    tracing::info!("Forwarding conversions to {}", converter.endpoint());

    // ── Serve ────────────────────────────────────────────────────────────
    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr()))?;

    let state = AppState::new(config, Arc::new(converter));
    serve(listener, state).await.context("Server error")?;

    Ok(())
}

/// Map CLI args to `ServiceConfig`.
fn build_config(cli: &Cli) -> Result<ServiceConfig> {
    let mut builder = ServiceConfig::builder()
        .host(&cli.host)
        .port(cli.port)
        .debug(cli.debug)
        .converter_url(&cli.converter_url)
        .converter_timeout_secs(cli.converter_timeout)
        .download_timeout_secs(cli.download_timeout)
        .max_upload_bytes(cli.max_upload_mb.map(|mb| mb.saturating_mul(1024 * 1024)));

    if let Some(ref path) = cli.grobid_config {
        let backend = BackendConfig::from_json_file(path)
            .with_context(|| format!("Failed to load GROBID config from {:?}", path))?;
        builder = builder.backend(backend);
    }

    builder.build().context("Invalid configuration")
}
