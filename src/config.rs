//! Configuration types for the service and the doc2json backend.
//!
//! Everything the HTTP service needs at startup lives in [`ServiceConfig`],
//! built via [`ServiceConfigBuilder`] and handed to
//! [`crate::server::AppState`]. Handlers only ever read it, so there is no
//! process-global state beyond the tracing subscriber installed by the
//! binaries.
//!
//! [`BackendConfig`] is the typed form of the `grobid_config` mapping that
//! doc2json accepts. It is optional everywhere: when absent, the converter
//! falls back to its own defaults.

use crate::error::Pdf2MdError;
use crate::input::is_url;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default converter endpoint (a doc2json service in front of GROBID).
pub const DEFAULT_CONVERTER_URL: &str = "http://localhost:8071";

/// Configuration for the HTTP service.
///
/// # Example
/// ```rust
/// use grobid_pdf2md::ServiceConfig;
///
/// let config = ServiceConfig::builder()
///     .port(9090)
///     .converter_url("http://grobid-bridge:8071")
///     .build()
///     .unwrap();
/// assert_eq!(config.bind_addr(), "0.0.0.0:9090");
/// ```
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Interface to bind. Default: `0.0.0.0` (all interfaces).
    pub host: String,

    /// TCP port. Default: 8080.
    pub port: u16,

    /// Debug mode: `debug`-level logs and per-request tracing. Default: false.
    ///
    /// Never enable on a public deployment; error details and request
    /// traces end up in the logs.
    pub debug: bool,

    /// Base URL of the doc2json conversion service.
    pub converter_url: String,

    /// Timeout for a single conversion call in seconds. Default: 300.
    ///
    /// GROBID full-text processing of a long paper routinely takes tens of
    /// seconds; this only guards against a wedged backend.
    pub converter_timeout_secs: u64,

    /// Timeout for `GET /process_pdf_url` downloads in seconds. Default: none.
    pub download_timeout_secs: Option<u64>,

    /// Maximum accepted upload size in bytes. Default: unbounded.
    pub max_upload_bytes: Option<usize>,

    /// Backend configuration forwarded with every in-memory parse.
    pub backend: Option<BackendConfig>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            debug: false,
            converter_url: DEFAULT_CONVERTER_URL.to_string(),
            converter_timeout_secs: 300,
            download_timeout_secs: None,
            max_upload_bytes: None,
            backend: None,
        }
    }
}

impl ServiceConfig {
    /// Create a new builder for `ServiceConfig`.
    pub fn builder() -> ServiceConfigBuilder {
        ServiceConfigBuilder {
            config: Self::default(),
        }
    }

    /// `host:port` string suitable for `TcpListener::bind`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Builder for [`ServiceConfig`].
#[derive(Debug)]
pub struct ServiceConfigBuilder {
    config: ServiceConfig,
}

impl ServiceConfigBuilder {
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    pub fn debug(mut self, v: bool) -> Self {
        self.config.debug = v;
        self
    }

    pub fn converter_url(mut self, url: impl Into<String>) -> Self {
        self.config.converter_url = url.into();
        self
    }

    pub fn converter_timeout_secs(mut self, secs: u64) -> Self {
        self.config.converter_timeout_secs = secs.max(1);
        self
    }

    pub fn download_timeout_secs(mut self, secs: Option<u64>) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn max_upload_bytes(mut self, bytes: Option<usize>) -> Self {
        self.config.max_upload_bytes = bytes;
        self
    }

    pub fn backend(mut self, backend: BackendConfig) -> Self {
        self.config.backend = Some(backend);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ServiceConfig, Pdf2MdError> {
        let c = &self.config;
        if c.host.trim().is_empty() {
            return Err(Pdf2MdError::InvalidConfig("host must not be empty".into()));
        }
        if !is_url(&c.converter_url) {
            return Err(Pdf2MdError::InvalidConfig(format!(
                "converter URL must start with http:// or https://, got '{}'",
                c.converter_url
            )));
        }
        if c.max_upload_bytes == Some(0) {
            return Err(Pdf2MdError::InvalidConfig(
                "max upload size must be ≥ 1 byte".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Backend configuration ────────────────────────────────────────────────

/// Options understood by doc2json's GROBID client.
///
/// Field names serialise exactly as doc2json expects them, including its
/// `generateIDs` spelling. Missing keys in a config file fall back to the
/// defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// GROBID host name. Default: `localhost`.
    pub grobid_server: String,
    /// GROBID port (a string on the wire). Default: `8070`.
    pub grobid_port: String,
    /// Documents per GROBID batch. Default: 1000.
    pub batch_size: u32,
    /// Seconds to wait when GROBID answers 503. Default: 5.
    pub sleep_time: u64,
    /// GROBID request timeout in seconds. Default: 60.
    pub timeout: u64,
    #[serde(rename = "generateIDs")]
    pub generate_ids: bool,
    pub consolidate_header: bool,
    pub consolidate_citations: bool,
    pub include_raw_citations: bool,
    pub include_raw_affiliations: bool,
    /// Parallel GROBID workers. Default: 2.
    pub max_workers: u32,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            grobid_server: "localhost".to_string(),
            grobid_port: "8070".to_string(),
            batch_size: 1000,
            sleep_time: 5,
            timeout: 60,
            generate_ids: false,
            consolidate_header: false,
            consolidate_citations: false,
            include_raw_citations: true,
            include_raw_affiliations: false,
            max_workers: 2,
        }
    }
}

impl BackendConfig {
    /// Load a backend configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, Pdf2MdError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| Pdf2MdError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&raw).map_err(|e| Pdf2MdError::ArtifactParse {
            path: path.to_path_buf(),
            source: e,
        })
    }
}
