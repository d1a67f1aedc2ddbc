//! HTTP surface: `POST /process_pdf` and `GET /process_pdf_url`.
//!
//! ```text
//! upload ─┐
//!         ├─▶ bytes in memory ─▶ parse adapter ─▶ converter ─▶ {message, parsed_json}
//! URL ────┘
//! ```
//!
//! Handlers are stateless functions over [`AppState`], which only holds the
//! immutable configuration, the converter and a shared download client.

pub mod error;
pub mod handlers;

use crate::config::ServiceConfig;
use crate::converter::DocumentConverter;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

pub use error::{AppError, ErrorBody, UPLOAD_TOO_LARGE};
pub use handlers::{ProcessResponse, UPLOAD_OK, URL_OK};

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServiceConfig>,
    pub converter: Arc<dyn DocumentConverter>,
    /// Client for `/process_pdf_url` downloads; cloning shares its pool.
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: ServiceConfig, converter: Arc<dyn DocumentConverter>) -> Self {
        Self {
            config: Arc::new(config),
            converter,
            http: reqwest::Client::new(),
        }
    }
}

/// Build the application router.
///
/// Uploads are unbounded unless `max_upload_bytes` is set. Debug mode adds
/// per-request tracing.
pub fn router(state: AppState) -> Router {
    let body_limit = match state.config.max_upload_bytes {
        Some(max) => DefaultBodyLimit::max(max),
        None => DefaultBodyLimit::disable(),
    };

    let app = Router::new()
        .route("/process_pdf", post(handlers::process_pdf))
        .route("/process_pdf_url", get(handlers::process_pdf_url))
        .layer(body_limit);

    let app = if state.config.debug {
        app.layer(TraceLayer::new_for_http())
    } else {
        app
    };

    app.with_state(state)
}

/// Serve the application on an already-bound listener until the process exits.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    info!("Listening on http://{}", listener.local_addr()?);
    if state.config.debug {
        info!("Debug mode is on; do not expose this instance publicly");
    }
    axum::serve(listener, router(state)).await
}
