//! PDF Optimizer Service
//!
//! An HTTP service that accepts uploaded PDF files, shrinks each one with an
//! external Ghostscript invocation, and returns either the optimized PDF or a
//! zip archive of the batch. All per-request temporary state lives in a
//! uniquely named working directory that is removed when the request finishes.

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::{AppError, AppResult};

use handlers::{fallback_handler, index_handler, optimize_handler};
use middleware::logging_middleware;

/// Build the application router. Shared by `main` and the test harness so
/// tests exercise the exact routing and middleware the binary serves.
pub fn app(config: Arc<Config>) -> Router {
    let body_limit = config.max_upload_size_mb * 1024 * 1024;

    Router::new()
        .route("/", get(index_handler).post(optimize_handler))
        .fallback(fallback_handler)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(axum::middleware::from_fn(logging_middleware))
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(config)
}
