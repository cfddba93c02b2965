//! Application setup and server configuration.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{DefaultBodyLimit, Extension},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::kernel::ServerDeps;
use crate::server::routes::{analyze_handler, health_handler, index_handler};
use crate::server::static_files::serve_static;

/// Largest accepted upload, multipart framing included.
pub const MAX_UPLOAD_BYTES: usize = 2 * 1024 * 1024;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub deps: Arc<ServerDeps>,
}

/// Build the Axum application router
///
/// `request_timeout` bounds a whole request; it should cover both completion
/// calls of an analysis.
pub fn build_app(deps: ServerDeps, request_timeout: Duration) -> Router {
    let app_state = AppState {
        deps: Arc::new(deps),
    };

    Router::new()
        .route("/", get(index_handler))
        .route("/analyze", post(analyze_handler))
        .route("/static/*path", get(serve_static))
        .route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(Extension(app_state))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(TraceLayer::new_for_http())
}
