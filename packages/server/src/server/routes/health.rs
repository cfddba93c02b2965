use axum::{extract::Extension, Json};
use serde::Serialize;

use crate::server::app::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model: String,
    pub catalog_entries: usize,
}

/// Health check endpoint
///
/// Liveness only: reports the configured model and catalog size without
/// calling the completion service.
pub async fn health_handler(Extension(state): Extension<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        model: state.deps.ai.model_name().to_string(),
        catalog_entries: state.deps.catalog.len(),
    })
}
