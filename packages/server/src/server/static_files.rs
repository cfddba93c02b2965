use axum::{
    extract::Path,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use rust_embed::RustEmbed;

// Stylesheet and other page assets, embedded at compile time
#[derive(RustEmbed)]
#[folder = "static/"]
pub struct StaticAssets;

/// Serve one embedded asset under `/static/`
pub async fn serve_static(Path(path): Path<String>) -> Response {
    let path = path.trim_start_matches('/');

    match StaticAssets::get(path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            ([(header::CONTENT_TYPE, mime.as_ref())], content.data).into_response()
        }
        None => (StatusCode::NOT_FOUND, "404 Not Found").into_response(),
    }
}
