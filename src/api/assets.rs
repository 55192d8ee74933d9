//! Embedded chat page assets
//!
//! Debug builds read `ui/` from disk on each request; release builds embed it.

use axum::{
    extract::Path,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use rust_embed::Embed;

#[derive(Embed)]
#[folder = "ui"]
struct Assets;

/// Serve an embedded static file
pub async fn serve_static(Path(path): Path<String>) -> Response {
    match Assets::get(&path) {
        Some(content) => {
            let mime = mime_guess::from_path(&path).first_or_octet_stream();
            (
                [(header::CONTENT_TYPE, mime.as_ref().to_string())],
                content.data.into_owned(),
            )
                .into_response()
        }
        None => (StatusCode::NOT_FOUND, "Not found").into_response(),
    }
}

/// Serve the chat page
pub async fn serve_index() -> Response {
    match Assets::get("index.html").and_then(|c| String::from_utf8(c.data.into_owned()).ok()) {
        Some(html) => Html(html).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Html("<h1>404 - chat page not found</h1>".to_string()),
        )
            .into_response(),
    }
}
