//! Embedded frontend page.

use axum::response::{Html, IntoResponse};

static INDEX_HTML: &str = include_str!("index.html");

/// Serve the single-page editor.
pub async fn index_handler() -> impl IntoResponse {
    Html(INDEX_HTML)
}
