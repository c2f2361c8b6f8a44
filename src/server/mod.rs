//! # HTTP Server for the QR Designer
//!
//! Serves the editor page and a small JSON API around one in-memory
//! settings session.
//!
//! ## Usage
//!
//! ```bash
//! qrstudio serve --listen 127.0.0.1:8080
//! ```
//!
//! Then open http://localhost:8080 in a browser.
//!
//! ## Routes
//!
//! | Method | Path | Result |
//! |--------|------|--------|
//! | GET | `/` | editor page |
//! | GET, PATCH | `/api/settings` | current settings / merge a patch |
//! | POST | `/api/settings/reset` | defaults |
//! | POST, DELETE | `/api/settings/logo` | upload (multipart `logo`) / remove |
//! | GET | `/api/preview` | composed preview SVG |
//! | GET | `/api/qr.svg` | bare graphic, 204 while none |
//! | POST | `/api/export/:kind` | download, 204 when nothing to export |

mod handlers;
mod state;
mod static_files;

pub use state::{AppState, ServerConfig};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::error::QrStudioError;
use crate::logo::MAX_LOGO_BYTES;

/// Build the router over shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Frontend
        .route("/", get(static_files::index_handler))
        // Settings API
        .route(
            "/api/settings",
            get(handlers::settings::get).patch(handlers::settings::update),
        )
        .route("/api/settings/reset", post(handlers::settings::reset))
        // Logo API (limit leaves room for multipart framing)
        .route(
            "/api/settings/logo",
            post(handlers::logo::upload)
                .delete(handlers::logo::remove)
                .layer(DefaultBodyLimit::max(MAX_LOGO_BYTES + 64 * 1024)),
        )
        // Preview API
        .route("/api/preview", get(handlers::preview::panel))
        .route("/api/qr.svg", get(handlers::preview::graphic))
        // Export API
        .route("/api/export/:kind", post(handlers::export::download))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
///
/// ## Example
///
/// ```no_run
/// use qrstudio::server::{serve, ServerConfig};
///
/// # async fn example() -> Result<(), qrstudio::error::QrStudioError> {
/// let config = ServerConfig {
///     listen_addr: "127.0.0.1:8080".to_string(),
///     ..Default::default()
/// };
///
/// serve(config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: ServerConfig) -> Result<(), QrStudioError> {
    let listen_addr = config.listen_addr.clone();
    let debounce = config.debounce;
    let app = router(Arc::new(AppState::new(config)));

    let listener = tokio::net::TcpListener::bind(&listen_addr)
        .await
        .map_err(|e| QrStudioError::Transport(format!("Failed to bind to {}: {}", listen_addr, e)))?;

    tracing::info!(
        addr = %listen_addr,
        debounce_ms = debounce.as_millis() as u64,
        "qrstudio server listening"
    );
    println!("Open http://{}/ in your browser", listen_addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| QrStudioError::Transport(format!("Server error: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use axum::response::Response;
    use pretty_assertions::assert_eq;
    use std::time::Duration;
    use tower::ServiceExt;

    fn app() -> (Router, Arc<AppState>) {
        let state = Arc::new(AppState::new(ServerConfig::default()));
        (router(state.clone()), state)
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> Response {
        let mut req = Request::builder().method(method).uri(uri);
        if body.is_some() {
            req = req.header(header::CONTENT_TYPE, "application/json");
        }
        let req = req
            .body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))
            .unwrap();
        app.clone().oneshot(req).await.unwrap()
    }

    async fn body_bytes(resp: Response) -> Vec<u8> {
        to_bytes(resp.into_body(), usize::MAX).await.unwrap().to_vec()
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_index_page() {
        let (app, _) = app();
        let resp = send(&app, "GET", "/", None).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let html = String::from_utf8(body_bytes(resp).await).unwrap();
        assert!(html.contains("/api/settings"));
        assert!(html.contains("id=\"copy-data\""));
    }

    #[tokio::test(start_paused = true)]
    async fn test_patch_merges_and_clamps() {
        let (app, _) = app();
        let resp = send(&app, "PATCH", "/api/settings", Some(r#"{"data":"hello","size":900}"#)).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let settings: Settings = serde_json::from_slice(&body_bytes(resp).await).unwrap();
        assert_eq!(settings.data, "hello");
        assert_eq!(settings.size, 500);
        assert_eq!(settings.margin, 4);

        let resp = send(&app, "POST", "/api/settings/reset", None).await;
        let settings: Settings = serde_json::from_slice(&body_bytes(resp).await).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_exports_are_no_ops_without_data() {
        let (app, state) = app();
        settle().await;
        for kind in ["png", "svg", "screenshot"] {
            let resp = send(&app, "POST", &format!("/api/export/{}", kind), None).await;
            assert_eq!(resp.status(), StatusCode::NO_CONTENT, "{}", kind);
        }
        assert_eq!(state.exporter.blobs().live(), 0);

        let resp = send(&app, "GET", "/api/qr.svg", None).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_export_kind() {
        let (app, _) = app();
        let resp = send(&app, "POST", "/api/export/gif", None).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test(start_paused = true)]
    async fn test_svg_export_after_render() {
        let (app, _) = app();
        send(&app, "PATCH", "/api/settings", Some(r#"{"data":"https://example.com","labelText":"Hi"}"#)).await;
        settle().await;

        let resp = send(&app, "POST", "/api/export/svg", None).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::CONTENT_DISPOSITION).unwrap(),
            "attachment; filename=\"qr-code.svg\""
        );
        assert_eq!(resp.headers().get(header::CONTENT_TYPE).unwrap(), "image/svg+xml");
        let svg = String::from_utf8(body_bytes(resp).await).unwrap();
        // 300 + 1 * (16 + 8) + 24
        assert!(svg.contains("height=\"348\""));
        assert!(svg.contains(">Hi</text>"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_png_export_after_render() {
        let (app, state) = app();
        send(&app, "PATCH", "/api/settings", Some(r#"{"data":"hello"}"#)).await;
        settle().await;

        let resp = send(&app, "POST", "/api/export/png", None).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let png = body_bytes(resp).await;
        let img = image::load_from_memory(&png).unwrap();
        assert_eq!((img.width(), img.height()), (364, 348));
        assert_eq!(state.exporter.blobs().live(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_preview_placeholder_then_graphic() {
        let (app, _) = app();
        let resp = send(&app, "GET", "/api/preview", None).await;
        let svg = String::from_utf8(body_bytes(resp).await).unwrap();
        assert!(svg.contains("Enter data to generate"));

        send(&app, "PATCH", "/api/settings", Some(r#"{"data":"hello"}"#)).await;
        settle().await;
        let resp = send(&app, "GET", "/api/preview", None).await;
        assert_eq!(resp.headers().get(header::CONTENT_TYPE).unwrap(), "image/svg+xml");
        let svg = String::from_utf8(body_bytes(resp).await).unwrap();
        assert!(svg.contains("<image href=\"data:image/svg+xml;base64,"));
    }

    fn multipart(field: &str, filename: &str, mime: &str, bytes: &[u8]) -> Request<Body> {
        let boundary = "qrstudio-test-boundary";
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{b}\r\nContent-Disposition: form-data; name=\"{f}\"; filename=\"{n}\"\r\nContent-Type: {m}\r\n\r\n",
                b = boundary,
                f = field,
                n = filename,
                m = mime
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/settings/logo")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", boundary),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_logo_upload_and_remove() {
        let (app, state) = app();
        let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" width="8" height="8"><rect width="8" height="8"/></svg>"#;
        let resp = app
            .clone()
            .oneshot(multipart("logo", "logo.svg", "image/svg+xml", svg))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let logo = state.store.snapshot().logo.unwrap();
        assert!(logo.starts_with("data:image/svg+xml;base64,"));

        let resp = send(&app, "DELETE", "/api/settings/logo", None).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(state.store.snapshot().logo, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_logo_upload_rejects_non_images() {
        let (app, state) = app();
        let resp = app
            .clone()
            .oneshot(multipart("logo", "notes.txt", "text/plain", b"hello"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(state.store.snapshot().logo, None);

        let resp = app
            .clone()
            .oneshot(multipart("image", "logo.png", "image/png", b"x"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
