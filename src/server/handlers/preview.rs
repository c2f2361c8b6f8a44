//! Preview handlers.

use axum::{
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::preview;

use super::super::state::AppState;

const SVG_MIME: &str = "image/svg+xml";

/// GET /api/preview - the composed preview panel.
pub async fn panel(State(state): State<Arc<AppState>>) -> Response {
    let settings = state.store.snapshot();
    let graphic = state.scheduler.current();
    let svg = preview::compose(graphic.as_deref(), &settings);
    (
        [(header::CONTENT_TYPE, SVG_MIME), (header::CACHE_CONTROL, "no-store")],
        svg,
    )
        .into_response()
}

/// GET /api/qr.svg - the bare rendered graphic, 204 while there is none.
pub async fn graphic(State(state): State<Arc<AppState>>) -> Response {
    match state.scheduler.current() {
        Some(qr) => (
            [(header::CONTENT_TYPE, SVG_MIME), (header::CACHE_CONTROL, "no-store")],
            qr.svg.clone(),
        )
            .into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}
