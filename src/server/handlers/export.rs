//! Export download handlers.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::export::ExportKind;

use super::super::state::AppState;
use super::error_response;

/// POST /api/export/:kind - download `png`, `svg` or `screenshot`.
///
/// Responds 204 when there is nothing to export yet.
pub async fn download(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
) -> Result<Response, (StatusCode, String)> {
    let kind: ExportKind = kind.parse().map_err(|e| (StatusCode::NOT_FOUND, e))?;

    let settings = state.store.snapshot();
    let graphic = state.scheduler.current();
    let exporter = state.exporter.clone();

    // Rasterization is CPU-bound
    let result = tokio::task::spawn_blocking(move || {
        exporter.export(kind, graphic.as_deref().map(|g| g.svg.as_str()), &settings)
    })
    .await
    .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, format!("Task error: {}", e)))?;

    match result {
        Ok(Some(artifact)) => Ok((
            [
                (header::CONTENT_TYPE, artifact.mime.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", artifact.filename),
                ),
            ],
            artifact.bytes,
        )
            .into_response()),
        Ok(None) => Ok(StatusCode::NO_CONTENT.into_response()),
        Err(e) => {
            tracing::error!(%kind, "Export failed: {}", e);
            Err(error_response(e))
        }
    }
}
