//! Logo upload handlers.

use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
};
use std::sync::Arc;

use crate::{
    logo,
    settings::{Settings, SettingsPatch},
};

use super::super::state::AppState;
use super::error_response;

/// POST /api/settings/logo - upload a logo image (multipart field `logo`).
pub async fn upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<Settings>, (StatusCode, String)> {
    let mut upload: Option<(Vec<u8>, String)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("Multipart error: {}", e)))?
    {
        if field.name() != Some("logo") {
            continue;
        }
        let mime = match (field.content_type(), field.file_name()) {
            (Some(ct), _) if ct != "application/octet-stream" => ct.to_string(),
            (_, Some(name)) => mime_guess::from_path(name).first_or_octet_stream().to_string(),
            _ => "application/octet-stream".to_string(),
        };
        let bytes = field
            .bytes()
            .await
            .map_err(|e| (StatusCode::BAD_REQUEST, format!("Failed to read logo: {}", e)))?;
        upload = Some((bytes.to_vec(), mime));
        break;
    }

    let (bytes, mime) = upload.ok_or((StatusCode::BAD_REQUEST, "No logo field found".to_string()))?;
    let uri = logo::from_bytes(&bytes, &mime).map_err(error_response)?;
    tracing::info!(%mime, bytes = bytes.len(), "logo uploaded");

    Ok(Json(state.store.update(SettingsPatch {
        logo: Some(Some(uri)),
        ..Default::default()
    })))
}

/// DELETE /api/settings/logo - remove the logo.
pub async fn remove(State(state): State<Arc<AppState>>) -> Json<Settings> {
    Json(state.store.update(SettingsPatch {
        logo: Some(None),
        ..Default::default()
    }))
}
