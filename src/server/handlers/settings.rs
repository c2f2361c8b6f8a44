//! Settings API handlers.

use axum::{Json, extract::State};
use std::sync::Arc;

use crate::settings::{Settings, SettingsPatch};

use super::super::state::AppState;

/// GET /api/settings - current settings.
pub async fn get(State(state): State<Arc<AppState>>) -> Json<Settings> {
    Json(state.store.snapshot())
}

/// PATCH /api/settings - merge a partial update.
pub async fn update(State(state): State<Arc<AppState>>, Json(patch): Json<SettingsPatch>) -> Json<Settings> {
    if patch.is_empty() {
        return Json(state.store.snapshot());
    }
    Json(state.store.update(patch))
}

/// POST /api/settings/reset - back to defaults.
pub async fn reset(State(state): State<Arc<AppState>>) -> Json<Settings> {
    Json(state.store.reset())
}
