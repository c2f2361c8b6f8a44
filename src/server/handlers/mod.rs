//! HTTP handlers for the server.

pub mod export;
pub mod logo;
pub mod preview;
pub mod settings;

use axum::http::StatusCode;

use crate::error::QrStudioError;

/// Map a library error to the status and message sent to the browser.
pub(crate) fn error_response(e: QrStudioError) -> (StatusCode, String) {
    let status = match &e {
        QrStudioError::Decode(_) => StatusCode::UNPROCESSABLE_ENTITY,
        QrStudioError::InvalidSettings(_) | QrStudioError::Logo(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, e.to_string())
}
