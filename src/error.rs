//! # Error Types
//!
//! This module defines error types used throughout the qrstudio library.

use thiserror::Error;

/// Main error type for qrstudio operations
#[derive(Debug, Error)]
pub enum QrStudioError {
    /// The payload could not be encoded as a QR matrix (e.g. too long)
    #[error("Encode error: {0}")]
    Encode(String),

    /// Settings could not be parsed or applied
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    /// SVG markup could not be decoded for rasterization
    #[error("Decode error: {0}")]
    Decode(String),

    /// Raster surface or PNG encoding error
    #[error("Image error: {0}")]
    Image(String),

    /// Rejected logo upload
    #[error("Logo error: {0}")]
    Logo(String),

    /// Clipboard write failed
    #[error("Clipboard error: {0}")]
    Clipboard(String),

    /// Server-level errors (bind, serve)
    #[error("Transport error: {0}")]
    Transport(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
