//! QR module matrix.
//!
//! Error correction and masking are the `qrcode` crate's job; this module
//! only flattens its output into a grid of dark/light modules.

use qrcode::{Color, QrCode};

use crate::error::QrStudioError;
use crate::settings::ErrorCorrection;

/// Side length of a finder pattern in modules.
pub const FINDER_SIZE: usize = 7;

/// A square grid of modules. `true` = dark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrMatrix {
    width: usize,
    modules: Vec<bool>,
}

impl QrMatrix {
    /// Encode `payload` as bytes at the given error correction level.
    pub fn encode(payload: &str, level: ErrorCorrection) -> Result<Self, QrStudioError> {
        let code = QrCode::with_error_correction_level(payload.as_bytes(), level.to_qrcode())
            .map_err(|e| QrStudioError::Encode(format!("Failed to encode payload: {}", e)))?;

        let width = code.width();
        let modules = code
            .to_colors()
            .into_iter()
            .map(|c| c == Color::Dark)
            .collect();

        Ok(Self { width, modules })
    }

    /// Build a matrix from raw rows (used by tests and tools).
    pub fn from_rows(rows: &[&[bool]]) -> Self {
        let width = rows.len();
        let modules = rows.iter().flat_map(|r| r.iter().copied()).collect();
        Self { width, modules }
    }

    /// Number of modules per side.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Whether the module at `(x, y)` is dark. Out of range reads as light.
    pub fn is_dark(&self, x: isize, y: isize) -> bool {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.width {
            return false;
        }
        self.modules[y as usize * self.width + x as usize]
    }

    /// Whether `(x, y)` belongs to one of the three finder patterns.
    pub fn in_finder(&self, x: usize, y: usize) -> bool {
        let far = self.width.saturating_sub(FINDER_SIZE);
        (x < FINDER_SIZE && y < FINDER_SIZE)
            || (x >= far && y < FINDER_SIZE)
            || (x < FINDER_SIZE && y >= far)
    }

    /// Top-left module coordinates of the three finder patterns.
    pub fn finder_origins(&self) -> [(usize, usize); 3] {
        let far = self.width.saturating_sub(FINDER_SIZE);
        [(0, 0), (far, 0), (0, far)]
    }
}
