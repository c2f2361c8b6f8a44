//! # Export pipeline
//!
//! Turns the current graphic plus settings into a downloadable file.
//!
//! | Kind         | File                       | Route                             |
//! |--------------|----------------------------|-----------------------------------|
//! | `png`        | `qr-code.png`              | [`raster`], scale 1, white page   |
//! | `svg`        | `qr-code.svg`              | [`vector`], label as `<text>`     |
//! | `screenshot` | `qr-code-screenshot.png`   | [`raster`], scale 2, card look    |
//!
//! Every export is a no-op (`Ok(None)`) when there is no data or no graphic.

pub mod blob;
pub mod fonts;
pub mod raster;
pub mod vector;

use std::fmt;
use std::str::FromStr;

pub use blob::{BlobStore, BlobUrl};
pub use raster::{RasterLayout, RasterStyle};

use crate::error::QrStudioError;
use crate::label::LabelLayout;
use crate::settings::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportKind {
    Png,
    Svg,
    Screenshot,
}

impl ExportKind {
    pub const ALL: &'static [ExportKind] = &[ExportKind::Png, ExportKind::Svg, ExportKind::Screenshot];

    pub fn name(self) -> &'static str {
        match self {
            ExportKind::Png => "png",
            ExportKind::Svg => "svg",
            ExportKind::Screenshot => "screenshot",
        }
    }

    pub fn filename(self) -> &'static str {
        match self {
            ExportKind::Png => "qr-code.png",
            ExportKind::Svg => "qr-code.svg",
            ExportKind::Screenshot => "qr-code-screenshot.png",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            ExportKind::Png | ExportKind::Screenshot => "image/png",
            ExportKind::Svg => "image/svg+xml",
        }
    }
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(ExportKind::Png),
            "svg" => Ok(ExportKind::Svg),
            "screenshot" => Ok(ExportKind::Screenshot),
            _ => Err(format!("Unknown export kind '{}'. Expected png, svg or screenshot", s)),
        }
    }
}

/// A finished export, ready to be written or downloaded.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportArtifact {
    pub kind: ExportKind,
    pub filename: &'static str,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    fn new(kind: ExportKind, bytes: Vec<u8>) -> Self {
        Self {
            kind,
            filename: kind.filename(),
            mime: kind.mime(),
            bytes,
        }
    }
}

/// Runs exports. Owns the blob store raster exports decode through.
#[derive(Debug, Clone, Default)]
pub struct Exporter {
    blobs: BlobStore,
}

impl Exporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blobs(&self) -> &BlobStore {
        &self.blobs
    }

    /// Export `graphic` (SVG markup of the current QR) as `kind`.
    ///
    /// Returns `Ok(None)` without doing anything when `settings.data` is
    /// empty or there is no graphic.
    pub fn export(
        &self,
        kind: ExportKind,
        graphic: Option<&str>,
        settings: &Settings,
    ) -> Result<Option<ExportArtifact>, QrStudioError> {
        let graphic = match graphic {
            Some(g) if settings.has_data() => g,
            _ => {
                tracing::debug!(%kind, "nothing to export");
                return Ok(None);
            }
        };

        let label = LabelLayout::new(&settings.label_text, settings.label_style());
        let bytes = match kind {
            ExportKind::Png => raster::rasterize(graphic, &label, &RasterStyle::png(), &self.blobs)?,
            ExportKind::Screenshot => raster::rasterize(
                graphic,
                &label,
                &RasterStyle::screenshot(&settings.background_color),
                &self.blobs,
            )?,
            ExportKind::Svg => vector::with_label(graphic, &label)?.into_bytes(),
        };

        tracing::info!(%kind, bytes = bytes.len(), "exported {}", kind.filename());
        Ok(Some(ExportArtifact::new(kind, bytes)))
    }

    pub fn export_png(&self, graphic: Option<&str>, settings: &Settings) -> Result<Option<ExportArtifact>, QrStudioError> {
        self.export(ExportKind::Png, graphic, settings)
    }

    pub fn export_svg(&self, graphic: Option<&str>, settings: &Settings) -> Result<Option<ExportArtifact>, QrStudioError> {
        self.export(ExportKind::Svg, graphic, settings)
    }

    pub fn export_screenshot(
        &self,
        graphic: Option<&str>,
        settings: &Settings,
    ) -> Result<Option<ExportArtifact>, QrStudioError> {
        self.export(ExportKind::Screenshot, graphic, settings)
    }
}
