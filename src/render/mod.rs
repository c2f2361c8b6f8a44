//! # QR Rendering
//!
//! Turns [`Settings`] into styled SVG markup.
//!
//! ## Pipeline
//!
//! ```text
//! Settings ──► RenderOptions::from_settings ──► impl Render ──► RenderedQr (SVG)
//!                  │                                  ▲
//!                  │ payload prefix, shape tokens,    │ matrix cached by
//!                  │ fill, logo                       │ (payload, ec level)
//! ```
//!
//! ## Modules
//!
//! - [`matrix`]: QR module matrix via the `qrcode` crate
//! - [`shapes`]: SVG path builders for dots and corner locators
//! - [`styled`]: the long-lived [`StyledRenderer`]
//! - [`debounce`]: cancelable deferred tasks
//! - [`scheduler`]: debounced re-render on settings changes

pub mod debounce;
pub mod matrix;
pub mod scheduler;
pub mod shapes;
pub mod styled;

pub use scheduler::RenderScheduler;
pub use styled::StyledRenderer;

use crate::error::QrStudioError;
use crate::settings::{DotStyle, ErrorCorrection, GradientType, Settings};

/// Shape drawn for each data module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DotShape {
    Square,
    /// Corners rounded where the module has no neighbor.
    Rounded,
    /// Isolated circles.
    Dots,
    /// Opposite corners rounded, the others kept sharp.
    Classy,
}

/// Shape of the 7×7 outer ring of each finder pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CornerSquareShape {
    Square,
    ExtraRounded,
    Dot,
}

/// Shape of the 3×3 center of each finder pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CornerDotShape {
    Square,
    Dot,
}

/// Shape tokens for every part of the symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeSet {
    pub dots: DotShape,
    pub corner_squares: CornerSquareShape,
    pub corner_dots: CornerDotShape,
}

impl ShapeSet {
    pub fn for_style(style: DotStyle) -> Self {
        match style {
            DotStyle::Square => Self {
                dots: DotShape::Square,
                corner_squares: CornerSquareShape::Square,
                corner_dots: CornerDotShape::Square,
            },
            DotStyle::Rounded => Self {
                dots: DotShape::Rounded,
                corner_squares: CornerSquareShape::ExtraRounded,
                corner_dots: CornerDotShape::Dot,
            },
            DotStyle::Circle => Self {
                dots: DotShape::Dots,
                corner_squares: CornerSquareShape::Dot,
                corner_dots: CornerDotShape::Dot,
            },
            DotStyle::Sharp => Self {
                dots: DotShape::Classy,
                corner_squares: CornerSquareShape::Square,
                corner_dots: CornerDotShape::Square,
            },
        }
    }
}

/// How dark modules are painted.
#[derive(Debug, Clone, PartialEq)]
pub enum Fill {
    Solid(String),
    Gradient {
        kind: GradientType,
        start: String,
        end: String,
    },
}

/// Logo embedded in the middle of the symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct LogoOptions {
    /// `data:` URI of the image.
    pub href: String,
    /// Percent of the QR width, 10..=50.
    pub size_percent: u8,
    /// Percent opacity, 30..=100.
    pub opacity_percent: u8,
    /// Gap kept free of dots around the logo, in pixels.
    pub margin: u32,
}

/// Everything the styled renderer needs, derived from [`Settings`].
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Encoded string, already prefixed for the content type.
    pub payload: String,
    pub size: u32,
    pub margin: u32,
    pub error_correction: ErrorCorrection,
    pub shapes: ShapeSet,
    pub fill: Fill,
    /// Corner locators are always painted solid.
    pub corner_color: String,
    pub background: String,
    pub logo: Option<LogoOptions>,
}

impl RenderOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        let fill = if settings.gradient_enabled {
            Fill::Gradient {
                kind: settings.gradient_type,
                start: settings.gradient_start.clone(),
                end: settings.gradient_end.clone(),
            }
        } else {
            Fill::Solid(settings.foreground_color.clone())
        };

        let logo = settings.logo.as_ref().map(|href| LogoOptions {
            href: href.clone(),
            size_percent: settings.logo_size,
            opacity_percent: settings.logo_opacity,
            margin: 5,
        });

        Self {
            payload: settings.payload(),
            size: settings.size,
            margin: settings.margin,
            error_correction: settings.error_correction_level,
            shapes: ShapeSet::for_style(settings.dot_style),
            fill,
            corner_color: settings.foreground_color.clone(),
            background: settings.background_color.clone(),
            logo,
        }
    }
}

/// A rendered QR graphic. Never mutated; replaced wholesale on every render.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedQr {
    pub svg: String,
    pub width: u32,
    pub height: u32,
    /// The payload this graphic encodes.
    pub payload: String,
}

/// Anything that turns render options into an SVG graphic.
///
/// Implementations are long-lived and updated in place, so they may cache
/// work between calls.
pub trait Render: Send {
    fn render(&mut self, options: &RenderOptions) -> Result<RenderedQr, QrStudioError>;
}
