//! # Customization Settings
//!
//! The single record describing how the QR code should look. Every surface
//! (CLI flags, the HTTP API, settings files) produces a [`Settings`] value or
//! a [`SettingsPatch`] merged into one.
//!
//! ## Ranges
//!
//! | Field | Range |
//! |-------|-------|
//! | `size` | 200..=500 px |
//! | `margin` | 0..=20 px |
//! | `logo_size` | 10..=50 % of the QR width |
//! | `logo_opacity` | 30..=100 % |
//! | `label_size` | 10..=48 px |
//! | `label_text` | at most 12 wrapped lines |
//!
//! Values outside these ranges are clamped by [`Settings::normalized`], which
//! the store applies after every mutation.

mod patch;

pub use patch::SettingsPatch;

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::Path;

use crate::error::QrStudioError;
use crate::label;

pub const SIZE_RANGE: RangeInclusive<u32> = 200..=500;
pub const MARGIN_RANGE: RangeInclusive<u32> = 0..=20;
pub const LOGO_SIZE_RANGE: RangeInclusive<u8> = 10..=50;
pub const LOGO_OPACITY_RANGE: RangeInclusive<u8> = 30..=100;
pub const LABEL_SIZE_RANGE: RangeInclusive<u32> = 10..=48;

/// Generates `ALL`, `name()`, `Display` and `FromStr` for a keyword enum.
///
/// The keywords must match the serde representation of the enum.
macro_rules! keyword_enum {
    ($ty:ident { $($variant:ident => $name:literal $(| $alias:literal)*),+ $(,)? }) => {
        impl $ty {
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            /// Keyword used in JSON, CLI flags and the HTTP API.
            pub fn name(self) -> &'static str {
                match self {
                    $($ty::$variant => $name),+
                }
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.name())
            }
        }

        impl std::str::FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_ascii_lowercase().as_str() {
                    $($name $(| $alias)* => Ok($ty::$variant),)+
                    _ => Err(format!(
                        "unknown {} '{}' (expected one of: {})",
                        stringify!($ty),
                        s,
                        $ty::ALL.iter().map(|v| v.name()).collect::<Vec<_>>().join(", ")
                    )),
                }
            }
        }
    };
}

// ============================================================================
// KEYWORD ENUMS
// ============================================================================

/// What kind of data the user entered. Decides the payload prefix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    #[default]
    Url,
    Text,
    Email,
    Phone,
}

keyword_enum!(ContentType {
    Url => "url",
    Text => "text",
    Email => "email",
    Phone => "phone",
});

impl ContentType {
    /// URI scheme prepended to the raw data before encoding.
    pub fn prefix(self) -> &'static str {
        match self {
            ContentType::Email => "mailto:",
            ContentType::Phone => "tel:",
            ContentType::Url | ContentType::Text => "",
        }
    }
}

/// QR error correction level, passed through to the encoder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCorrection {
    /// ~7% recovery
    L,
    /// ~15% recovery
    #[default]
    M,
    /// ~25% recovery
    Q,
    /// ~30% recovery
    H,
}

keyword_enum!(ErrorCorrection {
    L => "l" | "low",
    M => "m" | "medium",
    Q => "q" | "quartile",
    H => "h" | "high",
});

impl ErrorCorrection {
    pub fn to_qrcode(self) -> qrcode::EcLevel {
        match self {
            ErrorCorrection::L => qrcode::EcLevel::L,
            ErrorCorrection::M => qrcode::EcLevel::M,
            ErrorCorrection::Q => qrcode::EcLevel::Q,
            ErrorCorrection::H => qrcode::EcLevel::H,
        }
    }
}

/// Visual style of the modules and corner locators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DotStyle {
    #[default]
    Square,
    Rounded,
    Circle,
    Sharp,
}

keyword_enum!(DotStyle {
    Square => "square",
    Rounded => "rounded",
    Circle => "circle",
    Sharp => "sharp",
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelFont {
    #[default]
    #[serde(alias = "inter")]
    Sans,
    Serif,
    Mono,
}

keyword_enum!(LabelFont {
    Sans => "sans" | "inter",
    Serif => "serif",
    Mono => "mono",
});

impl LabelFont {
    /// CSS `font-family` list.
    pub fn css_family(self) -> &'static str {
        match self {
            LabelFont::Sans => "Inter, Helvetica, Arial, sans-serif",
            LabelFont::Serif => "Georgia, 'Times New Roman', serif",
            LabelFont::Mono => "'JetBrains Mono', 'Courier New', monospace",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelAlignment {
    Left,
    #[default]
    Center,
    Right,
}

keyword_enum!(LabelAlignment {
    Left => "left",
    Center => "center",
    Right => "right",
});

impl LabelAlignment {
    /// SVG `text-anchor` value.
    pub fn text_anchor(self) -> &'static str {
        match self {
            LabelAlignment::Left => "start",
            LabelAlignment::Center => "middle",
            LabelAlignment::Right => "end",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelWeight {
    #[default]
    Normal,
    Semibold,
    Bold,
}

keyword_enum!(LabelWeight {
    Normal => "normal",
    Semibold => "semibold",
    Bold => "bold",
});

impl LabelWeight {
    /// Numeric CSS `font-weight`.
    pub fn css_weight(self) -> u16 {
        match self {
            LabelWeight::Normal => 400,
            LabelWeight::Semibold => 600,
            LabelWeight::Bold => 700,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientType {
    #[default]
    Linear,
    Radial,
}

keyword_enum!(GradientType {
    Linear => "linear",
    Radial => "radial",
});

/// Decorative pattern drawn behind the preview frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundPattern {
    #[default]
    None,
    Dots,
    Grid,
    Diagonal,
}

keyword_enum!(BackgroundPattern {
    None => "none",
    Dots => "dots",
    Grid => "grid",
    Diagonal => "diagonal",
});

// ============================================================================
// SETTINGS
// ============================================================================

/// The complete customization state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub content_type: ContentType,
    /// Raw user input. Empty means "no QR code yet".
    pub data: String,
    pub foreground_color: String,
    pub background_color: String,
    pub size: u32,
    pub margin: u32,
    pub error_correction_level: ErrorCorrection,
    pub dot_style: DotStyle,
    /// Embedded logo as a `data:` URI.
    pub logo: Option<String>,
    pub logo_size: u8,
    pub logo_opacity: u8,
    pub label_text: String,
    pub label_color: String,
    pub label_size: u32,
    pub label_font: LabelFont,
    pub label_alignment: LabelAlignment,
    pub label_weight: LabelWeight,
    pub gradient_enabled: bool,
    pub gradient_start: String,
    pub gradient_end: String,
    pub gradient_type: GradientType,
    pub background_pattern: BackgroundPattern,
    pub glow_effect: bool,
    pub outline_color: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            content_type: ContentType::Url,
            data: String::new(),
            foreground_color: "#2F1B23".into(),
            background_color: "#DCB39A".into(),
            size: 300,
            margin: 4,
            error_correction_level: ErrorCorrection::M,
            dot_style: DotStyle::Square,
            logo: None,
            logo_size: 25,
            logo_opacity: 100,
            label_text: String::new(),
            label_color: "#2F1B23".into(),
            label_size: 16,
            label_font: LabelFont::Sans,
            label_alignment: LabelAlignment::Center,
            label_weight: LabelWeight::Normal,
            gradient_enabled: false,
            gradient_start: "#764A4D".into(),
            gradient_end: "#C69390".into(),
            gradient_type: GradientType::Linear,
            background_pattern: BackgroundPattern::None,
            glow_effect: false,
            outline_color: "#CEB2B7".into(),
        }
    }
}

/// Label styling extracted from [`Settings`].
#[derive(Debug, Clone, PartialEq)]
pub struct LabelStyle {
    pub color: String,
    pub font_size: u32,
    pub font: LabelFont,
    pub alignment: LabelAlignment,
    pub weight: LabelWeight,
}

impl Settings {
    /// Load settings from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, QrStudioError> {
        let contents = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&contents)
            .map_err(|e| QrStudioError::InvalidSettings(format!("{}: {}", path.display(), e)))?;
        Ok(settings.normalized())
    }

    /// Clamp every ranged field into its valid range.
    pub fn normalized(mut self) -> Self {
        self.size = self.size.clamp(*SIZE_RANGE.start(), *SIZE_RANGE.end());
        self.margin = self.margin.clamp(*MARGIN_RANGE.start(), *MARGIN_RANGE.end());
        self.logo_size = self
            .logo_size
            .clamp(*LOGO_SIZE_RANGE.start(), *LOGO_SIZE_RANGE.end());
        self.logo_opacity = self
            .logo_opacity
            .clamp(*LOGO_OPACITY_RANGE.start(), *LOGO_OPACITY_RANGE.end());
        self.label_size = self
            .label_size
            .clamp(*LABEL_SIZE_RANGE.start(), *LABEL_SIZE_RANGE.end());
        let kept = label::truncate(&self.label_text).len();
        self.label_text.truncate(kept);
        self
    }

    /// True when there is something to encode.
    pub fn has_data(&self) -> bool {
        !self.data.is_empty()
    }

    /// The string handed to the QR encoder: `data` with the content-type prefix.
    pub fn payload(&self) -> String {
        format!("{}{}", self.content_type.prefix(), self.data)
    }

    pub fn label_style(&self) -> LabelStyle {
        LabelStyle {
            color: self.label_color.clone(),
            font_size: self.label_size,
            font: self.label_font,
            alignment: self.label_alignment,
            weight: self.label_weight,
        }
    }
}
