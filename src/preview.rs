//! Live preview composition.
//!
//! The preview wraps the rendered graphic in a frame painted with the QR
//! background color, then layers the decorative options on top:
//!
//! ```text
//! [glow room]
//!   ┌ frame (16px, backgroundColor) ─────────┐
//!   │ pattern overlay (dots / grid / diagonal)│
//!   │   ┌ graphic (data URI image) ┐         │
//!   │   └──────────────────────────┘         │
//!   └ outline (2px, outlineColor) ───────────┘
//!   label (wrapped, aligned)
//! ```
//!
//! Decorations only affect the preview; exports use the bare graphic.

use crate::label::LabelLayout;
use crate::render::RenderedQr;
use crate::settings::{BackgroundPattern, LabelAlignment, Settings};
use crate::svg::{SVG_NS, data_uri, escape_attr, escape_text, fmt_num};

/// Padding between the frame edge and the graphic.
pub const FRAME_PADDING: u32 = 16;
/// Room left around the frame so the glow is not clipped.
pub const GLOW_ROOM: u32 = 24;
pub const OUTLINE_WIDTH: u32 = 2;

pub const PLACEHOLDER_SIZE: u32 = 320;
pub const PLACEHOLDER_TEXT: [&str; 2] = ["Enter data to generate", "your QR code"];

/// Compose the preview document for the current state.
///
/// Without data the placeholder is shown. With data but no graphic yet
/// (a render is pending) the frame is drawn empty.
pub fn compose(graphic: Option<&RenderedQr>, settings: &Settings) -> String {
    if !settings.has_data() {
        return placeholder();
    }

    let (qr_w, qr_h) = graphic.map_or((settings.size, settings.size), |g| (g.width, g.height));
    let room = if settings.glow_effect { GLOW_ROOM } else { 0 };
    let frame_w = qr_w + 2 * FRAME_PADDING;
    let frame_h = qr_h + 2 * FRAME_PADDING;

    let label = LabelLayout::new(&settings.label_text, settings.label_style());
    let width = frame_w + 2 * room;
    let height = frame_h + label.height() + 2 * room;

    let mut svg = format!(
        "<svg xmlns=\"{ns}\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">",
        ns = SVG_NS,
        w = width,
        h = height
    );

    let mut defs = String::new();
    if settings.glow_effect {
        defs.push_str(&glow_filter(&settings.foreground_color));
    }
    if let Some(pattern) = pattern_def(settings.background_pattern, &settings.foreground_color) {
        defs.push_str(&pattern);
    }
    if !defs.is_empty() {
        svg.push_str("<defs>");
        svg.push_str(&defs);
        svg.push_str("</defs>");
    }

    let frame_attrs = format!(
        "x=\"{r}\" y=\"{r}\" width=\"{w}\" height=\"{h}\"",
        r = room,
        w = frame_w,
        h = frame_h
    );
    svg.push_str(&format!(
        "<rect {} fill=\"{}\"{}/>",
        frame_attrs,
        escape_attr(&settings.background_color),
        if settings.glow_effect { " filter=\"url(#glow)\"" } else { "" }
    ));
    if settings.background_pattern != BackgroundPattern::None {
        svg.push_str(&format!("<rect {} fill=\"url(#bg-pattern)\"/>", frame_attrs));
    }

    if let Some(graphic) = graphic {
        svg.push_str(&format!(
            "<image href=\"{}\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"/>",
            data_uri("image/svg+xml", graphic.svg.as_bytes()),
            room + FRAME_PADDING,
            room + FRAME_PADDING,
            graphic.width,
            graphic.height
        ));
    }

    let half = OUTLINE_WIDTH as f64 / 2.0;
    svg.push_str(&format!(
        "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"/>",
        fmt_num(room as f64 + half),
        fmt_num(room as f64 + half),
        fmt_num(frame_w as f64 - 2.0 * half),
        fmt_num(frame_h as f64 - 2.0 * half),
        escape_attr(&settings.outline_color),
        OUTLINE_WIDTH
    ));

    if !label.is_empty() {
        let left = room as f64;
        let anchor_x = match settings.label_alignment {
            LabelAlignment::Left => left,
            LabelAlignment::Center => left + frame_w as f64 / 2.0,
            LabelAlignment::Right => left + frame_w as f64,
        };
        svg.push_str(&label.svg_text_elements(
            anchor_x,
            (room + frame_h) as f64,
            settings.label_alignment,
        ));
    }

    svg.push_str("</svg>");
    svg
}

/// The empty-state panel: a dashed box asking for input.
pub fn placeholder() -> String {
    let s = PLACEHOLDER_SIZE as f64;
    let mut svg = format!(
        concat!(
            "<svg xmlns=\"{ns}\" width=\"{s}\" height=\"{s}\" viewBox=\"0 0 {s} {s}\">",
            "<rect x=\"1\" y=\"1\" width=\"{inner}\" height=\"{inner}\" fill=\"#CEB2B7\" fill-opacity=\"0.2\" ",
            "stroke=\"#C69390\" stroke-width=\"2\" stroke-dasharray=\"8 6\"/>"
        ),
        ns = SVG_NS,
        s = fmt_num(s),
        inner = fmt_num(s - 2.0),
    );
    for (i, line) in PLACEHOLDER_TEXT.iter().enumerate() {
        svg.push_str(&format!(
            "<text x=\"{}\" y=\"{}\" fill=\"#C69390\" font-size=\"16\" font-family=\"sans-serif\" text-anchor=\"middle\">{}</text>",
            fmt_num(s / 2.0),
            fmt_num(s / 2.0 + i as f64 * 22.0),
            escape_text(line)
        ));
    }
    svg.push_str("</svg>");
    svg
}

fn glow_filter(color: &str) -> String {
    format!(
        concat!(
            "<filter id=\"glow\" x=\"-25%\" y=\"-25%\" width=\"150%\" height=\"150%\">",
            "<feGaussianBlur in=\"SourceAlpha\" stdDeviation=\"8\" result=\"blur\"/>",
            "<feFlood flood-color=\"{}\" flood-opacity=\"0.6\"/>",
            "<feComposite in2=\"blur\" operator=\"in\" result=\"shadow\"/>",
            "<feMerge><feMergeNode in=\"shadow\"/><feMergeNode in=\"SourceGraphic\"/></feMerge>",
            "</filter>"
        ),
        escape_attr(color)
    )
}

fn pattern_def(pattern: BackgroundPattern, color: &str) -> Option<String> {
    let color = escape_attr(color);
    let (size, body) = match pattern {
        BackgroundPattern::None => return None,
        BackgroundPattern::Dots => (12, format!("<circle cx=\"6\" cy=\"6\" r=\"1.5\" fill=\"{}\"/>", color)),
        BackgroundPattern::Grid => (
            12,
            format!("<path d=\"M12 0H0V12\" fill=\"none\" stroke=\"{}\" stroke-width=\"0.5\"/>", color),
        ),
        BackgroundPattern::Diagonal => (
            10,
            format!("<path d=\"M0 10L10 0\" stroke=\"{}\" stroke-width=\"1\"/>", color),
        ),
    };
    Some(format!(
        "<pattern id=\"bg-pattern\" width=\"{s}\" height=\"{s}\" patternUnits=\"userSpaceOnUse\" opacity=\"0.15\">{}</pattern>",
        body,
        s = size
    ))
}
