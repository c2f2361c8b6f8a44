//! # Label Layout
//!
//! Computes the caption shown beneath the QR graphic.
//!
//! ## Rules
//!
//! - Split on explicit `\n` first.
//! - Any segment longer than [`MAX_LINE_CHARS`] is hard-wrapped into fixed
//!   30-character chunks. There is no word-boundary awareness, which keeps
//!   the label width deterministic.
//! - Each line takes `font_size + 8` pixels; the block adds
//!   [`LABEL_PADDING`] on top of that. An empty label takes no space at all.
//!
//! ```text
//! ┌───────────────┐
//! │   QR graphic  │
//! ├───────────────┤  ← origin_y
//! │ 12px          │
//! │ line 0        │  font_size + 8
//! │ line 1        │  font_size + 8
//! │ 12px          │
//! └───────────────┘
//! ```

use crate::settings::{LabelAlignment, LabelStyle};
use crate::svg::{escape_attr, escape_text, fmt_num};

/// Maximum characters per label line.
pub const MAX_LINE_CHARS: usize = 30;

/// Extra vertical space around the label block (split evenly above and below).
pub const LABEL_PADDING: u32 = 24;

/// Gap added to the font size to get the line pitch.
pub const LINE_GAP: u32 = 8;

/// Maximum number of display lines a label keeps.
pub const MAX_LABEL_LINES: usize = 12;

/// Split label text into display lines.
pub fn wrap_lines(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    let mut lines = Vec::new();
    for segment in text.split('\n') {
        let chars: Vec<char> = segment.chars().collect();
        if chars.len() <= MAX_LINE_CHARS {
            lines.push(segment.to_string());
        } else {
            lines.extend(chars.chunks(MAX_LINE_CHARS).map(|c| c.iter().collect::<String>()));
        }
    }
    lines
}

/// Longest prefix of `text` that wraps to at most [`MAX_LABEL_LINES`] lines.
pub fn truncate(text: &str) -> &str {
    let mut lines = 0;
    let mut offset = 0;
    for segment in text.split('\n') {
        let chars = segment.chars().count();
        let needed = chars.div_ceil(MAX_LINE_CHARS).max(1);
        let remaining = MAX_LABEL_LINES - lines;
        if needed > remaining {
            if remaining == 0 {
                // Drop the newline that opened this segment
                return &text[..offset - 1];
            }
            let cut = segment
                .char_indices()
                .nth(remaining * MAX_LINE_CHARS)
                .map_or(segment.len(), |(i, _)| i);
            return &text[..offset + cut];
        }
        lines += needed;
        offset += segment.len() + 1;
    }
    text
}

/// Vertical distance between consecutive line tops.
pub fn line_pitch(font_size: u32) -> u32 {
    font_size + LINE_GAP
}

/// Height of the label block for `line_count` lines, or 0 with no lines.
pub fn label_height(line_count: usize, font_size: u32) -> u32 {
    if line_count == 0 {
        0
    } else {
        line_count as u32 * line_pitch(font_size) + LABEL_PADDING
    }
}

/// One positioned line of the label.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelLine {
    pub text: String,
    /// Top edge of the line, relative to the label origin's coordinate space.
    pub top: f64,
}

/// A wrapped, measured label ready to be placed under a graphic.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelLayout {
    pub lines: Vec<String>,
    pub style: LabelStyle,
}

impl LabelLayout {
    pub fn new(text: &str, style: LabelStyle) -> Self {
        Self {
            lines: wrap_lines(text),
            style,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Height reserved beneath the graphic.
    pub fn height(&self) -> u32 {
        label_height(self.lines.len(), self.style.font_size)
    }

    /// Lines positioned below `origin_y` (the bottom edge of the graphic).
    pub fn positioned(&self, origin_y: f64) -> Vec<LabelLine> {
        let pitch = line_pitch(self.style.font_size) as f64;
        let first = origin_y + (LABEL_PADDING / 2) as f64;
        self.lines
            .iter()
            .enumerate()
            .map(|(i, text)| LabelLine {
                text: text.clone(),
                top: first + i as f64 * pitch,
            })
            .collect()
    }

    /// One `<text>` element per line, top-aligned at each line's position.
    ///
    /// `anchor_x` is where the alignment anchors: the center for
    /// [`LabelAlignment::Center`], the left or right edge otherwise.
    pub fn svg_text_elements(&self, anchor_x: f64, origin_y: f64, alignment: LabelAlignment) -> String {
        let style = &self.style;
        let mut out = String::new();
        for line in self.positioned(origin_y) {
            out.push_str(&format!(
                concat!(
                    "<text x=\"{}\" y=\"{}\" fill=\"{}\" font-size=\"{}\" font-weight=\"{}\" ",
                    "font-family=\"{}\" text-anchor=\"{}\" dominant-baseline=\"hanging\" ",
                    "xml:space=\"preserve\">{}</text>"
                ),
                fmt_num(anchor_x),
                fmt_num(line.top),
                escape_attr(&style.color),
                style.font_size,
                style.weight.css_weight(),
                escape_attr(style.font.css_family()),
                alignment.text_anchor(),
                escape_text(&line.text),
            ));
        }
        out
    }

    /// A standalone SVG document of `width × height()` holding only the label,
    /// centered horizontally. Used by the raster exporter to draw the text.
    pub fn svg_document(&self, width: f64) -> String {
        let height = self.height();
        format!(
            "<svg xmlns=\"{}\" width=\"{}\" height=\"{}\" viewBox=\"0 0 {} {}\">{}</svg>",
            crate::svg::SVG_NS,
            fmt_num(width),
            height,
            fmt_num(width),
            height,
            self.svg_text_elements(width / 2.0, 0.0, LabelAlignment::Center),
        )
    }
}
