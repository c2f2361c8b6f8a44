//! Styled SVG renderer.
//!
//! ## Layout
//!
//! ```text
//! ├─ margin ─┼──── count × dot ────┼─ margin ─┤   (size px total)
//! ```
//!
//! `dot = floor((size - 2 * margin) / count)`; any leftover pixels from the
//! floor are split evenly on both sides so the symbol stays centered.

use std::sync::Arc;

use super::matrix::QrMatrix;
use super::shapes::{self, Neighbors};
use super::{Fill, LogoOptions, Render, RenderOptions, RenderedQr};
use crate::error::QrStudioError;
use crate::settings::{ErrorCorrection, GradientType};
use crate::svg::{SVG_NS, escape_attr, fmt_num};

const GRADIENT_ID: &str = "dots-gradient";

struct CachedMatrix {
    payload: String,
    level: ErrorCorrection,
    matrix: Arc<QrMatrix>,
}

/// Long-lived renderer. Created once, then re-invoked with new options.
///
/// The module matrix is cached by `(payload, error level)`, so edits that
/// only touch colors, shapes or the logo skip re-encoding.
#[derive(Default)]
pub struct StyledRenderer {
    cache: Option<CachedMatrix>,
    encode_count: usize,
}

impl StyledRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times a payload has been encoded by this renderer.
    pub fn encode_count(&self) -> usize {
        self.encode_count
    }

    fn matrix(&mut self, payload: &str, level: ErrorCorrection) -> Result<Arc<QrMatrix>, QrStudioError> {
        if let Some(cached) = &self.cache {
            if cached.payload == payload && cached.level == level {
                return Ok(cached.matrix.clone());
            }
        }

        let matrix = Arc::new(QrMatrix::encode(payload, level)?);
        self.encode_count += 1;
        self.cache = Some(CachedMatrix {
            payload: payload.to_string(),
            level,
            matrix: matrix.clone(),
        });
        Ok(matrix)
    }
}

impl Render for StyledRenderer {
    fn render(&mut self, options: &RenderOptions) -> Result<RenderedQr, QrStudioError> {
        if options.payload.is_empty() {
            return Err(QrStudioError::Encode("Nothing to encode".to_string()));
        }
        let matrix = self.matrix(&options.payload, options.error_correction)?;
        let svg = build_svg(&matrix, options);
        Ok(RenderedQr {
            svg,
            width: options.size,
            height: options.size,
            payload: options.payload.clone(),
        })
    }
}

/// Pixel box of the logo plus its clearance margin, `(x0, y0, x1, y1)`,
/// followed by the logo's own side length.
fn logo_box(size: f64, logo: &LogoOptions) -> (f64, f64, f64, f64, f64) {
    let w = size * logo.size_percent as f64 / 100.0;
    let origin = (size - w) / 2.0;
    let m = logo.margin as f64;
    (origin - m, origin - m, origin + w + m, origin + w + m, w)
}

fn build_svg(matrix: &QrMatrix, options: &RenderOptions) -> String {
    let size = options.size as f64;
    let count = matrix.width();
    let inner = options.size.saturating_sub(2 * options.margin) as f64;
    let dot = (inner / count as f64).floor().max(1.0);
    let offset = ((size - count as f64 * dot) / 2.0).floor();

    let hidden = options.logo.as_ref().map(|logo| logo_box(size, logo));

    // Data modules
    let mut dots_d = String::new();
    for y in 0..count {
        for x in 0..count {
            let (xi, yi) = (x as isize, y as isize);
            if !matrix.is_dark(xi, yi) || matrix.in_finder(x, y) {
                continue;
            }
            let px = offset + x as f64 * dot;
            let py = offset + y as f64 * dot;
            if let Some((x0, y0, x1, y1, _)) = hidden {
                if px < x1 && px + dot > x0 && py < y1 && py + dot > y0 {
                    continue;
                }
            }
            let nb = Neighbors {
                top: matrix.is_dark(xi, yi - 1) && !matrix.in_finder(x, y.wrapping_sub(1)),
                right: matrix.is_dark(xi + 1, yi) && !matrix.in_finder(x + 1, y),
                bottom: matrix.is_dark(xi, yi + 1) && !matrix.in_finder(x, y + 1),
                left: matrix.is_dark(xi - 1, yi) && !matrix.in_finder(x.wrapping_sub(1), y),
            };
            dots_d.push_str(&shapes::dot(options.shapes.dots, px, py, dot, nb));
        }
    }

    // Finder patterns
    let mut squares_d = String::new();
    let mut corner_dots_d = String::new();
    for (fx, fy) in matrix.finder_origins() {
        let px = offset + fx as f64 * dot;
        let py = offset + fy as f64 * dot;
        squares_d.push_str(&shapes::corner_square(options.shapes.corner_squares, px, py, dot));
        corner_dots_d.push_str(&shapes::corner_dot(options.shapes.corner_dots, px, py, dot));
    }

    let size_s = fmt_num(size);
    let mut svg = format!(
        "<svg xmlns=\"{}\" width=\"{s}\" height=\"{s}\" viewBox=\"0 0 {s} {s}\">",
        SVG_NS,
        s = size_s
    );

    let dots_fill = match &options.fill {
        Fill::Solid(color) => escape_attr(color),
        Fill::Gradient { kind, start, end } => {
            svg.push_str("<defs>");
            svg.push_str(&gradient_def(*kind, start, end, size));
            svg.push_str("</defs>");
            format!("url(#{})", GRADIENT_ID)
        }
    };

    svg.push_str(&format!(
        "<rect width=\"{s}\" height=\"{s}\" fill=\"{}\"/>",
        escape_attr(&options.background),
        s = size_s
    ));
    if !dots_d.is_empty() {
        svg.push_str(&format!("<path fill=\"{}\" d=\"{}\"/>", dots_fill, dots_d));
    }
    let corner = escape_attr(&options.corner_color);
    svg.push_str(&format!(
        "<path fill=\"{}\" fill-rule=\"evenodd\" d=\"{}\"/>",
        corner, squares_d
    ));
    svg.push_str(&format!("<path fill=\"{}\" d=\"{}\"/>", corner, corner_dots_d));

    if let (Some(logo), Some((x0, y0, _, _, w))) = (&options.logo, hidden) {
        let m = logo.margin as f64;
        svg.push_str(&format!(
            concat!(
                "<image href=\"{}\" x=\"{}\" y=\"{}\" width=\"{w}\" height=\"{w}\" ",
                "opacity=\"{}\" preserveAspectRatio=\"xMidYMid meet\"/>"
            ),
            escape_attr(&logo.href),
            fmt_num(x0 + m),
            fmt_num(y0 + m),
            fmt_num(logo.opacity_percent as f64 / 100.0),
            w = fmt_num(w),
        ));
    }

    svg.push_str("</svg>");
    svg
}

fn gradient_def(kind: GradientType, start: &str, end: &str, size: f64) -> String {
    let stops = format!(
        "<stop offset=\"0\" stop-color=\"{}\"/><stop offset=\"1\" stop-color=\"{}\"/>",
        escape_attr(start),
        escape_attr(end)
    );
    match kind {
        GradientType::Linear => format!(
            "<linearGradient id=\"{}\" gradientUnits=\"userSpaceOnUse\" x1=\"0\" y1=\"0\" x2=\"{s}\" y2=\"{s}\">{}</linearGradient>",
            GRADIENT_ID,
            stops,
            s = fmt_num(size)
        ),
        GradientType::Radial => format!(
            "<radialGradient id=\"{}\" gradientUnits=\"userSpaceOnUse\" cx=\"{c}\" cy=\"{c}\" r=\"{}\">{}</radialGradient>",
            GRADIENT_ID,
            fmt_num(size / std::f64::consts::SQRT_2),
            stops,
            c = fmt_num(size / 2.0)
        ),
    }
}
