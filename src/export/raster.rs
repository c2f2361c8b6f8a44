//! Raster export: SVG graphic plus label drawn onto a padded bitmap.
//!
//! ## Surface layout (logical pixels, before `scale`)
//!
//! ```text
//! ┌──────────────── qrW + 2p ────────────────┐
//! │                    p                     │
//! │   p  ┌──── graphic qrW × qrH ────┐  p    │
//! │      └───────────────────────────┘       │
//! │              label (labelH)              │
//! │                   p/2                    │
//! └──────────────────────────────────────────┘
//! ```

use image::ImageEncoder;
use tiny_skia::{Color, Pixmap, Transform};

use super::blob::BlobStore;
use super::fonts;
use crate::error::QrStudioError;
use crate::label::LabelLayout;
use crate::svg::{self, SVG_NS, escape_attr, fmt_num};

/// Padding around the graphic on every raster export.
pub const PADDING: u32 = 32;

/// Largest surface, in device pixels, a raster export may allocate (64 MiB RGBA).
pub const MAX_SURFACE_PIXELS: u64 = 4096 * 4096;

/// Look of a raster export.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterStyle {
    pub padding: u32,
    /// Device pixel ratio applied to the whole surface.
    pub scale: f32,
    /// Draw the graphic on a rounded, shadowed card in this color.
    pub card: Option<String>,
}

impl RasterStyle {
    pub fn png() -> Self {
        Self {
            padding: PADDING,
            scale: 1.0,
            card: None,
        }
    }

    pub fn screenshot(card_color: &str) -> Self {
        Self {
            padding: PADDING,
            scale: 2.0,
            card: Some(card_color.to_string()),
        }
    }
}

/// Logical layout of the output surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterLayout {
    pub width: u32,
    pub height: u32,
    pub padding: u32,
    pub qr_width: u32,
    pub qr_height: u32,
}

impl RasterLayout {
    pub fn new(qr_width: u32, qr_height: u32, label_height: u32, padding: u32) -> Self {
        Self {
            width: qr_width + 2 * padding,
            height: qr_height + padding + label_height + padding / 2,
            padding,
            qr_width,
            qr_height,
        }
    }

    /// Top of the label block, directly under the graphic.
    pub fn label_top(&self) -> u32 {
        self.padding + self.qr_height
    }
}

/// Decode `markup` through a scoped blob and draw it with `label` below.
/// Returns PNG bytes.
pub fn rasterize(
    markup: &str,
    label: &LabelLayout,
    style: &RasterStyle,
    blobs: &BlobStore,
) -> Result<Vec<u8>, QrStudioError> {
    let doc = svg::ensure_namespace(markup)
        .ok_or_else(|| QrStudioError::Decode("Markup has no <svg> root element".to_string()))?;

    let options = fonts::usvg_options();
    let tree = {
        let handle = blobs.create(doc.into_bytes(), "image/svg+xml;charset=utf-8");
        let blob = blobs
            .fetch(handle.url())
            .ok_or_else(|| QrStudioError::Decode(format!("Blob {} is gone", handle.url())))?;
        usvg::Tree::from_data(&blob.bytes, &options)
            .map_err(|e| QrStudioError::Decode(format!("Failed to load SVG image: {}", e)))?
    };

    let size = tree.size();
    let layout = RasterLayout::new(
        size.width().ceil() as u32,
        size.height().ceil() as u32,
        label.height(),
        style.padding,
    );

    let scale = style.scale;
    let px_w = (layout.width as f64 * scale as f64).ceil();
    let px_h = (layout.height as f64 * scale as f64).ceil();
    if px_w * px_h > MAX_SURFACE_PIXELS as f64 {
        return Err(QrStudioError::Image(format!(
            "Export surface {}x{} exceeds the {} pixel limit",
            px_w, px_h, MAX_SURFACE_PIXELS
        )));
    }
    let (px_w, px_h) = (px_w as u32, px_h as u32);
    let mut pixmap = Pixmap::new(px_w, px_h).ok_or_else(|| {
        QrStudioError::Image(format!("Cannot allocate a {}x{} surface", px_w, px_h))
    })?;
    pixmap.fill(Color::WHITE);

    let base = Transform::from_scale(scale, scale);

    if let Some(color) = &style.card {
        let card = usvg::Tree::from_str(&card_svg(&layout, color), &options)
            .map_err(|e| QrStudioError::Image(format!("Failed to draw card: {}", e)))?;
        resvg::render(&card, base, &mut pixmap.as_mut());
    }

    let pad = layout.padding as f32;
    resvg::render(&tree, base.pre_translate(pad, pad), &mut pixmap.as_mut());

    if !label.is_empty() {
        let text = usvg::Tree::from_str(&label.svg_document(layout.width as f64), &options)
            .map_err(|e| QrStudioError::Image(format!("Failed to lay out label: {}", e)))?;
        resvg::render(
            &text,
            base.pre_translate(0.0, layout.label_top() as f32),
            &mut pixmap.as_mut(),
        );
    }

    tracing::debug!(
        width = px_w,
        height = px_h,
        scale,
        label_lines = label.lines.len(),
        "rasterized export"
    );
    encode_png(&pixmap)
}

/// Rounded card with a soft shadow, inset by a quarter of the padding.
fn card_svg(layout: &RasterLayout, color: &str) -> String {
    let inset = (layout.padding / 4) as f64;
    format!(
        concat!(
            "<svg xmlns=\"{ns}\" width=\"{w}\" height=\"{h}\">",
            "<defs><filter id=\"shadow\" x=\"-20%\" y=\"-20%\" width=\"140%\" height=\"140%\">",
            "<feDropShadow dx=\"0\" dy=\"4\" stdDeviation=\"6\" flood-color=\"#000000\" flood-opacity=\"0.18\"/>",
            "</filter></defs>",
            "<rect x=\"{i}\" y=\"{i}\" width=\"{cw}\" height=\"{ch}\" rx=\"16\" fill=\"{fill}\" filter=\"url(#shadow)\"/>",
            "</svg>"
        ),
        ns = SVG_NS,
        w = layout.width,
        h = layout.height,
        i = fmt_num(inset),
        cw = fmt_num(layout.width as f64 - 2.0 * inset),
        ch = fmt_num(layout.height as f64 - 2.0 * inset),
        fill = escape_attr(color),
    )
}

fn encode_png(pixmap: &Pixmap) -> Result<Vec<u8>, QrStudioError> {
    let mut rgba = Vec::with_capacity(pixmap.data().len());
    for pixel in pixmap.pixels() {
        let c = pixel.demultiply();
        rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }

    let mut png_bytes = Vec::new();
    image::codecs::png::PngEncoder::new(&mut png_bytes)
        .write_image(
            &rgba,
            pixmap.width(),
            pixmap.height(),
            image::ExtendedColorType::Rgba8,
        )
        .map_err(|e: image::ImageError| QrStudioError::Image(e.to_string()))?;
    Ok(png_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use pretty_assertions::assert_eq;

    const GRAPHIC: &str = "<svg width=\"300\" height=\"300\" viewBox=\"0 0 300 300\"><rect width=\"300\" height=\"300\" fill=\"#DCB39A\"/></svg>";

    fn layout(text: &str) -> LabelLayout {
        LabelLayout::new(text, Settings::default().label_style())
    }

    fn png_size(bytes: &[u8]) -> (u32, u32) {
        let img = image::load_from_memory_with_format(bytes, image::ImageFormat::Png).unwrap();
        (img.width(), img.height())
    }

    #[test]
    fn test_layout_formula() {
        let l = RasterLayout::new(300, 300, 48, 32);
        assert_eq!((l.width, l.height), (364, 396));
        assert_eq!(l.label_top(), 332);

        let bare = RasterLayout::new(300, 300, 0, 32);
        assert_eq!((bare.width, bare.height), (364, 348));
    }

    #[test]
    fn test_png_dimensions_without_label() {
        let blobs = BlobStore::new();
        let png = rasterize(GRAPHIC, &layout(""), &RasterStyle::png(), &blobs).unwrap();
        assert_eq!(png_size(&png), (364, 348));
        assert_eq!(blobs.live(), 0);
    }

    #[test]
    fn test_png_dimensions_with_label() {
        let blobs = BlobStore::new();
        let png = rasterize(GRAPHIC, &layout("Scan me!"), &RasterStyle::png(), &blobs).unwrap();
        assert_eq!(png_size(&png), (364, 396));
    }

    #[test]
    fn test_padding_is_white_and_graphic_is_drawn() {
        let blobs = BlobStore::new();
        let png = rasterize(GRAPHIC, &layout(""), &RasterStyle::png(), &blobs).unwrap();
        let img = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(img.get_pixel(2, 2).0, [255, 255, 255, 255]);
        assert_eq!(img.get_pixel(182, 182).0, [0xDC, 0xB3, 0x9A, 255]);
    }

    #[test]
    fn test_screenshot_is_scaled() {
        let blobs = BlobStore::new();
        let style = RasterStyle::screenshot("#DCB39A");
        let png = rasterize(GRAPHIC, &layout("Scan me!"), &style, &blobs).unwrap();
        assert_eq!(png_size(&png), (728, 792));
    }

    #[test]
    fn test_decode_failure_releases_blob() {
        let blobs = BlobStore::new();
        let err = rasterize("<svg width=\"10\" height=\"10\"><g></svg>", &layout(""), &RasterStyle::png(), &blobs)
            .unwrap_err();
        assert!(matches!(err, QrStudioError::Decode(_)), "{:?}", err);
        assert_eq!(blobs.live(), 0);
    }

    #[test]
    fn test_oversized_surface_is_refused() {
        let blobs = BlobStore::new();
        let tall = layout(&"\n".repeat(200_000));
        let err = rasterize(GRAPHIC, &tall, &RasterStyle::screenshot("#FFFFFF"), &blobs).unwrap_err();
        assert!(matches!(err, QrStudioError::Image(_)), "{:?}", err);
        assert_eq!(blobs.live(), 0);

        let huge = "<svg width=\"5000\" height=\"5000\"><rect width=\"5000\" height=\"5000\"/></svg>";
        let err = rasterize(huge, &layout(""), &RasterStyle::png(), &blobs).unwrap_err();
        assert!(matches!(err, QrStudioError::Image(_)), "{:?}", err);
    }
}
