//! # Export Tests
//!
//! End-to-end checks of the export pipeline: settings are rendered with the
//! styled renderer, then exported as each kind.
//!
//! ## Test Coverage
//!
//! - **SVG**: root height and viewBox grow by the label block height
//! - **PNG / screenshot**: surface dimensions follow the padded layout
//! - **No-ops**: empty data or a missing graphic produce no file
//! - **Blob hygiene**: every scoped blob is released after an export

use pretty_assertions::assert_eq;
use qrstudio::export::{ExportKind, Exporter};
use qrstudio::label::label_height;
use qrstudio::render::{Render, RenderOptions, RenderedQr, StyledRenderer};
use qrstudio::settings::{DotStyle, ErrorCorrection, LabelWeight, Settings};
use qrstudio::svg::{RootTag, parse_view_box};

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn settings(data: &str, label: &str) -> Settings {
    Settings {
        data: data.to_string(),
        label_text: label.to_string(),
        ..Default::default()
    }
}

fn render(settings: &Settings) -> RenderedQr {
    StyledRenderer::new()
        .render(&RenderOptions::from_settings(settings))
        .unwrap()
}

fn png_dimensions(bytes: &[u8]) -> (u32, u32) {
    let img = image::load_from_memory_with_format(bytes, image::ImageFormat::Png).unwrap();
    (img.width(), img.height())
}

// ============================================================================
// SVG
// ============================================================================

#[test]
fn test_svg_height_grows_by_label_block() {
    let cases = [
        ("", 16, 0),
        ("Scan me!", 16, 1),
        ("This caption is long enough to need two lines", 16, 2),
        ("Big", 48, 1),
        ("one\ntwo\nthree", 12, 3),
    ];

    for (label, font_size, lines) in cases {
        let mut s = settings("https://example.com", label);
        s.label_size = font_size;
        let qr = render(&s);
        let artifact = Exporter::new()
            .export(ExportKind::Svg, Some(&qr.svg), &s)
            .unwrap()
            .unwrap();
        let doc = String::from_utf8(artifact.bytes).unwrap();
        let root = RootTag::find(&doc).unwrap();

        let expected = 300 + label_height(lines, font_size);
        assert_eq!(root.attr(&doc, "height"), Some(expected.to_string().as_str()), "{:?}", label);
        let vb = parse_view_box(root.attr(&doc, "viewBox").unwrap()).unwrap();
        assert_eq!(vb[3], expected as f64, "{:?}", label);
        assert_eq!(doc.matches("<text ").count(), lines, "{:?}", label);
    }
}

#[test]
fn test_svg_export_is_standalone() {
    let s = Settings {
        dot_style: DotStyle::Rounded,
        label_weight: LabelWeight::Bold,
        ..settings("hello", "Bold caption")
    };
    let qr = render(&s);
    let artifact = Exporter::new().export_svg(Some(&qr.svg), &s).unwrap().unwrap();
    assert_eq!(artifact.filename, "qr-code.svg");
    assert_eq!(artifact.mime, "image/svg+xml");

    let doc = String::from_utf8(artifact.bytes).unwrap();
    assert!(doc.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""));
    assert!(doc.contains("font-weight=\"700\""));
    assert!(doc.contains("text-anchor=\"middle\""));
}

// ============================================================================
// RASTER
// ============================================================================

#[test]
fn test_png_dimensions_follow_layout() {
    let exporter = Exporter::new();
    for (size, label, font_size) in [(300, "", 16), (200, "Scan me!", 16), (500, "Caption", 24)] {
        let mut s = settings("https://example.com", label);
        s.size = size;
        s.label_size = font_size;
        let qr = render(&s);

        let artifact = exporter.export_png(Some(&qr.svg), &s).unwrap().unwrap();
        assert_eq!(artifact.filename, "qr-code.png");

        let lines = if label.is_empty() { 0 } else { 1 };
        let expected = (size + 64, size + 32 + label_height(lines, font_size) + 16);
        assert_eq!(png_dimensions(&artifact.bytes), expected, "size {}", size);
    }
    assert_eq!(exporter.blobs().live(), 0);
}

#[test]
fn test_screenshot_is_double_scale() {
    let exporter = Exporter::new();
    let s = Settings {
        error_correction_level: ErrorCorrection::H,
        ..settings("https://example.com", "Follow us")
    };
    let qr = render(&s);

    let png = exporter.export_png(Some(&qr.svg), &s).unwrap().unwrap();
    let shot = exporter.export_screenshot(Some(&qr.svg), &s).unwrap().unwrap();
    assert_eq!(shot.filename, "qr-code-screenshot.png");

    let (w, h) = png_dimensions(&png.bytes);
    assert_eq!(png_dimensions(&shot.bytes), (w * 2, h * 2));
    assert_eq!(exporter.blobs().live(), 0);
}

#[test]
fn test_logo_is_rasterized() {
    let logo_svg = r#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"><rect width="10" height="10" fill="red"/></svg>"#;
    let s = Settings {
        logo: Some(qrstudio::logo::from_bytes(logo_svg.as_bytes(), "image/svg+xml").unwrap()),
        error_correction_level: ErrorCorrection::H,
        ..settings("https://example.com", "")
    };
    let qr = render(&s);
    let artifact = Exporter::new().export_png(Some(&qr.svg), &s).unwrap().unwrap();
    let img = image::load_from_memory(&artifact.bytes).unwrap().to_rgba8();

    // Center of the 300px graphic, offset by the 32px padding
    assert_eq!(img.get_pixel(182, 182).0, [255, 0, 0, 255]);
}

#[test]
fn test_corrupt_markup_fails_and_releases_blob() {
    let exporter = Exporter::new();
    let s = settings("hello", "");
    let err = exporter
        .export_png(Some("<svg width=\"10\" height=\"10\"><rect></svg>"), &s)
        .unwrap_err();
    assert!(matches!(err, qrstudio::QrStudioError::Decode(_)));
    assert_eq!(exporter.blobs().live(), 0);
}

// ============================================================================
// NO-OPS
// ============================================================================

#[test]
fn test_nothing_to_export() {
    let exporter = Exporter::new();
    let graphic = render(&settings("hello", "")).svg;

    for kind in ExportKind::ALL {
        assert_eq!(
            exporter.export(*kind, Some(&graphic), &settings("", "label")).unwrap(),
            None
        );
        assert_eq!(exporter.export(*kind, None, &settings("hello", "")).unwrap(), None);
    }
    assert_eq!(exporter.blobs().live(), 0);
}
