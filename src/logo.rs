//! Logo intake: uploaded image bytes to a `data:` URI usable as `Settings::logo`.

use std::path::Path;

use crate::error::QrStudioError;
use crate::export::fonts;
use crate::svg::data_uri;

/// Largest logo accepted, in bytes.
pub const MAX_LOGO_BYTES: usize = 5 * 1024 * 1024;

/// Validate an uploaded logo and encode it as a data URI.
///
/// Only `image/*` types are accepted. Raster images must decode; SVG logos
/// must parse.
pub fn from_bytes(bytes: &[u8], mime: &str) -> Result<String, QrStudioError> {
    let mime = mime
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    if !mime.starts_with("image/") {
        return Err(QrStudioError::Logo(format!(
            "Unsupported file type '{}', expected an image",
            mime
        )));
    }
    if bytes.is_empty() {
        return Err(QrStudioError::Logo("Logo file is empty".to_string()));
    }
    if bytes.len() > MAX_LOGO_BYTES {
        return Err(QrStudioError::Logo(format!(
            "Logo is {} bytes, the limit is {}",
            bytes.len(),
            MAX_LOGO_BYTES
        )));
    }

    if mime == "image/svg+xml" {
        usvg::Tree::from_data(bytes, &fonts::usvg_options())
            .map_err(|e| QrStudioError::Logo(format!("Invalid SVG logo: {}", e)))?;
    } else {
        let img = image::load_from_memory(bytes)
            .map_err(|e| QrStudioError::Logo(format!("Cannot decode logo: {}", e)))?;
        tracing::debug!(width = img.width(), height = img.height(), %mime, "logo decoded");
    }

    Ok(data_uri(&mime, bytes))
}

/// Read a logo from disk, guessing the type from the extension.
pub fn from_path(path: &Path) -> Result<String, QrStudioError> {
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    let bytes = std::fs::read(path)?;
    from_bytes(&bytes, mime.essence_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn tiny_png() -> Vec<u8> {
        let img = RgbaImage::from_pixel(4, 4, Rgba([118, 74, 77, 255]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png).unwrap();
        bytes
    }

    #[test]
    fn test_png_becomes_data_uri() {
        let uri = from_bytes(&tiny_png(), "image/png").unwrap();
        assert!(uri.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_svg_logo_is_parsed() {
        let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"><circle cx="5" cy="5" r="4"/></svg>"#;
        let uri = from_bytes(svg, "image/svg+xml").unwrap();
        assert!(uri.starts_with("data:image/svg+xml;base64,"));
        assert!(from_bytes(b"<svg", "image/svg+xml").is_err());
    }

    #[test]
    fn test_non_image_rejected() {
        let err = from_bytes(b"%PDF-1.4", "application/pdf").unwrap_err();
        assert!(matches!(err, QrStudioError::Logo(_)));
    }

    #[test]
    fn test_corrupt_image_rejected() {
        assert!(from_bytes(b"not a png", "image/png").is_err());
        assert!(from_bytes(b"", "image/png").is_err());
    }

    #[test]
    fn test_oversized_rejected() {
        let big = vec![0u8; MAX_LOGO_BYTES + 1];
        let err = from_bytes(&big, "image/png").unwrap_err();
        assert!(err.to_string().contains("limit"));
    }

    #[test]
    fn test_mime_parameters_ignored() {
        assert!(from_bytes(&tiny_png(), "IMAGE/PNG; charset=binary").is_ok());
    }
}
