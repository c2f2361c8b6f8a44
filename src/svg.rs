//! Small SVG markup helpers shared by the renderer, the preview and the exporters.
//!
//! These work on strings: the exporters take "an SVG document as text" as
//! their input, so the root element is edited in place rather than parsed
//! into a tree and re-serialized.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use std::ops::Range;

pub const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Escape text content for use between tags.
pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escape a value for use inside a double-quoted attribute.
pub fn escape_attr(s: &str) -> String {
    escape_text(s).replace('"', "&quot;")
}

/// Build a base64 `data:` URI.
pub fn data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Parse an SVG length like `300`, `300px` or `300.5`. Other units are rejected.
pub fn parse_length(value: &str) -> Option<f64> {
    let v = value.trim();
    let v = v.strip_suffix("px").unwrap_or(v);
    v.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Format a number without a trailing `.0` for whole values.
pub fn fmt_num(n: f64) -> String {
    if n.fract() == 0.0 {
        format!("{}", n as i64)
    } else {
        let s = format!("{:.3}", n);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// The opening tag of the root `<svg>` element within a document.
#[derive(Debug, Clone)]
pub struct RootTag {
    /// Byte range of the whole opening tag, `<svg ... >`.
    pub range: Range<usize>,
}

struct Attr {
    name: Range<usize>,
    value: Range<usize>,
}

impl RootTag {
    /// Locate the first `<svg` opening tag, skipping prologs and comments.
    pub fn find(doc: &str) -> Option<Self> {
        let bytes = doc.as_bytes();
        let mut search_from = 0;
        while let Some(pos) = doc[search_from..].find("<svg") {
            let start = search_from + pos;
            let after = start + 4;
            match bytes.get(after) {
                Some(b) if b.is_ascii_whitespace() || *b == b'>' || *b == b'/' => {
                    let end = tag_end(doc, after)?;
                    return Some(Self { range: start..end });
                }
                _ => search_from = after,
            }
        }
        None
    }

    fn attrs(&self, doc: &str) -> Vec<Attr> {
        let bytes = doc.as_bytes();
        let mut attrs = Vec::new();
        let mut i = self.range.start + 4;
        let end = self.range.end;

        while i < end {
            while i < end && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            let name_start = i;
            while i < end && !bytes[i].is_ascii_whitespace() && !matches!(bytes[i], b'=' | b'>' | b'/') {
                i += 1;
            }
            if name_start == i {
                i += 1;
                continue;
            }
            let name = name_start..i;
            while i < end && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            if i >= end || bytes[i] != b'=' {
                continue;
            }
            i += 1;
            while i < end && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            if i >= end {
                break;
            }
            let quote = bytes[i];
            if quote != b'"' && quote != b'\'' {
                continue;
            }
            let value_start = i + 1;
            let Some(rel) = doc[value_start..end].find(quote as char) else {
                break;
            };
            let value_end = value_start + rel;
            attrs.push(Attr {
                name,
                value: value_start..value_end,
            });
            i = value_end + 1;
        }
        attrs
    }

    /// Value of an attribute on the root tag.
    pub fn attr<'a>(&self, doc: &'a str, name: &str) -> Option<&'a str> {
        self.attrs(doc)
            .into_iter()
            .find(|a| &doc[a.name.clone()] == name)
            .map(|a| &doc[a.value])
    }

    /// Set (or add) an attribute on the root tag, returning the new document.
    ///
    /// `value` is inserted verbatim; escape it first if it is user input.
    pub fn set_attr(&self, doc: &str, name: &str, value: &str) -> String {
        let existing = self
            .attrs(doc)
            .into_iter()
            .find(|a| &doc[a.name.clone()] == name);

        match existing {
            Some(a) => format!("{}{}{}", &doc[..a.value.start], value, &doc[a.value.end..]),
            None => {
                // Insert right after `<svg`
                let at = self.range.start + 4;
                format!("{} {}=\"{}\"{}", &doc[..at], name, value, &doc[at..])
            }
        }
    }
}

/// Find the index just past the `>` closing a tag, honoring quoted values.
fn tag_end(doc: &str, from: usize) -> Option<usize> {
    let mut quote: Option<u8> = None;
    for (i, &b) in doc.as_bytes().iter().enumerate().skip(from) {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if b == b'"' || b == b'\'' => quote = Some(b),
            None if b == b'>' => return Some(i + 1),
            None => {}
        }
    }
    None
}

/// Make sure the root `<svg>` declares the SVG namespace so the markup is a
/// standalone document. Returns `None` if there is no root `<svg>` element.
pub fn ensure_namespace(doc: &str) -> Option<String> {
    let root = RootTag::find(doc)?;
    if root.attr(doc, "xmlns").is_some() {
        Some(doc.to_string())
    } else {
        Some(root.set_attr(doc, "xmlns", SVG_NS))
    }
}

/// Width and height of the root element, from `width`/`height` or the `viewBox`.
pub fn dimensions(doc: &str) -> Option<(f64, f64)> {
    let root = RootTag::find(doc)?;
    let view_box = root.attr(doc, "viewBox").and_then(parse_view_box);
    let width = root
        .attr(doc, "width")
        .and_then(parse_length)
        .or(view_box.map(|vb| vb[2]))?;
    let height = root
        .attr(doc, "height")
        .and_then(parse_length)
        .or(view_box.map(|vb| vb[3]))?;
    Some((width, height))
}

/// Parse `min-x min-y width height`, separated by whitespace and/or commas.
pub fn parse_view_box(value: &str) -> Option<[f64; 4]> {
    let nums: Vec<f64> = value
        .split(|c: char| c.is_ascii_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<f64>())
        .collect::<Result<_, _>>()
        .ok()?;
    match nums.as_slice() {
        [x, y, w, h] => Some([*x, *y, *w, *h]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape_text("a < b & c"), "a &lt; b &amp; c");
        assert_eq!(escape_attr(r#"say "hi""#), "say &quot;hi&quot;");
    }

    #[test]
    fn test_ensure_namespace_injects_once() {
        let doc = r#"<svg width="10" height="10"><rect/></svg>"#;
        let out = ensure_namespace(doc).unwrap();
        assert!(out.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" width="10""#));
        assert_eq!(ensure_namespace(&out).unwrap(), out);
    }

    #[test]
    fn test_ensure_namespace_rejects_non_svg() {
        assert!(ensure_namespace("<html></html>").is_none());
        assert!(ensure_namespace("<svgfoo></svgfoo>").is_none());
    }

    #[test]
    fn test_root_tag_skips_prolog() {
        let doc = "<?xml version=\"1.0\"?>\n<!-- > tricky -->\n<svg height='20' width=\"30\"></svg>";
        let root = RootTag::find(doc).unwrap();
        assert_eq!(root.attr(doc, "width"), Some("30"));
        assert_eq!(root.attr(doc, "height"), Some("20"));
    }

    #[test]
    fn test_set_attr_replaces_value() {
        let doc = r#"<svg width="300" height="300" viewBox="0 0 300 300"></svg>"#;
        let root = RootTag::find(doc).unwrap();
        let out = root.set_attr(doc, "height", "364");
        assert_eq!(out, r#"<svg width="300" height="364" viewBox="0 0 300 300"></svg>"#);
    }

    #[test]
    fn test_dimensions_fall_back_to_view_box() {
        assert_eq!(
            dimensions(r#"<svg viewBox="0,0,120,80"></svg>"#),
            Some((120.0, 80.0))
        );
        assert_eq!(
            dimensions(r#"<svg width="50px" height="60"></svg>"#),
            Some((50.0, 60.0))
        );
        assert_eq!(dimensions(r#"<svg></svg>"#), None);
    }

    #[test]
    fn test_fmt_num() {
        assert_eq!(fmt_num(12.0), "12");
        assert_eq!(fmt_num(12.5), "12.5");
        assert_eq!(fmt_num(1.0 / 3.0), "0.333");
    }
}
