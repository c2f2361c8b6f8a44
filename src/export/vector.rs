//! SVG export: the rendered graphic with the label appended as `<text>`.

use crate::error::QrStudioError;
use crate::label::LabelLayout;
use crate::settings::LabelAlignment;
use crate::svg::{self, RootTag, fmt_num};

fn no_root() -> QrStudioError {
    QrStudioError::Decode("Markup has no <svg> root element".to_string())
}

/// Produce a standalone SVG document from `markup` with `label` below it.
///
/// The root `height` grows by the label height and the `viewBox` height by
/// the same amount in user units; a `viewBox` is added when the graphic has
/// none. When the `viewBox` is not 1:1 with the pixel size the label is
/// wrapped in a transform so it keeps its pixel font size.
pub fn with_label(markup: &str, label: &LabelLayout) -> Result<String, QrStudioError> {
    let doc = svg::ensure_namespace(markup).ok_or_else(no_root)?;
    if label.is_empty() {
        return Ok(doc);
    }

    let (width, height) = svg::dimensions(&doc)
        .ok_or_else(|| QrStudioError::Decode("Cannot determine SVG dimensions".to_string()))?;
    let label_h = label.height() as f64;

    let root = RootTag::find(&doc).ok_or_else(no_root)?;
    let view_box = root.attr(&doc, "viewBox").and_then(svg::parse_view_box);
    let doc = root.set_attr(&doc, "height", &fmt_num(height + label_h));

    let root = RootTag::find(&doc).ok_or_else(no_root)?;
    let [vx, vy, vw, vh] = view_box.unwrap_or([0.0, 0.0, width, height]);
    let (sx, sy) = user_units_per_pixel(vw, vh, width, height);
    let view_box_value = format!(
        "{} {} {} {}",
        fmt_num(vx),
        fmt_num(vy),
        fmt_num(vw),
        fmt_num(vh + label_h * sy)
    );
    let doc = root.set_attr(&doc, "viewBox", &view_box_value);

    let text = if sx == 1.0 && sy == 1.0 {
        label.svg_text_elements(vx + vw / 2.0, vy + vh, LabelAlignment::Center)
    } else {
        format!(
            "<g transform=\"translate({} {}) scale({} {})\">{}</g>",
            fmt_num(vx),
            fmt_num(vy + vh),
            fmt_num(sx),
            fmt_num(sy),
            label.svg_text_elements(width / 2.0, 0.0, LabelAlignment::Center)
        )
    };

    let close = doc
        .rfind("</svg>")
        .ok_or_else(|| QrStudioError::Decode("Markup has no closing </svg>".to_string()))?;

    let mut out = String::with_capacity(doc.len() + text.len());
    out.push_str(&doc[..close]);
    out.push_str(&text);
    out.push_str(&doc[close..]);
    Ok(out)
}

fn user_units_per_pixel(vw: f64, vh: f64, width: f64, height: f64) -> (f64, f64) {
    if width > 0.0 && height > 0.0 {
        (vw / width, vh / height)
    } else {
        (1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use pretty_assertions::assert_eq;

    fn layout(text: &str) -> LabelLayout {
        LabelLayout::new(text, Settings::default().label_style())
    }

    const GRAPHIC: &str =
        "<svg width=\"300\" height=\"300\" viewBox=\"0 0 300 300\"><rect width=\"300\" height=\"300\"/></svg>";

    #[test]
    fn test_no_label_only_adds_namespace() {
        let out = with_label(GRAPHIC, &layout("")).unwrap();
        assert_eq!(
            out,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"300\" height=\"300\" viewBox=\"0 0 300 300\"><rect width=\"300\" height=\"300\"/></svg>"
        );
    }

    #[test]
    fn test_single_line_grows_height_and_view_box() {
        // 1 * (16 + 8) + 24 = 48
        let out = with_label(GRAPHIC, &layout("Scan me!")).unwrap();
        let root = RootTag::find(&out).unwrap();
        assert_eq!(root.attr(&out, "height"), Some("348"));
        assert_eq!(root.attr(&out, "width"), Some("300"));
        assert_eq!(root.attr(&out, "viewBox"), Some("0 0 300 348"));
        assert_eq!(out.matches("<text ").count(), 1);
        assert!(out.contains("x=\"150\" y=\"312\""));
        assert!(out.contains("text-anchor=\"middle\""));
        assert!(out.ends_with("Scan me!</text></svg>"));
    }

    #[test]
    fn test_wrapped_label_adds_one_text_per_line() {
        // 31 chars wrap to two lines: 2 * 24 + 24 = 72
        let text = "a".repeat(31);
        let out = with_label(GRAPHIC, &layout(&text)).unwrap();
        let root = RootTag::find(&out).unwrap();
        assert_eq!(root.attr(&out, "height"), Some("372"));
        assert_eq!(root.attr(&out, "viewBox"), Some("0 0 300 372"));
        assert_eq!(out.matches("<text ").count(), 2);
    }

    #[test]
    fn test_view_box_added_when_missing() {
        let graphic = "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"200\" height=\"200\"></svg>";
        let out = with_label(graphic, &layout("hi")).unwrap();
        let root = RootTag::find(&out).unwrap();
        assert_eq!(root.attr(&out, "viewBox"), Some("0 0 200 248"));
        assert_eq!(root.attr(&out, "height"), Some("248"));
    }

    #[test]
    fn test_scaled_view_box_grows_in_user_units() {
        let graphic = "<svg width=\"300\" height=\"300\" viewBox=\"-10 -10 150 150\"><rect width=\"150\" height=\"150\"/></svg>";
        let out = with_label(graphic, &layout("Scan me!")).unwrap();
        let root = RootTag::find(&out).unwrap();

        // 48px of label is 24 user units at 0.5 units per pixel
        assert_eq!(root.attr(&out, "height"), Some("348"));
        assert_eq!(root.attr(&out, "viewBox"), Some("-10 -10 150 174"));
        assert!(out.contains("<g transform=\"translate(-10 140) scale(0.5 0.5)\">"));
        assert!(out.contains("x=\"150\" y=\"12\""));
        assert!(out.ends_with("Scan me!</text></g></svg>"));
    }

    #[test]
    fn test_label_is_escaped() {
        let out = with_label(GRAPHIC, &layout("<b>&</b>")).unwrap();
        assert!(out.contains("&lt;b&gt;&amp;&lt;/b&gt;"));
    }

    #[test]
    fn test_non_svg_markup_is_rejected() {
        assert!(with_label("<html></html>", &layout("x")).is_err());
    }
}
