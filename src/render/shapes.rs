//! SVG path builders for modules and finder patterns.
//!
//! All functions return path data (`d` attribute contents) in pixel
//! coordinates. `s` is the module size in pixels.

use super::{CornerDotShape, CornerSquareShape, DotShape};
use crate::svg::fmt_num;

/// Which orthogonal neighbors of a module are dark.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Neighbors {
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
    pub left: bool,
}

/// Rectangle with per-corner radii `[top-left, top-right, bottom-right, bottom-left]`.
pub fn rect(x: f64, y: f64, w: f64, h: f64, radii: [f64; 4]) -> String {
    let [tl, tr, br, bl] = radii;
    let n = fmt_num;
    let mut d = format!("M{},{}", n(x + tl), n(y));
    d.push_str(&format!("H{}", n(x + w - tr)));
    if tr > 0.0 {
        d.push_str(&format!("A{r},{r} 0 0 1 {},{}", n(x + w), n(y + tr), r = n(tr)));
    }
    d.push_str(&format!("V{}", n(y + h - br)));
    if br > 0.0 {
        d.push_str(&format!("A{r},{r} 0 0 1 {},{}", n(x + w - br), n(y + h), r = n(br)));
    }
    d.push_str(&format!("H{}", n(x + bl)));
    if bl > 0.0 {
        d.push_str(&format!("A{r},{r} 0 0 1 {},{}", n(x), n(y + h - bl), r = n(bl)));
    }
    d.push_str(&format!("V{}", n(y + tl)));
    if tl > 0.0 {
        d.push_str(&format!("A{r},{r} 0 0 1 {},{}", n(x + tl), n(y), r = n(tl)));
    }
    d.push('Z');
    d
}

/// Circle centered at `(cx, cy)` as two arcs.
pub fn circle(cx: f64, cy: f64, r: f64) -> String {
    let n = fmt_num;
    format!(
        "M{},{}A{r},{r} 0 1 0 {},{}A{r},{r} 0 1 0 {},{}Z",
        n(cx - r),
        n(cy),
        n(cx + r),
        n(cy),
        n(cx - r),
        n(cy),
        r = n(r)
    )
}

/// Path for one data module at pixel position `(x, y)`.
pub fn dot(shape: DotShape, x: f64, y: f64, s: f64, nb: Neighbors) -> String {
    let half = s / 2.0;
    match shape {
        DotShape::Square => rect(x, y, s, s, [0.0; 4]),
        DotShape::Dots => circle(x + half, y + half, half),
        DotShape::Rounded => {
            let round = |a: bool, b: bool| if !a && !b { half } else { 0.0 };
            rect(
                x,
                y,
                s,
                s,
                [
                    round(nb.top, nb.left),
                    round(nb.top, nb.right),
                    round(nb.bottom, nb.right),
                    round(nb.bottom, nb.left),
                ],
            )
        }
        DotShape::Classy => {
            let tl = if !nb.top && !nb.left { half } else { 0.0 };
            let br = if !nb.bottom && !nb.right { half } else { 0.0 };
            rect(x, y, s, s, [tl, 0.0, br, 0.0])
        }
    }
}

/// Outer 7×7 ring of a finder pattern whose top-left pixel is `(x, y)`.
///
/// Returns outer and inner contours; draw with `fill-rule="evenodd"`.
pub fn corner_square(shape: CornerSquareShape, x: f64, y: f64, s: f64) -> String {
    let outer = 7.0 * s;
    let inner = 5.0 * s;
    match shape {
        CornerSquareShape::Square => format!(
            "{}{}",
            rect(x, y, outer, outer, [0.0; 4]),
            rect(x + s, y + s, inner, inner, [0.0; 4])
        ),
        CornerSquareShape::ExtraRounded => format!(
            "{}{}",
            rect(x, y, outer, outer, [2.5 * s; 4]),
            rect(x + s, y + s, inner, inner, [1.5 * s; 4])
        ),
        CornerSquareShape::Dot => {
            let c = 3.5 * s;
            format!(
                "{}{}",
                circle(x + c, y + c, 3.5 * s),
                circle(x + c, y + c, 2.5 * s)
            )
        }
    }
}

/// Inner 3×3 center of a finder pattern whose top-left pixel is `(x, y)`.
pub fn corner_dot(shape: CornerDotShape, x: f64, y: f64, s: f64) -> String {
    let origin_x = x + 2.0 * s;
    let origin_y = y + 2.0 * s;
    match shape {
        CornerDotShape::Square => rect(origin_x, origin_y, 3.0 * s, 3.0 * s, [0.0; 4]),
        CornerDotShape::Dot => circle(origin_x + 1.5 * s, origin_y + 1.5 * s, 1.5 * s),
    }
}
