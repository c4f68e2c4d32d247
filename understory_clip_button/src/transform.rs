// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Affine helpers used on the per-frame hit test path.

use kurbo::{Affine, Point, Rect};

/// Inverse used when a transform cannot be inverted.
///
/// It sends every point to `(-f64::MAX, -f64::MAX)`, which no hit area
/// contains.
pub const DEGENERATE_INVERSE: Affine = Affine::new([0.0, 0.0, 0.0, 0.0, -f64::MAX, -f64::MAX]);

/// Invert a 2D affine transform.
///
/// Singular transforms (zero or non-finite determinant) do not panic; they
/// yield [`DEGENERATE_INVERSE`] so the caller's hit test simply misses.
/// The determinant is computed in `f64`, so a transform whose determinant
/// underflows to zero (for example a uniform scale of `1e-200`) counts as
/// singular too.
///
/// ```
/// use kurbo::{Affine, Point, Vec2};
/// use understory_clip_button::transform::{apply, invert, DEGENERATE_INVERSE};
///
/// let m = Affine::translate(Vec2::new(10.0, 5.0));
/// assert_eq!(apply(Point::new(10.0, 5.0), &invert(&m)), Point::ZERO);
/// assert_eq!(invert(&Affine::scale(0.0)), DEGENERATE_INVERSE);
/// ```
pub fn invert(m: &Affine) -> Affine {
    let det = m.determinant();
    if det == 0.0 || !det.is_finite() {
        return DEGENERATE_INVERSE;
    }
    let inv = m.inverse();
    if inv.is_finite() {
        inv
    } else {
        DEGENERATE_INVERSE
    }
}

/// Map `pt` through `m`.
pub fn apply(pt: Point, m: &Affine) -> Point {
    *m * pt
}

/// Transform an axis-aligned `Rect` by an `Affine` and return a conservative
/// axis-aligned bounding box in the target space.
pub fn transform_rect_bbox(m: &Affine, rect: Rect) -> Rect {
    let [a, b, c, d, e, f] = m.as_coeffs();
    let min_x = (a * rect.x0).min(a * rect.x1) + (c * rect.y0).min(c * rect.y1);
    let max_x = (a * rect.x0).max(a * rect.x1) + (c * rect.y0).max(c * rect.y1);
    let min_y = (b * rect.x0).min(b * rect.x1) + (d * rect.y0).min(d * rect.y1);
    let max_y = (b * rect.x0).max(b * rect.x1) + (d * rect.y0).max(d * rect.y1);
    Rect::new(min_x + e, min_y + f, max_x + e, max_y + f)
}
