//! Conversions between `kurbo` geometry and `tiny-skia` types.
//!
//! `kurbo::Affine` stores coefficients as `[a, b, c, d, e, f]`:
//! ```text
//! | a c e |
//! | b d f |
//! | 0 0 1 |
//! ```
//! which maps onto `tiny_skia::Transform::from_row(sx, ky, kx, sy, tx, ty)`.

use kurbo::{Affine, BezPath, PathEl};
use tiny_skia::Transform;

/// Convert a `kurbo` affine transform into a `tiny-skia` transform.
pub fn affine_to_transform(affine: Affine) -> Transform {
    let [a, b, c, d, e, f] = affine.as_coeffs();
    Transform::from_row(a as f32, b as f32, c as f32, d as f32, e as f32, f as f32)
}

/// Convert a `tiny-skia` transform into a `kurbo` affine transform.
pub fn transform_to_affine(t: Transform) -> Affine {
    Affine::new([
        t.sx as f64,
        t.ky as f64,
        t.kx as f64,
        t.sy as f64,
        t.tx as f64,
        t.ty as f64,
    ])
}

/// Convert a `kurbo` path into a `tiny-skia` path.
///
/// Returns `None` for empty or degenerate paths, which tiny-skia refuses to build.
pub fn bez_path_to_skia(path: &BezPath) -> Option<tiny_skia::Path> {
    let mut builder = tiny_skia::PathBuilder::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => builder.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => builder.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(c, p) => builder.quad_to(c.x as f32, c.y as f32, p.x as f32, p.y as f32),
            PathEl::CurveTo(c1, c2, p) => builder.cubic_to(
                c1.x as f32,
                c1.y as f32,
                c2.x as f32,
                c2.y as f32,
                p.x as f32,
                p.y as f32,
            ),
            PathEl::ClosePath => builder.close(),
        }
    }
    builder.finish()
}

/// Convert a `kurbo` rectangle into a `tiny-skia` rectangle.
pub fn kurbo_rect(rect: kurbo::Rect) -> Option<tiny_skia::Rect> {
    let rect = rect.abs();
    tiny_skia::Rect::from_ltrb(rect.x0 as f32, rect.y0 as f32, rect.x1 as f32, rect.y1 as f32)
}
