//! Coverage mask arithmetic.
//!
//! Area boolean operations between paths are evaluated on rasterized coverage
//! masks. Each byte is an 8-bit coverage value, so anti-aliased edges blend
//! the same way on both sides of an operation.

use kurbo::Rect;
use tiny_skia::Mask;

/// Boolean operation applied to two coverage masks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskOp {
    /// Area covered by either mask.
    Union,
    /// Area covered by both masks.
    Intersect,
    /// Area of the destination not covered by the source.
    Difference,
    /// Area of the source not covered by the destination.
    ReverseDifference,
    /// Area covered by exactly one mask.
    Xor,
}

#[inline]
fn mul(a: u8, b: u8) -> u8 {
    ((a as u16 * b as u16 + 127) / 255) as u8
}

/// Combine `src` into `dst` in place.
///
/// Masks of different sizes are left untouched.
pub fn combine_masks(dst: &mut Mask, src: &Mask, op: MaskOp) {
    if dst.width() != src.width() || dst.height() != src.height() {
        log::warn!(
            "ignoring mask combination of mismatched sizes {}x{} and {}x{}",
            dst.width(),
            dst.height(),
            src.width(),
            src.height()
        );
        return;
    }

    for (d, &s) in dst.data_mut().iter_mut().zip(src.data()) {
        let a = *d;
        *d = match op {
            MaskOp::Union => a.saturating_add(mul(s, 255 - a)),
            MaskOp::Intersect => mul(a, s),
            MaskOp::Difference => mul(a, 255 - s),
            MaskOp::ReverseDifference => mul(s, 255 - a),
            MaskOp::Xor => mul(a, 255 - s).saturating_add(mul(s, 255 - a)),
        };
    }
}

/// Bounding box of all non-zero coverage, in device pixels.
pub fn mask_bounds(mask: &Mask) -> Option<Rect> {
    let width = mask.width() as usize;
    let mut bounds: Option<(usize, usize, usize, usize)> = None;

    for (row, line) in mask.data().chunks_exact(width).enumerate() {
        let Some(first) = line.iter().position(|&c| c != 0) else {
            continue;
        };
        let last = line.iter().rposition(|&c| c != 0).unwrap_or(first);
        bounds = Some(match bounds {
            None => (first, row, last, row),
            Some((x0, y0, x1, _)) => (x0.min(first), y0, x1.max(last), row),
        });
    }

    bounds.map(|(x0, y0, x1, y1)| Rect::new(x0 as f64, y0 as f64, (x1 + 1) as f64, (y1 + 1) as f64))
}
