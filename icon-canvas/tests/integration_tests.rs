//! Integration tests for icon-canvas.

use icon_canvas::{combine_masks, Canvas, FillRule, MaskOp};
use kurbo::{Affine, Circle, Rect, Shape};

fn canvas(width: u32, height: u32) -> Canvas {
    Canvas::builder()
        .without_system_fonts()
        .build(width, height)
        .unwrap()
}

/// Drawing a circle through a rotated, scaled transform lands where kurbo says it should.
#[test]
fn test_transformed_fill_matches_affine() {
    let mut ctx = canvas(100, 100);
    ctx.set_fill_style("#ff0000").unwrap();

    let affine = Affine::translate((50.0, 50.0)) * Affine::rotate(std::f64::consts::FRAC_PI_2);
    ctx.transform(affine);
    ctx.fill_path(&Circle::new((20.0, 0.0), 5.0).to_path(0.1), FillRule::NonZero);

    // Rotating (20, 0) by 90 degrees puts it at (0, 20), then translated to (50, 70)
    let center = affine * kurbo::Point::new(20.0, 0.0);
    assert!((center.x - 50.0).abs() < 1e-6 && (center.y - 70.0).abs() < 1e-6);
    assert_eq!(ctx.pixel(50, 70), Some([255, 0, 0, 255]));
    assert_eq!(ctx.pixel(70, 50), Some([0, 0, 0, 0]));
}

/// A mask built from a difference of two paths clips subsequent drawing.
#[test]
fn test_clip_to_combined_mask() {
    let mut ctx = canvas(40, 40);
    let mut outer = ctx
        .path_mask(&Rect::new(0.0, 0.0, 40.0, 40.0).to_path(0.1), FillRule::NonZero)
        .unwrap();
    let inner = ctx
        .path_mask(&Rect::new(10.0, 10.0, 30.0, 30.0).to_path(0.1), FillRule::NonZero)
        .unwrap();
    combine_masks(&mut outer, &inner, MaskOp::Difference);
    ctx.clip_to_mask(outer);

    ctx.set_fill_style("#000000").unwrap();
    ctx.fill_rect(Rect::new(0.0, 0.0, 40.0, 40.0));

    assert_eq!(ctx.pixel(5, 5), Some([0, 0, 0, 255]));
    assert_eq!(ctx.pixel(20, 20), Some([0, 0, 0, 0]));
}

/// Masks are rasterized under the current transform.
#[test]
fn test_path_mask_uses_transform() {
    let mut ctx = canvas(40, 40);
    ctx.transform(Affine::translate((20.0, 20.0)));
    ctx.clip_path(&Rect::new(0.0, 0.0, 10.0, 10.0).to_path(0.1), FillRule::NonZero);
    assert_eq!(ctx.clip_bounds(), Some(Rect::new(20.0, 20.0, 30.0, 30.0)));
}

