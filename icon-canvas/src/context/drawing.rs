//! Fill, stroke and clip operations for Canvas.

use super::Canvas;
use crate::convert::{bez_path_to_skia, kurbo_rect};
use crate::mask::{combine_masks, mask_bounds, MaskOp};
use crate::style::FillRule;
use kurbo::{BezPath, Rect};
use tiny_skia::{Color, Mask};

impl Canvas {
    // --- Drawing operations ---

    /// Fill a path with the current fill color under the current transform.
    pub fn fill_path(&mut self, path: &BezPath, rule: FillRule) {
        log::debug!(target: "canvas", "fill {:?}", rule);
        let Some(path) = bez_path_to_skia(path) else {
            return;
        };
        let paint = self.paint(self.state.fill_color);
        self.pixmap.fill_path(
            &path,
            &paint,
            rule.into(),
            self.state.transform,
            self.state.clip_mask.as_ref(),
        );
    }

    /// Stroke a path with the current stroke color and line style.
    pub fn stroke_path(&mut self, path: &BezPath) {
        log::debug!(target: "canvas", "stroke width={}", self.state.line_width);
        let Some(path) = bez_path_to_skia(path) else {
            return;
        };
        let stroke = tiny_skia::Stroke {
            width: self.state.line_width,
            line_cap: self.state.line_cap.into(),
            line_join: tiny_skia::LineJoin::Miter,
            miter_limit: self.state.miter_limit,
            dash: None,
        };
        let paint = self.paint(self.state.stroke_color);
        self.pixmap.stroke_path(
            &path,
            &paint,
            &stroke,
            self.state.transform,
            self.state.clip_mask.as_ref(),
        );
    }

    /// Fill a rectangle.
    pub fn fill_rect(&mut self, rect: Rect) {
        log::debug!(target: "canvas", "fillRect {:?}", rect);
        let Some(r) = kurbo_rect(rect) else {
            return;
        };
        let paint = self.paint(self.state.fill_color);
        self.pixmap.fill_rect(r, &paint, self.state.transform, self.state.clip_mask.as_ref());
    }

    // --- Clipping ---

    /// Rasterize a path into a device space coverage mask using the current transform.
    pub fn path_mask(&self, path: &BezPath, rule: FillRule) -> Option<Mask> {
        let mut mask = Mask::new(self.width, self.height)?;
        if let Some(path) = bez_path_to_skia(path) {
            mask.fill_path(&path, rule.into(), true, self.state.transform);
        }
        Some(mask)
    }

    /// Intersect the current clip with a device space coverage mask.
    pub fn clip_to_mask(&mut self, mask: Mask) {
        log::debug!(target: "canvas", "clip");
        match self.state.clip_mask.as_mut() {
            Some(current) => combine_masks(current, &mask, MaskOp::Intersect),
            None => self.state.clip_mask = Some(mask),
        }
    }

    /// Intersect the current clip with a path.
    pub fn clip_path(&mut self, path: &BezPath, rule: FillRule) {
        if let Some(mask) = self.path_mask(path, rule) {
            self.clip_to_mask(mask);
        }
    }

    /// Remove any clip.
    pub fn reset_clip(&mut self) {
        log::debug!(target: "canvas", "resetClip");
        self.state.clip_mask = None;
    }

    /// Device space bounds of the drawable area after clipping.
    ///
    /// Returns the full canvas when no clip is set and `None` when the clip
    /// excludes every pixel.
    pub fn clip_bounds(&self) -> Option<Rect> {
        match &self.state.clip_mask {
            Some(mask) => mask_bounds(mask),
            None => Some(self.bounds()),
        }
    }

    // --- Private paint helpers ---

    pub(crate) fn paint(&self, color: Color) -> tiny_skia::Paint<'static> {
        let mut paint = tiny_skia::Paint {
            anti_alias: true,
            ..Default::default()
        };
        paint.set_color(color);
        paint
    }
}

#[cfg(test)]
mod tests {
    use crate::{Canvas, FillRule};
    use kurbo::{Affine, Rect, Shape};

    fn canvas(w: u32, h: u32) -> Canvas {
        Canvas::builder().without_system_fonts().build(w, h).unwrap()
    }

    #[test]
    fn test_fill_path_pixels() {
        let mut ctx = canvas(20, 20);
        ctx.set_fill_style("#00ff00").unwrap();
        ctx.fill_path(&Rect::new(5.0, 5.0, 15.0, 15.0).to_path(0.1), FillRule::NonZero);
        assert_eq!(ctx.pixel(10, 10), Some([0, 255, 0, 255]));
        assert_eq!(ctx.pixel(2, 2), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_fill_respects_transform() {
        let mut ctx = canvas(20, 20);
        ctx.set_fill_style("#ff0000").unwrap();
        ctx.transform(Affine::translate((10.0, 10.0)));
        ctx.fill_rect(Rect::new(0.0, 0.0, 5.0, 5.0));
        assert_eq!(ctx.pixel(12, 12), Some([255, 0, 0, 255]));
        assert_eq!(ctx.pixel(2, 2), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_stroke_path_pixels() {
        let mut ctx = canvas(20, 20);
        ctx.set_stroke_style("#0000ff").unwrap();
        ctx.set_line_width(2.0);
        let mut line = kurbo::BezPath::new();
        line.move_to((0.0, 10.0));
        line.line_to((20.0, 10.0));
        ctx.stroke_path(&line);
        assert_eq!(ctx.pixel(10, 10), Some([0, 0, 255, 255]));
        assert_eq!(ctx.pixel(10, 2), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_clip_limits_fill_and_bounds() {
        let mut ctx = canvas(20, 20);
        assert_eq!(ctx.clip_bounds(), Some(Rect::new(0.0, 0.0, 20.0, 20.0)));

        ctx.clip_path(&Rect::new(0.0, 0.0, 10.0, 20.0).to_path(0.1), FillRule::NonZero);
        assert_eq!(ctx.clip_bounds(), Some(Rect::new(0.0, 0.0, 10.0, 20.0)));

        ctx.set_fill_style("#ffffff").unwrap();
        ctx.fill_rect(Rect::new(0.0, 0.0, 20.0, 20.0));
        assert_eq!(ctx.pixel(5, 5), Some([255, 255, 255, 255]));
        assert_eq!(ctx.pixel(15, 5), Some([0, 0, 0, 0]));

        ctx.reset_clip();
        assert_eq!(ctx.clip_bounds(), Some(Rect::new(0.0, 0.0, 20.0, 20.0)));
    }

    #[test]
    fn test_nested_clips_intersect() {
        let mut ctx = canvas(20, 20);
        ctx.clip_path(&Rect::new(0.0, 0.0, 10.0, 20.0).to_path(0.1), FillRule::NonZero);
        ctx.clip_path(&Rect::new(5.0, 0.0, 20.0, 20.0).to_path(0.1), FillRule::NonZero);
        assert_eq!(ctx.clip_bounds(), Some(Rect::new(5.0, 0.0, 10.0, 20.0)));
    }

    #[test]
    fn test_clip_is_saved_and_restored() {
        let mut ctx = canvas(20, 20);
        ctx.save();
        ctx.clip_path(&Rect::new(0.0, 0.0, 4.0, 4.0).to_path(0.1), FillRule::NonZero);
        ctx.restore();
        assert_eq!(ctx.clip_bounds(), Some(ctx.bounds()));
    }
}
