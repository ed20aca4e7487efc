//! Drawing state that can be saved and restored.

use crate::font_parser::ParsedFont;
use crate::style::{LineCap, TextAlign, TextBaseline};
use tiny_skia::{Color, Mask, Transform};

/// Drawing state that can be saved and restored.
#[derive(Clone)]
pub struct DrawingState {
    /// Current fill color.
    pub fill_color: Color,
    /// Current stroke color.
    pub stroke_color: Color,
    /// Current line width.
    pub line_width: f32,
    /// Current line cap style.
    pub line_cap: LineCap,
    /// Current miter limit.
    pub miter_limit: f32,
    /// Current font specification.
    pub font: ParsedFont,
    /// Current text alignment.
    pub text_align: TextAlign,
    /// Current text baseline.
    pub text_baseline: TextBaseline,
    /// Letter spacing for text rendering (in pixels).
    pub letter_spacing: f32,
    /// Current transform matrix.
    pub transform: Transform,
    /// Device space coverage mask of the current clip, if any.
    pub clip_mask: Option<Mask>,
}

impl Default for DrawingState {
    fn default() -> Self {
        Self {
            fill_color: Color::BLACK,
            stroke_color: Color::BLACK,
            line_width: 1.0,
            line_cap: LineCap::default(),
            miter_limit: 10.0,
            font: ParsedFont::default(),
            text_align: TextAlign::default(),
            text_baseline: TextBaseline::default(),
            letter_spacing: 0.0,
            transform: Transform::identity(),
            clip_mask: None,
        }
    }
}

impl std::fmt::Debug for DrawingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawingState")
            .field("fill_color", &self.fill_color)
            .field("stroke_color", &self.stroke_color)
            .field("line_width", &self.line_width)
            .field("font", &self.font)
            .field("transform", &self.transform)
            .field("clipped", &self.clip_mask.is_some())
            .finish_non_exhaustive()
    }
}
