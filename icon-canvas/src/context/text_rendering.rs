//! Text operations for Canvas.

use super::Canvas;
use crate::font_parser::ParsedFont;
use crate::style::{TextAlign, TextBaseline};
use crate::text::{self, TextStyle};
use kurbo::BezPath;

impl Canvas {
    /// Set an already parsed font.
    pub fn set_parsed_font(&mut self, font: ParsedFont) {
        self.state.font = font;
    }

    /// Set the text alignment.
    pub fn set_text_align(&mut self, align: TextAlign) {
        self.state.text_align = align;
    }

    /// Set the text baseline.
    pub fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.state.text_baseline = baseline;
    }

    /// Set the letter spacing for text rendering (in pixels).
    pub fn set_letter_spacing(&mut self, spacing: f32) {
        self.state.letter_spacing = spacing;
    }

    /// Outline text into a user space path anchored at `(x, y)`, using the
    /// current font, alignment, baseline and letter spacing.
    ///
    /// The current transform is not applied; fill the result with
    /// [`Canvas::fill_path`] to draw it transformed.
    pub fn text_path(&mut self, text: &str, x: f32, y: f32) -> Option<BezPath> {
        let style = TextStyle {
            font: &self.state.font,
            letter_spacing: self.state.letter_spacing,
            align: self.state.text_align,
            baseline: self.state.text_baseline,
        };
        text::outline_text(&mut self.font_system, &mut self.swash_cache, text, &style, x, y)
    }

    /// Outline text with an explicit font and anchoring, leaving the drawing state untouched.
    pub fn text_path_with(
        &mut self,
        text: &str,
        font: &ParsedFont,
        align: TextAlign,
        baseline: TextBaseline,
        x: f32,
        y: f32,
    ) -> Option<BezPath> {
        let style = TextStyle {
            font,
            letter_spacing: 0.0,
            align,
            baseline,
        };
        text::outline_text(&mut self.font_system, &mut self.swash_cache, text, &style, x, y)
    }
}
