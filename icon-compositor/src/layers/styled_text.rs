//! Text layer, drawn as glyph outlines.

use super::Drawable;
use crate::action_data::{set_color, set_color_opt, set_number, set_parsed, ActionFields};
use crate::error::RenderResult;
use crate::geometry::{Alignment, HAlign, Point, Rect, VAlign};
use futures::future::{self, LocalBoxFuture};
use futures::FutureExt;
use icon_canvas::{parse_font, Canvas, Color, FillRule, ParsedFont, TextAlign, TextBaseline};
use log::{debug, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct StyledText {
    /// Lines are separated by `\n` (a literal backslash-n in action data).
    pub text: String,
    pub font: ParsedFont,
    pub color: Color,
    pub align: Alignment,
    /// Offset of the anchor as a percentage of the rectangle size.
    pub offset_x: f64,
    pub offset_y: f64,
    pub stroke: Option<Color>,
    pub stroke_width: f64,
    pub letter_spacing: f64,
}

impl Default for StyledText {
    fn default() -> Self {
        Self {
            text: String::new(),
            font: ParsedFont::default().with_size(16.0),
            color: Color::WHITE,
            align: Alignment::CENTER,
            offset_x: 0.0,
            offset_y: 0.0,
            stroke: None,
            stroke_width: 1.0,
            letter_spacing: 0.0,
        }
    }
}

impl StyledText {
    /// Point the text block is anchored at, with its alignment and baseline.
    pub fn anchor(&self, rect: Rect) -> (Point, TextAlign, TextBaseline) {
        let (x, text_align) = match self.align.h {
            HAlign::Left => (rect.x0, TextAlign::Left),
            HAlign::Center => (rect.center().x, TextAlign::Center),
            HAlign::Right => (rect.x1, TextAlign::Right),
        };
        let (y, baseline) = match self.align.v {
            VAlign::Top => (rect.y0, TextBaseline::Top),
            VAlign::Middle => (rect.center().y, TextBaseline::Middle),
            VAlign::Bottom => (rect.y1, TextBaseline::Bottom),
        };
        let point = Point::new(
            x + self.offset_x * rect.width() / 100.0,
            y + self.offset_y * rect.height() / 100.0,
        );
        (point, text_align, baseline)
    }

    fn draw(&self, canvas: &mut Canvas, rect: Rect) {
        if self.text.trim().is_empty() {
            return;
        }
        let (anchor, align, baseline) = self.anchor(rect);

        canvas.save();
        canvas.set_parsed_font(self.font.clone());
        canvas.set_text_align(align);
        canvas.set_text_baseline(baseline);
        canvas.set_letter_spacing(self.letter_spacing as f32);
        match canvas.text_path(&self.text, anchor.x as f32, anchor.y as f32) {
            Some(outline) => {
                canvas.set_fill_color(self.color);
                canvas.fill_path(&outline, FillRule::NonZero);
                if let Some(stroke) = self.stroke.filter(|_| self.stroke_width > 0.0) {
                    canvas.set_stroke_color(stroke);
                    canvas.set_line_width(self.stroke_width as f32);
                    canvas.stroke_path(&outline);
                }
            }
            None => debug!("No glyph outlines for text '{}'", self.text),
        }
        canvas.restore();
    }
}

impl Drawable for StyledText {
    fn render<'a>(
        &'a mut self,
        canvas: &'a mut Canvas,
        rect: Rect,
    ) -> LocalBoxFuture<'a, RenderResult<()>> {
        self.draw(canvas, rect);
        future::ready(Ok(())).boxed_local()
    }
}

impl ActionFields for StyledText {
    const PREFIX: &'static str = "text";

    fn apply_field(&mut self, field: &str, value: &str) -> bool {
        match field {
            "text" => {
                self.text = value.replace("\\n", "\n");
                true
            }
            "font" => {
                match parse_font(value) {
                    Ok(font) => self.font = font,
                    Err(err) => warn!("Keeping previous font: {err}"),
                }
                true
            }
            "color" => set_color(&mut self.color, field, value),
            "align" => set_parsed(&mut self.align, field, value),
            "offsetX" => set_number(&mut self.offset_x, field, value),
            "offsetY" => set_number(&mut self.offset_y, field, value),
            "stroke" => set_color_opt(&mut self.stroke, field, value),
            "strokeWidth" => set_number(&mut self.stroke_width, field, value),
            "letterSpacing" => set_number(&mut self.letter_spacing, field, value),
            _ => false,
        }
    }
}
