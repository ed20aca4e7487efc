//! Filled and/or stroked rectangle.

use super::{CornerRadii, Drawable};
use crate::action_data::{set_color_opt, set_parsed, ActionFields};
use crate::error::RenderResult;
use crate::geometry::{Alignment, Rect, SizeValue, UnitValue};
use futures::future::{self, LocalBoxFuture};
use futures::FutureExt;
use icon_canvas::{Canvas, Color, FillRule};

#[derive(Debug, Clone, PartialEq)]
pub struct StyledRectangle {
    pub size: SizeValue,
    pub align: Alignment,
    pub radius: CornerRadii,
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    /// Percentages are relative to the shorter side.
    pub stroke_width: UnitValue,
}

impl Default for StyledRectangle {
    fn default() -> Self {
        Self {
            size: SizeValue::FULL,
            align: Alignment::CENTER,
            radius: CornerRadii::default(),
            fill: Some(Color::WHITE),
            stroke: None,
            stroke_width: UnitValue::px(2.0),
        }
    }
}

impl StyledRectangle {
    fn draw(&self, canvas: &mut Canvas, rect: Rect) {
        let mut bounds = self.align.place(self.size.resolve(rect.size()), rect);
        let stroke = self.stroke.map(|color| {
            let width = self
                .stroke_width
                .resolve(bounds.width().min(bounds.height()))
                .max(0.0);
            (color, width)
        });
        // Keep the stroke inside the placed bounds.
        if let Some((_, width)) = stroke {
            bounds = bounds.inset(-width / 2.0);
        }
        let outline = self.radius.outline(bounds);

        canvas.save();
        if let Some(fill) = self.fill {
            canvas.set_fill_color(fill);
            canvas.fill_path(&outline, FillRule::NonZero);
        }
        if let Some((color, width)) = stroke.filter(|(_, w)| *w > 0.0) {
            canvas.set_stroke_color(color);
            canvas.set_line_width(width as f32);
            canvas.stroke_path(&outline);
        }
        canvas.restore();
    }
}

impl Drawable for StyledRectangle {
    fn render<'a>(
        &'a mut self,
        canvas: &'a mut Canvas,
        rect: Rect,
    ) -> LocalBoxFuture<'a, RenderResult<()>> {
        self.draw(canvas, rect);
        future::ready(Ok(())).boxed_local()
    }
}

impl ActionFields for StyledRectangle {
    const PREFIX: &'static str = "srect";

    fn apply_field(&mut self, field: &str, value: &str) -> bool {
        match field {
            "size" => set_parsed(&mut self.size, field, value),
            "align" => set_parsed(&mut self.align, field, value),
            "radius" => set_parsed(&mut self.radius, field, value),
            "fill" | "color" => set_color_opt(&mut self.fill, field, value),
            "stroke" => set_color_opt(&mut self.stroke, field, value),
            "strokeWidth" => set_parsed(&mut self.stroke_width, field, value),
            _ => false,
        }
    }
}
