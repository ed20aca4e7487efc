//! Scrolling bar graph of recent values.

use super::Drawable;
use crate::action_data::{set_color, set_color_opt, ActionFields};
use crate::error::RenderResult;
use crate::geometry::Rect;
use futures::future::{self, LocalBoxFuture};
use futures::FutureExt;
use icon_canvas::{Canvas, Color};
use log::warn;
use std::collections::VecDeque;

/// Upper bound on kept samples, whatever the rectangle width.
const MAX_HISTORY: usize = 1024;

#[derive(Debug, Clone, PartialEq)]
pub struct BarGraph {
    history: VecDeque<f64>,
    /// Width of one bar in pixels.
    pub bar_width: f64,
    pub color: Color,
    pub background: Option<Color>,
}

impl Default for BarGraph {
    fn default() -> Self {
        Self {
            history: VecDeque::new(),
            bar_width: 5.0,
            color: Color::WHITE,
            background: None,
        }
    }
}

impl BarGraph {
    /// Append a sample, clamped to 0..=100.
    pub fn push_value(&mut self, value: f64) {
        self.history.push_back(value.clamp(0.0, 100.0));
        while self.history.len() > MAX_HISTORY {
            self.history.pop_front();
        }
    }

    pub fn history(&self) -> &VecDeque<f64> {
        &self.history
    }

    /// Number of bars that fit in `rect`.
    fn capacity(&self, rect: Rect) -> usize {
        if self.bar_width <= 0.0 {
            return 0;
        }
        (rect.width() / self.bar_width).floor().max(0.0) as usize
    }

    fn draw(&mut self, canvas: &mut Canvas, rect: Rect) {
        let capacity = self.capacity(rect);
        while self.history.len() > capacity {
            self.history.pop_front();
        }

        canvas.save();
        if let Some(background) = self.background {
            canvas.set_fill_color(background);
            canvas.fill_rect(rect);
        }
        canvas.set_fill_color(self.color);
        // Newest sample is the rightmost bar.
        for (i, value) in self.history.iter().rev().enumerate() {
            let height = rect.height() * value / 100.0;
            if height <= 0.0 {
                continue;
            }
            let x1 = rect.x1 - i as f64 * self.bar_width;
            canvas.fill_rect(Rect::new(x1 - self.bar_width, rect.y1 - height, x1, rect.y1));
        }
        canvas.restore();
    }
}

impl Drawable for BarGraph {
    fn render<'a>(
        &'a mut self,
        canvas: &'a mut Canvas,
        rect: Rect,
    ) -> LocalBoxFuture<'a, RenderResult<()>> {
        self.draw(canvas, rect);
        future::ready(Ok(())).boxed_local()
    }
}

impl ActionFields for BarGraph {
    const PREFIX: &'static str = "bar";

    fn apply_field(&mut self, field: &str, value: &str) -> bool {
        match field {
            "value" => {
                match value.trim().trim_end_matches('%').parse::<f64>() {
                    Ok(v) if v.is_finite() => self.push_value(v),
                    _ => warn!("Ignoring bar graph value '{value}'"),
                }
                true
            }
            "barWidth" => {
                match value.trim().trim_end_matches("px").parse::<f64>() {
                    Ok(w) if w.is_finite() && w > 0.0 => self.bar_width = w,
                    _ => warn!("Keeping previous bar width, cannot use '{value}'"),
                }
                true
            }
            "color" => set_color(&mut self.color, field, value),
            "background" => set_color_opt(&mut self.background, field, value),
            _ => false,
        }
    }
}
