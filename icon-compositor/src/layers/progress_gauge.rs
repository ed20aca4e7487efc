//! Round progress gauge: an arc whose sweep follows a percentage.

use super::Drawable;
use crate::action_data::{set_color, set_color_opt, set_number, set_parsed, ActionFields};
use crate::error::RenderResult;
use crate::geometry::{Rect, Vec2, PATH_TOLERANCE};
use futures::future::{self, LocalBoxFuture};
use futures::FutureExt;
use icon_canvas::{Canvas, Color, LineCap};
use kurbo::{Arc, BezPath, Shape};
use std::f64::consts::TAU;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SweepDirection {
    #[default]
    Clockwise,
    CounterClockwise,
}

impl FromStr for SweepDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cw" | "clockwise" => Ok(SweepDirection::Clockwise),
            "ccw" | "counterclockwise" | "anticlockwise" => Ok(SweepDirection::CounterClockwise),
            other => Err(format!("unknown direction: '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoundProgressGauge {
    /// Progress in percent.
    pub value: f64,
    /// Degrees clockwise from 12 o'clock.
    pub start_angle: f64,
    pub direction: SweepDirection,
    /// Percentages of half the shorter side.
    pub radius: f64,
    pub line_width: f64,
    pub cap: LineCap,
    pub color: Color,
    pub background: Option<Color>,
}

impl Default for RoundProgressGauge {
    fn default() -> Self {
        Self {
            value: 0.0,
            start_angle: 0.0,
            direction: SweepDirection::Clockwise,
            radius: 90.0,
            line_width: 10.0,
            cap: LineCap::Butt,
            color: Color::WHITE,
            background: None,
        }
    }
}

impl RoundProgressGauge {
    fn arc(&self, rect: Rect, sweep: f64) -> BezPath {
        let half = rect.width().min(rect.height()) / 2.0;
        let radius = half * self.radius / 100.0;
        let sweep = match self.direction {
            SweepDirection::Clockwise => sweep,
            SweepDirection::CounterClockwise => -sweep,
        };
        Arc {
            center: rect.center(),
            radii: Vec2::new(radius, radius),
            start_angle: (self.start_angle - 90.0).to_radians(),
            sweep_angle: sweep,
            x_rotation: 0.0,
        }
        .to_path(PATH_TOLERANCE)
    }

    /// Outline of the indicator for `rect`, if there is any progress.
    pub fn indicator_path(&self, rect: Rect) -> Option<BezPath> {
        let fraction = self.value.clamp(0.0, 100.0) / 100.0;
        (fraction > 0.0).then(|| self.arc(rect, TAU * fraction))
    }

    fn draw(&self, canvas: &mut Canvas, rect: Rect) {
        let half = rect.width().min(rect.height()) / 2.0;
        let line_width = (half * self.line_width / 100.0) as f32;
        if line_width <= 0.0 {
            return;
        }

        canvas.save();
        canvas.set_line_width(line_width);
        if let Some(background) = self.background {
            canvas.set_line_cap(LineCap::Butt);
            canvas.set_stroke_color(background);
            canvas.stroke_path(&self.arc(rect, TAU));
        }
        if let Some(indicator) = self.indicator_path(rect) {
            canvas.set_line_cap(self.cap);
            canvas.set_stroke_color(self.color);
            canvas.stroke_path(&indicator);
        }
        canvas.restore();
    }
}

impl Drawable for RoundProgressGauge {
    fn render<'a>(
        &'a mut self,
        canvas: &'a mut Canvas,
        rect: Rect,
    ) -> LocalBoxFuture<'a, RenderResult<()>> {
        self.draw(canvas, rect);
        future::ready(Ok(())).boxed_local()
    }
}

impl ActionFields for RoundProgressGauge {
    const PREFIX: &'static str = "gauge";

    fn apply_field(&mut self, field: &str, value: &str) -> bool {
        match field {
            "value" => set_number(&mut self.value, field, value.trim().trim_end_matches('%')),
            "startAngle" => set_number(&mut self.start_angle, field, value),
            "direction" => set_parsed(&mut self.direction, field, value),
            "radius" => set_number(&mut self.radius, field, value.trim().trim_end_matches('%')),
            "lineWidth" => {
                set_number(&mut self.line_width, field, value.trim().trim_end_matches('%'))
            }
            "cap" => set_parsed(&mut self.cap, field, value),
            "color" => set_color(&mut self.color, field, value),
            "background" => set_color_opt(&mut self.background, field, value),
            _ => false,
        }
    }
}
