use super::{Station, TickGeometry, TickMetrics};
use crate::action_data::set_parsed;
use crate::geometry::{Point, Rect, Vec2};
use std::f64::consts::FRAC_PI_2;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// Left to right, outside is up.
    #[default]
    Horizontal,
    /// Bottom to top, outside is left.
    Vertical,
}

impl FromStr for Orientation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "horizontal" | "h" => Ok(Orientation::Horizontal),
            "vertical" | "v" => Ok(Orientation::Vertical),
            other => Err(format!("unknown orientation: '{other}'")),
        }
    }
}

/// Straight line through the middle of the layout box.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Linear {
    pub orientation: Orientation,
}

impl TickGeometry for Linear {
    const PREFIX: &'static str = "lticks";

    fn apply_field(&mut self, field: &str, value: &str) -> bool {
        match field {
            "orientation" => set_parsed(&mut self.orientation, field, value),
            _ => false,
        }
    }

    fn metrics(&self, bounds: Rect) -> TickMetrics {
        let center = bounds.center();
        let (origin, extent) = match self.orientation {
            Orientation::Horizontal => (
                Point::new(center.x - bounds.width() / 2.0, center.y),
                Vec2::new(bounds.width(), bounds.height()),
            ),
            Orientation::Vertical => (
                Point::new(center.x, center.y + bounds.height() / 2.0),
                Vec2::new(bounds.height(), bounds.width()),
            ),
        };
        TickMetrics {
            origin,
            extent,
            length_scale: extent.x.min(extent.y),
        }
    }

    fn divisor(&self, count: usize) -> usize {
        count.saturating_sub(1).max(1)
    }

    fn station(&self, metrics: &TickMetrics, t: f64) -> Station {
        let along = t * metrics.extent.x;
        match self.orientation {
            Orientation::Horizontal => Station {
                point: metrics.origin + Vec2::new(along, 0.0),
                normal: Vec2::new(0.0, -1.0),
                tangent_angle: 0.0,
            },
            Orientation::Vertical => Station {
                point: metrics.origin - Vec2::new(0.0, along),
                normal: Vec2::new(-1.0, 0.0),
                tangent_angle: -FRAC_PI_2,
            },
        }
    }
}
