use super::{Station, TickGeometry, TickMetrics};
use crate::action_data::set_number;
use crate::geometry::{Rect, Vec2};

/// Elliptical arc, angles in degrees clockwise from 12 o'clock.
#[derive(Debug, Clone, PartialEq)]
pub struct Circular {
    pub start_angle: f64,
    pub end_angle: f64,
}

impl Default for Circular {
    fn default() -> Self {
        Self {
            start_angle: 0.0,
            end_angle: 360.0,
        }
    }
}

impl Circular {
    fn is_full_circle(&self) -> bool {
        (self.end_angle - self.start_angle).abs() >= 360.0
    }
}

impl TickGeometry for Circular {
    const PREFIX: &'static str = "cticks";

    fn apply_field(&mut self, field: &str, value: &str) -> bool {
        match field {
            "startAngle" => set_number(&mut self.start_angle, field, value),
            "endAngle" => set_number(&mut self.end_angle, field, value),
            _ => false,
        }
    }

    fn metrics(&self, bounds: Rect) -> TickMetrics {
        let radii = Vec2::new(bounds.width() / 2.0, bounds.height() / 2.0);
        TickMetrics {
            origin: bounds.center(),
            extent: radii,
            length_scale: radii.x.min(radii.y),
        }
    }

    /// A full circle has no tick at the end, which would repeat the first.
    fn divisor(&self, count: usize) -> usize {
        if self.is_full_circle() {
            count.max(1)
        } else {
            count.saturating_sub(1).max(1)
        }
    }

    fn station(&self, metrics: &TickMetrics, t: f64) -> Station {
        let theta = (self.start_angle + t * (self.end_angle - self.start_angle)).to_radians();
        let (sin, cos) = theta.sin_cos();
        Station {
            point: metrics.origin + Vec2::new(metrics.extent.x * sin, -metrics.extent.y * cos),
            normal: Vec2::new(sin, -cos),
            tangent_angle: theta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::{CircularTicks, TickDivision, TickPlacement};
    use super::*;
    use crate::geometry::Point;
    use icon_canvas::Canvas;
    use kurbo::PathEl;

    fn segments(path: &kurbo::BezPath) -> Vec<(Point, Point)> {
        let mut out = Vec::new();
        let mut start = None;
        for el in path.elements() {
            match el {
                PathEl::MoveTo(p) => start = Some(*p),
                PathEl::LineTo(p) => out.push((start.unwrap(), *p)),
                _ => panic!("unexpected element {el:?}"),
            }
        }
        out
    }

    #[test]
    fn test_four_majors_at_right_angles_from_north() {
        let mut ticks = CircularTicks::default();
        ticks.set_major(TickDivision {
            count: 4,
            placement: TickPlacement::Inside,
            ..TickDivision::major()
        });
        let mut canvas = Canvas::builder().without_system_fonts().build(100, 100).unwrap();
        let layout = ticks.layout(&mut canvas, Rect::new(0.0, 0.0, 100.0, 100.0));
        let segs = segments(layout.major.as_ref().unwrap());
        assert_eq!(segs.len(), 4);

        let center = Point::new(50.0, 50.0);
        let expected = [(0.0, -1.0), (1.0, 0.0), (0.0, 1.0), (-1.0, 0.0)];
        for ((from, _), (ex, ey)) in segs.iter().zip(expected) {
            let dir = (*from - center) / 50.0;
            assert!((dir.x - ex).abs() < 1e-9 && (dir.y - ey).abs() < 1e-9, "{dir:?}");
        }
        // Inside ticks point toward the centre.
        let (from, to) = segs[0];
        assert!(to.y > from.y);
    }

    #[test]
    fn test_partial_arc_includes_both_ends() {
        let geometry = Circular {
            start_angle: -90.0,
            end_angle: 90.0,
        };
        assert_eq!(geometry.divisor(3), 2);
        let metrics = geometry.metrics(Rect::new(0.0, 0.0, 100.0, 100.0));
        let last = geometry.station(&metrics, geometry.fraction(2, 3));
        assert!((last.point - Point::new(100.0, 50.0)).hypot() < 1e-9);
    }

    #[test]
    fn test_elliptical_metrics() {
        let metrics = Circular::default().metrics(Rect::new(0.0, 0.0, 200.0, 100.0));
        assert_eq!(metrics.extent, Vec2::new(100.0, 50.0));
        assert_eq!(metrics.length_scale, 50.0);
        let east = Circular::default().station(&metrics, 0.25);
        assert!((east.point - Point::new(200.0, 50.0)).hypot() < 1e-9);
    }
}
