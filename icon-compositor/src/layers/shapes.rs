//! Path producers: rectangle, ellipse and free-form SVG paths.

use super::PathProducer;
use crate::action_data::{set_parsed, ActionFields};
use crate::geometry::{Affine, Alignment, BezPath, Rect, SizeValue, UnitValue, PATH_TOLERANCE};
use crate::path::PathOperation;
use kurbo::{Ellipse, RoundedRect, RoundedRectRadii, Shape};
use log::warn;
use std::str::FromStr;

/// Size, alignment and boolean operation shared by every path producer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShapePlacement {
    pub size: SizeValue,
    pub align: Alignment,
    pub operation: PathOperation,
}

impl ShapePlacement {
    /// The shape's bounding rectangle inside `rect`.
    pub fn place(&self, rect: Rect) -> Rect {
        self.align.place(self.size.resolve(rect.size()), rect)
    }

    fn apply_field(&mut self, field: &str, value: &str) -> bool {
        match field {
            "size" => set_parsed(&mut self.size, field, value),
            "align" => set_parsed(&mut self.align, field, value),
            "operation" | "op" => set_parsed(&mut self.operation, field, value),
            _ => false,
        }
    }
}

/// Corner radii (top-left, top-right, bottom-right, bottom-left).
///
/// Percentages are relative to half of the shorter side.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CornerRadii(pub [UnitValue; 4]);

impl CornerRadii {
    pub fn uniform(radius: UnitValue) -> Self {
        Self([radius; 4])
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(UnitValue::is_zero)
    }

    /// Pixel radii for a shape of the given bounds.
    pub fn resolve(&self, bounds: Rect) -> RoundedRectRadii {
        let half = bounds.width().min(bounds.height()).abs() / 2.0;
        let [tl, tr, br, bl] = self.0.map(|r| r.resolve(half).clamp(0.0, half));
        RoundedRectRadii::new(tl, tr, br, bl)
    }

    /// Outline of `bounds` with these corners.
    pub fn outline(&self, bounds: Rect) -> BezPath {
        if self.is_zero() {
            bounds.to_path(PATH_TOLERANCE)
        } else {
            RoundedRect::from_rect(bounds, self.resolve(bounds)).to_path(PATH_TOLERANCE)
        }
    }
}

/// Parses one radius for all corners or four comma separated radii.
impl FromStr for CornerRadii {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let radii = s
            .split(',')
            .map(str::parse)
            .collect::<Result<Vec<UnitValue>, _>>()?;
        match radii.as_slice() {
            [r] => Ok(Self::uniform(*r)),
            [tl, tr, br, bl] => Ok(Self([*tl, *tr, *br, *bl])),
            _ => Err(format!("expected 1 or 4 radii, got {}", radii.len())),
        }
    }
}

/// Rectangle, optionally with rounded corners.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RectanglePath {
    pub placement: ShapePlacement,
    pub radius: CornerRadii,
}

impl PathProducer for RectanglePath {
    fn operation(&self) -> PathOperation {
        self.placement.operation
    }

    fn build_path(&self, rect: Rect) -> Option<BezPath> {
        Some(self.radius.outline(self.placement.place(rect)))
    }
}

impl ActionFields for RectanglePath {
    const PREFIX: &'static str = "rect";

    fn apply_field(&mut self, field: &str, value: &str) -> bool {
        match field {
            "radius" => set_parsed(&mut self.radius, field, value),
            _ => self.placement.apply_field(field, value),
        }
    }
}

/// Ellipse inscribed in the placed rectangle.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EllipsePath {
    pub placement: ShapePlacement,
}

impl PathProducer for EllipsePath {
    fn operation(&self) -> PathOperation {
        self.placement.operation
    }

    fn build_path(&self, rect: Rect) -> Option<BezPath> {
        Some(Ellipse::from_rect(self.placement.place(rect)).to_path(PATH_TOLERANCE))
    }
}

impl ActionFields for EllipsePath {
    const PREFIX: &'static str = "ellipse";

    fn apply_field(&mut self, field: &str, value: &str) -> bool {
        self.placement.apply_field(field, value)
    }
}

/// Side of the square viewbox free-form path data is written in.
const FREEFORM_VIEWBOX: f64 = 100.0;

/// SVG path data in a 0..100 viewbox, stretched over the placed rectangle.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FreeformPath {
    pub placement: ShapePlacement,
    data: String,
    path: BezPath,
}

impl FreeformPath {
    /// Replace the path data. Invalid data keeps the previous path.
    pub fn set_data(&mut self, data: &str) -> Result<(), String> {
        let path = parse_svg_path(data)?;
        self.data = data.to_string();
        self.path = path;
        Ok(())
    }

    pub fn data(&self) -> &str {
        &self.data
    }
}

impl PathProducer for FreeformPath {
    fn operation(&self) -> PathOperation {
        self.placement.operation
    }

    fn build_path(&self, rect: Rect) -> Option<BezPath> {
        if self.path.elements().is_empty() {
            return None;
        }
        let bounds = self.placement.place(rect);
        let mut path = self.path.clone();
        path.apply_affine(
            Affine::translate(bounds.origin().to_vec2())
                * Affine::scale_non_uniform(
                    bounds.width() / FREEFORM_VIEWBOX,
                    bounds.height() / FREEFORM_VIEWBOX,
                ),
        );
        Some(path)
    }
}

impl ActionFields for FreeformPath {
    const PREFIX: &'static str = "path";

    fn apply_field(&mut self, field: &str, value: &str) -> bool {
        match field {
            "data" | "d" => {
                if let Err(err) = self.set_data(value) {
                    warn!("Keeping previous path data: {err}");
                }
                true
            }
            _ => self.placement.apply_field(field, value),
        }
    }
}

/// Parse SVG path data, converting arcs and shorthand segments to curves.
fn parse_svg_path(data: &str) -> Result<BezPath, String> {
    let mut path = BezPath::new();
    for segment in svgtypes::SimplifyingPathParser::from(data) {
        let segment = segment.map_err(|e| format!("Invalid SVG path data: {e:?}"))?;
        match segment {
            svgtypes::SimplePathSegment::MoveTo { x, y } => path.move_to((x, y)),
            svgtypes::SimplePathSegment::LineTo { x, y } => path.line_to((x, y)),
            svgtypes::SimplePathSegment::Quadratic { x1, y1, x, y } => {
                path.quad_to((x1, y1), (x, y))
            }
            svgtypes::SimplePathSegment::CurveTo {
                x1,
                y1,
                x2,
                y2,
                x,
                y,
            } => path.curve_to((x1, y1), (x2, y2), (x, y)),
            svgtypes::SimplePathSegment::ClosePath => path.close_path(),
        }
    }
    Ok(path)
}
