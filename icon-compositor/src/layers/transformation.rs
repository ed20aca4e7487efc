//! Transformation layer: rotation, translation, scale and skew about the
//! centre of the destination rectangle.

use crate::action_data::{set_number, set_parsed, ActionFields};
use crate::geometry::{Affine, Rect};
use std::str::FromStr;

/// How far a transformation reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransformScope {
    /// Applied to the surface from here on, and folded into pending paths.
    Cumulative,
    /// Only the preceding drawable, or the pending paths after a producer.
    #[default]
    PreviousOne,
    /// Everything drawn until the matching [`TransformScope::Reset`].
    UntilReset,
    /// Closes the most recent `UntilReset` bracket.
    Reset,
}

impl FromStr for TransformScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "cumulative" => Ok(TransformScope::Cumulative),
            "previousone" | "previous" => Ok(TransformScope::PreviousOne),
            "untilreset" => Ok(TransformScope::UntilReset),
            "reset" => Ok(TransformScope::Reset),
            _ => Err(format!("unknown transform scope: '{s}'")),
        }
    }
}

/// One step of a transformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformOp {
    Offset,
    Rotate,
    Scale,
    Skew,
}

impl FromStr for TransformOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "O" | "OFFSET" | "TRANSLATE" => Ok(TransformOp::Offset),
            "R" | "ROTATE" => Ok(TransformOp::Rotate),
            "SC" | "SCALE" => Ok(TransformOp::Scale),
            "SK" | "SKEW" => Ok(TransformOp::Skew),
            other => Err(format!("unknown transform step: '{other}'")),
        }
    }
}

/// Application order of the steps, first step outermost.
#[derive(Debug, Clone, PartialEq, Eq)]
struct TransformOrder(Vec<TransformOp>);

impl Default for TransformOrder {
    fn default() -> Self {
        Self(vec![
            TransformOp::Offset,
            TransformOp::Rotate,
            TransformOp::Scale,
            TransformOp::Skew,
        ])
    }
}

impl FromStr for TransformOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ops = s
            .split(',')
            .filter(|t| !t.trim().is_empty())
            .map(str::parse)
            .collect::<Result<Vec<TransformOp>, _>>()?;
        if ops.is_empty() {
            return Err("empty transform order".to_string());
        }
        Ok(Self(ops))
    }
}

/// A transform layer. Never drawn; see [`crate::render::RenderPass`] for how
/// each scope is applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Transformation {
    /// Clockwise rotation in degrees.
    pub rotation: f64,
    /// Translation as a percentage of the rectangle width.
    pub translate_x: f64,
    /// Translation as a percentage of the rectangle height.
    pub translate_y: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    /// Skew factors in percent (100 is a 45° shear).
    pub skew_x: f64,
    pub skew_y: f64,
    order: TransformOrder,
    pub scope: TransformScope,
}

impl Default for Transformation {
    fn default() -> Self {
        Self {
            rotation: 0.0,
            translate_x: 0.0,
            translate_y: 0.0,
            scale_x: 100.0,
            scale_y: 100.0,
            skew_x: 0.0,
            skew_y: 0.0,
            order: TransformOrder::default(),
            scope: TransformScope::default(),
        }
    }
}

impl Transformation {
    pub fn with_scope(scope: TransformScope) -> Self {
        Self {
            scope,
            ..Default::default()
        }
    }

    pub fn order(&self) -> &[TransformOp] {
        &self.order.0
    }

    pub fn set_order(&mut self, order: Vec<TransformOp>) {
        if !order.is_empty() {
            self.order = TransformOrder(order);
        }
    }

    /// The transform geometry for `rect`, about its centre.
    pub fn affine(&self, rect: Rect) -> Affine {
        let center = rect.center().to_vec2();
        let steps = self.order.0.iter().fold(Affine::IDENTITY, |acc, op| {
            acc * match op {
                TransformOp::Offset => Affine::translate((
                    self.translate_x * rect.width() / 100.0,
                    self.translate_y * rect.height() / 100.0,
                )),
                TransformOp::Rotate => Affine::rotate(self.rotation.to_radians()),
                TransformOp::Scale => {
                    Affine::scale_non_uniform(self.scale_x / 100.0, self.scale_y / 100.0)
                }
                TransformOp::Skew => Affine::skew(self.skew_x / 100.0, self.skew_y / 100.0),
            }
        });
        Affine::translate(center) * steps * Affine::translate(-center)
    }
}

impl ActionFields for Transformation {
    const PREFIX: &'static str = "tx";

    fn apply_field(&mut self, field: &str, value: &str) -> bool {
        match field {
            "rot" => set_number(&mut self.rotation, field, value),
            "trsX" => set_number(&mut self.translate_x, field, value),
            "trsY" => set_number(&mut self.translate_y, field, value),
            "scaleX" => set_number(&mut self.scale_x, field, value),
            "scaleY" => set_number(&mut self.scale_y, field, value),
            "skewX" => set_number(&mut self.skew_x, field, value),
            "skewY" => set_number(&mut self.skew_y, field, value),
            "order" => set_parsed(&mut self.order, field, value),
            "scope" => set_parsed(&mut self.scope, field, value),
            _ => false,
        }
    }
}
