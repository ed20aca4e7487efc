//! Pending vector paths and the boolean operators that chain path producers.

use crate::geometry::{Affine, BezPath, Rect};
use icon_canvas::{combine_masks, Canvas, FillRule, Mask, MaskOp};
use kurbo::Shape;
use std::fmt;
use std::str::FromStr;

/// How a path producer combines its path with the previous top of the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathOperation {
    /// Push the new path on its own.
    #[default]
    None,
    /// Concatenate both outlines into one path.
    Add,
    Union,
    Intersect,
    /// Previous path minus the new one.
    Difference,
    /// New path minus the previous one.
    Complement,
    Xor,
}

impl PathOperation {
    fn mask_op(self) -> MaskOp {
        match self {
            PathOperation::None | PathOperation::Add | PathOperation::Union => MaskOp::Union,
            PathOperation::Intersect => MaskOp::Intersect,
            PathOperation::Difference => MaskOp::Difference,
            PathOperation::Complement => MaskOp::ReverseDifference,
            PathOperation::Xor => MaskOp::Xor,
        }
    }
}

impl FromStr for PathOperation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(PathOperation::None),
            "add" => Ok(PathOperation::Add),
            "union" => Ok(PathOperation::Union),
            "intersect" | "intersection" => Ok(PathOperation::Intersect),
            "difference" => Ok(PathOperation::Difference),
            "complement" => Ok(PathOperation::Complement),
            "xor" => Ok(PathOperation::Xor),
            other => Err(format!("unknown path operation: '{other}'")),
        }
    }
}

impl fmt::Display for PathOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PathOperation::None => "none",
            PathOperation::Add => "add",
            PathOperation::Union => "union",
            PathOperation::Intersect => "intersect",
            PathOperation::Difference => "difference",
            PathOperation::Complement => "complement",
            PathOperation::Xor => "xor",
        };
        f.write_str(name)
    }
}

/// An undrawn path on the path stack.
///
/// Area boolean results are kept as an operator tree and resolved to a
/// coverage mask when a consumer rasterizes them, so transforms folded in
/// afterwards still apply exactly to both operands.
#[derive(Debug, Clone, PartialEq)]
pub enum CompositePath {
    Simple(BezPath),
    Combined {
        op: PathOperation,
        lhs: Box<CompositePath>,
        rhs: Box<CompositePath>,
    },
}

impl CompositePath {
    /// Combine `previous` (the popped top of stack) with `next`.
    ///
    /// `Add` concatenates outlines only when both operands are simple paths;
    /// with a combined operand it is rasterized as a union.
    pub fn combine(previous: CompositePath, next: CompositePath, op: PathOperation) -> Self {
        match (op, previous, next) {
            (PathOperation::None, _, next) => next,
            (PathOperation::Add, CompositePath::Simple(mut lhs), CompositePath::Simple(rhs)) => {
                lhs.extend(rhs.elements().iter().copied());
                CompositePath::Simple(lhs)
            }
            (op, lhs, rhs) => CompositePath::Combined {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
        }
    }

    /// Fold `affine` into the path geometry.
    pub fn apply_affine(&mut self, affine: Affine) {
        match self {
            CompositePath::Simple(path) => path.apply_affine(affine),
            CompositePath::Combined { lhs, rhs, .. } => {
                lhs.apply_affine(affine);
                rhs.apply_affine(affine);
            }
        }
    }

    /// Conservative bounds of the covered area.
    pub fn bounding_box(&self) -> Rect {
        match self {
            CompositePath::Simple(path) => path.bounding_box(),
            CompositePath::Combined { op, lhs, rhs } => {
                let (l, r) = (lhs.bounding_box(), rhs.bounding_box());
                match op {
                    PathOperation::Intersect => l.intersect(r),
                    PathOperation::Difference => l,
                    PathOperation::Complement => r,
                    _ => l.union(r),
                }
            }
        }
    }

    /// Rasterize into a device space coverage mask under the canvas transform.
    pub fn mask(&self, canvas: &Canvas, rule: FillRule) -> Option<Mask> {
        match self {
            CompositePath::Simple(path) => canvas.path_mask(path, rule),
            CompositePath::Combined { op, lhs, rhs } => {
                let mut mask = lhs.mask(canvas, rule)?;
                let other = rhs.mask(canvas, rule)?;
                combine_masks(&mut mask, &other, op.mask_op());
                Some(mask)
            }
        }
    }

    pub fn as_simple(&self) -> Option<&BezPath> {
        match self {
            CompositePath::Simple(path) => Some(path),
            CompositePath::Combined { .. } => None,
        }
    }
}

impl From<BezPath> for CompositePath {
    fn from(path: BezPath) -> Self {
        CompositePath::Simple(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::PATH_TOLERANCE;
    use rstest::rstest;

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> CompositePath {
        Rect::new(x0, y0, x1, y1).to_path(PATH_TOLERANCE).into()
    }

    fn canvas() -> Canvas {
        Canvas::builder().without_system_fonts().build(20, 20).unwrap()
    }

    #[rstest]
    #[case("union", PathOperation::Union)]
    #[case("XOR", PathOperation::Xor)]
    #[case("", PathOperation::None)]
    #[case("complement", PathOperation::Complement)]
    fn test_parse_operation(#[case] input: &str, #[case] expected: PathOperation) {
        assert_eq!(input.parse::<PathOperation>().unwrap(), expected);
    }

    #[test]
    fn test_add_concatenates_outlines() {
        let combined = CompositePath::combine(
            square(0.0, 0.0, 5.0, 5.0),
            square(10.0, 10.0, 15.0, 15.0),
            PathOperation::Add,
        );
        assert!(combined.as_simple().is_some());
        assert_eq!(combined.bounding_box(), Rect::new(0.0, 0.0, 15.0, 15.0));
    }

    #[test]
    fn test_add_with_combined_operand_is_a_union() {
        let xor = CompositePath::combine(
            square(0.0, 0.0, 10.0, 20.0),
            square(5.0, 0.0, 15.0, 20.0),
            PathOperation::Xor,
        );
        let combined =
            CompositePath::combine(xor, square(6.0, 0.0, 9.0, 20.0), PathOperation::Add);
        assert!(combined.as_simple().is_none());
        let mask = combined.mask(&canvas(), FillRule::NonZero).unwrap();
        let at = |x: u32| mask.data()[(10 * 20 + x) as usize] > 0;
        assert!(at(2));
        assert!(at(7));
        assert!(!at(17));
    }

    #[rstest]
    #[case(PathOperation::Union, (2, 10), true, (12, 10), true)]
    #[case(PathOperation::Intersect, (2, 10), false, (8, 10), true)]
    #[case(PathOperation::Difference, (2, 10), true, (8, 10), false)]
    #[case(PathOperation::Complement, (12, 10), true, (2, 10), false)]
    #[case(PathOperation::Xor, (8, 10), false, (2, 10), true)]
    fn test_area_operations(
        #[case] op: PathOperation,
        #[case] a: (u32, u32),
        #[case] a_covered: bool,
        #[case] b: (u32, u32),
        #[case] b_covered: bool,
    ) {
        // Left square 0..10, right square 5..15, overlap 5..10.
        let combined = CompositePath::combine(
            square(0.0, 0.0, 10.0, 20.0),
            square(5.0, 0.0, 15.0, 20.0),
            op,
        );
        let mask = combined.mask(&canvas(), FillRule::NonZero).unwrap();
        let at = |(x, y): (u32, u32)| mask.data()[(y * 20 + x) as usize] > 0;
        assert_eq!(at(a), a_covered);
        assert_eq!(at(b), b_covered);
    }

    #[test]
    fn test_affine_applies_to_both_operands() {
        let mut combined = CompositePath::combine(
            square(0.0, 0.0, 2.0, 2.0),
            square(1.0, 1.0, 3.0, 3.0),
            PathOperation::Union,
        );
        combined.apply_affine(Affine::translate((10.0, 0.0)));
        assert_eq!(combined.bounding_box(), Rect::new(10.0, 0.0, 13.0, 3.0));
    }
}
