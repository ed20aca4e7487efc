//! Transform operations for Canvas.

use super::Canvas;
use crate::convert::{affine_to_transform, transform_to_affine};
use kurbo::Affine;

impl Canvas {
    /// Multiply the current transform by `affine` (applied before the current one).
    pub fn transform(&mut self, affine: Affine) {
        log::debug!(target: "canvas", "transform {:?}", affine);
        self.state.transform = self.state.transform.pre_concat(affine_to_transform(affine));
    }

    /// Replace the current transform.
    pub fn set_transform(&mut self, affine: Affine) {
        log::debug!(target: "canvas", "setTransform {:?}", affine);
        self.state.transform = affine_to_transform(affine);
    }

    /// Get the current transformation matrix.
    pub fn get_transform(&self) -> Affine {
        transform_to_affine(self.state.transform)
    }
}
