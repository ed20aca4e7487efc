//! Clipping mask: turns the pending paths into a clip on the surface.

use super::PathConsumer;
use crate::action_data::{set_parsed, ActionFields};
use crate::error::RenderResult;
use crate::geometry::{Rect, PATH_TOLERANCE};
use crate::path::CompositePath;
use icon_canvas::{combine_masks, Canvas, FillRule, Mask, MaskOp};
use kurbo::Shape;
use log::{debug, warn};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClipAction {
    /// Restrict drawing to the inside of the paths.
    #[default]
    Normal,
    /// Restrict drawing to the rectangle minus the paths.
    Inverse,
    /// Drop the clip.
    Release,
}

impl FromStr for ClipAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" | "clip" => Ok(ClipAction::Normal),
            "inverse" | "invert" => Ok(ClipAction::Inverse),
            "release" | "reset" => Ok(ClipAction::Release),
            other => Err(format!("unknown clip action: '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClippingMask {
    pub action: ClipAction,
    pub rule: FillRule,
}

impl ClippingMask {
    pub fn new(action: ClipAction) -> Self {
        Self {
            action,
            ..Default::default()
        }
    }

    /// Union of the coverage of every path.
    fn coverage(&self, paths: &[CompositePath], canvas: &Canvas) -> Option<Mask> {
        let mut masks = paths.iter().filter_map(|p| p.mask(canvas, self.rule));
        let mut union = masks.next()?;
        for mask in masks {
            combine_masks(&mut union, &mask, MaskOp::Union);
        }
        Some(union)
    }
}

impl PathConsumer for ClippingMask {
    fn render_paths(
        &mut self,
        paths: &mut Vec<CompositePath>,
        canvas: &mut Canvas,
        rect: Rect,
    ) -> RenderResult<()> {
        let paths = std::mem::take(paths);
        debug!("Clipping {:?} with {} path(s)", self.action, paths.len());
        match self.action {
            ClipAction::Release => canvas.reset_clip(),
            ClipAction::Normal => match self.coverage(&paths, canvas) {
                Some(mask) => canvas.clip_to_mask(mask),
                None => warn!("Clipping mask has no paths to clip with"),
            },
            ClipAction::Inverse => {
                let Some(mut mask) = canvas.path_mask(&rect.to_path(PATH_TOLERANCE), self.rule)
                else {
                    return Ok(());
                };
                if let Some(cover) = self.coverage(&paths, canvas) {
                    combine_masks(&mut mask, &cover, MaskOp::Difference);
                }
                canvas.clip_to_mask(mask);
            }
        }
        Ok(())
    }
}

impl ActionFields for ClippingMask {
    const PREFIX: &'static str = "clip";

    fn apply_field(&mut self, field: &str, value: &str) -> bool {
        match field {
            "action" => set_parsed(&mut self.action, field, value),
            "rule" => set_parsed(&mut self.rule, field, value),
            _ => false,
        }
    }
}
