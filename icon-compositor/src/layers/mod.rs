//! The layer catalogue.
//!
//! Every concrete layer plays exactly one role, but the orchestrator asks for
//! each role independently through the `as_*` accessors on [`Layer`], so a
//! future layer type could play several.

mod bar_graph;
mod clipping_mask;
mod dynamic_image;
mod progress_gauge;
mod shapes;
mod styled_rect;
mod styled_text;
pub mod ticks;
mod transformation;

pub use bar_graph::BarGraph;
pub use clipping_mask::{ClipAction, ClippingMask};
pub use dynamic_image::{DynamicImage, ImageFilter};
pub use progress_gauge::RoundProgressGauge;
pub use shapes::{CornerRadii, EllipsePath, FreeformPath, RectanglePath, ShapePlacement};
pub use styled_rect::StyledRectangle;
pub use styled_text::StyledText;
pub use ticks::{CircularTicks, LinearTicks};
pub use transformation::{TransformOp, TransformScope, Transformation};

use crate::action_data::{ActionDataCursor, ActionFields};
use crate::error::RenderResult;
use crate::geometry::{BezPath, Rect};
use crate::image_cache::ImageCache;
use crate::path::{CompositePath, PathOperation};
use crate::settings::Settings;
use futures::future::LocalBoxFuture;
use icon_canvas::Canvas;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Something drawn directly on the surface.
///
/// Rendering is asynchronous so that a layer can await off-surface work
/// (image decoding). The orchestrator awaits each call before the next layer.
pub trait Drawable {
    fn render<'a>(
        &'a mut self,
        canvas: &'a mut Canvas,
        rect: Rect,
    ) -> LocalBoxFuture<'a, RenderResult<()>>;
}

/// A layer that contributes a vector path to the path stack.
pub trait PathProducer {
    fn operation(&self) -> PathOperation;

    /// The layer's own path for the destination rectangle.
    fn build_path(&self, rect: Rect) -> Option<BezPath>;

    /// The path to push. When the stack is not empty and the operation is not
    /// `None`, the previous top is popped and combined with the new path.
    fn get_path(&mut self, rect: Rect, stack: &mut Vec<CompositePath>) -> Option<CompositePath> {
        let path = CompositePath::from(self.build_path(rect)?);
        let op = self.operation();
        if op == PathOperation::None {
            return Some(path);
        }
        match stack.pop() {
            Some(previous) => Some(CompositePath::combine(previous, path, op)),
            None => Some(path),
        }
    }
}

/// A layer that draws and drains the whole path stack.
///
/// Implementations must leave `paths` empty: the orchestrator resets every
/// open transform bracket to the bottom of the stack before calling.
pub trait PathConsumer {
    fn render_paths(
        &mut self,
        paths: &mut Vec<CompositePath>,
        canvas: &mut Canvas,
        rect: Rect,
    ) -> RenderResult<()>;
}

/// Shared collaborators handed to layers at construction.
#[derive(Debug, Clone)]
pub struct LayerContext {
    pub image_cache: ImageCache,
    pub image_base_path: PathBuf,
}

impl LayerContext {
    /// A context with a new image cache sized from `settings`.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            image_cache: ImageCache::new(
                settings.image_cache_max_entries,
                settings.image_cache_trim_margin,
            ),
            image_base_path: settings.image_base_path.clone(),
        }
    }
}

impl Default for LayerContext {
    fn default() -> Self {
        Self {
            image_cache: ImageCache::default(),
            image_base_path: PathBuf::from("."),
        }
    }
}

/// Layer type names as they appear in icon descriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    #[serde(alias = "tx")]
    Transform,
    #[serde(rename = "rect")]
    RectanglePath,
    #[serde(rename = "ellipse")]
    EllipsePath,
    #[serde(rename = "path")]
    FreeformPath,
    #[serde(rename = "clip")]
    ClippingMask,
    #[serde(rename = "srect")]
    StyledRectangle,
    #[serde(rename = "text")]
    StyledText,
    #[serde(rename = "bar")]
    BarGraph,
    #[serde(rename = "gauge")]
    RoundProgressGauge,
    #[serde(rename = "img")]
    DynamicImage,
    #[serde(rename = "cticks")]
    CircularTicks,
    #[serde(rename = "lticks")]
    LinearTicks,
}

impl FromStr for LayerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_value(serde_json::Value::String(s.trim().to_ascii_lowercase()))
            .map_err(|_| format!("unknown layer kind: '{s}'"))
    }
}

/// Role of a layer in the render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerRole {
    Drawable,
    Transform,
    PathProducer,
    PathConsumer,
}

/// One entry of an icon's ordered layer list.
#[derive(Debug, Clone)]
pub enum Layer {
    Transformation(Transformation),
    RectanglePath(RectanglePath),
    EllipsePath(EllipsePath),
    FreeformPath(FreeformPath),
    ClippingMask(ClippingMask),
    StyledRectangle(StyledRectangle),
    StyledText(StyledText),
    BarGraph(BarGraph),
    RoundProgressGauge(RoundProgressGauge),
    DynamicImage(DynamicImage),
    CircularTicks(CircularTicks),
    LinearTicks(LinearTicks),
}

impl Layer {
    /// Create a layer of `kind` and feed it its fields from `cursor`.
    pub fn from_action(
        kind: LayerKind,
        cursor: &mut ActionDataCursor<'_>,
        context: &LayerContext,
    ) -> Layer {
        let mut layer = match kind {
            LayerKind::Transform => Layer::Transformation(Transformation::default()),
            LayerKind::RectanglePath => Layer::RectanglePath(RectanglePath::default()),
            LayerKind::EllipsePath => Layer::EllipsePath(EllipsePath::default()),
            LayerKind::FreeformPath => Layer::FreeformPath(FreeformPath::default()),
            LayerKind::ClippingMask => Layer::ClippingMask(ClippingMask::default()),
            LayerKind::StyledRectangle => Layer::StyledRectangle(StyledRectangle::default()),
            LayerKind::StyledText => Layer::StyledText(StyledText::default()),
            LayerKind::BarGraph => Layer::BarGraph(BarGraph::default()),
            LayerKind::RoundProgressGauge => {
                Layer::RoundProgressGauge(RoundProgressGauge::default())
            }
            LayerKind::DynamicImage => Layer::DynamicImage(DynamicImage::new(context)),
            LayerKind::CircularTicks => Layer::CircularTicks(CircularTicks::default()),
            LayerKind::LinearTicks => Layer::LinearTicks(LinearTicks::default()),
        };
        layer.update(cursor);
        layer
    }

    /// Feed recognised fields from `cursor`, returning how many were consumed.
    pub fn update(&mut self, cursor: &mut ActionDataCursor<'_>) -> usize {
        match self {
            Layer::Transformation(l) => l.load(cursor),
            Layer::RectanglePath(l) => l.load(cursor),
            Layer::EllipsePath(l) => l.load(cursor),
            Layer::FreeformPath(l) => l.load(cursor),
            Layer::ClippingMask(l) => l.load(cursor),
            Layer::StyledRectangle(l) => l.load(cursor),
            Layer::StyledText(l) => l.load(cursor),
            Layer::BarGraph(l) => l.load(cursor),
            Layer::RoundProgressGauge(l) => l.load(cursor),
            Layer::DynamicImage(l) => l.load(cursor),
            Layer::CircularTicks(l) => l.load(cursor),
            Layer::LinearTicks(l) => l.load(cursor),
        }
    }

    pub fn kind(&self) -> LayerKind {
        match self {
            Layer::Transformation(_) => LayerKind::Transform,
            Layer::RectanglePath(_) => LayerKind::RectanglePath,
            Layer::EllipsePath(_) => LayerKind::EllipsePath,
            Layer::FreeformPath(_) => LayerKind::FreeformPath,
            Layer::ClippingMask(_) => LayerKind::ClippingMask,
            Layer::StyledRectangle(_) => LayerKind::StyledRectangle,
            Layer::StyledText(_) => LayerKind::StyledText,
            Layer::BarGraph(_) => LayerKind::BarGraph,
            Layer::RoundProgressGauge(_) => LayerKind::RoundProgressGauge,
            Layer::DynamicImage(_) => LayerKind::DynamicImage,
            Layer::CircularTicks(_) => LayerKind::CircularTicks,
            Layer::LinearTicks(_) => LayerKind::LinearTicks,
        }
    }

    pub fn role(&self) -> LayerRole {
        match self {
            Layer::Transformation(_) => LayerRole::Transform,
            Layer::RectanglePath(_) | Layer::EllipsePath(_) | Layer::FreeformPath(_) => {
                LayerRole::PathProducer
            }
            Layer::ClippingMask(_) => LayerRole::PathConsumer,
            _ => LayerRole::Drawable,
        }
    }

    pub fn as_transform(&self) -> Option<&Transformation> {
        match self {
            Layer::Transformation(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_path_producer_mut(&mut self) -> Option<&mut dyn PathProducer> {
        match self {
            Layer::RectanglePath(l) => Some(l),
            Layer::EllipsePath(l) => Some(l),
            Layer::FreeformPath(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_path_consumer_mut(&mut self) -> Option<&mut dyn PathConsumer> {
        match self {
            Layer::ClippingMask(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_drawable_mut(&mut self) -> Option<&mut dyn Drawable> {
        match self {
            Layer::StyledRectangle(l) => Some(l),
            Layer::StyledText(l) => Some(l),
            Layer::BarGraph(l) => Some(l),
            Layer::RoundProgressGauge(l) => Some(l),
            Layer::DynamicImage(l) => Some(l),
            Layer::CircularTicks(l) => Some(l),
            Layer::LinearTicks(l) => Some(l),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action_data::ActionData;
    use rstest::rstest;

    #[rstest]
    #[case("tx", LayerKind::Transform)]
    #[case("transform", LayerKind::Transform)]
    #[case("rect", LayerKind::RectanglePath)]
    #[case("CTICKS", LayerKind::CircularTicks)]
    #[case("img", LayerKind::DynamicImage)]
    fn test_layer_kind_names(#[case] name: &str, #[case] expected: LayerKind) {
        assert_eq!(name.parse::<LayerKind>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_kind() {
        assert!("sparkles".parse::<LayerKind>().is_err());
    }

    #[test]
    fn test_from_action_consumes_only_own_fields() {
        let data = ActionData::from_pairs([
            ("rect_size", "50%"),
            ("rect_operation", "union"),
            ("clip_action", "inverse"),
        ]);
        let mut cursor = data.cursor();
        let layer = Layer::from_action(
            LayerKind::RectanglePath,
            &mut cursor,
            &LayerContext::default(),
        );
        assert_eq!(layer.role(), LayerRole::PathProducer);
        assert_eq!(cursor.position(), 2);

        let clip = Layer::from_action(LayerKind::ClippingMask, &mut cursor, &LayerContext::default());
        assert_eq!(clip.role(), LayerRole::PathConsumer);
        assert!(cursor.is_exhausted());
    }

    #[test]
    fn test_roles_are_exclusive() {
        let ctx = LayerContext::default();
        let data = ActionData::default();
        for kind in [
            LayerKind::Transform,
            LayerKind::RectanglePath,
            LayerKind::ClippingMask,
            LayerKind::StyledText,
            LayerKind::LinearTicks,
        ] {
            let mut layer = Layer::from_action(kind, &mut data.cursor(), &ctx);
            let roles = [
                layer.as_transform().is_some(),
                layer.as_path_producer_mut().is_some(),
                layer.as_path_consumer_mut().is_some(),
                layer.as_drawable_mut().is_some(),
            ];
            assert_eq!(roles.iter().filter(|r| **r).count(), 1, "{kind:?}");
            assert_eq!(layer.kind(), kind);
        }
    }
}
