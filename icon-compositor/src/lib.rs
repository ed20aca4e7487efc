#![doc = include_str!("../README.md")]

pub mod action_data;
pub mod description;
pub mod error;
pub mod geometry;
pub mod icon;
pub mod image_cache;
pub mod layers;
pub mod path;
pub mod render;
pub mod settings;
pub mod tiling;

pub use action_data::{ActionData, ActionDataCursor, ActionDatum, ActionFields};
pub use description::{parse_descriptions, IconDescription, LayerDescription};
pub use error::{RenderError, RenderResult};
pub use icon::{Icon, IconImage};
pub use image_cache::{ImageCache, ResizeFit, ResizeOptions};
pub use layers::{Layer, LayerContext, LayerKind, LayerRole};
pub use path::{CompositePath, PathOperation};
pub use render::{ActiveTransform, RenderPass};
pub use settings::{IconSize, Settings};
pub use tiling::{TileGrid, Tile};

pub use icon_canvas;
