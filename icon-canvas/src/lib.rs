//! Canvas 2D style drawing surface used by the layered icon compositor.
//!
//! The surface wraps a `tiny-skia` pixmap and keeps a small saveable drawing
//! state (transform, paint styles, clip mask). Geometry crosses the API as
//! `kurbo` types so that callers can build and transform paths without
//! depending on the rasterizer. Text is shaped with `cosmic-text` and turned
//! into vector outlines, which lets callers clip, transform or union glyphs
//! like any other path.
//!
//! # Example
//!
//! ```rust,ignore
//! use icon_canvas::Canvas;
//! use kurbo::{Rect, Shape};
//!
//! let mut canvas = Canvas::new(128, 128)?;
//! canvas.set_fill_style("#ff0000")?;
//! canvas.fill_path(&Rect::new(8.0, 8.0, 120.0, 120.0).to_path(0.1), Default::default());
//! let png_data = canvas.to_png()?;
//! ```

mod context;
mod convert;
mod drawing_state;
mod error;
mod font_parser;
mod mask;
mod style;
mod text;

pub use context::{Canvas, CanvasBuilder};
pub use convert::{affine_to_transform, bez_path_to_skia, kurbo_rect, transform_to_affine};
pub use drawing_state::DrawingState;
pub use error::{CanvasError, CanvasResult};
pub use font_parser::{parse_font, ParsedFont};
pub use mask::{combine_masks, mask_bounds, MaskOp};
pub use style::{parse_color, FillRule, LineCap, TextAlign, TextBaseline};

/// Re-exported so that callers can hold decoded bitmaps and masks without
/// a direct `tiny-skia` dependency.
pub use tiny_skia::{Color, Mask, Pixmap};
