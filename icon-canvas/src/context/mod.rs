//! Canvas rendering context implementation.

mod drawing;
mod image_ops;
mod text_rendering;
mod transform;

use crate::drawing_state::DrawingState;
use crate::error::{CanvasError, CanvasResult};
use crate::style::{parse_color, LineCap};
use cosmic_text::{FontSystem, SwashCache};
use tiny_skia::{Color, Pixmap};

/// Maximum canvas dimension (same as Chrome).
const MAX_DIMENSION: u32 = 32767;

/// Raster drawing surface with canvas 2D style state handling.
pub struct Canvas {
    /// Width of the canvas in pixels.
    pub(crate) width: u32,
    /// Height of the canvas in pixels.
    pub(crate) height: u32,
    /// Pixel buffer.
    pub(crate) pixmap: Pixmap,
    /// Font system for text shaping.
    pub(crate) font_system: FontSystem,
    /// Swash cache for glyph outlines.
    pub(crate) swash_cache: SwashCache,
    /// Current drawing state.
    pub(crate) state: DrawingState,
    /// Stack of saved drawing states.
    state_stack: Vec<DrawingState>,
}

/// Builder for [`Canvas`] that allows supplying a prepared font database.
#[derive(Default)]
pub struct CanvasBuilder {
    font_db: Option<fontdb::Database>,
    load_system_fonts: bool,
}

impl CanvasBuilder {
    /// Start a builder that loads system fonts unless a database is supplied.
    pub fn new() -> Self {
        Self {
            font_db: None,
            load_system_fonts: true,
        }
    }

    /// Use a pre-populated font database instead of scanning system fonts.
    pub fn font_db(mut self, db: fontdb::Database) -> Self {
        self.font_db = Some(db);
        self
    }

    /// Skip system font discovery. Text will only render with fonts supplied
    /// through [`CanvasBuilder::font_db`].
    pub fn without_system_fonts(mut self) -> Self {
        self.load_system_fonts = false;
        self
    }

    /// Build a canvas of the given size.
    pub fn build(self, width: u32, height: u32) -> CanvasResult<Canvas> {
        let db = match self.font_db {
            Some(db) => db,
            None => {
                let mut db = fontdb::Database::new();
                if self.load_system_fonts {
                    db.load_system_fonts();
                }
                db
            }
        };
        Canvas::new_internal(width, height, db)
    }
}

impl Canvas {
    /// Create a new canvas, loading system fonts for text rendering.
    pub fn new(width: u32, height: u32) -> CanvasResult<Self> {
        CanvasBuilder::new().build(width, height)
    }

    /// Create a new canvas builder.
    pub fn builder() -> CanvasBuilder {
        CanvasBuilder::new()
    }

    fn new_internal(width: u32, height: u32, font_db: fontdb::Database) -> CanvasResult<Self> {
        if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(CanvasError::InvalidDimensions { width, height });
        }

        let pixmap =
            Pixmap::new(width, height).ok_or(CanvasError::InvalidDimensions { width, height })?;
        let font_system = FontSystem::new_with_locale_and_db("en".to_string(), font_db);

        Ok(Self {
            width,
            height,
            pixmap,
            font_system,
            swash_cache: SwashCache::new(),
            state: DrawingState::default(),
            state_stack: Vec::new(),
        })
    }

    /// Get canvas width.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get canvas height.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Full canvas bounds in device pixels.
    pub fn bounds(&self) -> kurbo::Rect {
        kurbo::Rect::new(0.0, 0.0, self.width as f64, self.height as f64)
    }

    /// Save the current drawing state.
    pub fn save(&mut self) {
        log::debug!(target: "canvas", "save");
        self.state_stack.push(self.state.clone());
    }

    /// Restore the previously saved drawing state.
    pub fn restore(&mut self) {
        log::debug!(target: "canvas", "restore");
        if let Some(state) = self.state_stack.pop() {
            self.state = state;
        }
    }

    /// Clear all pixels and reset the drawing state.
    pub fn reset(&mut self) {
        self.pixmap.fill(Color::TRANSPARENT);
        self.state = DrawingState::default();
        self.state_stack.clear();
    }

    /// Read-only access to the current drawing state.
    pub fn state(&self) -> &DrawingState {
        &self.state
    }

    // --- Style setters ---

    /// Set the fill style from a CSS color string.
    pub fn set_fill_style(&mut self, style: &str) -> CanvasResult<()> {
        self.state.fill_color = parse_color(style)?;
        Ok(())
    }

    /// Set the fill color.
    pub fn set_fill_color(&mut self, color: Color) {
        self.state.fill_color = color;
    }

    /// Set the stroke style from a CSS color string.
    pub fn set_stroke_style(&mut self, style: &str) -> CanvasResult<()> {
        self.state.stroke_color = parse_color(style)?;
        Ok(())
    }

    /// Set the stroke color.
    pub fn set_stroke_color(&mut self, color: Color) {
        self.state.stroke_color = color;
    }

    /// Set the line width. Non-finite or non-positive values are ignored.
    pub fn set_line_width(&mut self, width: f32) {
        if width.is_finite() && width > 0.0 {
            self.state.line_width = width;
        }
    }

    /// Set the line cap style.
    pub fn set_line_cap(&mut self, cap: LineCap) {
        self.state.line_cap = cap;
    }

    // --- Pixel access ---

    /// Borrow the underlying pixmap (premultiplied RGBA).
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Non-premultiplied RGBA color of a single pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some([c.red(), c.green(), c.blue(), c.alpha()])
    }

    /// Encode the canvas with tiny-skia's built-in PNG encoder.
    pub fn to_png(&self) -> CanvasResult<Vec<u8>> {
        Ok(self.pixmap.encode_png()?)
    }
}
