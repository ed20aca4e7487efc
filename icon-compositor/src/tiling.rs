//! Tiling and PNG output.
//!
//! A finished raster is split into a `cols x rows` grid. Tile sizes are the
//! total size ceiling-divided by the grid counts, and the last column and row
//! take the remainder.

use crate::error::{RenderError, RenderResult};
use itertools::iproduct;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tiny_skia::{IntRect, Pixmap};

/// Grid an icon is split into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGrid {
    pub cols: u32,
    pub rows: u32,
}

impl TileGrid {
    pub const SINGLE: TileGrid = TileGrid { cols: 1, rows: 1 };

    pub const fn new(cols: u32, rows: u32) -> Self {
        Self { cols, rows }
    }

    pub fn is_single(&self) -> bool {
        *self == Self::SINGLE
    }
}

impl Default for TileGrid {
    fn default() -> Self {
        Self::SINGLE
    }
}

impl fmt::Display for TileGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.cols, self.rows)
    }
}

/// Parses `3x1` (columns by rows).
impl FromStr for TileGrid {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (cols, rows) = s
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("invalid tile grid: '{s}'"))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<u32>()
                .map_err(|_| format!("invalid tile grid: '{s}'"))
        };
        Ok(Self::new(parse(cols)?, parse(rows)?))
    }
}

/// One tile of a grid, in raster pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub col: u32,
    pub row: u32,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Tiles of a `width x height` raster in row-major order.
pub fn tile_layout(width: u32, height: u32, grid: TileGrid) -> RenderResult<Vec<Tile>> {
    let invalid = || RenderError::InvalidTileGrid {
        cols: grid.cols,
        rows: grid.rows,
        width,
        height,
    };
    if grid.cols == 0 || grid.rows == 0 {
        return Err(invalid());
    }
    let tile_width = width.div_ceil(grid.cols);
    let tile_height = height.div_ceil(grid.rows);

    let tiles: Vec<Tile> = iproduct!(0..grid.rows, 0..grid.cols)
        .map(|(row, col)| {
            let x = col * tile_width;
            let y = row * tile_height;
            Tile {
                col,
                row,
                x,
                y,
                width: tile_width.min(width.saturating_sub(x)),
                height: tile_height.min(height.saturating_sub(y)),
            }
        })
        .collect();
    // Ceiling division can leave nothing for the last tiles, e.g. 10px in 6 columns.
    if tiles.iter().any(|t| t.width == 0 || t.height == 0) {
        return Err(invalid());
    }
    Ok(tiles)
}

/// Output id of a tile: `<name>_<col+1>_<row+1>`.
pub fn tile_id(name: &str, tile: &Tile) -> String {
    format!("{name}_{}_{}", tile.col + 1, tile.row + 1)
}

/// Copy the pixels of `tile` out of `pixmap`.
pub fn extract_tile(pixmap: &Pixmap, tile: &Tile) -> Option<Pixmap> {
    let rect = IntRect::from_xywh(tile.x as i32, tile.y as i32, tile.width, tile.height)?;
    pixmap.clone_rect(rect)
}

/// Encode a pixmap as PNG.
///
/// Level 0 uses the surface's native encoder. Levels 1 to 9 go through the
/// `png` encoder with a matching compression preset and adaptive filtering.
pub fn encode_png(pixmap: &Pixmap, level: u8) -> RenderResult<Vec<u8>> {
    if level == 0 {
        return Ok(pixmap.encode_png()?);
    }
    let compression = match level {
        1..=3 => png::Compression::Fast,
        4..=6 => png::Compression::Default,
        _ => png::Compression::Best,
    };

    let mut rgba = Vec::with_capacity(pixmap.data().len());
    for pixel in pixmap.pixels() {
        let c = pixel.demultiply();
        rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }

    let mut data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut data, pixmap.width(), pixmap.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(compression);
        encoder.set_adaptive_filter(png::AdaptiveFilterType::Adaptive);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&rgba)?;
    }
    Ok(data)
}
