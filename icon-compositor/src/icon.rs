//! An icon: a named, sized, ordered list of layers rendered to PNG.

use crate::action_data::{ActionData, ActionDataCursor};
use crate::error::{RenderError, RenderResult};
use crate::layers::{Layer, LayerContext, LayerKind};
use crate::render::RenderPass;
use crate::settings::Settings;
use crate::tiling::{encode_png, extract_tile, tile_id, tile_layout, Tile, TileGrid};
use futures::future::join_all;
use icon_canvas::{Canvas, CanvasError, Pixmap};
use log::{debug, error, warn};
use std::sync::Arc;

/// One encoded output image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconImage {
    /// Icon name, or `<name>_<col>_<row>` for a tile.
    pub id: String,
    pub png: Vec<u8>,
}

/// A renderable icon.
///
/// Rendering takes `&mut self`, so one icon never renders twice at the same
/// time; share icons behind an async mutex to render them from several tasks.
pub struct Icon {
    name: String,
    width: u32,
    height: u32,
    tiles: TileGrid,
    layers: Vec<Option<Layer>>,
    compression_level: u8,
    compression_quality: u8,
    gpu: bool,
    load_system_fonts: bool,
    context: LayerContext,
    canvas: Option<Canvas>,
}

impl std::fmt::Debug for Icon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Icon")
            .field("name", &self.name)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("tiles", &self.tiles)
            .field("layers", &self.layers.len())
            .finish_non_exhaustive()
    }
}

impl Icon {
    /// New icon with its own image cache.
    pub fn new(name: impl Into<String>, settings: &Settings) -> Self {
        Self::with_context(name, settings, LayerContext::from_settings(settings))
    }

    /// New icon sharing `context` (and its image cache) with other icons.
    pub fn with_context(name: impl Into<String>, settings: &Settings, context: LayerContext) -> Self {
        Self {
            name: name.into(),
            width: settings.default_icon_size.width,
            height: settings.default_icon_size.height,
            tiles: TileGrid::default(),
            layers: Vec::new(),
            compression_level: settings.compression_level.min(9),
            compression_quality: settings.compression_quality.min(100),
            gpu: settings.gpu,
            load_system_fonts: settings.load_system_fonts,
            context,
            canvas: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    pub fn tiles(&self) -> TileGrid {
        self.tiles
    }

    pub fn set_tiles(&mut self, tiles: TileGrid) {
        self.tiles = tiles;
    }

    pub fn compression_level(&self) -> u8 {
        self.compression_level
    }

    pub fn set_compression_level(&mut self, level: u8) {
        self.compression_level = level.min(9);
    }

    /// Lossy quality from 0 to 100. Kept for callers; PNG encoding ignores it.
    pub fn compression_quality(&self) -> u8 {
        self.compression_quality
    }

    pub fn set_compression_quality(&mut self, quality: u8) {
        self.compression_quality = quality.min(100);
    }

    /// Whether a GPU surface was requested. The tiny-skia backend always draws on the CPU.
    pub fn gpu(&self) -> bool {
        self.gpu
    }

    pub fn set_gpu(&mut self, gpu: bool) {
        self.gpu = gpu;
    }

    pub fn context(&self) -> &LayerContext {
        &self.context
    }

    pub fn layers(&self) -> &[Option<Layer>] {
        &self.layers
    }

    pub fn layers_mut(&mut self) -> &mut Vec<Option<Layer>> {
        &mut self.layers
    }

    /// Append a layer, returning its index.
    pub fn push_layer(&mut self, layer: Layer) -> usize {
        self.layers.push(Some(layer));
        self.layers.len() - 1
    }

    /// Append a layer of `kind` configured from `cursor`, returning its index.
    pub fn push_layer_from_action(
        &mut self,
        kind: LayerKind,
        cursor: &mut ActionDataCursor<'_>,
    ) -> usize {
        let layer = Layer::from_action(kind, cursor, &self.context);
        self.push_layer(layer)
    }

    /// Replace the slot at `index`, growing the list with empty slots if needed.
    pub fn set_layer(&mut self, index: usize, layer: Option<Layer>) {
        if index >= self.layers.len() {
            self.layers.resize_with(index + 1, || None);
        }
        self.layers[index] = layer;
    }

    /// Empty the slot at `index`; later layers keep their indices.
    pub fn remove_layer(&mut self, index: usize) -> Option<Layer> {
        self.layers.get_mut(index).and_then(Option::take)
    }

    /// Feed new action data to the layer at `index`. Returns the number of
    /// consumed entries.
    pub fn update_layer(&mut self, index: usize, data: &ActionData) -> usize {
        match self.layers.get_mut(index) {
            Some(Some(layer)) => {
                let mut cursor = data.cursor();
                let consumed = layer.update(&mut cursor);
                if let Some(rest) = cursor.peek() {
                    warn!(
                        "Icon '{}' layer {index}: ignoring {} field(s) from '{}'",
                        self.name,
                        cursor.remaining(),
                        rest.id
                    );
                }
                consumed
            }
            _ => {
                warn!("Icon '{}' has no layer {index} to update", self.name);
                0
            }
        }
    }

    /// Run a render pass over the layers and return the drawn surface.
    ///
    /// The surface is kept between renders and cleared before each pass.
    pub async fn draw(&mut self) -> RenderResult<&Canvas> {
        let canvas = match self.canvas.take() {
            Some(mut canvas) if canvas.width() == self.width && canvas.height() == self.height => {
                canvas.reset();
                canvas
            }
            _ => {
                if self.gpu {
                    debug!("Icon '{}' requested a GPU surface, drawing on the CPU", self.name);
                }
                let mut builder = Canvas::builder();
                if !self.load_system_fonts {
                    builder = builder.without_system_fonts();
                }
                builder.build(self.width, self.height)?
            }
        };
        let canvas = self.canvas.insert(canvas);
        let rect = canvas.bounds();
        debug!("Rendering icon '{}' ({} layers)", self.name, self.layers.len());
        RenderPass::new(&mut *canvas, rect)
            .run(&mut self.layers)
            .await?;
        Ok(canvas)
    }

    /// Render and encode the icon, one image per tile.
    ///
    /// Never fails: a failed pass is logged and yields no images, a tile
    /// that fails to encode is logged and skipped.
    pub async fn render(&mut self) -> Vec<IconImage> {
        let pixmap = match self.draw().await {
            Ok(canvas) => canvas.pixmap().clone(),
            Err(err) => {
                error!("Failed to render icon '{}': {err}", self.name);
                return Vec::new();
            }
        };

        let outputs: Vec<(String, Option<Tile>)> = if self.tiles.is_single() {
            vec![(self.name.clone(), None)]
        } else {
            match tile_layout(self.width, self.height, self.tiles) {
                Ok(tiles) => tiles
                    .into_iter()
                    .map(|tile| (tile_id(&self.name, &tile), Some(tile)))
                    .collect(),
                Err(err) => {
                    error!("Failed to tile icon '{}': {err}", self.name);
                    return Vec::new();
                }
            }
        };

        let pixmap = Arc::new(pixmap);
        let level = self.compression_level;
        let tasks = outputs.into_iter().map(|(id, tile)| {
            let pixmap = pixmap.clone();
            tokio::task::spawn_blocking(move || encode_output(id, &pixmap, tile, level))
        });

        let mut images = Vec::new();
        for result in join_all(tasks).await {
            match result.map_err(RenderError::from).and_then(|r| r) {
                Ok(image) => images.push(image),
                Err(err) => error!("Skipping output of icon '{}': {err}", self.name),
            }
        }
        images
    }
}

fn encode_output(
    id: String,
    pixmap: &Pixmap,
    tile: Option<Tile>,
    level: u8,
) -> RenderResult<IconImage> {
    let png = match tile {
        None => encode_png(pixmap, level)?,
        Some(tile) => {
            let part = extract_tile(pixmap, &tile).ok_or(CanvasError::InvalidDimensions {
                width: tile.width,
                height: tile.height,
            })?;
            encode_png(&part, level)?
        }
    };
    Ok(IconImage { id, png })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> Settings {
        Settings {
            load_system_fonts: false,
            ..Settings::default()
        }
    }

    fn red_background(icon: &mut Icon) {
        let data = ActionData::from_pairs([("srect_fill", "#ff0000")]);
        icon.push_layer_from_action(LayerKind::StyledRectangle, &mut data.cursor());
    }

    #[tokio::test]
    async fn test_render_single_image() {
        let mut icon = Icon::new("cpu", &settings());
        red_background(&mut icon);
        let images = icon.render().await;
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].id, "cpu");
        let decoded = image::load_from_memory(&images[0].png).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (128, 128));
        assert_eq!(decoded.get_pixel(64, 64).0, [255, 0, 0, 255]);
    }

    #[tokio::test]
    async fn test_render_tiles() {
        let mut icon = Icon::new("deck", &settings());
        icon.set_size(200, 100);
        icon.set_tiles(TileGrid::new(3, 1));
        red_background(&mut icon);
        let images = icon.render().await;
        let ids: Vec<&str> = images.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["deck_1_1", "deck_2_1", "deck_3_1"]);
        let widths: Vec<u32> = images
            .iter()
            .map(|i| image::load_from_memory(&i.png).unwrap().width())
            .collect();
        assert_eq!(widths, vec![67, 67, 66]);
    }

    #[tokio::test]
    async fn test_invalid_tiles_render_nothing() {
        let mut icon = Icon::new("bad", &settings());
        icon.set_size(10, 10);
        icon.set_tiles(TileGrid::new(6, 1));
        assert!(icon.render().await.is_empty());
    }

    #[tokio::test]
    async fn test_rerender_is_identical() {
        let mut icon = Icon::new("same", &settings());
        red_background(&mut icon);
        let first = icon.render().await;
        let second = icon.render().await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_layer_slots() {
        let mut icon = Icon::new("slots", &settings());
        red_background(&mut icon);
        red_background(&mut icon);
        assert!(icon.remove_layer(0).is_some());
        assert!(icon.remove_layer(0).is_none());
        assert_eq!(icon.layers().len(), 2);
        icon.set_layer(4, None);
        assert_eq!(icon.layers().len(), 5);

        let update = ActionData::from_pairs([("srect_fill", "#00ff00"), ("text_text", "x")]);
        assert_eq!(icon.update_layer(1, &update), 1);
        assert_eq!(icon.update_layer(0, &update), 0);

        let canvas = icon.draw().await.unwrap();
        assert_eq!(canvas.pixel(64, 64), Some([0, 255, 0, 255]));
    }

    #[tokio::test]
    async fn test_gpu_and_quality_do_not_change_output() {
        let mut plain = Icon::new("plain", &settings());
        red_background(&mut plain);
        let mut flagged = Icon::new(
            "plain",
            &Settings {
                gpu: true,
                compression_quality: 10,
                ..settings()
            },
        );
        assert!(flagged.gpu());
        assert_eq!(flagged.compression_quality(), 10);
        flagged.set_compression_quality(200);
        assert_eq!(flagged.compression_quality(), 100);
        red_background(&mut flagged);
        assert_eq!(plain.render().await, flagged.render().await);
    }
}
