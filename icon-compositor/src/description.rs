//! Serializable icon descriptions, as read by the command line front end.

use crate::action_data::ActionData;
use crate::error::RenderResult;
use crate::icon::Icon;
use crate::layers::{LayerContext, LayerKind};
use crate::settings::{IconSize, Settings};
use crate::tiling::TileGrid;
use log::warn;
use serde::{Deserialize, Serialize};

/// One layer: its kind and the action data that configures it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerDescription {
    pub kind: LayerKind,
    #[serde(default)]
    pub data: ActionData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IconDescription {
    pub name: String,
    /// Falls back to the default icon size from the settings.
    #[serde(default)]
    pub size: Option<IconSize>,
    #[serde(default)]
    pub tiles: Option<TileGrid>,
    #[serde(default)]
    pub compression_level: Option<u8>,
    #[serde(default)]
    pub compression_quality: Option<u8>,
    /// Overrides the settings' GPU request for this icon.
    #[serde(default)]
    pub gpu: Option<bool>,
    #[serde(default)]
    pub layers: Vec<LayerDescription>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DescriptionDocument {
    Many(Vec<IconDescription>),
    One(IconDescription),
}

/// Parse a JSON document holding one icon description or an array of them.
pub fn parse_descriptions(json: &str) -> RenderResult<Vec<IconDescription>> {
    Ok(match serde_json::from_str(json)? {
        DescriptionDocument::Many(icons) => icons,
        DescriptionDocument::One(icon) => vec![icon],
    })
}

impl Icon {
    /// Build an icon from its description.
    ///
    /// Action data a layer does not recognise is logged and skipped.
    pub fn from_description(
        description: &IconDescription,
        settings: &Settings,
        context: LayerContext,
    ) -> Icon {
        let mut icon = Icon::with_context(description.name.clone(), settings, context);
        if let Some(size) = description.size {
            icon.set_size(size.width, size.height);
        }
        if let Some(tiles) = description.tiles {
            icon.set_tiles(tiles);
        }
        if let Some(level) = description.compression_level {
            icon.set_compression_level(level);
        }
        if let Some(quality) = description.compression_quality {
            icon.set_compression_quality(quality);
        }
        if let Some(gpu) = description.gpu {
            icon.set_gpu(gpu);
        }
        for (index, layer) in description.layers.iter().enumerate() {
            let mut cursor = layer.data.cursor();
            icon.push_layer_from_action(layer.kind, &mut cursor);
            if let Some(rest) = cursor.peek() {
                warn!(
                    "Icon '{}' layer {index} ({:?}): ignoring {} field(s) from '{}'",
                    description.name,
                    layer.kind,
                    cursor.remaining(),
                    rest.id
                );
            }
        }
        icon
    }
}
