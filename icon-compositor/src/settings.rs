//! Persisted settings, read once when an [`crate::Icon`] is constructed.

use crate::error::RenderResult;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Pixel size of an icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconSize {
    pub width: u32,
    pub height: u32,
}

impl Default for IconSize {
    fn default() -> Self {
        Self {
            width: 128,
            height: 128,
        }
    }
}

/// Compositor settings.
///
/// Missing fields take their defaults, so a partial JSON document is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Size of icons that do not declare their own.
    pub default_icon_size: IconSize,
    /// PNG compression level from 0 to 9. Zero returns the surface's native encoding.
    pub compression_level: u8,
    /// Lossy encoding quality from 0 to 100. PNG output is lossless and ignores it.
    pub compression_quality: u8,
    /// Request a GPU surface. Rendering is CPU only and ignores it.
    pub gpu: bool,
    /// Directory that relative image paths are resolved against.
    pub image_base_path: PathBuf,
    /// Number of decoded images kept by the image cache after a trim.
    pub image_cache_max_entries: usize,
    /// Entries allowed above the ceiling before a trim is scheduled.
    pub image_cache_trim_margin: usize,
    /// Whether to load system fonts into each icon's font database (default: true).
    pub load_system_fonts: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_icon_size: IconSize::default(),
            compression_level: 0,
            compression_quality: 100,
            gpu: false,
            image_base_path: PathBuf::from("."),
            image_cache_max_entries: 64,
            image_cache_trim_margin: 8,
            load_system_fonts: true,
        }
    }
}

impl Settings {
    pub fn from_json_str(json: &str) -> RenderResult<Self> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.compression_level = settings.compression_level.min(9);
        settings.compression_quality = settings.compression_quality.min(100);
        Ok(settings)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> RenderResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Resolve an image path against [`Settings::image_base_path`].
    pub fn resolve_image_path(&self, path: &str) -> PathBuf {
        resolve_path(&self.image_base_path, path)
    }
}

pub(crate) fn resolve_path(base: &Path, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
