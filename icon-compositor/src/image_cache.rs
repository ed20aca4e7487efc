//! Source bitmap cache shared by the image layers of every icon.
//!
//! Lookup, load and store happen under one async mutex so two layers asking
//! for the same image never decode it twice. Once the cache grows past its
//! ceiling plus a margin, a debounced background task trims it back to the
//! ceiling, evicting the least recently used entries.

use crate::error::{RenderError, RenderResult};
use icon_canvas::{CanvasError, Pixmap};
use image::imageops::{self, FilterType};
use image::RgbaImage;
use log::{debug, error, warn};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// How a source image is resized into the requested size, like CSS `object-fit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResizeFit {
    /// Scale to fit inside, preserving aspect ratio.
    #[default]
    Contain,
    /// Scale to cover, preserving aspect ratio, then crop.
    Cover,
    /// Stretch to the exact size.
    Fill,
    /// Like `Contain`, but never enlarge.
    ScaleDown,
    /// Keep the source size, cropped to the target.
    None,
}

impl FromStr for ResizeFit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "contain" => Ok(ResizeFit::Contain),
            "cover" => Ok(ResizeFit::Cover),
            "fill" | "stretch" => Ok(ResizeFit::Fill),
            "scale-down" | "scaledown" | "scale_down" => Ok(ResizeFit::ScaleDown),
            "none" => Ok(ResizeFit::None),
            other => Err(format!("unknown fit: '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ResizeOptions {
    pub fit: ResizeFit,
}

/// Size of a `source` image resized into `target` with `fit`, before cropping.
pub fn fit_size(source: (u32, u32), target: (u32, u32), fit: ResizeFit) -> (u32, u32) {
    let (sw, sh) = (source.0.max(1) as f64, source.1.max(1) as f64);
    let (tw, th) = (target.0 as f64, target.1 as f64);
    let scaled = |scale: f64| {
        (
            ((sw * scale).round() as u32).max(1),
            ((sh * scale).round() as u32).max(1),
        )
    };
    match fit {
        ResizeFit::Fill => target,
        ResizeFit::None => source,
        ResizeFit::Contain => scaled((tw / sw).min(th / sh)),
        ResizeFit::Cover => scaled((tw / sw).max(th / sh)),
        ResizeFit::ScaleDown => scaled((tw / sw).min(th / sh).min(1.0)),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ImageKey {
    path: PathBuf,
    width: u32,
    height: u32,
    options: ResizeOptions,
}

struct CacheEntry {
    image: Arc<Pixmap>,
    last_used: u64,
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<ImageKey, CacheEntry>,
    tick: u64,
}

impl CacheState {
    /// Evict least recently used entries down to `max_entries`.
    fn trim(&mut self, max_entries: usize) -> usize {
        let excess = self.entries.len().saturating_sub(max_entries);
        if excess == 0 {
            return 0;
        }
        let mut by_age: Vec<(u64, ImageKey)> = self
            .entries
            .iter()
            .map(|(key, entry)| (entry.last_used, key.clone()))
            .collect();
        by_age.sort_by_key(|(last_used, _)| *last_used);
        for (_, key) in by_age.into_iter().take(excess) {
            self.entries.remove(&key);
        }
        excess
    }
}

struct CacheInner {
    state: Mutex<CacheState>,
    max_entries: usize,
    trim_margin: usize,
    trim_delay: Duration,
    trim_generation: AtomicU64,
}

/// Cheaply clonable handle to a shared image cache.
#[derive(Clone)]
pub struct ImageCache {
    inner: Arc<CacheInner>,
}

impl fmt::Debug for ImageCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageCache")
            .field("max_entries", &self.inner.max_entries)
            .field("trim_margin", &self.inner.trim_margin)
            .finish_non_exhaustive()
    }
}

impl Default for ImageCache {
    fn default() -> Self {
        Self::new(64, 8)
    }
}

impl ImageCache {
    pub fn new(max_entries: usize, trim_margin: usize) -> Self {
        Self::with_trim_delay(max_entries, trim_margin, Duration::from_millis(250))
    }

    pub fn with_trim_delay(max_entries: usize, trim_margin: usize, trim_delay: Duration) -> Self {
        Self {
            inner: Arc::new(CacheInner {
                state: Mutex::new(CacheState::default()),
                max_entries,
                trim_margin,
                trim_delay,
                trim_generation: AtomicU64::new(0),
            }),
        }
    }

    /// Decoded and resized bitmap for `path`, or `None` if it cannot be loaded.
    ///
    /// Failures are logged and not cached, so a later call retries.
    pub async fn get_or_load_image(
        &self,
        path: &Path,
        target: (u32, u32),
        options: ResizeOptions,
    ) -> Option<Arc<Pixmap>> {
        if target.0 == 0 || target.1 == 0 {
            return None;
        }
        let key = ImageKey {
            path: path.to_path_buf(),
            width: target.0,
            height: target.1,
            options,
        };

        let mut state = self.inner.state.lock().await;
        state.tick += 1;
        let tick = state.tick;
        if let Some(entry) = state.entries.get_mut(&key) {
            entry.last_used = tick;
            return Some(entry.image.clone());
        }

        let source = key.path.clone();
        let loaded =
            tokio::task::spawn_blocking(move || load_image(&source, target, options.fit)).await;
        let image = match loaded {
            Ok(Ok(image)) => Arc::new(image),
            Ok(Err(err)) => {
                warn!("Failed to load image {}: {err}", path.display());
                return None;
            }
            Err(err) => {
                error!("Image loading task failed for {}: {err}", path.display());
                return None;
            }
        };
        debug!(
            "Loaded image {} as {}x{}",
            path.display(),
            image.width(),
            image.height()
        );
        state.entries.insert(
            key,
            CacheEntry {
                image: image.clone(),
                last_used: tick,
            },
        );
        let len = state.entries.len();
        drop(state);

        if len > self.inner.max_entries + self.inner.trim_margin {
            self.schedule_trim();
        }
        Some(image)
    }

    /// Number of cached bitmaps.
    pub async fn len(&self) -> usize {
        self.inner.state.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn clear(&self) {
        self.inner.state.lock().await.entries.clear();
    }

    /// Trim after `trim_delay`, unless another trim is scheduled meanwhile.
    fn schedule_trim(&self) {
        let generation = self.inner.trim_generation.fetch_add(1, Ordering::SeqCst) + 1;
        let inner = self.inner.clone();
        tokio::spawn(async move {
            tokio::time::sleep(inner.trim_delay).await;
            if inner.trim_generation.load(Ordering::SeqCst) != generation {
                return;
            }
            let evicted = inner.state.lock().await.trim(inner.max_entries);
            debug!("Trimmed {evicted} image(s) from the cache");
        });
    }
}

fn load_image(path: &Path, target: (u32, u32), fit: ResizeFit) -> RenderResult<Pixmap> {
    let source = image::open(path)?.to_rgba8();
    let size = fit_size(source.dimensions(), target, fit);
    let resized = if size == source.dimensions() {
        source
    } else {
        imageops::resize(&source, size.0, size.1, FilterType::Triangle)
    };
    let cropped = match fit {
        ResizeFit::Cover | ResizeFit::None => crop_center(resized, target),
        _ => resized,
    };
    rgba_to_pixmap(&cropped)
}

fn crop_center(image: RgbaImage, target: (u32, u32)) -> RgbaImage {
    let (w, h) = (image.width().min(target.0), image.height().min(target.1));
    if (w, h) == image.dimensions() {
        return image;
    }
    let (x, y) = ((image.width() - w) / 2, (image.height() - h) / 2);
    imageops::crop_imm(&image, x, y, w, h).to_image()
}

fn rgba_to_pixmap(image: &RgbaImage) -> RenderResult<Pixmap> {
    let (width, height) = image.dimensions();
    let mut pixmap = Pixmap::new(width, height)
        .ok_or(RenderError::Canvas(CanvasError::InvalidDimensions { width, height }))?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = tiny_skia::ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Ok(pixmap)
}
