//! Bitmap layer backed by the shared image cache.

use super::{Drawable, LayerContext};
use crate::action_data::{set_parsed, ActionFields};
use crate::error::RenderResult;
use crate::geometry::{Alignment, Rect, Size, SizeValue};
use crate::image_cache::{ImageCache, ResizeFit, ResizeOptions};
use crate::settings::resolve_path;
use futures::future::LocalBoxFuture;
use futures::FutureExt;
use icon_canvas::{Canvas, Pixmap};
use std::borrow::Cow;
use std::path::PathBuf;
use std::str::FromStr;

/// Per-pixel colour filter applied to the decoded bitmap before drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFilter {
    #[default]
    None,
    Grayscale,
    Invert,
}

impl FromStr for ImageFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(ImageFilter::None),
            "grayscale" | "greyscale" | "gray" | "grey" => Ok(ImageFilter::Grayscale),
            "invert" => Ok(ImageFilter::Invert),
            other => Err(format!("unknown image filter: '{other}'")),
        }
    }
}

impl ImageFilter {
    /// Filter premultiplied RGBA pixels in place.
    fn apply(self, data: &mut [u8]) {
        for px in data.chunks_exact_mut(4) {
            match self {
                ImageFilter::None => return,
                ImageFilter::Grayscale => {
                    let luma = 0.2126 * px[0] as f32
                        + 0.7152 * px[1] as f32
                        + 0.0722 * px[2] as f32;
                    let luma = luma.round().min(px[3] as f32) as u8;
                    px[..3].fill(luma);
                }
                ImageFilter::Invert => {
                    let alpha = px[3];
                    for c in &mut px[..3] {
                        *c = alpha.saturating_sub(*c);
                    }
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct DynamicImage {
    /// Image path, relative paths resolve against the image base path.
    pub src: String,
    pub fit: ResizeFit,
    pub align: Alignment,
    pub size: SizeValue,
    pub filter: ImageFilter,
    cache: ImageCache,
    base_path: PathBuf,
}

impl DynamicImage {
    pub fn new(context: &LayerContext) -> Self {
        Self {
            src: String::new(),
            fit: ResizeFit::default(),
            align: Alignment::CENTER,
            size: SizeValue::FULL,
            filter: ImageFilter::None,
            cache: context.image_cache.clone(),
            base_path: context.image_base_path.clone(),
        }
    }

    async fn draw(&self, canvas: &mut Canvas, rect: Rect) {
        if self.src.trim().is_empty() {
            return;
        }
        let bounds = self.align.place(self.size.resolve(rect.size()), rect);
        let target = (
            bounds.width().round().max(0.0) as u32,
            bounds.height().round().max(0.0) as u32,
        );
        let path = resolve_path(&self.base_path, &self.src);
        let Some(image) = self
            .cache
            .get_or_load_image(&path, target, ResizeOptions { fit: self.fit })
            .await
        else {
            return;
        };
        let pixmap: Cow<'_, Pixmap> = match self.filter {
            ImageFilter::None => Cow::Borrowed(&*image),
            filter => {
                let mut filtered = Pixmap::clone(&image);
                filter.apply(filtered.data_mut());
                Cow::Owned(filtered)
            }
        };
        let pixmap: &Pixmap = &pixmap;
        let placed = self.align.place(
            Size::new(pixmap.width() as f64, pixmap.height() as f64),
            bounds,
        );
        canvas.draw_pixmap(pixmap.as_ref(), placed);
    }
}

impl Drawable for DynamicImage {
    fn render<'a>(
        &'a mut self,
        canvas: &'a mut Canvas,
        rect: Rect,
    ) -> LocalBoxFuture<'a, RenderResult<()>> {
        async move {
            self.draw(canvas, rect).await;
            Ok(())
        }
        .boxed_local()
    }
}

impl ActionFields for DynamicImage {
    const PREFIX: &'static str = "img";

    fn apply_field(&mut self, field: &str, value: &str) -> bool {
        match field {
            "src" | "path" => {
                self.src = value.trim().to_string();
                true
            }
            "fit" => set_parsed(&mut self.fit, field, value),
            "align" => set_parsed(&mut self.align, field, value),
            "size" => set_parsed(&mut self.size, field, value),
            "filter" => set_parsed(&mut self.filter, field, value),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action_data::ActionData;
    use image::{Rgba, RgbaImage};
    use rstest::rstest;

    #[tokio::test]
    async fn test_draws_image_from_base_path() {
        let dir = tempfile::tempdir().unwrap();
        RgbaImage::from_pixel(10, 10, Rgba([0, 0, 255, 255]))
            .save(dir.path().join("blue.png"))
            .unwrap();
        let context = LayerContext {
            image_base_path: dir.path().to_path_buf(),
            ..Default::default()
        };
        let data = ActionData::from_pairs([
            ("img_src", "blue.png"),
            ("img_size", "50%"),
            ("img_align", "top left"),
        ]);
        let mut layer = DynamicImage::new(&context);
        layer.load(&mut data.cursor());

        let mut canvas = Canvas::builder().without_system_fonts().build(20, 20).unwrap();
        layer
            .render(&mut canvas, Rect::new(0.0, 0.0, 20.0, 20.0))
            .await
            .unwrap();
        assert_eq!(canvas.pixel(5, 5), Some([0, 0, 255, 255]));
        assert_eq!(canvas.pixel(15, 15), Some([0, 0, 0, 0]));
    }

    #[rstest]
    #[case("grayscale", [0, 150, 0, 255], [107, 107, 107, 255])]
    #[case("invert", [0, 150, 0, 255], [255, 105, 255, 255])]
    #[case("none", [0, 150, 0, 255], [0, 150, 0, 255])]
    #[tokio::test]
    async fn test_image_filters(
        #[case] filter: &str,
        #[case] source: [u8; 4],
        #[case] expected: [u8; 4],
    ) {
        let dir = tempfile::tempdir().unwrap();
        RgbaImage::from_pixel(4, 4, Rgba(source))
            .save(dir.path().join("green.png"))
            .unwrap();
        let context = LayerContext {
            image_base_path: dir.path().to_path_buf(),
            ..Default::default()
        };
        let data = ActionData::from_pairs([
            ("img_src", "green.png"),
            ("img_fit", "none"),
            ("img_filter", filter),
        ]);
        let mut layer = DynamicImage::new(&context);
        assert_eq!(layer.load(&mut data.cursor()), 3);

        let mut canvas = Canvas::builder().without_system_fonts().build(4, 4).unwrap();
        layer
            .render(&mut canvas, Rect::new(0.0, 0.0, 4.0, 4.0))
            .await
            .unwrap();
        assert_eq!(canvas.pixel(2, 2), Some(expected));
    }

    #[test]
    fn test_unknown_filter_keeps_previous() {
        let data = ActionData::from_pairs([("img_filter", "invert"), ("img_filter", "sepia")]);
        let mut layer = DynamicImage::new(&LayerContext::default());
        layer.load(&mut data.cursor());
        assert_eq!(layer.filter, ImageFilter::Invert);
    }

    #[tokio::test]
    async fn test_missing_image_draws_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let context = LayerContext {
            image_base_path: dir.path().to_path_buf(),
            ..Default::default()
        };
        let mut layer = DynamicImage::new(&context);
        layer.src = "nope.png".to_string();
        let mut canvas = Canvas::builder().without_system_fonts().build(8, 8).unwrap();
        layer
            .render(&mut canvas, Rect::new(0.0, 0.0, 8.0, 8.0))
            .await
            .unwrap();
        assert!(canvas.pixmap().data().iter().all(|b| *b == 0));
    }
}
