//! Bitmap drawing operations for Canvas.

use super::Canvas;
use kurbo::Rect;
use tiny_skia::{FilterQuality, PixmapPaint, PixmapRef};

impl Canvas {
    /// Draw a premultiplied pixmap scaled into `dest` under the current transform.
    pub fn draw_pixmap(&mut self, image: PixmapRef<'_>, dest: Rect) {
        log::debug!(target: "canvas", "drawImage {}x{} into {:?}", image.width(), image.height(), dest);
        if dest.width() <= 0.0 || dest.height() <= 0.0 {
            return;
        }

        let scale_x = dest.width() as f32 / image.width() as f32;
        let scale_y = dest.height() as f32 / image.height() as f32;
        let transform = self
            .state
            .transform
            .pre_translate(dest.x0 as f32, dest.y0 as f32)
            .pre_scale(scale_x, scale_y);

        let paint = PixmapPaint {
            opacity: 1.0,
            quality: if scale_x == 1.0 && scale_y == 1.0 {
                FilterQuality::Nearest
            } else {
                FilterQuality::Bicubic
            },
            ..Default::default()
        };
        self.pixmap
            .draw_pixmap(0, 0, image, &paint, transform, self.state.clip_mask.as_ref());
    }
}
