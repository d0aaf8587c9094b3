use eframe::egui::{self, Color32, ColorImage, Rect, TextureHandle, TextureOptions};
use image::RgbaImage;

use crate::color::{to_color32, BACKGROUND};
use crate::surface::DrawingSurface;

/// Keeps an egui texture in step with the surface's pixel buffer
#[derive(Default)]
pub struct Renderer {
    texture: Option<TextureHandle>,
    uploaded_version: Option<u64>,
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("has_texture", &self.texture.is_some())
            .field("uploaded_version", &self.uploaded_version)
            .finish()
    }
}

/// Copy an RGBA buffer into an egui image of the same size.
pub fn to_color_image(buffer: &RgbaImage) -> ColorImage {
    let size = [buffer.width() as usize, buffer.height() as usize];
    ColorImage::from_rgba_unmultiplied(size, buffer.as_raw())
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upload the buffer if its content changed since the last upload.
    ///
    /// Returns true when a new texture was uploaded.
    pub fn sync(&mut self, ctx: &egui::Context, surface: &DrawingSurface) -> bool {
        let Some(buffer) = surface.buffer() else {
            return false;
        };
        if self.uploaded_version == Some(surface.version()) && self.texture.is_some() {
            return false;
        }

        let image = to_color_image(buffer);
        match &mut self.texture {
            Some(texture) => texture.set(image, TextureOptions::NEAREST),
            None => {
                self.texture =
                    Some(ctx.load_texture("drawing_surface", image, TextureOptions::NEAREST));
            }
        }
        self.uploaded_version = Some(surface.version());
        true
    }

    /// Paint the surface into `rect`, or a blank page before the first upload.
    pub fn render(&self, painter: &egui::Painter, rect: Rect) {
        match &self.texture {
            Some(texture) => {
                let uv = Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
                painter.image(texture.id(), rect, uv, Color32::WHITE);
            }
            None => {
                painter.rect_filled(rect, 0.0, to_color32(BACKGROUND));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn color_image_matches_buffer() {
        let mut buffer = RgbaImage::from_pixel(3, 2, Rgba([255, 255, 255, 255]));
        buffer.put_pixel(2, 1, Rgba([255, 65, 54, 255]));

        let image = to_color_image(&buffer);
        assert_eq!(image.size, [3, 2]);
        assert_eq!(image.pixels[5], Color32::from_rgb(255, 65, 54));
    }

    #[test]
    fn uploads_only_when_content_changes() {
        let ctx = egui::Context::default();
        let mut renderer = Renderer::new();
        let mut surface = DrawingSurface::new();

        assert!(!renderer.sync(&ctx, &surface));

        surface.resize(egui::vec2(8.0, 8.0), 1.0);
        assert!(renderer.sync(&ctx, &surface));
        assert!(!renderer.sync(&ctx, &surface));

        surface.clear();
        assert!(renderer.sync(&ctx, &surface));
        assert!(!renderer.sync(&ctx, &surface));
    }

    #[test]
    fn render_without_texture_paints_blank_page() {
        let ctx = egui::Context::default();
        let rect = Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(100.0, 100.0));
        let painter = egui::Painter::new(ctx, egui::LayerId::background(), rect);
        Renderer::new().render(&painter, rect);
    }
}
