use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

/// Pixels with every RGB channel above this value count as paper, not ink.
pub const INK_THRESHOLD: u8 = 200;

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Where the source image lands on the surface, in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

/// Center an image inside the surface, scaled to fit while preserving its
/// aspect ratio. `None` when either side is empty.
pub fn fit_placement(image_size: [u32; 2], surface_size: [u32; 2]) -> Option<Placement> {
    let [image_w, image_h] = image_size;
    let [surface_w, surface_h] = surface_size;
    if image_w == 0 || image_h == 0 || surface_w == 0 || surface_h == 0 {
        return None;
    }

    let scale = (surface_w as f64 / image_w as f64).min(surface_h as f64 / image_h as f64);
    let width = ((image_w as f64 * scale).round() as u32).clamp(1, surface_w);
    let height = ((image_h as f64 * scale).round() as u32).clamp(1, surface_h);

    Some(Placement {
        x: i64::from((surface_w - width) / 2),
        y: i64::from((surface_h - height) / 2),
        width,
        height,
    })
}

/// Whether a source pixel is treated as background (near-white or fully transparent).
pub fn is_paper(pixel: &Rgba<u8>) -> bool {
    let [r, g, b, a] = pixel.0;
    a == 0 || (r > INK_THRESHOLD && g > INK_THRESHOLD && b > INK_THRESHOLD)
}

/// The line-art layer: opaque ink on a transparent background, sized to
/// the physical buffer. Immutable once extracted.
#[derive(Clone)]
pub struct LineArt {
    layer: RgbaImage,
    ink_pixels: usize,
}

impl std::fmt::Debug for LineArt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineArt")
            .field("size", &self.layer.dimensions())
            .field("ink_pixels", &self.ink_pixels)
            .finish()
    }
}

impl LineArt {
    /// Render `source` into an offscreen layer of `surface_size` at
    /// `placement`, then key out everything that is not ink.
    pub fn extract(source: &RgbaImage, placement: Placement, surface_size: [u32; 2]) -> Self {
        let [width, height] = surface_size;
        let mut layer = RgbaImage::from_pixel(width, height, TRANSPARENT);

        let placed = if source.dimensions() == (placement.width, placement.height) {
            source.clone()
        } else {
            imageops::resize(source, placement.width, placement.height, FilterType::Triangle)
        };
        imageops::replace(&mut layer, &placed, placement.x, placement.y);

        let mut ink_pixels = 0;
        for pixel in layer.pixels_mut() {
            if is_paper(pixel) {
                *pixel = TRANSPARENT;
            } else {
                pixel.0[3] = 255;
                ink_pixels += 1;
            }
        }

        log::info!(
            "Extracted line art: {}x{} layer, {} ink pixels",
            width,
            height,
            ink_pixels
        );

        Self { layer, ink_pixels }
    }

    /// Center-fit `source` on the surface and extract it.
    pub fn extract_centered(source: &RgbaImage, surface_size: [u32; 2]) -> Option<Self> {
        let (w, h) = source.dimensions();
        let placement = fit_placement([w, h], surface_size)?;
        Some(Self::extract(source, placement, surface_size))
    }

    /// Draw the ink on top of `buffer`, unscaled. Transparent pixels leave
    /// the buffer untouched, so applying twice equals applying once.
    pub fn apply(&self, buffer: &mut RgbaImage) {
        if buffer.dimensions() != self.layer.dimensions() {
            log::warn!(
                "Line art is {:?} but buffer is {:?}; compositing the overlap only",
                self.layer.dimensions(),
                buffer.dimensions()
            );
        }

        let width = buffer.width().min(self.layer.width());
        let height = buffer.height().min(self.layer.height());
        for y in 0..height {
            for x in 0..width {
                let ink = self.layer.get_pixel(x, y);
                if ink.0[3] != 0 {
                    buffer.put_pixel(x, y, *ink);
                }
            }
        }
    }

    /// The ink color at a physical pixel, if the line art covers it.
    pub fn ink_at(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        let pixel = self.layer.get_pixel_checked(x, y)?;
        (pixel.0[3] != 0).then_some(*pixel)
    }

    pub fn is_ink(&self, x: u32, y: u32) -> bool {
        self.ink_at(x, y).is_some()
    }

    pub fn ink_pixels(&self) -> usize {
        self.ink_pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placement_preserves_aspect_and_centers() {
        let placement = fit_placement([200, 100], [400, 400]).unwrap();
        assert_eq!(
            placement,
            Placement {
                x: 0,
                y: 100,
                width: 400,
                height: 200
            }
        );

        let tall = fit_placement([50, 100], [300, 100]).unwrap();
        assert_eq!((tall.x, tall.y, tall.width, tall.height), (125, 0, 50, 100));
    }

    #[test]
    fn empty_sizes_have_no_placement() {
        assert!(fit_placement([0, 10], [10, 10]).is_none());
        assert!(fit_placement([10, 10], [10, 0]).is_none());
    }

    #[test]
    fn near_white_is_keyed_out() {
        assert!(is_paper(&Rgba([255, 255, 255, 255])));
        assert!(is_paper(&Rgba([201, 230, 250, 255])));
        assert!(!is_paper(&Rgba([200, 255, 255, 255])));
        assert!(!is_paper(&Rgba([10, 10, 10, 255])));
        assert!(is_paper(&Rgba([0, 0, 0, 0])));
    }

    #[test]
    fn extracted_ink_is_opaque() {
        let mut source = RgbaImage::from_pixel(2, 2, Rgba([255, 255, 255, 255]));
        source.put_pixel(1, 1, Rgba([20, 30, 40, 90]));

        let art = LineArt::extract(
            &source,
            Placement {
                x: 0,
                y: 0,
                width: 2,
                height: 2,
            },
            [2, 2],
        );
        assert_eq!(art.ink_pixels(), 1);
        assert_eq!(art.ink_at(1, 1), Some(Rgba([20, 30, 40, 255])));
        assert!(!art.is_ink(0, 0));
        assert!(!art.is_ink(5, 5));
    }

    #[test]
    fn applying_twice_equals_applying_once() {
        let mut source = RgbaImage::from_pixel(4, 4, Rgba([250, 250, 250, 255]));
        source.put_pixel(2, 1, Rgba([0, 0, 0, 255]));
        let art = LineArt::extract_centered(&source, [4, 4]).unwrap();

        let mut once = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 255, 255]));
        art.apply(&mut once);
        let mut twice = once.clone();
        art.apply(&mut twice);

        assert_eq!(once, twice);
        assert_eq!(*once.get_pixel(2, 1), Rgba([0, 0, 0, 255]));
        assert_eq!(*once.get_pixel(0, 0), Rgba([0, 0, 255, 255]));
    }
}
