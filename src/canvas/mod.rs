//! The raster side of the drawing surface: the physical pixel buffer and
//! the algorithms that mutate it.

pub mod fill;
pub mod overlay;
pub mod stroke;
pub mod viewport;

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

pub use fill::{flood_fill, flood_fill_within};
pub use overlay::{fit_placement, LineArt, Placement, INK_THRESHOLD};
pub use stroke::{ActiveStroke, DirtyRect};
pub use viewport::Viewport;

/// A sized surface: the ink-free base buffer that tools paint into, the
/// display buffer holding the base with line art composited on top, and
/// the viewport that maps input onto both.
///
/// Only the base buffer is snapshotted. The display buffer is derived
/// and is rebuilt with [`Canvas::compose`] or [`Canvas::refresh`].
#[derive(Debug, Clone)]
pub struct Canvas {
    base: RgbaImage,
    display: RgbaImage,
    viewport: Viewport,
}

impl Canvas {
    /// A base filled with `background` and no line art yet.
    pub fn new(viewport: Viewport, background: Rgba<u8>) -> Self {
        let [width, height] = viewport.physical_size();
        let base = RgbaImage::from_pixel(width, height, background);
        Self {
            display: base.clone(),
            base,
            viewport,
        }
    }

    /// A canvas for `viewport` holding the previous base stretched to fit.
    pub fn resampled(previous: &RgbaImage, viewport: Viewport) -> Self {
        let [width, height] = viewport.physical_size();
        let base = if previous.dimensions() == (width, height) {
            previous.clone()
        } else {
            imageops::resize(previous, width, height, FilterType::Triangle)
        };
        Self {
            display: base.clone(),
            base,
            viewport,
        }
    }

    pub fn base(&self) -> &RgbaImage {
        &self.base
    }

    pub fn base_mut(&mut self) -> &mut RgbaImage {
        &mut self.base
    }

    /// What is shown and exported.
    pub fn display(&self) -> &RgbaImage {
        &self.display
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    /// Rebuild the whole display buffer from the base and `overlay`.
    pub fn compose(&mut self, overlay: Option<&LineArt>) {
        self.display.clone_from(&self.base);
        if let Some(overlay) = overlay {
            overlay.apply(&mut self.display);
        }
    }

    /// Rebuild the display buffer inside `dirty` only.
    pub fn refresh(&mut self, dirty: DirtyRect, overlay: Option<&LineArt>) {
        let (width, height) = self.base.dimensions();
        let [min_x, min_y] = dirty.min;
        let max_x = dirty.max[0].min(width.saturating_sub(1));
        let max_y = dirty.max[1].min(height.saturating_sub(1));

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let pixel = overlay
                    .and_then(|overlay| overlay.ink_at(x, y))
                    .unwrap_or(*self.base.get_pixel(x, y));
                self.display.put_pixel(x, y, pixel);
            }
        }
    }

    /// Flood-fill the base, tracing the region on the display buffer so
    /// that composited line art bounds it. The display is left stale.
    pub fn fill(&mut self, seed: [u32; 2], color: Rgba<u8>) -> usize {
        flood_fill_within(&mut self.base, &self.display, seed, color)
    }

    pub fn clear(&mut self, background: Rgba<u8>) {
        for pixel in self.base.pixels_mut() {
            *pixel = background;
        }
    }

    /// Replace the base with a snapshot of the same dimensions.
    pub fn restore(&mut self, snapshot: &RgbaImage) -> bool {
        if snapshot.dimensions() != self.base.dimensions() {
            log::warn!(
                "Snapshot is {:?} but buffer is {:?}; not restoring",
                snapshot.dimensions(),
                self.base.dimensions()
            );
            return false;
        }
        self.base.clone_from(snapshot);
        true
    }
}
