use egui::{Pos2, Rect, Vec2};

/// Maps between the displayed (logical) size of the surface and its
/// physical pixel buffer.
///
/// The device pixel ratio and the displayed bounding box are tracked
/// separately: when the surface is shown at a size other than the one it
/// was laid out with, the physical/displayed ratio differs from the raw
/// device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pixels_per_point: f32,
    physical: [u32; 2],
    bounds: Rect,
}

/// `round(display × dpr)` per axis, or `None` when either side collapses to zero.
pub fn physical_dimensions(display_size: Vec2, pixels_per_point: f32) -> Option<[u32; 2]> {
    if !display_size.x.is_finite()
        || !display_size.y.is_finite()
        || !pixels_per_point.is_finite()
    {
        return None;
    }
    let width = (display_size.x * pixels_per_point).round();
    let height = (display_size.y * pixels_per_point).round();
    if width < 1.0 || height < 1.0 {
        return None;
    }
    Some([width as u32, height as u32])
}

impl Viewport {
    /// Lay out a surface of `display_size` logical pixels. Returns `None`
    /// when the surface has no area yet.
    pub fn new(display_size: Vec2, pixels_per_point: f32) -> Option<Self> {
        let physical = physical_dimensions(display_size, pixels_per_point)?;
        Some(Self {
            pixels_per_point,
            physical,
            bounds: Rect::from_min_size(Pos2::ZERO, display_size),
        })
    }

    pub fn physical_size(&self) -> [u32; 2] {
        self.physical
    }

    pub fn pixels_per_point(&self) -> f32 {
        self.pixels_per_point
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Update the on-screen bounding box. Does not touch the buffer size.
    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    /// Physical pixels per displayed point, per axis. Zero while the
    /// bounding box has no area.
    pub fn scale(&self) -> Vec2 {
        let size = self.bounds.size();
        if size.x <= 0.0 || size.y <= 0.0 {
            return Vec2::ZERO;
        }
        Vec2::new(
            self.physical[0] as f32 / size.x,
            self.physical[1] as f32 / size.y,
        )
    }

    /// Screen position to a logical point relative to the bounding box.
    pub fn screen_to_logical(&self, screen: Pos2) -> Pos2 {
        Pos2::ZERO + (screen - self.bounds.min)
    }

    pub fn to_physical(&self, logical: Pos2) -> Pos2 {
        let scale = self.scale();
        if scale == Vec2::ZERO {
            return Pos2::ZERO;
        }
        Pos2::new(logical.x * scale.x, logical.y * scale.y)
    }

    pub fn to_logical(&self, physical: Pos2) -> Pos2 {
        let scale = self.scale();
        if scale == Vec2::ZERO {
            return Pos2::ZERO;
        }
        Pos2::new(physical.x / scale.x, physical.y / scale.y)
    }

    /// Clamp a physical position onto the buffer area.
    pub fn clamp_physical(&self, physical: Pos2) -> Pos2 {
        let x = if physical.x.is_finite() { physical.x } else { 0.0 };
        let y = if physical.y.is_finite() { physical.y } else { 0.0 };
        Pos2::new(
            x.clamp(0.0, self.physical[0] as f32),
            y.clamp(0.0, self.physical[1] as f32),
        )
    }

    /// The buffer pixel containing a physical position, clamped into range.
    pub fn pixel_at(&self, physical: Pos2) -> [u32; 2] {
        let clamped = self.clamp_physical(physical);
        [
            (clamped.x.floor() as u32).min(self.physical[0] - 1),
            (clamped.y.floor() as u32).min(self.physical[1] - 1),
        ]
    }

    /// Brush widths are given in logical pixels and scale with the device ratio.
    pub fn physical_width(&self, logical_width: f32) -> f32 {
        logical_width * self.pixels_per_point
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, vec2};

    #[test]
    fn physical_size_rounds_scaled_display() {
        let viewport = Viewport::new(vec2(100.4, 50.0), 1.5).unwrap();
        assert_eq!(viewport.physical_size(), [151, 75]);
    }

    #[test]
    fn zero_area_is_uninitialized() {
        assert!(Viewport::new(vec2(0.0, 10.0), 2.0).is_none());
        assert!(Viewport::new(vec2(10.0, 0.2), 2.0).is_none());
        assert!(Viewport::new(vec2(f32::NAN, 10.0), 1.0).is_none());
    }

    #[test]
    fn round_trip_within_one_physical_pixel() {
        let mut viewport = Viewport::new(vec2(300.0, 200.0), 2.0).unwrap();
        viewport.set_bounds(Rect::from_min_size(pos2(40.0, 12.0), vec2(150.0, 100.0)));

        for &(x, y) in &[(0.0, 0.0), (10.5, 3.25), (149.9, 99.9), (75.0, 50.0)] {
            let logical = pos2(x, y);
            let back = viewport.to_logical(viewport.to_physical(logical));
            let scale = viewport.scale();
            assert!((back.x - logical.x).abs() * scale.x <= 1.0);
            assert!((back.y - logical.y).abs() * scale.y <= 1.0);
        }
    }

    #[test]
    fn display_scaling_differs_from_device_ratio() {
        let mut viewport = Viewport::new(vec2(200.0, 100.0), 2.0).unwrap();
        assert_eq!(viewport.scale(), vec2(2.0, 2.0));

        // Shown at half its natural size: each displayed point covers 4 physical pixels.
        viewport.set_bounds(Rect::from_min_size(Pos2::ZERO, vec2(100.0, 50.0)));
        assert_eq!(viewport.scale(), vec2(4.0, 4.0));
        assert_eq!(viewport.to_physical(pos2(10.0, 10.0)), pos2(40.0, 40.0));
        assert_eq!(viewport.physical_width(5.0), 10.0);
    }

    #[test]
    fn collapsed_bounds_map_to_origin() {
        let mut viewport = Viewport::new(vec2(50.0, 50.0), 1.0).unwrap();
        viewport.set_bounds(Rect::from_min_size(pos2(5.0, 5.0), vec2(0.0, 50.0)));
        assert_eq!(viewport.to_physical(pos2(20.0, 20.0)), Pos2::ZERO);
        assert_eq!(viewport.to_logical(pos2(20.0, 20.0)), Pos2::ZERO);
    }

    #[test]
    fn out_of_bounds_positions_are_clamped() {
        let viewport = Viewport::new(vec2(10.0, 10.0), 1.0).unwrap();
        assert_eq!(viewport.pixel_at(pos2(-4.0, 25.0)), [0, 9]);
        assert_eq!(viewport.pixel_at(pos2(10.0, 9.99)), [9, 9]);
        assert_eq!(viewport.clamp_physical(pos2(12.0, -1.0)), pos2(10.0, 0.0));
    }

    #[test]
    fn screen_positions_are_relative_to_bounds() {
        let mut viewport = Viewport::new(vec2(10.0, 10.0), 1.0).unwrap();
        viewport.set_bounds(Rect::from_min_size(pos2(100.0, 20.0), vec2(10.0, 10.0)));
        assert_eq!(viewport.screen_to_logical(pos2(103.0, 25.0)), pos2(3.0, 5.0));
    }
}
