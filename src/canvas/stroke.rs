use egui::Pos2;
use image::{Rgba, RgbaImage};

/// Radius below which a thin brush would miss the pixel under the pointer.
const MIN_RADIUS: f32 = std::f32::consts::FRAC_1_SQRT_2;

/// Distance from `point` to the segment `start..end`.
pub(crate) fn distance_to_segment(point: Pos2, start: Pos2, end: Pos2) -> f32 {
    let line = end - start;
    let to_point = point - start;

    let length = line.length();
    if length == 0.0 {
        return to_point.length();
    }

    let t = ((to_point.x * line.x + to_point.y * line.y) / length).clamp(0.0, length);
    let projection = start + line * (t / length);
    (point - projection).length()
}

/// Inclusive pixel bounds touched by a drawing call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirtyRect {
    pub min: [u32; 2],
    pub max: [u32; 2],
}

/// Paint every pixel whose center lies within `radius` of the segment.
///
/// The covered shape is a capsule, so consecutive segments meet with
/// round joins and the stroke ends with round caps. A zero-length segment
/// paints a disc. Returns the pixel bounds that were scanned.
pub fn draw_segment(
    buffer: &mut RgbaImage,
    start: Pos2,
    end: Pos2,
    radius: f32,
    color: Rgba<u8>,
) -> Option<DirtyRect> {
    let (width, height) = buffer.dimensions();
    if width == 0 || height == 0 {
        return None;
    }
    let radius = radius.max(MIN_RADIUS);

    let min_x = (start.x.min(end.x) - radius).floor().max(0.0) as u32;
    let min_y = (start.y.min(end.y) - radius).floor().max(0.0) as u32;
    let max_x = ((start.x.max(end.x) + radius).ceil().max(0.0) as u32).min(width - 1);
    let max_y = ((start.y.max(end.y) + radius).ceil().max(0.0) as u32).min(height - 1);
    if min_x > max_x || min_y > max_y {
        return None;
    }

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let center = Pos2::new(x as f32 + 0.5, y as f32 + 0.5);
            if distance_to_segment(center, start, end) <= radius {
                buffer.put_pixel(x, y, color);
            }
        }
    }

    Some(DirtyRect {
        min: [min_x, min_y],
        max: [max_x, max_y],
    })
}

/// A stroke in progress. Positions are physical buffer coordinates.
///
/// Each call rasterizes immediately, so ink appears while the pointer moves.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveStroke {
    last: Pos2,
    color: Rgba<u8>,
    radius: f32,
    segments: usize,
}

impl ActiveStroke {
    pub fn new(at: Pos2, color: Rgba<u8>, width: f32) -> Self {
        Self {
            last: at,
            color,
            radius: width / 2.0,
            segments: 0,
        }
    }

    /// Stamp a dot at the stroke's start, so a press-and-release without
    /// movement still leaves a mark.
    pub fn stamp(&self, buffer: &mut RgbaImage) -> Option<DirtyRect> {
        draw_segment(buffer, self.last, self.last, self.radius, self.color)
    }

    pub fn extend(&mut self, buffer: &mut RgbaImage, to: Pos2) -> Option<DirtyRect> {
        let dirty = draw_segment(buffer, self.last, to, self.radius, self.color);
        self.last = to;
        self.segments += 1;
        dirty
    }

    pub fn segments(&self) -> usize {
        self.segments
    }
}
