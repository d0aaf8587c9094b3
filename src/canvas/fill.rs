use image::{Rgba, RgbaImage};

/// Recolor the 4-connected region of pixels matching the color at `seed`.
///
/// Works on a private copy of the pixel data with an explicit stack and
/// commits the result back in a single write. Returns the number of
/// recolored pixels; zero when the seed is outside the buffer or already
/// has `fill` (alpha included).
pub fn flood_fill(buffer: &mut RgbaImage, seed: [u32; 2], fill: Rgba<u8>) -> usize {
    let boundary = buffer.clone();
    flood_fill_within(buffer, &boundary, seed, fill)
}

/// Flood fill where the region is traced on `boundary` but the fill color
/// is written into `buffer`.
///
/// The surface traces regions on the composited image, so line art seals
/// them, while painting into the ink-free base buffer. Both images must
/// have the same dimensions.
pub fn flood_fill_within(
    buffer: &mut RgbaImage,
    boundary: &RgbaImage,
    seed: [u32; 2],
    fill: Rgba<u8>,
) -> usize {
    let (width, height) = buffer.dimensions();
    if boundary.dimensions() != (width, height) {
        log::warn!(
            "Fill boundary is {:?} but buffer is {:?}; not filling",
            boundary.dimensions(),
            buffer.dimensions()
        );
        return 0;
    }
    let [seed_x, seed_y] = seed;
    if seed_x >= width || seed_y >= height {
        return 0;
    }

    let target = *boundary.get_pixel(seed_x, seed_y);
    if target == fill {
        return 0;
    }

    // Recolored as the region grows, so each pixel is visited once.
    let mut region = boundary.as_raw().clone();
    let mut data = buffer.as_raw().clone();
    let index = |x: u32, y: u32| (y as usize * width as usize + x as usize) * 4;

    let mut stack = vec![(seed_x, seed_y)];
    let mut filled = 0;

    while let Some((x, y)) = stack.pop() {
        let i = index(x, y);
        if region[i..i + 4] != target.0 {
            continue;
        }
        region[i..i + 4].copy_from_slice(&fill.0);
        data[i..i + 4].copy_from_slice(&fill.0);
        filled += 1;

        if x > 0 {
            stack.push((x - 1, y));
        }
        if x + 1 < width {
            stack.push((x + 1, y));
        }
        if y > 0 {
            stack.push((x, y - 1));
        }
        if y + 1 < height {
            stack.push((x, y + 1));
        }
    }

    match RgbaImage::from_raw(width, height, data) {
        Some(result) => *buffer = result,
        None => {
            log::error!("Flood fill produced a buffer of the wrong size, discarding");
            return 0;
        }
    }

    filled
}
