use doodle_trace::canvas::flood_fill;
use doodle_trace::color::parse_hex_color;
use image::{Rgba, RgbaImage};

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

fn ringed(size: u32) -> RgbaImage {
    let mut buffer = RgbaImage::from_pixel(size, size, WHITE);
    for i in 0..size {
        buffer.put_pixel(i, 0, BLACK);
        buffer.put_pixel(i, size - 1, BLACK);
        buffer.put_pixel(0, i, BLACK);
        buffer.put_pixel(size - 1, i, BLACK);
    }
    buffer
}

#[test]
fn uniform_buffer_is_filled_completely() {
    let mut buffer = RgbaImage::from_pixel(10, 10, parse_hex_color("#FFFFFF"));
    let red = parse_hex_color("#FF0000");

    let filled = flood_fill(&mut buffer, [5, 5], red);

    assert_eq!(filled, 100);
    assert!(buffer.pixels().all(|p| *p == Rgba([255, 0, 0, 255])));
}

#[test]
fn ring_contains_the_fill() {
    let mut buffer = ringed(10);
    let blue = parse_hex_color("#0000FF");

    let filled = flood_fill(&mut buffer, [5, 5], blue);

    assert_eq!(filled, 64);
    for (x, y, pixel) in buffer.enumerate_pixels() {
        let border = x == 0 || y == 0 || x == 9 || y == 9;
        let expected = if border { BLACK } else { blue };
        assert_eq!(*pixel, expected, "pixel ({x}, {y})");
    }
}

#[test]
fn filling_with_the_existing_color_is_idempotent() {
    let mut buffer = ringed(12);
    buffer.put_pixel(4, 4, Rgba([10, 20, 30, 255]));
    let before = buffer.clone();

    assert_eq!(flood_fill(&mut buffer, [6, 6], WHITE), 0);
    assert_eq!(buffer, before);

    let green = parse_hex_color("#2ECC40");
    flood_fill(&mut buffer, [6, 6], green);
    let once = buffer.clone();
    assert_eq!(flood_fill(&mut buffer, [6, 6], green), 0);
    assert_eq!(buffer, once);
}

#[test]
fn fill_never_crosses_an_irregular_boundary() {
    // A diamond-ish wall drawn with 4-connected steps.
    let mut buffer = RgbaImage::from_pixel(21, 21, WHITE);
    let center = 10i32;
    let radius = 7i32;
    for y in 0..21i32 {
        for x in 0..21i32 {
            let d = (x - center).abs() + (y - center).abs();
            if d == radius || d == radius + 1 {
                buffer.put_pixel(x as u32, y as u32, BLACK);
            }
        }
    }
    let before = buffer.clone();
    let purple = parse_hex_color("#B10DC9");

    flood_fill(&mut buffer, [10, 10], purple);

    for (x, y, pixel) in buffer.enumerate_pixels() {
        let d = (x as i32 - center).abs() + (y as i32 - center).abs();
        if d < radius {
            assert_eq!(*pixel, purple, "inside pixel ({x}, {y})");
        } else {
            assert_eq!(pixel, before.get_pixel(x, y), "outside pixel ({x}, {y})");
        }
    }
}

#[test]
fn fill_from_the_wall_recolors_only_the_wall() {
    let mut buffer = ringed(6);
    let red = parse_hex_color("#F00");

    let filled = flood_fill(&mut buffer, [0, 0], red);

    assert_eq!(filled, 20);
    assert_eq!(*buffer.get_pixel(2, 2), WHITE);
    assert_eq!(*buffer.get_pixel(5, 3), red);
}
