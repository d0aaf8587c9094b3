use image::Rgba;

/// Opaque white, the color of a freshly cleared surface.
pub const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Returned for any color string that cannot be parsed.
pub const FALLBACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// The tracing palette offered by the tools panel.
pub const PALETTE: [&str; 5] = [
    "#FF4136", // red
    "#0074D9", // blue
    "#2ECC40", // green
    "#B10DC9", // purple
    "#000000", // black
];

pub const DEFAULT_COLOR: &str = PALETTE[0];

/// Parse a `#RRGGBB` or `#RGB` string (leading `#` optional) into an opaque color.
///
/// Anything else falls back to opaque black so a bad value never stops drawing.
pub fn parse_hex_color(input: &str) -> Rgba<u8> {
    let hex = input.trim();
    let hex = hex.strip_prefix('#').unwrap_or(hex);

    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        log::debug!("Unparseable color {:?}, using fallback", input);
        return FALLBACK;
    }

    let expanded: String = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 => hex.to_owned(),
        _ => {
            log::debug!("Unparseable color {:?}, using fallback", input);
            return FALLBACK;
        }
    };

    let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).unwrap_or(0);
    Rgba([channel(0), channel(2), channel(4), 255])
}

/// Convert a core color into the egui color used by the UI.
pub fn to_color32(color: Rgba<u8>) -> egui::Color32 {
    let [r, g, b, a] = color.0;
    egui::Color32::from_rgba_unmultiplied(r, g, b, a)
}
