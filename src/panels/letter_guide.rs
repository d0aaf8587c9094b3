use eframe::egui::{self, Align2, Color32, FontId, Rect};
use serde::{Deserialize, Serialize};

/// Which character set the child is tracing.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum TraceMode {
    #[default]
    Upper,
    Lower,
    Numbers,
}

const UPPER: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWER: &str = "abcdefghijklmnopqrstuvwxyz";
const NUMBERS: &str = "0123456789";

impl TraceMode {
    pub const ALL: [TraceMode; 3] = [TraceMode::Upper, TraceMode::Lower, TraceMode::Numbers];

    pub fn label(&self) -> &'static str {
        match self {
            TraceMode::Upper => "ABC",
            TraceMode::Lower => "abc",
            TraceMode::Numbers => "123",
        }
    }

    pub fn characters(&self) -> &'static str {
        match self {
            TraceMode::Upper => UPPER,
            TraceMode::Lower => LOWER,
            TraceMode::Numbers => NUMBERS,
        }
    }

    pub fn len(&self) -> usize {
        self.characters().len()
    }

    /// The character at `index`, wrapping past the end.
    pub fn character(&self, index: usize) -> char {
        let chars = self.characters().as_bytes();
        chars[index % chars.len()] as char
    }

    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.len()
    }

    pub fn previous_index(&self, index: usize) -> usize {
        (index % self.len() + self.len() - 1) % self.len()
    }
}

const GUIDE_COLOR: Color32 = Color32::from_rgba_premultiplied(120, 120, 120, 90);

/// Paint the tracing guide glyph centered over the canvas.
///
/// Drawn by the UI only, so it never lands in the pixel buffer or an export.
pub fn paint_guide(painter: &egui::Painter, rect: Rect, character: char) {
    let size = rect.height().min(rect.width()) * 0.8;
    if size <= 0.0 {
        return;
    }
    painter.text(
        rect.center(),
        Align2::CENTER_CENTER,
        character,
        FontId::proportional(size),
        GUIDE_COLOR,
    );
}
