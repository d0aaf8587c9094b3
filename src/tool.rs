use image::Rgba;
use serde::{Deserialize, Serialize};

use crate::color::{parse_hex_color, DEFAULT_COLOR};

pub const DEFAULT_BRUSH_WIDTH: u32 = 20;
pub const MAX_BRUSH_WIDTH: u32 = 80;

#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum ToolKind {
    #[default]
    Brush,
    Eraser,
    Bucket,
}

impl ToolKind {
    pub const ALL: [ToolKind; 3] = [ToolKind::Brush, ToolKind::Eraser, ToolKind::Bucket];

    pub fn label(&self) -> &'static str {
        match self {
            ToolKind::Brush => "🖌 Brush",
            ToolKind::Eraser => "⌫ Eraser",
            ToolKind::Bucket => "🪣 Fill",
        }
    }

    /// Whether pointer drags with this tool produce a stroke.
    pub fn draws_strokes(&self) -> bool {
        !matches!(self, ToolKind::Bucket)
    }
}

/// Configuration supplied by the UI and re-read on every input event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    pub tool: ToolKind,
    /// `#RRGGBB` or `#RGB`
    pub color: String,
    pub brush_width: u32,
    /// Path, `http(s)://` URL or `data:` URL of the line-art image
    pub background: Option<String>,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            tool: ToolKind::Brush,
            color: DEFAULT_COLOR.to_owned(),
            brush_width: DEFAULT_BRUSH_WIDTH,
            background: None,
        }
    }
}

impl ToolSettings {
    pub fn rgba(&self) -> Rgba<u8> {
        parse_hex_color(&self.color)
    }

    /// Brush width, never below one pixel.
    pub fn width(&self) -> u32 {
        self.brush_width.max(1)
    }
}
