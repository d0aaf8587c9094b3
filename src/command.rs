use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbaImage};

use crate::error::SurfaceResult;

pub const DEFAULT_EXPORT_NAME: &str = "my-tracing.png";

/// Commands the host issues to the drawing surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Reset to the blank background, keeping the line art
    Clear,
    /// Step back to the previous settled state
    Undo,
    /// Produce the composited image without touching the buffer
    Export { file_name: String },
}

impl Command {
    pub fn export() -> Self {
        Command::Export {
            file_name: DEFAULT_EXPORT_NAME.to_owned(),
        }
    }
}

#[derive(Debug)]
pub enum CommandOutcome {
    Applied,
    /// Nothing to do: uninitialised surface or empty history
    Ignored,
    Exported(ExportedImage),
}

/// A copy of the visible surface at physical resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedImage {
    pub file_name: String,
    pub image: RgbaImage,
}

impl ExportedImage {
    pub fn encode_png(&self) -> SurfaceResult<Vec<u8>> {
        let mut bytes = Vec::new();
        self.image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }

    /// Write the PNG into `dir` under the suggested file name.
    pub fn save_to(&self, dir: &Path) -> SurfaceResult<PathBuf> {
        let path = dir.join(&self.file_name);
        std::fs::write(&path, self.encode_png()?)?;
        log::info!(
            "Saved {}x{} export to {}",
            self.image.width(),
            self.image.height(),
            path.display()
        );
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn png_encoding_preserves_pixels() {
        let mut expected = RgbaImage::from_pixel(3, 2, Rgba([255, 255, 255, 255]));
        expected.put_pixel(1, 1, Rgba([255, 65, 54, 255]));
        let export = ExportedImage {
            file_name: DEFAULT_EXPORT_NAME.into(),
            image: expected.clone(),
        };

        let bytes = export.encode_png().unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded, expected);
    }

    #[test]
    fn default_export_uses_suggested_name() {
        assert_eq!(
            Command::export(),
            Command::Export {
                file_name: "my-tracing.png".into()
            }
        );
    }
}
