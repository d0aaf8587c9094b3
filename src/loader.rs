//! Loading the background image that the line art is extracted from.
//!
//! Loading runs on a worker thread; the surface polls the pending handle
//! once per frame and only extracts line art after pixels are available.

use std::path::PathBuf;
use std::sync::Arc;

use base64::{engine::general_purpose, Engine as _};
use image::RgbaImage;
use parking_lot::Mutex;

use crate::error::{SurfaceError, SurfaceResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackgroundSource {
    Path(PathBuf),
    Url(String),
    DataUrl(String),
}

impl BackgroundSource {
    pub fn parse(source: &str) -> SurfaceResult<Self> {
        let source = source.trim();
        if source.is_empty() {
            return Err(SurfaceError::UnsupportedSource("empty source".into()));
        }

        let lower = source.to_ascii_lowercase();
        if lower.starts_with("data:") {
            Ok(Self::DataUrl(source.to_owned()))
        } else if lower.starts_with("http://") || lower.starts_with("https://") {
            Ok(Self::Url(source.to_owned()))
        } else if lower.contains("://") {
            Err(SurfaceError::UnsupportedSource(source.to_owned()))
        } else {
            Ok(Self::Path(PathBuf::from(source)))
        }
    }

    /// Short human-readable description, used in logs and notifications.
    pub fn describe(&self) -> String {
        match self {
            Self::Path(path) => path.display().to_string(),
            Self::Url(url) => url.clone(),
            Self::DataUrl(data) => {
                let header = data.split(',').next().unwrap_or("data:");
                format!("{header},…")
            }
        }
    }

    pub fn fetch_bytes(&self) -> SurfaceResult<Vec<u8>> {
        match self {
            Self::Path(path) => Ok(std::fs::read(path)?),
            Self::Url(url) => {
                let response = reqwest::blocking::get(url)?.error_for_status()?;
                Ok(response.bytes()?.to_vec())
            }
            Self::DataUrl(data) => decode_data_url(data),
        }
    }

    /// Fetch and decode, blocking the calling thread.
    pub fn load(&self) -> SurfaceResult<RgbaImage> {
        let bytes = self.fetch_bytes()?;
        log::debug!("Fetched {} bytes from {}", bytes.len(), self.describe());
        decode_image(&bytes)
    }
}

/// Decode the payload of a base64 `data:` URL.
pub fn decode_data_url(data: &str) -> SurfaceResult<Vec<u8>> {
    let rest = data
        .get(..5)
        .filter(|scheme| scheme.eq_ignore_ascii_case("data:"))
        .map(|_| &data[5..])
        .ok_or_else(|| SurfaceError::InvalidDataUrl("missing data: scheme".into()))?;

    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| SurfaceError::InvalidDataUrl("missing ',' separator".into()))?;

    if !header.to_ascii_lowercase().ends_with(";base64") {
        return Err(SurfaceError::InvalidDataUrl(format!(
            "only base64 payloads are supported, got {header:?}"
        )));
    }

    let payload: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    Ok(general_purpose::STANDARD.decode(payload)?)
}

pub fn decode_image(bytes: &[u8]) -> SurfaceResult<RgbaImage> {
    let image = image::load_from_memory(bytes)?.to_rgba8();
    if image.width() == 0 || image.height() == 0 {
        return Err(SurfaceError::EmptyImage);
    }
    Ok(image)
}

type LoadSlot = Arc<Mutex<Option<SurfaceResult<RgbaImage>>>>;

/// A background image that is still being loaded.
#[derive(Debug)]
pub struct PendingBackground {
    description: String,
    slot: LoadSlot,
}

impl PendingBackground {
    /// Start loading `source` on a worker thread.
    pub fn spawn(source: BackgroundSource) -> Self {
        let description = source.describe();
        let slot: LoadSlot = Arc::new(Mutex::new(None));

        let worker_slot = Arc::clone(&slot);
        let spawned = std::thread::Builder::new()
            .name("background-loader".into())
            .spawn(move || {
                let result = source.load();
                *worker_slot.lock() = Some(result);
            });

        if let Err(err) = spawned {
            log::error!("Could not start background loader: {}", err);
            *slot.lock() = Some(Err(SurfaceError::Io(err)));
        }

        Self { description, slot }
    }

    /// Take the result if the worker has finished.
    pub fn poll(&self) -> Option<SurfaceResult<RgbaImage>> {
        self.slot.lock().take()
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba};
    use std::io::Cursor;
    use std::time::{Duration, Instant};

    fn png_bytes() -> Vec<u8> {
        let image = RgbaImage::from_pixel(2, 1, Rgba([0, 0, 0, 255]));
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn parses_source_kinds() {
        assert_eq!(
            BackgroundSource::parse("  art/cat.png ").unwrap(),
            BackgroundSource::Path(PathBuf::from("art/cat.png"))
        );
        assert!(matches!(
            BackgroundSource::parse("https://example.com/a.png").unwrap(),
            BackgroundSource::Url(_)
        ));
        assert!(matches!(
            BackgroundSource::parse("DATA:image/png;base64,AAAA").unwrap(),
            BackgroundSource::DataUrl(_)
        ));
        assert!(BackgroundSource::parse("").is_err());
        assert!(BackgroundSource::parse("ftp://example.com/a.png").is_err());
    }

    #[test]
    fn decodes_base64_data_urls() {
        let encoded = general_purpose::STANDARD.encode(png_bytes());
        let url = format!("data:image/png;base64,{encoded}");

        let image = BackgroundSource::parse(&url).unwrap().load().unwrap();
        assert_eq!(image.dimensions(), (2, 1));
    }

    #[test]
    fn rejects_malformed_data_urls() {
        assert!(matches!(
            decode_data_url("data:image/png,plain"),
            Err(SurfaceError::InvalidDataUrl(_))
        ));
        assert!(matches!(
            decode_data_url("data:image/png;base64"),
            Err(SurfaceError::InvalidDataUrl(_))
        ));
        assert!(matches!(
            decode_data_url("data:image/png;base64,@@@"),
            Err(SurfaceError::Base64(_))
        ));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        assert!(matches!(
            decode_image(b"definitely not an image"),
            Err(SurfaceError::Image(_))
        ));
    }

    #[test]
    fn missing_file_is_reported_by_the_worker() {
        let pending = PendingBackground::spawn(BackgroundSource::Path(PathBuf::from(
            "/nonexistent/doodle/background.png",
        )));

        let deadline = Instant::now() + Duration::from_secs(5);
        let result = loop {
            if let Some(result) = pending.poll() {
                break result;
            }
            assert!(Instant::now() < deadline, "loader never finished");
            std::thread::sleep(Duration::from_millis(5));
        };
        assert!(matches!(result, Err(SurfaceError::Io(_))));
        assert!(pending.poll().is_none());
    }
}
