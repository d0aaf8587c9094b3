use thiserror::Error;

/// Errors raised while loading a background image or exporting the surface.
///
/// Drawing operations themselves never fail; these only surface through
/// [`crate::event::SurfaceEvent::BackgroundFailed`] or an export result.
#[derive(Error, Debug)]
pub enum SurfaceError {
    #[error("unsupported background source: {0}")]
    UnsupportedSource(String),

    #[error("malformed data URL: {0}")]
    InvalidDataUrl(String),

    #[error("failed to decode base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("failed to read background image: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to fetch background image: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("decoded image is empty")]
    EmptyImage,
}

pub type SurfaceResult<T> = Result<T, SurfaceError>;
