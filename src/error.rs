use plotters::drawing::DrawingAreaErrorKind;
use thiserror::Error;

/// Everything the engine and the renderers can fail with.
#[derive(Error, Debug)]
pub enum Error {
    /// Region, grid size, iteration cap or panel settings out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("drawing error: {0}")]
    Draw(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Config(#[from] serde_json::Error),
}

// Backend error types are generic; only the message is kept.
impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for Error {
    fn from(e: DrawingAreaErrorKind<E>) -> Self {
        Error::Draw(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

pub(crate) fn invalid(msg: impl Into<String>) -> Error {
    Error::InvalidConfiguration(msg.into())
}
