use crate::asset::ValidationError;
use crate::normalize::NormalizeError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),
    #[error("Failed to convert image: {0}")]
    Normalize(#[from] NormalizeError),
    #[error("Failed to read JPEG structure: {0}")]
    Jpeg(#[from] fototag_jpeg::Error),
    #[error("Failed to write metadata: {0}")]
    Exif(#[from] fototag_exif::error::Error),
    #[error("Coordinate out of range: {0}")]
    Location(#[from] fototag_common::geography::OutOfRangeError),
    #[error("Failed to build archive: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("{0}")]
    Io(#[from] std::io::Error),
}
