//! Image inputs and their admission rules.
//!
//! An [`ImageAsset`] is one user-supplied picture waiting to be tagged. The
//! type of the picture is determined from the payload itself via
//! [`MediaType::sniff`], with the declared MIME type only as fallback, since
//! browsers and shells routinely mislabel files.

use std::sync::atomic::{AtomicU64, Ordering};

use fototag_common::geography::Location;
use fototag_exif::Exif;
use fototag_jpeg::Jpeg;

/// Largest accepted input payload (20 MiB)
pub const MAX_FILE_SIZE: usize = 20 * 1024 * 1024;
/// Largest accepted batch
pub const MAX_FILES: usize = 20;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("File is empty")]
    Empty,
    #[error("File is too large ({size} bytes, limit is {MAX_FILE_SIZE})")]
    TooLarge { size: usize },
    #[error("Too many files (limit is {MAX_FILES})")]
    TooManyFiles,
    #[error("Unsupported file type '{mime_type}'")]
    UnsupportedType { mime_type: String },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MediaType {
    Jpeg,
    Png,
    WebP,
    Heic,
}

impl MediaType {
    /// Determine the type from the payload's magic bytes
    pub fn sniff(data: &[u8]) -> Option<Self> {
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(Self::Jpeg)
        } else if data.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
            Some(Self::Png)
        } else if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
            Some(Self::WebP)
        } else if Self::sniff_ftyp(data) {
            Some(Self::Heic)
        } else {
            None
        }
    }

    /// ISO base media files start with an `ftyp` box naming their brand
    fn sniff_ftyp(data: &[u8]) -> bool {
        if data.len() < 12 || &data[4..8] != b"ftyp" {
            return false;
        }

        matches!(&data[8..12], b"heic" | b"heix" | b"heif" | b"mif1" | b"msf1")
    }

    pub fn from_mime(mime_type: &str) -> Option<Self> {
        match mime_type {
            "image/jpeg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/webp" => Some(Self::WebP),
            "image/heic" | "image/heif" => Some(Self::Heic),
            _ => None,
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::WebP => "image/webp",
            Self::Heic => "image/heic",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::WebP => "webp",
            Self::Heic => "heic",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Status {
    Pending,
    Processing,
    Tagged,
    Failed,
}

/// One image admitted for tagging
#[derive(Debug)]
pub struct ImageAsset {
    id: u64,
    name: String,
    media_type: MediaType,
    data: Vec<u8>,
    status: Status,
    existing_location: Option<Location>,
}

impl ImageAsset {
    /// Admit a file for tagging.
    ///
    /// Rejects empty or oversized payloads, and payloads whose content is not
    /// one of the supported image formats. For JPEG inputs the existing GPS
    /// position, if any, is extracted so callers can surface it before the
    /// user picks a new one.
    pub fn new(
        name: impl Into<String>,
        mime_type: Option<&str>,
        data: Vec<u8>,
    ) -> Result<Self, ValidationError> {
        if data.is_empty() {
            return Err(ValidationError::Empty);
        }

        if data.len() > MAX_FILE_SIZE {
            return Err(ValidationError::TooLarge { size: data.len() });
        }

        let media_type = MediaType::sniff(&data)
            .or_else(|| mime_type.and_then(MediaType::from_mime))
            .ok_or_else(|| ValidationError::UnsupportedType {
                mime_type: mime_type.unwrap_or("unknown").to_string(),
            })?;

        let existing_location = if media_type == MediaType::Jpeg {
            Self::read_location(&data)
        } else {
            None
        };

        Ok(Self {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            name: name.into(),
            media_type,
            data,
            status: Status::Pending,
            existing_location,
        })
    }

    fn read_location(data: &[u8]) -> Option<Location> {
        let jpeg = Jpeg::new(data.to_vec()).ok()?;
        let raw = jpeg.exif_data().next()?;
        Exif::parse(raw.to_vec()).ok()?.gps()
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn media_type(&self) -> MediaType {
        self.media_type
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub(crate) fn set_status(&mut self, status: Status) {
        self.status = status;
    }

    /// GPS position already present in the file, if any
    pub fn existing_location(&self) -> Option<Location> {
        self.existing_location
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// File name stem without the final extension
    pub fn base_name(&self) -> &str {
        match self.name.rsplit_once('.') {
            Some((base, _)) if !base.is_empty() => base,
            _ => &self.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sniff_beats_mime() {
        let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
        let asset = ImageAsset::new("photo.jpg", Some("image/jpeg"), png.to_vec()).unwrap();
        assert_eq!(asset.media_type(), MediaType::Png);
    }

    #[test]
    fn heic_brand() {
        let mut data = vec![0, 0, 0, 0x18];
        data.extend_from_slice(b"ftypheic");
        data.extend_from_slice(&[0; 16]);
        assert_eq!(MediaType::sniff(&data), Some(MediaType::Heic));
    }

    #[test]
    fn unknown_payload_rejected() {
        let err = ImageAsset::new("notes.txt", Some("text/plain"), b"hello".to_vec()).unwrap_err();
        assert!(matches!(err, ValidationError::UnsupportedType { .. }));
    }

    #[test]
    fn size_cap() {
        let err = ImageAsset::new("big.jpg", None, vec![0xFF; MAX_FILE_SIZE + 1]).unwrap_err();
        assert!(matches!(err, ValidationError::TooLarge { .. }));
    }

    #[test]
    fn base_name_strips_extension() {
        let jpeg = vec![0xFF, 0xD8, 0xFF, 0xE0];
        let asset = ImageAsset::new("holiday.photo.jpeg", None, jpeg).unwrap();
        assert_eq!(asset.base_name(), "holiday.photo");
    }
}
