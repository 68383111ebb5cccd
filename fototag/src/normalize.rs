//! Coercing every input into baseline JPEG.
//!
//! GPS metadata is written as an Exif APP1 segment, which only JPEG carries
//! in this crate. PNG, WebP, and HEIC inputs are therefore decoded and
//! re-encoded as JPEG before tagging. JPEG inputs pass through untouched so
//! their existing compression and metadata survive.

use image::DynamicImage;

use crate::asset::MediaType;

/// Quality used when re-encoding converted inputs
pub const JPEG_QUALITY: u8 = 95;

#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    #[error("Failed to decode {0} data: {1}")]
    Decode(&'static str, image::ImageError),
    #[error("Failed to encode JPEG: {0}")]
    Encode(#[from] jpeg_encoder::EncodingError),
    #[error("HEIC input but no HEIC decoder was configured")]
    NoHeicDecoder,
    #[error("HEIC decoder failed: {0}")]
    Heic(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("Image dimensions too large for JPEG ({0}x{1})")]
    DimensionsTooLarge(u32, u32),
}

/// Pluggable HEIC decoder.
///
/// HEIC decoding needs a patent-encumbered HEVC codec that no pure-Rust
/// crate in our stack provides, so the capability is injected. A
/// [`Normalizer`] without one rejects HEIC inputs with
/// [`NormalizeError::NoHeicDecoder`].
pub trait HeicDecoder {
    fn decode(
        &self,
        data: &[u8],
    ) -> Result<DynamicImage, Box<dyn std::error::Error + Send + Sync>>;
}

#[derive(Default)]
pub struct Normalizer {
    heic: Option<Box<dyn HeicDecoder>>,
}

impl Normalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_heic_decoder(decoder: Box<dyn HeicDecoder>) -> Self {
        Self { heic: Some(decoder) }
    }

    /// Return JPEG data for the input, converting if necessary.
    ///
    /// JPEG inputs are returned as-is. Everything else is decoded and
    /// re-encoded as a baseline JPEG at quality [`JPEG_QUALITY`], which
    /// drops any metadata the source format carried.
    pub fn normalize(
        &self,
        data: Vec<u8>,
        media_type: MediaType,
    ) -> Result<Vec<u8>, NormalizeError> {
        let image = match media_type {
            MediaType::Jpeg => return Ok(data),
            MediaType::Png => {
                image::load_from_memory_with_format(&data, image::ImageFormat::Png)
                    .map_err(|err| NormalizeError::Decode("PNG", err))?
            }
            MediaType::WebP => {
                image::load_from_memory_with_format(&data, image::ImageFormat::WebP)
                    .map_err(|err| NormalizeError::Decode("WebP", err))?
            }
            MediaType::Heic => {
                let decoder = self.heic.as_ref().ok_or(NormalizeError::NoHeicDecoder)?;
                decoder.decode(&data).map_err(NormalizeError::Heic)?
            }
        };

        tracing::debug!(
            "Re-encoding {}x{} {:?} input as JPEG",
            image.width(),
            image.height(),
            media_type
        );

        encode_jpeg(&image)
    }
}

impl std::fmt::Debug for Normalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Normalizer")
            .field("heic", &self.heic.is_some())
            .finish()
    }
}

fn encode_jpeg(image: &DynamicImage) -> Result<Vec<u8>, NormalizeError> {
    let (width, height) = (image.width(), image.height());

    // jpeg-encoder takes u16 dimensions
    let (Ok(width), Ok(height)) = (u16::try_from(width), u16::try_from(height)) else {
        return Err(NormalizeError::DimensionsTooLarge(
            image.width(),
            image.height(),
        ));
    };

    // JPEG has no alpha channel
    let rgb = image.to_rgb8();

    let mut out = Vec::new();
    let encoder = jpeg_encoder::Encoder::new(&mut out, JPEG_QUALITY);
    encoder.encode(rgb.as_raw(), width, height, jpeg_encoder::ColorType::Rgb)?;

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jpeg_passthrough() {
        let data = vec![0xFF, 0xD8, 0xFF, 0xE0, 1, 2, 3];
        let out = Normalizer::new()
            .normalize(data.clone(), MediaType::Jpeg)
            .unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn heic_without_decoder() {
        let err = Normalizer::new()
            .normalize(vec![0; 16], MediaType::Heic)
            .unwrap_err();
        assert!(matches!(err, NormalizeError::NoHeicDecoder));
    }

    #[test]
    fn png_becomes_jpeg() {
        let image = DynamicImage::new_rgb8(4, 4);
        let mut png = std::io::Cursor::new(Vec::new());
        image.write_to(&mut png, image::ImageFormat::Png).unwrap();

        let out = Normalizer::new()
            .normalize(png.into_inner(), MediaType::Png)
            .unwrap();
        assert!(out.starts_with(&[0xFF, 0xD8, 0xFF]));
    }
}
