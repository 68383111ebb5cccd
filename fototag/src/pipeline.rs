use fototag_common::geography::Location;
use fototag_exif::Exif;
use fototag_jpeg::Jpeg;

use crate::asset::MediaType;
use crate::error::{Error, Result};
use crate::normalize::Normalizer;

/// What to write into each image
///
/// The position is mandatory; a tagging run without a coordinate has
/// nothing to do. Description and keywords are optional extras.
#[derive(Clone, Debug)]
pub struct GeotagRequest {
    pub location: Location,
    pub description: Option<String>,
    pub keywords: Vec<String>,
}

impl GeotagRequest {
    pub fn location(location: Location) -> Self {
        Self {
            location,
            description: None,
            keywords: Vec::new(),
        }
    }
}

/// Applies a [`GeotagRequest`] to single images.
///
/// The input is first brought into JPEG form, then its Exif segment is
/// parsed, updated, re-serialized, and spliced back. Existing metadata like
/// camera make, model, and capture time survives; old GPS fields are
/// replaced wholesale so tagging the same file twice never leaves stale
/// position fragments behind.
#[derive(Debug, Default)]
pub struct Pipeline {
    normalizer: Normalizer,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_normalizer(normalizer: Normalizer) -> Self {
        Self { normalizer }
    }

    /// Tag one image, returning the finished JPEG data
    pub fn tag_image(
        &self,
        data: Vec<u8>,
        media_type: MediaType,
        request: &GeotagRequest,
    ) -> Result<Vec<u8>> {
        let jpeg_data = self.normalizer.normalize(data, media_type)?;
        let mut jpeg = Jpeg::new(jpeg_data)?;

        // A fresh container when the image has no Exif yet or it is corrupt
        let mut exif = jpeg
            .exif_data()
            .next()
            .and_then(|x| Exif::parse(x.to_vec()).ok())
            .unwrap_or_default();

        exif.set_gps(request.location);

        if let Some(description) = &request.description {
            exif.set_description(description);
        }

        if !request.keywords.is_empty() {
            // XP keywords are conventionally semicolon separated
            exif.set_keywords(&request.keywords.join(";"));
        }

        tracing::debug!(
            "Writing metadata: location={:?} description={:?} keywords={}",
            request.location,
            request.description,
            request.keywords.len()
        );

        jpeg.set_exif(&exif.to_bytes())?;

        Ok(jpeg.into_inner())
    }

    /// Read back the metadata of a finished JPEG
    pub fn read_metadata(&self, data: &[u8]) -> Result<Exif, Error> {
        let jpeg = Jpeg::new(data.to_vec())?;

        let exif = match jpeg.exif_data().next() {
            Some(raw) => Exif::parse(raw.to_vec())?,
            None => Exif::default(),
        };

        Ok(exif)
    }
}
