//! Exif metadata codec
//!
//! Parses the TIFF-structured Exif payload into three tag groups (primary
//! image, camera/exposure, GPS), provides typed accessors and geotagging
//! writers, and re-serializes the payload for splicing back into a JPEG.

pub mod error;
mod exif;
pub mod internal;

pub use exif::{Exif, GPS_VERSION_ID};
