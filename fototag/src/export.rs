//! Human- and machine-readable views of a file's metadata.

use serde::Serialize;

use fototag_common::geography::Location;
use fototag_exif::Exif;

/// Hemisphere-suffixed display form
///
/// ```
/// # use fototag::export::format_coordinates;
/// # use fototag::Location;
/// let loc = Location::new(48.8584, 2.2945).unwrap();
/// assert_eq!(format_coordinates(&loc), "48.858400° N, 2.294500° E");
/// ```
pub fn format_coordinates(location: &Location) -> String {
    format!(
        "{:.6}° {}, {:.6}° {}",
        location.lat.0.abs(),
        location.lat_ref(),
        location.lon.0.abs(),
        location.lon_ref(),
    )
}

/// Everything this crate can read out of one image, ready for export
#[derive(Debug, Default, Serialize)]
pub struct MetadataSummary {
    pub file_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub make: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub software: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_time_original: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exposure_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub f_number: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iso_speed_rating: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focal_length: Option<f32>,
}

#[derive(Debug, Serialize)]
pub struct LocationSummary {
    pub latitude: f64,
    pub longitude: f64,
    /// Display form like `48.858400° N, 2.294500° E`
    pub display: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
}

impl MetadataSummary {
    pub fn new(file_name: impl Into<String>, exif: &Exif) -> Self {
        let location = exif.gps().map(|x| LocationSummary {
            latitude: x.lat.0,
            longitude: x.lon.0,
            display: format_coordinates(&x),
            altitude: exif.altitude(),
        });

        Self {
            file_name: file_name.into(),
            location,
            description: exif.description(),
            keywords: exif.keywords(),
            make: exif.make(),
            model: exif.model(),
            software: exif.software(),
            orientation: exif.orientation(),
            date_time_original: exif.date_time_original(),
            exposure_time: exif
                .exposure_time()
                .map(|(num, denom)| format!("{num}/{denom}")),
            f_number: exif.f_number(),
            iso_speed_rating: exif.iso_speed_rating(),
            focal_length: exif.focal_length(),
        }
    }

    pub fn to_json(&self) -> String {
        // Serialization of this struct cannot fail
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_skips_absent_fields() {
        let mut exif = Exif::default();
        exif.set_description("Test shot");

        let summary = MetadataSummary::new("a.jpg", &exif);
        let json = summary.to_json();

        assert!(json.contains("\"description\": \"Test shot\""));
        assert!(!json.contains("make"));
        assert!(!json.contains("location"));
    }

    #[test]
    fn location_display() {
        let loc = Location::new(-33.8688, 151.2093).unwrap();
        assert_eq!(format_coordinates(&loc), "33.868800° S, 151.209300° E");
    }
}
