use fototag_common::exif::{Group, Tag};
use fototag_common::geography::{LatRef, Location, LonRef, Rational};

use crate::error::Result;
use crate::internal::{self, TagGroups, Value};

/// GPS tag version written with every GPS group
pub const GPS_VERSION_ID: [u8; 4] = [2, 3, 0, 0];

/// Parsed metadata container
///
/// An empty container is valid and writable; [`Exif::to_bytes`] always
/// produces a structurally complete payload.
#[derive(Debug, Clone, Default)]
pub struct Exif {
    groups: TagGroups,
}

impl Exif {
    /// Parse a raw Exif payload (without the JPEG segment identifier)
    pub fn parse(data: Vec<u8>) -> Result<Self> {
        Ok(Self {
            groups: internal::decode(data)?,
        })
    }

    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Serialize the container as a fresh Exif payload
    pub fn to_bytes(&self) -> Vec<u8> {
        internal::encode(&self.groups)
    }

    pub fn get(&self, group: Group, tag: Tag) -> Option<&Value> {
        self.groups.group(group).get(&tag)
    }

    pub fn set(&mut self, group: Group, tag: Tag, value: Value) {
        self.groups.group_mut(group).insert(tag, value);
    }

    /// Embedded location
    ///
    /// Requires latitude, latitude reference, longitude, and longitude
    /// reference to all be present and well-formed. Partial GPS data reads
    /// as absent.
    pub fn gps(&self) -> Option<Location> {
        let lat_ref = self.get(Group::Gps, Tag::GPS_LATITUDE_REF)?.as_string()?;
        let lat_ref = LatRef::try_from(lat_ref.trim()).ok()?;
        let lat = self.gps_angle(Tag::GPS_LATITUDE)?;

        let lon_ref = self.get(Group::Gps, Tag::GPS_LONGITUDE_REF)?.as_string()?;
        let lon_ref = LonRef::try_from(lon_ref.trim()).ok()?;
        let lon = self.gps_angle(Tag::GPS_LONGITUDE)?;

        Location::from_exif_parts(lat_ref, lat, lon_ref, lon)
    }

    fn gps_angle(&self, tag: Tag) -> Option<[Rational; 3]> {
        self.get(Group::Gps, tag)?.as_rationals()
    }

    /// Replace the GPS group with the given location
    ///
    /// The previous GPS group is dropped entirely, no partial merge.
    pub fn set_gps(&mut self, location: Location) {
        let gps = self.groups.group_mut(Group::Gps);
        gps.clear();

        gps.insert(Tag::GPS_VERSION_ID, Value::Byte(GPS_VERSION_ID.to_vec()));
        gps.insert(
            Tag::GPS_LATITUDE_REF,
            Value::ascii(&location.lat_ref().to_string()),
        );
        gps.insert(
            Tag::GPS_LATITUDE,
            Value::Rational(location.lat.to_dms_rational().to_vec()),
        );
        gps.insert(
            Tag::GPS_LONGITUDE_REF,
            Value::ascii(&location.lon_ref().to_string()),
        );
        gps.insert(
            Tag::GPS_LONGITUDE,
            Value::Rational(location.lon.to_dms_rational().to_vec()),
        );
    }

    pub fn set_description(&mut self, text: &str) {
        self.set(Group::Primary, Tag::IMAGE_DESCRIPTION, Value::ascii(text));
    }

    /// Write the keyword string to the Windows viewer tags
    ///
    /// Written to both XPKeywords and XPComment for maximum viewer
    /// compatibility.
    pub fn set_keywords(&mut self, text: &str) {
        let bytes = utf16le_terminated(text);
        self.set(Group::Primary, Tag::XP_KEYWORDS, Value::Byte(bytes.clone()));
        self.set(Group::Primary, Tag::XP_COMMENT, Value::Byte(bytes));
    }

    pub fn description(&self) -> Option<String> {
        self.get(Group::Primary, Tag::IMAGE_DESCRIPTION)?.as_string()
    }

    pub fn keywords(&self) -> Option<String> {
        let bytes = self.get(Group::Primary, Tag::XP_KEYWORDS)?.as_bytes()?;
        Some(utf16le_to_string(bytes))
    }

    /// Camera manufacturer
    pub fn make(&self) -> Option<String> {
        self.get(Group::Primary, Tag::MAKE)?.as_string()
    }

    /// Camera model
    pub fn model(&self) -> Option<String> {
        self.get(Group::Primary, Tag::MODEL)?.as_string()
    }

    pub fn software(&self) -> Option<String> {
        self.get(Group::Primary, Tag::SOFTWARE)?.as_string()
    }

    pub fn orientation(&self) -> Option<u16> {
        self.get(Group::Primary, Tag::ORIENTATION)?.as_u16()
    }

    /// Capture timestamp in the raw `YYYY:MM:DD hh:mm:ss` Exif form
    pub fn date_time_original(&self) -> Option<String> {
        self.get(Group::Exif, Tag::DATE_TIME_ORIGINAL)?.as_string()
    }

    /// Exposure time in seconds
    ///
    /// The first element is typically one, such that the value is given in
    /// its common form like "1/60 sec".
    pub fn exposure_time(&self) -> Option<Rational> {
        self.get(Group::Exif, Tag::EXPOSURE_TIME)?.as_rational()
    }

    /// Aperture
    pub fn f_number(&self) -> Option<f32> {
        let (x, y) = self.get(Group::Exif, Tag::F_NUMBER)?.as_rational()?;
        if y == 0 {
            return None;
        }

        Some(x as f32 / y as f32)
    }

    /// ISO
    pub fn iso_speed_rating(&self) -> Option<u16> {
        self.get(Group::Exif, Tag::PHOTOGRAPHIC_SENSITIVITY)?.as_u16()
    }

    /// Focal length in mm
    pub fn focal_length(&self) -> Option<f32> {
        let (x, y) = self.get(Group::Exif, Tag::FOCAL_LENGTH)?.as_rational()?;
        if y == 0 {
            return None;
        }

        Some(x as f32 / y as f32)
    }

    /// Altitude in meters, negative below sea level
    pub fn altitude(&self) -> Option<f64> {
        let (x, y) = self.get(Group::Gps, Tag::GPS_ALTITUDE)?.as_rational()?;
        if y == 0 {
            return None;
        }

        let below_sea_level = self
            .get(Group::Gps, Tag::GPS_ALTITUDE_REF)
            .and_then(Value::as_bytes)
            .is_some_and(|b| b.first() == Some(&1));

        let altitude = f64::from(x) / f64::from(y);
        Some(if below_sea_level { -altitude } else { altitude })
    }
}

/// UTF-16LE code units with the trailing double-zero terminator
fn utf16le_terminated(text: &str) -> Vec<u8> {
    let mut bytes: Vec<u8> = text.encode_utf16().flat_map(u16::to_le_bytes).collect();
    bytes.extend_from_slice(&[0, 0]);
    bytes
}

fn utf16le_to_string(bytes: &[u8]) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|c| u16::from_le_bytes([c[0], c[1]]))
        .take_while(|u| *u != 0)
        .collect();
    String::from_utf16_lossy(&units)
}
