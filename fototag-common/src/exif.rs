//! Exif tag and group identifiers
//!
//! Only the closed set of tags the tagger reads or writes gets a name.
//! Everything else is carried by its numeric identifier and ignored for
//! interpretation purposes.

/// Numeric Exif tag identifier
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord)]
pub struct Tag(pub u16);

impl Tag {
    // Primary (IFD0)
    pub const IMAGE_DESCRIPTION: Self = Self(0x10E);
    pub const MAKE: Self = Self(0x10F);
    pub const MODEL: Self = Self(0x110);
    pub const ORIENTATION: Self = Self(0x112);
    pub const SOFTWARE: Self = Self(0x131);
    /// Windows Explorer comment, UTF-16LE
    pub const XP_COMMENT: Self = Self(0x9C9C);
    /// Windows Explorer keywords, UTF-16LE
    pub const XP_KEYWORDS: Self = Self(0x9C9E);

    // Pointers from IFD0 to the Exif specific IFDs
    pub const EXIF_IFD_POINTER: Self = Self(0x8769);
    pub const GPS_INFO_IFD_POINTER: Self = Self(0x8825);
    pub const INTEROPERABILITY_IFD_POINTER: Self = Self(0xA005);

    // Exif (camera/exposure)
    pub const EXPOSURE_TIME: Self = Self(0x829A);
    pub const F_NUMBER: Self = Self(0x829D);
    pub const PHOTOGRAPHIC_SENSITIVITY: Self = Self(0x8827);
    pub const DATE_TIME_ORIGINAL: Self = Self(0x9003);
    pub const FOCAL_LENGTH: Self = Self(0x920A);

    // GPS
    pub const GPS_VERSION_ID: Self = Self(0x0);
    pub const GPS_LATITUDE_REF: Self = Self(0x1);
    pub const GPS_LATITUDE: Self = Self(0x2);
    pub const GPS_LONGITUDE_REF: Self = Self(0x3);
    pub const GPS_LONGITUDE: Self = Self(0x4);
    pub const GPS_ALTITUDE_REF: Self = Self(0x5);
    pub const GPS_ALTITUDE: Self = Self(0x6);

    /// See 4.6.3 in the v3.0 standard
    pub fn exif_specific_group(&self) -> Option<Group> {
        match *self {
            Self::EXIF_IFD_POINTER => Some(Group::Exif),
            Self::GPS_INFO_IFD_POINTER => Some(Group::Gps),
            _ => None,
        }
    }

    pub fn is_ifd_pointer(&self) -> bool {
        matches!(
            *self,
            Self::EXIF_IFD_POINTER | Self::GPS_INFO_IFD_POINTER | Self::INTEROPERABILITY_IFD_POINTER
        )
    }
}

/// Logical tag group inside the metadata segment
///
/// Maps to the IFDs of the TIFF structure. The thumbnail IFD is
/// deliberately not represented.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Group {
    Primary,
    Exif,
    Gps,
}

/// Name for known tags, used in debug output
pub fn lookup_tag_name(group: Group, tag: Tag) -> Option<&'static str> {
    Some(match (group, tag) {
        (Group::Primary, Tag::IMAGE_DESCRIPTION) => "ImageDescription",
        (Group::Primary, Tag::MAKE) => "Make",
        (Group::Primary, Tag::MODEL) => "Model",
        (Group::Primary, Tag::ORIENTATION) => "Orientation",
        (Group::Primary, Tag::SOFTWARE) => "Software",
        (Group::Primary, Tag::XP_COMMENT) => "XPComment",
        (Group::Primary, Tag::XP_KEYWORDS) => "XPKeywords",
        (Group::Exif, Tag::EXPOSURE_TIME) => "ExposureTime",
        (Group::Exif, Tag::F_NUMBER) => "FNumber",
        (Group::Exif, Tag::PHOTOGRAPHIC_SENSITIVITY) => "PhotographicSensitivity",
        (Group::Exif, Tag::DATE_TIME_ORIGINAL) => "DateTimeOriginal",
        (Group::Exif, Tag::FOCAL_LENGTH) => "FocalLength",
        (Group::Gps, Tag::GPS_VERSION_ID) => "GPSVersionID",
        (Group::Gps, Tag::GPS_LATITUDE_REF) => "GPSLatitudeRef",
        (Group::Gps, Tag::GPS_LATITUDE) => "GPSLatitude",
        (Group::Gps, Tag::GPS_LONGITUDE_REF) => "GPSLongitudeRef",
        (Group::Gps, Tag::GPS_LONGITUDE) => "GPSLongitude",
        (Group::Gps, Tag::GPS_ALTITUDE_REF) => "GPSAltitudeRef",
        (Group::Gps, Tag::GPS_ALTITUDE) => "GPSAltitude",
        _ => return None,
    })
}
