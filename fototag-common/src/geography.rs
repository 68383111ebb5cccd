//! Geographic coordinates and their Exif rational encoding
//!
//! Exif cannot store floating point numbers. Angles are stored as three
//! unsigned rationals (degrees, minutes, seconds) plus a one-letter
//! hemisphere reference that carries the sign.

/// Unsigned fraction as stored in Exif rational fields
pub type Rational = (u32, u32);

/// Denominator used for the seconds rational
///
/// Two decimal digits of precision, bounding the decimal round-trip error
/// to well below 1e-4 degrees.
pub const SECONDS_DENOMINATOR: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Location {
    pub lat: Coord,
    pub lon: Coord,
}

impl Location {
    /// Returns the location if both values are in range
    ///
    /// Out of range values are rejected, never clamped.
    ///
    /// ```
    /// # use fototag_common::geography::*;
    /// assert!(Location::new(48.8584, 2.2945).is_ok());
    /// assert!(Location::new(90.1, 0.).is_err());
    /// assert!(Location::new(0., -180.1).is_err());
    /// ```
    pub fn new(lat: f64, lon: f64) -> Result<Self, OutOfRangeError> {
        if !(-90. ..=90.).contains(&lat) {
            return Err(OutOfRangeError::Latitude(lat));
        }
        if !(-180. ..=180.).contains(&lon) {
            return Err(OutOfRangeError::Longitude(lon));
        }

        Ok(Self {
            lat: Coord(lat),
            lon: Coord(lon),
        })
    }

    /// Builds a location from the four Exif GPS components
    ///
    /// Returns `None` for degenerate rationals (zero denominator) or values
    /// outside the valid coordinate range.
    pub fn from_exif_parts(
        lat_ref: LatRef,
        lat: [Rational; 3],
        lon_ref: LonRef,
        lon: [Rational; 3],
    ) -> Option<Self> {
        let lat = Coord::from_dms_rational(lat, lat_ref.as_sign())?;
        let lon = Coord::from_dms_rational(lon, lon_ref.as_sign())?;

        Self::new(lat.0, lon.0).ok()
    }

    pub fn lat_ref(&self) -> LatRef {
        LatRef::from_deg(self.lat.0)
    }

    pub fn lon_ref(&self) -> LonRef {
        LonRef::from_deg(self.lon.0)
    }

    /// Plain decimal exchange format with six decimal places
    ///
    /// ```
    /// # use fototag_common::geography::*;
    /// let loc = Location::new(48.8584, 2.2945).unwrap();
    /// assert_eq!(loc.decimal(), "48.858400, 2.294500");
    /// ```
    pub fn decimal(&self) -> String {
        format!("{:.6}, {:.6}", self.lat.0, self.lon.0)
    }

    /// Location as `geo:` URI
    ///
    /// The precision of the coordinates is limited to six decimal places.
    pub fn geo_uri(&self) -> String {
        format!("geo:{:.6},{:.6}", self.lat.0, self.lon.0)
    }

    /// Coordinate according to ISO 6709 Annex D
    ///
    /// <https://en.wikipedia.org/wiki/ISO_6709>
    ///
    /// Rendered from the rational encoding, so the string shows exactly what
    /// a tagged file will carry.
    ///
    /// ```
    /// # use fototag_common::geography::*;
    /// let loc = Location::new(48.8584, 2.2945).unwrap();
    /// assert_eq!(loc.iso_6709(), r#"48°51'30.24"N 2°17'40.2"E"#);
    ///
    /// let loc = Location::new(-46.235, 126.06853).unwrap();
    /// assert_eq!(loc.iso_6709(), r#"46°14'06"S 126°04'06.71"E"#);
    /// ```
    pub fn iso_6709(&self) -> String {
        let lat_ref = self.lat_ref();
        let lon_ref = self.lon_ref();
        let [lat_deg, lat_min, lat_sec] = self.lat.to_dms_rational();
        let [lon_deg, lon_min, lon_sec] = self.lon.to_dms_rational();

        fn seconds(sec: Rational) -> String {
            let s = format!("{}", f64::from(sec.0) / f64::from(sec.1));

            let pre_decimal = s.split_once('.').map_or(s.as_str(), |x| x.0);

            if pre_decimal.len() == 1 {
                format!("0{s}")
            } else {
                s
            }
        }

        let lat_sec = seconds(lat_sec);
        let lon_sec = seconds(lon_sec);

        format!(
            "{}°{:02}'{lat_sec}\"{lat_ref} {}°{:02}'{lon_sec}\"{lon_ref}",
            lat_deg.0, lat_min.0, lon_deg.0, lon_min.0
        )
    }
}

/// Decimal degrees
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Coord(pub f64);

impl Coord {
    /// Encode the absolute value as (degrees, minutes, seconds) rationals
    ///
    /// Seconds keep two decimal digits via [`SECONDS_DENOMINATOR`]. The sign
    /// is not part of the encoding and has to be communicated via the
    /// hemisphere reference.
    ///
    /// ```
    /// # use fototag_common::geography::*;
    /// let dms = Coord(48.8584).to_dms_rational();
    /// assert_eq!(dms, [(48, 1), (51, 1), (3024, 100)]);
    ///
    /// let dms = Coord(-2.2945).to_dms_rational();
    /// assert_eq!(dms, [(2, 1), (17, 1), (4020, 100)]);
    /// ```
    pub fn to_dms_rational(self) -> [Rational; 3] {
        let absolute = self.0.abs();
        let degrees = absolute.floor();
        let minutes_float = (absolute - degrees) * 60.;
        let minutes = minutes_float.floor();
        let seconds = ((minutes_float - minutes) * 60. * f64::from(SECONDS_DENOMINATOR)).round();

        [
            (degrees as u32, 1),
            (minutes as u32, 1),
            (seconds as u32, SECONDS_DENOMINATOR),
        ]
    }

    /// Decode (degrees, minutes, seconds) rationals into decimal degrees
    ///
    /// `sign` comes from the hemisphere reference. Returns `None` if any
    /// denominator is zero.
    ///
    /// ```
    /// # use fototag_common::geography::*;
    /// let coord = Coord::from_dms_rational([(48, 1), (51, 1), (3024, 100)], 1.).unwrap();
    /// assert!((coord.0 - 48.8584).abs() < 1e-4);
    /// assert!(Coord::from_dms_rational([(48, 0), (51, 1), (3024, 100)], 1.).is_none());
    /// ```
    pub fn from_dms_rational(dms: [Rational; 3], sign: f64) -> Option<Self> {
        let [deg, min, sec] = dms;

        if deg.1 == 0 || min.1 == 0 || sec.1 == 0 {
            return None;
        }

        let degrees = f64::from(deg.0) / f64::from(deg.1);
        let minutes = f64::from(min.0) / f64::from(min.1);
        let seconds = f64::from(sec.0) / f64::from(sec.1);

        Some(Self(sign * (degrees + minutes / 60. + seconds / 3600.)))
    }
}

#[derive(Debug, Clone, Copy, thiserror::Error)]
pub enum OutOfRangeError {
    #[error("Latitude {0} outside of [-90, 90]")]
    Latitude(f64),
    #[error("Longitude {0} outside of [-180, 180]")]
    Longitude(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatRef {
    North,
    South,
}

impl LatRef {
    /// Non-negative latitudes, including zero, map to north
    ///
    /// ```
    /// # use fototag_common::geography::*;
    /// assert_eq!(LatRef::from_deg(0.), LatRef::North);
    /// assert_eq!(LatRef::from_deg(-0.0), LatRef::North);
    /// assert_eq!(LatRef::from_deg(-0.1), LatRef::South);
    /// ```
    pub fn from_deg(deg: f64) -> Self {
        if deg >= 0. {
            Self::North
        } else {
            Self::South
        }
    }

    pub fn as_sign(&self) -> f64 {
        match self {
            Self::North => 1.,
            Self::South => -1.,
        }
    }
}

impl TryFrom<&str> for LatRef {
    type Error = InvalidLatRef;
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "N" => Ok(Self::North),
            "S" => Ok(Self::South),
            v => Err(InvalidLatRef(v.to_string())),
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("Invalid latitude reference: '{0}'. Must be 'N' or 'S'.")]
pub struct InvalidLatRef(String);

impl std::fmt::Display for LatRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::North => f.write_str("N"),
            Self::South => f.write_str("S"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LonRef {
    East,
    West,
}

impl LonRef {
    /// Non-negative longitudes, including zero, map to east
    ///
    /// ```
    /// # use fototag_common::geography::*;
    /// assert_eq!(LonRef::from_deg(0.), LonRef::East);
    /// assert_eq!(LonRef::from_deg(-0.0), LonRef::East);
    /// assert_eq!(LonRef::from_deg(-0.1), LonRef::West);
    /// ```
    pub fn from_deg(deg: f64) -> Self {
        if deg >= 0. {
            Self::East
        } else {
            Self::West
        }
    }

    pub fn as_sign(&self) -> f64 {
        match self {
            Self::East => 1.,
            Self::West => -1.,
        }
    }
}

impl TryFrom<&str> for LonRef {
    type Error = InvalidLonRef;
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "E" => Ok(Self::East),
            "W" => Ok(Self::West),
            v => Err(InvalidLonRef(v.to_string())),
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("Invalid longitude reference: '{0}'. Must be 'E' or 'W'.")]
pub struct InvalidLonRef(String);

impl std::fmt::Display for LonRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::East => f.write_str("E"),
            Self::West => f.write_str("W"),
        }
    }
}
