//! JPEG segment structure and Exif segment splicing
//!
//! Scans the segment table up to the start of the scan data. The entropy
//! coded image data is never touched; replacing the Exif segment leaves
//! every pixel byte identical.

use std::io::{Cursor, Read, Seek, SeekFrom};
use std::ops::Range;

pub const MAGIC_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF];

pub const EXIF_IDENTIFIER_STRING: &[u8] = b"Exif\0\0";

pub const MARKER_START: u8 = 0xFF;

/// Largest Exif payload that fits a single APP1 segment
///
/// Segment length is a 16 bit field that includes itself and the Exif
/// identifier.
pub const MAX_EXIF_PAYLOAD: usize = u16::MAX as usize - 2 - EXIF_IDENTIFIER_STRING.len();

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unexpected end of file")]
    UnexpectedEof,
    #[error("Invalid magic bytes: {0:x?}")]
    InvalidMagicBytes(Vec<u8>),
    #[error("Expected marker start, found {0:#04x}")]
    ExpectedMarkerStart(u8),
    #[error("Position too large")]
    PositionTooLarge,
    #[error("Exif payload of {0} bytes does not fit a segment")]
    ExifPayloadTooLarge(usize),
}

#[derive(Debug, Clone)]
struct RawSegment {
    marker: Marker,
    /// Range including marker and length bytes
    complete: Range<usize>,
    /// Range of the payload, excluding the length bytes
    data: Range<usize>,
}

/// Segment view handed out to callers
#[derive(Debug, Clone)]
pub struct Segment<'a> {
    marker: Marker,
    pos: usize,
    data: &'a [u8],
}

impl<'a> Segment<'a> {
    pub fn marker(&self) -> Marker {
        self.marker
    }

    /// Byte position of the segment's marker in the image data
    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }
}

/// Representation of a JPEG image
#[derive(Debug, Clone)]
pub struct Jpeg {
    data: Vec<u8>,
    segments: Vec<RawSegment>,
}

impl Jpeg {
    /// Returns JPEG image representation
    ///
    /// * `data`: JPEG image data starting with the SOI marker
    pub fn new(data: Vec<u8>) -> Result<Self, Error> {
        let segments = Self::find_segments(&data)?;
        Ok(Self { data, segments })
    }

    /// Checks if passed data have JPEG magic bytes
    pub fn is_filetype(data: &[u8]) -> bool {
        data.starts_with(MAGIC_BYTES)
    }

    /// Convert into raw data
    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// List all segments in their order of appearance
    pub fn segments(&self) -> impl Iterator<Item = Segment<'_>> {
        self.segments.iter().map(|x| Segment {
            marker: x.marker,
            pos: x.complete.start,
            data: &self.data[x.data.clone()],
        })
    }

    /// List all segments with the given marker
    pub fn segments_marker(&self, marker: Marker) -> impl Iterator<Item = Segment<'_>> {
        self.segments().filter(move |x| x.marker == marker)
    }

    pub fn exif(&self) -> impl Iterator<Item = Segment<'_>> {
        self.segments_marker(Marker::APP1)
            .filter(|x| x.data().starts_with(EXIF_IDENTIFIER_STRING))
    }

    /// Raw Exif payloads without the identifier prefix
    pub fn exif_data(&self) -> impl Iterator<Item = &[u8]> {
        self.exif()
            .filter_map(|x| x.data.get(EXIF_IDENTIFIER_STRING.len()..))
    }

    /// Replace or insert the Exif segment
    ///
    /// Existing Exif APP1 segments are removed; the new segment is placed
    /// after SOI and any leading APP0 segments, where interoperable readers
    /// expect it. All other bytes stay untouched.
    pub fn set_exif(&mut self, payload: &[u8]) -> Result<(), Error> {
        if payload.len() > MAX_EXIF_PAYLOAD {
            return Err(Error::ExifPayloadTooLarge(payload.len()));
        }
        let segment_len = payload.len() + EXIF_IDENTIFIER_STRING.len() + 2;

        // Drop existing Exif segments, back to front to keep ranges valid
        let mut removed: Vec<Range<usize>> = Vec::new();
        for segment in &self.segments {
            if segment.marker == Marker::APP1
                && self.data[segment.data.clone()].starts_with(EXIF_IDENTIFIER_STRING)
            {
                removed.push(segment.complete.clone());
            }
        }
        tracing::debug!(
            "Replacing {} existing Exif segment(s) with {segment_len} bytes",
            removed.len()
        );
        for range in removed.into_iter().rev() {
            self.data.drain(range);
        }
        self.segments = Self::find_segments(&self.data)?;

        // Insertion point after SOI and any APP0
        let mut pos = 2;
        for segment in &self.segments {
            if segment.marker == Marker::APP0 && segment.complete.start == pos {
                pos = segment.complete.end;
            } else {
                break;
            }
        }

        let mut segment = Vec::with_capacity(segment_len + 2);
        segment.push(MARKER_START);
        segment.push(Marker::APP1.into());
        segment.extend_from_slice(&(segment_len as u16).to_be_bytes());
        segment.extend_from_slice(EXIF_IDENTIFIER_STRING);
        segment.extend_from_slice(payload);

        self.data.splice(pos..pos, segment);
        self.segments = Self::find_segments(&self.data)?;

        Ok(())
    }

    /// List all segments in the data up to the start of scan
    fn find_segments(data: &[u8]) -> Result<Vec<RawSegment>, Error> {
        let mut source = Cursor::new(data);

        let magic = &mut [0; 2];
        source.read_exact(magic).map_err(|_| Error::UnexpectedEof)?;
        if *magic != [0xFF, 0xD8] {
            return Err(Error::InvalidMagicBytes(magic.to_vec()));
        }

        let buf = &mut [0; 2];
        let mut segments = Vec::new();
        loop {
            let start = position(&source)?;

            source.read_exact(buf).map_err(|_| Error::UnexpectedEof)?;
            if buf[0] != MARKER_START {
                return Err(Error::ExpectedMarkerStart(buf[0]));
            }
            let marker = Marker::from(buf[1]);

            source.read_exact(buf).map_err(|_| Error::UnexpectedEof)?;
            let len = u16::from_be_bytes(*buf) as usize;

            let data_start = position(&source)?;
            let data_end = start
                .checked_add(2)
                .and_then(|x| x.checked_add(len))
                .ok_or(Error::PositionTooLarge)?;
            if data_end > data.len() || len < 2 {
                return Err(Error::UnexpectedEof);
            }

            tracing::trace!("Found segment {marker:?} at {start}, {len} bytes");
            segments.push(RawSegment {
                marker,
                complete: start..data_end,
                data: data_start..data_end,
            });

            if marker == Marker::SOS {
                break;
            }
            source
                .seek(SeekFrom::Start(data_end as u64))
                .map_err(|_| Error::PositionTooLarge)?;
        }

        Ok(segments)
    }
}

fn position(source: &Cursor<&[u8]>) -> Result<usize, Error> {
    source
        .position()
        .try_into()
        .map_err(|_| Error::PositionTooLarge)
}

fototag_common::utils::convertible_enum!(
    #[repr(u8)]
    #[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
    pub enum Marker {
        SOF0 = 0xC0,
        SOF1 = 0xC1,
        SOF2 = 0xC2,
        /// Define Huffman table
        DHT = 0xC4,
        /// Start of scan
        SOS = 0xDA,
        DQT = 0xDB,
        /// Define restart interval
        DRI = 0xDD,
        /// JFIF
        APP0 = 0xE0,
        /// Exif, XMP
        APP1 = 0xE1,
        /// ICC color profile
        APP2 = 0xE2,
        APP3 = 0xE3,
        APP4 = 0xE4,
        APP5 = 0xE5,
        APP6 = 0xE6,
        APP7 = 0xE7,
        APP8 = 0xE8,
        /// Comment
        COM = 0xFE,
    }
);

#[cfg(test)]
mod tests {
    use super::*;

    /// Tiny structurally valid JPEG: SOI, APP0, SOS, scan data, EOI
    fn minimal_jpeg() -> Vec<u8> {
        let mut data = vec![0xFF, 0xD8];
        // APP0/JFIF
        data.extend_from_slice(&[0xFF, 0xE0]);
        data.extend_from_slice(&16_u16.to_be_bytes());
        data.extend_from_slice(b"JFIF\0");
        data.extend_from_slice(&[1, 1, 0, 0, 1, 0, 1, 0, 0]);
        // SOS
        data.extend_from_slice(&[0xFF, 0xDA]);
        data.extend_from_slice(&3_u16.to_be_bytes());
        data.push(0);
        // Scan data and EOI
        data.extend_from_slice(&[1, 2, 3, 4]);
        data.extend_from_slice(&[0xFF, 0xD9]);
        data
    }

    #[test]
    fn scan_segments() {
        let jpeg = Jpeg::new(minimal_jpeg()).unwrap();
        let markers: Vec<Marker> = jpeg.segments().map(|x| x.marker()).collect();
        assert_eq!(markers, vec![Marker::APP0, Marker::SOS]);
        assert_eq!(jpeg.exif_data().count(), 0);
    }

    #[test]
    fn not_a_jpeg() {
        assert!(!Jpeg::is_filetype(b"RIFF"));
        assert!(Jpeg::new(b"RIFF0000WEBP".to_vec()).is_err());
        assert!(Jpeg::new(Vec::new()).is_err());
    }

    #[test]
    fn insert_and_replace_exif() {
        let mut jpeg = Jpeg::new(minimal_jpeg()).unwrap();
        let scan_data_before: Vec<u8> = jpeg.data()[jpeg.data().len() - 6..].to_vec();

        jpeg.set_exif(b"payload one").unwrap();
        assert_eq!(jpeg.exif_data().next(), Some(b"payload one".as_slice()));
        // Exif goes after APP0
        let markers: Vec<Marker> = jpeg.segments().map(|x| x.marker()).collect();
        assert_eq!(markers, vec![Marker::APP0, Marker::APP1, Marker::SOS]);

        jpeg.set_exif(b"second payload").unwrap();
        assert_eq!(jpeg.exif_data().count(), 1);
        assert_eq!(jpeg.exif_data().next(), Some(b"second payload".as_slice()));

        // Pixel data untouched
        assert_eq!(&jpeg.data()[jpeg.data().len() - 6..], scan_data_before);
    }

    #[test]
    fn oversized_payload_rejected() {
        let mut jpeg = Jpeg::new(minimal_jpeg()).unwrap();
        let payload = vec![0; MAX_EXIF_PAYLOAD + 1];
        assert!(matches!(
            jpeg.set_exif(&payload),
            Err(Error::ExifPayloadTooLarge(_))
        ));
    }
}
