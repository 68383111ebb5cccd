use fototag_common::exif::{Group, Tag};
use fototag_exif::internal::Value;
use fototag_exif::Exif;

/// Minimal little-endian payload with a single orientation entry
fn data() -> Vec<u8> {
    let mut data = Vec::new();

    // Little endian
    data.extend_from_slice(b"II");
    // Magic bits
    data.extend_from_slice(&[42, 0]);
    // Offset
    data.extend_from_slice(&8_u32.to_le_bytes());
    // Number entries
    data.extend_from_slice(&1_u16.to_le_bytes());

    // Tag orientation
    data.extend_from_slice(&0x112_u16.to_le_bytes());
    // Data type
    data.extend_from_slice(&3_u16.to_le_bytes());
    // Count
    data.extend_from_slice(&1_u32.to_le_bytes());
    // Value
    data.extend_from_slice(&7_u32.to_le_bytes());

    // Next offset
    data.extend_from_slice(&[0, 0, 0, 0]);

    data
}

#[test]
fn little_endian() {
    let exif = Exif::parse(data()).unwrap();

    assert_eq!(
        exif.get(Group::Primary, Tag::ORIENTATION),
        Some(&Value::Short(vec![7]))
    );
    assert_eq!(exif.orientation(), Some(7));
}

#[test]
fn big_endian() {
    let mut data = Vec::new();

    data.extend_from_slice(b"MM");
    data.extend_from_slice(&42_u16.to_be_bytes());
    data.extend_from_slice(&8_u32.to_be_bytes());
    data.extend_from_slice(&1_u16.to_be_bytes());

    data.extend_from_slice(&0x112_u16.to_be_bytes());
    data.extend_from_slice(&3_u16.to_be_bytes());
    data.extend_from_slice(&1_u32.to_be_bytes());
    // Short values sit in the first two bytes of the value field
    data.extend_from_slice(&[0, 7, 0, 0]);

    data.extend_from_slice(&[0, 0, 0, 0]);

    let exif = Exif::parse(data).unwrap();
    assert_eq!(exif.orientation(), Some(7));
}

#[test]
fn wrong_magic() {
    let mut broken = data();
    broken[2] = 43;
    assert!(Exif::parse(broken).is_err());

    assert!(Exif::parse(b"XXXX".to_vec()).is_err());
    assert!(Exif::parse(Vec::new()).is_err());
}

#[test]
fn truncated() {
    let mut short = data();
    short.truncate(12);
    assert!(Exif::parse(short).is_err());
}

#[test]
fn unknown_data_type_ignored() {
    let mut data = data();
    // Rewrite the entry's data type to an undefined value
    data[12] = 200;
    let exif = Exif::parse(data).unwrap();

    assert!(exif.get(Group::Primary, Tag::ORIENTATION).is_none());
}

#[test]
fn reencode_is_parseable() {
    let exif = Exif::parse(data()).unwrap();
    let reencoded = Exif::parse(exif.to_bytes()).unwrap();

    assert_eq!(reencoded.orientation(), Some(7));
}
