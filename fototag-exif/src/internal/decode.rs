use std::collections::BTreeMap;

use super::raw::Raw;
use super::type_::Type;
use super::value::Value;
use super::{Group, Tag, TagGroups};
use crate::error::{Error, Result};

/// Decode a raw Exif payload into its tag groups
///
/// See 4.5.2 in the v3.0 standard. Entries with unknown data types or
/// unreadable values are dropped; a failure while reading a sub-IFD only
/// loses that group.
pub(crate) fn decode(data: Vec<u8>) -> Result<TagGroups> {
    let mut raw = Raw::new(data);

    read_byte_order(&mut raw)?;
    read_magic_42(&mut raw)?;

    let offset = raw.read_u32()?;
    raw.seek_start(offset)?;

    let mut groups = TagGroups::default();
    let pointers = read_ifd(&mut raw, Group::Primary, &mut groups.primary)?;

    for (group, offset) in pointers {
        let target = groups.group_mut(group);
        if let Err(err) = read_ifd_at(&mut raw, offset, group, target) {
            tracing::info!("Failed to load IFD '{group:?}': {err}");
        }
    }

    Ok(groups)
}

fn read_byte_order(raw: &mut Raw) -> Result<()> {
    let big_endian = match &raw.read_exact()? {
        b"II" => false,
        b"MM" => true,
        bo => return Err(Error::UnknownByteOrder(*bo)),
    };

    raw.big_endian = big_endian;

    Ok(())
}

fn read_magic_42(raw: &mut Raw) -> Result<()> {
    match raw.read_u16()? {
        42 => Ok(()),
        magic => Err(Error::MagicBytesWrong(magic)),
    }
}

fn read_ifd_at(
    raw: &mut Raw,
    offset: u32,
    group: Group,
    map: &mut BTreeMap<Tag, Value>,
) -> Result<()> {
    raw.seek_start(offset)?;
    read_ifd(raw, group, map)?;
    Ok(())
}

/// Read all entries of one IFD into `map`
///
/// Returns the offsets of the Exif specific IFDs referenced from the
/// primary IFD. The offset to a following thumbnail IFD is discarded.
fn read_ifd(
    raw: &mut Raw,
    group: Group,
    map: &mut BTreeMap<Tag, Value>,
) -> Result<Vec<(Group, u32)>> {
    let n_entries = raw.read_u16()?;
    tracing::debug!("Reading IFD '{group:?}' with {n_entries} entries");

    let mut pointers = Vec::new();
    for _ in 0..n_entries {
        let tag = Tag(raw.read_u16()?);
        let data_type = Type::from(raw.read_u16()?);
        let count = raw.read_u32()?;
        let value_pos = raw.position()?;
        let value_or_offset = raw.read_u32()?;
        let next_entry = value_pos.checked_add(4).ok_or(Error::OffsetTooLarge)?;

        if group == Group::Primary {
            if let Some(sub) = tag.exif_specific_group() {
                pointers.push((sub, value_or_offset));
                continue;
            }
            if tag.is_ifd_pointer() {
                continue;
            }
        }

        if let Type::Unknown(other) = data_type {
            tracing::debug!("Ignoring tag {:#06X} with unknown data type {other}", tag.0);
            continue;
        }

        let size = data_type
            .size()
            .checked_mul(count)
            .ok_or(Error::DataSizeTooLarge)?;
        if size as usize > raw.len() {
            tracing::info!("Ignoring tag {:#06X} with oversized data", tag.0);
            continue;
        }

        if size <= 4 {
            raw.seek_start(value_pos)?;
        } else {
            raw.seek_start(value_or_offset)?;
        }

        match read_value(raw, data_type, count) {
            Ok(value) => {
                tracing::trace!(
                    "Read tag {:#06X} ({})",
                    tag.0,
                    fototag_common::exif::lookup_tag_name(group, tag).unwrap_or("unnamed")
                );
                map.insert(tag, value);
            }
            Err(err) => {
                tracing::info!("Ignoring unreadable tag {:#06X}: {err}", tag.0);
            }
        }

        raw.seek_start(next_entry)?;
    }

    let _thumbnail_ifd_offset = raw.read_u32()?;

    Ok(pointers)
}

fn read_value(raw: &mut Raw, data_type: Type, count: u32) -> Result<Value> {
    let count = count as usize;

    Ok(match data_type {
        Type::Byte => Value::Byte(raw.read_bytes(count)?),
        Type::Ascii => Value::Ascii(raw.read_bytes(count)?),
        Type::Undefined => Value::Undefined(raw.read_bytes(count)?),
        Type::Short => {
            let mut v = Vec::with_capacity(count);
            for _ in 0..count {
                v.push(raw.read_u16()?);
            }
            Value::Short(v)
        }
        Type::Long => {
            let mut v = Vec::with_capacity(count);
            for _ in 0..count {
                v.push(raw.read_u32()?);
            }
            Value::Long(v)
        }
        Type::Rational => {
            let mut v = Vec::with_capacity(count);
            for _ in 0..count {
                let n = raw.read_u32()?;
                let d = raw.read_u32()?;
                v.push((n, d));
            }
            Value::Rational(v)
        }
        Type::SLong => {
            let mut v = Vec::with_capacity(count);
            for _ in 0..count {
                v.push(raw.read_i32()?);
            }
            Value::SLong(v)
        }
        Type::SRational => {
            let mut v = Vec::with_capacity(count);
            for _ in 0..count {
                let n = raw.read_i32()?;
                let d = raw.read_i32()?;
                v.push((n, d));
            }
            Value::SRational(v)
        }
        Type::Unknown(_) => return Err(Error::UnknownDataType),
    })
}
