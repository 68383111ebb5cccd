use std::collections::BTreeMap;

use super::type_::Type;
use super::value::Value;
use super::{Tag, TagGroups};

const HEADER_LEN: u32 = 8;

/// Serialize the tag groups as a fresh little-endian Exif payload
///
/// Layout: TIFF header, primary IFD (with pointer entries to the Exif and
/// GPS IFDs where those groups are non-empty), then the sub-IFDs, each
/// followed by its out-of-line value data. No thumbnail IFD is written.
pub(crate) fn encode(groups: &TagGroups) -> Vec<u8> {
    let has_exif = !groups.exif.is_empty();
    let has_gps = !groups.gps.is_empty();
    let pointer_count = usize::from(has_exif) + usize::from(has_gps);

    let exif_offset = HEADER_LEN + block_len(&groups.primary, pointer_count);
    let gps_offset = exif_offset + if has_exif { block_len(&groups.exif, 0) } else { 0 };

    let mut pointers = Vec::new();
    if has_exif {
        pointers.push((Tag::EXIF_IFD_POINTER, exif_offset));
    }
    if has_gps {
        pointers.push((Tag::GPS_INFO_IFD_POINTER, gps_offset));
    }

    let mut out = Vec::new();
    out.extend_from_slice(b"II");
    out.extend_from_slice(&42_u16.to_le_bytes());
    out.extend_from_slice(&HEADER_LEN.to_le_bytes());

    write_block(&mut out, &groups.primary, &pointers, HEADER_LEN);
    if has_exif {
        write_block(&mut out, &groups.exif, &[], exif_offset);
    }
    if has_gps {
        write_block(&mut out, &groups.gps, &[], gps_offset);
    }

    out
}

/// Serialized size of one IFD block including its out-of-line values
fn block_len(map: &BTreeMap<Tag, Value>, extra_entries: usize) -> u32 {
    let mut len = 2 + (map.len() + extra_entries) * 12 + 4;

    for value in map.values() {
        let data_len = value.byte_len();
        if data_len > 4 {
            len += data_len;
        }
    }

    len as u32
}

fn write_block(
    out: &mut Vec<u8>,
    map: &BTreeMap<Tag, Value>,
    pointers: &[(Tag, u32)],
    block_offset: u32,
) {
    let mut entries: Vec<(Tag, Type, u32, Vec<u8>)> = map
        .iter()
        .map(|(tag, value)| (*tag, value.data_type(), value.count(), value.to_le_bytes()))
        .collect();
    for (tag, offset) in pointers {
        entries.push((*tag, Type::Long, 1, offset.to_le_bytes().to_vec()));
    }
    entries.sort_by_key(|(tag, ..)| *tag);

    let values_start = block_offset + 2 + entries.len() as u32 * 12 + 4;
    let mut values: Vec<u8> = Vec::new();

    out.extend_from_slice(&(entries.len() as u16).to_le_bytes());
    for (tag, data_type, count, data) in &entries {
        out.extend_from_slice(&tag.0.to_le_bytes());
        out.extend_from_slice(&u16::from(*data_type).to_le_bytes());
        out.extend_from_slice(&count.to_le_bytes());

        if data.len() <= 4 {
            let mut inline = [0_u8; 4];
            inline[..data.len()].copy_from_slice(data);
            out.extend_from_slice(&inline);
        } else {
            let offset = values_start + values.len() as u32;
            out.extend_from_slice(&offset.to_le_bytes());
            values.extend_from_slice(data);
        }
    }

    // No further IFDs follow this one
    out.extend_from_slice(&0_u32.to_le_bytes());
    out.extend_from_slice(&values);
}
