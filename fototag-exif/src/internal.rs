//! Wire-level decoding and encoding of the Exif payload
//!
//! Decoding tolerates damaged entries where possible; encoding always
//! serializes a fresh little-endian payload from the tag groups.

mod decode;
mod encode;
mod raw;
mod type_;
mod value;

use std::collections::BTreeMap;

pub use fototag_common::exif::{Group, Tag};

pub(crate) use decode::decode;
pub(crate) use encode::encode;
pub use type_::Type;
pub use value::Value;

/// The three logical tag groups of the metadata segment
///
/// Thumbnail and interoperability IFDs are not represented; their entries
/// are dropped on decode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagGroups {
    pub primary: BTreeMap<Tag, Value>,
    pub exif: BTreeMap<Tag, Value>,
    pub gps: BTreeMap<Tag, Value>,
}

impl TagGroups {
    pub fn is_empty(&self) -> bool {
        self.primary.is_empty() && self.exif.is_empty() && self.gps.is_empty()
    }

    pub fn group(&self, group: Group) -> &BTreeMap<Tag, Value> {
        match group {
            Group::Primary => &self.primary,
            Group::Exif => &self.exif,
            Group::Gps => &self.gps,
        }
    }

    pub fn group_mut(&mut self, group: Group) -> &mut BTreeMap<Tag, Value> {
        match group {
            Group::Primary => &mut self.primary,
            Group::Exif => &mut self.exif,
            Group::Gps => &mut self.gps,
        }
    }
}
