//! Shared building blocks for the fototag crates
//!
//! Contains the geographic coordinate types with their Exif rational
//! encoding, the Exif tag and group identifiers, and small utilities.

pub mod exif;
pub mod geography;
pub mod utils;
