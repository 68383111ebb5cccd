#![doc = include_str!("../README.md")]

pub mod asset;
pub mod batch;
mod error;
pub mod export;
pub mod normalize;
mod pipeline;

pub use asset::{ImageAsset, MediaType, Status, MAX_FILES, MAX_FILE_SIZE};
pub use batch::{BatchOutput, BatchResult, BatchRunner, Summary};
pub use error::Error;
pub use fototag_common::geography::{Coord, LatRef, Location, LonRef};
pub use fototag_exif::Exif;
pub use normalize::{HeicDecoder, Normalizer};
pub use pipeline::{GeotagRequest, Pipeline};
