//! Landscape sector model: tile codec, layered sectors, and archive access.
#![forbid(unsafe_code)]

pub mod archive;
pub mod reader;
pub mod sector;
pub mod tile;

pub use archive::{ArchiveError, LandscapeArchive};
pub use reader::{ByteReader, DecodeError};
pub use sector::{LayeredSector, Sector};
pub use tile::{DIAGONAL_BACKWARD_BASE, DiagonalFeature, OBJECT_THRESHOLD, Tile};

/// Tiles per sector side.
pub const SECTOR_SIZE: usize = 48;
/// Serialized bytes per tile: six unsigned bytes plus one big-endian i32.
pub const TILE_BYTES: usize = 7;
/// Exact payload length of one sector entry.
pub const SECTOR_PAYLOAD: usize = SECTOR_SIZE * SECTOR_SIZE * TILE_BYTES;
