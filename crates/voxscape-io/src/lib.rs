//! Export of the voxel buffer to interchange formats.
#![forbid(unsafe_code)]

pub mod schem;

pub use schem::{ExportError, SchemInfo, write_schematic};
