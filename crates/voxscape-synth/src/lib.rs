//! Coordinate transforms, placement tables, and the structure synthesizer.
#![forbid(unsafe_code)]

pub mod config;
pub mod coords;
pub mod driver;
pub mod synth;
pub mod tables;

pub use config::ConvertConfig;
pub use coords::{LandscapeBounds, SectorCoord};
pub use driver::{ConvertCtx, ConvertOptions, ConvertStats, convert_sectors};
pub use synth::synthesize_sector;
