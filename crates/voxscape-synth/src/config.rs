use std::error::Error;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::coords::LandscapeBounds;

fn default_layers() -> u8 {
    3
}
fn default_base_y() -> i32 {
    0
}
fn default_sea_level() -> i32 {
    4
}
fn default_inter_floor() -> i32 {
    4
}
fn default_wall_height() -> i32 {
    3
}
fn default_foundation_depth() -> i32 {
    5
}
fn default_clear_span() -> i32 {
    40
}

/// Conversion parameters. Every field has a default, so a config file only
/// needs the overrides it cares about.
#[derive(Clone, Debug, Deserialize)]
pub struct ConvertConfig {
    #[serde(default)]
    pub bounds: LandscapeBounds,
    /// Storeys decoded per sector; layer 0 is the ground floor.
    #[serde(default = "default_layers")]
    pub layers: u8,
    /// World Y of the bedrock base under every column.
    #[serde(default = "default_base_y")]
    pub base_y: i32,
    /// Elevation (above `base_y`) that water overlays force a tile down to.
    #[serde(default = "default_sea_level")]
    pub sea_level: i32,
    /// Vertical distance between storey floors.
    #[serde(default = "default_inter_floor")]
    pub inter_floor: i32,
    /// Wall height above the floor; roofs rest at floor + wall_height.
    #[serde(default = "default_wall_height")]
    pub wall_height: i32,
    /// How far ground-floor walls are sunk below the floor line.
    #[serde(default = "default_foundation_depth")]
    pub foundation_depth: i32,
    /// Height of the air column written by a clear pass.
    #[serde(default = "default_clear_span")]
    pub clear_span: i32,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            bounds: LandscapeBounds::default(),
            layers: default_layers(),
            base_y: default_base_y(),
            sea_level: default_sea_level(),
            inter_floor: default_inter_floor(),
            wall_height: default_wall_height(),
            foundation_depth: default_foundation_depth(),
            clear_span: default_clear_span(),
        }
    }
}

impl ConvertConfig {
    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        Ok(toml::from_str(toml_str)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }
}
