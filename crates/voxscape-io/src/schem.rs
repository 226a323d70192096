//! Sponge v2 `.schem` writer: gzipped NBT with a palette and a varint
//! block stream, the format world-edit tools import.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use fastnbt::{ByteArray, IntArray, SerOpts};
use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Serialize;
use thiserror::Error;

use voxscape_blocks::MaterialCatalog;
use voxscape_world::WorldBuffer;

/// Pinned to a 1.16-era data version so the palette names stay valid.
const DATA_VERSION: i32 = 2586;

/// The format stores dimensions as unsigned shorts.
const MAX_DIM: i64 = u16::MAX as i64;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("nothing to export: the world buffer is empty")]
    EmptyWorld,
    #[error("region spans {0} voxels on one axis, over the schematic limit of {MAX_DIM}")]
    Oversize(i64),
    #[error("failed to write schematic: {0}")]
    Io(#[from] std::io::Error),
    #[error("nbt serialization failed: {0}")]
    Nbt(#[from] fastnbt::error::Error),
}

#[derive(Serialize)]
struct SpongeSchematic {
    #[serde(rename = "Version")]
    version: i32,
    #[serde(rename = "DataVersion")]
    data_version: i32,
    #[serde(rename = "Width")]
    width: i16,
    #[serde(rename = "Height")]
    height: i16,
    #[serde(rename = "Length")]
    length: i16,
    #[serde(rename = "Offset")]
    offset: IntArray,
    #[serde(rename = "PaletteMax")]
    palette_max: i32,
    #[serde(rename = "Palette")]
    palette: BTreeMap<String, i32>,
    #[serde(rename = "BlockData")]
    block_data: ByteArray,
}

/// Summary of one written schematic.
#[derive(Clone, Copy, Debug)]
pub struct SchemInfo {
    pub width: i32,
    pub height: i32,
    pub length: i32,
    pub palette_len: usize,
    /// Non-air voxels encoded.
    pub voxels: u64,
}

/// Write the buffer's bounding box as a Sponge v2 schematic. The world
/// minimum corner is recorded as the offset, so the region pastes back at
/// its original position.
pub fn write_schematic(
    path: impl AsRef<Path>,
    world: &WorldBuffer,
    catalog: &MaterialCatalog,
) -> Result<SchemInfo, ExportError> {
    let ((min_x, min_y, min_z), (max_x, max_y, max_z)) =
        world.bounds().ok_or(ExportError::EmptyWorld)?;
    for span in [
        max_x as i64 - min_x as i64 + 1,
        max_y as i64 - min_y as i64 + 1,
        max_z as i64 - min_z as i64 + 1,
    ] {
        if span > MAX_DIM {
            return Err(ExportError::Oversize(span));
        }
    }
    let width = (max_x - min_x + 1) as u16;
    let height = (max_y - min_y + 1) as u16;
    let length = (max_z - min_z + 1) as u16;

    // palette indices are first-seen order over the scan; air is pinned to 0
    let mut palette = BTreeMap::new();
    palette.insert("minecraft:air".to_string(), 0);
    let mut next_index = 1i32;
    let mut block_data = Vec::new();
    let mut voxels = 0u64;
    // x fastest, then z, then y, as the format requires
    for y in min_y..=max_y {
        for z in min_z..=max_z {
            for x in min_x..=max_x {
                let id = world.get(x, y, z);
                let index = if id.is_air() {
                    0
                } else {
                    voxels += 1;
                    let name = catalog.block_name(id);
                    match palette.get(name) {
                        Some(i) => *i,
                        None => {
                            let i = next_index;
                            next_index += 1;
                            palette.insert(name.to_string(), i);
                            i
                        }
                    }
                };
                write_varint(&mut block_data, index as u32);
            }
        }
    }

    let schem = SpongeSchematic {
        version: 2,
        data_version: DATA_VERSION,
        width: width as i16,
        height: height as i16,
        length: length as i16,
        offset: IntArray::new(vec![min_x, min_y, min_z]),
        palette_max: next_index,
        palette,
        block_data: ByteArray::new(block_data.into_iter().map(|b| b as i8).collect()),
    };
    let info = SchemInfo {
        width: width as i32,
        height: height as i32,
        length: length as i32,
        palette_len: schem.palette.len(),
        voxels,
    };

    let bytes = fastnbt::to_bytes_with_opts(&schem, SerOpts::new().root_name("Schematic"))?;
    let mut encoder = GzEncoder::new(File::create(path)?, Compression::default());
    encoder.write_all(&bytes)?;
    encoder.finish()?;
    log::debug!(
        "schematic written: {}x{}x{}, palette {}, {} voxels",
        info.width,
        info.height,
        info.length,
        info.palette_len,
        info.voxels
    );
    Ok(info)
}

/// LEB128-style unsigned varint, the BlockData element encoding.
fn write_varint(out: &mut Vec<u8>, mut value: u32) {
    loop {
        let mut byte = (value & 0x7f) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        out.push(byte);
        if value == 0 {
            break;
        }
    }
}
