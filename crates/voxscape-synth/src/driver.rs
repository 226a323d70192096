//! Batch conversion across requested sectors.

use std::collections::BTreeSet;

use voxscape_blocks::{MaterialCatalog, MaterialId};
use voxscape_landscape::{DecodeError, LandscapeArchive, LayeredSector, SECTOR_SIZE, Sector};
use voxscape_world::VoxelSink;

use crate::config::ConvertConfig;
use crate::coords::{SectorCoord, tile_world};
use crate::synth::synthesize_sector;

#[derive(Clone, Copy, Debug, Default)]
pub struct ConvertOptions {
    /// Blank the requested footprints before synthesis.
    pub clear: bool,
}

#[derive(Clone, Debug, Default)]
pub struct ConvertStats {
    pub sectors_converted: usize,
    pub sectors_missing: usize,
    pub sectors_malformed: usize,
    pub ground_voxels: u64,
    pub support_voxels: u64,
    pub overlay_voxels: u64,
    pub wall_voxels: u64,
    pub door_voxels: u64,
    pub window_voxels: u64,
    pub roof_voxels: u64,
    pub object_voxels: u64,
    /// `kind:code` tags seen during conversion, e.g. `overlay:200`.
    pub unknown_codes: BTreeSet<String>,
}

impl ConvertStats {
    pub fn placed_total(&self) -> u64 {
        self.ground_voxels
            + self.support_voxels
            + self.overlay_voxels
            + self.wall_voxels
            + self.door_voxels
            + self.window_voxels
            + self.roof_voxels
            + self.object_voxels
    }
}

/// Everything a synthesis pass needs: config, palette, the output sink,
/// and running stats. Passed explicitly instead of living in globals.
pub struct ConvertCtx<'a, S: VoxelSink> {
    pub cfg: &'a ConvertConfig,
    pub materials: &'a MaterialCatalog,
    pub sink: &'a mut S,
    pub stats: ConvertStats,
    warned_tokens: BTreeSet<&'static str>,
}

impl<'a, S: VoxelSink> ConvertCtx<'a, S> {
    pub fn new(cfg: &'a ConvertConfig, materials: &'a MaterialCatalog, sink: &'a mut S) -> Self {
        Self {
            cfg,
            materials,
            sink,
            stats: ConvertStats::default(),
            warned_tokens: BTreeSet::new(),
        }
    }

    pub fn into_stats(self) -> ConvertStats {
        self.stats
    }

    pub(crate) fn resolve(&mut self, token: &'static str) -> MaterialId {
        match self.materials.get_id(token) {
            Some(id) => id,
            None => {
                if self.warned_tokens.insert(token) {
                    log::warn!("palette has no entry for token `{token}`; using the unknown material");
                }
                self.materials.unknown_id()
            }
        }
    }

    pub(crate) fn place(&mut self, wx: i32, wy: i32, wz: i32, token: &'static str) {
        let id = self.resolve(token);
        self.sink.place_voxel(wx, wy, wz, id);
    }

    pub(crate) fn place_id(&mut self, wx: i32, wy: i32, wz: i32, id: MaterialId) {
        self.sink.place_voxel(wx, wy, wz, id);
    }

    /// Record an unrecognized landscape code, warning the first time only.
    pub(crate) fn note_unknown(&mut self, kind: &str, code: u32) {
        let tag = format!("{kind}:{code}");
        if self.stats.unknown_codes.insert(tag) {
            log::warn!("unrecognized {kind} code {code}; marking with the unknown material");
        }
    }
}

/// Convert each requested sector in order. Holes in the archive and
/// malformed entries are logged and skipped; the batch never aborts.
pub fn convert_sectors<S: VoxelSink>(
    archive: &LandscapeArchive,
    coords: &[SectorCoord],
    opts: ConvertOptions,
    ctx: &mut ConvertCtx<'_, S>,
) {
    for &coord in coords {
        if opts.clear {
            clear_sector(ctx, coord);
        }
        let layered = match load_layers(archive, coord, ctx.cfg.layers) {
            Ok(s) => s,
            Err(e) => {
                log::warn!("sector ({}, {}) failed to decode: {e}", coord.sx, coord.sy);
                ctx.stats.sectors_malformed += 1;
                continue;
            }
        };
        if !layered.has_ground_layer() {
            log::info!(
                "sector ({}, {}) not present in archive; skipped",
                coord.sx,
                coord.sy
            );
            ctx.stats.sectors_missing += 1;
            continue;
        }
        let origin = ctx.cfg.bounds.sector_origin(coord);
        synthesize_sector(ctx, &layered, origin);
        ctx.stats.sectors_converted += 1;
        log::debug!(
            "sector ({}, {}) synthesized at world origin ({}, {})",
            coord.sx,
            coord.sy,
            origin.0,
            origin.1
        );
    }
}

fn load_layers(
    archive: &LandscapeArchive,
    coord: SectorCoord,
    layers: u8,
) -> Result<LayeredSector, DecodeError> {
    let mut out = Vec::with_capacity(layers as usize);
    for layer in 0..layers {
        match archive.lookup(layer, coord.sx, coord.sy) {
            Some(payload) => out.push(Some(Sector::decode(payload)?)),
            None => out.push(None),
        }
    }
    Ok(LayeredSector::new(out))
}

/// Write an air column over every tile of the sector footprint. Runs even
/// for sectors the archive does not have, so a re-convert can erase stale
/// structures.
fn clear_sector<S: VoxelSink>(ctx: &mut ConvertCtx<'_, S>, coord: SectorCoord) {
    let origin = ctx.cfg.bounds.sector_origin(coord);
    let base = ctx.cfg.base_y;
    let top = base + ctx.cfg.clear_span;
    for tx in 0..SECTOR_SIZE as i32 {
        for ty in 0..SECTOR_SIZE as i32 {
            let (wx, wz) = tile_world(origin, tx, ty);
            for y in base..=top {
                ctx.place_id(wx, y, wz, MaterialId::AIR);
            }
        }
    }
}
