//! Three-pass structure synthesis for one layered sector: floors first,
//! then walls, then roofs. Later passes read annotations the floor pass
//! wrote; nothing is placed out of order.

use voxscape_blocks::MaterialId;
use voxscape_landscape::{DiagonalFeature, LayeredSector, SECTOR_SIZE, Sector, Tile};
use voxscape_world::VoxelSink;

use crate::coords::tile_world;
use crate::driver::ConvertCtx;
use crate::tables::{
    DOORWAY_CODE, OverlayDirective, RoofShape, UNKNOWN_TOKEN, WallDirective, WallFacing,
    ground_material, object_directive, overlay_directive, roof_directive, support_material,
};

const SIZE: i32 = SECTOR_SIZE as i32;

/// Per-tile annotations from the floor pass, read-only afterwards.
#[derive(Clone, Copy, Debug)]
pub struct FloorInfo {
    /// Absolute world Y of the tile's ground or floor voxel.
    pub floor_y: i32,
    pub indoors: bool,
    pub overlay: Option<OverlayDirective>,
}

/// Write-once annotation grid covering every decoded layer.
pub struct FloorPlan {
    layers: Vec<Vec<Option<FloorInfo>>>,
}

impl FloorPlan {
    fn new(layer_count: usize) -> Self {
        Self {
            layers: vec![vec![None; SECTOR_SIZE * SECTOR_SIZE]; layer_count],
        }
    }

    fn record(&mut self, layer: usize, tx: i32, ty: i32, info: FloorInfo) {
        let slot = &mut self.layers[layer][Sector::index(tx as usize, ty as usize)];
        debug_assert!(slot.is_none(), "floor info written twice for one tile");
        *slot = Some(info);
    }

    /// Out-of-grid and never-annotated slots both read as `None`.
    pub fn get(&self, layer: usize, tx: i32, ty: i32) -> Option<FloorInfo> {
        if tx < 0 || ty < 0 || tx >= SIZE || ty >= SIZE {
            return None;
        }
        *self
            .layers
            .get(layer)?
            .get(Sector::index(tx as usize, ty as usize))?
    }
}

/// Synthesize ground, walls, roofs, and scenery for one sector, streaming
/// placements into the context's sink.
pub fn synthesize_sector<S: VoxelSink>(
    ctx: &mut ConvertCtx<'_, S>,
    sector: &LayeredSector,
    origin: (i32, i32),
) {
    let mut plan = FloorPlan::new(sector.layer_count());
    pass_floors(ctx, sector, origin, &mut plan);
    pass_walls(ctx, sector, origin, &plan);
    pass_roofs(ctx, sector, origin, &plan);
}

#[inline]
fn elevation_for(raw: u8) -> i32 {
    // raw 0 is the highest ground; the divisor squashes the byte range
    // into a few terrace steps above the sea
    5 + (raw / 32) as i32
}

// --- Pass 1: floors ---

fn pass_floors<S: VoxelSink>(
    ctx: &mut ConvertCtx<'_, S>,
    sector: &LayeredSector,
    origin: (i32, i32),
    plan: &mut FloorPlan,
) {
    for layer in 0..sector.layer_count() {
        let Some(grid) = sector.layer(layer) else {
            continue;
        };
        for tx in 0..SIZE {
            for ty in 0..SIZE {
                let Some(tile) = grid.tile(tx, ty) else {
                    continue;
                };
                let (wx, wz) = tile_world(origin, tx, ty);
                let overlay = lookup_overlay(ctx, tile);

                let floor_y = if layer == 0 {
                    let mut elevation = elevation_for(tile.ground_elevation);
                    if overlay.is_some_and(|d| d.override_elevation) {
                        elevation = ctx.cfg.sea_level;
                    }
                    let floor_y = ctx.cfg.base_y + elevation;
                    let ground = ground_material(tile.ground_material);
                    let support = support_material(ground);
                    ctx.place(wx, ctx.cfg.base_y, wz, "bedrock");
                    ctx.stats.support_voxels += 1;
                    for y in ctx.cfg.base_y + 1..floor_y {
                        ctx.place(wx, y, wz, support);
                        ctx.stats.support_voxels += 1;
                    }
                    ctx.place(wx, floor_y, wz, ground);
                    ctx.stats.ground_voxels += 1;
                    floor_y
                } else {
                    let Some(base) = plan.get(0, tx, ty) else {
                        continue;
                    };
                    base.floor_y + layer as i32 * ctx.cfg.inter_floor
                };

                if let Some(d) = overlay {
                    // holes only cut the ground storey; above it they are
                    // plain missing floor
                    if !(d.is_void && layer > 0) {
                        let y = if d.replace_ground { floor_y } else { floor_y + 1 };
                        ctx.place(wx, y, wz, d.token);
                        if !d.is_void {
                            ctx.stats.overlay_voxels += 1;
                        }
                    }
                }

                // a tile's own overlay decides indoor status; without one,
                // upper storeys inherit from the nearest storey below
                let indoors = match overlay {
                    Some(d) => d.indoors,
                    None => (0..layer)
                        .rev()
                        .find_map(|l| plan.get(l, tx, ty))
                        .is_some_and(|i| i.indoors),
                };

                plan.record(
                    layer,
                    tx,
                    ty,
                    FloorInfo {
                        floor_y,
                        indoors,
                        overlay,
                    },
                );
            }
        }
    }
}

fn lookup_overlay<S: VoxelSink>(ctx: &mut ConvertCtx<'_, S>, tile: &Tile) -> Option<OverlayDirective> {
    if tile.ground_overlay == 0 {
        return None;
    }
    let d = overlay_directive(tile.ground_overlay);
    if d.token == UNKNOWN_TOKEN {
        ctx.note_unknown("overlay", tile.ground_overlay as u32);
    }
    Some(d)
}

// --- Pass 2: walls and scenery ---

fn pass_walls<S: VoxelSink>(
    ctx: &mut ConvertCtx<'_, S>,
    sector: &LayeredSector,
    origin: (i32, i32),
    plan: &FloorPlan,
) {
    for layer in 0..sector.layer_count() {
        let Some(grid) = sector.layer(layer) else {
            continue;
        };
        for tx in 0..SIZE {
            for ty in 0..SIZE {
                let Some(tile) = grid.tile(tx, ty) else {
                    continue;
                };
                let Some(info) = plan.get(layer, tx, ty) else {
                    continue;
                };
                let (wx, wz) = tile_world(origin, tx, ty);
                let top = tile.top_wall as u16;
                let right = tile.right_wall as u16;

                if info.indoors && top != 0 && right != 0 {
                    place_wall_corner(ctx, grid, layer, (tx, ty), (wx, wz), &info, top, right);
                } else if top != 0 {
                    let dir = lookup_wall(ctx, top, WallFacing::NorthLike);
                    let z = if info.indoors { wz - 1 } else { wz };
                    let blend = blend_for(ctx, grid, tx, ty, &dir);
                    place_wall_column(ctx, &dir, layer, wx, z, info.floor_y, true, blend);
                } else if right != 0 {
                    let dir = lookup_wall(ctx, right, WallFacing::EastLike);
                    let x = if info.indoors { wx + 1 } else { wx };
                    let blend = blend_for(ctx, grid, tx, ty, &dir);
                    place_wall_column(ctx, &dir, layer, x, wz, info.floor_y, true, blend);
                } else {
                    match tile.diagonal_feature() {
                        Some(DiagonalFeature::Forward(code)) => {
                            let dir = lookup_wall(ctx, code, WallFacing::NorthLike);
                            let blend = blend_for(ctx, grid, tx, ty, &dir);
                            place_wall_column(ctx, &dir, layer, wx, wz, info.floor_y, true, blend);
                        }
                        Some(DiagonalFeature::Backward(code)) => {
                            let dir = lookup_wall(ctx, code, WallFacing::EastLike);
                            let blend = blend_for(ctx, grid, tx, ty, &dir);
                            place_wall_column(ctx, &dir, layer, wx, wz, info.floor_y, true, blend);
                        }
                        Some(DiagonalFeature::Object(id)) => {
                            place_object(ctx, id, wx, wz, info.floor_y);
                        }
                        None => {}
                    }
                }
            }
        }
    }
}

/// Indoor tile carrying walls on both borders: three shifted columns frame
/// the outside corner. At most one door is emitted, on the north column
/// when the north wall carries it.
#[allow(clippy::too_many_arguments)]
fn place_wall_corner<S: VoxelSink>(
    ctx: &mut ConvertCtx<'_, S>,
    grid: &Sector,
    layer: usize,
    (tx, ty): (i32, i32),
    (wx, wz): (i32, i32),
    info: &FloorInfo,
    top: u16,
    right: u16,
) {
    let dir_n = lookup_wall(ctx, top, WallFacing::NorthLike);
    let dir_e = lookup_wall(ctx, right, WallFacing::EastLike);
    let blend = if dir_n.door.is_some() || dir_e.door.is_some() {
        door_blend_material(ctx, grid, tx, ty)
    } else {
        None
    };
    let door_on_north = dir_n.door.is_some();
    place_wall_column(ctx, &dir_n, layer, wx, wz - 1, info.floor_y, door_on_north, blend);
    place_wall_column(
        ctx,
        &dir_e,
        layer,
        wx + 1,
        wz,
        info.floor_y,
        !door_on_north,
        blend,
    );
    let corner = WallDirective {
        door: None,
        window: None,
        ..dir_n
    };
    place_wall_column(ctx, &corner, layer, wx + 1, wz - 1, info.floor_y, false, blend);
}

fn lookup_wall<S: VoxelSink>(ctx: &mut ConvertCtx<'_, S>, code: u16, facing: WallFacing) -> WallDirective {
    let dir = crate::tables::wall_directive(code, facing);
    if dir.token == UNKNOWN_TOKEN {
        ctx.note_unknown("wall", code as u32);
    }
    dir
}

fn blend_for<S: VoxelSink>(
    ctx: &mut ConvertCtx<'_, S>,
    grid: &Sector,
    tx: i32,
    ty: i32,
    dir: &WallDirective,
) -> Option<MaterialId> {
    if dir.door.is_some() {
        door_blend_material(ctx, grid, tx, ty)
    } else {
        None
    }
}

/// Eight-neighbor probe order in world space: N, NE, E, SE, S, SW, W, NW.
/// Tile steps account for the X mirror (world east is tile x - 1).
const BLEND_ORDER: &[(i32, i32)] = &[
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
];

/// Door frames borrow the material of the wall they interrupt: the first
/// neighboring tile carrying a solid (non-doorway) wall wins. Probes that
/// fall off the sector edge are skipped rather than chased across the
/// boundary.
fn door_blend_material<S: VoxelSink>(
    ctx: &mut ConvertCtx<'_, S>,
    grid: &Sector,
    tx: i32,
    ty: i32,
) -> Option<MaterialId> {
    for &(dtx, dty) in BLEND_ORDER {
        let Some(n) = grid.tile(tx + dtx, ty + dty) else {
            continue;
        };
        let code = if n.top_wall != 0 {
            n.top_wall as u16
        } else if n.right_wall != 0 {
            n.right_wall as u16
        } else {
            match n.diagonal_feature() {
                Some(DiagonalFeature::Forward(c)) | Some(DiagonalFeature::Backward(c)) => c,
                _ => 0,
            }
        };
        if code == 0 || code == DOORWAY_CODE {
            continue;
        }
        let dir = crate::tables::wall_directive(code, WallFacing::NorthLike);
        if dir.token == UNKNOWN_TOKEN {
            continue;
        }
        return Some(ctx.resolve(dir.token));
    }
    None
}

/// Emit one vertical wall column. Ground-floor walls sink a foundation
/// below the floor line; fences instead start one above it. Door and
/// window sub-placements replace body voxels at fixed offsets.
#[allow(clippy::too_many_arguments)]
fn place_wall_column<S: VoxelSink>(
    ctx: &mut ConvertCtx<'_, S>,
    dir: &WallDirective,
    layer: usize,
    x: i32,
    z: i32,
    floor_y: i32,
    with_door: bool,
    blend: Option<MaterialId>,
) {
    let start = if dir.must_start_above_ground {
        floor_y + 1
    } else if layer == 0 {
        floor_y - ctx.cfg.foundation_depth
    } else {
        floor_y
    };
    let top = floor_y + dir.height;
    let body = match blend {
        Some(id) => id,
        None => ctx.resolve(dir.token),
    };
    for y in start..=top {
        if with_door {
            if let Some((lower, upper)) = dir.door {
                if y == floor_y + 1 {
                    ctx.place(x, y, z, lower);
                    ctx.stats.door_voxels += 1;
                    continue;
                }
                if y == floor_y + 2 {
                    ctx.place(x, y, z, upper);
                    ctx.stats.door_voxels += 1;
                    continue;
                }
            }
        }
        if let Some(window) = dir.window {
            if y == floor_y + 2 {
                ctx.place(x, y, z, window);
                ctx.stats.window_voxels += 1;
                continue;
            }
        }
        ctx.place_id(x, y, z, body);
        ctx.stats.wall_voxels += 1;
    }
}

fn place_object<S: VoxelSink>(ctx: &mut ConvertCtx<'_, S>, id: u32, wx: i32, wz: i32, floor_y: i32) {
    match object_directive(id) {
        Some(stack) => {
            for &(dy, token) in stack {
                ctx.place(wx, floor_y + 1 + dy, wz, token);
                ctx.stats.object_voxels += 1;
            }
        }
        None => {
            ctx.note_unknown("object", id);
            ctx.place(wx, floor_y + 1, wz, UNKNOWN_TOKEN);
            ctx.stats.object_voxels += 1;
        }
    }
}

// --- Pass 3: roofs ---

fn pass_roofs<S: VoxelSink>(
    ctx: &mut ConvertCtx<'_, S>,
    sector: &LayeredSector,
    origin: (i32, i32),
    plan: &FloorPlan,
) {
    for layer in 0..sector.layer_count() {
        let Some(grid) = sector.layer(layer) else {
            continue;
        };
        for tx in 0..SIZE {
            for ty in 0..SIZE {
                let Some(tile) = grid.tile(tx, ty) else {
                    continue;
                };
                let Some(info) = plan.get(layer, tx, ty) else {
                    continue;
                };
                let (wx, wz) = tile_world(origin, tx, ty);
                let roof_y = info.floor_y + ctx.cfg.wall_height;

                if tile.roof_texture != 0 {
                    roof_own_tile(ctx, grid, tile.roof_texture, (tx, ty), (wx, wz), roof_y);
                } else if tile.has_border_wall() {
                    roof_complement(ctx, grid, plan, layer, tile, (tx, ty), (wx, wz));
                }
            }
        }
    }
}

/// Body piece over the tile, then overhang refinement against the north,
/// east, and northeast neighbors. Any of the three probes falling off the
/// sector leaves the plain piece alone.
fn roof_own_tile<S: VoxelSink>(
    ctx: &mut ConvertCtx<'_, S>,
    grid: &Sector,
    code: u8,
    (tx, ty): (i32, i32),
    (wx, wz): (i32, i32),
    roof_y: i32,
) {
    place_roof(ctx, code, RoofShape::Plain, wx, roof_y, wz);
    let (Some(north), Some(east), Some(_ne)) = (
        grid.tile(tx, ty - 1),
        grid.tile(tx - 1, ty),
        grid.tile(tx - 1, ty - 1),
    ) else {
        return;
    };
    let north_open = north.roof_texture == 0;
    let east_open = east.roof_texture == 0;
    if north_open {
        place_roof(ctx, code, RoofShape::Edge, wx, roof_y, wz - 1);
    }
    if east_open {
        place_roof(ctx, code, RoofShape::Edge, wx + 1, roof_y, wz);
    }
    if north_open && east_open {
        place_roof(ctx, code, RoofShape::Corner, wx + 1, roof_y, wz - 1);
    }
}

/// A walled but unroofed tile bordering roofed neighbors carries the roof
/// line across the wall: an edge piece for one roofed side, a corner piece
/// when both sides are roofed. Heights follow the neighbor, and the north
/// neighbor wins ties.
fn roof_complement<S: VoxelSink>(
    ctx: &mut ConvertCtx<'_, S>,
    grid: &Sector,
    plan: &FloorPlan,
    layer: usize,
    tile: &Tile,
    (tx, ty): (i32, i32),
    (wx, wz): (i32, i32),
) {
    let roofed = |t: Option<&Tile>| t.filter(|t| t.roof_texture != 0).map(|t| t.roof_texture);
    let north = if tile.top_wall != 0 {
        roofed(grid.tile(tx, ty - 1))
    } else {
        None
    };
    let east = if tile.right_wall != 0 {
        roofed(grid.tile(tx - 1, ty))
    } else {
        None
    };
    let height = |ntx: i32, nty: i32| {
        plan.get(layer, ntx, nty)
            .map(|i| i.floor_y + ctx.cfg.wall_height)
    };
    match (north, east) {
        (Some(code), Some(_)) => {
            if let Some(y) = height(tx, ty - 1) {
                place_roof(ctx, code, RoofShape::Corner, wx, y, wz);
            }
        }
        (Some(code), None) => {
            if let Some(y) = height(tx, ty - 1) {
                place_roof(ctx, code, RoofShape::Edge, wx, y, wz);
            }
        }
        (None, Some(code)) => {
            if let Some(y) = height(tx - 1, ty) {
                place_roof(ctx, code, RoofShape::Edge, wx, y, wz);
            }
        }
        (None, None) => {}
    }
}

fn place_roof<S: VoxelSink>(
    ctx: &mut ConvertCtx<'_, S>,
    code: u8,
    shape: RoofShape,
    wx: i32,
    wy: i32,
    wz: i32,
) {
    let token = roof_directive(code, shape);
    if token == UNKNOWN_TOKEN {
        ctx.note_unknown("roof", code as u32);
    }
    ctx.place(wx, wy, wz, token);
    ctx.stats.roof_voxels += 1;
}
