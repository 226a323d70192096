use voxscape_blocks::{MaterialCatalog, MaterialId};
use voxscape_landscape::{LayeredSector, SECTOR_SIZE, Sector, Tile};
use voxscape_synth::coords::tile_world;
use voxscape_synth::{ConvertConfig, ConvertCtx, ConvertStats, SectorCoord, synthesize_sector};
use voxscape_world::WorldBuffer;

/// World origin of sector (48, 37) under the default bounds.
const ORIGIN: (i32, i32) = (960, 0);

fn grid(edit: impl FnOnce(&mut Vec<Tile>)) -> Sector {
    let mut tiles = vec![Tile::default(); SECTOR_SIZE * SECTOR_SIZE];
    edit(&mut tiles);
    Sector::from_tiles(tiles).unwrap()
}

fn tile_mut(tiles: &mut [Tile], tx: usize, ty: usize) -> &mut Tile {
    &mut tiles[Sector::index(tx, ty)]
}

fn convert(layers: Vec<Option<Sector>>) -> (WorldBuffer, ConvertStats, MaterialCatalog) {
    let cfg = ConvertConfig::default();
    let cat = MaterialCatalog::builtin().unwrap();
    assert_eq!(cfg.bounds.sector_origin(SectorCoord::new(48, 37)), ORIGIN);
    let sector = LayeredSector::new(layers);
    let mut world = WorldBuffer::new();
    let mut ctx = ConvertCtx::new(&cfg, &cat, &mut world);
    synthesize_sector(&mut ctx, &sector, ORIGIN);
    let stats = ctx.into_stats();
    (world, stats, cat)
}

fn wpos(tx: i32, ty: i32) -> (i32, i32) {
    tile_world(ORIGIN, tx, ty)
}

fn count_material(world: &WorldBuffer, id: MaterialId) -> usize {
    world.iter().filter(|&(_, m)| m == id).count()
}

#[test]
fn highest_ground_builds_the_pinned_column() {
    let s = grid(|t| {
        let tl = tile_mut(t, 0, 0);
        tl.ground_elevation = 0;
        tl.ground_material = 10;
    });
    let (world, stats, cat) = convert(vec![Some(s), None, None]);
    let (wx, wz) = wpos(0, 0);
    let bedrock = cat.get_id("bedrock").unwrap();
    let stone = cat.get_id("stone").unwrap();
    assert_eq!(world.get(wx, 0, wz), bedrock);
    for y in 1..=4 {
        assert_eq!(world.get(wx, y, wz), stone, "support at y={y}");
    }
    assert_eq!(world.get(wx, 5, wz), stone);
    assert_eq!(world.get(wx, 6, wz), MaterialId::AIR);
    assert_eq!(stats.ground_voxels, (SECTOR_SIZE * SECTOR_SIZE) as u64);
}

#[test]
fn raw_elevation_terraces_in_steps_of_32() {
    let s = grid(|t| {
        tile_mut(t, 1, 1).ground_elevation = 32;
        tile_mut(t, 2, 2).ground_elevation = 255;
    });
    let (world, _, cat) = convert(vec![Some(s), None, None]);
    let grass = cat.get_id("grass").unwrap();

    let (wx, wz) = wpos(1, 1);
    assert_eq!(world.get(wx, 6, wz), grass);
    assert_eq!(world.get(wx, 7, wz), MaterialId::AIR);

    let (wx, wz) = wpos(2, 2);
    assert_eq!(world.get(wx, 12, wz), grass);
    assert_eq!(world.get(wx, 13, wz), MaterialId::AIR);
}

#[test]
fn water_overlay_sinks_to_sea_level() {
    let s = grid(|t| {
        tile_mut(t, 3, 3).ground_overlay = 2;
    });
    let (world, _, cat) = convert(vec![Some(s), None, None]);
    let (wx, wz) = wpos(3, 3);
    let water = cat.get_id("water").unwrap();
    let grass = cat.get_id("grass").unwrap();
    // the tile drops below the lowest natural terrace and the surface is water
    assert_eq!(world.get(wx, 4, wz), water);
    assert_eq!(world.get(wx, 5, wz), MaterialId::AIR);
    assert_eq!(world.get(wx, 3, wz), grass);
}

#[test]
fn overlays_replace_or_stack_per_directive() {
    let s = grid(|t| {
        tile_mut(t, 1, 1).ground_overlay = 1; // road replaces the ground voxel
        tile_mut(t, 2, 2).ground_overlay = 6; // carpet sits above it
    });
    let (world, stats, cat) = convert(vec![Some(s), None, None]);
    let road = cat.get_id("road").unwrap();
    let carpet = cat.get_id("carpet_red").unwrap();
    let grass = cat.get_id("grass").unwrap();

    let (wx, wz) = wpos(1, 1);
    assert_eq!(world.get(wx, 5, wz), road);
    assert_eq!(world.get(wx, 6, wz), MaterialId::AIR);

    let (wx, wz) = wpos(2, 2);
    assert_eq!(world.get(wx, 5, wz), grass);
    assert_eq!(world.get(wx, 6, wz), carpet);
    assert_eq!(stats.overlay_voxels, 2);
}

#[test]
fn hole_overlay_cuts_the_ground_voxel() {
    let s = grid(|t| {
        tile_mut(t, 4, 4).ground_overlay = 11;
    });
    let (world, stats, cat) = convert(vec![Some(s), None, None]);
    let (wx, wz) = wpos(4, 4);
    let grass = cat.get_id("grass").unwrap();
    assert_eq!(world.get(wx, 5, wz), MaterialId::AIR);
    // the support column under the hole survives
    assert_eq!(world.get(wx, 4, wz), grass);
    assert_eq!(stats.overlay_voxels, 0);
}

#[test]
fn outdoor_wall_occupies_the_tile_footprint() {
    let s = grid(|t| {
        tile_mut(t, 5, 5).top_wall = 1;
    });
    let (world, _, cat) = convert(vec![Some(s), None, None]);
    let wall = cat.get_id("wall_stone").unwrap();
    let (wx, wz) = wpos(5, 5);
    // foundation sinks five below the floor line, body rises three above
    assert_eq!(world.get(wx, 0, wz), wall);
    assert_eq!(world.get(wx, 8, wz), wall);
    assert_eq!(world.get(wx, 9, wz), MaterialId::AIR);
    // nothing spills onto the north neighbor
    assert_eq!(world.get(wx, 8, wz - 1), MaterialId::AIR);
}

#[test]
fn indoor_walls_shift_one_voxel_outward() {
    let s = grid(|t| {
        let a = tile_mut(t, 5, 5);
        a.ground_overlay = 3;
        a.top_wall = 1;
        let b = tile_mut(t, 7, 7);
        b.ground_overlay = 8;
        b.right_wall = 4;
    });
    let (world, _, cat) = convert(vec![Some(s), None, None]);
    let stone = cat.get_id("wall_stone").unwrap();
    let panel = cat.get_id("wall_panel").unwrap();
    let plank = cat.get_id("floor_wood").unwrap();

    let (wx, wz) = wpos(5, 5);
    assert_eq!(world.get(wx, 5, wz), plank);
    assert_eq!(world.get(wx, 8, wz - 1), stone);
    assert_eq!(world.get(wx, 8, wz), MaterialId::AIR);

    let (wx, wz) = wpos(7, 7);
    assert_eq!(world.get(wx + 1, 8, wz), panel);
    assert_eq!(world.get(wx, 8, wz), MaterialId::AIR);
}

#[test]
fn fences_start_on_the_ground_without_foundation() {
    let s = grid(|t| {
        tile_mut(t, 6, 6).top_wall = 5;
    });
    let (world, _, cat) = convert(vec![Some(s), None, None]);
    let fence = cat.get_id("fence_wood").unwrap();
    let grass = cat.get_id("grass").unwrap();
    let bedrock = cat.get_id("bedrock").unwrap();
    let (wx, wz) = wpos(6, 6);
    assert_eq!(world.get(wx, 6, wz), fence);
    assert_eq!(world.get(wx, 7, wz), fence);
    assert_eq!(world.get(wx, 8, wz), MaterialId::AIR);
    // ground untouched by any foundation
    assert_eq!(world.get(wx, 5, wz), grass);
    assert_eq!(world.get(wx, 0, wz), bedrock);
}

#[test]
fn door_frame_blends_with_a_neighboring_wall() {
    let s = grid(|t| {
        let doorway = tile_mut(t, 5, 5);
        doorway.ground_overlay = 3;
        doorway.top_wall = 2;
        // world-east neighbor carries the solid wall the door interrupts
        tile_mut(t, 4, 5).right_wall = 1;
    });
    let (world, stats, cat) = convert(vec![Some(s), None, None]);
    let stone = cat.get_id("wall_stone").unwrap();
    let lower = cat.get_id("door_lower").unwrap();
    let upper = cat.get_id("door_upper").unwrap();
    let (wx, wz) = wpos(5, 5);
    // indoor doorway shifts north; door halves at floor+1 / floor+2
    assert_eq!(world.get(wx, 6, wz - 1), lower);
    assert_eq!(world.get(wx, 7, wz - 1), upper);
    // the rest of the column borrows the neighbor material, not the frame's own
    assert_eq!(world.get(wx, 5, wz - 1), stone);
    assert_eq!(world.get(wx, 8, wz - 1), stone);
    assert_eq!(stats.door_voxels, 2);
}

#[test]
fn door_frame_falls_back_to_its_own_material() {
    let s = grid(|t| {
        let doorway = tile_mut(t, 5, 5);
        doorway.ground_overlay = 3;
        doorway.top_wall = 2;
    });
    let (world, _, cat) = convert(vec![Some(s), None, None]);
    let frame = cat.get_id("wall_frame").unwrap();
    let (wx, wz) = wpos(5, 5);
    assert_eq!(world.get(wx, 8, wz - 1), frame);
}

#[test]
fn double_doorway_corner_emits_exactly_one_door() {
    let s = grid(|t| {
        let corner = tile_mut(t, 5, 5);
        corner.ground_overlay = 3;
        corner.top_wall = 2;
        corner.right_wall = 2;
        // world-south neighbor supplies the blend material
        tile_mut(t, 5, 6).top_wall = 1;
    });
    let (world, stats, cat) = convert(vec![Some(s), None, None]);
    let stone = cat.get_id("wall_stone").unwrap();
    let lower = cat.get_id("door_lower").unwrap();
    let (wx, wz) = wpos(5, 5);

    assert_eq!(stats.door_voxels, 2);
    assert_eq!(count_material(&world, lower), 1);
    // the door sits on the north column; east and corner columns are blended wall
    assert_eq!(world.get(wx, 6, wz - 1), lower);
    assert_eq!(world.get(wx + 1, 6, wz), stone);
    assert_eq!(world.get(wx + 1, 6, wz - 1), stone);
}

#[test]
fn upper_storey_walls_inherit_indoor_status() {
    let ground = grid(|t| {
        tile_mut(t, 5, 5).ground_overlay = 3;
    });
    let upper = grid(|t| {
        tile_mut(t, 5, 5).top_wall = 1;
    });
    let (world, _, cat) = convert(vec![Some(ground), Some(upper), None]);
    let stone = cat.get_id("wall_stone").unwrap();
    let (wx, wz) = wpos(5, 5);
    // storey floor sits one inter-floor step above the ground floor
    assert_eq!(world.get(wx, 9, wz - 1), stone);
    assert_eq!(world.get(wx, 12, wz - 1), stone);
    assert_eq!(world.get(wx, 13, wz - 1), MaterialId::AIR);
    // no spill onto the tile's own footprint, and no foundation below
    assert_eq!(world.get(wx, 12, wz), MaterialId::AIR);
    assert_eq!(world.get(wx, 8, wz - 1), MaterialId::AIR);
}

#[test]
fn upper_storey_floor_overlay_lands_on_the_storey_plane() {
    let ground = grid(|t| {
        tile_mut(t, 5, 5).ground_overlay = 3;
    });
    let upper = grid(|t| {
        tile_mut(t, 5, 5).ground_overlay = 3;
    });
    let (world, _, cat) = convert(vec![Some(ground), Some(upper), None]);
    let plank = cat.get_id("floor_wood").unwrap();
    let (wx, wz) = wpos(5, 5);
    assert_eq!(world.get(wx, 5, wz), plank);
    assert_eq!(world.get(wx, 9, wz), plank);
}

#[test]
fn lone_roof_on_the_sector_corner_stays_plain() {
    let s = grid(|t| {
        tile_mut(t, 0, 0).roof_texture = 1;
    });
    let (world, stats, cat) = convert(vec![Some(s), None, None]);
    let plain = cat.get_id("roof_slate").unwrap();
    let edge = cat.get_id("roof_slate_edge").unwrap();
    let corner = cat.get_id("roof_slate_corner").unwrap();
    let (wx, wz) = wpos(0, 0);
    // both overhang probes fall off the sector, so refinement is skipped
    assert_eq!(world.get(wx, 8, wz), plain);
    assert_eq!(count_material(&world, edge), 0);
    assert_eq!(count_material(&world, corner), 0);
    assert_eq!(stats.roof_voxels, 1);
}

#[test]
fn boundary_roof_with_an_open_east_neighbor_stays_plain() {
    // 2x2 block in the sector's world-northwest corner, roofed on the
    // northwest tile only; the north and northeast lookups leave the sector
    let s = grid(|t| {
        tile_mut(t, 47, 0).roof_texture = 1;
    });
    let (world, stats, cat) = convert(vec![Some(s), None, None]);
    let plain = cat.get_id("roof_slate").unwrap();
    let edge = cat.get_id("roof_slate_edge").unwrap();
    let corner = cat.get_id("roof_slate_corner").unwrap();
    let (wx, wz) = wpos(47, 0);
    assert_eq!(world.get(wx, 8, wz), plain);
    // the east neighbor is in the sector and open, but refinement is all
    // or nothing; no lone edge may grow over it
    assert_eq!(world.get(wx + 1, 8, wz), MaterialId::AIR);
    assert_eq!(count_material(&world, plain), 1);
    assert_eq!(count_material(&world, edge), 0);
    assert_eq!(count_material(&world, corner), 0);
    assert_eq!(stats.roof_voxels, 1);
}

#[test]
fn roof_block_grows_edges_and_a_single_outer_corner() {
    let s = grid(|t| {
        for (tx, ty) in [(4, 4), (4, 5), (5, 4), (5, 5)] {
            tile_mut(t, tx, ty).roof_texture = 1;
        }
    });
    let (world, _, cat) = convert(vec![Some(s), None, None]);
    let plain = cat.get_id("roof_slate").unwrap();
    let edge = cat.get_id("roof_slate_edge").unwrap();
    let corner = cat.get_id("roof_slate_corner").unwrap();

    for (tx, ty) in [(4, 4), (4, 5), (5, 4), (5, 5)] {
        let (wx, wz) = wpos(tx, ty);
        assert_eq!(world.get(wx, 8, wz), plain, "plain piece at ({tx},{ty})");
    }
    // open north sides of the block
    let (wx, wz) = wpos(4, 4);
    assert_eq!(world.get(wx, 8, wz - 1), edge);
    assert_eq!(world.get(wx + 1, 8, wz), edge);
    let (wx, wz) = wpos(5, 4);
    assert_eq!(world.get(wx, 8, wz - 1), edge);
    let (wx, wz) = wpos(4, 5);
    assert_eq!(world.get(wx + 1, 8, wz), edge);
    // exactly one corner piece, on the block's outer northeast
    let (wx, wz) = wpos(4, 4);
    assert_eq!(world.get(wx + 1, 8, wz - 1), corner);
    assert_eq!(count_material(&world, corner), 1);
}

#[test]
fn walled_tile_carries_the_neighbor_roof_line() {
    let s = grid(|t| {
        tile_mut(t, 5, 5).top_wall = 1;
        tile_mut(t, 5, 4).roof_texture = 1;
    });
    let (world, _, cat) = convert(vec![Some(s), None, None]);
    let edge = cat.get_id("roof_slate_edge").unwrap();
    let (wx, wz) = wpos(5, 5);
    assert_eq!(world.get(wx, 8, wz), edge);
}

#[test]
fn double_walled_tile_gets_a_corner_piece() {
    let s = grid(|t| {
        let tl = tile_mut(t, 5, 5);
        tl.top_wall = 1;
        tl.right_wall = 1;
        tile_mut(t, 5, 4).roof_texture = 1;
        tile_mut(t, 4, 5).roof_texture = 1;
    });
    let (world, _, cat) = convert(vec![Some(s), None, None]);
    let corner = cat.get_id("roof_slate_corner").unwrap();
    let (wx, wz) = wpos(5, 5);
    assert_eq!(world.get(wx, 8, wz), corner);
}

#[test]
fn scenery_objects_stack_above_the_floor() {
    let s = grid(|t| {
        tile_mut(t, 8, 8).diagonal = 48_007; // lamp post
        tile_mut(t, 9, 9).diagonal = 48_000; // tree trunk
    });
    let (world, stats, cat) = convert(vec![Some(s), None, None]);
    let post = cat.get_id("lamp_post").unwrap();
    let light = cat.get_id("lamp_light").unwrap();
    let trunk = cat.get_id("tree_trunk").unwrap();

    let (wx, wz) = wpos(8, 8);
    assert_eq!(world.get(wx, 6, wz), post);
    assert_eq!(world.get(wx, 7, wz), light);
    let (wx, wz) = wpos(9, 9);
    assert_eq!(world.get(wx, 6, wz), trunk);
    assert_eq!(stats.object_voxels, 3);
}

#[test]
fn diagonal_walls_use_the_wall_table() {
    let s = grid(|t| {
        tile_mut(t, 6, 6).diagonal = 1; // forward, plain stone
        tile_mut(t, 7, 7).diagonal = 12_003; // backward, window wall
        tile_mut(t, 8, 8).diagonal = 3; // forward, window wall
    });
    let (world, _, cat) = convert(vec![Some(s), None, None]);
    let stone = cat.get_id("wall_stone").unwrap();
    let pane_ns = cat.get_id("window_ns").unwrap();
    let pane_we = cat.get_id("window_we").unwrap();

    let (wx, wz) = wpos(6, 6);
    assert_eq!(world.get(wx, 0, wz), stone);
    assert_eq!(world.get(wx, 8, wz), stone);

    // the diagonal direction decides which way the pane spans
    let (wx, wz) = wpos(7, 7);
    assert_eq!(world.get(wx, 7, wz), pane_ns);
    assert_eq!(world.get(wx, 8, wz), stone);
    let (wx, wz) = wpos(8, 8);
    assert_eq!(world.get(wx, 7, wz), pane_we);
}

#[test]
fn unknown_codes_are_marked_and_recorded_once() {
    let s = grid(|t| {
        tile_mut(t, 1, 1).ground_overlay = 200;
        tile_mut(t, 2, 2).ground_overlay = 200;
        tile_mut(t, 3, 3).top_wall = 77;
        tile_mut(t, 4, 4).roof_texture = 9;
        tile_mut(t, 6, 6).diagonal = 48_000 + 777;
    });
    let (world, stats, cat) = convert(vec![Some(s), None, None]);
    let unknown = cat.unknown_id();

    let tags: Vec<&str> = stats.unknown_codes.iter().map(String::as_str).collect();
    assert_eq!(tags, vec!["object:777", "overlay:200", "roof:9", "wall:77"]);

    // each gap leaves a visible marker
    let (wx, wz) = wpos(1, 1);
    assert_eq!(world.get(wx, 6, wz), unknown);
    let (wx, wz) = wpos(3, 3);
    assert_eq!(world.get(wx, 8, wz), unknown);
    let (wx, wz) = wpos(4, 4);
    assert_eq!(world.get(wx, 8, wz), unknown);
    let (wx, wz) = wpos(6, 6);
    assert_eq!(world.get(wx, 6, wz), unknown);
}
