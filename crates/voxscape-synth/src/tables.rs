//! Placement tables: landscape codes in, material tokens and shape hints
//! out. Data lives here so the synthesis passes stay free of magic numbers.

/// Token every unrecognized code falls back to. The palette maps it to a
/// loud marker block so gaps are visible in the exported world.
pub const UNKNOWN_TOKEN: &str = "unknown";

/// Wall code that is an open doorway rather than solid wall.
pub const DOORWAY_CODE: u16 = 2;

// --- Ground palette ---
//
// Ordered (upper bound exclusive, token) bands over the ground byte.
// Bands are contiguous and cover the whole 0..=255 range, so the lookup
// is total by construction.
const GROUND_BANDS: &[(u16, &str)] = &[
    (1, "grass"),
    (16, "stone"),
    (32, "dirt"),
    (48, "sand"),
    (64, "path"),
    (80, "gravel"),
    (96, "mud"),
    (112, "snow"),
    (256, "grass"),
];

pub fn ground_material(code: u8) -> &'static str {
    let c = code as u16;
    for &(bound, token) in GROUND_BANDS {
        if c < bound {
            return token;
        }
    }
    UNKNOWN_TOKEN
}

/// Material for the fill column under a tile. Surface-only palettes get a
/// plain substitute so a path never floats on a pillar of path blocks.
pub fn support_material(ground_token: &'static str) -> &'static str {
    if ground_token == "path" { "dirt" } else { ground_token }
}

// --- Overlays ---

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OverlayDirective {
    pub token: &'static str,
    /// Marks the tile as inside a building; walls on indoor tiles shift
    /// outward and upper storeys inherit the flag.
    pub indoors: bool,
    /// Replace the ground voxel instead of stacking one above it.
    pub replace_ground: bool,
    /// A hole: cuts the ground voxel on layer 0 and emits nothing above.
    pub is_void: bool,
    /// Force the tile down to the configured sea level.
    pub override_elevation: bool,
}

const fn overlay(
    token: &'static str,
    indoors: bool,
    replace_ground: bool,
    is_void: bool,
    override_elevation: bool,
) -> OverlayDirective {
    OverlayDirective {
        token,
        indoors,
        replace_ground,
        is_void,
        override_elevation,
    }
}

pub fn overlay_directive(code: u8) -> OverlayDirective {
    match code {
        1 => overlay("road", false, true, false, false),
        2 => overlay("water", false, true, false, true),
        3 => overlay("floor_wood", true, true, false, false),
        4 => overlay("bridge", false, false, false, false),
        5 => overlay("gravel", false, true, false, false),
        6 => overlay("carpet_red", true, false, false, false),
        7 => overlay("water", false, true, false, true),
        8 => overlay("floor_tile", true, true, false, false),
        9 => overlay("mud", false, true, false, false),
        11 => overlay("air", false, true, true, false),
        16 => overlay("lava", false, true, false, false),
        _ => overlay(UNKNOWN_TOKEN, false, false, false, false),
    }
}

// --- Walls ---

/// Axis a wall runs across, fixed by which field carried the code: top
/// border and forward diagonals face north, right border and backward
/// diagonals face east.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WallFacing {
    NorthLike,
    EastLike,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WallDirective {
    pub token: &'static str,
    /// Voxels above the floor line.
    pub height: i32,
    /// Door tokens (lower, upper) replacing the bottom two wall voxels.
    pub door: Option<(&'static str, &'static str)>,
    /// Window token replacing the voxel two above the floor.
    pub window: Option<&'static str>,
    /// Fences sit on the ground; no foundation below the floor line.
    pub must_start_above_ground: bool,
}

const fn wall(token: &'static str, height: i32) -> WallDirective {
    WallDirective {
        token,
        height,
        door: None,
        window: None,
        must_start_above_ground: false,
    }
}

pub fn wall_directive(code: u16, facing: WallFacing) -> WallDirective {
    let window = match facing {
        WallFacing::NorthLike => "window_we",
        WallFacing::EastLike => "window_ns",
    };
    match code {
        1 => wall("wall_stone", 3),
        2 => WallDirective {
            door: Some(("door_lower", "door_upper")),
            ..wall("wall_frame", 3)
        },
        3 => WallDirective {
            window: Some(window),
            ..wall("wall_stone", 3)
        },
        4 => wall("wall_panel", 3),
        5 => WallDirective {
            must_start_above_ground: true,
            ..wall("fence_wood", 2)
        },
        6 => WallDirective {
            must_start_above_ground: true,
            ..wall("fence_metal", 1)
        },
        7 => wall("wall_stone", 2),
        8 => WallDirective {
            window: Some(window),
            ..wall("wall_panel", 3)
        },
        9 => WallDirective {
            must_start_above_ground: true,
            ..wall("fence_wood", 1)
        },
        _ => wall(UNKNOWN_TOKEN, 3),
    }
}

// --- Roofs ---

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoofShape {
    /// Flat body piece over the tile itself.
    Plain,
    /// Overhang along one open side.
    Edge,
    /// Overhang where two open sides meet.
    Corner,
}

pub fn roof_directive(code: u8, shape: RoofShape) -> &'static str {
    match (code, shape) {
        (1, RoofShape::Plain) => "roof_slate",
        (1, RoofShape::Edge) => "roof_slate_edge",
        (1, RoofShape::Corner) => "roof_slate_corner",
        (2, RoofShape::Plain) => "roof_thatch",
        (2, RoofShape::Edge) => "roof_thatch_edge",
        (2, RoofShape::Corner) => "roof_thatch_corner",
        _ => UNKNOWN_TOKEN,
    }
}

// --- Scenery objects ---

/// Voxel stack for one object id: (offset above the floor, token). Ids
/// outside the table are `None`; the synthesizer marks those.
pub fn object_directive(id: u32) -> Option<&'static [(i32, &'static str)]> {
    match id {
        0 => Some(&[(0, "tree_trunk")]),
        1 => Some(&[(0, "tree_dead")]),
        2 => Some(&[(0, "well")]),
        3 => Some(&[(0, "signpost")]),
        4 => Some(&[(0, "boulder")]),
        5 => Some(&[(0, "fungus")]),
        6 => Some(&[(0, "fountain")]),
        7 => Some(&[(0, "lamp_post"), (1, "lamp_light")]),
        8 => Some(&[(0, "altar")]),
        _ => None,
    }
}
