//! Sector addressing and the mirrored tile-to-world transform.

use serde::Deserialize;

use voxscape_landscape::SECTOR_SIZE;

const SIZE: i32 = SECTOR_SIZE as i32;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SectorCoord {
    pub sx: i32,
    pub sy: i32,
}

impl SectorCoord {
    pub const fn new(sx: i32, sy: i32) -> Self {
        Self { sx, sy }
    }
}

impl From<(i32, i32)> for SectorCoord {
    fn from((sx, sy): (i32, i32)) -> Self {
        Self { sx, sy }
    }
}

fn default_min_x() -> i32 {
    48
}
fn default_max_x() -> i32 {
    68
}
fn default_min_y() -> i32 {
    37
}
fn default_max_y() -> i32 {
    57
}

/// Sector rectangle of the source landscape, inclusive on both ends.
///
/// The landscape's X axis is mirrored into world space: the sector at
/// `max_x` lands at world X 0, and within each sector tile X runs against
/// world X. The Y axis maps straight through to world Z.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
pub struct LandscapeBounds {
    #[serde(default = "default_min_x")]
    pub min_x: i32,
    #[serde(default = "default_max_x")]
    pub max_x: i32,
    #[serde(default = "default_min_y")]
    pub min_y: i32,
    #[serde(default = "default_max_y")]
    pub max_y: i32,
}

impl Default for LandscapeBounds {
    fn default() -> Self {
        Self {
            min_x: default_min_x(),
            max_x: default_max_x(),
            min_y: default_min_y(),
            max_y: default_max_y(),
        }
    }
}

impl LandscapeBounds {
    #[inline]
    pub fn count_x(&self) -> i32 {
        self.max_x - self.min_x + 1
    }

    #[inline]
    pub fn count_y(&self) -> i32 {
        self.max_y - self.min_y + 1
    }

    pub fn sector_count(&self) -> usize {
        (self.count_x() * self.count_y()) as usize
    }

    pub fn contains(&self, c: SectorCoord) -> bool {
        c.sx >= self.min_x && c.sx <= self.max_x && c.sy >= self.min_y && c.sy <= self.max_y
    }

    /// Deterministic row-major walk: `sy` outer ascending, `sx` inner
    /// ascending.
    pub fn iter(self) -> impl Iterator<Item = SectorCoord> {
        (self.min_y..=self.max_y)
            .flat_map(move |sy| (self.min_x..=self.max_x).map(move |sx| SectorCoord::new(sx, sy)))
    }

    /// World-space minimum corner of a sector's footprint. The X mirror
    /// means the sector's tile `tx = 47` column sits on this corner.
    pub fn sector_origin(&self, c: SectorCoord) -> (i32, i32) {
        ((self.max_x - c.sx) * SIZE, (c.sy - self.min_y) * SIZE)
    }

    /// Sector containing a world position; exact inverse of
    /// [`LandscapeBounds::sector_origin`] + [`tile_world`] over the
    /// landscape's footprint.
    pub fn sector_at(&self, wx: i32, wz: i32) -> SectorCoord {
        SectorCoord::new(
            self.max_x - wx.div_euclid(SIZE),
            self.min_y + wz.div_euclid(SIZE),
        )
    }
}

/// World position of a tile inside a sector with the given origin. Tile X
/// runs against world X; tile Y maps straight onto world Z.
#[inline]
pub fn tile_world(origin: (i32, i32), tx: i32, ty: i32) -> (i32, i32) {
    (origin.0 + (SIZE - 1 - tx), origin.1 + ty)
}

/// Tile indices for a world position relative to a sector origin; inverse
/// of [`tile_world`].
#[inline]
pub fn world_tile(origin: (i32, i32), wx: i32, wz: i32) -> (i32, i32) {
    (SIZE - 1 - (wx - origin.0), wz - origin.1)
}
