//! World-mutation boundary: the voxel sink trait and an in-memory buffer.
#![forbid(unsafe_code)]

use hashbrown::HashMap;

use voxscape_blocks::MaterialId;

/// Receives the synthesizer's placement stream. One call per voxel; later
/// writes to the same position win.
pub trait VoxelSink {
    fn place_voxel(&mut self, wx: i32, wy: i32, wz: i32, material: MaterialId);
}

#[derive(Default, Debug, Clone, Copy)]
pub struct WorldBufferStats {
    /// Non-air placements, including ones that replaced an earlier voxel.
    pub placed: u64,
    /// Subset of `placed` that replaced an existing voxel.
    pub overwritten: u64,
    /// Air placements that actually removed a voxel.
    pub cleared: u64,
}

/// Sparse in-memory voxel store. Absent positions read as air, and placing
/// air removes the entry, so clearing a volume never grows the map.
#[derive(Default)]
pub struct WorldBuffer {
    inner: HashMap<(i32, i32, i32), MaterialId>,
    min: Option<(i32, i32, i32)>,
    max: Option<(i32, i32, i32)>,
    stats: WorldBufferStats,
}

impl WorldBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, wx: i32, wy: i32, wz: i32) -> MaterialId {
        self.inner
            .get(&(wx, wy, wz))
            .copied()
            .unwrap_or(MaterialId::AIR)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn stats(&self) -> WorldBufferStats {
        self.stats
    }

    /// Inclusive min/max corners over every non-air voxel ever placed.
    /// High-water marks: removing voxels does not shrink the box.
    pub fn bounds(&self) -> Option<((i32, i32, i32), (i32, i32, i32))> {
        Some((self.min?, self.max?))
    }

    pub fn iter(&self) -> impl Iterator<Item = ((i32, i32, i32), MaterialId)> + '_ {
        self.inner.iter().map(|(k, v)| (*k, *v))
    }

    fn grow_bounds(&mut self, p: (i32, i32, i32)) {
        match (&mut self.min, &mut self.max) {
            (Some(min), Some(max)) => {
                min.0 = min.0.min(p.0);
                min.1 = min.1.min(p.1);
                min.2 = min.2.min(p.2);
                max.0 = max.0.max(p.0);
                max.1 = max.1.max(p.1);
                max.2 = max.2.max(p.2);
            }
            _ => {
                self.min = Some(p);
                self.max = Some(p);
            }
        }
    }
}

impl VoxelSink for WorldBuffer {
    fn place_voxel(&mut self, wx: i32, wy: i32, wz: i32, material: MaterialId) {
        let key = (wx, wy, wz);
        if material.is_air() {
            if self.inner.remove(&key).is_some() {
                self.stats.cleared += 1;
            }
            return;
        }
        if self.inner.insert(key, material).is_some() {
            self.stats.overwritten += 1;
        }
        self.stats.placed += 1;
        self.grow_bounds(key);
    }
}
