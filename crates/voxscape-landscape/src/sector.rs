use crate::reader::{ByteReader, DecodeError};
use crate::tile::Tile;
use crate::{SECTOR_PAYLOAD, SECTOR_SIZE, TILE_BYTES};

/// A 48x48 tile grid decoded from one archive entry. Tiles are stored
/// outer-X: all of column `tx = 0` first, then `tx = 1`, and so on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sector {
    tiles: Vec<Tile>,
}

impl Sector {
    /// Decode one entry payload. The length must match exactly; anything
    /// else is a truncated or padded write and the whole sector is refused.
    pub fn decode(payload: &[u8]) -> Result<Self, DecodeError> {
        if payload.len() != SECTOR_PAYLOAD {
            return Err(DecodeError::MalformedSector {
                len: payload.len(),
                expected: SECTOR_PAYLOAD,
            });
        }
        let mut r = ByteReader::new(payload);
        let mut tiles = Vec::with_capacity(SECTOR_SIZE * SECTOR_SIZE);
        for _ in 0..SECTOR_SIZE * SECTOR_SIZE {
            tiles.push(Tile {
                ground_elevation: r.read_u8()?,
                ground_material: r.read_u8()?,
                ground_overlay: r.read_u8()?,
                roof_texture: r.read_u8()?,
                right_wall: r.read_u8()?,
                top_wall: r.read_u8()?,
                diagonal: r.read_i32()?,
            });
        }
        Ok(Self { tiles })
    }

    /// Exact inverse of [`Sector::decode`].
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(SECTOR_PAYLOAD);
        for t in &self.tiles {
            out.push(t.ground_elevation);
            out.push(t.ground_material);
            out.push(t.ground_overlay);
            out.push(t.roof_texture);
            out.push(t.right_wall);
            out.push(t.top_wall);
            out.extend_from_slice(&t.diagonal.to_be_bytes());
        }
        out
    }

    /// Build a sector from a full tile vector (authoring and fixtures).
    pub fn from_tiles(tiles: Vec<Tile>) -> Result<Self, DecodeError> {
        if tiles.len() != SECTOR_SIZE * SECTOR_SIZE {
            return Err(DecodeError::MalformedSector {
                len: tiles.len() * TILE_BYTES,
                expected: SECTOR_PAYLOAD,
            });
        }
        Ok(Self { tiles })
    }

    /// Flat storage index for a tile position.
    #[inline]
    pub fn index(tx: usize, ty: usize) -> usize {
        tx * SECTOR_SIZE + ty
    }

    /// Bounds-checked accessor; out-of-grid indices are an ordinary `None`,
    /// which is how neighbor probes fall off a sector edge.
    #[inline]
    pub fn tile(&self, tx: i32, ty: i32) -> Option<&Tile> {
        if tx < 0 || ty < 0 || tx >= SECTOR_SIZE as i32 || ty >= SECTOR_SIZE as i32 {
            return None;
        }
        self.tiles.get(Self::index(tx as usize, ty as usize))
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }
}

/// Every decoded layer of one sector column. Missing layers stay as holes
/// so callers can tell "no upper storey" from "empty upper storey". Which
/// column it is stays with the caller, alongside the world origin.
#[derive(Clone, Debug)]
pub struct LayeredSector {
    layers: Vec<Option<Sector>>,
}

impl LayeredSector {
    pub fn new(layers: Vec<Option<Sector>>) -> Self {
        Self { layers }
    }

    #[inline]
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    #[inline]
    pub fn layer(&self, layer: usize) -> Option<&Sector> {
        self.layers.get(layer)?.as_ref()
    }

    pub fn tile(&self, layer: usize, tx: i32, ty: i32) -> Option<&Tile> {
        self.layer(layer)?.tile(tx, ty)
    }

    /// Without a ground layer there is nothing to anchor upper storeys to.
    pub fn has_ground_layer(&self) -> bool {
        self.layer(0).is_some()
    }
}
