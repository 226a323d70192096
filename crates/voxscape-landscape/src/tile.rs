/// First value of the backward-diagonal range.
pub const DIAGONAL_BACKWARD_BASE: i32 = 12_000;
/// First value of the object-reference range.
pub const OBJECT_THRESHOLD: i32 = 48_000;

/// One decoded cell of the tile grid. Field order matches the serialized
/// layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tile {
    /// Raw height byte; 0 is the highest ground, 255 the lowest.
    pub ground_elevation: u8,
    /// Ground palette code.
    pub ground_material: u8,
    /// Overlay code, 0 for none.
    pub ground_overlay: u8,
    /// Roof code, 0 for none.
    pub roof_texture: u8,
    /// Wall code on the tile's east border, 0 for none.
    pub right_wall: u8,
    /// Wall code on the tile's north border, 0 for none.
    pub top_wall: u8,
    /// Packed diagonal-wall / object field, see [`Tile::diagonal_feature`].
    pub diagonal: i32,
}

/// Interpretation of the packed `diagonal` field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiagonalFeature {
    /// A "/" wall; the code indexes the same table as border walls.
    Forward(u16),
    /// A "\" wall.
    Backward(u16),
    /// A free-standing scenery object id.
    Object(u32),
}

impl Tile {
    /// Decode the packed diagonal field. Zero and negative values carry
    /// nothing.
    pub fn diagonal_feature(&self) -> Option<DiagonalFeature> {
        match self.diagonal {
            v if v <= 0 => None,
            v if v < DIAGONAL_BACKWARD_BASE => Some(DiagonalFeature::Forward(v as u16)),
            v if v < OBJECT_THRESHOLD => {
                Some(DiagonalFeature::Backward((v - DIAGONAL_BACKWARD_BASE) as u16))
            }
            v => Some(DiagonalFeature::Object((v - OBJECT_THRESHOLD) as u32)),
        }
    }

    #[inline]
    pub fn has_border_wall(&self) -> bool {
        self.top_wall != 0 || self.right_wall != 0
    }
}
