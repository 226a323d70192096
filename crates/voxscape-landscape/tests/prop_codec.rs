use proptest::prelude::*;
use voxscape_landscape::{DiagonalFeature, Sector, Tile, OBJECT_THRESHOLD, SECTOR_PAYLOAD};

fn payload() -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(any::<u8>(), SECTOR_PAYLOAD)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    // every exact-length payload decodes, and encode reproduces it byte for byte
    #[test]
    fn decode_encode_roundtrip(bytes in payload()) {
        let sector = Sector::decode(&bytes).unwrap();
        prop_assert_eq!(sector.encode(), bytes);
    }
}

proptest! {
    // the object range always classifies as an object with a non-negative id
    #[test]
    fn object_range_ids_are_non_negative(v in OBJECT_THRESHOLD..=i32::MAX) {
        let tile = Tile { diagonal: v, ..Tile::default() };
        match tile.diagonal_feature() {
            Some(DiagonalFeature::Object(id)) => prop_assert_eq!(id as i64, v as i64 - OBJECT_THRESHOLD as i64),
            other => prop_assert!(false, "expected object, got {:?}", other),
        }
    }

    // the two diagonal wall ranges never classify as objects
    #[test]
    fn wall_ranges_are_walls(v in 1i32..OBJECT_THRESHOLD) {
        let tile = Tile { diagonal: v, ..Tile::default() };
        match tile.diagonal_feature() {
            Some(DiagonalFeature::Forward(_)) => prop_assert!(v < 12_000),
            Some(DiagonalFeature::Backward(_)) => prop_assert!(v >= 12_000),
            other => prop_assert!(false, "expected wall, got {:?}", other),
        }
    }
}
