//! Single source of truth for engine-wide constants shared by the world
//! simulation and the game-state layer.

/// Side length of a chunk in voxels (north-south and east-west).
pub const CHUNK_DIM: i32 = 64;

// Voxel X/Z coordinates are masked into chunk-local space, so the chunk
// dimension must stay a power of two.
const _: () = assert!(CHUNK_DIM.count_ones() == 1);

/// Number of distinct voxel definitions a chunk can hold. Voxel IDs are a
/// single byte, so this is a hard ceiling.
pub const MAX_VOXEL_DEFS: usize = 256;

/// Side length of the wilderness in chunks.
pub const WILD_DIM: i32 = 64;

/// Chunk coordinate of the city's origin when embedded in the wilderness.
/// A city gate transition anchors the player relative to this chunk.
pub const WILD_CITY_ORIGIN_CHUNK_X: i32 = 31;
pub const WILD_CITY_ORIGIN_CHUNK_Z: i32 = 31;

/// Chunk height used by exterior maps (city and wilderness).
pub const EXTERIOR_CHUNK_HEIGHT: i32 = 6;

/// World-space distance beyond which an open door starts closing.
pub const DOOR_CLOSE_DISTANCE: f64 = 3.0;

/// Default ceiling scale when a level does not override it.
pub const DEFAULT_CEILING_SCALE: f64 = 1.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_dim_power_of_two() {
        assert!(CHUNK_DIM > 0);
        assert_eq!(CHUNK_DIM & (CHUNK_DIM - 1), 0);
    }

    #[test]
    fn test_city_origin_inside_wilderness() {
        assert!(WILD_CITY_ORIGIN_CHUNK_X >= 0 && WILD_CITY_ORIGIN_CHUNK_X < WILD_DIM);
        assert!(WILD_CITY_ORIGIN_CHUNK_Z >= 0 && WILD_CITY_ORIGIN_CHUNK_Z < WILD_DIM);
    }
}
