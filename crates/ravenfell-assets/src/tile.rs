//! Map tile files: three stacked 64x64 word layers (floor, wall, ceiling)
//! describing one chunk-sized cell of level geometry.
//!
//! A tile file starts with a little-endian `u16`: the uncompressed byte
//! length of the run-length encoded words that follow, or zero when the
//! payload is stored uncompressed.

use crate::error::AssetError;
use crate::rle::{decode_rle_words, encode_rle_words};

/// Side length of a tile layer in voxels.
pub const TILE_DIM: usize = 64;

/// Words per layer.
pub const WORDS_PER_LAYER: usize = TILE_DIM * TILE_DIM;

/// Bytes per layer.
pub const LAYER_BYTES: usize = WORDS_PER_LAYER * 2;

/// Uncompressed payload size: three layers.
pub const TILE_PAYLOAD_BYTES: usize = LAYER_BYTES * 3;

/// One 64x64 plane of tile words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileLayer {
    words: Vec<u16>,
}

impl TileLayer {
    /// Builds a layer from WORDS_PER_LAYER words in row-major (z, x) order.
    pub fn from_words(words: Vec<u16>) -> Self {
        debug_assert_eq!(words.len(), WORDS_PER_LAYER);
        Self { words }
    }

    fn from_bytes(bytes: &[u8]) -> Self {
        debug_assert_eq!(bytes.len(), LAYER_BYTES);
        let words = bytes
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        Self { words }
    }

    pub fn get(&self, x: usize, z: usize) -> u16 {
        debug_assert!(x < TILE_DIM && z < TILE_DIM);
        self.words[(z * TILE_DIM) + x]
    }

    pub fn words(&self) -> &[u16] {
        &self.words
    }
}

/// Decoded map tile: floor, wall, and ceiling layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapTileLayers {
    pub floor: TileLayer,
    pub wall: TileLayer,
    pub ceiling: TileLayer,
}

impl MapTileLayers {
    /// Decodes a tile file. The leading word selects the stored-uncompressed
    /// branch (zero) or gives the run-length decoded byte length.
    pub fn from_bytes(src: &[u8]) -> Result<Self, AssetError> {
        if src.len() < 2 {
            return Err(AssetError::FileTooSmall(src.len(), 2));
        }

        let uncompressed_len = u16::from_le_bytes([src[0], src[1]]) as usize;
        let payload = &src[2..];

        let decoded = if uncompressed_len == 0 {
            if payload.len() != TILE_PAYLOAD_BYTES {
                return Err(AssetError::InvalidTileSize {
                    expected: TILE_PAYLOAD_BYTES,
                    actual: payload.len(),
                });
            }
            payload.to_vec()
        } else {
            if uncompressed_len != TILE_PAYLOAD_BYTES {
                return Err(AssetError::InvalidTileSize {
                    expected: TILE_PAYLOAD_BYTES,
                    actual: uncompressed_len,
                });
            }
            decode_rle_words(payload, uncompressed_len)?
        };

        Ok(Self {
            floor: TileLayer::from_bytes(&decoded[0..LAYER_BYTES]),
            wall: TileLayer::from_bytes(&decoded[LAYER_BYTES..LAYER_BYTES * 2]),
            ceiling: TileLayer::from_bytes(&decoded[LAYER_BYTES * 2..LAYER_BYTES * 3]),
        })
    }

    /// Rebuilds layers from raw payload bytes (no file header), e.g. when
    /// pulled back out of a compressed cache.
    pub fn from_payload_bytes(bytes: &[u8]) -> Result<Self, AssetError> {
        if bytes.len() != TILE_PAYLOAD_BYTES {
            return Err(AssetError::InvalidTileSize {
                expected: TILE_PAYLOAD_BYTES,
                actual: bytes.len(),
            });
        }

        Ok(Self {
            floor: TileLayer::from_bytes(&bytes[0..LAYER_BYTES]),
            wall: TileLayer::from_bytes(&bytes[LAYER_BYTES..LAYER_BYTES * 2]),
            ceiling: TileLayer::from_bytes(&bytes[LAYER_BYTES * 2..LAYER_BYTES * 3]),
        })
    }

    /// Raw payload bytes in layer order, e.g. for caching.
    pub fn payload_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(TILE_PAYLOAD_BYTES);
        for layer in [&self.floor, &self.wall, &self.ceiling] {
            for word in layer.words() {
                out.extend_from_slice(&word.to_le_bytes());
            }
        }
        out
    }

    /// Encodes as a compressed tile file (header + run-length words).
    pub fn to_compressed_bytes(&self) -> Vec<u8> {
        let mut words = Vec::with_capacity(WORDS_PER_LAYER * 3);
        for layer in [&self.floor, &self.wall, &self.ceiling] {
            words.extend_from_slice(layer.words());
        }

        let mut out = Vec::new();
        out.extend_from_slice(&(TILE_PAYLOAD_BYTES as u16).to_le_bytes());
        out.extend_from_slice(&encode_rle_words(&words));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uncompressed_file(floor_word: u16, wall_word: u16, ceiling_word: u16) -> Vec<u8> {
        let mut out = vec![0u8, 0u8];
        for word in [floor_word, wall_word, ceiling_word] {
            for _ in 0..WORDS_PER_LAYER {
                out.extend_from_slice(&word.to_le_bytes());
            }
        }
        out
    }

    #[test]
    fn test_uncompressed_branch() {
        let file = uncompressed_file(1, 2, 3);
        let tile = MapTileLayers::from_bytes(&file).expect("decodes");
        assert_eq!(tile.floor.get(0, 0), 1);
        assert_eq!(tile.wall.get(63, 63), 2);
        assert_eq!(tile.ceiling.get(10, 20), 3);
    }

    #[test]
    fn test_compressed_round_trip_matches_uncompressed() {
        let file = uncompressed_file(7, 0, 9);
        let tile = MapTileLayers::from_bytes(&file).expect("decodes");

        let compressed = tile.to_compressed_bytes();
        assert!(compressed.len() < file.len(), "uniform layers should shrink");

        let reparsed = MapTileLayers::from_bytes(&compressed).expect("decodes");
        assert_eq!(reparsed, tile);
    }

    #[test]
    fn test_wrong_uncompressed_size_rejected() {
        let mut file = uncompressed_file(1, 2, 3);
        file.pop();
        let result = MapTileLayers::from_bytes(&file);
        assert!(matches!(result, Err(AssetError::InvalidTileSize { .. })));
    }

    #[test]
    fn test_tiny_file_rejected() {
        assert!(matches!(
            MapTileLayers::from_bytes(&[0]),
            Err(AssetError::FileTooSmall(1, 2))
        ));
    }

    #[test]
    fn test_truncated_compressed_payload_rejected() {
        let file = uncompressed_file(4, 4, 4);
        let tile = MapTileLayers::from_bytes(&file).expect("decodes");
        let mut compressed = tile.to_compressed_bytes();
        compressed.truncate(compressed.len() / 2);
        assert!(MapTileLayers::from_bytes(&compressed).is_err());
    }
}
