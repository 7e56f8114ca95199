//! In-memory compressed payload holder. Decoded wilderness block tiles are
//! kept LZ4-compressed until a chunk populate needs them, with a 3-byte
//! fill marker short-circuiting payloads that are a single repeated byte.

use crate::error::AssetError;

/// Marker byte opening a fill-encoded payload.
const FILL_MARKER: u8 = 0xF1;

/// A payload stored compressed, decompressed on demand.
#[derive(Debug, Clone)]
pub struct CompressedPayload {
    bytes: Vec<u8>,
    uncompressed_len: usize,
}

impl CompressedPayload {
    /// Compresses `data`. Single-value payloads are stored as a fill marker
    /// instead of going through LZ4.
    pub fn pack(data: &[u8]) -> Self {
        if let Some(value) = detect_fill(data) {
            return Self {
                bytes: vec![FILL_MARKER, value, !value],
                uncompressed_len: data.len(),
            };
        }

        Self {
            bytes: lz4_flex::compress_prepend_size(data),
            uncompressed_len: data.len(),
        }
    }

    /// Decompresses back to the original payload.
    pub fn unpack(&self) -> Result<Vec<u8>, AssetError> {
        if self.is_fill() {
            if self.bytes.len() != 3 || self.bytes[2] != !self.bytes[1] {
                return Err(AssetError::InvalidFillPayload);
            }
            return Ok(vec![self.bytes[1]; self.uncompressed_len]);
        }

        let data = lz4_flex::decompress_size_prepended(&self.bytes)
            .map_err(|e| AssetError::DecompressError(e.to_string()))?;

        if data.len() != self.uncompressed_len {
            return Err(AssetError::PayloadSizeMismatch {
                expected: self.uncompressed_len,
                actual: data.len(),
            });
        }

        Ok(data)
    }

    /// Whether the payload took the fill-marker path.
    pub fn is_fill(&self) -> bool {
        self.bytes.first() == Some(&FILL_MARKER) && self.bytes.len() == 3
    }

    /// Stored (compressed) size in bytes.
    pub fn stored_len(&self) -> usize {
        self.bytes.len()
    }

    /// Original payload size in bytes.
    pub fn uncompressed_len(&self) -> usize {
        self.uncompressed_len
    }
}

/// Returns the repeated byte if every byte in `data` is identical.
fn detect_fill(data: &[u8]) -> Option<u8> {
    let first = *data.first()?;
    data.iter().all(|&b| b == first).then_some(first)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let data: Vec<u8> = (0..10_000).map(|i| (i % 251) as u8).collect();
        let packed = CompressedPayload::pack(&data);
        assert!(!packed.is_fill());
        assert_eq!(packed.unpack().expect("unpacks"), data);
    }

    #[test]
    fn test_fill_fast_path() {
        let data = vec![0x42u8; 8192];
        let packed = CompressedPayload::pack(&data);
        assert!(packed.is_fill());
        assert_eq!(packed.stored_len(), 3);
        assert_eq!(packed.unpack().expect("unpacks"), data);
    }

    #[test]
    fn test_nearly_uniform_is_not_fill() {
        let mut data = vec![0u8; 4096];
        data[4095] = 1;
        let packed = CompressedPayload::pack(&data);
        assert!(!packed.is_fill());
        assert_eq!(packed.unpack().expect("unpacks"), data);
    }

    #[test]
    fn test_compression_shrinks_repetitive_data() {
        let data = vec![1u8, 2, 3, 4]
            .into_iter()
            .cycle()
            .take(16_384)
            .collect::<Vec<_>>();
        let packed = CompressedPayload::pack(&data);
        assert!(packed.stored_len() < data.len() / 4);
    }
}
