//! Run-length codec over 16-bit little-endian words, as used by the original
//! game's compressed map tile files.
//!
//! The stream is a sequence of records. Each record starts with a control
//! byte: if the high bit is set, the low 7 bits are a repeat count and one
//! word follows; otherwise the byte is a literal word count and that many
//! words follow. A count of zero is a no-op record.

use crate::error::AssetError;

const RUN_FLAG: u8 = 0x80;
const MAX_RECORD_WORDS: usize = 0x7F;

/// Decodes RLE words into `uncompressed_len` output bytes.
/// `uncompressed_len` must be even (whole words).
pub fn decode_rle_words(src: &[u8], uncompressed_len: usize) -> Result<Vec<u8>, AssetError> {
    debug_assert!(uncompressed_len % 2 == 0);

    let mut out = Vec::with_capacity(uncompressed_len);
    let mut pos = 0;

    while out.len() < uncompressed_len {
        let control = *src.get(pos).ok_or(AssetError::TruncatedRun {
            expected: uncompressed_len,
            actual: out.len(),
        })?;
        pos += 1;

        if control & RUN_FLAG != 0 {
            let count = (control & !RUN_FLAG) as usize;
            let word = read_word(src, pos, &out, uncompressed_len)?;
            pos += 2;
            for _ in 0..count {
                out.extend_from_slice(&word);
            }
        } else {
            let count = control as usize;
            for _ in 0..count {
                let word = read_word(src, pos, &out, uncompressed_len)?;
                pos += 2;
                out.extend_from_slice(&word);
            }
        }
    }

    if out.len() != uncompressed_len {
        return Err(AssetError::RunLengthMismatch {
            expected: uncompressed_len,
            actual: out.len(),
        });
    }

    Ok(out)
}

fn read_word(
    src: &[u8],
    pos: usize,
    out: &[u8],
    uncompressed_len: usize,
) -> Result<[u8; 2], AssetError> {
    if pos + 2 > src.len() {
        return Err(AssetError::TruncatedRun {
            expected: uncompressed_len,
            actual: out.len(),
        });
    }
    Ok([src[pos], src[pos + 1]])
}

/// Encodes words with the run-length scheme above. Runs of two or more equal
/// words become run records; everything else is emitted literally.
pub fn encode_rle_words(words: &[u16]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut i = 0;

    while i < words.len() {
        let mut run = 1;
        while i + run < words.len() && words[i + run] == words[i] && run < MAX_RECORD_WORDS {
            run += 1;
        }

        if run >= 2 {
            out.push(RUN_FLAG | run as u8);
            out.extend_from_slice(&words[i].to_le_bytes());
            i += run;
        } else {
            // Gather a literal stretch up to the next run of 2+.
            let start = i;
            let mut len = 0;
            while i < words.len() && len < MAX_RECORD_WORDS {
                if i + 1 < words.len() && words[i + 1] == words[i] {
                    break;
                }
                i += 1;
                len += 1;
            }
            out.push(len as u8);
            for word in &words[start..start + len] {
                out.extend_from_slice(&word.to_le_bytes());
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_words(bytes: &[u8]) -> Vec<u16> {
        bytes
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect()
    }

    #[test]
    fn test_run_record_decodes() {
        // One run of 4 copies of 0xBEEF.
        let src = [RUN_FLAG | 4, 0xEF, 0xBE];
        let out = decode_rle_words(&src, 8).expect("valid run");
        assert_eq!(to_words(&out), vec![0xBEEF; 4]);
    }

    #[test]
    fn test_literal_record_decodes() {
        let src = [2, 0x01, 0x00, 0x02, 0x00];
        let out = decode_rle_words(&src, 4).expect("valid literals");
        assert_eq!(to_words(&out), vec![1, 2]);
    }

    #[test]
    fn test_truncated_input_rejected() {
        let src = [RUN_FLAG | 4, 0xEF];
        let result = decode_rle_words(&src, 8);
        assert!(matches!(result, Err(AssetError::TruncatedRun { .. })));
    }

    #[test]
    fn test_encode_decode_mixed() {
        let words = vec![7u16, 7, 7, 7, 1, 2, 3, 9, 9, 9, 9, 9, 4];
        let encoded = encode_rle_words(&words);
        let decoded = decode_rle_words(&encoded, words.len() * 2).expect("decodes");
        assert_eq!(to_words(&decoded), words);
    }

    #[test]
    fn test_long_run_splits_records() {
        let words = vec![0xAAAAu16; 300];
        let encoded = encode_rle_words(&words);
        let decoded = decode_rle_words(&encoded, words.len() * 2).expect("decodes");
        assert_eq!(to_words(&decoded), words);
    }
}
