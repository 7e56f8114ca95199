/// Errors that can occur while decoding binary assets.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("file too small ({0} bytes, minimum {1})")]
    FileTooSmall(usize, usize),

    #[error("truncated run-length data: expected {expected} bytes, got {actual}")]
    TruncatedRun { expected: usize, actual: usize },

    #[error("run-length output length {actual} does not match declared {expected}")]
    RunLengthMismatch { expected: usize, actual: usize },

    #[error("invalid tile file size: expected {expected} bytes, got {actual}")]
    InvalidTileSize { expected: usize, actual: usize },

    #[error("LZ4 decompression failed: {0}")]
    DecompressError(String),

    #[error("invalid fill payload (expected 3 bytes)")]
    InvalidFillPayload,

    #[error("payload length {actual} does not match declared {expected}")]
    PayloadSizeMismatch { expected: usize, actual: usize },
}
