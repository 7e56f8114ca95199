//! Decompression and streaming contract for the original game's binary
//! assets. Map tile files decode into three stacked word layers; decoded
//! payloads can be held LZ4-compressed in memory until a chunk needs them.

pub mod cache;
pub mod error;
pub mod rle;
pub mod tile;

pub use error::AssetError;
