//! The chunked world simulation: voxel chunks streamed around the player,
//! per-voxel decorator tables, map definitions and their live instances,
//! sky and weather, and deterministic map generation.

pub mod chunk;
pub mod chunk_manager;
pub mod decorator;
pub mod entity;
pub mod error;
pub mod generation;
pub mod level;
pub mod map;
pub mod map_instance;
pub mod rng;
pub mod sky;
pub mod streaming;
pub mod voxel;
pub mod voxel_instance;
pub mod weather;

pub use error::GenError;
