//! Chunk streaming policy: which chunk positions are active around the
//! player, and the per-frame delta as the player moves. The radius is a
//! Chebyshev distance, so the active set is a square.

use ravenfell_core::coord::{chunk_distance, ChunkInt2};

/// Reusable buffer of active chunk positions plus this frame's delta.
#[derive(Debug, Default)]
pub struct ActiveChunkSet {
    active: Vec<ChunkInt2>,
    new_positions: Vec<ChunkInt2>,
    freed_positions: Vec<ChunkInt2>,
}

impl ActiveChunkSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recomputes the active set around `center` and the delta against the
    /// previous frame. The center chunk comes first so population starts
    /// nearest the player.
    pub fn update(&mut self, center: ChunkInt2, radius: i32) {
        debug_assert!(radius >= 1);

        let mut desired = Vec::with_capacity(((2 * radius + 1) * (2 * radius + 1)) as usize);
        desired.push(center);
        for d in 1..=radius {
            // Ring at Chebyshev distance d.
            for x in -d..=d {
                desired.push(center + ChunkInt2::new(x, -d));
                desired.push(center + ChunkInt2::new(x, d));
            }
            for z in (-d + 1)..d {
                desired.push(center + ChunkInt2::new(-d, z));
                desired.push(center + ChunkInt2::new(d, z));
            }
        }

        self.new_positions.clear();
        self.freed_positions.clear();

        for &pos in &desired {
            if !self.active.contains(&pos) {
                self.new_positions.push(pos);
            }
        }
        for &pos in &self.active {
            if chunk_distance(pos, center) > radius {
                self.freed_positions.push(pos);
            }
        }

        self.active = desired;
    }

    pub fn positions(&self) -> &[ChunkInt2] {
        &self.active
    }

    pub fn new_positions(&self) -> &[ChunkInt2] {
        &self.new_positions
    }

    pub fn freed_positions(&self) -> &[ChunkInt2] {
        &self.freed_positions
    }
}
