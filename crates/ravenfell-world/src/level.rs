//! Runtime state for one map level: the streamed voxel chunks, the entities
//! riding along with them, and the level's ceiling scale. Levels the player
//! is not on are frozen; only the active level receives updates.

use ravenfell_core::coord::CoordDouble3;
use ravenfell_core::services::{AudioPlayer, RenderResourceSink};

use crate::chunk_manager::VoxelChunkManager;
use crate::entity::EntityChunkManager;
use crate::map::MapDefinition;
use crate::streaming::ActiveChunkSet;

pub struct LevelInstance {
    voxel_chunk_manager: VoxelChunkManager,
    entity_chunk_manager: EntityChunkManager,
    active_chunks: ActiveChunkSet,
    ceiling_scale: f64,
}

impl LevelInstance {
    pub fn new(ceiling_scale: f64) -> Self {
        Self {
            voxel_chunk_manager: VoxelChunkManager::new(),
            entity_chunk_manager: EntityChunkManager::new(),
            active_chunks: ActiveChunkSet::new(),
            ceiling_scale,
        }
    }

    pub fn ceiling_scale(&self) -> f64 {
        self.ceiling_scale
    }

    pub fn voxel_chunk_manager(&self) -> &VoxelChunkManager {
        &self.voxel_chunk_manager
    }

    pub fn voxel_chunk_manager_mut(&mut self) -> &mut VoxelChunkManager {
        &mut self.voxel_chunk_manager
    }

    pub fn entity_chunk_manager(&self) -> &EntityChunkManager {
        &self.entity_chunk_manager
    }

    pub fn entity_chunk_manager_mut(&mut self) -> &mut EntityChunkManager {
        &mut self.entity_chunk_manager
    }

    /// One frame of level simulation: recompute the active chunk set around
    /// the player, stream voxel and entity chunks to match, and advance
    /// per-voxel state.
    pub fn update(
        &mut self,
        dt: f64,
        player: CoordDouble3,
        active_level_index: Option<usize>,
        map_def: &MapDefinition,
        chunk_distance: i32,
        audio: &mut dyn AudioPlayer,
    ) {
        self.active_chunks.update(player.chunk, chunk_distance);

        self.voxel_chunk_manager.update(
            dt,
            self.active_chunks.new_positions(),
            self.active_chunks.freed_positions(),
            player,
            active_level_index,
            map_def,
            self.ceiling_scale,
            audio,
        );

        self.entity_chunk_manager.update(
            dt,
            self.active_chunks.new_positions(),
            self.active_chunks.freed_positions(),
            active_level_index,
            map_def,
        );
    }

    /// Notifies the renderer that this level's scene should own the GPU-side
    /// resources. Called on (re)activation only.
    pub fn set_active(&mut self, renderer: &mut dyn RenderResourceSink) {
        renderer.on_scene_activated();
    }

    /// End-of-frame dirty flag clearing.
    pub fn clean_up(&mut self) {
        self.voxel_chunk_manager.clean_up();
    }
}
