//! Per-chunk entity state: static creatures, furnishings, and streetlights
//! placed by the level blueprint. Entities stream in and out with their
//! chunk and only animate while their level is active.

use std::collections::HashMap;

use ravenfell_core::constants::CHUNK_DIM;
use ravenfell_core::coord::{ChunkInt2, CoordDouble3};

use crate::map::{MapDefinition, MapType};

/// Static description of an entity class.
#[derive(Debug, Clone)]
pub struct EntityDefinition {
    pub name: String,
    pub texture: String,
    pub anim_frame_count: u32,
    pub anim_seconds: f64,
    /// Streetlights switch on with night lights.
    pub is_streetlight: bool,
}

/// One placed entity.
#[derive(Debug, Clone)]
pub struct EntityInstance {
    pub def_index: usize,
    pub position: CoordDouble3,
    /// Seconds into the looping animation.
    anim_seconds: f64,
    anim_period: f64,
    is_streetlight: bool,
    /// For streetlights: lit or dark.
    pub activated: bool,
}

impl EntityInstance {
    pub fn anim_percent(&self) -> f64 {
        if self.anim_period <= 0.0 {
            0.0
        } else {
            self.anim_seconds / self.anim_period
        }
    }
}

/// Owns per-chunk entity lists, populated and freed in lockstep with the
/// voxel chunks.
#[derive(Debug, Default)]
pub struct EntityChunkManager {
    entities: HashMap<ChunkInt2, Vec<EntityInstance>>,
    night_lights_active: bool,
}

impl EntityChunkManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Streams entity lists to match this frame's chunk delta, then
    /// advances animation clocks.
    pub fn update(
        &mut self,
        dt: f64,
        new_chunk_positions: &[ChunkInt2],
        freed_chunk_positions: &[ChunkInt2],
        active_level_index: Option<usize>,
        map_def: &MapDefinition,
    ) {
        for pos in freed_chunk_positions {
            self.entities.remove(pos);
        }

        for &pos in new_chunk_positions {
            let instances = self.populate_chunk_entities(pos, active_level_index, map_def);
            self.entities.insert(pos, instances);
        }

        for instances in self.entities.values_mut() {
            for inst in instances.iter_mut() {
                if inst.anim_period > 0.0 {
                    inst.anim_seconds = (inst.anim_seconds + dt) % inst.anim_period;
                }
            }
        }
    }

    fn populate_chunk_entities(
        &self,
        chunk_pos: ChunkInt2,
        active_level_index: Option<usize>,
        map_def: &MapDefinition,
    ) -> Vec<EntityInstance> {
        // The wilderness places no blueprint entities.
        if map_def.map_type() == MapType::Wilderness {
            return Vec::new();
        }

        let level_index = active_level_index.expect("interior/city update requires a level index");
        let level = map_def.level(level_index);
        let level_info = map_def.level_info_for_level(level_index);

        let origin_x = chunk_pos.x * CHUNK_DIM;
        let origin_z = chunk_pos.y * CHUNK_DIM;

        let mut instances = Vec::new();
        for placement in level.entity_placements() {
            let def = level_info.entity_def(placement.def_index);
            for &voxel in &placement.positions {
                let local_x = voxel.x - origin_x;
                let local_z = voxel.z - origin_z;
                let in_chunk = local_x >= 0 && local_x < CHUNK_DIM && local_z >= 0 && local_z < CHUNK_DIM;
                if !in_chunk {
                    continue;
                }

                instances.push(EntityInstance {
                    def_index: placement.def_index,
                    position: CoordDouble3::new(
                        chunk_pos,
                        glam::DVec3::new(
                            local_x as f64 + 0.50,
                            voxel.y as f64,
                            local_z as f64 + 0.50,
                        ),
                    ),
                    anim_seconds: 0.0,
                    anim_period: def.anim_seconds,
                    is_streetlight: def.is_streetlight,
                    activated: def.is_streetlight && self.night_lights_active,
                });
            }
        }

        instances
    }

    /// Switches streetlight entities on or off.
    pub fn set_night_lights_active(&mut self, active: bool) {
        self.night_lights_active = active;
        for instances in self.entities.values_mut() {
            for inst in instances.iter_mut() {
                if inst.is_streetlight {
                    inst.activated = active;
                }
            }
        }
    }

    pub fn entities_in_chunk(&self, chunk_pos: ChunkInt2) -> &[EntityInstance] {
        self.entities
            .get(&chunk_pos)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn entity_count(&self) -> usize {
        self.entities.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec3;

    use crate::map::{LevelDefinition, LevelInfoDefinition, LevelPlacement, SkyDefinition,
        SkyInfoDefinition};

    fn map_with_lamp() -> MapDefinition {
        let mut level = LevelDefinition::new(CHUNK_DIM, 3, CHUNK_DIM).expect("valid dims");
        let mut info = LevelInfoDefinition::new(1.0);
        let lamp = info.add_entity_def(EntityDefinition {
            name: "streetlight".to_string(),
            texture: "LAMP".to_string(),
            anim_frame_count: 2,
            anim_seconds: 1.0,
            is_streetlight: true,
        });
        level.add_entity_placement(LevelPlacement {
            def_index: lamp,
            positions: vec![IVec3::new(5, 1, 5)],
        });

        MapDefinition::city(
            level,
            info,
            SkyDefinition::interior("SKY".to_string()),
            SkyInfoDefinition::default(),
            vec![glam::DVec2::new(8.0, 8.0)],
        )
        .expect("valid city")
    }

    #[test]
    fn test_populate_and_free() {
        let map_def = map_with_lamp();
        let mut manager = EntityChunkManager::new();
        let origin = ChunkInt2::new(0, 0);

        manager.update(0.0, &[origin], &[], Some(0), &map_def);
        assert_eq!(manager.entities_in_chunk(origin).len(), 1);

        // A chunk outside the level footprint has no entities.
        let far = ChunkInt2::new(4, 4);
        manager.update(0.0, &[far], &[], Some(0), &map_def);
        assert!(manager.entities_in_chunk(far).is_empty());

        manager.update(0.0, &[], &[origin], Some(0), &map_def);
        assert!(manager.entities_in_chunk(origin).is_empty());
    }

    #[test]
    fn test_night_lights_toggle() {
        let map_def = map_with_lamp();
        let mut manager = EntityChunkManager::new();
        let origin = ChunkInt2::new(0, 0);
        manager.update(0.0, &[origin], &[], Some(0), &map_def);

        assert!(!manager.entities_in_chunk(origin)[0].activated);
        manager.set_night_lights_active(true);
        assert!(manager.entities_in_chunk(origin)[0].activated);
        manager.set_night_lights_active(false);
        assert!(!manager.entities_in_chunk(origin)[0].activated);
    }

    #[test]
    fn test_animation_advances_and_wraps() {
        let map_def = map_with_lamp();
        let mut manager = EntityChunkManager::new();
        let origin = ChunkInt2::new(0, 0);
        manager.update(0.0, &[origin], &[], Some(0), &map_def);

        manager.update(0.25, &[], &[], Some(0), &map_def);
        let percent = manager.entities_in_chunk(origin)[0].anim_percent();
        assert!((percent - 0.25).abs() < 1.0e-9);

        manager.update(1.0, &[], &[], Some(0), &map_def);
        let percent = manager.entities_in_chunk(origin)[0].anim_percent();
        assert!((percent - 0.25).abs() < 1.0e-9, "animation should wrap");
    }
}
