//! Deterministic map generation. Every map is built from explicit seeds so
//! a city gate crossing can regenerate the other side bit-for-bit instead
//! of persisting it.

use glam::DVec2;
use ravenfell_assets::cache::CompressedPayload;
use ravenfell_assets::tile::{MapTileLayers, TileLayer, WORDS_PER_LAYER};
use ravenfell_core::constants::{
    CHUNK_DIM, WILD_CITY_ORIGIN_CHUNK_X, WILD_CITY_ORIGIN_CHUNK_Z, WILD_DIM,
};
use ravenfell_core::coord::{ChunkInt2, CoordInt3, VoxelInt3};
use ravenfell_core::services::{SoundId, TextureId};

use crate::decorator::{
    DoorDefinition, LevelChangeDirection, LockDefinition, TransitionDefinition, TriggerDefinition,
    TriggerTextDefinition,
};
use crate::entity::EntityDefinition;
use crate::error::GenError;
use crate::map::{
    LevelDefinition, LevelInfoDefinition, LevelPlacement, MapDefinition, SkyDefinition,
    SkyInfoDefinition, SkyObjectDefinition, SkyStarPlacement, WildMapData,
};
use crate::rng::WorldRng;
use crate::voxel::{ChasmKind, VoxelDefinition};
use crate::weather::WeatherDefinition;

/// Voxels per city block side.
const CITY_BLOCK_DIM: i32 = 32;

/// Distinct wilderness block tiles.
const WILD_UNIQUE_BLOCKS: u8 = 8;

/// Interior footprint: one chunk.
const INTERIOR_DIM: i32 = CHUNK_DIM;
const INTERIOR_HEIGHT: i32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteriorType {
    Dungeon,
    House,
    Temple,
    Palace,
}

/// Parameters for generating an interior. Carried inside enter-interior
/// transition voxels so the interior is built on entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteriorGenInfo {
    pub name: String,
    pub interior_type: InteriorType,
    pub seed: u32,
}

/// Parameters for generating a city. Cached by the game state so a gate
/// round-trip rebuilds the identical city.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityGenInfo {
    pub name: String,
    pub city_seed: u32,
    pub sky_seed: u32,
    /// Block indices that stay clear of generated buildings.
    pub reserved_blocks: Vec<u8>,
    pub blocks_per_side: u32,
}

/// Parameters for generating the wilderness around a city.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WildGenInfo {
    pub wild_seed: u32,
    pub city_seed: u32,
}

impl WildGenInfo {
    /// The wilderness that surrounds a given city.
    pub fn for_city(city: &CityGenInfo) -> Self {
        Self {
            wild_seed: city.city_seed.rotate_left(13) ^ 0x5749_4C44,
            city_seed: city.city_seed,
        }
    }
}

/// Parameters for generating an exterior sky.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExteriorSkyGenInfo {
    pub weather: WeatherDefinition,
    pub star_count: usize,
    pub sky_seed: u32,
}

/// Builds an interior map: a stack of one-chunk levels connected by
/// level-change stairs, with an exit back to the exterior on the first
/// level.
pub fn generate_interior(gen: &InteriorGenInfo) -> Result<MapDefinition, GenError> {
    if gen.name.is_empty() {
        return Err(GenError::EmptyName);
    }

    let mut rng = WorldRng::new(gen.seed);
    let level_count = match gen.interior_type {
        InteriorType::Dungeon => 2 + rng.next_bounded(3) as usize,
        InteriorType::Palace | InteriorType::Temple => 1 + rng.next_bounded(2) as usize,
        InteriorType::House => 1,
    };

    let mut info = LevelInfoDefinition::new(1.0);
    let wall = info.add_voxel_def(VoxelDefinition::Wall {
        side: TextureId(0x11),
        floor: TextureId(0x12),
        ceiling: TextureId(0x13),
    });
    let floor = info.add_voxel_def(VoxelDefinition::Floor {
        texture: TextureId(0x14),
    });
    let ceiling = info.add_voxel_def(VoxelDefinition::Ceiling {
        texture: TextureId(0x15),
    });
    let door = info.add_voxel_def(VoxelDefinition::Door {
        texture: TextureId(0x16),
    });

    let exit_def = info.add_transition_def(TransitionDefinition::ExitInterior);
    let up_def = info.add_transition_def(TransitionDefinition::LevelChange {
        direction: LevelChangeDirection::Up,
    });
    let down_def = info.add_transition_def(TransitionDefinition::LevelChange {
        direction: LevelChangeDirection::Down,
    });
    let door_def = info.add_door_def(DoorDefinition::swinging(SoundId(0x30), SoundId(0x31)));
    let lock_def = info.add_lock_def(LockDefinition {
        key_id: -1,
        lock_level: 1,
    });
    let lore_def = info.add_trigger_def(TriggerDefinition {
        sound: Some(SoundId(0x32)),
        text: Some(TriggerTextDefinition {
            text: "The air grows cold here.".to_string(),
            display_once: true,
        }),
    });

    let mut levels = Vec::with_capacity(level_count);
    for level_index in 0..level_count {
        let mut level = LevelDefinition::new(INTERIOR_DIM, INTERIOR_HEIGHT, INTERIOR_DIM)?;

        for x in 0..INTERIOR_DIM {
            for z in 0..INTERIOR_DIM {
                level.set_voxel(x, 0, z, floor);
                level.set_voxel(x, INTERIOR_HEIGHT - 1, z, ceiling);
                let perimeter =
                    x == 0 || x == INTERIOR_DIM - 1 || z == 0 || z == INTERIOR_DIM - 1;
                if perimeter {
                    for y in 1..(INTERIOR_HEIGHT - 1) {
                        level.set_voxel(x, y, z, wall);
                    }
                }
            }
        }

        // A few interior pillars for variety.
        for _ in 0..(4 + rng.next_bounded(8)) {
            let x = 2 + rng.next_bounded((INTERIOR_DIM - 4) as u32) as i32;
            let z = 2 + rng.next_bounded((INTERIOR_DIM - 4) as u32) as i32;
            for y in 1..(INTERIOR_HEIGHT - 1) {
                level.set_voxel(x, y, z, wall);
            }
        }

        // A locked door somewhere along the middle.
        let door_x = 4 + rng.next_bounded((INTERIOR_DIM - 8) as u32) as i32;
        let door_z = 4 + rng.next_bounded((INTERIOR_DIM - 8) as u32) as i32;
        let door_voxel = VoxelInt3::new(door_x, 1, door_z);
        level.set_voxel(door_x, 1, door_z, door);
        level.add_door_placement(LevelPlacement {
            def_index: door_def,
            positions: vec![door_voxel],
        });
        level.add_lock_placement(LevelPlacement {
            def_index: lock_def,
            positions: vec![door_voxel],
        });

        // Stairs up. On the first level this is the way out: dungeons climb
        // toward the surface (a level change), other interiors open onto
        // the exterior they were entered from.
        let up_voxel = VoxelInt3::new(2, 1, 2);
        level.set_voxel(up_voxel.x, up_voxel.y, up_voxel.z, wall);
        let first_level_def = if gen.interior_type == InteriorType::Dungeon {
            up_def
        } else {
            exit_def
        };
        level.add_transition_placement(LevelPlacement {
            def_index: if level_index == 0 {
                first_level_def
            } else {
                up_def
            },
            positions: vec![up_voxel],
        });

        // Stairs down on every level but the last.
        if level_index + 1 < level_count {
            let down_voxel = VoxelInt3::new(INTERIOR_DIM - 3, 1, INTERIOR_DIM - 3);
            level.set_voxel(down_voxel.x, down_voxel.y, down_voxel.z, wall);
            level.add_transition_placement(LevelPlacement {
                def_index: down_def,
                positions: vec![down_voxel],
            });
        }

        // Lore trigger near the stairs on dungeon levels.
        if gen.interior_type == InteriorType::Dungeon {
            level.add_trigger_placement(LevelPlacement {
                def_index: lore_def,
                positions: vec![VoxelInt3::new(3, 1, 2)],
            });
        }

        levels.push(level);
    }

    let level_info_indices = vec![0; level_count];
    let sky_indices_per_level = vec![0; level_count];

    MapDefinition::interior(
        levels,
        vec![info],
        level_info_indices,
        vec![SkyDefinition::interior("PAL_INTERIOR".to_string())],
        vec![SkyInfoDefinition::default()],
        vec![0],
        sky_indices_per_level,
        0,
        vec![DVec2::new(3.5, 2.5)],
    )
}

/// Builds a city map: walled grid of blocks with generated buildings,
/// gates at the four wall midpoints, and an exterior sky.
pub fn generate_city(
    gen: &CityGenInfo,
    sky_gen: &ExteriorSkyGenInfo,
) -> Result<MapDefinition, GenError> {
    if gen.name.is_empty() {
        return Err(GenError::EmptyName);
    }
    if gen.blocks_per_side == 0 {
        return Err(GenError::ZeroCityBlocks);
    }
    if gen.reserved_blocks.is_empty() {
        return Err(GenError::NoReservedBlocks);
    }

    let span = gen.blocks_per_side as i32 * CITY_BLOCK_DIM;
    let height = 6;
    let mut rng = WorldRng::new(gen.city_seed);

    let mut info = LevelInfoDefinition::new(1.0);
    let ground = info.add_voxel_def(VoxelDefinition::Floor {
        texture: TextureId(0x20),
    });
    let city_wall = info.add_voxel_def(VoxelDefinition::Wall {
        side: TextureId(0x21),
        floor: TextureId(0x21),
        ceiling: TextureId(0x21),
    });
    let building_wall = info.add_voxel_def(VoxelDefinition::Wall {
        side: TextureId(0x22),
        floor: TextureId(0x22),
        ceiling: TextureId(0x22),
    });
    let building_door = info.add_voxel_def(VoxelDefinition::Door {
        texture: TextureId(0x23),
    });

    let gate_def = info.add_transition_def(TransitionDefinition::CityGate);
    let door_def = info.add_door_def(DoorDefinition::swinging(SoundId(0x40), SoundId(0x41)));

    let mut level = LevelDefinition::new(span, height, span)?;

    for x in 0..span {
        for z in 0..span {
            level.set_voxel(x, 0, z, ground);
            let perimeter = x == 0 || x == span - 1 || z == 0 || z == span - 1;
            if perimeter {
                for y in 1..4 {
                    level.set_voxel(x, y, z, city_wall);
                }
            }
        }
    }

    // Gates at the four wall midpoints.
    let mid = span / 2;
    let gate_voxels = [
        VoxelInt3::new(0, 1, mid),
        VoxelInt3::new(span - 1, 1, mid),
        VoxelInt3::new(mid, 1, 0),
        VoxelInt3::new(mid, 1, span - 1),
    ];
    level.add_transition_placement(LevelPlacement {
        def_index: gate_def,
        positions: gate_voxels.to_vec(),
    });

    // Buildings in every block the reservation list leaves free.
    let blocks = gen.blocks_per_side as i32;
    for block_z in 0..blocks {
        for block_x in 0..blocks {
            let block_index = (block_z * blocks + block_x) as u8;
            if gen.reserved_blocks.contains(&block_index) {
                continue;
            }

            let base_x = block_x * CITY_BLOCK_DIM + 4;
            let base_z = block_z * CITY_BLOCK_DIM + 4;
            let size_x = 8 + rng.next_bounded(8) as i32;
            let size_z = 8 + rng.next_bounded(8) as i32;
            let max_x = (base_x + size_x).min(span - 2);
            let max_z = (base_z + size_z).min(span - 2);

            for x in base_x..max_x {
                for z in base_z..max_z {
                    let edge = x == base_x || x == max_x - 1 || z == base_z || z == max_z - 1;
                    if edge {
                        for y in 1..3 {
                            level.set_voxel(x, y, z, building_wall);
                        }
                    }
                }
            }

            // Door on the building's south wall, leading to an interior.
            let door_voxel = VoxelInt3::new(base_x + (max_x - base_x) / 2, 1, base_z);
            level.set_voxel(door_voxel.x, door_voxel.y, door_voxel.z, building_door);
            level.add_door_placement(LevelPlacement {
                def_index: door_def,
                positions: vec![door_voxel],
            });

            let name = format!("{} hall {}", gen.name, block_index);
            let name_def = info.add_building_name(name.clone());
            level.add_building_name_placement(LevelPlacement {
                def_index: name_def,
                positions: vec![door_voxel],
            });

            let interior_def = info.add_transition_def(TransitionDefinition::EnterInterior {
                gen_info: InteriorGenInfo {
                    name,
                    interior_type: InteriorType::House,
                    seed: gen.city_seed ^ (block_index as u32).wrapping_mul(0x9E37_79B9),
                },
            });
            level.add_transition_placement(LevelPlacement {
                def_index: interior_def,
                positions: vec![door_voxel],
            });

            // A lamp by the door.
            let lamp_def = info.add_entity_def(EntityDefinition {
                name: "streetlight".to_string(),
                texture: "LAMPPOST".to_string(),
                anim_frame_count: 2,
                anim_seconds: 1.0,
                is_streetlight: true,
            });
            level.add_entity_placement(LevelPlacement {
                def_index: lamp_def,
                positions: vec![VoxelInt3::new(door_voxel.x + 1, 1, door_voxel.z - 1)],
            });
        }
    }

    let (sky, sky_info) = generate_exterior_sky(sky_gen);
    let center = DVec2::new(mid as f64 + 0.5, mid as f64 + 0.5);

    MapDefinition::city(level, info, sky, sky_info, vec![center])
}

/// Builds the wilderness around a city: a repeating grid of block tiles
/// chosen by seed, with the decoded tiles held compressed until chunks
/// need them, and gates back into the city at the city-origin chunk.
pub fn generate_wilderness(
    gen: &WildGenInfo,
    sky_gen: &ExteriorSkyGenInfo,
) -> Result<MapDefinition, GenError> {
    let mut info = LevelInfoDefinition::new(1.0);

    // Tile words index this palette directly; the order here is the tile
    // format contract for wilderness blocks.
    let grass = info.add_voxel_def(VoxelDefinition::Floor {
        texture: TextureId(0x50),
    });
    let rock = info.add_voxel_def(VoxelDefinition::Wall {
        side: TextureId(0x51),
        floor: TextureId(0x51),
        ceiling: TextureId(0x51),
    });
    let tree = info.add_voxel_def(VoxelDefinition::Wall {
        side: TextureId(0x52),
        floor: TextureId(0x52),
        ceiling: TextureId(0x52),
    });
    let chasm = info.add_voxel_def(VoxelDefinition::Chasm {
        texture: TextureId(0x53),
        kind: ChasmKind::Wet,
    });

    let mut rng = WorldRng::new(gen.wild_seed);

    let mut block_ids = Vec::with_capacity((WILD_DIM * WILD_DIM) as usize);
    for _ in 0..(WILD_DIM * WILD_DIM) {
        block_ids.push(rng.next_bounded(WILD_UNIQUE_BLOCKS as u32) as u8);
    }

    let mut block_tiles = Vec::with_capacity(WILD_UNIQUE_BLOCKS as usize);
    for block_id in 0..WILD_UNIQUE_BLOCKS {
        let tile = generate_wild_block_tile(block_id, gen.wild_seed, grass, rock, tree, chasm);
        block_tiles.push(CompressedPayload::pack(&tile.payload_bytes()));
    }

    // Gates back into the city sit on the city-origin chunk's edge midpoints.
    let origin = ChunkInt2::new(WILD_CITY_ORIGIN_CHUNK_X, WILD_CITY_ORIGIN_CHUNK_Z);
    let mid = CHUNK_DIM / 2;
    let city_gate_positions = vec![
        CoordInt3::new(origin, VoxelInt3::new(0, 1, mid)),
        CoordInt3::new(origin, VoxelInt3::new(CHUNK_DIM - 1, 1, mid)),
        CoordInt3::new(origin, VoxelInt3::new(mid, 1, 0)),
        CoordInt3::new(origin, VoxelInt3::new(mid, 1, CHUNK_DIM - 1)),
    ];

    let wild = WildMapData::new(block_ids, block_tiles, city_gate_positions);
    let (sky, sky_info) = generate_exterior_sky(sky_gen);

    MapDefinition::wilderness(wild, info, sky, sky_info)
}

/// One wilderness block's tile layers, deterministic from the block ID and
/// the wilderness seed.
fn generate_wild_block_tile(
    block_id: u8,
    wild_seed: u32,
    grass: u16,
    rock: u16,
    tree: u16,
    chasm: u16,
) -> MapTileLayers {
    let mut rng = WorldRng::new(wild_seed ^ ((block_id as u32) << 8));

    let mut floor = vec![grass; WORDS_PER_LAYER];
    let mut wall = vec![0u16; WORDS_PER_LAYER];
    let ceiling = vec![0u16; WORDS_PER_LAYER];

    // Sparser blocks have lower IDs; block 0 is open meadow.
    let feature_count = (block_id as u32) * 6;
    for _ in 0..feature_count {
        let x = rng.next_bounded(CHUNK_DIM as u32) as usize;
        let z = rng.next_bounded(CHUNK_DIM as u32) as usize;
        let index = z * CHUNK_DIM as usize + x;
        wall[index] = if rng.next_bounded(3) == 0 { rock } else { tree };
    }

    // One block kind carries a water chasm pool.
    if block_id == 3 {
        let pool_x = 8 + rng.next_bounded(40) as usize;
        let pool_z = 8 + rng.next_bounded(40) as usize;
        for dz in 0..6 {
            for dx in 0..6 {
                let index = (pool_z + dz) * CHUNK_DIM as usize + pool_x + dx;
                floor[index] = chasm;
            }
        }
    }

    MapTileLayers {
        floor: TileLayer::from_words(floor),
        wall: TileLayer::from_words(wall),
        ceiling: TileLayer::from_words(ceiling),
    }
}

/// Builds an exterior sky: sun, two moons, seeded stars, and lightning
/// bolt objects when the weather calls for them.
pub fn generate_exterior_sky(gen: &ExteriorSkyGenInfo) -> (SkyDefinition, SkyInfoDefinition) {
    let mut info = SkyInfoDefinition::default();
    let sun = info.add_object(SkyObjectDefinition {
        texture: "SUN".to_string(),
        anim_frame_count: 1,
        anim_seconds: 0.0,
    });
    let moon_primary = info.add_object(SkyObjectDefinition {
        texture: "MOON_A".to_string(),
        anim_frame_count: 1,
        anim_seconds: 0.0,
    });
    let moon_secondary = info.add_object(SkyObjectDefinition {
        texture: "MOON_B".to_string(),
        anim_frame_count: 1,
        anim_seconds: 0.0,
    });

    let lightning_object_indices = if gen.weather.thunderstorm {
        (0..3)
            .map(|i| {
                info.add_object(SkyObjectDefinition {
                    texture: format!("BOLT_{i}"),
                    anim_frame_count: 4,
                    anim_seconds: 0.35,
                })
            })
            .collect()
    } else {
        Vec::new()
    };

    let mut rng = WorldRng::new(gen.sky_seed);
    let mut star_placements = Vec::with_capacity(gen.star_count);
    for _ in 0..gen.star_count {
        let angle = rng.next_f64() * std::f64::consts::TAU;
        let elevation = rng.next_f64();
        let direction = glam::DVec3::new(
            angle.cos() * (1.0 - elevation),
            elevation.max(0.05),
            angle.sin() * (1.0 - elevation),
        )
        .normalize();
        star_placements.push(SkyStarPlacement {
            direction,
            brightness: 128 + rng.next_bounded(128) as u8,
        });
    }

    let sky = SkyDefinition {
        background_texture: "SKY_EXTERIOR".to_string(),
        sun_object_index: Some(sun),
        moon_object_indices: vec![moon_primary, moon_secondary],
        lightning_object_indices,
        star_placements,
    };

    (sky, info)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn city_gen() -> CityGenInfo {
        CityGenInfo {
            name: "Stonehaven".to_string(),
            city_seed: 0xC171_5EED,
            sky_seed: 0x5B7_AA11,
            reserved_blocks: vec![0],
            blocks_per_side: 4,
        }
    }

    fn sky_gen() -> ExteriorSkyGenInfo {
        ExteriorSkyGenInfo {
            weather: WeatherDefinition::clear(),
            star_count: 64,
            sky_seed: 0x57A2,
        }
    }

    #[test]
    fn test_interior_generation_deterministic() {
        let gen = InteriorGenInfo {
            name: "Mould's Deep".to_string(),
            interior_type: InteriorType::Dungeon,
            seed: 99,
        };
        let a = generate_interior(&gen).expect("generates");
        let b = generate_interior(&gen).expect("generates");

        assert_eq!(a.level_count(), b.level_count());
        let level_a = a.level(0);
        let level_b = b.level(0);
        for x in 0..INTERIOR_DIM {
            for z in 0..INTERIOR_DIM {
                for y in 0..INTERIOR_HEIGHT {
                    assert_eq!(level_a.voxel(x, y, z), level_b.voxel(x, y, z));
                }
            }
        }
    }

    #[test]
    fn test_interior_empty_name_rejected() {
        let gen = InteriorGenInfo {
            name: String::new(),
            interior_type: InteriorType::House,
            seed: 1,
        };
        assert!(matches!(generate_interior(&gen), Err(GenError::EmptyName)));
    }

    #[test]
    fn test_interior_first_level_has_exit() {
        let gen = InteriorGenInfo {
            name: "Rat cellar".to_string(),
            interior_type: InteriorType::House,
            seed: 5,
        };
        let map = generate_interior(&gen).expect("generates");
        let level = map.level(0);
        let info = map.level_info_for_level(0);

        let has_exit = level.transition_placements().iter().any(|p| {
            matches!(
                info.transition_def(p.def_index),
                TransitionDefinition::ExitInterior
            )
        });
        assert!(has_exit);
    }

    #[test]
    fn test_city_generation_validates_params() {
        let mut gen = city_gen();
        gen.blocks_per_side = 0;
        assert!(matches!(
            generate_city(&gen, &sky_gen()),
            Err(GenError::ZeroCityBlocks)
        ));

        let mut gen = city_gen();
        gen.reserved_blocks.clear();
        assert!(matches!(
            generate_city(&gen, &sky_gen()),
            Err(GenError::NoReservedBlocks)
        ));
    }

    #[test]
    fn test_city_has_four_gates() {
        let map = generate_city(&city_gen(), &sky_gen()).expect("generates");
        let level = map.level(0);
        let info = map.level_info_for_level(0);

        let gate_positions: usize = level
            .transition_placements()
            .iter()
            .filter(|p| {
                matches!(
                    info.transition_def(p.def_index),
                    TransitionDefinition::CityGate
                )
            })
            .map(|p| p.positions.len())
            .sum();
        assert_eq!(gate_positions, 4);
    }

    #[test]
    fn test_reserved_blocks_stay_clear() {
        let with_reservation = generate_city(&city_gen(), &sky_gen()).expect("generates");
        // Block 0's interior area (skipping the shared ground) has no walls.
        let level = with_reservation.level(0);
        for x in 4..12 {
            for z in 4..12 {
                assert_eq!(level.voxel(x, 1, z), 0, "reserved block must stay open");
            }
        }
    }

    #[test]
    fn test_wilderness_deterministic_and_compressed() {
        let gen = WildGenInfo::for_city(&city_gen());
        let a = generate_wilderness(&gen, &sky_gen()).expect("generates");
        let b = generate_wilderness(&gen, &sky_gen()).expect("generates");

        let wild_a = a.wild().expect("wild data");
        let wild_b = b.wild().expect("wild data");
        for z in 0..WILD_DIM {
            for x in 0..WILD_DIM {
                let chunk = ChunkInt2::new(x, z);
                assert_eq!(wild_a.block_id(chunk), wild_b.block_id(chunk));
            }
        }

        // Decoded tiles round-trip through the compressed cache.
        let tile = wild_a.block_tile(0).expect("unpacks");
        let again = wild_a.block_tile(0).expect("unpacks");
        assert_eq!(tile, again);
    }

    #[test]
    fn test_wild_gates_at_city_origin() {
        let gen = WildGenInfo::for_city(&city_gen());
        let map = generate_wilderness(&gen, &sky_gen()).expect("generates");
        let wild = map.wild().expect("wild data");

        let origin = ChunkInt2::new(WILD_CITY_ORIGIN_CHUNK_X, WILD_CITY_ORIGIN_CHUNK_Z);
        assert_eq!(wild.city_gates_in_chunk(origin).count(), 4);
        assert_eq!(wild.city_gates_in_chunk(ChunkInt2::new(0, 0)).count(), 0);
    }

    #[test]
    fn test_sky_star_count_and_determinism() {
        let (sky_a, _) = generate_exterior_sky(&sky_gen());
        let (sky_b, _) = generate_exterior_sky(&sky_gen());
        assert_eq!(sky_a.star_placements.len(), 64);
        assert_eq!(sky_a.star_placements, sky_b.star_placements);
        assert!(sky_a.lightning_object_indices.is_empty());

        let stormy = ExteriorSkyGenInfo {
            weather: WeatherDefinition::rain(true),
            ..sky_gen()
        };
        let (sky_storm, _) = generate_exterior_sky(&stormy);
        assert_eq!(sky_storm.lightning_object_indices.len(), 3);
    }
}
