//! Stateless map and level transition logic. Given the triggering voxel's
//! transition definition and the current map type, this decides and
//! performs: enter-interior, exit-interior, the city gate toggle, or an
//! in-map level change, including player repositioning and re-priming the
//! newly active level's streamed chunks.

use glam::{DVec3, IVec2};
use log::{error, warn};
use ravenfell_core::constants::{CHUNK_DIM, WILD_CITY_ORIGIN_CHUNK_X, WILD_CITY_ORIGIN_CHUNK_Z};
use ravenfell_core::coord::{
    voxel_center, voxel_center_xz, ChunkInt2, CoordDouble3, CoordInt3, VoxelDouble3,
};
use ravenfell_core::direction::VoxelFacing;
use ravenfell_core::services::{AudioPlayer, MusicKind};
use ravenfell_world::decorator::{LevelChangeDirection, TransitionDefinition};
use ravenfell_world::generation::WildGenInfo;
use ravenfell_world::map::MapType;
use ravenfell_world::voxel_instance::{VoxelInstance, VoxelInstanceKind, VoxelInstanceType};

use crate::error::MapStackError;
use crate::game_state::{GameState, Services};
use crate::player::Player;

/// What a level transition did, so the external driver can open the world
/// map when the player climbs out of the top of a dungeon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelTransitionOutcome {
    /// Nothing happened (no transition at the voxel, or not a level change).
    None,
    /// The active level index changed.
    ChangedLevel(usize),
    /// The player left the map; the caller should present the world map.
    ExitToWorldMap,
    /// The armed one-shot level-up override ran instead of the default.
    HandledByOverride,
}

/// Handles a non-level transition the player walked into: exit-interior,
/// enter-interior, or the city gate. `hit` is the transition voxel and
/// `facing` the wall face the player touched.
pub fn handle_map_transition(
    game_state: &mut GameState,
    services: &mut Services,
    hit: CoordInt3,
    facing: VoxelFacing,
    transition: TransitionDefinition,
) -> Result<(), MapStackError> {
    let active_map_type = game_state.active_map_def().map_type();

    match active_map_type {
        MapType::Interior => {
            debug_assert!(matches!(transition, TransitionDefinition::ExitInterior));

            if !game_state.is_active_map_nested() {
                warn!("interior has no enclosing exterior to exit to");
                return Ok(());
            }

            game_state.try_pop_map(services)?;

            let night = game_state.clock().night_lights_active();
            services.audio.set_music(MusicKind::Exterior { night });
            if game_state.active_map_def().map_type() == MapType::City {
                services.audio.set_music(MusicKind::CityJingle);
            }
            Ok(())
        }
        MapType::City | MapType::Wilderness => match transition {
            TransitionDefinition::EnterInterior { gen_info } => {
                // The player returns to the voxel in front of the door.
                let return_coord = hit.offset(facing.delta());
                game_state.try_push_interior(&gen_info, return_coord, services)?;
                services.audio.set_music(MusicKind::Interior);
                Ok(())
            }
            TransitionDefinition::CityGate => {
                handle_city_gate(game_state, services, hit, facing, active_map_type)
            }
            other => {
                error!("transition {other:?} is not valid from an exterior");
                Ok(())
            }
        },
    }
}

/// The city gate toggle. Both directions regenerate the destination from
/// the cached city seeds rather than persisting previous state.
fn handle_city_gate(
    game_state: &mut GameState,
    services: &mut Services,
    hit: CoordInt3,
    facing: VoxelFacing,
    active_map_type: MapType,
) -> Result<(), MapStackError> {
    let (city_gen, sky_gen) = game_state
        .city_gen_cache()
        .expect("city gate outside any city context")
        .clone();

    match active_map_type {
        MapType::City => {
            // Anchor the player in the wilderness relative to where the
            // city sits in it: the city-origin chunk plus the gate's chunk,
            // with the gate voxel biased out of the approached face.
            let transition_dir = facing.direction();
            let start = CoordInt3::new(
                ChunkInt2::new(WILD_CITY_ORIGIN_CHUNK_X, WILD_CITY_ORIGIN_CHUNK_Z) + hit.chunk,
                hit.voxel,
            )
            .offset(transition_dir.voxel_offset());

            let wild_gen = WildGenInfo::for_city(&city_gen);
            game_state.try_set_wilderness(&wild_gen, &sky_gen, start, services)?;

            let night = game_state.clock().night_lights_active();
            services.audio.set_music(MusicKind::Exterior { night });
        }
        MapType::Wilderness => {
            game_state.try_set_city(&city_gen, &sky_gen, services)?;

            let night = game_state.clock().night_lights_active();
            services.audio.set_music(MusicKind::Exterior { night });
            services.audio.set_music(MusicKind::CityJingle);
        }
        MapType::Interior => {
            debug_assert!(false, "city gates cannot trigger from interiors");
        }
    }

    Ok(())
}

/// Handles the player entering a level-change voxel within an interior.
/// Climbing out of the first level (or descending past the last) leaves
/// the map for the world map unless the one-shot override is armed.
pub fn handle_level_transition(
    game_state: &mut GameState,
    services: &mut Services,
    player_coord: CoordInt3,
    transition_coord: CoordInt3,
) -> LevelTransitionOutcome {
    // Level transitions are always between interior levels.
    debug_assert_eq!(game_state.active_map_def().map_type(), MapType::Interior);

    let (transition, active_index, level_count) = {
        let inst = game_state.active_map_inst();
        let manager = inst.active_level().voxel_chunk_manager();
        let chunk = manager
            .try_get_chunk(transition_coord.chunk)
            .expect("transition voxel in a chunk that is not active");

        let voxel = transition_coord.voxel;
        if !chunk.is_valid_voxel(voxel.x, voxel.y, voxel.z) {
            return LevelTransitionOutcome::None;
        }

        // Only wall voxels can carry level transitions.
        let voxel_def = chunk.voxel_def(chunk.voxel(voxel.x, voxel.y, voxel.z));
        if !voxel_def.is_wall() {
            return LevelTransitionOutcome::None;
        }

        let Some(transition) = chunk.try_get_transition(voxel) else {
            return LevelTransitionOutcome::None;
        };

        (
            transition.clone(),
            inst.active_level_index(),
            inst.level_count(),
        )
    };

    let TransitionDefinition::LevelChange { direction } = transition else {
        return LevelTransitionOutcome::None;
    };

    // Direction from the stairs voxel to the player's destination: the
    // reverse of the way they walked in.
    let diff_x = (transition_coord.chunk.x - player_coord.chunk.x) * CHUNK_DIM
        + (transition_coord.voxel.x - player_coord.voxel.x);
    let diff_z = (transition_coord.chunk.y - player_coord.chunk.y) * CHUNK_DIM
        + (transition_coord.voxel.z - player_coord.voxel.z);
    let dir_to_new_voxel = if diff_x > 0 {
        DVec3::new(-1.0, 0.0, 0.0)
    } else if diff_x < 0 {
        DVec3::new(1.0, 0.0, 0.0)
    } else if diff_z > 0 {
        DVec3::new(0.0, 0.0, -1.0)
    } else if diff_z < 0 {
        DVec3::new(0.0, 0.0, 1.0)
    } else {
        warn!("player is standing inside the transition voxel");
        return LevelTransitionOutcome::None;
    };

    let destination = CoordDouble3::new(
        transition_coord.chunk,
        voxel_center(transition_coord.voxel) + dir_to_new_voxel,
    )
    .normalized();

    match direction {
        LevelChangeDirection::Up => {
            if let Some(hook) = game_state.take_level_up_override() {
                // Armed override (e.g. the main-quest start dungeon) runs
                // once and disarms.
                hook(game_state);
                LevelTransitionOutcome::HandledByOverride
            } else if active_index > 0 {
                switch_to_level(
                    game_state,
                    services,
                    active_index - 1,
                    destination,
                    dir_to_new_voxel,
                );
                LevelTransitionOutcome::ChangedLevel(active_index - 1)
            } else {
                recenter_for_world_map(game_state, player_coord);
                LevelTransitionOutcome::ExitToWorldMap
            }
        }
        LevelChangeDirection::Down => {
            if active_index + 1 < level_count {
                switch_to_level(
                    game_state,
                    services,
                    active_index + 1,
                    destination,
                    dir_to_new_voxel,
                );
                LevelTransitionOutcome::ChangedLevel(active_index + 1)
            } else {
                recenter_for_world_map(game_state, player_coord);
                LevelTransitionOutcome::ExitToWorldMap
            }
        }
    }
}

/// Switches the interior's active level, moves the player to the far side
/// of the stairs, and primes the new level's chunks for one tick at zero
/// elapsed time so the renderer never receives stale chunk state.
fn switch_to_level(
    game_state: &mut GameState,
    services: &mut Services,
    level_index: usize,
    destination: CoordDouble3,
    dir_to_new_voxel: VoxelDouble3,
) {
    {
        let (map_def, map_inst) = game_state.active_map_split_mut();
        map_inst.set_active_level_index(level_index, map_def);
        map_inst.active_level_mut().set_active(services.renderer);
    }

    let ceiling_scale = game_state
        .active_map_inst()
        .active_level()
        .ceiling_scale();
    let player_destination = CoordDouble3::new(
        destination.chunk,
        DVec3::new(
            destination.point.x,
            ceiling_scale + Player::HEIGHT,
            destination.point.z,
        ),
    );

    let player = game_state.player_mut();
    player.teleport(player_destination);
    player.look_at_direction(dir_to_new_voxel);
    player.set_velocity_to_zero();

    game_state.prime_active(services);
}

/// Centers the player on their previous voxel before the world map opens,
/// in case they change their mind about traveling. Facing is unchanged.
fn recenter_for_world_map(game_state: &mut GameState, player_coord: CoordInt3) {
    let y = game_state.player().position().point.y;
    let center = voxel_center_xz(IVec2::new(player_coord.voxel.x, player_coord.voxel.z));
    game_state.player_mut().teleport(CoordDouble3::new(
        player_coord.chunk,
        DVec3::new(center.x, y, center.y),
    ));
    game_state.player_mut().set_velocity_to_zero();
}

/// Fires the trigger at the player's voxel, if any: plays its sound and
/// returns its lore text unless the text is display-once and has already
/// been shown. Firing is recorded as a sticky voxel instance.
pub fn handle_triggers(
    game_state: &mut GameState,
    audio: &mut dyn AudioPlayer,
    coord: CoordInt3,
) -> Option<String> {
    let (sound, text) = {
        let inst = game_state.active_map_inst();
        let manager = inst.active_level().voxel_chunk_manager();
        let chunk = manager
            .try_get_chunk(coord.chunk)
            .expect("trigger voxel in a chunk that is not active");
        let trigger = chunk.try_get_trigger(coord.voxel)?;
        (trigger.sound, trigger.text.clone())
    };

    if let Some(sound) = sound {
        audio.play_sound(sound);
    }

    let text_def = text?;

    let manager = game_state
        .active_map_inst_mut()
        .active_level_mut()
        .voxel_chunk_manager_mut();
    let chunk = manager
        .try_get_chunk_mut(coord.chunk)
        .expect("trigger voxel in a chunk that is not active");

    let already_displayed = chunk
        .try_get_voxel_inst(coord.voxel, VoxelInstanceType::Trigger)
        .map(|inst| matches!(inst.kind, VoxelInstanceKind::Trigger { triggered: true }))
        .unwrap_or(false);
    let can_display = !text_def.display_once || !already_displayed;

    // Record the firing regardless, for consistency across trigger kinds.
    if chunk
        .try_get_voxel_inst(coord.voxel, VoxelInstanceType::Trigger)
        .is_none()
    {
        chunk.add_voxel_inst(VoxelInstance::trigger(coord.voxel, true));
    }

    can_display.then_some(text_def.text)
}
