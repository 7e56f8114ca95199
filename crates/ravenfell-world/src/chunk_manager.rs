//! Handles the lifetimes of voxel chunks: allocation and full population of
//! newly-active positions, release of freed ones, and the context-sensitive
//! chunk-edge state (chasm faces, door visibility) that depends on up to
//! four cardinal neighbor chunks.

use std::collections::HashMap;

use log::debug;
use ravenfell_core::constants::{CHUNK_DIM, EXTERIOR_CHUNK_HEIGHT};
use ravenfell_core::coord::{ChunkInt2, CoordDouble3, CoordInt3, VoxelInt3};
use ravenfell_core::direction::CARDINAL_DIRECTIONS;
use ravenfell_core::services::AudioPlayer;

use crate::chunk::{Chunk, VoxelId};
use crate::map::{LevelDefinition, LevelInfoDefinition, MapDefinition, MapType};
use crate::voxel::VoxelDefinition;
use crate::voxel_instance::{
    ChasmWallFaces, DoorPhase, VoxelInstance, VoxelInstanceKind, VoxelInstanceType,
};

// Wilderness block tiles are one chunk in footprint.
const _: () = assert!(CHUNK_DIM as usize == ravenfell_assets::tile::TILE_DIM);

/// Tracks which chunks are active around the player and keeps their voxel
/// state consistent as the set changes. Positions to create and free are
/// decided externally from the chunk distance configuration.
#[derive(Default)]
pub struct VoxelChunkManager {
    chunks: HashMap<ChunkInt2, Chunk>,
    /// Cleared chunks kept for allocation reuse.
    chunk_pool: Vec<Chunk>,
}

impl VoxelChunkManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn try_get_chunk(&self, position: ChunkInt2) -> Option<&Chunk> {
        self.chunks.get(&position)
    }

    pub fn try_get_chunk_mut(&mut self, position: ChunkInt2) -> Option<&mut Chunk> {
        self.chunks.get_mut(&position)
    }

    pub fn positions(&self) -> impl Iterator<Item = ChunkInt2> + '_ {
        self.chunks.keys().copied()
    }

    /// Definition of the voxel at an absolute coordinate, or None when the
    /// chunk is not loaded or the Y is out of the chunk's height.
    pub fn try_get_voxel_def(&self, coord: CoordInt3) -> Option<&VoxelDefinition> {
        let chunk = self.chunks.get(&coord.chunk)?;
        if !chunk.is_valid_voxel(coord.voxel.x, coord.voxel.y, coord.voxel.z) {
            return None;
        }
        Some(chunk.voxel_def(chunk.voxel(coord.voxel.x, coord.voxel.y, coord.voxel.z)))
    }

    /// Applies this frame's chunk delta, re-resolves context-sensitive edge
    /// state, and advances every active chunk's voxel instances.
    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &mut self,
        dt: f64,
        new_chunk_positions: &[ChunkInt2],
        freed_chunk_positions: &[ChunkInt2],
        player: CoordDouble3,
        active_level_index: Option<usize>,
        map_def: &MapDefinition,
        ceiling_scale: f64,
        audio: &mut dyn AudioPlayer,
    ) {
        for &pos in freed_chunk_positions {
            self.recycle_chunk(pos);
        }

        for &pos in new_chunk_positions {
            debug_assert!(!self.chunks.contains_key(&pos));
            self.populate_chunk(pos, active_level_index, map_def);
        }

        if !new_chunk_positions.is_empty() || !freed_chunk_positions.is_empty() {
            debug!(
                "chunk delta: +{} -{} ({} active)",
                new_chunk_positions.len(),
                freed_chunk_positions.len(),
                self.chunks.len()
            );

            // A chunk populated early in the batch may have computed its edge
            // state before a neighbor populated later existed, so perimeter
            // state is re-resolved for every touched chunk and its neighbors
            // after the whole batch.
            let mut touched: Vec<ChunkInt2> = Vec::new();
            for &pos in new_chunk_positions.iter().chain(freed_chunk_positions) {
                for dir in CARDINAL_DIRECTIONS {
                    touched.push(pos + dir.offset());
                }
                touched.push(pos);
            }
            touched.sort_unstable_by_key(|p| (p.x, p.y));
            touched.dedup();

            for pos in touched {
                if self.chunks.contains_key(&pos) {
                    self.update_chunk_perimeter_chasm_insts(pos);
                    self.update_chunk_door_visibility_insts(pos);
                }
            }
        }

        // Advance voxel instances, then run the deferred context-sensitive
        // consequences of instances that finished (e.g. chasm faces around a
        // voxel that faded to air, possibly in adjacent chunks).
        let positions: Vec<ChunkInt2> = self.chunks.keys().copied().collect();
        let mut fixups: Vec<CoordInt3> = Vec::new();
        for pos in positions {
            let chunk = self.chunks.get_mut(&pos).expect("chunk exists");
            chunk.update(dt, player, ceiling_scale, audio);
            fixups.extend(
                chunk
                    .take_pending_chasm_fixups()
                    .into_iter()
                    .map(|voxel| CoordInt3::new(pos, voxel)),
            );
        }

        for coord in fixups {
            self.refresh_chasm_inst(coord);
            for dir in CARDINAL_DIRECTIONS {
                self.refresh_chasm_inst(coord.offset(dir.voxel_offset()));
            }
            if self.chunks.contains_key(&coord.chunk) {
                self.update_chunk_door_visibility_insts(coord.chunk);
            }
        }
    }

    /// Run at the end of a frame after all systems have consumed per-frame
    /// dirty flags. Clearing twice is harmless.
    pub fn clean_up(&mut self) {
        for chunk in self.chunks.values_mut() {
            chunk.clear_dirty_voxels();
        }
    }

    /// Opens the door at the given coordinate, or swings a closing door back
    /// open. Returns false when there is no door there.
    pub fn try_open_door(
        &mut self,
        coord: CoordInt3,
        ceiling_scale: f64,
        audio: &mut dyn AudioPlayer,
    ) -> bool {
        let Some(chunk) = self.chunks.get_mut(&coord.chunk) else {
            return false;
        };
        let Some(door) = chunk.try_get_door(coord.voxel) else {
            return false;
        };
        let open_speed = door.open_speed;
        let open_sound = door.open_sound;

        if let Some(inst) = chunk.try_get_voxel_inst_mut(coord.voxel, VoxelInstanceType::OpenDoor) {
            if let VoxelInstanceKind::OpenDoor(anim) = &mut inst.kind {
                if anim.phase() == DoorPhase::Closing {
                    anim.reopen();
                }
            }
            return true;
        }

        chunk.add_voxel_inst(VoxelInstance::open_door(coord.voxel, open_speed));
        let center = CoordDouble3::new(
            coord.chunk,
            glam::DVec3::new(
                coord.voxel.x as f64 + 0.50,
                (coord.voxel.y as f64 + 0.50) * ceiling_scale,
                coord.voxel.z as f64 + 0.50,
            ),
        );
        audio.play_sound_at(open_sound, center);
        true
    }

    fn recycle_chunk(&mut self, position: ChunkInt2) {
        if let Some(mut chunk) = self.chunks.remove(&position) {
            chunk.clear();
            self.chunk_pool.push(chunk);
        }
    }

    /// Fills a chunk with the data required by its position and the map
    /// type: voxel definitions first, then the voxel grid, then decorators,
    /// then context-sensitive instances, in that order. Any failure here
    /// means malformed static data and is fatal.
    fn populate_chunk(
        &mut self,
        position: ChunkInt2,
        active_level_index: Option<usize>,
        map_def: &MapDefinition,
    ) {
        let mut chunk = match self.chunk_pool.pop() {
            Some(mut recycled) => {
                recycled.init(position, chunk_height(map_def, active_level_index));
                recycled
            }
            None => Chunk::new(position, chunk_height(map_def, active_level_index)),
        };

        match map_def.map_type() {
            MapType::Interior | MapType::City => {
                let level_index = active_level_index
                    .expect("interior/city chunk population requires an active level index");
                let level = map_def.level(level_index);
                let level_info = map_def.level_info_for_level(level_index);

                let def_map = populate_chunk_voxel_defs(&mut chunk, level_info);
                populate_chunk_voxels(
                    &mut chunk,
                    level,
                    level_info,
                    &def_map,
                    map_def.map_type() == MapType::City,
                );
                populate_chunk_decorators(&mut chunk, level, level_info);
            }
            MapType::Wilderness => {
                let wild = map_def.wild().expect("wilderness map requires wild data");
                let level_info = map_def.level_info_for_level(0);

                let def_map = populate_chunk_voxel_defs(&mut chunk, level_info);
                let block_id = wild.block_id(position);
                let tile = wild
                    .block_tile(block_id)
                    .unwrap_or_else(|e| panic!("malformed wilderness block {block_id}: {e}"));
                populate_chunk_voxels_from_tile(&mut chunk, &tile, &def_map);
                populate_wild_chunk_decorators(&mut chunk, wild);
            }
        }

        self.chunks.insert(position, chunk);

        // Context-sensitive instances go last: they need the grid populated,
        // and they consult whichever neighbor chunks exist so far.
        self.populate_chunk_chasm_insts(position);
        self.update_chunk_door_visibility_insts(position);
    }

    /// Chasm wall faces for a voxel, from the four cardinal neighbors. A
    /// missing neighbor chunk counts as not continuing the chasm, so the
    /// face stays visible until the neighbor streams in.
    fn compute_chasm_faces(&self, coord: CoordInt3) -> ChasmWallFaces {
        let mut faces = ChasmWallFaces::default();
        for dir in CARDINAL_DIRECTIONS {
            let neighbor = coord.offset(dir.voxel_offset());
            let hides = self
                .try_get_voxel_def(neighbor)
                .map(|def| def.hides_adjacent_chasm_face())
                .unwrap_or(false);
            faces.set(dir, !hides);
        }
        faces
    }

    fn populate_chunk_chasm_insts(&mut self, position: ChunkInt2) {
        let chunk = self.chunks.get(&position).expect("chunk exists");
        let chasms: Vec<VoxelInt3> = chunk.chasm_voxels().to_vec();

        let mut updates = Vec::new();
        for voxel in chasms {
            let faces = self.compute_chasm_faces(CoordInt3::new(position, voxel));
            if faces.any() {
                updates.push((voxel, faces));
            }
        }

        let chunk = self.chunks.get_mut(&position).expect("chunk exists");
        for (voxel, faces) in updates {
            chunk.add_voxel_inst(VoxelInstance::chasm_wall(voxel, faces));
        }
    }

    /// Recomputes the chasm wall instance at a coordinate, adding or
    /// removing it as the surroundings dictate. Idempotent.
    fn refresh_chasm_inst(&mut self, coord: CoordInt3) {
        let is_chasm = self
            .try_get_voxel_def(coord)
            .map(VoxelDefinition::is_chasm)
            .unwrap_or(false);
        if !is_chasm {
            if let Some(chunk) = self.chunks.get_mut(&coord.chunk) {
                chunk.remove_voxel_inst(coord.voxel, VoxelInstanceType::ChasmWall);
            }
            return;
        }

        let faces = self.compute_chasm_faces(coord);
        let chunk = self.chunks.get_mut(&coord.chunk).expect("chunk exists");
        if !faces.any() {
            chunk.remove_voxel_inst(coord.voxel, VoxelInstanceType::ChasmWall);
        } else if let Some(inst) =
            chunk.try_get_voxel_inst_mut(coord.voxel, VoxelInstanceType::ChasmWall)
        {
            inst.kind = VoxelInstanceKind::ChasmWall(faces);
        } else {
            chunk.add_voxel_inst(VoxelInstance::chasm_wall(coord.voxel, faces));
        }
    }

    /// Re-resolves chasm faces for chasm voxels on the chunk's perimeter,
    /// which may be affected by adjacent chunks appearing or disappearing.
    fn update_chunk_perimeter_chasm_insts(&mut self, position: ChunkInt2) {
        let chunk = self.chunks.get(&position).expect("chunk exists");
        let perimeter: Vec<VoxelInt3> = chunk
            .chasm_voxels()
            .iter()
            .copied()
            .filter(|v| {
                v.x == 0 || v.x == Chunk::WIDTH - 1 || v.z == 0 || v.z == Chunk::DEPTH - 1
            })
            .collect();

        for voxel in perimeter {
            self.refresh_chasm_inst(CoordInt3::new(position, voxel));
        }
    }

    /// Recomputes which faces each door in the chunk should render, from
    /// the adjacent voxels (including ones in neighbor chunks).
    fn update_chunk_door_visibility_insts(&mut self, position: ChunkInt2) {
        let chunk = self.chunks.get(&position).expect("chunk exists");
        let doors: Vec<VoxelInt3> = chunk.door_positions().collect();

        let mut updates = Vec::new();
        for voxel in doors {
            let mut faces = ChasmWallFaces::default();
            for dir in CARDINAL_DIRECTIONS {
                let neighbor = CoordInt3::new(position, voxel).offset(dir.voxel_offset());
                let visible = self
                    .try_get_voxel_def(neighbor)
                    .map(VoxelDefinition::is_air)
                    .unwrap_or(true);
                faces.set(dir, visible);
            }
            updates.push((voxel, faces));
        }

        let chunk = self.chunks.get_mut(&position).expect("chunk exists");
        for (voxel, faces) in updates {
            match chunk.try_get_voxel_inst_mut(voxel, VoxelInstanceType::DoorVisibility) {
                Some(inst) => inst.kind = VoxelInstanceKind::DoorVisibility(faces),
                None => chunk.add_voxel_inst(VoxelInstance::door_visibility(voxel, faces)),
            }
        }
    }
}

fn chunk_height(map_def: &MapDefinition, active_level_index: Option<usize>) -> i32 {
    match map_def.map_type() {
        MapType::Interior | MapType::City => {
            let level_index = active_level_index
                .expect("interior/city chunk population requires an active level index");
            map_def.level(level_index).height()
        }
        MapType::Wilderness => EXTERIOR_CHUNK_HEIGHT,
    }
}

/// Registers the level info's voxel definitions with the chunk, returning
/// the level-def-ID to chunk-voxel-ID mapping. The level info is the
/// deduplication point; a palette too dense for the chunk's 256 slots is
/// malformed static data.
fn populate_chunk_voxel_defs(chunk: &mut Chunk, level_info: &LevelInfoDefinition) -> Vec<VoxelId> {
    let defs = level_info.voxel_defs();
    let mut def_map = Vec::with_capacity(defs.len());
    def_map.push(Chunk::AIR_VOXEL_ID);

    for def in &defs[1..] {
        let id = chunk
            .try_add_voxel_def(*def)
            .expect("level palette exceeds chunk voxel definition capacity");
        def_map.push(id);
    }

    def_map
}

/// Copies the part of the level grid that overlaps this chunk. City ground
/// extends past the level footprint using the level info's first floor
/// definition so the area around the walls is walkable.
fn populate_chunk_voxels(
    chunk: &mut Chunk,
    level: &LevelDefinition,
    level_info: &LevelInfoDefinition,
    def_map: &[VoxelId],
    fill_ground: bool,
) {
    let origin_x = chunk.position().x * CHUNK_DIM;
    let origin_z = chunk.position().y * CHUNK_DIM;

    let filler = fill_ground
        .then(|| {
            level_info
                .voxel_defs()
                .iter()
                .position(|def| matches!(def, VoxelDefinition::Floor { .. }))
                .map(|index| def_map[index])
        })
        .flatten();

    for z in 0..Chunk::DEPTH {
        for x in 0..Chunk::WIDTH {
            let level_x = origin_x + x;
            let level_z = origin_z + z;
            let in_footprint = level.contains(level_x, 0, level_z);

            for y in 0..chunk.height() {
                let id = if in_footprint && level.contains(level_x, y, level_z) {
                    def_map[level.voxel(level_x, y, level_z) as usize]
                } else if !in_footprint && y == 0 {
                    filler.unwrap_or(Chunk::AIR_VOXEL_ID)
                } else {
                    Chunk::AIR_VOXEL_ID
                };

                if id != Chunk::AIR_VOXEL_ID {
                    chunk.set_voxel(x, y, z, id);
                }
            }
        }
    }
}

/// Builds a wilderness chunk's voxels from its block tile: floor words at
/// ground level, wall words above, ceiling words above that. Words index
/// the wilderness level info's voxel definitions.
fn populate_chunk_voxels_from_tile(
    chunk: &mut Chunk,
    tile: &ravenfell_assets::tile::MapTileLayers,
    def_map: &[VoxelId],
) {
    for z in 0..Chunk::DEPTH {
        for x in 0..Chunk::WIDTH {
            let layers = [
                (0, tile.floor.get(x as usize, z as usize)),
                (1, tile.wall.get(x as usize, z as usize)),
                (2, tile.ceiling.get(x as usize, z as usize)),
            ];
            for (y, word) in layers {
                assert!(
                    (word as usize) < def_map.len(),
                    "tile word {word} outside wilderness palette"
                );
                let id = def_map[word as usize];
                if id != Chunk::AIR_VOXEL_ID {
                    chunk.set_voxel(x, y, z, id);
                }
            }
        }
    }
}

/// Registers the decorator definitions placed within this chunk. Each
/// referenced definition is added to the chunk once, then every position
/// inside the footprint maps to the chunk-local ID.
fn populate_chunk_decorators(
    chunk: &mut Chunk,
    level: &LevelDefinition,
    level_info: &LevelInfoDefinition,
) {
    let origin = VoxelInt3::new(
        chunk.position().x * CHUNK_DIM,
        0,
        chunk.position().y * CHUNK_DIM,
    );
    let in_chunk = |voxel: VoxelInt3| {
        let local = voxel - origin;
        local.x >= 0 && local.x < Chunk::WIDTH && local.z >= 0 && local.z < Chunk::DEPTH
    };

    let mut transition_ids = HashMap::new();
    for placement in level.transition_placements() {
        for &voxel in placement.positions.iter().filter(|&&v| in_chunk(v)) {
            let id = *transition_ids.entry(placement.def_index).or_insert_with(|| {
                chunk.add_transition(level_info.transition_def(placement.def_index).clone())
            });
            chunk.add_transition_position(id, voxel - origin);
        }
    }

    let mut trigger_ids = HashMap::new();
    for placement in level.trigger_placements() {
        for &voxel in placement.positions.iter().filter(|&&v| in_chunk(v)) {
            let id = *trigger_ids.entry(placement.def_index).or_insert_with(|| {
                chunk.add_trigger(level_info.trigger_def(placement.def_index).clone())
            });
            chunk.add_trigger_position(id, voxel - origin);
        }
    }

    let mut lock_ids = HashMap::new();
    for placement in level.lock_placements() {
        for &voxel in placement.positions.iter().filter(|&&v| in_chunk(v)) {
            let id = *lock_ids
                .entry(placement.def_index)
                .or_insert_with(|| chunk.add_lock(*level_info.lock_def(placement.def_index)));
            chunk.add_lock_position(id, voxel - origin);
        }
    }

    let mut name_ids = HashMap::new();
    for placement in level.building_name_placements() {
        for &voxel in placement.positions.iter().filter(|&&v| in_chunk(v)) {
            let id = *name_ids.entry(placement.def_index).or_insert_with(|| {
                chunk.add_building_name(level_info.building_name(placement.def_index).to_string())
            });
            chunk.add_building_name_position(id, voxel - origin);
        }
    }

    let mut door_ids = HashMap::new();
    for placement in level.door_placements() {
        for &voxel in placement.positions.iter().filter(|&&v| in_chunk(v)) {
            let id = *door_ids
                .entry(placement.def_index)
                .or_insert_with(|| chunk.add_door_def(*level_info.door_def(placement.def_index)));
            chunk.add_door_position(id, voxel - origin);
        }
    }
}

/// Wilderness decorators: the city wall gates that lead back into the city.
fn populate_wild_chunk_decorators(chunk: &mut Chunk, wild: &crate::map::WildMapData) {
    let position = chunk.position();
    let gates: Vec<CoordInt3> = wild.city_gates_in_chunk(position).collect();
    if gates.is_empty() {
        return;
    }

    let id = chunk.add_transition(crate::decorator::TransitionDefinition::CityGate);
    for gate in gates {
        chunk.add_transition_position(id, gate.voxel);
    }
}
