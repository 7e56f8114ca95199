//! Static, read-only map blueprints. A MapDefinition describes a map's
//! levels, skies, and start level; the live counterpart is MapInstance.
//! The simulation core consumes these and never mutates them.

use ravenfell_assets::cache::CompressedPayload;
use ravenfell_assets::tile::MapTileLayers;
use ravenfell_assets::AssetError;
use ravenfell_core::constants::WILD_DIM;
use ravenfell_core::coord::{ChunkInt2, CoordInt3, VoxelDouble2, VoxelDouble3, VoxelInt3};

use crate::decorator::{DoorDefinition, LockDefinition, TransitionDefinition, TriggerDefinition};
use crate::entity::EntityDefinition;
use crate::error::GenError;
use crate::voxel::VoxelDefinition;

/// The three kinds of map the engine can load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapType {
    Interior,
    City,
    Wilderness,
}

/// Index into a level info's voxel definition list. 0 is always air.
pub type LevelVoxelDefId = u16;

/// One decorator or entity definition placed at several level-space voxels.
#[derive(Debug, Clone)]
pub struct LevelPlacement {
    pub def_index: usize,
    pub positions: Vec<VoxelInt3>,
}

/// Voxel blueprint for one map level. Positions are level-space; chunks are
/// carved out of this grid during population.
#[derive(Debug, Clone)]
pub struct LevelDefinition {
    width: i32,
    height: i32,
    depth: i32,
    voxels: Vec<LevelVoxelDefId>,
    transition_placements: Vec<LevelPlacement>,
    trigger_placements: Vec<LevelPlacement>,
    lock_placements: Vec<LevelPlacement>,
    building_name_placements: Vec<LevelPlacement>,
    door_placements: Vec<LevelPlacement>,
    entity_placements: Vec<LevelPlacement>,
}

impl LevelDefinition {
    pub fn new(width: i32, height: i32, depth: i32) -> Result<Self, GenError> {
        if width <= 0 || height <= 0 || depth <= 0 {
            return Err(GenError::ZeroLevelDims);
        }
        Ok(Self {
            width,
            height,
            depth,
            voxels: vec![0; (width * height * depth) as usize],
            transition_placements: Vec::new(),
            trigger_placements: Vec::new(),
            lock_placements: Vec::new(),
            building_name_placements: Vec::new(),
            door_placements: Vec::new(),
            entity_placements: Vec::new(),
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn depth(&self) -> i32 {
        self.depth
    }

    pub fn contains(&self, x: i32, y: i32, z: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height && z >= 0 && z < self.depth
    }

    fn grid_index(&self, x: i32, y: i32, z: i32) -> usize {
        debug_assert!(self.contains(x, y, z));
        (x + (z * self.width) + (y * self.width * self.depth)) as usize
    }

    pub fn voxel(&self, x: i32, y: i32, z: i32) -> LevelVoxelDefId {
        self.voxels[self.grid_index(x, y, z)]
    }

    pub fn set_voxel(&mut self, x: i32, y: i32, z: i32, id: LevelVoxelDefId) {
        let index = self.grid_index(x, y, z);
        self.voxels[index] = id;
    }

    pub fn add_transition_placement(&mut self, placement: LevelPlacement) {
        self.transition_placements.push(placement);
    }

    pub fn add_trigger_placement(&mut self, placement: LevelPlacement) {
        self.trigger_placements.push(placement);
    }

    pub fn add_lock_placement(&mut self, placement: LevelPlacement) {
        self.lock_placements.push(placement);
    }

    pub fn add_building_name_placement(&mut self, placement: LevelPlacement) {
        self.building_name_placements.push(placement);
    }

    pub fn add_door_placement(&mut self, placement: LevelPlacement) {
        self.door_placements.push(placement);
    }

    pub fn add_entity_placement(&mut self, placement: LevelPlacement) {
        self.entity_placements.push(placement);
    }

    pub fn transition_placements(&self) -> &[LevelPlacement] {
        &self.transition_placements
    }

    pub fn trigger_placements(&self) -> &[LevelPlacement] {
        &self.trigger_placements
    }

    pub fn lock_placements(&self) -> &[LevelPlacement] {
        &self.lock_placements
    }

    pub fn building_name_placements(&self) -> &[LevelPlacement] {
        &self.building_name_placements
    }

    pub fn door_placements(&self) -> &[LevelPlacement] {
        &self.door_placements
    }

    pub fn entity_placements(&self) -> &[LevelPlacement] {
        &self.entity_placements
    }
}

/// Shared static data for one or more levels: the voxel definition palette
/// the level's IDs index, the decorator definitions its placements index,
/// and the ceiling scale.
#[derive(Debug, Clone)]
pub struct LevelInfoDefinition {
    ceiling_scale: f64,
    voxel_defs: Vec<VoxelDefinition>,
    transition_defs: Vec<TransitionDefinition>,
    trigger_defs: Vec<TriggerDefinition>,
    lock_defs: Vec<LockDefinition>,
    building_names: Vec<String>,
    door_defs: Vec<DoorDefinition>,
    entity_defs: Vec<EntityDefinition>,
}

impl LevelInfoDefinition {
    pub fn new(ceiling_scale: f64) -> Self {
        Self {
            ceiling_scale,
            // ID 0 is the air voxel.
            voxel_defs: vec![VoxelDefinition::Air],
            transition_defs: Vec::new(),
            trigger_defs: Vec::new(),
            lock_defs: Vec::new(),
            building_names: Vec::new(),
            door_defs: Vec::new(),
            entity_defs: Vec::new(),
        }
    }

    pub fn ceiling_scale(&self) -> f64 {
        self.ceiling_scale
    }

    pub fn add_voxel_def(&mut self, def: VoxelDefinition) -> LevelVoxelDefId {
        self.voxel_defs.push(def);
        (self.voxel_defs.len() - 1) as LevelVoxelDefId
    }

    pub fn voxel_def(&self, id: LevelVoxelDefId) -> &VoxelDefinition {
        &self.voxel_defs[id as usize]
    }

    pub fn voxel_defs(&self) -> &[VoxelDefinition] {
        &self.voxel_defs
    }

    pub fn add_transition_def(&mut self, def: TransitionDefinition) -> usize {
        self.transition_defs.push(def);
        self.transition_defs.len() - 1
    }

    pub fn transition_def(&self, index: usize) -> &TransitionDefinition {
        &self.transition_defs[index]
    }

    pub fn add_trigger_def(&mut self, def: TriggerDefinition) -> usize {
        self.trigger_defs.push(def);
        self.trigger_defs.len() - 1
    }

    pub fn trigger_def(&self, index: usize) -> &TriggerDefinition {
        &self.trigger_defs[index]
    }

    pub fn add_lock_def(&mut self, def: LockDefinition) -> usize {
        self.lock_defs.push(def);
        self.lock_defs.len() - 1
    }

    pub fn lock_def(&self, index: usize) -> &LockDefinition {
        &self.lock_defs[index]
    }

    pub fn add_building_name(&mut self, name: String) -> usize {
        self.building_names.push(name);
        self.building_names.len() - 1
    }

    pub fn building_name(&self, index: usize) -> &str {
        &self.building_names[index]
    }

    pub fn add_door_def(&mut self, def: DoorDefinition) -> usize {
        self.door_defs.push(def);
        self.door_defs.len() - 1
    }

    pub fn door_def(&self, index: usize) -> &DoorDefinition {
        &self.door_defs[index]
    }

    pub fn add_entity_def(&mut self, def: EntityDefinition) -> usize {
        self.entity_defs.push(def);
        self.entity_defs.len() - 1
    }

    pub fn entity_def(&self, index: usize) -> &EntityDefinition {
        &self.entity_defs[index]
    }

    pub fn entity_def_count(&self) -> usize {
        self.entity_defs.len()
    }
}

/// A sky object's static visuals: texture and animation parameters.
#[derive(Debug, Clone)]
pub struct SkyObjectDefinition {
    pub texture: String,
    pub anim_frame_count: u32,
    pub anim_seconds: f64,
}

/// Resolves a sky definition's object indices to visuals.
#[derive(Debug, Clone, Default)]
pub struct SkyInfoDefinition {
    objects: Vec<SkyObjectDefinition>,
}

impl SkyInfoDefinition {
    pub fn add_object(&mut self, def: SkyObjectDefinition) -> usize {
        self.objects.push(def);
        self.objects.len() - 1
    }

    pub fn object(&self, index: usize) -> &SkyObjectDefinition {
        &self.objects[index]
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }
}

/// One star: a fixed direction on the celestial sphere and a brightness.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyStarPlacement {
    pub direction: VoxelDouble3,
    pub brightness: u8,
}

/// Static sky contents for one sky: background plus placed objects.
#[derive(Debug, Clone)]
pub struct SkyDefinition {
    pub background_texture: String,
    pub sun_object_index: Option<usize>,
    pub moon_object_indices: Vec<usize>,
    pub lightning_object_indices: Vec<usize>,
    pub star_placements: Vec<SkyStarPlacement>,
}

impl SkyDefinition {
    /// Featureless sky used by interiors.
    pub fn interior(background_texture: String) -> Self {
        Self {
            background_texture,
            sun_object_index: None,
            moon_object_indices: Vec::new(),
            lightning_object_indices: Vec::new(),
            star_placements: Vec::new(),
        }
    }
}

/// Wilderness chunk-to-block mapping. Each chunk position selects one of a
/// small set of block tiles, which are held compressed until population
/// needs them.
#[derive(Debug, Clone)]
pub struct WildMapData {
    /// WILD_DIM x WILD_DIM block IDs, row-major by Z.
    block_ids: Vec<u8>,
    /// Raw tile payloads per unique block ID, LZ4-compressed.
    block_tiles: Vec<CompressedPayload>,
    /// Absolute positions of the city wall gates leading back into the city.
    city_gate_positions: Vec<CoordInt3>,
}

impl WildMapData {
    pub fn new(
        block_ids: Vec<u8>,
        block_tiles: Vec<CompressedPayload>,
        city_gate_positions: Vec<CoordInt3>,
    ) -> Self {
        debug_assert_eq!(block_ids.len(), (WILD_DIM * WILD_DIM) as usize);
        debug_assert!(block_ids
            .iter()
            .all(|&id| (id as usize) < block_tiles.len()));
        Self {
            block_ids,
            block_tiles,
            city_gate_positions,
        }
    }

    /// City-gate voxels inside the given chunk.
    pub fn city_gates_in_chunk(
        &self,
        chunk: ChunkInt2,
    ) -> impl Iterator<Item = CoordInt3> + '_ {
        self.city_gate_positions
            .iter()
            .copied()
            .filter(move |gate| gate.chunk == chunk)
    }

    /// Block ID for a chunk position. The wilderness tiles repeat outside
    /// the nominal WILD_DIM span so the player never runs off the map.
    pub fn block_id(&self, chunk: ChunkInt2) -> u8 {
        let x = chunk.x.rem_euclid(WILD_DIM);
        let z = chunk.y.rem_euclid(WILD_DIM);
        self.block_ids[(z * WILD_DIM + x) as usize]
    }

    /// Decompresses the tile layers for a block.
    pub fn block_tile(&self, block_id: u8) -> Result<MapTileLayers, AssetError> {
        let payload = self.block_tiles[block_id as usize].unpack()?;
        MapTileLayers::from_payload_bytes(&payload)
    }

    pub fn unique_block_count(&self) -> usize {
        self.block_tiles.len()
    }
}

/// Static, read-only blueprint for one loaded map.
#[derive(Debug, Clone)]
pub struct MapDefinition {
    map_type: MapType,
    levels: Vec<LevelDefinition>,
    level_infos: Vec<LevelInfoDefinition>,
    /// Level index -> level info index (interiors can share infos).
    level_info_indices: Vec<usize>,
    skies: Vec<SkyDefinition>,
    sky_infos: Vec<SkyInfoDefinition>,
    /// Sky index -> sky info index.
    sky_info_indices: Vec<usize>,
    /// Level index -> sky index (interiors can share a sky across levels).
    sky_indices_per_level: Vec<usize>,
    start_level_index: Option<usize>,
    /// Level-space start positions; the transition controller picks one.
    start_points: Vec<VoxelDouble2>,
    wild: Option<WildMapData>,
}

impl MapDefinition {
    pub fn interior(
        levels: Vec<LevelDefinition>,
        level_infos: Vec<LevelInfoDefinition>,
        level_info_indices: Vec<usize>,
        skies: Vec<SkyDefinition>,
        sky_infos: Vec<SkyInfoDefinition>,
        sky_info_indices: Vec<usize>,
        sky_indices_per_level: Vec<usize>,
        start_level_index: usize,
        start_points: Vec<VoxelDouble2>,
    ) -> Result<Self, GenError> {
        if levels.is_empty() {
            return Err(GenError::NoLevels);
        }
        if start_level_index >= levels.len() {
            return Err(GenError::StartLevelOutOfRange(
                start_level_index,
                levels.len(),
            ));
        }
        for (level, &info) in level_info_indices.iter().enumerate() {
            if info >= level_infos.len() {
                return Err(GenError::MissingLevelInfo { level, info });
            }
        }
        for (level, &sky) in sky_indices_per_level.iter().enumerate() {
            if sky >= skies.len() {
                return Err(GenError::MissingSky { level, sky });
            }
        }

        Ok(Self {
            map_type: MapType::Interior,
            levels,
            level_infos,
            level_info_indices,
            skies,
            sky_infos,
            sky_info_indices,
            sky_indices_per_level,
            start_level_index: Some(start_level_index),
            start_points,
            wild: None,
        })
    }

    pub fn city(
        level: LevelDefinition,
        level_info: LevelInfoDefinition,
        sky: SkyDefinition,
        sky_info: SkyInfoDefinition,
        start_points: Vec<VoxelDouble2>,
    ) -> Result<Self, GenError> {
        Ok(Self {
            map_type: MapType::City,
            levels: vec![level],
            level_infos: vec![level_info],
            level_info_indices: vec![0],
            skies: vec![sky],
            sky_infos: vec![sky_info],
            sky_info_indices: vec![0],
            sky_indices_per_level: vec![0],
            start_level_index: Some(0),
            start_points,
            wild: None,
        })
    }

    pub fn wilderness(
        wild: WildMapData,
        level_info: LevelInfoDefinition,
        sky: SkyDefinition,
        sky_info: SkyInfoDefinition,
    ) -> Result<Self, GenError> {
        Ok(Self {
            map_type: MapType::Wilderness,
            levels: Vec::new(),
            level_infos: vec![level_info],
            level_info_indices: vec![0],
            skies: vec![sky],
            sky_infos: vec![sky_info],
            sky_info_indices: vec![0],
            sky_indices_per_level: vec![0],
            start_level_index: None,
            start_points: Vec::new(),
            wild: Some(wild),
        })
    }

    pub fn map_type(&self) -> MapType {
        self.map_type
    }

    /// Number of level blueprints. Zero for the wilderness, whose chunks
    /// come from block tiles instead of a level grid.
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn level(&self, index: usize) -> &LevelDefinition {
        &self.levels[index]
    }

    /// Level info for a level index. The wilderness shares one level info
    /// across all blocks, addressed as level 0.
    pub fn level_info_for_level(&self, index: usize) -> &LevelInfoDefinition {
        &self.level_infos[self.level_info_indices[index]]
    }

    pub fn sky_count(&self) -> usize {
        self.skies.len()
    }

    pub fn sky(&self, index: usize) -> &SkyDefinition {
        &self.skies[index]
    }

    pub fn sky_info_for_sky(&self, index: usize) -> &SkyInfoDefinition {
        &self.sky_infos[self.sky_info_indices[index]]
    }

    pub fn sky_index_for_level(&self, level_index: usize) -> usize {
        self.sky_indices_per_level[level_index]
    }

    pub fn start_level_index(&self) -> Option<usize> {
        self.start_level_index
    }

    pub fn start_points(&self) -> &[VoxelDouble2] {
        &self.start_points
    }

    pub fn wild(&self) -> Option<&WildMapData> {
        self.wild.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;

    fn empty_sky() -> (SkyDefinition, SkyInfoDefinition) {
        (
            SkyDefinition::interior("PAL_INT".to_string()),
            SkyInfoDefinition::default(),
        )
    }

    #[test]
    fn test_interior_requires_levels() {
        let (sky, sky_info) = empty_sky();
        let result = MapDefinition::interior(
            Vec::new(),
            vec![LevelInfoDefinition::new(1.0)],
            Vec::new(),
            vec![sky],
            vec![sky_info],
            vec![0],
            Vec::new(),
            0,
            Vec::new(),
        );
        assert!(matches!(result, Err(GenError::NoLevels)));
    }

    #[test]
    fn test_interior_start_level_bounds() {
        let (sky, sky_info) = empty_sky();
        let levels = vec![LevelDefinition::new(8, 3, 8).expect("valid dims")];
        let result = MapDefinition::interior(
            levels,
            vec![LevelInfoDefinition::new(1.0)],
            vec![0],
            vec![sky],
            vec![sky_info],
            vec![0],
            vec![0],
            3,
            vec![DVec2::new(4.0, 4.0)],
        );
        assert!(matches!(result, Err(GenError::StartLevelOutOfRange(3, 1))));
    }

    #[test]
    fn test_level_definition_rejects_zero_dims() {
        assert!(matches!(
            LevelDefinition::new(0, 3, 8),
            Err(GenError::ZeroLevelDims)
        ));
    }

    #[test]
    fn test_level_voxel_round_trip() {
        let mut level = LevelDefinition::new(8, 3, 8).expect("valid dims");
        level.set_voxel(2, 1, 3, 7);
        assert_eq!(level.voxel(2, 1, 3), 7);
        assert_eq!(level.voxel(2, 0, 3), 0);
    }

    #[test]
    fn test_wild_block_lookup_wraps() {
        let block_ids = vec![0u8; (WILD_DIM * WILD_DIM) as usize];
        let mut ids = block_ids;
        ids[0] = 3;
        let tiles = vec![
            CompressedPayload::pack(&[0u8; 4]),
            CompressedPayload::pack(&[1u8; 4]),
            CompressedPayload::pack(&[2u8; 4]),
            CompressedPayload::pack(&[3u8; 4]),
        ];
        let wild = WildMapData::new(ids, tiles, Vec::new());
        assert_eq!(wild.block_id(ChunkInt2::new(0, 0)), 3);
        assert_eq!(wild.block_id(ChunkInt2::new(WILD_DIM, 0)), 3);
        assert_eq!(wild.block_id(ChunkInt2::new(-WILD_DIM, WILD_DIM)), 3);
    }
}
