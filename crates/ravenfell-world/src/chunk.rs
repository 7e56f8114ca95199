use std::collections::HashMap;

use glam::DVec3;
use ravenfell_core::constants::{CHUNK_DIM, DOOR_CLOSE_DISTANCE, MAX_VOXEL_DEFS};
use ravenfell_core::coord::{ChunkInt2, CoordDouble3, VoxelInt3};
use ravenfell_core::services::AudioPlayer;

use crate::decorator::{DoorDefinition, LockDefinition, TransitionDefinition, TriggerDefinition};
use crate::voxel::VoxelDefinition;
use crate::voxel_instance::{
    DoorPhase, VoxelInstance, VoxelInstanceKind, VoxelInstanceType,
};

/// Index into a chunk's voxel definition table. One byte; at most
/// MAX_VOXEL_DEFS distinct definitions per chunk.
pub type VoxelId = u8;

pub type TransitionId = u32;
pub type TriggerId = u32;
pub type LockId = u32;
pub type BuildingNameId = u32;
pub type DoorId = u32;

/// A fixed-footprint 3D voxel grid cell, the unit of streaming. Owns its
/// voxel IDs, the deduplicated definitions they index, sparse per-voxel
/// instances, and the decorator tables for this part of the world.
pub struct Chunk {
    position: ChunkInt2,
    height: i32,

    /// Dense grid, CHUNK_DIM * height * CHUNK_DIM entries.
    voxels: Vec<VoxelId>,

    /// Slot array indexed by VoxelId; `active_defs` marks slots in use.
    /// Slot 0 is the air voxel and is never removed.
    voxel_defs: [VoxelDefinition; MAX_VOXEL_DEFS],
    active_defs: [bool; MAX_VOXEL_DEFS],

    voxel_insts: Vec<VoxelInstance>,

    transition_defs: Vec<TransitionDefinition>,
    trigger_defs: Vec<TriggerDefinition>,
    lock_defs: Vec<LockDefinition>,
    building_names: Vec<String>,
    door_defs: Vec<DoorDefinition>,

    transition_ids: HashMap<VoxelInt3, TransitionId>,
    trigger_ids: HashMap<VoxelInt3, TriggerId>,
    lock_ids: HashMap<VoxelInt3, LockId>,
    building_name_ids: HashMap<VoxelInt3, BuildingNameId>,
    door_ids: HashMap<VoxelInt3, DoorId>,

    /// Chasm voxel positions, maintained by set_voxel for perimeter fixups.
    chasm_voxels: Vec<VoxelInt3>,

    /// Voxels changed this frame; consumed by rendering/audio, cleared by
    /// the chunk manager's end-of-frame clean-up.
    dirty_voxels: Vec<VoxelInt3>,

    /// Positions whose surroundings need context-sensitive re-resolution
    /// (possibly in adjacent chunks); drained by the chunk manager.
    pending_chasm_fixups: Vec<VoxelInt3>,
}

impl Chunk {
    pub const AIR_VOXEL_ID: VoxelId = 0;
    pub const WIDTH: i32 = CHUNK_DIM;
    pub const DEPTH: i32 = CHUNK_DIM;

    pub fn new(position: ChunkInt2, height: i32) -> Self {
        assert!(height > 0);
        let mut active_defs = [false; MAX_VOXEL_DEFS];
        active_defs[Self::AIR_VOXEL_ID as usize] = true;
        Self {
            position,
            height,
            voxels: vec![Self::AIR_VOXEL_ID; (CHUNK_DIM * height * CHUNK_DIM) as usize],
            voxel_defs: [VoxelDefinition::default(); MAX_VOXEL_DEFS],
            active_defs,
            voxel_insts: Vec::new(),
            transition_defs: Vec::new(),
            trigger_defs: Vec::new(),
            lock_defs: Vec::new(),
            building_names: Vec::new(),
            door_defs: Vec::new(),
            transition_ids: HashMap::new(),
            trigger_ids: HashMap::new(),
            lock_ids: HashMap::new(),
            building_name_ids: HashMap::new(),
            door_ids: HashMap::new(),
            chasm_voxels: Vec::new(),
            dirty_voxels: Vec::new(),
            pending_chasm_fixups: Vec::new(),
        }
    }

    /// Re-initializes a recycled chunk, reusing its allocations.
    pub fn init(&mut self, position: ChunkInt2, height: i32) {
        assert!(height > 0);
        self.clear();
        self.position = position;
        self.height = height;
        self.voxels
            .resize((CHUNK_DIM * height * CHUNK_DIM) as usize, Self::AIR_VOXEL_ID);
    }

    /// Clears all chunk state so the allocation can be reused.
    pub fn clear(&mut self) {
        self.voxels.clear();
        self.voxel_defs = [VoxelDefinition::default(); MAX_VOXEL_DEFS];
        self.active_defs = [false; MAX_VOXEL_DEFS];
        self.active_defs[Self::AIR_VOXEL_ID as usize] = true;
        self.voxel_insts.clear();
        self.transition_defs.clear();
        self.trigger_defs.clear();
        self.lock_defs.clear();
        self.building_names.clear();
        self.door_defs.clear();
        self.transition_ids.clear();
        self.trigger_ids.clear();
        self.lock_ids.clear();
        self.building_name_ids.clear();
        self.door_ids.clear();
        self.chasm_voxels.clear();
        self.dirty_voxels.clear();
        self.pending_chasm_fixups.clear();
    }

    pub fn position(&self) -> ChunkInt2 {
        self.position
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn is_valid_voxel(&self, x: i32, y: i32, z: i32) -> bool {
        x >= 0 && x < Self::WIDTH && y >= 0 && y < self.height && z >= 0 && z < Self::DEPTH
    }

    fn grid_index(&self, x: i32, y: i32, z: i32) -> usize {
        debug_assert!(self.is_valid_voxel(x, y, z));
        (x + (z * CHUNK_DIM) + (y * CHUNK_DIM * CHUNK_DIM)) as usize
    }

    pub fn voxel(&self, x: i32, y: i32, z: i32) -> VoxelId {
        self.voxels[self.grid_index(x, y, z)]
    }

    /// Sets the voxel at the given coordinate. Population-time call; runtime
    /// mutations additionally mark the voxel dirty themselves.
    pub fn set_voxel(&mut self, x: i32, y: i32, z: i32, id: VoxelId) {
        debug_assert!(self.active_defs[id as usize], "voxel ID {id} is not active");
        let index = self.grid_index(x, y, z);
        let voxel = VoxelInt3::new(x, y, z);

        let old = self.voxels[index];
        if self.voxel_defs[old as usize].is_chasm() {
            self.chasm_voxels.retain(|&v| v != voxel);
        }
        if self.voxel_defs[id as usize].is_chasm() {
            self.chasm_voxels.push(voxel);
        }

        self.voxels[index] = id;
    }

    pub fn voxel_def(&self, id: VoxelId) -> &VoxelDefinition {
        debug_assert!(self.active_defs[id as usize], "voxel ID {id} is not active");
        &self.voxel_defs[id as usize]
    }

    pub fn voxel_def_count(&self) -> usize {
        self.active_defs.iter().filter(|&&active| active).count()
    }

    /// Attempts to add a voxel definition, scanning the slot array for a
    /// free ID. Returns None when all slots are occupied; callers must
    /// pre-deduplicate to avoid exhausting dense palettes.
    pub fn try_add_voxel_def(&mut self, def: VoxelDefinition) -> Option<VoxelId> {
        let slot = self.active_defs.iter().position(|&active| !active)?;
        self.voxel_defs[slot] = def;
        self.active_defs[slot] = true;
        Some(slot as VoxelId)
    }

    /// Frees a voxel definition slot so its ID can be reused. The air voxel
    /// (ID 0) is never removable.
    pub fn remove_voxel_def(&mut self, id: VoxelId) {
        assert_ne!(id, Self::AIR_VOXEL_ID, "air voxel definition is permanent");
        debug_assert!(self.active_defs[id as usize]);
        self.active_defs[id as usize] = false;
        self.voxel_defs[id as usize] = VoxelDefinition::default();
    }

    // Decorator definitions. IDs are chunk-local, monotonically assigned,
    // and not deduplicated by value; that is the caller's responsibility.

    pub fn add_transition(&mut self, def: TransitionDefinition) -> TransitionId {
        self.transition_defs.push(def);
        (self.transition_defs.len() - 1) as TransitionId
    }

    pub fn add_trigger(&mut self, def: TriggerDefinition) -> TriggerId {
        self.trigger_defs.push(def);
        (self.trigger_defs.len() - 1) as TriggerId
    }

    pub fn add_lock(&mut self, def: LockDefinition) -> LockId {
        self.lock_defs.push(def);
        (self.lock_defs.len() - 1) as LockId
    }

    pub fn add_building_name(&mut self, name: String) -> BuildingNameId {
        self.building_names.push(name);
        (self.building_names.len() - 1) as BuildingNameId
    }

    pub fn add_door_def(&mut self, def: DoorDefinition) -> DoorId {
        self.door_defs.push(def);
        (self.door_defs.len() - 1) as DoorId
    }

    // Position registrations. A position maps to at most one decorator of
    // each kind; re-registering overwrites silently (last write wins).

    pub fn add_transition_position(&mut self, id: TransitionId, voxel: VoxelInt3) {
        debug_assert!((id as usize) < self.transition_defs.len());
        self.transition_ids.insert(voxel, id);
    }

    pub fn add_trigger_position(&mut self, id: TriggerId, voxel: VoxelInt3) {
        debug_assert!((id as usize) < self.trigger_defs.len());
        self.trigger_ids.insert(voxel, id);
    }

    pub fn add_lock_position(&mut self, id: LockId, voxel: VoxelInt3) {
        debug_assert!((id as usize) < self.lock_defs.len());
        self.lock_ids.insert(voxel, id);
    }

    pub fn add_building_name_position(&mut self, id: BuildingNameId, voxel: VoxelInt3) {
        debug_assert!((id as usize) < self.building_names.len());
        self.building_name_ids.insert(voxel, id);
    }

    pub fn add_door_position(&mut self, id: DoorId, voxel: VoxelInt3) {
        debug_assert!((id as usize) < self.door_defs.len());
        self.door_ids.insert(voxel, id);
    }

    pub fn try_get_transition(&self, voxel: VoxelInt3) -> Option<&TransitionDefinition> {
        self.transition_ids
            .get(&voxel)
            .map(|&id| &self.transition_defs[id as usize])
    }

    pub fn try_get_trigger(&self, voxel: VoxelInt3) -> Option<&TriggerDefinition> {
        self.trigger_ids
            .get(&voxel)
            .map(|&id| &self.trigger_defs[id as usize])
    }

    pub fn try_get_lock(&self, voxel: VoxelInt3) -> Option<&LockDefinition> {
        self.lock_ids
            .get(&voxel)
            .map(|&id| &self.lock_defs[id as usize])
    }

    pub fn try_get_building_name(&self, voxel: VoxelInt3) -> Option<&str> {
        self.building_name_ids
            .get(&voxel)
            .map(|&id| self.building_names[id as usize].as_str())
    }

    pub fn try_get_door(&self, voxel: VoxelInt3) -> Option<&DoorDefinition> {
        self.door_ids
            .get(&voxel)
            .map(|&id| &self.door_defs[id as usize])
    }

    /// Positions carrying a door definition; used for visibility updates.
    pub fn door_positions(&self) -> impl Iterator<Item = VoxelInt3> + '_ {
        self.door_ids.keys().copied()
    }

    /// Chasm voxel positions; used for perimeter fixups.
    pub fn chasm_voxels(&self) -> &[VoxelInt3] {
        &self.chasm_voxels
    }

    // Voxel instances.

    pub fn voxel_inst_count(&self) -> usize {
        self.voxel_insts.len()
    }

    /// Adds an instance. A voxel holds at most one instance of each type.
    pub fn add_voxel_inst(&mut self, inst: VoxelInstance) {
        debug_assert!(
            self.try_get_voxel_inst(inst.voxel, inst.instance_type()).is_none(),
            "duplicate voxel instance at {:?}",
            inst.voxel
        );
        self.voxel_insts.push(inst);
    }

    pub fn try_get_voxel_inst(
        &self,
        voxel: VoxelInt3,
        inst_type: VoxelInstanceType,
    ) -> Option<&VoxelInstance> {
        self.voxel_insts
            .iter()
            .find(|inst| inst.voxel == voxel && inst.instance_type() == inst_type)
    }

    pub fn try_get_voxel_inst_mut(
        &mut self,
        voxel: VoxelInt3,
        inst_type: VoxelInstanceType,
    ) -> Option<&mut VoxelInstance> {
        self.voxel_insts
            .iter_mut()
            .find(|inst| inst.voxel == voxel && inst.instance_type() == inst_type)
    }

    /// Removes the instance of the given type at the voxel, if any. Useful
    /// when a chunk edge is re-resolved due to adjacent chunks changing.
    pub fn remove_voxel_inst(&mut self, voxel: VoxelInt3, inst_type: VoxelInstanceType) {
        if let Some(index) = self
            .voxel_insts
            .iter()
            .position(|inst| inst.voxel == voxel && inst.instance_type() == inst_type)
        {
            self.voxel_insts.swap_remove(index);
        }
    }

    // Per-frame dirty state.

    pub fn dirty_voxels(&self) -> &[VoxelInt3] {
        &self.dirty_voxels
    }

    fn add_dirty_voxel(&mut self, voxel: VoxelInt3) {
        if !self.dirty_voxels.contains(&voxel) {
            self.dirty_voxels.push(voxel);
        }
    }

    /// Clears per-frame dirty flags. Safe to call repeatedly.
    pub fn clear_dirty_voxels(&mut self) {
        self.dirty_voxels.clear();
    }

    /// Drains positions whose surroundings need context-sensitive
    /// re-resolution by the chunk manager.
    pub fn take_pending_chasm_fixups(&mut self) -> Vec<VoxelInt3> {
        std::mem::take(&mut self.pending_chasm_fixups)
    }

    /// Advances every voxel instance's animation/state clock, then runs the
    /// two-phase finish handling: kind-specific shutdown behavior first,
    /// instance destruction second. Context-sensitive consequences (chasm
    /// faces across chunk edges) are queued for the chunk manager.
    pub fn update(
        &mut self,
        dt: f64,
        player: CoordDouble3,
        ceiling_scale: f64,
        audio: &mut dyn AudioPlayer,
    ) {
        let mut finished: Vec<usize> = Vec::new();
        let mut animated: Vec<VoxelInt3> = Vec::new();

        for i in 0..self.voxel_insts.len() {
            let voxel = self.voxel_insts[i].voxel;
            match &mut self.voxel_insts[i].kind {
                VoxelInstanceKind::OpenDoor(anim) => {
                    if anim.phase() == DoorPhase::Open {
                        let center = door_center(self.position, voxel, ceiling_scale);
                        if player.distance_squared(center)
                            > DOOR_CLOSE_DISTANCE * DOOR_CLOSE_DISTANCE
                        {
                            anim.start_closing();
                        }
                    }
                    if anim.update(dt) {
                        finished.push(i);
                    } else {
                        animated.push(voxel);
                    }
                }
                VoxelInstanceKind::Fading(fade) => {
                    if fade.update(dt) {
                        finished.push(i);
                    } else {
                        animated.push(voxel);
                    }
                }
                _ => {}
            }
        }

        for voxel in animated {
            self.add_dirty_voxel(voxel);
        }

        for &i in &finished {
            self.handle_voxel_inst_finished(i, ceiling_scale, audio);
        }

        for &i in finished.iter().rev() {
            self.voxel_insts.swap_remove(i);
        }
    }

    /// Kind-specific shutdown behavior when an instance's state machine
    /// reaches "finished".
    fn handle_voxel_inst_finished(
        &mut self,
        index: usize,
        ceiling_scale: f64,
        audio: &mut dyn AudioPlayer,
    ) {
        let voxel = self.voxel_insts[index].voxel;
        match self.voxel_insts[index].instance_type() {
            VoxelInstanceType::OpenDoor => {
                if let Some(door) = self.try_get_door(voxel) {
                    let sound = door.close_sound;
                    audio.play_sound_at(sound, door_center(self.position, voxel, ceiling_scale));
                } else {
                    debug_assert!(false, "door instance without door definition at {voxel:?}");
                }
                self.add_dirty_voxel(voxel);
            }
            VoxelInstanceType::Fading => {
                // The faded voxel becomes air. Chasm faces around it depend
                // on adjacent chunks, so the recompute is deferred until the
                // chunk manager can supply the neighbors.
                self.set_voxel(voxel.x, voxel.y, voxel.z, Self::AIR_VOXEL_ID);
                self.add_dirty_voxel(voxel);
                self.pending_chasm_fixups.push(voxel);
            }
            _ => {}
        }
    }
}

fn door_center(chunk: ChunkInt2, voxel: VoxelInt3, ceiling_scale: f64) -> CoordDouble3 {
    CoordDouble3::new(
        chunk,
        DVec3::new(
            voxel.x as f64 + 0.50,
            (voxel.y as f64 + 0.50) * ceiling_scale,
            voxel.z as f64 + 0.50,
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2;
    use ravenfell_core::services::{MusicKind, SoundId, TextureId};
    use crate::voxel::ChasmKind;

    #[derive(Default)]
    struct RecordingAudio {
        sounds: Vec<SoundId>,
    }

    impl AudioPlayer for RecordingAudio {
        fn play_sound(&mut self, sound: SoundId) {
            self.sounds.push(sound);
        }
        fn play_sound_at(&mut self, sound: SoundId, _position: CoordDouble3) {
            self.sounds.push(sound);
        }
        fn set_music(&mut self, _music: MusicKind) {}
    }

    fn wall_def(n: u32) -> VoxelDefinition {
        VoxelDefinition::Wall {
            side: TextureId(n),
            floor: TextureId(n),
            ceiling: TextureId(n),
        }
    }

    fn test_chunk() -> Chunk {
        Chunk::new(IVec2::new(0, 0), 4)
    }

    #[test]
    fn test_voxel_round_trip() {
        let mut chunk = test_chunk();
        let id = chunk.try_add_voxel_def(wall_def(1)).expect("has room");
        chunk.set_voxel(3, 1, 5, id);
        assert_eq!(chunk.voxel(3, 1, 5), id);
        assert_eq!(chunk.voxel(3, 2, 5), Chunk::AIR_VOXEL_ID);
    }

    #[test]
    fn test_out_of_bounds_voxel_invalid() {
        let chunk = test_chunk();
        assert!(chunk.is_valid_voxel(0, 0, 0));
        assert!(chunk.is_valid_voxel(Chunk::WIDTH - 1, 3, Chunk::DEPTH - 1));
        assert!(!chunk.is_valid_voxel(-1, 0, 0));
        assert!(!chunk.is_valid_voxel(0, 4, 0));
        assert!(!chunk.is_valid_voxel(0, 0, Chunk::DEPTH));
    }

    #[test]
    #[should_panic]
    fn test_set_voxel_out_of_bounds_panics() {
        let mut chunk = test_chunk();
        chunk.set_voxel(Chunk::WIDTH, 0, 0, Chunk::AIR_VOXEL_ID);
    }

    #[test]
    fn test_voxel_def_capacity_and_reuse() {
        let mut chunk = test_chunk();

        // Slot 0 is air, so 255 more definitions fit.
        let mut last_id = 0;
        for i in 0..255 {
            last_id = chunk.try_add_voxel_def(wall_def(i)).expect("has room");
        }
        assert_eq!(chunk.voxel_def_count(), 256);

        // A 257th distinct definition fails.
        assert!(chunk.try_add_voxel_def(wall_def(999)).is_none());

        // Freeing an ID makes it reusable.
        chunk.remove_voxel_def(last_id);
        let reused = chunk.try_add_voxel_def(wall_def(1000)).expect("freed slot");
        assert_eq!(reused, last_id);
        assert!(chunk.try_add_voxel_def(wall_def(1001)).is_none());
    }

    #[test]
    #[should_panic]
    fn test_air_def_not_removable() {
        let mut chunk = test_chunk();
        chunk.remove_voxel_def(Chunk::AIR_VOXEL_ID);
    }

    #[test]
    fn test_decorator_ids_monotonic() {
        let mut chunk = test_chunk();
        let a = chunk.add_trigger(TriggerDefinition {
            sound: Some(SoundId(1)),
            text: None,
        });
        let b = chunk.add_trigger(TriggerDefinition {
            sound: Some(SoundId(2)),
            text: None,
        });
        assert_eq!(a, 0);
        assert_eq!(b, 1);
    }

    #[test]
    fn test_decorator_position_last_write_wins() {
        let mut chunk = test_chunk();
        let quiet = chunk.add_trigger(TriggerDefinition {
            sound: None,
            text: None,
        });
        let loud = chunk.add_trigger(TriggerDefinition {
            sound: Some(SoundId(7)),
            text: None,
        });

        let voxel = VoxelInt3::new(1, 0, 1);
        chunk.add_trigger_position(quiet, voxel);
        chunk.add_trigger_position(loud, voxel);

        let def = chunk.try_get_trigger(voxel).expect("registered");
        assert_eq!(def.sound, Some(SoundId(7)));
    }

    #[test]
    fn test_shared_decorator_definition() {
        let mut chunk = test_chunk();
        let id = chunk.add_transition(TransitionDefinition::CityGate);
        chunk.add_transition_position(id, VoxelInt3::new(0, 1, 5));
        chunk.add_transition_position(id, VoxelInt3::new(0, 1, 6));
        assert!(chunk.try_get_transition(VoxelInt3::new(0, 1, 5)).is_some());
        assert!(chunk.try_get_transition(VoxelInt3::new(0, 1, 6)).is_some());
        assert!(chunk.try_get_transition(VoxelInt3::new(0, 1, 7)).is_none());
    }

    #[test]
    fn test_door_close_plays_sound_and_removes_instance() {
        let mut chunk = test_chunk();
        let voxel = VoxelInt3::new(2, 1, 2);
        let door_id = chunk.add_door_def(DoorDefinition::swinging(SoundId(10), SoundId(11)));
        chunk.add_door_position(door_id, voxel);
        chunk.add_voxel_inst(VoxelInstance::open_door(voxel, 4.0));

        let mut audio = RecordingAudio::default();

        // Player right next to the door: opens and stays open.
        let near = CoordDouble3::new(IVec2::new(0, 0), DVec3::new(2.5, 1.5, 2.5));
        chunk.update(1.0, near, 1.0, &mut audio);
        assert_eq!(chunk.voxel_inst_count(), 1);
        assert!(audio.sounds.is_empty());

        // Player walks away: door closes, close sound fires, instance gone.
        let far = CoordDouble3::new(IVec2::new(0, 0), DVec3::new(30.0, 1.5, 30.0));
        chunk.update(1.0, far, 1.0, &mut audio);
        chunk.update(1.0, far, 1.0, &mut audio);
        assert_eq!(chunk.voxel_inst_count(), 0);
        assert_eq!(audio.sounds, vec![SoundId(11)]);
    }

    #[test]
    fn test_fade_finish_clears_voxel_and_queues_fixup() {
        let mut chunk = test_chunk();
        let id = chunk.try_add_voxel_def(wall_def(3)).expect("has room");
        let voxel = VoxelInt3::new(4, 1, 4);
        chunk.set_voxel(voxel.x, voxel.y, voxel.z, id);
        chunk.add_voxel_inst(VoxelInstance::fading(voxel, 0.5));

        let mut audio = RecordingAudio::default();
        let player = CoordDouble3::new(IVec2::new(0, 0), DVec3::new(0.0, 0.0, 0.0));
        chunk.update(1.0, player, 1.0, &mut audio);

        assert_eq!(chunk.voxel(voxel.x, voxel.y, voxel.z), Chunk::AIR_VOXEL_ID);
        assert_eq!(chunk.voxel_inst_count(), 0);
        assert_eq!(chunk.take_pending_chasm_fixups(), vec![voxel]);
        assert!(chunk.dirty_voxels().contains(&voxel));
    }

    #[test]
    fn test_clear_dirty_idempotent() {
        let mut chunk = test_chunk();
        let voxel = VoxelInt3::new(1, 1, 1);
        chunk.add_voxel_inst(VoxelInstance::fading(voxel, 10.0));

        let mut audio = RecordingAudio::default();
        let player = CoordDouble3::new(IVec2::new(0, 0), DVec3::ZERO);
        chunk.update(0.1, player, 1.0, &mut audio);
        assert!(!chunk.dirty_voxels().is_empty());

        chunk.clear_dirty_voxels();
        assert!(chunk.dirty_voxels().is_empty());
        chunk.clear_dirty_voxels();
        assert!(chunk.dirty_voxels().is_empty());
    }

    #[test]
    fn test_chasm_voxels_tracked() {
        let mut chunk = test_chunk();
        let chasm = chunk
            .try_add_voxel_def(VoxelDefinition::Chasm {
                texture: TextureId(5),
                kind: ChasmKind::Wet,
            })
            .expect("has room");
        let floor = chunk
            .try_add_voxel_def(VoxelDefinition::Floor {
                texture: TextureId(6),
            })
            .expect("has room");

        chunk.set_voxel(1, 0, 1, chasm);
        chunk.set_voxel(2, 0, 1, chasm);
        assert_eq!(chunk.chasm_voxels().len(), 2);

        chunk.set_voxel(1, 0, 1, floor);
        assert_eq!(chunk.chasm_voxels(), &[VoxelInt3::new(2, 0, 1)]);
    }
}
