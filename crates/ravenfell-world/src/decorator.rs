//! Chunk decorator definitions: auxiliary data attached to specific voxel
//! positions. Each chunk owns a deduplicated list per kind plus a
//! position-to-ID map; multiple voxels may share one definition.

use ravenfell_core::services::SoundId;

use crate::generation::InteriorGenInfo;

/// Which way a level-change voxel moves the player through the level stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelChangeDirection {
    Up,
    Down,
}

/// A voxel that moves the player to another map or level when entered.
#[derive(Debug, Clone, PartialEq)]
pub enum TransitionDefinition {
    /// Doorway into an interior, generated on entry from these parameters.
    EnterInterior { gen_info: InteriorGenInfo },
    /// Interior exit back to the enclosing exterior.
    ExitInterior,
    /// City wall gate; toggles between the city and the wilderness.
    CityGate,
    /// Stairs within an interior's level stack.
    LevelChange { direction: LevelChangeDirection },
}

/// Lore text shown when a trigger fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerTextDefinition {
    pub text: String,
    pub display_once: bool,
}

/// A voxel that fires a sound and/or lore text when stepped on.
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerDefinition {
    pub sound: Option<SoundId>,
    pub text: Option<TriggerTextDefinition>,
}

/// Lock on a door voxel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockDefinition {
    /// Key item that opens this lock, if any.
    pub key_id: i32,
    /// Difficulty for lockpicking.
    pub lock_level: i32,
}

/// How a door animates open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorType {
    Swinging,
    Sliding,
    Raising,
}

/// Shared door behavior: motion type, speed, and sounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoorDefinition {
    pub door_type: DoorType,
    /// Fraction of fully-open per second.
    pub open_speed: f64,
    pub open_sound: SoundId,
    pub close_sound: SoundId,
}

impl DoorDefinition {
    pub fn swinging(open_sound: SoundId, close_sound: SoundId) -> Self {
        Self {
            door_type: DoorType::Swinging,
            open_speed: 1.30,
            open_sound,
            close_sound,
        }
    }
}
