use ravenfell_core::direction::VoxelFacing;
use ravenfell_core::services::TextureId;

/// What a chasm is filled with. Determines fall damage and wall animation;
/// steady per-voxel state, unlike door or fade animations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChasmKind {
    Dry,
    Wet,
    Lava,
}

impl ChasmKind {
    /// Whether the player can stand on the chasm floor.
    pub fn has_floor(self) -> bool {
        matches!(self, ChasmKind::Dry)
    }
}

/// Shared, deduplicated description of a voxel's geometry and behavior
/// class. Referenced by voxel IDs; most voxels in a chunk point at a
/// handful of these.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum VoxelDefinition {
    #[default]
    Air,
    Wall {
        side: TextureId,
        floor: TextureId,
        ceiling: TextureId,
    },
    Floor {
        texture: TextureId,
    },
    Ceiling {
        texture: TextureId,
    },
    Raised {
        side: TextureId,
        floor: TextureId,
        ceiling: TextureId,
        y_offset: f64,
        y_size: f64,
    },
    Edge {
        texture: TextureId,
        facing: VoxelFacing,
    },
    Chasm {
        texture: TextureId,
        kind: ChasmKind,
    },
    Door {
        texture: TextureId,
    },
}

impl VoxelDefinition {
    pub fn is_air(&self) -> bool {
        matches!(self, VoxelDefinition::Air)
    }

    pub fn is_chasm(&self) -> bool {
        matches!(self, VoxelDefinition::Chasm { .. })
    }

    pub fn is_door(&self) -> bool {
        matches!(self, VoxelDefinition::Door { .. })
    }

    /// Whether this voxel is a full-height wall that can carry transitions.
    pub fn is_wall(&self) -> bool {
        matches!(self, VoxelDefinition::Wall { .. })
    }

    /// Whether a neighboring chasm shows a wall face toward this voxel.
    /// Chasms connect seamlessly to each other; anything else (including a
    /// missing neighbor) closes the face off.
    pub fn hides_adjacent_chasm_face(&self) -> bool {
        self.is_chasm()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_air() {
        assert!(VoxelDefinition::default().is_air());
    }

    #[test]
    fn test_chasm_floor() {
        assert!(ChasmKind::Dry.has_floor());
        assert!(!ChasmKind::Wet.has_floor());
        assert!(!ChasmKind::Lava.has_floor());
    }

    #[test]
    fn test_chasm_face_rule() {
        let chasm = VoxelDefinition::Chasm {
            texture: TextureId(1),
            kind: ChasmKind::Wet,
        };
        let floor = VoxelDefinition::Floor {
            texture: TextureId(2),
        };
        assert!(chasm.hides_adjacent_chasm_face());
        assert!(!floor.hides_adjacent_chasm_face());
        assert!(!VoxelDefinition::Air.hides_adjacent_chasm_face());
    }
}
