use glam::{IVec2, IVec3};

/// One of the four compass directions on the chunk floor plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardinalDirection {
    North,
    South,
    East,
    West,
}

/// All four cardinal directions, in neighbor-lookup order.
pub const CARDINAL_DIRECTIONS: [CardinalDirection; 4] = [
    CardinalDirection::North,
    CardinalDirection::East,
    CardinalDirection::South,
    CardinalDirection::West,
];

impl CardinalDirection {
    /// Offset on the floor plane. North = +X, East = +Z.
    pub fn offset(self) -> IVec2 {
        match self {
            CardinalDirection::North => IVec2::new(1, 0),
            CardinalDirection::South => IVec2::new(-1, 0),
            CardinalDirection::East => IVec2::new(0, 1),
            CardinalDirection::West => IVec2::new(0, -1),
        }
    }

    /// Offset as a 3D voxel delta (Y unchanged).
    pub fn voxel_offset(self) -> IVec3 {
        let xz = self.offset();
        IVec3::new(xz.x, 0, xz.y)
    }

    pub fn opposite(self) -> Self {
        match self {
            CardinalDirection::North => CardinalDirection::South,
            CardinalDirection::South => CardinalDirection::North,
            CardinalDirection::East => CardinalDirection::West,
            CardinalDirection::West => CardinalDirection::East,
        }
    }
}

/// The wall face of a voxel that was approached or hit. Used to bias player
/// placement when passing through gates and interior entrances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoxelFacing {
    PositiveX,
    NegativeX,
    PositiveZ,
    NegativeZ,
}

impl VoxelFacing {
    /// The direction a player standing against this face is pushed toward.
    pub fn direction(self) -> CardinalDirection {
        match self {
            VoxelFacing::PositiveX => CardinalDirection::North,
            VoxelFacing::NegativeX => CardinalDirection::South,
            VoxelFacing::PositiveZ => CardinalDirection::East,
            VoxelFacing::NegativeZ => CardinalDirection::West,
        }
    }

    /// Voxel delta out of this face.
    pub fn delta(self) -> IVec3 {
        self.direction().voxel_offset()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cardinal_offsets_unique() {
        for (i, a) in CARDINAL_DIRECTIONS.iter().enumerate() {
            for (j, b) in CARDINAL_DIRECTIONS.iter().enumerate() {
                if i != j {
                    assert_ne!(a.offset(), b.offset());
                }
            }
        }
    }

    #[test]
    fn test_opposite_round_trip() {
        for dir in CARDINAL_DIRECTIONS {
            assert_eq!(dir.opposite().opposite(), dir);
            assert_eq!(dir.offset() + dir.opposite().offset(), IVec2::ZERO);
        }
    }

    #[test]
    fn test_facing_delta_matches_direction() {
        assert_eq!(VoxelFacing::PositiveX.delta(), IVec3::new(1, 0, 0));
        assert_eq!(VoxelFacing::NegativeZ.delta(), IVec3::new(0, 0, -1));
    }
}
