use ravenfell_core::coord::{CoordDouble3, VoxelDouble3};

/// The player's physical presence in the world. Movement integration is the
/// embedding application's job; the core only needs position, facing, and
/// the ability to teleport across map transitions.
pub struct Player {
    position: CoordDouble3,
    forward: VoxelDouble3,
    velocity: VoxelDouble3,
}

impl Player {
    /// Camera height above the floor.
    pub const HEIGHT: f64 = 0.60;

    pub fn new(position: CoordDouble3, forward: VoxelDouble3) -> Self {
        Self {
            position: position.normalized(),
            forward: forward.normalize_or_zero(),
            velocity: VoxelDouble3::ZERO,
        }
    }

    pub fn position(&self) -> CoordDouble3 {
        self.position
    }

    pub fn forward(&self) -> VoxelDouble3 {
        self.forward
    }

    pub fn velocity(&self) -> VoxelDouble3 {
        self.velocity
    }

    /// Moves the player instantly, renormalizing into the owning chunk.
    pub fn teleport(&mut self, position: CoordDouble3) {
        self.position = position.normalized();
    }

    /// Faces the player along the given world-space direction.
    pub fn look_at_direction(&mut self, direction: VoxelDouble3) {
        let flat = VoxelDouble3::new(direction.x, 0.0, direction.z);
        if flat.length_squared() > 0.0 {
            self.forward = flat.normalize();
        }
    }

    pub fn set_velocity(&mut self, velocity: VoxelDouble3) {
        self.velocity = velocity;
    }

    pub fn set_velocity_to_zero(&mut self) {
        self.velocity = VoxelDouble3::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{DVec3, IVec2};
    use ravenfell_core::constants::CHUNK_DIM;

    #[test]
    fn test_teleport_normalizes_chunk() {
        let mut player = Player::new(
            CoordDouble3::new(IVec2::new(0, 0), DVec3::new(1.0, 1.0, 1.0)),
            DVec3::new(1.0, 0.0, 0.0),
        );
        player.teleport(CoordDouble3::new(
            IVec2::new(0, 0),
            DVec3::new(CHUNK_DIM as f64 + 2.0, 1.0, -1.0),
        ));
        assert_eq!(player.position().chunk, IVec2::new(1, -1));
    }

    #[test]
    fn test_look_at_ignores_vertical() {
        let mut player = Player::new(
            CoordDouble3::new(IVec2::new(0, 0), DVec3::new(1.0, 1.0, 1.0)),
            DVec3::new(1.0, 0.0, 0.0),
        );
        player.look_at_direction(DVec3::new(0.0, 5.0, 2.0));
        assert!((player.forward() - DVec3::new(0.0, 0.0, 1.0)).length() < 1.0e-9);
    }
}
