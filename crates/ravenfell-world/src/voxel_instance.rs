//! Sparse per-voxel runtime state. Most voxels have none; an instance is
//! created on the first state change and destroyed when the state returns
//! to its default (or when the owning chunk is freed).

use ravenfell_core::coord::VoxelInt3;
use ravenfell_core::direction::CardinalDirection;

/// Discriminant for instance lookup; a voxel holds at most one instance of
/// each type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoxelInstanceType {
    OpenDoor,
    Fading,
    ChasmWall,
    Trigger,
    DoorVisibility,
}

/// Door animation phase. The instance only exists while the door deviates
/// from fully closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorPhase {
    Opening,
    Open,
    Closing,
}

/// Live door animation: Closed -> Opening -> Open -> Closing -> Closed,
/// with the instance destroyed on reaching Closed again.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoorAnimation {
    phase: DoorPhase,
    /// 0 = closed, 1 = fully open.
    percent_open: f64,
    /// Fraction of fully-open per second.
    speed: f64,
}

impl DoorAnimation {
    pub fn new_opening(speed: f64) -> Self {
        debug_assert!(speed > 0.0);
        Self {
            phase: DoorPhase::Opening,
            percent_open: 0.0,
            speed,
        }
    }

    pub fn phase(&self) -> DoorPhase {
        self.phase
    }

    pub fn percent_open(&self) -> f64 {
        self.percent_open
    }

    /// Begins closing an open door. No-op unless fully open.
    pub fn start_closing(&mut self) {
        if self.phase == DoorPhase::Open {
            self.phase = DoorPhase::Closing;
        }
    }

    /// Re-trigger while closing swings the door back open.
    pub fn reopen(&mut self) {
        if self.phase == DoorPhase::Closing {
            self.phase = DoorPhase::Opening;
        }
    }

    /// Advances the animation. Returns true when the door has fully closed
    /// and the instance should be destroyed.
    pub fn update(&mut self, dt: f64) -> bool {
        match self.phase {
            DoorPhase::Opening => {
                self.percent_open += self.speed * dt;
                if self.percent_open >= 1.0 {
                    self.percent_open = 1.0;
                    self.phase = DoorPhase::Open;
                }
                false
            }
            DoorPhase::Open => false,
            DoorPhase::Closing => {
                self.percent_open -= self.speed * dt;
                if self.percent_open <= 0.0 {
                    self.percent_open = 0.0;
                    true
                } else {
                    false
                }
            }
        }
    }
}

/// Geometry fading out of existence (e.g. a bashed wall). When the clock
/// runs out, the voxel becomes air.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeState {
    seconds_remaining: f64,
    total_seconds: f64,
}

impl FadeState {
    pub fn new(total_seconds: f64) -> Self {
        debug_assert!(total_seconds > 0.0);
        Self {
            seconds_remaining: total_seconds,
            total_seconds,
        }
    }

    /// 0 = fully opaque, 1 = gone.
    pub fn percent_faded(&self) -> f64 {
        1.0 - (self.seconds_remaining / self.total_seconds).clamp(0.0, 1.0)
    }

    /// Returns true when the fade has completed.
    pub fn update(&mut self, dt: f64) -> bool {
        self.seconds_remaining -= dt;
        self.seconds_remaining <= 0.0
    }
}

/// Which chasm wall faces are visible. A face shows wherever the adjacent
/// voxel does not continue the chasm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChasmWallFaces {
    pub north: bool,
    pub east: bool,
    pub south: bool,
    pub west: bool,
}

impl ChasmWallFaces {
    pub fn any(&self) -> bool {
        self.north || self.east || self.south || self.west
    }

    pub fn set(&mut self, direction: CardinalDirection, visible: bool) {
        match direction {
            CardinalDirection::North => self.north = visible,
            CardinalDirection::East => self.east = visible,
            CardinalDirection::South => self.south = visible,
            CardinalDirection::West => self.west = visible,
        }
    }

    pub fn get(&self, direction: CardinalDirection) -> bool {
        match direction {
            CardinalDirection::North => self.north,
            CardinalDirection::East => self.east,
            CardinalDirection::South => self.south,
            CardinalDirection::West => self.west,
        }
    }
}

/// Which door faces the renderer should draw, derived from adjacent air
/// voxels. Recomputed when neighboring chunks change.
pub type DoorVisibilityFaces = ChasmWallFaces;

/// Kind-specific instance payload.
#[derive(Debug, Clone, PartialEq)]
pub enum VoxelInstanceKind {
    OpenDoor(DoorAnimation),
    Fading(FadeState),
    ChasmWall(ChasmWallFaces),
    Trigger { triggered: bool },
    DoorVisibility(DoorVisibilityFaces),
}

impl VoxelInstanceKind {
    pub fn instance_type(&self) -> VoxelInstanceType {
        match self {
            VoxelInstanceKind::OpenDoor(_) => VoxelInstanceType::OpenDoor,
            VoxelInstanceKind::Fading(_) => VoxelInstanceType::Fading,
            VoxelInstanceKind::ChasmWall(_) => VoxelInstanceType::ChasmWall,
            VoxelInstanceKind::Trigger { .. } => VoxelInstanceType::Trigger,
            VoxelInstanceKind::DoorVisibility(_) => VoxelInstanceType::DoorVisibility,
        }
    }
}

/// Runtime state for one voxel that deviates from its definition's default.
#[derive(Debug, Clone, PartialEq)]
pub struct VoxelInstance {
    pub voxel: VoxelInt3,
    pub kind: VoxelInstanceKind,
}

impl VoxelInstance {
    pub fn open_door(voxel: VoxelInt3, speed: f64) -> Self {
        Self {
            voxel,
            kind: VoxelInstanceKind::OpenDoor(DoorAnimation::new_opening(speed)),
        }
    }

    pub fn fading(voxel: VoxelInt3, total_seconds: f64) -> Self {
        Self {
            voxel,
            kind: VoxelInstanceKind::Fading(FadeState::new(total_seconds)),
        }
    }

    pub fn chasm_wall(voxel: VoxelInt3, faces: ChasmWallFaces) -> Self {
        Self {
            voxel,
            kind: VoxelInstanceKind::ChasmWall(faces),
        }
    }

    pub fn trigger(voxel: VoxelInt3, triggered: bool) -> Self {
        Self {
            voxel,
            kind: VoxelInstanceKind::Trigger { triggered },
        }
    }

    pub fn door_visibility(voxel: VoxelInt3, faces: DoorVisibilityFaces) -> Self {
        Self {
            voxel,
            kind: VoxelInstanceKind::DoorVisibility(faces),
        }
    }

    pub fn instance_type(&self) -> VoxelInstanceType {
        self.kind.instance_type()
    }
}
