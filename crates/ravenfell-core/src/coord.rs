use glam::{DVec2, DVec3, IVec2, IVec3};

use crate::constants::CHUNK_DIM;

/// Chunk coordinate in chunk-space (each unit = CHUNK_DIM voxels on X/Z).
pub type ChunkInt2 = IVec2;

/// Voxel coordinate on a chunk's X/Z floor plane.
pub type VoxelInt2 = IVec2;

/// Chunk-local voxel coordinate. X/Z in [0, CHUNK_DIM), Y in [0, height).
pub type VoxelInt3 = IVec3;

/// Continuous point on a chunk's floor plane.
pub type VoxelDouble2 = DVec2;

/// Continuous chunk-local point.
pub type VoxelDouble3 = DVec3;

/// A voxel position in the world: owning chunk plus chunk-local voxel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CoordInt3 {
    pub chunk: ChunkInt2,
    pub voxel: VoxelInt3,
}

impl CoordInt3 {
    pub fn new(chunk: ChunkInt2, voxel: VoxelInt3) -> Self {
        Self { chunk, voxel }
    }

    /// Offsets this coordinate by a voxel delta, renormalizing X/Z into the
    /// correct chunk when the delta crosses a chunk edge. Y is unbounded here;
    /// the chunk itself validates height.
    pub fn offset(self, delta: VoxelInt3) -> Self {
        let raw = self.voxel + delta;
        let (chunk_dx, x) = wrap_axis(raw.x);
        let (chunk_dz, z) = wrap_axis(raw.z);
        Self {
            chunk: self.chunk + IVec2::new(chunk_dx, chunk_dz),
            voxel: IVec3::new(x, raw.y, z),
        }
    }
}

/// A continuous position in the world: owning chunk plus chunk-local point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordDouble3 {
    pub chunk: ChunkInt2,
    pub point: VoxelDouble3,
}

impl CoordDouble3 {
    pub fn new(chunk: ChunkInt2, point: VoxelDouble3) -> Self {
        Self { chunk, point }
    }

    /// Renormalizes the point's X/Z into [0, CHUNK_DIM), carrying overflow
    /// into the chunk coordinate.
    pub fn normalized(self) -> Self {
        let dim = CHUNK_DIM as f64;
        let chunk_dx = (self.point.x / dim).floor() as i32;
        let chunk_dz = (self.point.z / dim).floor() as i32;
        Self {
            chunk: self.chunk + IVec2::new(chunk_dx, chunk_dz),
            point: DVec3::new(
                self.point.x - (chunk_dx as f64) * dim,
                self.point.y,
                self.point.z - (chunk_dz as f64) * dim,
            ),
        }
    }

    /// The containing voxel, assuming the point is already normalized.
    pub fn voxel(self) -> CoordInt3 {
        CoordInt3::new(
            self.chunk,
            IVec3::new(
                self.point.x.floor() as i32,
                self.point.y.floor() as i32,
                self.point.z.floor() as i32,
            ),
        )
    }

    /// Squared world-space distance to another coordinate.
    pub fn distance_squared(self, other: CoordDouble3) -> f64 {
        let dim = CHUNK_DIM as f64;
        let chunk_diff = (other.chunk - self.chunk).as_dvec2() * dim;
        let diff = DVec3::new(
            chunk_diff.x + other.point.x - self.point.x,
            other.point.y - self.point.y,
            chunk_diff.y + other.point.z - self.point.z,
        );
        diff.length_squared()
    }
}

fn wrap_axis(value: i32) -> (i32, i32) {
    let chunk_delta = value.div_euclid(CHUNK_DIM);
    (chunk_delta, value.rem_euclid(CHUNK_DIM))
}

/// Chebyshev distance between two chunk coordinates. The streaming radius is
/// a square region, so this is the distance metric for chunk activity.
pub fn chunk_distance(a: ChunkInt2, b: ChunkInt2) -> i32 {
    (a.x - b.x).abs().max((a.y - b.y).abs())
}

/// Center point of a voxel on the floor plane.
pub fn voxel_center_xz(voxel: VoxelInt2) -> VoxelDouble2 {
    DVec2::new(voxel.x as f64 + 0.50, voxel.y as f64 + 0.50)
}

/// Center point of a voxel.
pub fn voxel_center(voxel: VoxelInt3) -> VoxelDouble3 {
    DVec3::new(
        voxel.x as f64 + 0.50,
        voxel.y as f64 + 0.50,
        voxel.z as f64 + 0.50,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_within_chunk() {
        let coord = CoordInt3::new(IVec2::new(2, 3), IVec3::new(10, 1, 20));
        let result = coord.offset(IVec3::new(1, 0, -2));
        assert_eq!(result.chunk, IVec2::new(2, 3));
        assert_eq!(result.voxel, IVec3::new(11, 1, 18));
    }

    #[test]
    fn test_offset_crosses_chunk_edge() {
        let coord = CoordInt3::new(IVec2::new(0, 0), IVec3::new(CHUNK_DIM - 1, 0, 0));
        let result = coord.offset(IVec3::new(1, 0, -1));
        assert_eq!(result.chunk, IVec2::new(1, -1));
        assert_eq!(result.voxel, IVec3::new(0, 0, CHUNK_DIM - 1));
    }

    #[test]
    fn test_normalized_point() {
        let coord = CoordDouble3::new(
            IVec2::new(1, 1),
            DVec3::new(CHUNK_DIM as f64 + 0.25, 2.0, -0.75),
        )
        .normalized();
        assert_eq!(coord.chunk, IVec2::new(2, 0));
        assert!((coord.point.x - 0.25).abs() < 1.0e-9);
        assert!((coord.point.z - (CHUNK_DIM as f64 - 0.75)).abs() < 1.0e-9);
    }

    #[test]
    fn test_chunk_distance_chebyshev() {
        assert_eq!(chunk_distance(IVec2::new(0, 0), IVec2::new(3, -2)), 3);
        assert_eq!(chunk_distance(IVec2::new(5, 5), IVec2::new(5, 5)), 0);
    }

    #[test]
    fn test_distance_squared_across_chunks() {
        let a = CoordDouble3::new(IVec2::new(0, 0), DVec3::new(63.0, 0.0, 0.0));
        let b = CoordDouble3::new(IVec2::new(1, 0), DVec3::new(1.0, 0.0, 0.0));
        assert!((a.distance_squared(b) - 4.0).abs() < 1.0e-9);
    }
}
