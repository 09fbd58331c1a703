//! # Chunk Coordinates
//!
//! Conversion between world voxel coordinates and `(chunk, local)` pairs.
//! Chunk coordinates are `floor(world / size)` and local coordinates are the
//! euclidean remainder, so both stay correct for negative world positions.

use std::fmt;

use cgmath::Point3;

use crate::voxels::block::block_side::BlockSide;

/// Position of a chunk on the horizontal chunk grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    pub x: i32,
    pub z: i32,
}

impl ChunkCoord {
    pub const fn new(x: i32, z: i32) -> Self {
        ChunkCoord { x, z }
    }

    /// The chunk containing world column `(x, z)`.
    pub fn from_world(x: i32, z: i32, size: usize) -> Self {
        let size = size as i32;
        ChunkCoord {
            x: x.div_euclid(size),
            z: z.div_euclid(size),
        }
    }

    /// Local coordinate of world coordinate `v` inside its chunk, always in `[0, size)`.
    pub fn local(v: i32, size: usize) -> usize {
        v.rem_euclid(size as i32) as usize
    }

    /// World position of local `(0, 0, 0)`. Always a multiple of `size`.
    pub fn origin(self, size: usize) -> Point3<i32> {
        let size = size as i32;
        Point3::new(self.x * size, 0, self.z * size)
    }

    /// The chunk sharing the boundary on `side`, or `None` for the top and
    /// bottom faces, which are the edges of the world.
    pub fn neighbor(self, side: BlockSide) -> Option<ChunkCoord> {
        match side {
            BlockSide::RIGHT => Some(ChunkCoord::new(self.x + 1, self.z)),
            BlockSide::LEFT => Some(ChunkCoord::new(self.x - 1, self.z)),
            BlockSide::FRONT => Some(ChunkCoord::new(self.x, self.z + 1)),
            BlockSide::BACK => Some(ChunkCoord::new(self.x, self.z - 1)),
            BlockSide::TOP | BlockSide::BOTTOM => None,
        }
    }

    /// Deterministic file name for the persisted chunk.
    pub fn file_name(self) -> String {
        format!("{}_{}.chunk", self.x, self.z)
    }
}

impl fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_coordinates_floor() {
        assert_eq!(ChunkCoord::from_world(-1, -16, 16), ChunkCoord::new(-1, -1));
        assert_eq!(ChunkCoord::from_world(-17, 15, 16), ChunkCoord::new(-2, 0));
        assert_eq!(ChunkCoord::local(-1, 16), 15);
        assert_eq!(ChunkCoord::local(-16, 16), 0);
        assert_eq!(ChunkCoord::local(33, 16), 1);
    }

    #[test]
    fn origin_is_a_multiple_of_size() {
        let origin = ChunkCoord::new(-3, 2).origin(8);
        assert_eq!(origin, Point3::new(-24, 0, 16));
    }

    #[test]
    fn vertical_sides_have_no_neighbor() {
        let c = ChunkCoord::new(0, 0);
        assert_eq!(c.neighbor(BlockSide::TOP), None);
        assert_eq!(c.neighbor(BlockSide::LEFT), Some(ChunkCoord::new(-1, 0)));
        assert_eq!(c.file_name(), "0_0.chunk");
        assert_eq!(ChunkCoord::new(-2, 7).file_name(), "-2_7.chunk");
    }
}
