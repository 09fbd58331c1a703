//! # Block Side Module
//!
//! The six axis-aligned faces of a voxel.

/// One of the six faces of a voxel.
///
/// The discriminants double as indices into per-face tables
/// (`Voxel::faces`, `Mesh::side_quads`). The order is `+X, -X, +Y, -Y, +Z, -Z`.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// The face pointing towards positive X
    RIGHT = 0,

    /// The face pointing towards negative X
    LEFT = 1,

    /// The face pointing towards positive Y
    TOP = 2,

    /// The face pointing towards negative Y
    BOTTOM = 3,

    /// The face pointing towards positive Z
    FRONT = 4,

    /// The face pointing towards negative Z
    BACK = 5,
}

impl BlockSide {
    /// Returns an array containing all six block faces in index order.
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::RIGHT,
            BlockSide::LEFT,
            BlockSide::TOP,
            BlockSide::BOTTOM,
            BlockSide::FRONT,
            BlockSide::BACK,
        ]
    }

    /// Unit step towards the neighbor this face looks at.
    pub fn offset(self) -> [i32; 3] {
        match self {
            BlockSide::RIGHT => [1, 0, 0],
            BlockSide::LEFT => [-1, 0, 0],
            BlockSide::TOP => [0, 1, 0],
            BlockSide::BOTTOM => [0, -1, 0],
            BlockSide::FRONT => [0, 0, 1],
            BlockSide::BACK => [0, 0, -1],
        }
    }

    pub fn normal(self) -> [f32; 3] {
        let [x, y, z] = self.offset();
        [x as f32, y as f32, z as f32]
    }

    pub fn opposite(self) -> BlockSide {
        match self {
            BlockSide::RIGHT => BlockSide::LEFT,
            BlockSide::LEFT => BlockSide::RIGHT,
            BlockSide::TOP => BlockSide::BOTTOM,
            BlockSide::BOTTOM => BlockSide::TOP,
            BlockSide::FRONT => BlockSide::BACK,
            BlockSide::BACK => BlockSide::FRONT,
        }
    }

    /// Axis the face is perpendicular to: 0 for X, 1 for Y, 2 for Z.
    pub fn axis(self) -> usize {
        self as usize / 2
    }

    /// Whether the face points along the positive direction of its axis.
    pub fn is_positive(self) -> bool {
        self as usize % 2 == 0
    }

    /// The face crossed when entering a voxel by stepping `step` along `axis`.
    ///
    /// Stepping towards +X enters the next voxel through its -X face.
    pub fn entered_through(axis: usize, step: i32) -> BlockSide {
        match (axis, step > 0) {
            (0, true) => BlockSide::LEFT,
            (0, false) => BlockSide::RIGHT,
            (1, true) => BlockSide::BOTTOM,
            (1, false) => BlockSide::TOP,
            (_, true) => BlockSide::BACK,
            (_, false) => BlockSide::FRONT,
        }
    }

    /// The sides that cross chunk boundaries. Chunks span the full world
    /// height, so only X and Z faces ever have a neighbor chunk.
    pub fn horizontal() -> [BlockSide; 4] {
        [
            BlockSide::RIGHT,
            BlockSide::LEFT,
            BlockSide::FRONT,
            BlockSide::BACK,
        ]
    }
}
