use cgmath::Point3;

use crate::voxels::block::block_side::BlockSide;
use crate::voxels::block::Voxel;

/// What a face looks like. Only faces with equal keys may be merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FaceKey {
    /// The voxel the face belongs to, carrying its material and textures
    pub voxel: Voxel,
    /// Light in the air cell the face looks into
    pub light: u8,
}

/// Represents a single quad face in the mesh.
///
/// A face is defined by four corner points (lower-left, lower-right, upper-right,
/// upper-left) in chunk-local coordinates. Walking `ll -> lr -> ur -> ul` is
/// counter-clockwise when seen from outside the voxel. `ll -> lr` is the face's
/// "right" direction and `ll -> ul` its "up" direction; the greedy mesher grows
/// faces along those two directions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    /// Lower-left corner of the face in chunk coordinates
    pub ll: Point3<usize>,
    /// Lower-right corner of the face in chunk coordinates
    pub lr: Point3<usize>,
    /// Upper-left corner of the face in chunk coordinates
    pub ul: Point3<usize>,
    /// Upper-right corner of the face in chunk coordinates
    pub ur: Point3<usize>,
    pub key: FaceKey,
    /// Which side of the voxel this face represents
    pub block_side: BlockSide,
}

impl Face {
    /// Creates the unit face on `block_side` of the voxel at `(i, j, k)`.
    pub fn new(i: usize, j: usize, k: usize, key: FaceKey, block_side: BlockSide) -> Self {
        let (ll, lr, ul, ur) = match block_side {
            BlockSide::RIGHT => (
                Point3::new(i + 1, j, k + 1),
                Point3::new(i + 1, j, k),
                Point3::new(i + 1, j + 1, k + 1),
                Point3::new(i + 1, j + 1, k),
            ),
            BlockSide::LEFT => (
                Point3::new(i, j, k),
                Point3::new(i, j, k + 1),
                Point3::new(i, j + 1, k),
                Point3::new(i, j + 1, k + 1),
            ),
            BlockSide::TOP => (
                Point3::new(i, j + 1, k),
                Point3::new(i, j + 1, k + 1),
                Point3::new(i + 1, j + 1, k),
                Point3::new(i + 1, j + 1, k + 1),
            ),
            BlockSide::BOTTOM => (
                Point3::new(i, j, k),
                Point3::new(i + 1, j, k),
                Point3::new(i, j, k + 1),
                Point3::new(i + 1, j, k + 1),
            ),
            BlockSide::FRONT => (
                Point3::new(i, j, k + 1),
                Point3::new(i + 1, j, k + 1),
                Point3::new(i, j + 1, k + 1),
                Point3::new(i + 1, j + 1, k + 1),
            ),
            BlockSide::BACK => (
                Point3::new(i + 1, j, k),
                Point3::new(i, j, k),
                Point3::new(i + 1, j + 1, k),
                Point3::new(i, j + 1, k),
            ),
        };

        Face {
            ll,
            lr,
            ul,
            ur,
            key,
            block_side,
        }
    }

    /// Attempts to merge this face with another face that is directly above it.
    ///
    /// # Returns
    /// `Some(merged_face)` if the faces can be merged, or `None` if they cannot be merged.
    ///
    /// # Note
    /// Faces can only be merged if they have the same key and their edges align perfectly.
    pub fn merge_up(&self, other: &Face) -> Option<Face> {
        if self.block_side == other.block_side
            && self.key == other.key
            && self.ul == other.ll
            && self.ur == other.lr
        {
            return Some(Face {
                ul: other.ul,
                ur: other.ur,
                ll: self.ll,
                lr: self.lr,
                key: self.key,
                block_side: self.block_side,
            });
        }

        None
    }

    /// Attempts to merge this face with another face that is directly to its right.
    ///
    /// # Returns
    /// `Some(merged_face)` if the faces can be merged, or `None` if they cannot be merged.
    pub fn merge_right(&self, other: &Face) -> Option<Face> {
        if self.block_side == other.block_side
            && self.key == other.key
            && self.lr == other.ll
            && self.ur == other.ul
        {
            return Some(Face {
                ul: self.ul,
                ur: other.ur,
                ll: self.ll,
                lr: other.lr,
                key: self.key,
                block_side: self.block_side,
            });
        }

        None
    }

    /// Extent of the face along its right direction, in voxels.
    pub fn width(&self) -> usize {
        manhattan(self.ll, self.lr)
    }

    /// Extent of the face along its up direction, in voxels.
    pub fn height(&self) -> usize {
        manhattan(self.ll, self.ul)
    }
}

fn manhattan(a: Point3<usize>, b: Point3<usize>) -> usize {
    a.x.abs_diff(b.x) + a.y.abs_diff(b.y) + a.z.abs_diff(b.z)
}
