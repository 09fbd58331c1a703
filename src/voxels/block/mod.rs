//! # Block Module
//!
//! The voxel value type and the six faces it is rendered with.
//!
//! Air is not a voxel: empty cells hold `None` wherever an `Option<Voxel>` is
//! stored, so a placed voxel is always solid.

use block_side::BlockSide;

pub mod block_side;

/// Index into the world palette.
pub type MaterialId = u8;

/// Texture ids for each face, indexed by `BlockSide as usize`.
pub type FaceTextures = [u16; 6];

/// A single solid voxel.
///
/// Voxels are plain values. Editing the world replaces a voxel wholesale, it
/// is never mutated in place.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Voxel {
    /// Palette entry providing the color and light emission.
    pub material: MaterialId,
    /// Optional per-face texture ids. `None` renders with the flat palette color.
    pub faces: Option<FaceTextures>,
}

impl Voxel {
    /// Creates a flat-colored voxel of the given material.
    pub const fn new(material: MaterialId) -> Self {
        Voxel {
            material,
            faces: None,
        }
    }

    /// Creates a voxel with a texture per face.
    pub const fn textured(material: MaterialId, faces: FaceTextures) -> Self {
        Voxel {
            material,
            faces: Some(faces),
        }
    }

    /// Texture id used on `side`, if the voxel is textured.
    pub fn texture(&self, side: BlockSide) -> Option<u16> {
        self.faces.map(|faces| faces[side as usize])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn textures_are_looked_up_per_side() {
        let voxel = Voxel::textured(2, [10, 11, 12, 13, 14, 15]);
        assert_eq!(voxel.texture(BlockSide::TOP), Some(12));
        assert_eq!(voxel.texture(BlockSide::BACK), Some(15));
        assert_eq!(Voxel::new(2).texture(BlockSide::TOP), None);
    }
}
