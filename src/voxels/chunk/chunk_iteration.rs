//! # Chunk Iteration Module
//!
//! Iteration over the non-air voxels of a chunk.
//!
//! The `ChunkVoxelIterator` walks the chunk's `solid_array` bit vector and
//! jumps straight to set bits, so runs of air cost one word scan instead of a
//! lookup per slot.

use bitvec::slice::IterOnes;
use bitvec::order::Lsb0;
use cgmath::Point3;

use crate::voxels::block::Voxel;

use super::Chunk;

/// An iterator over all non-air voxels in a chunk, in index order.
///
/// Yields the local position of each voxel along with the voxel itself.
pub struct ChunkVoxelIterator<'a> {
    /// Reference to the chunk being iterated over
    chunk_ref: &'a Chunk,
    /// Indices of the set bits in the chunk's solid array
    solid_indices: IterOnes<'a, usize, Lsb0>,
}

impl<'a> ChunkVoxelIterator<'a> {
    pub fn new(chunk_ref: &'a Chunk) -> Self {
        ChunkVoxelIterator {
            chunk_ref,
            solid_indices: chunk_ref.solid_array.iter_ones(),
        }
    }
}

impl<'a> Iterator for ChunkVoxelIterator<'a> {
    type Item = (Point3<usize>, Voxel);

    fn next(&mut self) -> Option<Self::Item> {
        for index in self.solid_indices.by_ref() {
            if let Some(voxel) = self.chunk_ref.voxels[index] {
                return Some((self.chunk_ref.coords(index), voxel));
            }
        }
        None
    }
}
