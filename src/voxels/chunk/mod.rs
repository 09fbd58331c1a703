//! # Chunk Module
//!
//! This module provides the `Chunk` struct: a dense `size³` cube of voxel slots
//! with a parallel light field. Chunks are tiled horizontally and span the full
//! height of the world.
//!
//! ## Storage
//!
//! Three arrays of exactly `size³` entries share the index order
//! `x + z * size + y * size²`:
//! - `voxels`: the voxel in each slot, `None` for air
//! - `solid_array`: one bit per slot mirroring `voxels[i].is_some()`, used for
//!   O(1) solidity checks and for skipping air while iterating
//! - `light`: light intensity in `0..=255`, written only by the light propagator

use bitvec::vec::BitVec;
use cgmath::Point3;

use crate::voxels::block::Voxel;

pub use chunk_coord::ChunkCoord;
pub use chunk_generation::{ChunkGenerator, EmptyGenerator, FlatGenerator, PerlinGenerator};
pub use chunk_iteration::ChunkVoxelIterator;

mod chunk_coord;
pub mod chunk_generation;
pub mod chunk_iteration;

/// A cube of voxels at a fixed position on the chunk grid.
#[derive(Clone, Debug)]
pub struct Chunk {
    /// The position of this chunk in chunk coordinates (not voxel coordinates).
    pub position: ChunkCoord,

    /// Edge length in voxels.
    size: usize,

    voxels: Vec<Option<Voxel>>,

    /// One bit per slot, set when the slot holds a voxel.
    solid_array: BitVec,

    light: Vec<u8>,

    /// Set whenever the mesh or light field derived from this chunk is stale.
    dirty: bool,
}

/// An immutable copy of a chunk's voxels, safe to hand to another thread while
/// the live chunk keeps being edited.
#[derive(Clone, Debug, PartialEq)]
pub struct ChunkSnapshot {
    pub position: ChunkCoord,
    pub size: usize,
    pub voxels: Vec<Option<Voxel>>,
}

impl Chunk {
    /// Creates a new, completely empty chunk (all slots are air).
    ///
    /// The chunk starts dirty since it has never been meshed or lit.
    pub fn new(position: ChunkCoord, size: usize) -> Self {
        let volume = size * size * size;
        Chunk {
            position,
            size,
            voxels: vec![None; volume],
            solid_array: BitVec::repeat(false, volume),
            light: vec![0; volume],
            dirty: true,
        }
    }

    /// Rebuilds a chunk from a full voxel array, e.g. one read from disk.
    ///
    /// # Panics
    /// Panics if `voxels.len()` is not `size³`.
    pub fn from_voxels(position: ChunkCoord, size: usize, voxels: Vec<Option<Voxel>>) -> Self {
        let volume = size * size * size;
        assert_eq!(
            voxels.len(),
            volume,
            "chunk {} expects {} voxels, got {}",
            position,
            volume,
            voxels.len()
        );

        let mut solid_array = BitVec::repeat(false, volume);
        for (index, voxel) in voxels.iter().enumerate() {
            if voxel.is_some() {
                solid_array.set(index, true);
            }
        }

        Chunk {
            position,
            size,
            voxels,
            solid_array,
            light: vec![0; volume],
            dirty: true,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// World position of the chunk's local `(0, 0, 0)`.
    pub fn origin(&self) -> Point3<i32> {
        self.position.origin(self.size)
    }

    fn in_bounds(&self, x: i32, y: i32, z: i32) -> bool {
        let size = self.size as i32;
        (0..size).contains(&x) && (0..size).contains(&y) && (0..size).contains(&z)
    }

    /// Flattened index of a local position.
    pub fn index(&self, x: usize, y: usize, z: usize) -> usize {
        x + z * self.size + y * self.size * self.size
    }

    /// Local position of a flattened index.
    pub fn coords(&self, index: usize) -> Point3<usize> {
        let x = index % self.size;
        let z = (index / self.size) % self.size;
        let y = index / (self.size * self.size);
        Point3::new(x, y, z)
    }

    /// Returns the voxel at a local position, or `None` for air.
    ///
    /// Positions outside `[0, size)` on any axis read as air, so face tests at
    /// the chunk edge can look past it without special cases.
    pub fn at(&self, x: i32, y: i32, z: i32) -> Option<Voxel> {
        if !self.in_bounds(x, y, z) {
            return None;
        }
        self.voxels[self.index(x as usize, y as usize, z as usize)]
    }

    /// Checks if the slot at the local position holds a voxel.
    ///
    /// # Returns
    /// `true` if the slot is solid, `false` if it's air or out of bounds.
    pub fn is_solid(&self, x: i32, y: i32, z: i32) -> bool {
        if !self.in_bounds(x, y, z) {
            return false;
        }
        self.solid_array[self.index(x as usize, y as usize, z as usize)]
    }

    /// Replaces the voxel at a local position and marks the chunk dirty.
    ///
    /// # Panics
    /// Panics if the position is outside the chunk. Callers resolve world
    /// coordinates to the owning chunk first, so this is a programming error.
    pub fn set(&mut self, x: usize, y: usize, z: usize, voxel: Option<Voxel>) {
        assert!(
            x < self.size && y < self.size && z < self.size,
            "local position ({}, {}, {}) is outside chunk {} of size {}",
            x,
            y,
            z,
            self.position,
            self.size
        );
        let index = self.index(x, y, z);
        self.voxels[index] = voxel;
        self.solid_array.set(index, voxel.is_some());
        self.dirty = true;
    }

    /// Light intensity at a local position, 0 outside the chunk.
    pub fn light_at(&self, x: i32, y: i32, z: i32) -> u8 {
        if !self.in_bounds(x, y, z) {
            return 0;
        }
        self.light[self.index(x as usize, y as usize, z as usize)]
    }

    /// Replaces the whole light field.
    ///
    /// # Panics
    /// Panics if `field` does not have one entry per slot.
    pub fn set_light_field(&mut self, field: Vec<u8>) {
        assert_eq!(field.len(), self.light.len(), "light field size mismatch");
        self.light = field;
    }

    pub fn light(&self) -> &[u8] {
        &self.light
    }

    pub fn voxels(&self) -> &[Option<Voxel>] {
        &self.voxels
    }

    /// Number of solid voxels in the chunk.
    pub fn solid_count(&self) -> usize {
        self.solid_array.count_ones()
    }

    /// Iterates the non-air voxels in index order.
    pub fn iter_solid(&self) -> ChunkVoxelIterator<'_> {
        ChunkVoxelIterator::new(self)
    }

    /// Copies the voxel array for a background writer.
    pub fn snapshot(&self) -> ChunkSnapshot {
        ChunkSnapshot {
            position: self.position,
            size: self.size,
            voxels: self.voxels.clone(),
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }
}
