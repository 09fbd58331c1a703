//! # World Module
//!
//! This module provides the `World` struct which manages a collection of chunks in the voxel world.
//! It is the single source of truth for voxel occupancy and hides chunk boundaries from
//! callers working in world coordinates.
//!
//! ## Architecture
//!
//! The world uses a sparse storage approach where only chunks that have been created,
//! loaded or generated are kept in memory. Chunks are tiled on the horizontal `(x, z)`
//! grid and span the full world height, so the height of the world equals the chunk size.
//!
//! Chunks never reference each other. Anything that needs a neighbor (meshing,
//! lighting, boundary dirtying) looks it up here by coordinate.
//!
//! ## Bounds
//!
//! - Reads outside `[0, height)` or inside unloaded chunks return air
//! - Writes outside `[0, height)` are ignored and reported as not applied
//! - Reads never create chunks

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::Path;

use log::{debug, error, trace, warn};

use crate::config::WorldConfig;
use crate::persistence::{self, PersistenceError};
use crate::voxels::block::Voxel;
use crate::voxels::chunk::{Chunk, ChunkCoord, ChunkGenerator};

/// Full intensity, used for sky light and for air above the world.
pub const MAX_LIGHT: u8 = 255;

/// Where a chunk handed out by `World::load_or_generate` came from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChunkOrigin {
    /// The chunk was already in memory and was left untouched.
    Resident,
    /// The chunk was read from persisted storage.
    Loaded,
    /// No usable persisted data existed and the generator populated the chunk.
    Generated,
}

/// Represents a voxel world composed of multiple chunks.
///
/// # Examples
///
/// ```
/// use voxel_world::config::WorldConfig;
/// use voxel_world::voxels::block::Voxel;
/// use voxel_world::voxels::world::World;
///
/// let mut world = World::new(WorldConfig::with_chunk_size(16));
/// world.set(3, 4, -5, Some(Voxel::new(1)));
/// assert_eq!(world.voxel(3, 4, -5), Some(Voxel::new(1)));
/// assert_eq!(world.voxel(3, 5, -5), None);
/// ```
pub struct World {
    config: WorldConfig,

    /// A mapping from chunk coordinates to chunk data.
    chunks: HashMap<ChunkCoord, Chunk>,
}

impl World {
    /// Creates a new, empty world.
    ///
    /// # Panics
    /// Panics if `config.chunk_size` is zero.
    pub fn new(config: WorldConfig) -> Self {
        assert!(config.chunk_size > 0, "chunk size must be positive");
        World {
            config,
            chunks: HashMap::new(),
        }
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.config.seed
    }

    pub fn chunk_size(&self) -> usize {
        self.config.chunk_size
    }

    /// Height of the world in voxels. Valid `y` values are `0..height`.
    pub fn height(&self) -> i32 {
        self.config.chunk_size as i32
    }

    /// Adds an empty chunk at the given chunk coordinates if none exists yet.
    ///
    /// # Returns
    /// The chunk at `(cx, cz)`, either the newly created one or the one that was
    /// already registered.
    pub fn add_chunk(&mut self, cx: i32, cz: i32) -> &mut Chunk {
        let size = self.config.chunk_size;
        let coord = ChunkCoord::new(cx, cz);
        self.chunks.entry(coord).or_insert_with(|| {
            debug!("Created empty chunk {}", coord);
            Chunk::new(coord, size)
        })
    }

    /// Registers a chunk, replacing whatever was at its coordinate.
    ///
    /// Loaded chunks within light reach are marked dirty since their boundary
    /// faces and light may change.
    ///
    /// # Panics
    /// Panics if the chunk's size differs from the world's chunk size.
    pub fn insert_chunk(&mut self, chunk: Chunk) -> Option<Chunk> {
        assert_eq!(
            chunk.size(),
            self.config.chunk_size,
            "chunk {} has the wrong size",
            chunk.position
        );
        let coord = chunk.position;
        let previous = self.chunks.insert(coord, chunk);
        self.mark_neighbors_dirty(coord);
        previous
    }

    /// Creates (or resets) the chunk at `(cx, cz)` and populates it with `generator`.
    pub fn generate_chunk(
        &mut self,
        cx: i32,
        cz: i32,
        generator: &dyn ChunkGenerator,
    ) -> &mut Chunk {
        let coord = ChunkCoord::new(cx, cz);
        let mut chunk = Chunk::new(coord, self.config.chunk_size);
        generator.generate(&mut chunk, self.config.seed);
        debug!(
            "Generated chunk {} with {} solid voxels",
            coord,
            chunk.solid_count()
        );
        self.mark_neighbors_dirty(coord);
        match self.chunks.entry(coord) {
            Entry::Occupied(mut entry) => {
                entry.insert(chunk);
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(chunk),
        }
    }

    /// Makes the chunk at `(cx, cz)` resident, preferring persisted data.
    ///
    /// A missing file falls back to `generator`. A corrupt or unreadable file is
    /// logged and also falls back to `generator`: the in-memory world stays
    /// playable even when storage is not.
    pub fn load_or_generate(
        &mut self,
        cx: i32,
        cz: i32,
        directory: &Path,
        generator: &dyn ChunkGenerator,
    ) -> ChunkOrigin {
        if self.chunks.contains_key(&ChunkCoord::new(cx, cz)) {
            return ChunkOrigin::Resident;
        }

        match persistence::read_chunk(directory, cx, cz, self.config.chunk_size) {
            Ok(chunk) => {
                debug!("Loaded chunk {} from {}", chunk.position, directory.display());
                self.insert_chunk(chunk);
                return ChunkOrigin::Loaded;
            }
            Err(PersistenceError::NotFound { .. }) => {
                trace!("No saved data for chunk ({}, {})", cx, cz);
            }
            Err(err @ PersistenceError::Corrupt { .. }) => {
                warn!("Regenerating chunk ({}, {}): {}", cx, cz, err);
            }
            Err(err) => {
                error!("Regenerating chunk ({}, {}): {}", cx, cz, err);
            }
        }

        self.generate_chunk(cx, cz, generator);
        ChunkOrigin::Generated
    }

    /// Removes a chunk from the world and hands it back to the caller.
    pub fn evict_chunk(&mut self, cx: i32, cz: i32) -> Option<Chunk> {
        let coord = ChunkCoord::new(cx, cz);
        let chunk = self.chunks.remove(&coord)?;
        self.mark_neighbors_dirty(coord);
        debug!("Evicted chunk {}", coord);
        Some(chunk)
    }

    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    pub fn chunk_mut(&mut self, coord: ChunkCoord) -> Option<&mut Chunk> {
        self.chunks.get_mut(&coord)
    }

    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Coordinates of every chunk whose mesh or light is stale, in sorted order.
    pub fn dirty_chunks(&self) -> Vec<ChunkCoord> {
        let mut dirty: Vec<ChunkCoord> = self
            .chunks
            .values()
            .filter(|chunk| chunk.is_dirty())
            .map(|chunk| chunk.position)
            .collect();
        dirty.sort();
        dirty
    }

    /// Marks every loaded chunk other than `except` that has a column within light
    /// reach of the world-space columns `min..=max` dirty.
    fn mark_dirty_within_reach(&mut self, min: (i32, i32), max: (i32, i32), except: ChunkCoord) {
        let size = self.config.chunk_size;
        let reach = self.config.light_reach() as i32;
        let low = ChunkCoord::from_world(
            min.0.saturating_sub(reach),
            min.1.saturating_sub(reach),
            size,
        );
        let high = ChunkCoord::from_world(
            max.0.saturating_add(reach),
            max.1.saturating_add(reach),
            size,
        );
        for cx in low.x..=high.x {
            for cz in low.z..=high.z {
                let coord = ChunkCoord::new(cx, cz);
                if coord == except {
                    continue;
                }
                if let Some(chunk) = self.chunks.get_mut(&coord) {
                    chunk.mark_dirty();
                }
            }
        }
    }

    /// Marks the loaded chunks around a whole chunk dirty, after it appeared or left.
    fn mark_neighbors_dirty(&mut self, coord: ChunkCoord) {
        let size = self.config.chunk_size as i32;
        let origin = coord.origin(self.config.chunk_size);
        let max = (origin.x + size - 1, origin.z + size - 1);
        self.mark_dirty_within_reach((origin.x, origin.z), max, coord);
    }

    /// Replaces the voxel at a world position.
    ///
    /// The owning chunk is created if needed and marked dirty. Every loaded chunk
    /// with a column within light reach of the position is marked dirty too: its
    /// light, and for a boundary position the visibility of its boundary faces,
    /// may have changed. Their voxels are not touched.
    ///
    /// # Returns
    /// `false` if `y` is outside the world and the write was ignored.
    pub fn set(&mut self, x: i32, y: i32, z: i32, voxel: Option<Voxel>) -> bool {
        if !(0..self.height()).contains(&y) {
            trace!("Ignoring write outside the world at ({}, {}, {})", x, y, z);
            return false;
        }

        let size = self.config.chunk_size;
        let coord = ChunkCoord::from_world(x, z, size);
        let (lx, lz) = (ChunkCoord::local(x, size), ChunkCoord::local(z, size));

        self.add_chunk(coord.x, coord.z)
            .set(lx, y as usize, lz, voxel);

        self.mark_dirty_within_reach((x, z), (x, z), coord);

        true
    }

    /// Returns the voxel at a world position, or `None` for air, for positions
    /// outside the world, and for unloaded chunks.
    pub fn voxel(&self, x: i32, y: i32, z: i32) -> Option<Voxel> {
        let (chunk, lx, lz) = self.locate(x, y, z)?;
        chunk.at(lx, y, lz)
    }

    pub fn is_solid(&self, x: i32, y: i32, z: i32) -> bool {
        self.locate(x, y, z)
            .map(|(chunk, lx, lz)| chunk.is_solid(lx, y, lz))
            .unwrap_or(false)
    }

    /// Light intensity at a world position.
    ///
    /// Above the world is open sky and reads as `MAX_LIGHT`. Below the world and
    /// inside unloaded chunks reads as 0.
    pub fn light_at(&self, x: i32, y: i32, z: i32) -> u8 {
        if y >= self.height() {
            return MAX_LIGHT;
        }
        self.locate(x, y, z)
            .map(|(chunk, lx, lz)| chunk.light_at(lx, y, lz))
            .unwrap_or(0)
    }

    /// Resolves a world position to its loaded chunk and local `(x, z)`.
    fn locate(&self, x: i32, y: i32, z: i32) -> Option<(&Chunk, i32, i32)> {
        if !(0..self.height()).contains(&y) {
            return None;
        }
        let size = self.config.chunk_size;
        let chunk = self.chunks.get(&ChunkCoord::from_world(x, z, size))?;
        Some((
            chunk,
            ChunkCoord::local(x, size) as i32,
            ChunkCoord::local(z, size) as i32,
        ))
    }

    /// Height of the ground in the column containing `position`.
    ///
    /// # Returns
    /// The top surface of the topmost solid voxel, i.e. its `y + 1`. A column that
    /// is entirely air, or lies in an unloaded chunk, returns `0.0`, the floor of
    /// the world.
    pub fn height_at(&self, position: cgmath::Point3<f32>) -> f32 {
        let x = position.x.floor() as i32;
        let z = position.z.floor() as i32;
        (0..self.height())
            .rev()
            .find(|&y| self.is_solid(x, y, z))
            .map(|y| (y + 1) as f32)
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Point3;

    fn world() -> World {
        World::new(WorldConfig::with_chunk_size(8))
    }

    #[test]
    fn add_chunk_returns_existing_chunk() {
        let mut world = world();
        world.add_chunk(1, 1).set(0, 0, 0, Some(Voxel::new(3)));
        let again = world.add_chunk(1, 1);
        assert_eq!(again.at(0, 0, 0), Some(Voxel::new(3)));
        assert_eq!(world.len(), 1);
    }

    #[test]
    fn reads_never_create_chunks() {
        let world = world();
        assert_eq!(world.voxel(100, 2, -100), None);
        assert_eq!(world.light_at(100, 2, -100), 0);
        assert!(world.is_empty());
    }

    #[test]
    fn set_resolves_negative_coordinates() {
        let mut world = world();
        assert!(world.set(-1, 0, -9, Some(Voxel::new(2))));
        let chunk = world.chunk(ChunkCoord::new(-1, -2)).unwrap();
        assert_eq!(chunk.at(7, 0, 7), Some(Voxel::new(2)));
    }

    #[test]
    fn light_above_the_world_is_sky() {
        let world = world();
        assert_eq!(world.light_at(0, 8, 0), MAX_LIGHT);
        assert_eq!(world.light_at(0, -1, 0), 0);
    }

    #[test]
    fn height_at_uses_the_floor_of_the_position() {
        let mut world = world();
        world.set(-1, 3, 0, Some(Voxel::new(1)));
        assert_eq!(world.height_at(Point3::new(-0.5, 20.0, 0.9)), 4.0);
        assert_eq!(world.height_at(Point3::new(0.5, 20.0, 0.9)), 0.0);
    }

    #[test]
    fn evicting_marks_neighbors_dirty() {
        let mut world = world();
        world.add_chunk(0, 0);
        world.add_chunk(1, 0).clear_dirty();
        let evicted = world.evict_chunk(0, 0).unwrap();
        assert_eq!(evicted.position, ChunkCoord::new(0, 0));
        assert!(world.chunk(ChunkCoord::new(1, 0)).unwrap().is_dirty());
        assert!(world.evict_chunk(0, 0).is_none());
    }
}
