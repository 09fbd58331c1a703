//! # Lighting Module
//!
//! Flood-fill light propagation over a chunk's voxel grid.
//!
//! ## Algorithm
//!
//! A breadth-first search from every light source at once, over the chunk and a
//! margin of surrounding columns as wide as light can travel:
//! 1. Sky: every air voxel between the top of the world and the first solid voxel
//!    of its column starts at `MAX_LIGHT`
//! 2. Emitters: voxels whose material has a non-zero emission start at that emission
//!
//! From there light spreads to the six neighbors, losing `light_attenuation` per
//! step. Solid voxels absorb light and do not pass it on. A cell keeps the brightest
//! value any path brings it and is only re-queued when that value strictly improves,
//! so the search terminates and its result does not depend on queue order.
//!
//! Light reaching the chunk from its neighbors is found by running the search
//! through their voxels, never by reading their stored light, so a chunk's field
//! depends only on the voxels around it. Cells of unloaded chunks are opaque.
//! Any source outside the margin is too far away to reach the chunk.
//!
//! The field is recomputed from scratch on every call, never patched.

use std::collections::VecDeque;

use bitvec::vec::BitVec;
use log::debug;

use crate::config::{Palette, WorldConfig};
use crate::voxels::block::block_side::BlockSide;
use crate::voxels::chunk::{Chunk, ChunkCoord};
use crate::voxels::world::{World, MAX_LIGHT};

/// Computes per-voxel light intensity for chunks of a `World`.
pub struct LightPropagator {
    attenuation: u8,
    reach: usize,
    palette: Palette,
}

impl LightPropagator {
    pub fn new(config: &WorldConfig) -> Self {
        LightPropagator {
            attenuation: config.light_attenuation.max(1),
            reach: config.light_reach(),
            palette: config.palette.clone(),
        }
    }

    /// Recomputes the light field of the chunk at `coord` and stores it in the chunk.
    ///
    /// Must be called again for a chunk whenever a voxel within light reach of it
    /// changes. `World` marks those chunks dirty.
    ///
    /// # Returns
    /// `false` if no chunk is loaded at `coord`.
    pub fn calculate(&self, world: &mut World, coord: ChunkCoord) -> bool {
        let Some(field) = self.compute_field(world, coord) else {
            return false;
        };
        match world.chunk_mut(coord) {
            Some(chunk) => {
                chunk.set_light_field(field);
                true
            }
            None => false,
        }
    }

    /// Computes the light field of the chunk at `coord` without storing it.
    pub fn compute_field(&self, world: &World, coord: ChunkCoord) -> Option<Vec<u8>> {
        let chunk = world.chunk(coord)?;
        let region = LightRegion::around(world, chunk, self.reach);
        let mut field = vec![0u8; region.opaque.len()];
        let mut queue = VecDeque::new();

        self.seed_emitters(world, &region, &mut field, &mut queue);
        region.seed_sky(&mut field, &mut queue);

        let sources = queue.len();
        self.propagate(&region, &mut field, queue);

        debug!(
            "Lit chunk {} from {} sources within {} columns",
            coord, sources, self.reach
        );
        Some(region.crop(chunk, &field))
    }

    fn seed_emitters(
        &self,
        world: &World,
        region: &LightRegion,
        field: &mut [u8],
        queue: &mut VecDeque<usize>,
    ) {
        let size = region.height;
        let last = region.width as i32 - 1;
        let low = ChunkCoord::from_world(region.min_x, region.min_z, size);
        let high = ChunkCoord::from_world(region.min_x + last, region.min_z + last, size);

        for cx in low.x..=high.x {
            for cz in low.z..=high.z {
                let Some(chunk) = world.chunk(ChunkCoord::new(cx, cz)) else {
                    continue;
                };
                let origin = chunk.position.origin(size);
                for (position, voxel) in chunk.iter_solid() {
                    let emission = self.palette.emission(voxel.material);
                    if emission == 0 {
                        continue;
                    }
                    let column = region.column(
                        origin.x + position.x as i32,
                        origin.z + position.z as i32,
                    );
                    let Some((x, z)) = column else {
                        continue;
                    };
                    let index = region.index(x, position.y, z);
                    if emission > field[index] {
                        field[index] = emission;
                        queue.push_back(index);
                    }
                }
            }
        }
    }

    fn propagate(&self, region: &LightRegion, field: &mut [u8], mut queue: VecDeque<usize>) {
        while let Some(index) = queue.pop_front() {
            let next = field[index].saturating_sub(self.attenuation);
            if next == 0 {
                continue;
            }
            let (x, y, z) = region.coords(index);
            for side in BlockSide::all() {
                let [dx, dy, dz] = side.offset();
                let Some(neighbor) = region.open_cell(x + dx, y + dy, z + dz) else {
                    continue;
                };
                if field[neighbor] < next {
                    field[neighbor] = next;
                    queue.push_back(neighbor);
                }
            }
        }
    }
}

/// A chunk together with every column within light reach of it.
///
/// Region coordinates start at world column `(min_x, min_z)`; the chunk itself
/// sits `margin` columns in on both axes.
struct LightRegion {
    min_x: i32,
    min_z: i32,
    margin: usize,
    width: usize,
    height: usize,
    /// Solid voxels and every cell of an unloaded chunk.
    opaque: BitVec,
}

impl LightRegion {
    fn around(world: &World, chunk: &Chunk, margin: usize) -> Self {
        let size = chunk.size();
        let origin = chunk.position.origin(size);
        let width = size + 2 * margin;
        let mut region = LightRegion {
            min_x: origin.x - margin as i32,
            min_z: origin.z - margin as i32,
            margin,
            width,
            height: size,
            opaque: BitVec::repeat(true, width * width * size),
        };

        for z in 0..width {
            for x in 0..width {
                let (wx, wz) = (region.min_x + x as i32, region.min_z + z as i32);
                let Some(source) = world.chunk(ChunkCoord::from_world(wx, wz, size)) else {
                    continue;
                };
                let lx = ChunkCoord::local(wx, size) as i32;
                let lz = ChunkCoord::local(wz, size) as i32;
                for y in 0..size {
                    let index = region.index(x, y, z);
                    region.opaque.set(index, source.is_solid(lx, y as i32, lz));
                }
            }
        }
        region
    }

    fn index(&self, x: usize, y: usize, z: usize) -> usize {
        x + z * self.width + y * self.width * self.width
    }

    fn coords(&self, index: usize) -> (i32, i32, i32) {
        let x = index % self.width;
        let z = (index / self.width) % self.width;
        let y = index / (self.width * self.width);
        (x as i32, y as i32, z as i32)
    }

    /// Region column of a world column, if it lies inside the region.
    fn column(&self, wx: i32, wz: i32) -> Option<(usize, usize)> {
        let x = usize::try_from(wx.checked_sub(self.min_x)?).ok()?;
        let z = usize::try_from(wz.checked_sub(self.min_z)?).ok()?;
        (x < self.width && z < self.width).then_some((x, z))
    }

    /// Index of a cell that light can enter, `None` if it is opaque or outside.
    fn open_cell(&self, x: i32, y: i32, z: i32) -> Option<usize> {
        let width = self.width as i32;
        if !(0..width).contains(&x) || !(0..self.height as i32).contains(&y) {
            return None;
        }
        if !(0..width).contains(&z) {
            return None;
        }
        let index = self.index(x as usize, y as usize, z as usize);
        (!self.opaque[index]).then_some(index)
    }

    fn seed_sky(&self, field: &mut [u8], queue: &mut VecDeque<usize>) {
        for z in 0..self.width {
            for x in 0..self.width {
                for y in (0..self.height).rev() {
                    let index = self.index(x, y, z);
                    if self.opaque[index] {
                        break;
                    }
                    field[index] = MAX_LIGHT;
                    queue.push_back(index);
                }
            }
        }
    }

    /// The chunk's part of a region field, in chunk index order.
    fn crop(&self, chunk: &Chunk, field: &[u8]) -> Vec<u8> {
        let size = chunk.size();
        let mut light = vec![0u8; size * size * size];
        for y in 0..size {
            for z in 0..size {
                for x in 0..size {
                    light[chunk.index(x, y, z)] =
                        field[self.index(x + self.margin, y, z + self.margin)];
                }
            }
        }
        light
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::materials;
    use crate::voxels::block::Voxel;

    fn setup(size: usize) -> (World, LightPropagator) {
        let config = WorldConfig::with_chunk_size(size);
        let light = LightPropagator::new(&config);
        (World::new(config), light)
    }

    #[test]
    fn open_air_is_fully_lit() {
        let (mut world, light) = setup(4);
        world.add_chunk(0, 0);
        assert!(light.calculate(&mut world, ChunkCoord::new(0, 0)));
        let chunk = world.chunk(ChunkCoord::new(0, 0)).unwrap();
        assert!(chunk.light().iter().all(|&l| l == MAX_LIGHT));
    }

    #[test]
    fn light_under_a_roof_attenuates_per_step() {
        let (mut world, light) = setup(8);
        // Roof over x in 0..4 at y = 5, open elsewhere.
        for x in 0..4 {
            for z in 0..8 {
                world.set(x, 5, z, Some(Voxel::new(materials::ROCK)));
            }
        }
        light.calculate(&mut world, ChunkCoord::new(0, 0));
        assert_eq!(world.light_at(4, 4, 0), MAX_LIGHT);
        assert_eq!(world.light_at(3, 4, 0), MAX_LIGHT - 16);
        assert_eq!(world.light_at(0, 4, 0), MAX_LIGHT - 4 * 16);
        assert_eq!(world.light_at(0, 5, 0), 0, "solid voxels absorb light");
    }

    #[test]
    fn emitters_light_a_sealed_room() {
        let (mut world, light) = setup(8);
        for y in 0..8 {
            for z in 0..8 {
                for x in 0..8 {
                    world.set(x, y, z, Some(Voxel::new(materials::ROCK)));
                }
            }
        }
        world.set(3, 3, 3, None);
        world.set(4, 3, 3, Some(Voxel::new(materials::LAMP)));
        light.calculate(&mut world, ChunkCoord::new(0, 0));
        assert_eq!(world.light_at(4, 3, 3), 255);
        assert_eq!(world.light_at(3, 3, 3), 255 - 16);
    }

    #[test]
    fn missing_chunk_is_reported() {
        let (mut world, light) = setup(4);
        assert!(!light.calculate(&mut world, ChunkCoord::new(3, 3)));
        assert!(light.compute_field(&world, ChunkCoord::new(3, 3)).is_none());
    }
}
