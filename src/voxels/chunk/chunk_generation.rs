//! # Chunk Generation
//!
//! The interface the `World` uses to populate chunks that have no persisted
//! data, plus a few reference generators. Terrain heuristics proper belong to
//! an external collaborator; these exist for tests, tools and the demo.

use noise::{NoiseFn, Perlin};

use crate::config::materials;
use crate::voxels::block::Voxel;

use super::Chunk;

/// Fills a freshly created, air-filled chunk.
pub trait ChunkGenerator {
    fn generate(&self, chunk: &mut Chunk, seed: u64);
}

/// Leaves the chunk empty.
pub struct EmptyGenerator;

impl ChunkGenerator for EmptyGenerator {
    fn generate(&self, _chunk: &mut Chunk, _seed: u64) {}
}

/// Fills every slot below `height` with one voxel.
pub struct FlatGenerator {
    pub height: usize,
    pub voxel: Voxel,
}

impl ChunkGenerator for FlatGenerator {
    fn generate(&self, chunk: &mut Chunk, _seed: u64) {
        let size = chunk.size();
        for y in 0..self.height.min(size) {
            for z in 0..size {
                for x in 0..size {
                    chunk.set(x, y, z, Some(self.voxel));
                }
            }
        }
    }
}

/// Scaling factor applied to world coordinates when sampling the rock layer.
pub const ROCK_SCALE_FACTOR: f64 = 1.0 / 40.0;
/// Scaling factor applied to world coordinates when sampling the grass layer.
pub const GRASS_SCALE_FACTOR: f64 = 1.0 / 28.0;
/// Scaling factor applied to world coordinates when sampling the cloud layer.
pub const CLOUD_SCALE_FACTOR: f64 = 1.0 / 40.0;

/// Layered heightmap terrain: a dark rock floor, rolling grass hills, rock
/// outcrops, and a band of clouds near the top of the world.
///
/// Heights are expressed as fractions of the chunk size so the same generator
/// works for any configured size.
pub struct PerlinGenerator {
    /// Height of the flat grass plane, as a fraction of the world height.
    pub grass_level: f64,
    /// Maximum height of the grass hills above the plane.
    pub grass_amplitude: f64,
    /// Maximum height of the rock outcrops.
    pub rock_amplitude: f64,
    /// Whether to place clouds at all.
    pub clouds: bool,
}

impl Default for PerlinGenerator {
    fn default() -> Self {
        PerlinGenerator {
            grass_level: 0.25,
            grass_amplitude: 0.28,
            rock_amplitude: 1.0,
            clouds: true,
        }
    }
}

impl PerlinGenerator {
    /// Maps noise in `[-1, 1]` to `[0, 1]`.
    fn sample(noise: &Perlin, x: i32, y: i32, z: i32, scale: f64) -> f64 {
        let value = noise.get([x as f64 * scale, y as f64 * scale, z as f64 * scale]);
        ((value + 1.0) / 2.0).clamp(0.0, 1.0)
    }
}

impl ChunkGenerator for PerlinGenerator {
    fn generate(&self, chunk: &mut Chunk, seed: u64) {
        let size = chunk.size();
        let height = size as f64;
        let origin = chunk.origin();

        let rock_noise = Perlin::new(seed.wrapping_add(10000) as u32);
        let grass_noise = Perlin::new(seed.wrapping_add(10002) as u32);
        let cloud_noise = Perlin::new(seed.wrapping_add(24511626) as u32);

        let grass_height = (self.grass_level * height) as i32;
        let cloud_center = (0.85 * height) as i32;

        for z in 0..size {
            for x in 0..size {
                let wx = origin.x + x as i32;
                let wz = origin.z + z as i32;
                let gh = (self.grass_amplitude
                    * height
                    * Self::sample(&grass_noise, wx, 0, wz, GRASS_SCALE_FACTOR))
                    as i32;
                // Squaring keeps most columns flat and lets a few peaks through.
                let rh = (self.rock_amplitude
                    * height
                    * Self::sample(&rock_noise, wx, 0, wz, ROCK_SCALE_FACTOR).powi(2))
                    as i32;

                for y in 0..size {
                    let wy = y as i32;
                    let mut material = None;

                    if wy < grass_height {
                        material = Some(materials::DARK_ROCK);
                    }
                    if wy >= grass_height && wy <= grass_height + gh {
                        material = Some(materials::GRASS);
                    }
                    if wy < rh {
                        material = Some(materials::ROCK);
                    }
                    if self.clouds {
                        let ch = Self::sample(&cloud_noise, wx, wy, wz, CLOUD_SCALE_FACTOR);
                        let thickness = (4.0 * ch) as i32;
                        if ch > 0.7 && (wy - cloud_center).abs() <= thickness {
                            material = Some(materials::CLOUD);
                        }
                    }

                    if let Some(material) = material {
                        chunk.set(x, y, z, Some(Voxel::new(material)));
                    }
                }
            }
        }
    }
}
