//! # Meshing Module
//!
//! Converts the voxels of one chunk into renderable quads.
//!
//! A face is emitted for every side of a solid voxel whose neighbor on that
//! side is air. Neighbors across a chunk boundary are read through the `World`,
//! so an absent neighbor chunk counts as air and its side of the boundary is
//! drawn; once the neighbor is loaded and this chunk is rebuilt, the hidden
//! faces disappear.
//!
//! ## Slicing
//!
//! Each side is processed as `size` layers perpendicular to its normal, each
//! layer as `size` rows, each row as `size` cells. Cells are visited in the
//! face's own "right" and "up" directions (see `Face`), so the greedy passes can
//! grow faces with `merge_right` and `merge_up` alone:
//!
//! | Side   | layer | row (up) | column (right) |
//! |--------|-------|----------|----------------|
//! | RIGHT  | +x    | +y       | -z             |
//! | LEFT   | +x    | +y       | +z             |
//! | TOP    | +y    | +x       | +z             |
//! | BOTTOM | +y    | +z       | +x             |
//! | FRONT  | +z    | +y       | +x             |
//! | BACK   | +z    | +y       | -x             |
//!
//! The order (side, layer, row, column) is fixed, which makes the output
//! deterministic.

pub mod mesh;
pub mod vertex;

use cgmath::Point3;
use log::debug;
use web_time::Instant;

use crate::config::{Palette, WorldConfig};
use crate::voxels::block::block_side::BlockSide;
use crate::voxels::chunk::{Chunk, ChunkCoord};
use crate::voxels::world::World;

use mesh::face::{Face, FaceKey};
use mesh::{greedy, Mesh};

/// Builds chunk meshes from a `World`.
pub struct Mesher {
    palette: Palette,
    greedy: bool,
    min_shade: f32,
}

impl Mesher {
    pub fn new(config: &WorldConfig) -> Self {
        Mesher {
            palette: config.palette.clone(),
            greedy: config.greedy_meshing,
            min_shade: config.min_shade.clamp(0.0, 1.0),
        }
    }

    /// Overrides whether coplanar faces are merged.
    pub fn with_greedy(mut self, greedy: bool) -> Self {
        self.greedy = greedy;
        self
    }

    /// Meshes the chunk at `coord` and clears its dirty flag.
    ///
    /// Calling it again without modifying the world returns an identical mesh.
    ///
    /// # Returns
    /// `None` if no chunk is loaded at `coord`.
    pub fn compute(&self, world: &mut World, coord: ChunkCoord) -> Option<Mesh> {
        let mesh = self.build(world, coord)?;
        world.chunk_mut(coord)?.clear_dirty();
        Some(mesh)
    }

    /// Meshes the chunk at `coord` without touching the world.
    pub fn build(&self, world: &World, coord: ChunkCoord) -> Option<Mesh> {
        let chunk = world.chunk(coord)?;
        let start = Instant::now();
        let mut mesh = Mesh::new(chunk.origin());

        if chunk.solid_count() > 0 {
            for side in BlockSide::all() {
                for layer in 0..chunk.size() {
                    for face in self.mesh_layer(world, chunk, side, layer) {
                        let color = self.face_color(&face.key);
                        mesh.add_face(&face, color);
                    }
                }
            }
        }

        debug!(
            "Meshed chunk {} into {} quads in {:?}",
            coord,
            mesh.quad_count(),
            start.elapsed()
        );
        Some(mesh)
    }

    /// Collects the visible faces of one layer, merged if greedy meshing is on.
    fn mesh_layer(&self, world: &World, chunk: &Chunk, side: BlockSide, layer: usize) -> Vec<Face> {
        let size = chunk.size();
        let mut rows = Vec::with_capacity(size);
        let mut faces = Vec::new();

        for v in 0..size {
            let mut row = Vec::new();
            for u in 0..size {
                let Point3 { x, y, z } = slice_cell(side, layer, v, u, size);
                let Some(voxel) = chunk.at(x as i32, y as i32, z as i32) else {
                    continue;
                };
                let Some(light) = exposed_light(world, chunk, x, y, z, side) else {
                    continue;
                };
                let face = Face::new(x, y, z, FaceKey { voxel, light }, side);
                if self.greedy {
                    greedy::push_merged_right(&mut row, face);
                } else {
                    faces.push(face);
                }
            }
            rows.push(row);
        }

        if self.greedy {
            greedy::merge_rows(rows)
        } else {
            faces
        }
    }

    /// Palette color darkened by the light reaching the face.
    fn face_color(&self, key: &FaceKey) -> [f32; 4] {
        let light = key.light as f32 / 255.0;
        let shade = self.min_shade + (1.0 - self.min_shade) * light;
        self.palette
            .color(key.voxel.material)
            .shaded(shade)
            .to_array()
    }
}

/// Chunk-local cell at `(layer, row, column)` of a side's slicing.
fn slice_cell(side: BlockSide, layer: usize, v: usize, u: usize, size: usize) -> Point3<usize> {
    match side {
        BlockSide::RIGHT => Point3::new(layer, v, size - 1 - u),
        BlockSide::LEFT => Point3::new(layer, v, u),
        BlockSide::TOP => Point3::new(v, layer, u),
        BlockSide::BOTTOM => Point3::new(u, layer, v),
        BlockSide::FRONT => Point3::new(u, v, layer),
        BlockSide::BACK => Point3::new(size - 1 - u, v, layer),
    }
}

/// Light of the cell on `side` of the voxel at `(x, y, z)` if that cell is air,
/// `None` if it is solid and hides the face.
fn exposed_light(
    world: &World,
    chunk: &Chunk,
    x: usize,
    y: usize,
    z: usize,
    side: BlockSide,
) -> Option<u8> {
    let [dx, dy, dz] = side.offset();
    let (nx, ny, nz) = (x as i32 + dx, y as i32 + dy, z as i32 + dz);
    let size = chunk.size() as i32;

    if (0..size).contains(&nx) && (0..size).contains(&nz) && (0..size).contains(&ny) {
        return (!chunk.is_solid(nx, ny, nz)).then(|| chunk.light_at(nx, ny, nz));
    }

    let origin = chunk.origin();
    let (wx, wy, wz) = (origin.x + nx, origin.y + ny, origin.z + nz);
    (!world.is_solid(wx, wy, wz)).then(|| world.light_at(wx, wy, wz))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxels::block::Voxel;

    fn setup() -> (World, Mesher) {
        let config = WorldConfig::with_chunk_size(4);
        let mesher = Mesher::new(&config);
        (World::new(config), mesher)
    }

    #[test]
    fn slicing_covers_every_cell_once() {
        for side in BlockSide::all() {
            let mut seen = std::collections::HashSet::new();
            for layer in 0..4 {
                for v in 0..4 {
                    for u in 0..4 {
                        assert!(seen.insert(slice_cell(side, layer, v, u, 4)));
                    }
                }
            }
            assert_eq!(seen.len(), 64);
        }
    }

    #[test]
    fn empty_chunk_has_empty_mesh() {
        let (mut world, mesher) = setup();
        world.add_chunk(0, 0);
        let mesh = mesher.compute(&mut world, ChunkCoord::new(0, 0)).unwrap();
        assert!(mesh.is_empty());
        assert!(!world.chunk(ChunkCoord::new(0, 0)).unwrap().is_dirty());
    }

    #[test]
    fn missing_chunk_has_no_mesh() {
        let (world, mesher) = setup();
        assert!(mesher.build(&world, ChunkCoord::new(0, 0)).is_none());
    }

    #[test]
    fn unlit_faces_use_the_minimum_shade() {
        let (mut world, mesher) = setup();
        world.set(1, 1, 1, Some(Voxel::new(crate::config::materials::GRASS)));
        let mesh = mesher.build(&world, ChunkCoord::new(0, 0)).unwrap();
        let expected = world.config().palette.color(2).shaded(0.25).to_array();
        assert!(mesh.vertices.iter().all(|v| v.color == expected));
    }
}
