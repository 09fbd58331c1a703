//! Overlay marking where voxels can be placed in one layer of a chunk.

use cgmath::{Point3, Vector3};
use log::debug;

use crate::color::Color;
use crate::voxels::chunk::ChunkCoord;
use crate::voxels::world::World;

use super::lines::Lines;

/// Lift above the layer floor so the outline is not hidden by the voxels below.
const GRID_LIFT: f32 = 0.001;
const GRID_ALPHA: f32 = 0.5;

/// Outlines every empty voxel of the current layer of a chunk.
///
/// Positions are chunk-local, like chunk meshes; `origin` places them in the world.
#[derive(Clone, Debug)]
pub struct PlacementGrid {
    pub coord: ChunkCoord,
    pub origin: Point3<i32>,
    pub color: Color,
    layer: usize,
    size: usize,
    lines: Lines,
}

impl PlacementGrid {
    /// Creates the grid for the chunk at `coord` at `layer`, clamped into the world.
    pub fn new(world: &World, coord: ChunkCoord, layer: usize) -> Self {
        let size = world.chunk_size();
        let mut grid = PlacementGrid {
            coord,
            origin: coord.origin(size),
            color: Color::BLACK.with_alpha(GRID_ALPHA),
            layer: layer.min(size - 1),
            size,
            lines: Lines::new(),
        };
        grid.compute(world);
        grid
    }

    pub fn layer(&self) -> usize {
        self.layer
    }

    pub fn lines(&self) -> &Lines {
        &self.lines
    }

    /// Moves the grid one layer up.
    ///
    /// # Returns
    /// `false` if the grid is already at the top layer.
    pub fn up(&mut self, world: &World) -> bool {
        if self.layer + 1 >= self.size {
            return false;
        }
        self.layer += 1;
        self.compute(world);
        true
    }

    /// Moves the grid one layer down.
    ///
    /// # Returns
    /// `false` if the grid is already at layer 0.
    pub fn down(&mut self, world: &World) -> bool {
        if self.layer == 0 {
            return false;
        }
        self.layer -= 1;
        self.compute(world);
        true
    }

    /// Rebuilds the outlines from the current state of the world.
    pub fn compute(&mut self, world: &World) {
        self.lines.clear();
        let y = self.layer as i32;
        for x in 0..self.size {
            for z in 0..self.size {
                if world.is_solid(self.origin.x + x as i32, y, self.origin.z + z as i32) {
                    continue;
                }
                self.lines.box_outline(
                    Point3::new(x as f32, y as f32 + GRID_LIFT, z as f32),
                    Vector3::new(1.0, 0.0, 1.0),
                    self.color,
                );
            }
        }
        debug!(
            "Placement grid for chunk {} at layer {}: {} segments",
            self.coord,
            self.layer,
            self.lines.segment_count()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;
    use crate::voxels::block::Voxel;

    #[test]
    fn only_empty_voxels_are_outlined() {
        let mut world = World::new(WorldConfig::with_chunk_size(4));
        world.set(1, 2, 1, Some(Voxel::new(1)));
        world.set(2, 2, 3, Some(Voxel::new(1)));

        let grid = PlacementGrid::new(&world, ChunkCoord::new(0, 0), 2);
        assert_eq!(grid.lines().segment_count(), 14 * 4);
        assert!(grid
            .lines()
            .vertices
            .iter()
            .all(|v| v.color == [0.0, 0.0, 0.0, GRID_ALPHA]));
    }

    #[test]
    fn layer_moves_within_the_world() {
        let world = World::new(WorldConfig::with_chunk_size(4));
        let mut grid = PlacementGrid::new(&world, ChunkCoord::new(0, 0), 9);
        assert_eq!(grid.layer(), 3);
        assert!(!grid.up(&world));
        assert!(grid.down(&world));
        assert_eq!(grid.layer(), 2);
        for _ in 0..2 {
            assert!(grid.down(&world));
        }
        assert!(!grid.down(&world));
        assert_eq!(grid.layer(), 0);
    }
}
