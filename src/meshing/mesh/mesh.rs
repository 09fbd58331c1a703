//! Mesh data structures and operations for voxel rendering.
//!
//! This module turns merged faces into vertex and index buffers ready for upload.

use cgmath::Point3;

use crate::meshing::vertex::{Vertex, NO_TEXTURE};
use crate::voxels::block::block_side::BlockSide;

use super::face::Face;

/// Renderable geometry for one chunk.
///
/// Vertex positions are chunk-local; `origin` is the world position of the
/// chunk's local `(0, 0, 0)`. A mesh is a pure function of the world state it
/// was built from and is replaced wholesale on every rebuild.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub origin: Point3<i32>,
    pub vertices: Vec<Vertex>,
    /// Triangle list, two triangles per quad
    pub indices: Vec<u32>,
    /// Number of quads emitted per side, indexed by `BlockSide as usize`
    side_quads: [u32; 6],
}

impl Mesh {
    /// Creates an empty mesh for the chunk whose local origin is `origin`.
    pub fn new(origin: Point3<i32>) -> Self {
        Mesh {
            origin,
            vertices: Vec::new(),
            indices: Vec::new(),
            side_quads: [0; 6],
        }
    }

    /// Appends one quad for `face`, drawn with `color`.
    pub fn add_face(&mut self, face: &Face, color: [f32; 4]) {
        let base = self.vertices.len() as u32;
        self.vertices
            .extend_from_slice(&Self::generate_face_vertices(face, color));
        self.indices
            .extend_from_slice(&Self::generate_face_indices(base));
        self.side_quads[face.block_side as usize] += 1;
    }

    /// Generates vertex data for a single face.
    ///
    /// # Arguments
    /// * `face` - The face to generate vertices for
    /// * `color` - The shaded color shared by all four corners
    ///
    /// # Returns
    /// The corners in `ll, lr, ur, ul` order, which is counter-clockwise seen
    /// from outside. Texture coordinates repeat once per voxel.
    pub fn generate_face_vertices(face: &Face, color: [f32; 4]) -> [Vertex; 4] {
        let normal = face.block_side.normal();
        let texture_index = face
            .key
            .voxel
            .texture(face.block_side)
            .map(u32::from)
            .unwrap_or(NO_TEXTURE);
        let (w, h) = (face.width() as f32, face.height() as f32);

        let vertex = |corner: Point3<usize>, tex_coords: [f32; 2]| Vertex {
            position: [corner.x as f32, corner.y as f32, corner.z as f32],
            normal,
            color,
            tex_coords,
            texture_index,
        };

        [
            vertex(face.ll, [0.0, 0.0]),
            vertex(face.lr, [w, 0.0]),
            vertex(face.ur, [w, h]),
            vertex(face.ul, [0.0, h]),
        ]
    }

    /// Generates the indices of the two triangles of a quad whose first vertex
    /// is at `base`.
    pub fn generate_face_indices(base: u32) -> [u32; 6] {
        [base, base + 1, base + 2, base, base + 2, base + 3]
    }

    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }

    /// Number of quads facing `side`.
    pub fn quads_on(&self, side: BlockSide) -> u32 {
        self.side_quads[side as usize]
    }

    /// Total area, in voxel faces, covered by quads facing `side`.
    pub fn covered_area(&self, side: BlockSide) -> f32 {
        let normal = side.normal();
        self.vertices
            .chunks_exact(4)
            .filter(|quad| quad[0].normal == normal)
            .map(|quad| distance(&quad[0], &quad[1]) * distance(&quad[0], &quad[3]))
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

fn distance(a: &Vertex, b: &Vertex) -> f32 {
    a.position
        .iter()
        .zip(b.position.iter())
        .map(|(p, q)| (p - q).abs())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meshing::mesh::face::FaceKey;
    use crate::voxels::block::Voxel;

    #[test]
    fn quads_are_two_triangles_over_four_vertices() {
        let mut mesh = Mesh::new(Point3::new(0, 0, 0));
        let key = FaceKey {
            voxel: Voxel::textured(1, [4, 4, 9, 4, 4, 4]),
            light: 255,
        };
        let a = Face::new(0, 0, 0, key, BlockSide::TOP);
        let b = Face::new(1, 0, 0, key, BlockSide::TOP);
        let merged = a.merge_up(&b).unwrap();
        mesh.add_face(&merged, [1.0; 4]);
        mesh.add_face(&Face::new(0, 0, 0, key, BlockSide::LEFT), [1.0; 4]);

        assert_eq!(mesh.quad_count(), 2);
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3, 4, 5, 6, 4, 6, 7]);
        assert_eq!(mesh.quads_on(BlockSide::TOP), 1);
        assert_eq!(mesh.covered_area(BlockSide::TOP), 2.0);
        assert_eq!(mesh.vertices[0].texture_index, 9);
        assert_eq!(mesh.vertices[2].tex_coords, [1.0, 2.0]);
    }
}
