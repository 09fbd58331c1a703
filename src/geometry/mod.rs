//! # Geometry Module
//!
//! Everything this crate produces for a renderer, behind one closed enum.
//!
//! A renderer matches on `Drawable` or asks for its `GeometryRef`: raw vertex
//! bytes, their stride, indices and how to assemble them. The vertex type of
//! each variant is `#[repr(C)]` and `bytemuck::Pod`, so the bytes can be
//! uploaded as they are.

pub mod lines;
pub mod placement_grid;
pub mod quad;

use crate::meshing::mesh::Mesh;
use crate::meshing::vertex::Vertex;

pub use lines::{ColorVertex, Lines};
pub use placement_grid::PlacementGrid;
pub use quad::{ImageQuad, QuadVertex};

/// How indices are assembled into primitives.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Topology {
    TriangleList,
    LineList,
}

/// A borrowed view of drawable geometry.
#[derive(Copy, Clone, Debug)]
pub struct GeometryRef<'a> {
    pub topology: Topology,
    pub vertices: &'a [u8],
    /// Size in bytes of one vertex in `vertices`
    pub stride: usize,
    pub indices: &'a [u32],
}

impl GeometryRef<'_> {
    pub fn vertex_count(&self) -> usize {
        if self.stride == 0 {
            0
        } else {
            self.vertices.len() / self.stride
        }
    }
}

/// Every kind of geometry that can be drawn.
#[derive(Clone, Debug)]
pub enum Drawable {
    ChunkMesh(Mesh),
    Lines(Lines),
    Quad(ImageQuad),
}

impl Drawable {
    pub fn geometry(&self) -> GeometryRef<'_> {
        match self {
            Drawable::ChunkMesh(mesh) => GeometryRef {
                topology: Topology::TriangleList,
                vertices: bytemuck::cast_slice(&mesh.vertices),
                stride: std::mem::size_of::<Vertex>(),
                indices: &mesh.indices,
            },
            Drawable::Lines(lines) => GeometryRef {
                topology: Topology::LineList,
                vertices: bytemuck::cast_slice(&lines.vertices),
                stride: std::mem::size_of::<ColorVertex>(),
                indices: &lines.indices,
            },
            Drawable::Quad(quad) => GeometryRef {
                topology: Topology::TriangleList,
                vertices: bytemuck::cast_slice(quad.vertices()),
                stride: std::mem::size_of::<QuadVertex>(),
                indices: quad.indices(),
            },
        }
    }
}

impl From<Mesh> for Drawable {
    fn from(mesh: Mesh) -> Self {
        Drawable::ChunkMesh(mesh)
    }
}

impl From<Lines> for Drawable {
    fn from(lines: Lines) -> Self {
        Drawable::Lines(lines)
    }
}

impl From<ImageQuad> for Drawable {
    fn from(quad: ImageQuad) -> Self {
        Drawable::Quad(quad)
    }
}
