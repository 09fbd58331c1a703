//! Quad faces, greedy merging, and the mesh buffers they end up in.

pub mod face;
pub mod greedy;
mod mesh;

pub use face::{Face, FaceKey};
pub use mesh::Mesh;
