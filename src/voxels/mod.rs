//! # Voxels
//!
//! Representation of the voxel world and the queries made against it.
//!
//! * **Block**: the `Voxel` value and the six `BlockSide`s a voxel is drawn with
//! * **Chunk**: fixed-size cubes of voxel slots with a parallel light field,
//!   plus the generators that fill them
//! * **World**: the sparse map of chunks, addressed in world coordinates
//! * **Raycast**: finding the first solid voxel along a ray
//!
//! ## Data Flow
//!
//! 1. `World` receives reads and writes in world coordinates
//! 2. It resolves them to the owning chunk, creating it on writes
//! 3. Writes mark the chunk (and neighbors across a touched boundary) dirty
//! 4. The caller relights and remeshes dirty chunks when it sees fit

pub mod block;
pub mod chunk;
pub mod raycast;
pub mod world;
