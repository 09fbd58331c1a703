//! # Voxel World Demo Entry Point
//!
//! Calls into the library's `run()` function.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- [world-config.json]
//! ```

fn main() {
    voxel_world::run();
}
