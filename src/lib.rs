#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel World
//!
//! A chunked voxel world with face-culled (optionally greedy) meshing,
//! flood-fill lighting and per-chunk persistence.
//!
//! ## Key Modules
//!
//! * `voxels` - Voxels, chunks, the `World` that owns them, and raycasting
//! * `meshing` - Turns chunks into vertex and index buffers
//! * `lighting` - Sky and emitter light propagation
//! * `persistence` - Chunk files and the background `ChunkWriter`
//! * `task_management` - The worker pool behind background writes
//! * `geometry` - Line overlays, image quads and the `Drawable` enum
//! * `config` / `color` - World settings, the material palette and colors
//!
//! ## Architecture
//!
//! The `World` is the only owner of voxel data. Meshing and lighting are pure
//! functions of the world state that the caller invokes for dirty chunks; they
//! reach neighbor chunks through the `World` by coordinate. Only disk writes
//! leave the calling thread.
//!
//! ## Usage
//!
//! ```
//! use voxel_world::config::WorldConfig;
//! use voxel_world::lighting::LightPropagator;
//! use voxel_world::meshing::Mesher;
//! use voxel_world::voxels::block::Voxel;
//! use voxel_world::voxels::world::World;
//!
//! let config = WorldConfig::with_chunk_size(8);
//! let light = LightPropagator::new(&config);
//! let mesher = Mesher::new(&config);
//! let mut world = World::new(config);
//!
//! world.set(1, 0, 1, Some(Voxel::new(1)));
//! for coord in world.dirty_chunks() {
//!     light.calculate(&mut world, coord);
//!     let mesh = mesher.compute(&mut world, coord).unwrap();
//!     assert_eq!(mesh.quad_count(), 6);
//! }
//! ```

use cgmath::{Point3, Vector3};
use log::{error, info};
use web_time::Instant;

pub mod color;
pub mod config;
pub mod geometry;
pub mod lighting;
pub mod meshing;
pub mod persistence;
pub mod task_management;
pub mod voxels;

use config::{materials, WorldConfig};
use geometry::{Drawable, PlacementGrid};
use lighting::LightPropagator;
use meshing::Mesher;
use persistence::ChunkWriter;
use voxels::block::Voxel;
use voxels::chunk::{ChunkCoord, PerlinGenerator};
use voxels::world::{ChunkOrigin, World};

/// Chunks loaded in every direction around the origin chunk by `run`.
const DEMO_RADIUS: i32 = 2;

/// Loads or generates a small world, lights and meshes it, places a lamp,
/// and saves every chunk.
///
/// The first command line argument, if any, is the path of a JSON world config.
pub fn run() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    let config = match std::env::args().nth(1) {
        Some(path) => match config::load_world_config(&path) {
            Ok(config) => {
                info!("Loaded world config from {}", path);
                config
            }
            Err(err) => {
                error!("Could not load world config {}: {}", path, err);
                return;
            }
        },
        None => WorldConfig::default(),
    };

    let directory = config.save_directory.clone();
    let light = LightPropagator::new(&config);
    let mesher = Mesher::new(&config);
    let mut writer = ChunkWriter::from_config(&config);
    let mut world = World::new(config);
    let generator = PerlinGenerator::default();

    let start = Instant::now();
    let (mut loaded, mut generated) = (0, 0);
    for cx in -DEMO_RADIUS..=DEMO_RADIUS {
        for cz in -DEMO_RADIUS..=DEMO_RADIUS {
            match world.load_or_generate(cx, cz, &directory, &generator) {
                ChunkOrigin::Loaded => loaded += 1,
                ChunkOrigin::Generated => generated += 1,
                ChunkOrigin::Resident => {}
            }
        }
    }
    info!(
        "{} chunks resident ({} loaded, {} generated) in {:?}",
        world.len(),
        loaded,
        generated,
        start.elapsed()
    );

    let ground = world.height_at(Point3::new(0.5, 0.0, 0.5)) as i32;
    if world.set(0, ground, 0, Some(Voxel::new(materials::LAMP))) {
        info!("Placed a lamp at (0, {}, 0)", ground);
    }

    let start = Instant::now();
    let dirty = world.dirty_chunks();
    for &coord in &dirty {
        light.calculate(&mut world, coord);
    }
    let mut drawables: Vec<Drawable> = dirty
        .iter()
        .filter_map(|&coord| mesher.compute(&mut world, coord))
        .map(Drawable::from)
        .collect();
    let grid_layer = (ground + 1).clamp(0, world.height() - 1) as usize;
    let grid = PlacementGrid::new(&world, ChunkCoord::new(0, 0), grid_layer);
    drawables.push(Drawable::from(grid.lines().clone()));

    let vertex_bytes: usize = drawables.iter().map(|d| d.geometry().vertices.len()).sum();
    info!(
        "Built {} drawables ({} vertex bytes) in {:?}",
        drawables.len(),
        vertex_bytes,
        start.elapsed()
    );

    let sky = Point3::new(0.5, world.height() as f32 - 0.5, 0.5);
    if let Some(hit) = world.raycast(world.height() as f32, sky, Vector3::new(0.0, -1.0, 0.0)) {
        info!(
            "A ray from the sky hits {:?} on its {:?} face after {:.1} voxels",
            hit.position, hit.side, hit.distance
        );
    }

    for chunk in world.chunks() {
        writer.write(chunk, &directory);
    }
    let reports = writer.shutdown();
    let failed = reports.iter().filter(|report| !report.is_ok()).count();
    info!(
        "Saved {} chunks to {} ({} failed)",
        reports.len() - failed,
        directory.display(),
        failed
    );
}
