use cgmath::Point3;
use voxel_world::config::WorldConfig;
use voxel_world::persistence;
use voxel_world::voxels::block::Voxel;
use voxel_world::voxels::chunk::{ChunkCoord, FlatGenerator};
use voxel_world::voxels::world::{ChunkOrigin, World};

const STONE: Voxel = Voxel::new(1);

fn world(size: usize) -> World {
    World::new(WorldConfig::with_chunk_size(size))
}

#[test]
fn writes_outside_the_world_are_ignored() {
    let mut world = world(8);
    assert!(!world.set(0, -1, 0, Some(STONE)));
    assert!(!world.set(0, 8, 0, Some(STONE)));
    assert!(world.is_empty(), "rejected writes must not create chunks");
    assert_eq!(world.voxel(0, -1, 0), None);
    assert_eq!(world.voxel(0, 8, 0), None);
}

#[test]
fn height_at_reports_the_top_surface() {
    let mut world = world(16);
    for y in [2, 5, 9] {
        world.set(4, y, -3, Some(STONE));
    }
    assert_eq!(world.height_at(Point3::new(4.2, 0.0, -2.5)), 10.0);
    assert_eq!(world.height_at(Point3::new(5.2, 0.0, -2.5)), 0.0);
    assert_eq!(world.height_at(Point3::new(400.0, 0.0, 400.0)), 0.0);
}

#[test]
fn voxels_are_addressed_across_chunks() {
    let mut world = world(4);
    for x in -6..6 {
        world.set(x, 1, x, Some(Voxel::new((x + 6) as u8)));
    }
    assert_eq!(world.len(), 4, "only chunks on the diagonal exist");
    for x in -6..6 {
        assert_eq!(world.voxel(x, 1, x), Some(Voxel::new((x + 6) as u8)));
        assert_eq!(world.voxel(x, 2, x), None);
    }
}

#[test]
fn edits_dirty_chunks_within_light_reach() {
    // Default attenuation 16: light travels at most 15 voxels.
    let mut world = world(32);
    let all = [(0, 0), (1, 0), (-1, 0), (0, 1), (0, -1), (1, 1)];
    let clean = |world: &mut World| {
        for (cx, cz) in all {
            world.add_chunk(cx, cz).clear_dirty();
        }
    };
    clean(&mut world);

    world.set(16, 1, 16, Some(STONE));
    assert_eq!(world.dirty_chunks(), vec![ChunkCoord::new(0, 0)]);
    clean(&mut world);

    world.set(17, 1, 16, Some(STONE));
    assert_eq!(
        world.dirty_chunks(),
        vec![ChunkCoord::new(0, 0), ChunkCoord::new(1, 0)]
    );
    clean(&mut world);

    world.set(31, 0, 31, Some(STONE));
    assert_eq!(
        world.dirty_chunks(),
        vec![
            ChunkCoord::new(0, 0),
            ChunkCoord::new(0, 1),
            ChunkCoord::new(1, 0),
            ChunkCoord::new(1, 1)
        ]
    );
    assert_eq!(
        world.chunk(ChunkCoord::new(1, 0)).unwrap().solid_count(),
        0,
        "the neighbor's voxels are untouched"
    );
}

#[test]
fn load_or_generate_prefers_saved_chunks() {
    let dir = tempfile::tempdir().unwrap();
    let flat = FlatGenerator {
        height: 2,
        voxel: STONE,
    };

    let mut world = world(4);
    assert_eq!(
        world.load_or_generate(0, 0, dir.path(), &flat),
        ChunkOrigin::Generated
    );
    assert_eq!(
        world.load_or_generate(0, 0, dir.path(), &flat),
        ChunkOrigin::Resident
    );

    world.set(2, 3, 2, Some(Voxel::new(9)));
    let saved = world.evict_chunk(0, 0).unwrap();
    persistence::write_chunk(&saved.snapshot(), dir.path()).unwrap();

    assert_eq!(
        world.load_or_generate(0, 0, dir.path(), &flat),
        ChunkOrigin::Loaded
    );
    assert_eq!(world.voxel(2, 3, 2), Some(Voxel::new(9)));
    assert_eq!(world.voxel(0, 1, 0), Some(STONE));
}

#[test]
fn corrupt_saves_fall_back_to_the_generator() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("2_-3.chunk"), [0u8; 7]).unwrap();

    let mut world = world(4);
    let flat = FlatGenerator {
        height: 1,
        voxel: STONE,
    };
    assert_eq!(
        world.load_or_generate(2, -3, dir.path(), &flat),
        ChunkOrigin::Generated
    );
    assert_eq!(world.voxel(8, 0, -12), Some(STONE));
}
