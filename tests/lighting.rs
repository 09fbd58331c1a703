use voxel_world::config::{materials, WorldConfig};
use voxel_world::lighting::LightPropagator;
use voxel_world::voxels::block::block_side::BlockSide;
use voxel_world::voxels::block::Voxel;
use voxel_world::voxels::chunk::{ChunkCoord, FlatGenerator, PerlinGenerator};
use voxel_world::voxels::world::{World, MAX_LIGHT};

const STONE: Voxel = Voxel::new(materials::ROCK);
const ORIGIN: ChunkCoord = ChunkCoord::new(0, 0);

fn setup(size: usize) -> (World, LightPropagator) {
    let config = WorldConfig::with_chunk_size(size);
    let light = LightPropagator::new(&config);
    (World::new(config), light)
}

/// Every lit air cell that is not a light source is exactly one attenuation
/// step darker than its brightest neighbor.
#[test]
fn light_only_decreases_away_from_sources() {
    let (mut world, light) = setup(16);
    world.generate_chunk(0, 0, &PerlinGenerator::default());
    // An overhang and a lamp under it, so some light has to travel sideways.
    for x in 2..10 {
        for z in 2..10 {
            world.set(x, 13, z, Some(STONE));
        }
    }
    world.set(5, 12, 5, Some(Voxel::new(materials::LAMP)));
    light.calculate(&mut world, ORIGIN);

    let chunk = world.chunk(ORIGIN).unwrap();
    let attenuation = world.config().light_attenuation;
    let palette = &world.config().palette;
    let size = chunk.size() as i32;

    for x in 0..size {
        for z in 0..size {
            let mut open_to_sky = true;
            for y in (0..size).rev() {
                let here = chunk.light_at(x, y, z);
                match chunk.at(x, y, z) {
                    Some(voxel) => {
                        open_to_sky = false;
                        assert_eq!(here, palette.emission(voxel.material));
                    }
                    None if open_to_sky => assert_eq!(here, MAX_LIGHT),
                    None => {
                        let brightest = BlockSide::all()
                            .iter()
                            .map(|side| {
                                let [dx, dy, dz] = side.offset();
                                chunk.light_at(x + dx, y + dy, z + dz)
                            })
                            .max()
                            .unwrap_or(0);
                        assert_eq!(
                            here,
                            brightest.saturating_sub(attenuation),
                            "at ({}, {}, {})",
                            x,
                            y,
                            z
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn sealed_pockets_stay_dark() {
    let (mut world, light) = setup(8);
    world.generate_chunk(
        0,
        0,
        &FlatGenerator {
            height: 8,
            voxel: STONE,
        },
    );
    world.set(3, 2, 3, None);
    world.set(3, 3, 3, None);
    light.calculate(&mut world, ORIGIN);

    assert_eq!(world.light_at(3, 2, 3), 0);
    assert_eq!(world.light_at(3, 3, 3), 0);

    // Opening a shaft to the sky lights the pocket.
    for y in 4..8 {
        world.set(3, y, 3, None);
    }
    light.calculate(&mut world, ORIGIN);
    assert_eq!(world.light_at(3, 2, 3), MAX_LIGHT);
}

#[test]
fn calculate_is_idempotent() {
    let (mut world, light) = setup(16);
    world.generate_chunk(0, 0, &PerlinGenerator::default());
    world.generate_chunk(1, 0, &PerlinGenerator::default());

    light.calculate(&mut world, ORIGIN);
    let first = world.chunk(ORIGIN).unwrap().light().to_vec();
    light.calculate(&mut world, ORIGIN);
    assert_eq!(world.chunk(ORIGIN).unwrap().light(), &first[..]);
}

#[test]
fn light_crosses_chunk_boundaries_in_any_order() {
    let (mut world, light) = setup(8);
    // Chunk (1, 0) is roofed over entirely; its only light comes from the open
    // chunk to its left.
    world.add_chunk(0, 0);
    for x in 8..16 {
        for z in 0..8 {
            world.set(x, 7, z, Some(STONE));
        }
    }
    let roofed = ChunkCoord::new(1, 0);

    light.calculate(&mut world, roofed);
    assert_eq!(world.light_at(8, 3, 3), MAX_LIGHT - 16);
    assert_eq!(world.light_at(9, 3, 3), MAX_LIGHT - 32);
    assert_eq!(world.light_at(15, 3, 3), MAX_LIGHT - 8 * 16);

    light.calculate(&mut world, ORIGIN);
    let before = world.chunk(roofed).unwrap().light().to_vec();
    light.calculate(&mut world, roofed);
    assert_eq!(world.chunk(roofed).unwrap().light(), &before[..]);
    assert_eq!(world.light_at(7, 3, 3), MAX_LIGHT);
}

/// Two solid chunks with a sealed tunnel running across their seam.
fn tunnel_world() -> (World, LightPropagator) {
    let (mut world, light) = setup(8);
    let rock = FlatGenerator {
        height: 8,
        voxel: STONE,
    };
    world.generate_chunk(0, 0, &rock);
    world.generate_chunk(1, 0, &rock);
    for x in 5..12 {
        world.set(x, 3, 3, None);
    }
    (world, light)
}

fn relight_dirty(world: &mut World, light: &LightPropagator) {
    for coord in world.dirty_chunks() {
        light.calculate(world, coord);
        world.chunk_mut(coord).unwrap().clear_dirty();
    }
}

#[test]
fn removed_lamp_leaves_no_light_behind() {
    let (mut world, light) = tunnel_world();
    world.set(7, 3, 3, Some(Voxel::new(materials::LAMP)));
    relight_dirty(&mut world, &light);
    assert_eq!(world.light_at(8, 3, 3), MAX_LIGHT - 16);
    assert_eq!(world.light_at(11, 3, 3), MAX_LIGHT - 4 * 16);

    world.set(7, 3, 3, None);
    assert_eq!(world.dirty_chunks(), vec![ORIGIN, ChunkCoord::new(1, 0)]);
    relight_dirty(&mut world, &light);
    for x in 5..12 {
        assert_eq!(world.light_at(x, 3, 3), 0, "tunnel at x = {}", x);
    }
}

#[test]
fn interior_edits_stale_the_neighbor_light() {
    let (mut world, light) = setup(8);
    for x in 0..16 {
        for z in 0..8 {
            world.set(x, 7, z, Some(STONE));
        }
    }
    relight_dirty(&mut world, &light);
    assert_eq!(world.light_at(8, 6, 3), 0);

    // A skylight two columns away from the seam.
    world.set(6, 7, 3, None);
    assert_eq!(world.dirty_chunks(), vec![ORIGIN, ChunkCoord::new(1, 0)]);
    relight_dirty(&mut world, &light);
    assert_eq!(world.light_at(6, 6, 3), MAX_LIGHT);
    assert_eq!(world.light_at(8, 6, 3), MAX_LIGHT - 32);
}
