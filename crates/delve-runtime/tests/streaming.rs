use delve_blocks::BlockType;
use delve_chunk::{ChunkLookup, EditError, NO_HEIGHT};
use delve_runtime::{ChunkStreamer, StreamConfig, neighborhood};
use delve_world::{ChunkKey, ConstantNoise, GeneratorMode, WorldGenConfig};

fn gen_cfg(mode: GeneratorMode) -> WorldGenConfig {
    WorldGenConfig {
        chunk_size: 16,
        mode,
        ..WorldGenConfig::default()
    }
}

fn sorted(mut keys: Vec<ChunkKey>) -> Vec<ChunkKey> {
    keys.sort_unstable();
    keys
}

fn assert_matches_neighborhood<N: delve_world::NoiseSource>(s: &ChunkStreamer<N>, wx: f32, wz: f32) {
    let center = ChunkKey::containing(wx, wz, 16);
    assert_eq!(s.center(), Some(center));
    assert_eq!(s.loaded_keys(), sorted(s.required_keys(center)));
}

#[test]
fn init_loads_three_by_three() {
    let mut s = ChunkStreamer::new(gen_cfg(GeneratorMode::HeightField), StreamConfig::default());
    let up = s.init(0.0, 0.0);
    assert_eq!(up.center, ChunkKey::new(0, 0));
    assert_eq!(up.created.len(), 9);
    assert!(up.evicted.is_empty());
    let expect: Vec<ChunkKey> = (-1..=1)
        .flat_map(|z| (-1..=1).map(move |x| ChunkKey::new(x * 16, z * 16)))
        .collect();
    assert_eq!(s.loaded_keys(), sorted(expect));
}

#[test]
fn loaded_set_tracks_player_across_boundaries() {
    let mut s = ChunkStreamer::new(gen_cfg(GeneratorMode::HeightField), StreamConfig::default());
    s.init(0.5, 0.5);
    let path = [
        (8.0, 8.0),
        (15.9, 8.0),
        (16.0, 8.0),
        (16.0, -0.1),
        (-0.1, -0.1),
        (-33.0, -0.1),
        (-33.0, 40.0),
        (100.0, 100.0),
        (0.0, 0.0),
    ];
    for (wx, wz) in path {
        s.update(wx, wz);
        assert_matches_neighborhood(&s, wx, wz);
    }
}

#[test]
fn staying_inside_a_chunk_is_a_no_op() {
    let mut s = ChunkStreamer::new(gen_cfg(GeneratorMode::HeightField), StreamConfig::default());
    s.init(1.0, 1.0);
    let before = s.stats();
    assert!(s.update(15.0, 15.0).is_none());
    assert!(s.update(0.0, 0.0).is_none());
    assert_eq!(s.stats(), before);
}

#[test]
fn crossing_one_edge_swaps_one_row() {
    let mut s = ChunkStreamer::new(gen_cfg(GeneratorMode::HeightField), StreamConfig::default());
    s.init(8.0, 8.0);
    let up = s.update(24.0, 8.0).unwrap();
    assert_eq!(up.center, ChunkKey::new(16, 0));
    assert_eq!(
        sorted(up.created.clone()),
        sorted(vec![ChunkKey::new(32, -16), ChunkKey::new(32, 0), ChunkKey::new(32, 16)])
    );
    assert_eq!(
        up.evicted,
        sorted(vec![ChunkKey::new(-16, -16), ChunkKey::new(-16, 0), ChunkKey::new(-16, 16)])
    );
    assert_eq!(s.stats().created, 12);
    assert_eq!(s.stats().evicted, 3);
}

#[test]
fn corner_skipping_and_radius() {
    let k = ChunkKey::new(0, 0);
    assert_eq!(neighborhood(k, 1, true, 16).len(), 5);
    assert_eq!(neighborhood(k, 2, false, 16).len(), 25);
    assert_eq!(neighborhood(k, 2, true, 16).len(), 21);
    assert_eq!(neighborhood(k, 0, true, 16), vec![k]);

    let cfg = StreamConfig {
        skip_corners: true,
        ..StreamConfig::default()
    };
    let mut s = ChunkStreamer::new(gen_cfg(GeneratorMode::HeightField), cfg);
    s.init(-5.0, 20.0);
    assert_eq!(s.chunks().len(), 5);
    assert!(s.chunk(ChunkKey::new(-32, 0)).is_none());
    assert!(s.chunk(ChunkKey::new(-16, 0)).is_some());
    s.update(40.0, 40.0);
    assert_matches_neighborhood(&s, 40.0, 40.0);
}

#[test]
fn parallel_and_serial_generation_agree() {
    let serial_cfg = StreamConfig {
        parallel: false,
        ..StreamConfig::default()
    };
    let mut a = ChunkStreamer::new(gen_cfg(GeneratorMode::Volumetric), serial_cfg);
    let mut b = ChunkStreamer::new(gen_cfg(GeneratorMode::Volumetric), StreamConfig::default());
    a.init(3.0, -40.0);
    b.init(3.0, -40.0);
    assert_eq!(a.loaded_keys(), b.loaded_keys());
    for key in a.loaded_keys() {
        let (ca, cb) = (a.chunk(key).unwrap(), b.chunk(key).unwrap());
        assert_eq!(ca.terrain(), cb.terrain());
        assert_eq!(ca.instances(), cb.instances());
    }
}

#[test]
fn edits_route_to_the_owning_chunk() {
    let mut s = ChunkStreamer::with_noise(
        gen_cfg(GeneratorMode::Volumetric),
        StreamConfig::default(),
        ConstantNoise(0.5),
    );
    s.init(0.0, 0.0);
    let h = s.column_height(-3, 5);
    assert_eq!(h, 15);
    assert!(s.block_at(-3, h - 1, 5).is_some_and(BlockType::is_solid));

    s.remove_block(-3, h - 1, 5).unwrap();
    assert_eq!(s.block_at(-3, h - 1, 5), Some(BlockType::Air));
    assert_eq!(s.column_height(-3, 5), h - 1);

    s.set_block_at(20, 2, -10, BlockType::Air).unwrap();
    assert_eq!(s.block_at(20, 2, -10), Some(BlockType::Air));

    assert_eq!(s.set_block_at(500, 2, 0, BlockType::Stone), Err(EditError::Unloaded));
    assert_eq!(s.set_block_at(0, 99, 0, BlockType::Stone), Err(EditError::OutOfBounds));
    assert_eq!(s.column_height(500, 0), NO_HEIGHT);
}

#[test]
fn stream_config_from_toml() {
    let cfg: StreamConfig = toml::from_str("radius = 2\nskip_corners = true\n").unwrap();
    assert_eq!(cfg.radius, 2);
    assert!(cfg.skip_corners);
    assert!(cfg.parallel);
    let cfg: StreamConfig = toml::from_str("").unwrap();
    assert_eq!(cfg.radius, 1);
    assert!(!cfg.skip_corners);
}
