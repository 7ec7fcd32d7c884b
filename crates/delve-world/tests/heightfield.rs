use delve_blocks::BlockType;
use delve_world::worldgen::load_config_from_path;
use delve_world::{
    ChunkKey, ConstantNoise, GenError, HeightFieldGenerator, WhiteNoise, WorldGenConfig,
};

fn small_cfg() -> WorldGenConfig {
    WorldGenConfig {
        chunk_size: 32,
        ..WorldGenConfig::default()
    }
}

#[test]
fn generation_is_deterministic() {
    let cfg = WorldGenConfig::default();
    for key in [ChunkKey::new(0, 0), ChunkKey::new(-64, 128), ChunkKey::new(640, -64)] {
        let a = HeightFieldGenerator::new(&cfg, &WhiteNoise).generate(key).unwrap();
        let b = HeightFieldGenerator::new(&cfg, &WhiteNoise).generate(key).unwrap();
        assert_eq!(a, b);
    }
}

#[test]
fn heights_stay_in_configured_range() {
    let mut cfg = small_cfg();
    cfg.height.height_scale = 200.0;
    cfg.height.min_height = 10;
    cfg.height.max_height = 50;
    for cx in -2..2 {
        for cz in -2..2 {
            let key = ChunkKey::new(cx * 32, cz * 32);
            let out = HeightFieldGenerator::new(&cfg, &WhiteNoise).generate(key).unwrap();
            assert_eq!(out.heights.as_slice().len(), 32 * 32);
            assert!(out.heights.min().unwrap() >= 10);
            assert!(out.heights.max().unwrap() <= 50);
            assert_eq!(out.columns.len(), 32 * 32);
        }
    }
}

#[test]
fn neutral_noise_yields_flat_base_height() {
    let cfg = WorldGenConfig::default();
    assert_eq!(cfg.chunk_size, 64);
    assert_eq!(cfg.height.base_height, 40.0);
    let out = HeightFieldGenerator::new(&cfg, &ConstantNoise(0.5))
        .generate(ChunkKey::new(0, 0))
        .unwrap();
    assert!(out.heights.as_slice().iter().all(|&h| h == 40));
    assert!(out.columns.iter().all(|&b| b == BlockType::Grass));
}

#[test]
fn neutral_noise_base_is_clamped() {
    let mut cfg = WorldGenConfig::default();
    cfg.height.base_height = 500.0;
    let out = HeightFieldGenerator::new(&cfg, &ConstantNoise(0.5))
        .generate(ChunkKey::new(64, 64))
        .unwrap();
    assert!(out.heights.as_slice().iter().all(|&h| h == cfg.height.max_height));
    assert!(out.columns.iter().all(|&b| b == BlockType::Snow));
}

#[test]
fn shared_edges_match_between_neighbours() {
    let cfg = WorldGenConfig::default();
    let size = cfg.chunk_size;
    let cs = size as i32;
    let hf = HeightFieldGenerator::new(&cfg, &WhiteNoise);
    for (cx, cz) in [(0, 0), (-3, 2), (5, -4)] {
        let key = ChunkKey::new(cx * cs, cz * cs);
        let a = hf.generate(key).unwrap().heights;
        let east = hf.generate(key.offset(1, 0, cs)).unwrap().heights;
        let south = hf.generate(key.offset(0, 1, cs)).unwrap().heights;
        for i in 0..size {
            assert_eq!(a.get(size - 1, i), east.get(0, i), "{key:?} east seam at z={i}");
            assert_eq!(a.get(i, size - 1), south.get(i, 0), "{key:?} south seam at x={i}");
        }
    }
}

#[test]
fn four_chunks_agree_at_a_shared_corner() {
    let cfg = small_cfg();
    let size = cfg.chunk_size;
    let cs = size as i32;
    let last = size - 1;
    let hf = HeightFieldGenerator::new(&cfg, &WhiteNoise);
    for (cx, cz) in [(0, 0), (-1, -1), (7, -2)] {
        let nw = ChunkKey::new(cx * cs, cz * cs);
        let h = |dx: i32, dz: i32| hf.generate(nw.offset(dx, dz, cs)).unwrap().heights;
        let (a, b, c, d) = (h(0, 0), h(1, 0), h(0, 1), h(1, 1));
        let corner = a.get(last, last);
        assert_eq!(b.get(0, last), corner);
        assert_eq!(c.get(last, 0), corner);
        assert_eq!(d.get(0, 0), corner);
    }
}

#[test]
fn biome_bands() {
    let cfg = WorldGenConfig::default();
    let hf = HeightFieldGenerator::new(&cfg, &WhiteNoise);
    assert!(hf.biome_offset(0.9) > 0.0);
    assert!(hf.biome_offset(1.0) <= cfg.biome.mountain_height);
    assert_eq!(hf.biome_offset(0.5), 0.0);
    assert!(hf.biome_offset(0.1) < 0.0);
    assert!(hf.biome_offset(0.0) >= -cfg.biome.valley_depth);
}

#[test]
fn out_of_range_lookups_are_none() {
    let cfg = small_cfg();
    let out = HeightFieldGenerator::new(&cfg, &WhiteNoise)
        .generate(ChunkKey::new(0, 0))
        .unwrap();
    assert!(out.heights.get(31, 31).is_some());
    assert!(out.heights.get(32, 0).is_none());
    assert!(out.heights.get(0, 32).is_none());
}

#[test]
fn bad_inputs_surface_as_errors() {
    let cfg = WorldGenConfig {
        chunk_size: 1,
        ..WorldGenConfig::default()
    };
    let err = HeightFieldGenerator::new(&cfg, &WhiteNoise)
        .generate(ChunkKey::new(0, 0))
        .unwrap_err();
    assert!(matches!(err, GenError::InvalidConfig(_)));

    let cfg = small_cfg();
    let err = HeightFieldGenerator::new(&cfg, &ConstantNoise(f32::NAN))
        .generate(ChunkKey::new(0, 0))
        .unwrap_err();
    assert_eq!(err, GenError::NonFiniteHeight { x: 0, z: 0 });
}

#[test]
fn config_defaults_fill_missing_fields() {
    let cfg: WorldGenConfig = toml::from_str("chunk_size = 16\nmode = \"heightfield\"\n[height]\nbase_height = 12.0\n").unwrap();
    assert_eq!(cfg.chunk_size, 16);
    assert_eq!(cfg.mode, delve_world::GeneratorMode::HeightField);
    assert_eq!(cfg.height.base_height, 12.0);
    assert_eq!(cfg.height.octaves, 4);
    assert_eq!(cfg.volume.water_level, 20);
    assert!(cfg.volume.caves.enable);

    let empty: WorldGenConfig = toml::from_str("").unwrap();
    assert_eq!(empty.chunk_size, 64);
    assert_eq!(empty.mode, delve_world::GeneratorMode::Volumetric);
}

#[test]
fn config_loader_rejects_invalid_files() {
    let dir = std::env::temp_dir();
    let path = dir.join(format!("delve-worldgen-{}.toml", std::process::id()));
    std::fs::write(&path, "[height]\nmin_height = 9\nmax_height = 3\n").unwrap();
    assert!(load_config_from_path(&path).is_err());
    std::fs::write(&path, "seed = \"abc\"\n").unwrap();
    let cfg = load_config_from_path(&path).unwrap();
    assert_eq!(cfg.seed, "abc");
    let _ = std::fs::remove_file(&path);
}
