use delve_blocks::BlockType;
use delve_world::generation::caves::threshold_at;
use delve_world::generation::ores::pick_ore;
use delve_world::worldgen::Ores;
use delve_world::{BlockGrid, ChunkKey, ConstantNoise, VolumetricGenerator, WhiteNoise, WorldGenConfig};

fn cfg32() -> WorldGenConfig {
    let mut cfg = WorldGenConfig {
        chunk_size: 32,
        ..WorldGenConfig::default()
    };
    cfg.volume.surface.base_height = 16.0;
    cfg.volume.surface.height_scale = 6.0;
    cfg.volume.surface.max_height = 30;
    cfg.volume.water_level = 10;
    cfg.volume.caves.lava_max_y = 8;
    cfg
}

#[test]
fn generation_is_deterministic() {
    let cfg = cfg32();
    let key = ChunkKey::new(-32, 96);
    let a = VolumetricGenerator::new(&cfg, &WhiteNoise).generate(key).unwrap();
    let b = VolumetricGenerator::new(&cfg, &WhiteNoise).generate(key).unwrap();
    assert_eq!(a.heights, b.heights);
    assert_eq!(a.blocks, b.blocks);
    assert_eq!(a.blocks.visible_cells(), b.blocks.visible_cells());
}

#[test]
fn surface_bounds_solid_material() {
    let cfg = cfg32();
    let out = VolumetricGenerator::new(&cfg, &WhiteNoise)
        .generate(ChunkKey::new(0, 0))
        .unwrap();
    let size = cfg.chunk_size;
    for z in 0..size {
        for x in 0..size {
            let h = out.heights.get(x, z).unwrap();
            assert!(h >= cfg.volume.surface.min_height && h < size as i32);
            for y in h as usize..size {
                assert!(!out.blocks.get_local(x, y, z).is_solid());
            }
            let top = out.blocks.get_local(x, h as usize - 1, z);
            assert!(matches!(top, BlockType::Grass | BlockType::Sand | BlockType::Snow));
            assert_eq!(out.blocks.column_height(x, z), h);
        }
    }
}

#[test]
fn placement_respects_depth_gates() {
    let cfg = cfg32();
    for key in [ChunkKey::new(0, 0), ChunkKey::new(32, 0), ChunkKey::new(0, -32)] {
        let out = VolumetricGenerator::new(&cfg, &WhiteNoise).generate(key).unwrap();
        let size = cfg.chunk_size;
        for z in 0..size {
            for y in 0..size {
                for x in 0..size {
                    let y = y as i32;
                    match out.blocks.get_local(x, y as usize, z) {
                        BlockType::Lava => assert!(y < cfg.volume.caves.lava_max_y),
                        BlockType::Diamond => assert!(y < cfg.volume.ores.diamond_max_y),
                        BlockType::Gold => assert!(y < cfg.volume.ores.gold_max_y),
                        BlockType::Iron => assert!(y < cfg.volume.ores.iron_max_y),
                        _ => {}
                    }
                }
            }
        }
    }
}

#[test]
fn neutral_noise_gives_flat_layers() {
    let mut cfg = cfg32();
    cfg.volume.ores.enable = false;
    let out = VolumetricGenerator::new(&cfg, &ConstantNoise(0.5))
        .generate(ChunkKey::new(0, 0))
        .unwrap();
    assert!(out.heights.as_slice().iter().all(|&h| h == 16));
    for (x, z) in [(0, 0), (7, 19), (31, 31)] {
        assert_eq!(out.blocks.get_local(x, 15, z), BlockType::Grass);
        for y in 12..15 {
            assert_eq!(out.blocks.get_local(x, y, z), BlockType::Dirt);
        }
        for y in 0..12 {
            assert_eq!(out.blocks.get_local(x, y, z), BlockType::Stone);
        }
        for y in 16..32 {
            assert_eq!(out.blocks.get_local(x, y, z), BlockType::Air);
        }
    }
}

#[test]
fn low_surfaces_flood_and_turn_to_sand() {
    let mut cfg = cfg32();
    cfg.volume.surface.base_height = 6.0;
    cfg.volume.ores.enable = false;
    let out = VolumetricGenerator::new(&cfg, &ConstantNoise(0.5))
        .generate(ChunkKey::new(0, 0))
        .unwrap();
    assert_eq!(out.blocks.get_local(3, 5, 3), BlockType::Sand);
    assert_eq!(out.blocks.get_local(3, 4, 3), BlockType::Sand);
    for y in 6..10 {
        assert_eq!(out.blocks.get_local(3, y, 3), BlockType::Water);
    }
    assert_eq!(out.blocks.get_local(3, 10, 3), BlockType::Air);
}

#[test]
fn enclosed_cells_are_culled() {
    let mut grid = BlockGrid::filled(4, BlockType::Stone);
    let visible = grid.visible_cells();
    assert!(!visible.iter().any(|&(x, y, z, _)| (x, y, z) == (1, 1, 1)));
    assert!(!visible.iter().any(|&(x, y, z, _)| (x, y, z) == (2, 2, 1)));
    assert!(visible.iter().any(|&(x, y, z, _)| (x, y, z) == (0, 1, 1)));
    assert!(visible.iter().any(|&(x, y, z, _)| (x, y, z) == (3, 3, 3)));
    assert_eq!(visible.len(), 64 - 8);

    grid.set(1, 2, 1, BlockType::Air);
    grid.set(2, 2, 2, BlockType::Water);
    let visible = grid.visible_cells();
    let has = |p: (usize, usize, usize)| visible.iter().any(|&(x, y, z, _)| (x, y, z) == p);
    assert!(has((1, 1, 1)));
    assert!(!has((1, 2, 1)));
    assert!(has((2, 2, 2)));
    assert!(has((2, 1, 2)));
    assert!(!has((2, 1, 1)));
    assert!(!grid.is_exposed(2, 1, 1));
}

#[test]
fn generated_visibility_matches_neighbours() {
    let cfg = cfg32();
    let out = VolumetricGenerator::new(&cfg, &WhiteNoise)
        .generate(ChunkKey::new(32, 32))
        .unwrap();
    let g = &out.blocks;
    let visible = g.visible_cells();
    let mut emitted = vec![false; g.cells().len()];
    for &(x, y, z, b) in &visible {
        assert_eq!(g.get_local(x, y, z), b);
        emitted[g.idx(x, y, z)] = true;
    }
    let s = g.size() as i32;
    for z in 0..s {
        for y in 0..s {
            for x in 0..s {
                let b = g.get(x, y, z).unwrap();
                let open = [(-1, 0, 0), (1, 0, 0), (0, -1, 0), (0, 1, 0), (0, 0, -1), (0, 0, 1)]
                    .iter()
                    .any(|&(dx, dy, dz)| {
                        g.get(x + dx, y + dy, z + dz)
                            .is_none_or(|n| matches!(n, BlockType::Air | BlockType::Water | BlockType::Lava))
                    });
                let expect = match b {
                    BlockType::Air => false,
                    BlockType::Water | BlockType::Lava => true,
                    _ => open,
                };
                assert_eq!(emitted[g.idx(x as usize, y as usize, z as usize)], expect);
            }
        }
    }
}

#[test]
fn grid_bounds() {
    let mut g = BlockGrid::filled(3, BlockType::Air);
    assert_eq!(g.get(-1, 0, 0), None);
    assert_eq!(g.get(0, 3, 0), None);
    assert!(!g.set(3, 0, 0, BlockType::Stone));
    assert!(g.set(2, 1, 0, BlockType::Stone));
    assert_eq!(g.get(2, 1, 0), Some(BlockType::Stone));
    assert_eq!(g.column_height(2, 0), 2);
    assert_eq!(g.column_height(0, 0), 0);
    assert!(BlockGrid::from_cells(3, vec![BlockType::Air; 26]).is_none());
}

#[test]
fn ore_cascade() {
    let o = Ores::default();
    assert_eq!(pick_ore(&o, 5, 0.0), BlockType::Diamond);
    assert_eq!(pick_ore(&o, 20, 0.1), BlockType::Gold);
    assert_eq!(pick_ore(&o, 30, 0.1), BlockType::Iron);
    assert_eq!(pick_ore(&o, 30, 0.9), BlockType::Coal);
    assert_eq!(pick_ore(&o, 50, 0.0), BlockType::Coal);
}

#[test]
fn cave_threshold_drops_with_depth() {
    let c = delve_world::worldgen::Caves::default();
    let shallow = threshold_at(&c, 1, 64);
    let deep = threshold_at(&c, 60, 64);
    assert!(deep < shallow);
    assert!(threshold_at(&c, 10_000, 64) >= c.min_threshold);
}

#[test]
fn partial_surface_table_keeps_volumetric_defaults() {
    let cfg: WorldGenConfig = toml::from_str("[volume.surface]\nheight_scale = 8.0\n").unwrap();
    let s = &cfg.volume.surface;
    assert_eq!(s.height_scale, 8.0);
    assert_eq!(s.base_height, 30.0);
    assert_eq!(s.min_height, 4);
    assert_eq!(s.max_height, 62);
    assert_eq!(s.octaves, 4);
    // The height-field shape keeps its own defaults.
    assert_eq!(cfg.height.base_height, 40.0);
    assert_eq!(cfg.height.max_height, 120);

    let full = WorldGenConfig::default();
    assert_eq!(full.volume.surface.base_height, 30.0);
    assert_eq!(full.volume.surface.height_scale, 10.0);
}
