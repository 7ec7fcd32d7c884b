use std::fs;
use std::path::Path;

use delve::{ConfigError, DelveConfig, PlayerInput, Session, load_config};
use delve_geom::Vec3;
use delve_world::{ChunkKey, ConstantNoise, GeneratorMode};

/// Flat 16-wide height-field world at height 40 and a 1/16 s tick.
fn flat_cfg() -> DelveConfig {
    let mut cfg = DelveConfig::default();
    cfg.worldgen.chunk_size = 16;
    cfg.worldgen.mode = GeneratorMode::HeightField;
    cfg.physics.fixed_dt = 0.0625;
    cfg.physics.max_ticks_per_frame = 5;
    cfg
}

fn flat_session(spawn: Vec3) -> Session<ConstantNoise> {
    Session::with_noise(flat_cfg(), spawn, ConstantNoise(0.5)).unwrap()
}

fn walk_x() -> PlayerInput {
    PlayerInput {
        walk_dir: Vec3::new(1.0, 0.0, 0.0),
        jump: false,
    }
}

#[test]
fn spawn_neighbourhood_is_loaded_before_first_tick() {
    let s = flat_session(Vec3::new(0.5, 100.0, 0.5));
    assert_eq!(s.loaded_chunks(), 9);
    assert_eq!(s.ticks(), 0);
    assert_eq!(s.height_below(), 40);
}

#[test]
fn player_falls_onto_generated_terrain() {
    let mut s = flat_session(Vec3::new(0.5, 60.0, 0.5));
    for _ in 0..200 {
        s.step(PlayerInput::default());
        if s.on_ground() {
            break;
        }
    }
    assert!(s.on_ground());
    assert_eq!(s.position().y, 42.0);
}

#[test]
fn loaded_chunks_follow_the_walker() {
    let mut s = flat_session(Vec3::new(0.5, 42.0, 0.5));
    let mut crossings = 0;
    for _ in 0..120 {
        let before = s.position();
        if s.step(walk_x()).is_some() {
            crossings += 1;
        }
        let center = ChunkKey::containing(before.x, before.z, 16);
        let mut expect = s.streamer().required_keys(center);
        expect.sort_unstable();
        assert_eq!(s.streamer().loaded_keys(), expect);
        assert!(s.on_ground());
        assert_eq!(s.position().y, 42.0);
    }
    // 120 ticks at 5 m/s and 1/16 s cover 37.5 blocks: two chunk borders.
    assert_eq!(crossings, 2);
    assert!(s.position().x > 37.0);
}

#[test]
fn advance_caps_ticks_per_frame() {
    let mut s = flat_session(Vec3::new(0.5, 42.0, 0.5));
    assert_eq!(s.advance(1.0, PlayerInput::default()), 5);
    assert_eq!(s.ticks(), 5);
    // The backlog beyond the cap is dropped, not carried into later frames.
    assert_eq!(s.advance(0.03125, PlayerInput::default()), 0);
    assert_eq!(s.advance(0.03125, PlayerInput::default()), 1);
    assert_eq!(s.ticks(), 6);
}

#[test]
fn jump_request_fires_once_per_frame() {
    let mut s = flat_session(Vec3::new(0.5, 42.0, 0.5));
    s.step(PlayerInput::default());
    assert!(s.on_ground());
    let jump = PlayerInput {
        walk_dir: Vec3::ZERO,
        jump: true,
    };
    assert_eq!(s.advance(0.1875, jump), 3);
    assert!(!s.on_ground());
    // 8 m/s minus three ticks of gravity
    let expect = 8.0 - 20.0 * 0.0625 * 3.0;
    assert!((s.walker().vel.y - expect).abs() < 1e-4, "{}", s.walker().vel.y);
}

#[test]
fn clock_advances_with_ticks() {
    let mut s = flat_session(Vec3::new(0.5, 42.0, 0.5));
    let noon = s.light();
    assert!(noon.sun_visible);
    assert_eq!(noon.light_level(), 255);
    for _ in 0..100 {
        s.step(PlayerInput::default());
    }
    let later = s.light();
    assert!(later.phase > noon.phase);
    assert!(later.brightness < noon.brightness);
}

#[test]
fn partial_toml_keeps_defaults() {
    let cfg: DelveConfig = toml::from_str(
        r#"
        [worldgen]
        chunk_size = 32
        mode = "heightfield"

        [physics]
        gravity = 9.81

        [stream]
        radius = 2
        "#,
    )
    .unwrap();
    assert_eq!(cfg.worldgen.chunk_size, 32);
    assert_eq!(cfg.worldgen.mode, GeneratorMode::HeightField);
    assert_eq!(cfg.physics.gravity, 9.81);
    assert_eq!(cfg.physics.jump_velocity, 8.0);
    assert_eq!(cfg.physics.max_step_height, 1.0);
    assert_eq!(cfg.stream.radius, 2);
    assert_eq!(cfg.day.day_length, 600.0);
}

#[test]
fn shipped_config_loads() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("delve.toml");
    let cfg = load_config(&path).unwrap();
    assert!(cfg.worldgen.chunk_size > 0);
    assert!(cfg.physics.validate().is_ok());
}

#[test]
fn load_rejects_inverted_cliff_window() {
    let path = std::env::temp_dir().join(format!("delve-bad-{}.toml", std::process::id()));
    fs::write(&path, "[physics]\ncliff_min_drop = 2.0\ncliff_max_drop = 1.0\n").unwrap();
    let err = load_config(&path).unwrap_err();
    let _ = fs::remove_file(&path);
    assert!(err.to_string().contains("cliff_min_drop"), "{err}");
}

#[test]
fn session_rejects_unusable_physics() {
    let mut cfg = flat_cfg();
    cfg.physics.substep_length = 0.0;
    let err = Session::with_noise(cfg, Vec3::new(0.5, 42.0, 0.5), ConstantNoise(0.5)).err();
    assert!(matches!(err, Some(ConfigError::Physics(_))), "{err:?}");

    let mut cfg = flat_cfg();
    cfg.physics.edge_increment = -1.0;
    assert!(Session::with_noise(cfg, Vec3::ZERO, ConstantNoise(0.5)).is_err());

    let mut cfg = flat_cfg();
    cfg.worldgen.chunk_size = 1;
    let err = Session::with_noise(cfg, Vec3::ZERO, ConstantNoise(0.5)).err();
    assert!(matches!(err, Some(ConfigError::World(_))), "{err:?}");
}
