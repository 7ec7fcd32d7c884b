use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use delve::{DelveConfig, PlayerInput, Session, load_config};
use delve_geom::Vec3;
use delve_world::GeneratorMode;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    Heightfield,
    Volumetric,
}

impl From<ModeArg> for GeneratorMode {
    fn from(value: ModeArg) -> Self {
        match value {
            ModeArg::Heightfield => GeneratorMode::HeightField,
            ModeArg::Volumetric => GeneratorMode::Volumetric,
        }
    }
}

/// Headless run of the terrain and walker simulation.
#[derive(Parser, Debug)]
#[command(name = "delve", version, about)]
struct Args {
    /// TOML config; defaults apply to anything it leaves out
    #[arg(long)]
    config: Option<PathBuf>,
    /// Override the terrain generator
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,
    /// Fixed ticks to simulate
    #[arg(long, default_value_t = 600)]
    ticks: u64,
    /// Spawn head position as x,y,z
    #[arg(long, default_value = "0,100,0", value_parser = parse_vec3)]
    spawn: Vec3,
    /// Walk direction as dx,dz (zero to stand still)
    #[arg(long, default_value = "0,0", value_parser = parse_dir)]
    walk: Vec3,
    /// Jump every N ticks
    #[arg(long)]
    jump_every: Option<u64>,
    /// Log filter when RUST_LOG is unset (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn parse_floats(s: &str, n: usize) -> Result<Vec<f32>, String> {
    let parts: Vec<f32> = s
        .split(',')
        .map(|p| p.trim().parse::<f32>().map_err(|e| format!("{p:?}: {e}")))
        .collect::<Result<_, _>>()?;
    if parts.len() != n {
        return Err(format!("expected {n} comma-separated numbers, got {}", parts.len()));
    }
    Ok(parts)
}

fn parse_vec3(s: &str) -> Result<Vec3, String> {
    let v = parse_floats(s, 3)?;
    Ok(Vec3::new(v[0], v[1], v[2]))
}

fn parse_dir(s: &str) -> Result<Vec3, String> {
    let v = parse_floats(s, 2)?;
    Ok(Vec3::new(v[0], 0.0, v[1]))
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    env_logger::Builder::new()
        .parse_filters(&args.log_level)
        .parse_env("RUST_LOG")
        .init();

    let mut cfg = match &args.config {
        Some(path) => load_config(path)?,
        None => DelveConfig::default(),
    };
    if let Some(mode) = args.mode {
        cfg.worldgen.mode = mode.into();
    }
    log::info!(
        "delve: chunk_size={} mode={:?} radius={} spawn={:?}",
        cfg.worldgen.chunk_size,
        cfg.worldgen.mode,
        cfg.stream.radius,
        args.spawn
    );

    let mut session = Session::new(cfg, args.spawn)?;
    let report_every = 60;
    for t in 0..args.ticks {
        let jump = args.jump_every.is_some_and(|n| n > 0 && t % n == 0);
        let input = PlayerInput {
            walk_dir: args.walk,
            jump,
        };
        if let Some(up) = session.step(input) {
            log::info!(
                target: "stream",
                "tick {}: center ({}, {}) +{} -{}",
                t,
                up.center.x,
                up.center.z,
                up.created.len(),
                up.evicted.len()
            );
        }
        if t % report_every == 0 || t + 1 == args.ticks {
            let p = session.position();
            log::info!(
                "tick {:>5}: pos=({:.2}, {:.2}, {:.2}) {:?} ground={} chunks={} instances={} light={}",
                t,
                p.x,
                p.y,
                p.z,
                session.state(),
                session.height_below(),
                session.loaded_chunks(),
                session.streamer().chunks().total_instances(),
                session.light().light_level()
            );
        }
    }
    let stats = session.streamer().stats();
    log::info!(
        "done: {} ticks, chunks created={} evicted={} degraded={}",
        session.ticks(),
        stats.created,
        stats.evicted,
        stats.degraded
    );
    Ok(())
}
