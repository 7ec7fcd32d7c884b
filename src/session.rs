use delve_chunk::ChunkLookup;
use delve_geom::Vec3;
use delve_runtime::{ChunkStreamer, StreamUpdate};
use delve_world::{NoiseSource, WhiteNoise};

use crate::config::{ConfigError, DelveConfig, PhysicsConfig};
use crate::day_cycle::{DayCycle, DayLightSample};
use crate::player::{MotionState, PlayerInput, Walker};

/// Player, loaded terrain, and clock, advanced in fixed ticks.
pub struct Session<N: NoiseSource = WhiteNoise> {
    streamer: ChunkStreamer<N>,
    walker: Walker,
    day: DayCycle,
    light: DayLightSample,
    physics: PhysicsConfig,
    accumulator: f32,
    ticks: u64,
}

impl Session<WhiteNoise> {
    pub fn new(cfg: DelveConfig, spawn: Vec3) -> Result<Self, ConfigError> {
        Self::with_noise(cfg, spawn, WhiteNoise)
    }
}

impl<N: NoiseSource> Session<N> {
    /// Validates `cfg`, then loads the spawn neighbourhood before the first tick.
    pub fn with_noise(cfg: DelveConfig, spawn: Vec3, noise: N) -> Result<Self, ConfigError> {
        cfg.validate()?;
        let DelveConfig {
            worldgen,
            stream,
            physics,
            day,
        } = cfg;
        let mut streamer = ChunkStreamer::with_noise(worldgen, stream, noise);
        streamer.init(spawn.x, spawn.z);
        let day = DayCycle::from_config(&day);
        let light = day.sample();
        Ok(Self {
            streamer,
            walker: Walker::new(spawn, physics.clone()),
            day,
            light,
            physics,
            accumulator: 0.0,
            ticks: 0,
        })
    }

    #[inline]
    pub fn walker(&self) -> &Walker {
        &self.walker
    }

    #[inline]
    pub fn walker_mut(&mut self) -> &mut Walker {
        &mut self.walker
    }

    #[inline]
    pub fn streamer(&self) -> &ChunkStreamer<N> {
        &self.streamer
    }

    #[inline]
    pub fn streamer_mut(&mut self) -> &mut ChunkStreamer<N> {
        &mut self.streamer
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.walker.pos
    }

    #[inline]
    pub fn on_ground(&self) -> bool {
        self.walker.on_ground
    }

    #[inline]
    pub fn state(&self) -> MotionState {
        self.walker.state()
    }

    #[inline]
    pub fn light(&self) -> DayLightSample {
        self.light
    }

    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// One fixed tick: clock, then chunk reconcile, then physics against the settled map.
    pub fn step(&mut self, input: PlayerInput) -> Option<StreamUpdate> {
        let dt = self.physics.fixed_dt;
        self.light = self.day.advance(dt);
        let pos = self.walker.pos;
        let update = self.streamer.update(pos.x, pos.z);
        if input.jump {
            self.walker.jump();
        }
        self.walker.tick(&self.streamer, input.walk_dir, dt);
        self.ticks += 1;
        update
    }

    /// Runs as many fixed ticks as `frame_dt` covers, at most `max_ticks_per_frame`.
    /// A jump request only applies to the first tick. Returns the ticks run.
    pub fn advance(&mut self, frame_dt: f32, input: PlayerInput) -> u32 {
        let dt = self.physics.fixed_dt;
        let max_ticks = self.physics.max_ticks_per_frame.max(1);
        self.accumulator = (self.accumulator + frame_dt.max(0.0)).min(dt * max_ticks as f32);
        let mut ran = 0;
        let mut input = input;
        while self.accumulator >= dt && ran < max_ticks {
            self.step(input);
            input.jump = false;
            self.accumulator -= dt;
            ran += 1;
        }
        ran
    }

    /// Terrain height of the column under the player, or the not-found sentinel.
    pub fn height_below(&self) -> i32 {
        let p = self.walker.pos;
        crate::collision::column_height(&self.streamer, p.x, p.z)
    }

    pub fn loaded_chunks(&self) -> usize {
        self.streamer.chunks().len()
    }

    pub fn chunk_size(&self) -> i32 {
        self.streamer.chunk_size()
    }
}
