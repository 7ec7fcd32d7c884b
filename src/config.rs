use serde::Deserialize;
use std::error::Error;
use std::fmt;
use std::fs;
use std::path::Path;

use delve_runtime::StreamConfig;
use delve_world::{GenError, WorldGenConfig};

/// Everything `delve.toml` can set. Missing sections and fields take their defaults.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct DelveConfig {
    #[serde(default)]
    pub worldgen: WorldGenConfig,
    #[serde(default)]
    pub stream: StreamConfig,
    #[serde(default)]
    pub physics: PhysicsConfig,
    #[serde(default)]
    pub day: DayConfig,
}

/// Player body and the empirically tuned movement thresholds.
#[derive(Clone, Debug, Deserialize)]
pub struct PhysicsConfig {
    #[serde(default = "default_gravity")]
    pub gravity: f32,
    #[serde(default = "default_jump_velocity")]
    pub jump_velocity: f32,
    /// Vertical speed cap, both directions.
    #[serde(default = "default_max_velocity")]
    pub max_velocity: f32,
    #[serde(default = "default_radius")]
    pub radius: f32,
    #[serde(default = "default_height")]
    pub height: f32,
    #[serde(default = "default_ground_epsilon")]
    pub ground_epsilon: f32,
    #[serde(default = "default_max_step_height")]
    pub max_step_height: f32,
    #[serde(default = "default_walk_speed")]
    pub walk_speed: f32,
    /// Downward speed above which the enhanced point set is used.
    #[serde(default = "default_high_speed")]
    pub high_speed_threshold: f32,
    #[serde(default = "default_cliff_min")]
    pub cliff_min_drop: f32,
    #[serde(default = "default_cliff_max")]
    pub cliff_max_drop: f32,
    /// A grounded player whose floor drops further than this starts falling.
    #[serde(default = "default_ledge_drop")]
    pub ledge_drop: f32,
    #[serde(default = "default_edge_probe")]
    pub edge_probe: f32,
    #[serde(default = "default_edge_increment")]
    pub edge_increment: f32,
    #[serde(default = "default_jump_nudge")]
    pub jump_nudge: f32,
    #[serde(default = "default_substep_length")]
    pub substep_length: f32,
    #[serde(default = "default_min_substeps")]
    pub min_substeps: u32,
    #[serde(default = "default_fixed_dt")]
    pub fixed_dt: f32,
    #[serde(default = "default_max_ticks_per_frame")]
    pub max_ticks_per_frame: u32,
}

fn default_gravity() -> f32 {
    20.0
}
fn default_jump_velocity() -> f32 {
    8.0
}
fn default_max_velocity() -> f32 {
    50.0
}
fn default_radius() -> f32 {
    0.4
}
fn default_height() -> f32 {
    2.0
}
fn default_ground_epsilon() -> f32 {
    0.05
}
fn default_max_step_height() -> f32 {
    1.0
}
fn default_walk_speed() -> f32 {
    5.0
}
fn default_high_speed() -> f32 {
    10.0
}
fn default_cliff_min() -> f32 {
    0.5
}
fn default_cliff_max() -> f32 {
    1.0
}
fn default_ledge_drop() -> f32 {
    1.0
}
fn default_edge_probe() -> f32 {
    0.3
}
fn default_edge_increment() -> f32 {
    0.05
}
fn default_jump_nudge() -> f32 {
    0.1
}
fn default_substep_length() -> f32 {
    0.05
}
fn default_min_substeps() -> u32 {
    10
}
fn default_fixed_dt() -> f32 {
    1.0 / 60.0
}
fn default_max_ticks_per_frame() -> u32 {
    5
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: default_gravity(),
            jump_velocity: default_jump_velocity(),
            max_velocity: default_max_velocity(),
            radius: default_radius(),
            height: default_height(),
            ground_epsilon: default_ground_epsilon(),
            max_step_height: default_max_step_height(),
            walk_speed: default_walk_speed(),
            high_speed_threshold: default_high_speed(),
            cliff_min_drop: default_cliff_min(),
            cliff_max_drop: default_cliff_max(),
            ledge_drop: default_ledge_drop(),
            edge_probe: default_edge_probe(),
            edge_increment: default_edge_increment(),
            jump_nudge: default_jump_nudge(),
            substep_length: default_substep_length(),
            min_substeps: default_min_substeps(),
            fixed_dt: default_fixed_dt(),
            max_ticks_per_frame: default_max_ticks_per_frame(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct DayConfig {
    /// Seconds for a full day.
    #[serde(default = "default_day_length")]
    pub day_length: f32,
    /// Starting time as a fraction of the day; 0.25 is noon.
    #[serde(default = "default_start_fraction")]
    pub start_fraction: f32,
}

fn default_day_length() -> f32 {
    600.0
}
fn default_start_fraction() -> f32 {
    0.25
}

impl Default for DayConfig {
    fn default() -> Self {
        Self {
            day_length: default_day_length(),
            start_fraction: default_start_fraction(),
        }
    }
}

/// A config that parsed but cannot drive a session.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    Physics(&'static str),
    World(GenError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Physics(msg) => write!(f, "invalid physics config: {}", msg),
            ConfigError::World(e) => write!(f, "invalid worldgen config: {}", e),
        }
    }
}

impl Error for ConfigError {}

impl PhysicsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fixed_dt > 0.0 && self.fixed_dt.is_finite()) {
            return Err(ConfigError::Physics("fixed_dt must be positive"));
        }
        if self.radius <= 0.0 || self.height <= 0.0 {
            return Err(ConfigError::Physics("body dimensions must be positive"));
        }
        if !(self.substep_length > 0.0 && self.edge_increment > 0.0) {
            return Err(ConfigError::Physics("substep_length and edge_increment must be positive"));
        }
        if self.cliff_min_drop > self.cliff_max_drop {
            return Err(ConfigError::Physics("cliff_min_drop exceeds cliff_max_drop"));
        }
        Ok(())
    }
}

impl DelveConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.worldgen.validate().map_err(ConfigError::World)?;
        self.physics.validate()
    }
}

pub fn load_config(path: &Path) -> Result<DelveConfig, Box<dyn Error>> {
    let s = fs::read_to_string(path)?;
    let cfg: DelveConfig = toml::from_str(&s)?;
    cfg.validate()?;
    Ok(cfg)
}
