//! Voxel sandbox core: streamed terrain and a cylinder-bodied walker.
#![forbid(unsafe_code)]

pub mod collision;
pub mod config;
pub mod day_cycle;
pub mod player;
pub mod session;

pub use config::{ConfigError, DayConfig, DelveConfig, PhysicsConfig, load_config};
pub use player::{MotionState, PlayerInput, Walker};
pub use session::Session;
