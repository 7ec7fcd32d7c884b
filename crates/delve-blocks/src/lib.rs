//! Block type catalogue shared by terrain generation, chunks, and physics.
#![forbid(unsafe_code)]

pub mod types;

pub use types::{BlockType, UnknownBlock};
