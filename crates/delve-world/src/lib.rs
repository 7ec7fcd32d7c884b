//! Chunk keys, seeded noise, worldgen parameters, and the two terrain generators.
#![forbid(unsafe_code)]

pub mod chunk_key;
pub mod error;
pub mod generation;
pub mod noise;
pub mod worldgen;

pub use chunk_key::ChunkKey;
pub use error::GenError;
pub use generation::{
    BlockGrid, GeneratedTerrain, HeightFieldGenerator, HeightFieldOutput, HeightMap,
    VolumetricGenerator, VolumetricOutput, generate,
};
pub use noise::{ConstantNoise, Mulberry32, NoiseSource, WhiteNoise};
pub use worldgen::{GeneratorMode, WorldGenConfig};

/// Default chunk side length in blocks.
pub const CHUNK_SIZE: usize = 64;
