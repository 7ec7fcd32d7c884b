pub mod caves;
pub mod heightfield;
pub mod ores;
pub mod volumetric;

pub use heightfield::{HeightFieldGenerator, HeightFieldOutput, HeightMap};
pub use volumetric::{BlockGrid, VolumetricGenerator, VolumetricOutput};

use crate::noise::NoiseSource;
use crate::worldgen::{GeneratorMode, WorldGenConfig};
use crate::{ChunkKey, GenError};

/// Output of whichever generator the config selects.
#[derive(Clone, Debug, PartialEq)]
pub enum GeneratedTerrain {
    HeightField(HeightFieldOutput),
    Volumetric(VolumetricOutput),
}

impl GeneratedTerrain {
    pub fn heights(&self) -> &HeightMap {
        match self {
            GeneratedTerrain::HeightField(o) => &o.heights,
            GeneratedTerrain::Volumetric(o) => &o.heights,
        }
    }
}

pub fn generate<N: NoiseSource + ?Sized>(
    cfg: &WorldGenConfig,
    noise: &N,
    key: ChunkKey,
) -> Result<GeneratedTerrain, GenError> {
    match cfg.mode {
        GeneratorMode::HeightField => HeightFieldGenerator::new(cfg, noise)
            .generate(key)
            .map(GeneratedTerrain::HeightField),
        GeneratorMode::Volumetric => VolumetricGenerator::new(cfg, noise)
            .generate(key)
            .map(GeneratedTerrain::Volumetric),
    }
}
