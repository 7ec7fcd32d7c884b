//! One generated terrain region plus its flattened render instances.
#![forbid(unsafe_code)]

mod error;
mod terrain;

pub use error::EditError;
pub use terrain::{HeightFieldTerrain, Terrain, VolumetricTerrain};

use std::panic::{self, AssertUnwindSafe};

use delve_blocks::BlockType;
use delve_world::{BlockGrid, ChunkKey, GenError, GeneratedTerrain, HeightMap, NoiseSource, WorldGenConfig};

/// Height sentinel for columns a chunk does not own (or cannot answer for).
pub const NO_HEIGHT: i32 = -1;

/// One visible cube in world block coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockInstance {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub block: BlockType,
}

impl BlockInstance {
    /// `[x, y, z, 0.0, id]`, the per-instance layout the renderer uploads.
    #[inline]
    pub fn to_f32x5(self) -> [f32; 5] {
        [
            self.x as f32,
            self.y as f32,
            self.z as f32,
            0.0,
            f32::from(self.block.id()),
        ]
    }
}

/// Terrain variant picked when the chunk is created.
#[derive(Clone, Debug, PartialEq)]
pub enum ChunkTerrain {
    HeightField(HeightFieldTerrain),
    Volumetric(VolumetricTerrain),
    /// Generation failed; every query answers with its not-found sentinel.
    Degraded(GenError),
}

impl ChunkTerrain {
    fn as_terrain(&self) -> Option<&dyn Terrain> {
        match self {
            ChunkTerrain::HeightField(t) => Some(t),
            ChunkTerrain::Volumetric(t) => Some(t),
            ChunkTerrain::Degraded(_) => None,
        }
    }

    fn as_terrain_mut(&mut self) -> Option<&mut dyn Terrain> {
        match self {
            ChunkTerrain::HeightField(t) => Some(t),
            ChunkTerrain::Volumetric(t) => Some(t),
            ChunkTerrain::Degraded(_) => None,
        }
    }
}

impl From<GeneratedTerrain> for ChunkTerrain {
    fn from(value: GeneratedTerrain) -> Self {
        match value {
            GeneratedTerrain::HeightField(o) => {
                ChunkTerrain::HeightField(HeightFieldTerrain::new(o.heights, o.columns))
            }
            GeneratedTerrain::Volumetric(o) => {
                ChunkTerrain::Volumetric(VolumetricTerrain::new(o.heights, o.blocks))
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct Chunk {
    key: ChunkKey,
    size: usize,
    terrain: ChunkTerrain,
    instances: Vec<BlockInstance>,
}

impl Chunk {
    /// Runs the configured generator. Errors and panics both end up as
    /// [`ChunkTerrain::Degraded`]; this never fails.
    pub fn generate<N: NoiseSource + ?Sized>(cfg: &WorldGenConfig, noise: &N, key: ChunkKey) -> Self {
        let result = panic::catch_unwind(AssertUnwindSafe(|| delve_world::generate(cfg, noise, key)));
        let terrain = match result {
            Ok(Ok(t)) => ChunkTerrain::from(t),
            Ok(Err(e)) => ChunkTerrain::Degraded(e),
            Err(payload) => ChunkTerrain::Degraded(GenError::Panicked(panic_message(payload.as_ref()))),
        };
        if let ChunkTerrain::Degraded(e) = &terrain {
            log::warn!("chunk ({}, {}) degraded: {}", key.x, key.z, e);
        }
        Self::with_terrain(key, cfg.chunk_size, terrain)
    }

    pub fn with_terrain(key: ChunkKey, size: usize, terrain: ChunkTerrain) -> Self {
        let mut chunk = Self {
            key,
            size,
            terrain,
            instances: Vec::new(),
        };
        chunk.rebuild_instances();
        chunk
    }

    /// Uniform height-field chunk; handy for tests and flat worlds.
    pub fn flat(key: ChunkKey, size: usize, height: i32, block: BlockType) -> Self {
        let terrain = HeightFieldTerrain::new(HeightMap::filled(size, height), vec![block; size * size]);
        Self::with_terrain(key, size, ChunkTerrain::HeightField(terrain))
    }

    /// Volumetric chunk over a prebuilt grid, heights derived from the grid.
    pub fn from_blocks(key: ChunkKey, blocks: BlockGrid) -> Self {
        let size = blocks.size();
        Self::with_terrain(
            key,
            size,
            ChunkTerrain::Volumetric(VolumetricTerrain::from_blocks(blocks)),
        )
    }

    #[inline]
    pub fn key(&self) -> ChunkKey {
        self.key
    }

    #[inline]
    pub fn origin(&self) -> (i32, i32) {
        (self.key.x, self.key.z)
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn terrain(&self) -> &ChunkTerrain {
        &self.terrain
    }

    pub fn degraded_reason(&self) -> Option<&GenError> {
        match &self.terrain {
            ChunkTerrain::Degraded(e) => Some(e),
            _ => None,
        }
    }

    #[inline]
    pub fn is_degraded(&self) -> bool {
        self.degraded_reason().is_some()
    }

    /// True when the block column `(wx, wz)` falls in this chunk's square.
    #[inline]
    pub fn contains(&self, wx: i32, wz: i32) -> bool {
        self.key.contains_block(wx, wz, self.size as i32)
    }

    #[inline]
    fn local(&self, wx: i32, wz: i32) -> (i32, i32) {
        (wx - self.key.x, wz - self.key.z)
    }

    /// Column height, or [`NO_HEIGHT`] outside this chunk or when degraded.
    pub fn height_at(&self, wx: i32, wz: i32) -> i32 {
        let (lx, lz) = self.local(wx, wz);
        self.terrain
            .as_terrain()
            .and_then(|t| t.height_local(lx, lz))
            .unwrap_or(NO_HEIGHT)
    }

    pub fn block_at(&self, wx: i32, wy: i32, wz: i32) -> Option<BlockType> {
        let (lx, lz) = self.local(wx, wz);
        self.terrain.as_terrain()?.block_local(lx, wy, lz)
    }

    #[inline]
    pub fn is_solid(&self, wx: i32, wy: i32, wz: i32) -> bool {
        self.block_at(wx, wy, wz).is_some_and(BlockType::is_solid)
    }

    /// Mutates one cell and rebuilds the instance list. Nothing changes on error.
    pub fn set_block_at(&mut self, wx: i32, wy: i32, wz: i32, block: BlockType) -> Result<(), EditError> {
        let (lx, lz) = self.local(wx, wz);
        let terrain = self.terrain.as_terrain_mut().ok_or(EditError::Degraded)?;
        terrain.set_block_local(lx, wy, lz, block)?;
        self.rebuild_instances();
        Ok(())
    }

    pub fn rebuild_instances(&mut self) {
        let (ox, oz) = self.origin();
        self.instances = match self.terrain.as_terrain() {
            Some(t) => t
                .visible_local()
                .into_iter()
                .map(|(x, y, z, block)| BlockInstance {
                    x: ox + x,
                    y,
                    z: oz + z,
                    block,
                })
                .collect(),
            None => Vec::new(),
        };
    }

    #[inline]
    pub fn instances(&self) -> &[BlockInstance] {
        &self.instances
    }

    #[inline]
    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// Flattened `[x, y, z, 0.0, id]` tuples for instanced drawing.
    pub fn instance_buffer(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.instances.len() * 5);
        for inst in &self.instances {
            out.extend_from_slice(&inst.to_f32x5());
        }
        out
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Read access to whichever chunks are loaded. Physics and edit routing go through this.
pub trait ChunkLookup {
    fn chunk_size(&self) -> i32;
    fn chunk(&self, key: ChunkKey) -> Option<&Chunk>;

    fn chunk_containing(&self, wx: i32, wz: i32) -> Option<&Chunk> {
        self.chunk(ChunkKey::containing_block(wx, wz, self.chunk_size()))
    }

    /// Column height from the owning chunk, or [`NO_HEIGHT`] if it is not loaded.
    fn column_height(&self, wx: i32, wz: i32) -> i32 {
        self.chunk_containing(wx, wz)
            .map_or(NO_HEIGHT, |c| c.height_at(wx, wz))
    }

    fn block_at(&self, wx: i32, wy: i32, wz: i32) -> Option<BlockType> {
        self.chunk_containing(wx, wz)?.block_at(wx, wy, wz)
    }
}
