//! Chunk streaming: keeps the loaded set equal to the neighbourhood of the player's chunk.
#![forbid(unsafe_code)]

mod chunk_map;

pub use chunk_map::ChunkMap;

use std::time::Instant;

use delve_blocks::BlockType;
use delve_chunk::{Chunk, ChunkLookup, EditError};
use delve_world::{ChunkKey, NoiseSource, WhiteNoise, WorldGenConfig};
use hashbrown::HashSet;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct StreamConfig {
    /// Chunks kept on each side of the centre chunk; 1 gives a 3x3 square.
    #[serde(default = "default_radius")]
    pub radius: i32,
    /// Leave out the four corner chunks of the square.
    #[serde(default)]
    pub skip_corners: bool,
    /// Generate a batch of missing chunks on the worker pool.
    #[serde(default = "default_parallel")]
    pub parallel: bool,
    /// Worker threads for parallel generation; 0 lets rayon decide.
    #[serde(default)]
    pub workers: usize,
}

fn default_radius() -> i32 {
    1
}
fn default_parallel() -> bool {
    true
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            radius: default_radius(),
            skip_corners: false,
            parallel: default_parallel(),
            workers: 0,
        }
    }
}

/// Keys of the square (optionally cornerless) neighbourhood around `center`, row by row.
pub fn neighborhood(center: ChunkKey, radius: i32, skip_corners: bool, chunk_size: i32) -> Vec<ChunkKey> {
    let r = radius.max(0);
    let mut keys = Vec::with_capacity(((2 * r + 1) * (2 * r + 1)) as usize);
    for dz in -r..=r {
        for dx in -r..=r {
            if skip_corners && r > 0 && dx.abs() == r && dz.abs() == r {
                continue;
            }
            keys.push(center.offset(dx, dz, chunk_size));
        }
    }
    keys
}

/// What one reconcile pass changed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StreamUpdate {
    pub center: ChunkKey,
    pub created: Vec<ChunkKey>,
    pub evicted: Vec<ChunkKey>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreamStats {
    pub created: u64,
    pub evicted: u64,
    pub degraded: u64,
}

pub struct ChunkStreamer<N: NoiseSource = WhiteNoise> {
    gen_cfg: WorldGenConfig,
    stream_cfg: StreamConfig,
    noise: N,
    chunks: ChunkMap,
    center: Option<ChunkKey>,
    pool: Option<ThreadPool>,
    stats: StreamStats,
}

impl ChunkStreamer<WhiteNoise> {
    pub fn new(gen_cfg: WorldGenConfig, stream_cfg: StreamConfig) -> Self {
        Self::with_noise(gen_cfg, stream_cfg, WhiteNoise)
    }
}

impl<N: NoiseSource> ChunkStreamer<N> {
    pub fn with_noise(gen_cfg: WorldGenConfig, stream_cfg: StreamConfig, noise: N) -> Self {
        let pool = if stream_cfg.parallel {
            match ThreadPoolBuilder::new()
                .num_threads(stream_cfg.workers)
                .thread_name(|i| format!("delve-gen-{i}"))
                .build()
            {
                Ok(pool) => Some(pool),
                Err(e) => {
                    log::warn!(target: "stream", "worker pool unavailable, generating serially: {}", e);
                    None
                }
            }
        } else {
            None
        };
        let chunk_size = gen_cfg.chunk_size_i32();
        Self {
            gen_cfg,
            stream_cfg,
            noise,
            chunks: ChunkMap::new(chunk_size),
            center: None,
            pool,
            stats: StreamStats::default(),
        }
    }

    #[inline]
    pub fn gen_config(&self) -> &WorldGenConfig {
        &self.gen_cfg
    }

    #[inline]
    pub fn stream_config(&self) -> &StreamConfig {
        &self.stream_cfg
    }

    #[inline]
    pub fn chunks(&self) -> &ChunkMap {
        &self.chunks
    }

    #[inline]
    pub fn center(&self) -> Option<ChunkKey> {
        self.center
    }

    #[inline]
    pub fn stats(&self) -> StreamStats {
        self.stats
    }

    pub fn loaded_keys(&self) -> Vec<ChunkKey> {
        self.chunks.keys()
    }

    pub fn required_keys(&self, center: ChunkKey) -> Vec<ChunkKey> {
        neighborhood(
            center,
            self.stream_cfg.radius,
            self.stream_cfg.skip_corners,
            self.gen_cfg.chunk_size_i32(),
        )
    }

    /// Loads the full neighbourhood around the chunk holding `(wx, wz)`.
    pub fn init(&mut self, wx: f32, wz: f32) -> StreamUpdate {
        let center = ChunkKey::containing(wx, wz, self.gen_cfg.chunk_size_i32());
        self.reconcile(center)
    }

    /// No-op (`None`) while the player stays in the same chunk; otherwise creates the
    /// missing chunks and evicts everything outside the new neighbourhood.
    pub fn update(&mut self, wx: f32, wz: f32) -> Option<StreamUpdate> {
        let center = ChunkKey::containing(wx, wz, self.gen_cfg.chunk_size_i32());
        if self.center == Some(center) {
            return None;
        }
        Some(self.reconcile(center))
    }

    fn reconcile(&mut self, center: ChunkKey) -> StreamUpdate {
        let t0 = Instant::now();
        let required = self.required_keys(center);
        let missing: Vec<ChunkKey> = required
            .iter()
            .copied()
            .filter(|k| !self.chunks.contains(*k))
            .collect();

        // Every new chunk is complete before the map changes at all.
        let fresh = self.generate_batch(&missing);

        let keep: HashSet<ChunkKey> = required.iter().copied().collect();
        let evicted = self.chunks.retain_keys(|k| keep.contains(&k));
        for chunk in fresh {
            if chunk.is_degraded() {
                self.stats.degraded += 1;
            }
            self.chunks.insert(chunk);
        }
        self.stats.created += missing.len() as u64;
        self.stats.evicted += evicted.len() as u64;
        self.center = Some(center);

        log::info!(
            target: "stream",
            "center ({}, {}): +{} -{} loaded={} in {}ms",
            center.x,
            center.z,
            missing.len(),
            evicted.len(),
            self.chunks.len(),
            t0.elapsed().as_millis()
        );
        StreamUpdate {
            center,
            created: missing,
            evicted,
        }
    }

    fn generate_batch(&self, keys: &[ChunkKey]) -> Vec<Chunk> {
        let cfg = &self.gen_cfg;
        let noise = &self.noise;
        match &self.pool {
            Some(pool) if keys.len() > 1 => pool.install(|| {
                keys.par_iter()
                    .map(|&k| Chunk::generate(cfg, noise, k))
                    .collect()
            }),
            _ => keys.iter().map(|&k| Chunk::generate(cfg, noise, k)).collect(),
        }
    }

    pub fn chunk(&self, key: ChunkKey) -> Option<&Chunk> {
        self.chunks.get(key)
    }

    pub fn block_at(&self, wx: i32, wy: i32, wz: i32) -> Option<BlockType> {
        self.chunks.block_at(wx, wy, wz)
    }

    /// Routes the edit to the owning chunk.
    pub fn set_block_at(&mut self, wx: i32, wy: i32, wz: i32, block: BlockType) -> Result<(), EditError> {
        let key = ChunkKey::containing_block(wx, wz, self.gen_cfg.chunk_size_i32());
        let chunk = self.chunks.get_mut(key).ok_or(EditError::Unloaded)?;
        chunk.set_block_at(wx, wy, wz, block)?;
        log::debug!(target: "stream", "edit ({}, {}, {}) -> {}", wx, wy, wz, block);
        Ok(())
    }

    pub fn remove_block(&mut self, wx: i32, wy: i32, wz: i32) -> Result<(), EditError> {
        self.set_block_at(wx, wy, wz, BlockType::Air)
    }
}

impl<N: NoiseSource> ChunkLookup for ChunkStreamer<N> {
    #[inline]
    fn chunk_size(&self) -> i32 {
        self.gen_cfg.chunk_size_i32()
    }

    #[inline]
    fn chunk(&self, key: ChunkKey) -> Option<&Chunk> {
        self.chunks.get(key)
    }
}
