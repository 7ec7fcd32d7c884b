use delve_chunk::{Chunk, ChunkLookup};
use delve_world::ChunkKey;
use hashbrown::HashMap;

/// Loaded chunks by key. Only the streamer mutates it.
#[derive(Debug)]
pub struct ChunkMap {
    chunk_size: i32,
    chunks: HashMap<ChunkKey, Chunk>,
}

impl ChunkMap {
    pub fn new(chunk_size: i32) -> Self {
        Self {
            chunk_size,
            chunks: HashMap::new(),
        }
    }

    /// Replaces any chunk already stored under the same key.
    pub fn insert(&mut self, chunk: Chunk) -> Option<Chunk> {
        self.chunks.insert(chunk.key(), chunk)
    }

    #[inline]
    pub fn get(&self, key: ChunkKey) -> Option<&Chunk> {
        self.chunks.get(&key)
    }

    #[inline]
    pub fn get_mut(&mut self, key: ChunkKey) -> Option<&mut Chunk> {
        self.chunks.get_mut(&key)
    }

    #[inline]
    pub fn contains(&self, key: ChunkKey) -> bool {
        self.chunks.contains_key(&key)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Keys in ascending order.
    pub fn keys(&self) -> Vec<ChunkKey> {
        let mut keys: Vec<ChunkKey> = self.chunks.keys().copied().collect();
        keys.sort_unstable();
        keys
    }

    pub fn iter(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    /// Drops every chunk `keep` rejects and returns the dropped keys.
    pub fn retain_keys(&mut self, mut keep: impl FnMut(ChunkKey) -> bool) -> Vec<ChunkKey> {
        let mut dropped = Vec::new();
        self.chunks.retain(|&k, _| {
            let kept = keep(k);
            if !kept {
                dropped.push(k);
            }
            kept
        });
        dropped.sort_unstable();
        dropped
    }

    pub fn total_instances(&self) -> usize {
        self.chunks.values().map(Chunk::instance_count).sum()
    }
}

impl ChunkLookup for ChunkMap {
    #[inline]
    fn chunk_size(&self) -> i32 {
        self.chunk_size
    }

    #[inline]
    fn chunk(&self, key: ChunkKey) -> Option<&Chunk> {
        self.get(key)
    }
}
