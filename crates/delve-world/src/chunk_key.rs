use serde::{Deserialize, Serialize};

/// World-space origin `(x, z)` of a chunk column. Both components are multiples
/// of the chunk size the key was built with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkKey {
    pub x: i32,
    pub z: i32,
}

impl ChunkKey {
    #[inline]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Key of the chunk holding block column `(bx, bz)`.
    #[inline]
    pub fn containing_block(bx: i32, bz: i32, size: i32) -> Self {
        Self {
            x: bx.div_euclid(size) * size,
            z: bz.div_euclid(size) * size,
        }
    }

    /// Key of the chunk holding the continuous point `(wx, wz)`.
    #[inline]
    pub fn containing(wx: f32, wz: f32, size: i32) -> Self {
        Self::containing_block(wx.floor() as i32, wz.floor() as i32, size)
    }

    /// Neighbouring key `dx`/`dz` whole chunks away.
    #[inline]
    pub fn offset(self, dx: i32, dz: i32, size: i32) -> Self {
        Self {
            x: self.x + dx * size,
            z: self.z + dz * size,
        }
    }

    #[inline]
    pub fn is_aligned(self, size: i32) -> bool {
        self.x.rem_euclid(size) == 0 && self.z.rem_euclid(size) == 0
    }

    #[inline]
    pub fn contains_block(self, bx: i32, bz: i32, size: i32) -> bool {
        bx >= self.x && bx < self.x + size && bz >= self.z && bz < self.z + size
    }

    /// Orthogonal neighbours in the order -X, +X, -Z, +Z.
    #[inline]
    pub fn neighbors4(self, size: i32) -> [ChunkKey; 4] {
        [
            self.offset(-1, 0, size),
            self.offset(1, 0, size),
            self.offset(0, -1, size),
            self.offset(0, 1, size),
        ]
    }

    /// Seed string for one generation feature of this chunk, e.g. `"64,-128-biome"`.
    #[inline]
    pub fn seed(self, world_seed: &str, suffix: &str) -> String {
        format!("{world_seed}{},{}{suffix}", self.x, self.z)
    }
}

impl From<(i32, i32)> for ChunkKey {
    fn from(value: (i32, i32)) -> Self {
        Self::new(value.0, value.1)
    }
}

impl From<ChunkKey> for (i32, i32) {
    fn from(value: ChunkKey) -> Self {
        (value.x, value.z)
    }
}
