use std::time::Instant;

use delve_blocks::BlockType;

use super::heightfield::{HeightFieldGenerator, HeightMap};
use super::{caves, ores};
use crate::noise::{NoiseSource, lattice_size};
use crate::worldgen::WorldGenConfig;
use crate::{ChunkKey, GenError};

/// Dense `size^3` block storage addressed `x + size * (y + size * z)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockGrid {
    size: usize,
    cells: Vec<BlockType>,
}

impl BlockGrid {
    pub fn filled(size: usize, block: BlockType) -> Self {
        Self {
            size,
            cells: vec![block; size * size * size],
        }
    }

    pub fn from_cells(size: usize, cells: Vec<BlockType>) -> Option<Self> {
        (cells.len() == size * size * size).then_some(Self { size, cells })
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize, z: usize) -> usize {
        x + self.size * (y + self.size * z)
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32, z: i32) -> bool {
        let s = self.size as i32;
        x >= 0 && y >= 0 && z >= 0 && x < s && y < s && z < s
    }

    #[inline]
    pub fn get_local(&self, x: usize, y: usize, z: usize) -> BlockType {
        self.cells[self.idx(x, y, z)]
    }

    #[inline]
    pub fn get(&self, x: i32, y: i32, z: i32) -> Option<BlockType> {
        if !self.in_bounds(x, y, z) {
            return None;
        }
        Some(self.get_local(x as usize, y as usize, z as usize))
    }

    /// Writes one cell; returns `false` without touching anything when out of bounds.
    pub fn set(&mut self, x: i32, y: i32, z: i32, block: BlockType) -> bool {
        if !self.in_bounds(x, y, z) {
            return false;
        }
        let i = self.idx(x as usize, y as usize, z as usize);
        self.cells[i] = block;
        true
    }

    #[inline]
    pub fn cells(&self) -> &[BlockType] {
        &self.cells
    }

    /// One above the topmost solid cell of the column, or 0 for an empty column.
    pub fn column_height(&self, x: usize, z: usize) -> i32 {
        (0..self.size)
            .rev()
            .find(|&y| self.get_local(x, y, z).is_solid())
            .map_or(0, |y| y as i32 + 1)
    }

    /// True when any face neighbour is outside the grid, air, or see-through.
    pub fn is_exposed(&self, x: usize, y: usize, z: usize) -> bool {
        const FACES: [(i32, i32, i32); 6] = [
            (-1, 0, 0),
            (1, 0, 0),
            (0, -1, 0),
            (0, 1, 0),
            (0, 0, -1),
            (0, 0, 1),
        ];
        let (x, y, z) = (x as i32, y as i32, z as i32);
        FACES
            .iter()
            .any(|&(dx, dy, dz)| match self.get(x + dx, y + dy, z + dz) {
                None => true,
                Some(n) => n.exposes_neighbors(),
            })
    }

    /// Cells worth drawing, in index order: water and lava always, opaque cells
    /// only when [`is_exposed`](Self::is_exposed). Air is never emitted.
    pub fn visible_cells(&self) -> Vec<(usize, usize, usize, BlockType)> {
        let mut out = Vec::new();
        for z in 0..self.size {
            for y in 0..self.size {
                for x in 0..self.size {
                    let b = self.get_local(x, y, z);
                    if b.is_air() {
                        continue;
                    }
                    if b.is_transparent() || self.is_exposed(x, y, z) {
                        out.push((x, y, z, b));
                    }
                }
            }
        }
        out
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct VolumetricOutput {
    /// Surface heights; an upper bound for solid material in each column.
    pub heights: HeightMap,
    pub blocks: BlockGrid,
}

/// Surface, fill, caves, ores; each stage only sees what the earlier ones wrote.
pub struct VolumetricGenerator<'a, N: NoiseSource + ?Sized> {
    cfg: &'a WorldGenConfig,
    noise: &'a N,
}

impl<'a, N: NoiseSource + ?Sized> VolumetricGenerator<'a, N> {
    pub fn new(cfg: &'a WorldGenConfig, noise: &'a N) -> Self {
        Self { cfg, noise }
    }

    pub fn generate(&self, key: ChunkKey) -> Result<VolumetricOutput, GenError> {
        let t0 = Instant::now();
        let heights = self.surface(key)?;
        let mut blocks = self.fill(key, &heights);
        let carved = if self.cfg.volume.caves.enable {
            caves::carve(self.cfg, self.noise, key, &heights, &mut blocks)
        } else {
            0
        };
        let seeded = if self.cfg.volume.ores.enable {
            ores::seed_ores(self.cfg, self.noise, key, &mut blocks)
        } else {
            0
        };
        log::debug!(
            target: "worldgen",
            "volumetric ({}, {}) in {}us carved={} ores={}",
            key.x,
            key.z,
            t0.elapsed().as_micros(),
            carved,
            seeded
        );
        Ok(VolumetricOutput { heights, blocks })
    }

    /// Surface heights from the height-field pipeline, kept below the chunk ceiling.
    pub fn surface(&self, key: ChunkKey) -> Result<HeightMap, GenError> {
        let size = self.cfg.chunk_size;
        let ceiling = size as i32 - 1;
        let raw = HeightFieldGenerator::new(self.cfg, self.noise).height_map(
            key,
            &self.cfg.volume.surface,
            "-vol",
        )?;
        let data = raw.as_slice().iter().map(|&h| h.min(ceiling)).collect();
        HeightMap::from_vec(size, data).ok_or(GenError::InvalidConfig("surface map size mismatch"))
    }

    /// Surface material on the top cell, a density-jittered subsurface band, stone
    /// below, water up to the water level, air above.
    pub fn fill(&self, key: ChunkKey, heights: &HeightMap) -> BlockGrid {
        let size = self.cfg.chunk_size;
        let v = &self.cfg.volume;
        let span = size.saturating_sub(1).max(1) as f32;
        let density = self.noise.grid3(
            lattice_size(size, v.density_scale, 2),
            &key.seed(&self.cfg.seed, "-density"),
        );
        let mut grid = BlockGrid::filled(size, BlockType::Air);
        for z in 0..size {
            for x in 0..size {
                let h = heights.get(x, z).unwrap_or(0);
                let top = h - 1;
                let shore = top < v.water_level + v.sand_margin;
                for y in 0..size {
                    let yi = y as i32;
                    let block = if yi < h {
                        let depth = top - yi;
                        if depth == 0 {
                            if shore {
                                BlockType::Sand
                            } else if top >= v.snow_level {
                                BlockType::Snow
                            } else {
                                BlockType::Grass
                            }
                        } else {
                            let d = density.sample_unit(x as f32 / span, y as f32 / span, z as f32 / span);
                            let band = v.subsurface_depth + (d - 0.5) * 2.0 * v.subsurface_jitter;
                            if depth as f32 <= band {
                                if shore { BlockType::Sand } else { BlockType::Dirt }
                            } else {
                                BlockType::Stone
                            }
                        }
                    } else if yi < v.water_level {
                        BlockType::Water
                    } else {
                        BlockType::Air
                    };
                    let i = grid.idx(x, y, z);
                    grid.cells[i] = block;
                }
            }
        }
        grid
    }
}
