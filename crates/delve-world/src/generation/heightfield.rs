use std::time::Instant;

use delve_blocks::BlockType;

use crate::noise::{NoiseSource, fractal_sum, lattice_size};
use crate::worldgen::{Shape, WorldGenConfig};
use crate::{ChunkKey, GenError};

/// Column heights for one chunk, addressed `x + size * z`.
///
/// A height `h` means rows `y < h` are solid and the walkable surface sits at `y = h`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeightMap {
    size: usize,
    data: Vec<i32>,
}

impl HeightMap {
    pub fn filled(size: usize, height: i32) -> Self {
        Self {
            size,
            data: vec![height; size * size],
        }
    }

    pub fn from_vec(size: usize, data: Vec<i32>) -> Option<Self> {
        (data.len() == size * size).then_some(Self { size, data })
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn get(&self, x: usize, z: usize) -> Option<i32> {
        if x < self.size && z < self.size {
            Some(self.data[x + self.size * z])
        } else {
            None
        }
    }

    #[inline]
    pub fn set(&mut self, x: usize, z: usize, h: i32) {
        if x < self.size && z < self.size {
            self.data[x + self.size * z] = h;
        }
    }

    #[inline]
    pub fn as_slice(&self) -> &[i32] {
        &self.data
    }

    pub fn min(&self) -> Option<i32> {
        self.data.iter().copied().min()
    }

    pub fn max(&self) -> Option<i32> {
        self.data.iter().copied().max()
    }
}

/// Height map plus one surface block type per column.
#[derive(Clone, Debug, PartialEq)]
pub struct HeightFieldOutput {
    pub heights: HeightMap,
    pub columns: Vec<BlockType>,
}

pub struct HeightFieldGenerator<'a, N: NoiseSource + ?Sized> {
    cfg: &'a WorldGenConfig,
    noise: &'a N,
}

impl<'a, N: NoiseSource + ?Sized> HeightFieldGenerator<'a, N> {
    pub fn new(cfg: &'a WorldGenConfig, noise: &'a N) -> Self {
        Self { cfg, noise }
    }

    pub fn generate(&self, key: ChunkKey) -> Result<HeightFieldOutput, GenError> {
        let t0 = Instant::now();
        let heights = self.height_map(key, &self.cfg.height, "")?;
        let columns = self.classify(key, &heights);
        log::debug!(
            target: "worldgen",
            "height-field ({}, {}) in {}us",
            key.x,
            key.z,
            t0.elapsed().as_micros()
        );
        Ok(HeightFieldOutput { heights, columns })
    }

    /// Full surface pipeline: layered noise, biome shaping, seam blending,
    /// smoothing, then clamp and floor. `tag` separates seed families.
    pub fn height_map(
        &self,
        key: ChunkKey,
        shape: &Shape,
        tag: &str,
    ) -> Result<HeightMap, GenError> {
        self.cfg.validate()?;
        let size = self.cfg.chunk_size;
        let raw = self.raw_heights(key, shape, tag);
        if let Some(i) = raw.iter().position(|h| !h.is_finite()) {
            return Err(GenError::NonFiniteHeight {
                x: i % size,
                z: i / size,
            });
        }
        let mut heights = raw.clone();
        let pinned = if self.cfg.blend.enable {
            self.blend_edges(key, shape, tag, &raw, &mut heights);
            true
        } else {
            false
        };
        for _ in 0..self.cfg.smooth.passes.max(1) {
            heights = smooth(&heights, size, self.cfg.smooth.radius, self.cfg.smooth.sigma, pinned);
        }
        let (lo, hi) = (shape.min_height, shape.max_height);
        let mut data = Vec::with_capacity(size * size);
        for (i, h) in heights.iter().enumerate() {
            if !h.is_finite() {
                return Err(GenError::NonFiniteHeight {
                    x: i % size,
                    z: i / size,
                });
            }
            data.push((h.floor() as i32).clamp(lo, hi));
        }
        Ok(HeightMap { size, data })
    }

    /// Base height, octave layers, and biome offset; no cross-chunk information.
    pub fn raw_heights(&self, key: ChunkKey, shape: &Shape, tag: &str) -> Vec<f32> {
        let size = self.cfg.chunk_size;
        let span = size.saturating_sub(1).max(1) as f32;
        let mut heights = vec![shape.base_height; size * size];

        let fractal = shape.fractal();
        let mut amp = shape.height_scale;
        let mut feature = fractal.scale;
        for octave in 0..fractal.octaves {
            let grid = self.noise.grid2(
                lattice_size(size, feature, 4),
                &key.seed(&self.cfg.seed, &format!("{tag}-height-{octave}")),
            );
            for z in 0..size {
                for x in 0..size {
                    let n = grid.sample_unit(x as f32 / span, z as f32 / span);
                    heights[x + size * z] += (n - 0.5) * 2.0 * amp;
                }
            }
            amp *= fractal.persistence;
            feature /= fractal.lacunarity.max(1.0);
        }

        let biome = self.noise.grid2(
            lattice_size(size, self.cfg.biome.scale, 2),
            &key.seed(&self.cfg.seed, &format!("{tag}-biome")),
        );
        for z in 0..size {
            for x in 0..size {
                let b = biome.sample_unit(x as f32 / span, z as f32 / span);
                heights[x + size * z] += self.biome_offset(b);
            }
        }
        heights
    }

    /// Mountains above the upper band, flat plains in the middle band, valleys below.
    /// Each band's offset is zero at its threshold so the bands meet without a step.
    pub fn biome_offset(&self, b: f32) -> f32 {
        let bc = &self.cfg.biome;
        if b > bc.mountain_threshold {
            let span = (1.0 - bc.mountain_threshold).max(1e-6);
            bc.mountain_height * ((b - bc.mountain_threshold) / span).min(1.0)
        } else if b > bc.plains_threshold {
            0.0
        } else {
            let span = bc.plains_threshold.max(1e-6);
            -bc.valley_depth * ((bc.plains_threshold - b) / span).min(1.0)
        }
    }

    /// Pulls cells near each edge toward a target every chunk sharing that edge
    /// computes identically: the mean of the two raw edge heights along a side,
    /// and the mean of the four raw corner heights at a corner. Cells on the
    /// outermost ring land exactly on the shared value.
    fn blend_edges(
        &self,
        key: ChunkKey,
        shape: &Shape,
        tag: &str,
        raw: &[f32],
        heights: &mut [f32],
    ) {
        let size = self.cfg.chunk_size;
        let margin = self.cfg.blend.margin.min(size / 2);
        if margin == 0 {
            return;
        }
        let cs = self.cfg.chunk_size_i32();
        let last = size - 1;

        // Raw heights of the surrounding 3x3 chunks, `[dz + 1][dx + 1]`.
        let mut block: [[Vec<f32>; 3]; 3] = Default::default();
        for (row, dz) in block.iter_mut().zip(-1..=1) {
            for (cell, dx) in row.iter_mut().zip(-1..=1) {
                *cell = if dx == 0 && dz == 0 {
                    raw.to_vec()
                } else {
                    self.raw_heights(key.offset(dx, dz, cs), shape, tag)
                };
            }
        }
        let at = |cx: usize, cz: usize, x: usize, z: usize| block[cz][cx][x + size * z];

        // Summed in world order so the four chunks at a corner agree bit for bit.
        let corner = |sx: usize, sz: usize| {
            let nw = at(sx, sz, last, last);
            let ne = at(sx + 1, sz, 0, last);
            let sw = at(sx, sz + 1, last, 0);
            let se = at(sx + 1, sz + 1, 0, 0);
            ((nw + ne) + (sw + se)) * 0.25
        };
        let corners = [[corner(0, 0), corner(1, 0)], [corner(0, 1), corner(1, 1)]];
        let west: Vec<f32> = (0..size).map(|z| (at(0, 1, last, z) + at(1, 1, 0, z)) * 0.5).collect();
        let east: Vec<f32> = (0..size).map(|z| (at(1, 1, last, z) + at(2, 1, 0, z)) * 0.5).collect();
        let north: Vec<f32> = (0..size).map(|x| (at(1, 0, x, last) + at(1, 1, x, 0)) * 0.5).collect();
        let south: Vec<f32> = (0..size).map(|x| (at(1, 1, x, last) + at(1, 2, x, 0)) * 0.5).collect();

        let weight = |d: usize| {
            if d < margin {
                1.0 - d as f32 / margin as f32
            } else {
                0.0
            }
        };
        let mix = |h: f32, target: f32, w: f32| {
            if w >= 1.0 { target } else { h + (target - h) * w }
        };
        // (side, distance) to the nearer of the two edges on one axis.
        let nearest = |i: usize| if i <= last - i { (0, i) } else { (1, last - i) };

        for z in 0..size {
            let (sz, dz) = nearest(z);
            let wz = weight(dz);
            for x in 0..size {
                let (sx, dx) = nearest(x);
                let wx = weight(dx);
                if wx == 0.0 && wz == 0.0 {
                    continue;
                }
                let c = corners[sz][sx];
                // Edge targets bend toward the corner as the other axis nears its edge.
                let tx = mix(if sx == 0 { west[z] } else { east[z] }, c, wz);
                let tz = mix(if sz == 0 { north[x] } else { south[x] }, c, wx);
                let target = if wx >= 1.0 {
                    tx
                } else if wz >= 1.0 {
                    tz
                } else {
                    let (ax, az) = (wx * (1.0 - wz), wz * (1.0 - wx));
                    tx + (tz - tx) * (az / (ax + az))
                };
                let i = x + size * z;
                heights[i] = mix(heights[i], target, wx.max(wz));
            }
        }
    }

    /// Flat per-column material from height bands, with the band edges nudged by a
    /// secondary field so they do not trace perfect contour lines.
    pub fn classify(&self, key: ChunkKey, heights: &HeightMap) -> Vec<BlockType> {
        let size = heights.size();
        let c = &self.cfg.classify;
        let params = crate::noise::FractalParams {
            octaves: 2,
            scale: c.modulation_scale,
            ..Default::default()
        };
        let field = fractal_sum(
            self.noise,
            size,
            &params,
            &key.seed(&self.cfg.seed, "-surface"),
        );
        let mut out = Vec::with_capacity(size * size);
        for z in 0..size {
            for x in 0..size {
                let h = heights.get(x, z).unwrap_or(0) as f32;
                let shift = (field.get(x, z) - 0.5) * 2.0 * c.modulation;
                let block = if h < c.water_below + shift {
                    BlockType::Water
                } else if h > c.snow_above + shift {
                    BlockType::Snow
                } else if h > c.stone_above + shift {
                    BlockType::Stone
                } else {
                    BlockType::Grass
                };
                out.push(block);
            }
        }
        out
    }
}

/// Gaussian-weighted average over a `(2r+1)^2` window clipped to the chunk.
/// Written as `h + sum(w * (n - h)) / sum(w)` so a flat field stays bit-exact.
fn smooth(src: &[f32], size: usize, radius: usize, sigma: f32, pin_ring: bool) -> Vec<f32> {
    let r = radius as isize;
    let two_sigma_sq = 2.0 * sigma.max(0.1) * sigma.max(0.1);
    let mut out = src.to_vec();
    let n = size as isize;
    for z in 0..n {
        for x in 0..n {
            if pin_ring && (x == 0 || z == 0 || x == n - 1 || z == n - 1) {
                continue;
            }
            let center = src[(x + n * z) as usize];
            let mut acc = 0.0_f32;
            let mut wsum = 0.0_f32;
            for dz in -r..=r {
                for dx in -r..=r {
                    let (sx, sz) = (x + dx, z + dz);
                    if sx < 0 || sz < 0 || sx >= n || sz >= n {
                        continue;
                    }
                    let w = (-((dx * dx + dz * dz) as f32) / two_sigma_sq).exp();
                    acc += w * (src[(sx + n * sz) as usize] - center);
                    wsum += w;
                }
            }
            if wsum > 0.0 {
                out[(x + n * z) as usize] = center + acc / wsum;
            }
        }
    }
    out
}
