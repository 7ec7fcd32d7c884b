//! Seeded white-noise grids, smoothstep interpolation, and fractal sums.
//!
//! Every grid is a pure function of its seed string: there is no shared RNG
//! state, so the same chunk key always reproduces the same terrain.

/// Hashes a seed string into a 32-bit PRNG seed (xmur3 mixing).
pub fn hash_seed(seed: &str) -> u32 {
    let bytes = seed.as_bytes();
    let mut h: u32 = 1_779_033_703 ^ bytes.len() as u32;
    for &b in bytes {
        h = (h ^ u32::from(b)).wrapping_mul(3_432_918_353);
        h = h.rotate_left(13);
    }
    h = (h ^ (h >> 16)).wrapping_mul(2_246_822_507);
    h = (h ^ (h >> 13)).wrapping_mul(3_266_489_909);
    h ^ (h >> 16)
}

/// Small counter-free PRNG (mulberry32). One stream per seed string.
#[derive(Clone, Debug)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    #[inline]
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    #[inline]
    pub fn from_seed_str(seed: &str) -> Self {
        Self::new(hash_seed(seed))
    }

    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    /// Uniform in `[0, 1)`; uses the top 24 bits so every value is exact in f32.
    #[inline]
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 / 16_777_216.0
    }
}

#[inline]
pub fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Splits a fractional grid coordinate into the two enclosing indices and the weight.
/// Coordinates past either edge clamp to it; nothing wraps.
#[inline]
fn axis(coord: f32, size: usize) -> (usize, usize, f32) {
    let max = (size - 1) as f32;
    let c = if coord.is_nan() { 0.0 } else { coord.clamp(0.0, max) };
    let i0 = c.floor() as usize;
    let i1 = (i0 + 1).min(size - 1);
    (i0, i1, smoothstep(c - i0 as f32))
}

/// Square grid of values addressed `x + size * z`.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid2 {
    size: usize,
    data: Vec<f32>,
}

impl Grid2 {
    pub fn filled(size: usize, value: f32) -> Self {
        let size = size.max(1);
        Self {
            size,
            data: vec![value; size * size],
        }
    }

    pub fn from_fn(size: usize, mut f: impl FnMut(usize, usize) -> f32) -> Self {
        let size = size.max(1);
        let mut data = Vec::with_capacity(size * size);
        for z in 0..size {
            for x in 0..size {
                data.push(f(x, z));
            }
        }
        Self { size, data }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn get(&self, x: usize, z: usize) -> f32 {
        self.data[x + self.size * z]
    }

    #[inline]
    pub fn values(&self) -> &[f32] {
        &self.data
    }

    /// Smoothstep-weighted bilinear sample at fractional grid coordinates.
    pub fn bilinear(&self, x: f32, z: f32) -> f32 {
        if self.size < 2 {
            return self.data.first().copied().unwrap_or(0.5);
        }
        let (x0, x1, tx) = axis(x, self.size);
        let (z0, z1, tz) = axis(z, self.size);
        let top = lerp(self.get(x0, z0), self.get(x1, z0), tx);
        let bottom = lerp(self.get(x0, z1), self.get(x1, z1), tx);
        lerp(top, bottom, tz)
    }

    /// Samples with `u, v` in `[0, 1]` spanning the whole grid.
    #[inline]
    pub fn sample_unit(&self, u: f32, v: f32) -> f32 {
        let span = self.size.saturating_sub(1) as f32;
        self.bilinear(u * span, v * span)
    }
}

/// Cubic grid of values addressed `x + size * (y + size * z)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid3 {
    size: usize,
    data: Vec<f32>,
}

impl Grid3 {
    pub fn filled(size: usize, value: f32) -> Self {
        let size = size.max(1);
        Self {
            size,
            data: vec![value; size * size * size],
        }
    }

    pub fn from_fn(size: usize, mut f: impl FnMut(usize, usize, usize) -> f32) -> Self {
        let size = size.max(1);
        let mut data = Vec::with_capacity(size * size * size);
        for z in 0..size {
            for y in 0..size {
                for x in 0..size {
                    data.push(f(x, y, z));
                }
            }
        }
        Self { size, data }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> f32 {
        self.data[x + self.size * (y + self.size * z)]
    }

    pub fn trilinear(&self, x: f32, y: f32, z: f32) -> f32 {
        if self.size < 2 {
            return self.data.first().copied().unwrap_or(0.5);
        }
        let (x0, x1, tx) = axis(x, self.size);
        let (y0, y1, ty) = axis(y, self.size);
        let (z0, z1, tz) = axis(z, self.size);
        let c00 = lerp(self.get(x0, y0, z0), self.get(x1, y0, z0), tx);
        let c10 = lerp(self.get(x0, y1, z0), self.get(x1, y1, z0), tx);
        let c01 = lerp(self.get(x0, y0, z1), self.get(x1, y0, z1), tx);
        let c11 = lerp(self.get(x0, y1, z1), self.get(x1, y1, z1), tx);
        let c0 = lerp(c00, c10, ty);
        let c1 = lerp(c01, c11, ty);
        lerp(c0, c1, tz)
    }

    #[inline]
    pub fn sample_unit(&self, u: f32, v: f32, w: f32) -> f32 {
        let span = self.size.saturating_sub(1) as f32;
        self.trilinear(u * span, v * span, w * span)
    }
}

/// Source of seeded value grids. Generators are generic over this so tests can
/// swap in a constant field.
pub trait NoiseSource: Send + Sync {
    fn grid2(&self, size: usize, seed: &str) -> Grid2;
    fn grid3(&self, size: usize, seed: &str) -> Grid3;

    /// Chunk-local random stream for placement draws (ores, lava).
    fn rng(&self, seed: &str) -> Mulberry32 {
        Mulberry32::from_seed_str(seed)
    }
}

/// Independent uniform `[0, 1)` values drawn from a mulberry32 stream keyed by the seed.
#[derive(Clone, Copy, Debug, Default)]
pub struct WhiteNoise;

impl NoiseSource for WhiteNoise {
    fn grid2(&self, size: usize, seed: &str) -> Grid2 {
        white_noise_grid(size, seed)
    }

    fn grid3(&self, size: usize, seed: &str) -> Grid3 {
        let mut rng = Mulberry32::from_seed_str(seed);
        Grid3::from_fn(size, |_, _, _| rng.next_f32())
    }
}

/// Every cell holds the same value. `ConstantNoise(0.5)` is the neutral field.
#[derive(Clone, Copy, Debug)]
pub struct ConstantNoise(pub f32);

impl NoiseSource for ConstantNoise {
    fn grid2(&self, size: usize, _seed: &str) -> Grid2 {
        Grid2::filled(size, self.0)
    }

    fn grid3(&self, size: usize, _seed: &str) -> Grid3 {
        Grid3::filled(size, self.0)
    }
}

pub fn white_noise_grid(size: usize, seed: &str) -> Grid2 {
    let mut rng = Mulberry32::from_seed_str(seed);
    Grid2::from_fn(size, |_, _| rng.next_f32())
}

/// Octave layering parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FractalParams {
    pub octaves: u32,
    pub persistence: f32,
    pub lacunarity: f32,
    /// Feature size, in cells, of the first octave.
    pub scale: f32,
}

impl Default for FractalParams {
    fn default() -> Self {
        Self {
            octaves: 3,
            persistence: 0.5,
            lacunarity: 2.0,
            scale: 16.0,
        }
    }
}

/// Lattice resolution needed to show features of `feature` cells across `extent` cells.
#[inline]
pub fn lattice_size(extent: usize, feature: f32, min: usize) -> usize {
    let feature = if feature > 0.0001 { feature } else { 1.0 };
    ((extent as f32 / feature).round() as usize).max(min) + 1
}

/// Sums independently seeded octaves into an `extent x extent` field normalised to `[0, 1]`.
///
/// Octave `i` uses the seed `"{seed_base}-o{i}"`. When the summed field has no
/// range the min/max stretch is skipped and the amplitude-weighted mean is returned as is.
pub fn fractal_sum<N: NoiseSource + ?Sized>(
    noise: &N,
    extent: usize,
    params: &FractalParams,
    seed_base: &str,
) -> Grid2 {
    let extent = extent.max(1);
    let octaves = params.octaves.max(1);
    let mut acc = vec![0.0_f32; extent * extent];
    let mut amp = 1.0_f32;
    let mut total = 0.0_f32;
    let mut feature = params.scale;
    let span = extent.saturating_sub(1).max(1) as f32;
    for i in 0..octaves {
        let grid = noise.grid2(lattice_size(extent, feature, 2), &format!("{seed_base}-o{i}"));
        for z in 0..extent {
            for x in 0..extent {
                acc[x + extent * z] += grid.sample_unit(x as f32 / span, z as f32 / span) * amp;
            }
        }
        total += amp;
        amp *= params.persistence;
        feature /= params.lacunarity.max(1.0);
    }
    if total > 0.0 {
        for v in &mut acc {
            *v /= total;
        }
    }
    normalize(&mut acc);
    Grid2 {
        size: extent,
        data: acc,
    }
}

const MIN_RANGE: f32 = 1e-6;

/// Min/max stretch to `[0, 1]`; leaves the values alone when the range is ~0.
pub fn normalize(values: &mut [f32]) {
    let (lo, hi) = values
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let range = hi - lo;
    if !range.is_finite() || range < MIN_RANGE {
        return;
    }
    for v in values {
        *v = (*v - lo) / range;
    }
}
