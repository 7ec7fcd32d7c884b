use delve_blocks::BlockType;

use super::heightfield::HeightMap;
use super::volumetric::BlockGrid;
use crate::ChunkKey;
use crate::noise::{NoiseSource, lattice_size};
use crate::worldgen::{Caves, WorldGenConfig};

/// Carve threshold at `depth` cells below the surface; lower further down so caves widen.
#[inline]
pub fn threshold_at(c: &Caves, depth: i32, size: usize) -> f32 {
    let t = c.threshold - c.depth_falloff * depth.max(0) as f32 / size.max(1) as f32;
    t.max(c.min_threshold)
}

/// Clears solid cells where the blended cave field beats the depth threshold.
/// Returns how many cells were carved (air or lava).
pub(crate) fn carve<N: NoiseSource + ?Sized>(
    cfg: &WorldGenConfig,
    noise: &N,
    key: ChunkKey,
    heights: &HeightMap,
    blocks: &mut BlockGrid,
) -> usize {
    let c = &cfg.volume.caves;
    let size = blocks.size();
    let span = size.saturating_sub(1).max(1) as f32;
    let primary = noise.grid3(
        lattice_size(size, c.primary_scale, 2),
        &key.seed(&cfg.seed, "-caves"),
    );
    let detail = noise.grid3(
        lattice_size(size, c.detail_scale, 2),
        &key.seed(&cfg.seed, "-cave-detail"),
    );
    let mut rng = noise.rng(&key.seed(&cfg.seed, "-lava"));
    let w = c.detail_weight.clamp(0.0, 1.0);
    let water = cfg.volume.water_level;
    let mut carved = 0;

    for z in 0..size {
        for y in 0..size {
            for x in 0..size {
                let h = heights.get(x, z).unwrap_or(0);
                let yi = y as i32;
                if yi < 1 || yi >= h - c.min_depth || (yi - water).abs() <= c.water_band {
                    continue;
                }
                if !blocks.get_local(x, y, z).is_solid() {
                    continue;
                }
                let (u, v, t) = (x as f32 / span, y as f32 / span, z as f32 / span);
                let value = primary.sample_unit(u, v, t) * (1.0 - w) + detail.sample_unit(u, v, t) * w;
                if value <= threshold_at(c, h - yi, size) {
                    continue;
                }
                let (xi, zi) = (x as i32, z as i32);
                let block = if yi < c.lava_max_y
                    && touches_air(blocks, xi, yi, zi)
                    && rng.next_f32() < c.lava_chance
                {
                    BlockType::Lava
                } else {
                    BlockType::Air
                };
                blocks.set(xi, yi, zi, block);
                carved += 1;
            }
        }
    }
    carved
}

fn touches_air(blocks: &BlockGrid, x: i32, y: i32, z: i32) -> bool {
    [(-1, 0, 0), (1, 0, 0), (0, -1, 0), (0, 1, 0), (0, 0, -1), (0, 0, 1)]
        .iter()
        .any(|&(dx, dy, dz)| blocks.get(x + dx, y + dy, z + dz) == Some(BlockType::Air))
}
