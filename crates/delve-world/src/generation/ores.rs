use delve_blocks::BlockType;

use super::volumetric::BlockGrid;
use crate::ChunkKey;
use crate::noise::NoiseSource;
use crate::worldgen::{Ores, WorldGenConfig};

/// Ore for a cell at height `y` given a uniform `roll` in `[0, 1)`.
/// Rarer ores are tried first and only below their depth gate; coal is the fallback.
pub fn pick_ore(o: &Ores, y: i32, roll: f32) -> BlockType {
    let tiers = [
        (o.diamond_max_y, o.diamond_weight, BlockType::Diamond),
        (o.gold_max_y, o.gold_weight, BlockType::Gold),
        (o.iron_max_y, o.iron_weight, BlockType::Iron),
    ];
    let mut acc = 0.0;
    for (max_y, weight, block) in tiers {
        if y < max_y {
            acc += weight;
            if roll < acc {
                return block;
            }
        }
    }
    BlockType::Coal
}

/// Turns a small share of the remaining stone into ore. Returns the number placed.
pub(crate) fn seed_ores<N: NoiseSource + ?Sized>(
    cfg: &WorldGenConfig,
    noise: &N,
    key: ChunkKey,
    blocks: &mut BlockGrid,
) -> usize {
    let o = &cfg.volume.ores;
    let size = blocks.size();
    let mut rng = noise.rng(&key.seed(&cfg.seed, "-ores"));
    let mut placed = 0;
    for z in 0..size {
        for y in 0..size {
            for x in 0..size {
                if blocks.get_local(x, y, z) != BlockType::Stone {
                    continue;
                }
                if rng.next_f32() >= o.chance {
                    continue;
                }
                let ore = pick_ore(o, y as i32, rng.next_f32());
                blocks.set(x as i32, y as i32, z as i32, ore);
                placed += 1;
            }
        }
    }
    placed
}
