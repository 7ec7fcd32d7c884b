//! Terrain sampling for the player cylinder.
//!
//! Collision is a height test: a sample point collides when it sits at or below
//! the terrain height of the column it falls in.

use delve_chunk::{ChunkLookup, NO_HEIGHT};
use delve_geom::{Cylinder, Vec3};
use delve_world::ChunkKey;

/// How many points of the cylinder get tested.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointSet {
    /// Bottom center and bottom ring. Grounded horizontal moves.
    Simplified,
    /// Adds an interior bottom grid and low, mid, and high body rings.
    Standard,
    /// Denser bottom coverage and more body rings, for fast falls.
    Enhanced,
}

const STANDARD_LEVELS: [f32; 3] = [0.25, 0.5, 0.9];
const ENHANCED_LEVELS: [f32; 5] = [0.1, 0.25, 0.5, 0.75, 0.95];

/// Points on the bottom disc for `set`.
pub fn bottom_points(bottom: Vec3, body: &Cylinder, set: PointSet) -> Vec<Vec3> {
    let mut pts = vec![bottom];
    match set {
        PointSet::Simplified => {
            pts.extend(Cylinder::ring(bottom, body.radius, 8));
        }
        PointSet::Standard => {
            pts.extend(Cylinder::ring(bottom, body.radius, 8));
            pts.extend(body.interior_grid(bottom, 3));
        }
        PointSet::Enhanced => {
            pts.extend(Cylinder::ring(bottom, body.radius, 16));
            pts.extend(Cylinder::ring(bottom, body.radius * 0.5, 8));
            pts.extend(body.interior_grid(bottom, 5));
        }
    }
    pts
}

/// Full constellation for a head-anchored cylinder.
pub fn sample_points(head: Vec3, body: &Cylinder, set: PointSet) -> Vec<Vec3> {
    let bottom = body.bottom(head);
    let mut pts = bottom_points(bottom, body, set);
    let levels: &[f32] = match set {
        PointSet::Simplified => &[],
        PointSet::Standard => &STANDARD_LEVELS,
        PointSet::Enhanced => &ENHANCED_LEVELS,
    };
    let ring = if set == PointSet::Enhanced { 12 } else { 8 };
    for &f in levels {
        let center = bottom.with_y(bottom.y + body.height * f);
        pts.extend(Cylinder::ring(center, body.radius, ring));
    }
    pts
}

/// Height of the column under `(x, z)`. When the owning chunk is missing or has
/// no answer, the four orthogonal neighbour chunks are asked for the nearest
/// column inside their own bounds and the highest reply wins. `NO_HEIGHT` when
/// nobody knows.
pub fn column_height<L: ChunkLookup + ?Sized>(world: &L, x: f32, z: f32) -> i32 {
    let (bx, bz) = (x.floor() as i32, z.floor() as i32);
    let h = world.column_height(bx, bz);
    if h != NO_HEIGHT {
        return h;
    }
    let size = world.chunk_size();
    let home = ChunkKey::containing_block(bx, bz, size);
    home.neighbors4(size)
        .iter()
        .filter_map(|&k| world.chunk(k))
        .map(|c| {
            let (ox, oz) = c.origin();
            let cx = bx.clamp(ox, ox + size - 1);
            let cz = bz.clamp(oz, oz + size - 1);
            c.height_at(cx, cz)
        })
        .fold(NO_HEIGHT, i32::max)
}

#[inline]
pub fn point_collides<L: ChunkLookup + ?Sized>(world: &L, p: Vec3) -> bool {
    p.y <= column_height(world, p.x, p.z) as f32
}

pub fn check_collision<L: ChunkLookup + ?Sized>(
    world: &L,
    head: Vec3,
    body: &Cylinder,
    set: PointSet,
) -> bool {
    sample_points(head, body, set)
        .into_iter()
        .any(|p| point_collides(world, p))
}

/// Highest terrain under the bottom disc, sampled with `set`'s bottom points.
pub fn ground_height<L: ChunkLookup + ?Sized>(
    world: &L,
    head: Vec3,
    body: &Cylinder,
    set: PointSet,
) -> f32 {
    bottom_points(body.bottom(head), body, set)
        .into_iter()
        .map(|p| column_height(world, p.x, p.z))
        .fold(NO_HEIGHT, i32::max) as f32
}
