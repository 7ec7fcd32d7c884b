use delve_chunk::ChunkLookup;
use delve_geom::{Cylinder, Vec3};

use crate::collision::{PointSet, check_collision, ground_height};
use crate::config::PhysicsConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MotionState {
    Grounded,
    Airborne,
}

/// Per-tick input. `walk_dir` is world-space; only its horizontal part is used.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlayerInput {
    pub walk_dir: Vec3,
    pub jump: bool,
}

#[derive(Debug)]
pub struct Walker {
    pub pos: Vec3, // head position (x,z at center, y at top of the body)
    pub vel: Vec3,
    pub on_ground: bool,
    pub body: Cylinder,
    cfg: PhysicsConfig,
}

impl Walker {
    /// Spawns airborne; the first ground contact grounds it.
    pub fn new(spawn: Vec3, cfg: PhysicsConfig) -> Self {
        Self {
            pos: spawn,
            vel: Vec3::ZERO,
            on_ground: false,
            body: Cylinder::new(cfg.radius, cfg.height),
            cfg,
        }
    }

    #[inline]
    pub fn config(&self) -> &PhysicsConfig {
        &self.cfg
    }

    #[inline]
    pub fn feet(&self) -> f32 {
        self.pos.y - self.body.height
    }

    #[inline]
    pub fn state(&self) -> MotionState {
        if self.on_ground {
            MotionState::Grounded
        } else {
            MotionState::Airborne
        }
    }

    /// Starts a jump when grounded. Returns whether it did.
    pub fn jump(&mut self) -> bool {
        if !self.on_ground {
            return false;
        }
        self.vel.y = self.cfg.jump_velocity;
        self.on_ground = false;
        // Lift clear of the ground band so the next tick does not re-ground.
        self.pos.y += self.cfg.jump_nudge;
        log::debug!(target: "physics", "jump at {:?}", self.pos);
        true
    }

    pub fn tick<L: ChunkLookup + ?Sized>(&mut self, world: &L, walk_dir: Vec3, dt: f32) {
        let before = self.state();
        let max_v = self.cfg.max_velocity;
        self.vel.y = self.vel.y.clamp(-max_v, max_v);

        let ground = self.ground(world, PointSet::Standard);
        if self.feet() - ground <= self.cfg.ground_epsilon {
            self.snap_to(ground);
        } else {
            self.on_ground = false;
            self.vel.y -= self.cfg.gravity * dt;
        }

        if !self.on_ground || self.vel.y > 0.0 {
            self.integrate_vertical(world, dt);
        }

        let dir = walk_dir.horizontal_normalized();
        if dir != Vec3::ZERO {
            let delta = dir * (self.cfg.walk_speed * dt);
            if self.on_ground {
                self.move_grounded(world, delta);
            } else {
                self.move_airborne(world, delta);
            }
        }

        if self.on_ground {
            let ground = self.ground(world, PointSet::Standard);
            if self.feet() - ground > self.cfg.ledge_drop {
                self.on_ground = false;
            } else {
                self.pos.y = ground + self.body.height;
            }
        }

        if self.feet() < 0.0 {
            self.snap_to(0.0);
        }

        let after = self.state();
        if before != after {
            log::debug!(target: "physics", "{:?} -> {:?} at {:?}", before, after, self.pos);
        }
    }

    #[inline]
    fn ground<L: ChunkLookup + ?Sized>(&self, world: &L, set: PointSet) -> f32 {
        ground_height(world, self.pos, &self.body, set)
    }

    fn snap_to(&mut self, ground: f32) {
        self.pos.y = ground + self.body.height;
        self.vel.y = 0.0;
        self.on_ground = true;
    }

    /// Walks the frame's vertical displacement in small steps and stops at the
    /// first colliding one.
    fn integrate_vertical<L: ChunkLookup + ?Sized>(&mut self, world: &L, dt: f32) {
        let dy = self.vel.y * dt;
        let steps = ((dy.abs() / self.cfg.substep_length).ceil() as u32).max(self.cfg.min_substeps);
        let step = dy / steps as f32;
        let set = if self.vel.y < -self.cfg.high_speed_threshold {
            PointSet::Enhanced
        } else {
            PointSet::Standard
        };
        let start = self.pos.y;
        let mut committed = start;
        let mut hit = false;
        for i in 1..=steps {
            let candidate = self.pos.with_y(start + step * i as f32);
            if check_collision(world, candidate, &self.body, set) {
                hit = true;
                break;
            }
            committed = candidate.y;
        }
        self.pos.y = committed;

        if hit && dy < 0.0 {
            let ground = self.ground(world, set);
            self.snap_to(ground);
        } else if hit {
            self.vel.y = 0.0;
        }

        let ground = self.ground(world, set);
        if self.feet() < ground {
            log::debug!(target: "physics", "below ground after stepping, lifting to {}", ground);
            self.snap_to(ground);
        }
    }

    #[inline]
    fn lifted(&self, p: Vec3) -> Vec3 {
        p.with_y(p.y + self.cfg.ground_epsilon)
    }

    #[inline]
    fn blocked_grounded<L: ChunkLookup + ?Sized>(&self, world: &L, head: Vec3) -> bool {
        check_collision(world, self.lifted(head), &self.body, PointSet::Simplified)
    }

    fn move_grounded<L: ChunkLookup + ?Sized>(&mut self, world: &L, delta: Vec3) {
        let here = self.ground(world, PointSet::Standard);
        let probe = self.pos + delta.horizontal_normalized() * self.cfg.edge_probe;
        let drop = here - ground_height(world, probe, &self.body, PointSet::Standard);
        if drop >= self.cfg.cliff_min_drop && drop <= self.cfg.cliff_max_drop {
            self.edge_walk(world, delta, here);
            return;
        }

        let mut moved = false;
        for axis in [Vec3::new(delta.x, 0.0, 0.0), Vec3::new(0.0, 0.0, delta.z)] {
            if axis == Vec3::ZERO {
                continue;
            }
            let candidate = self.pos + axis;
            if !self.blocked_grounded(world, candidate) {
                self.pos = candidate;
                moved = true;
            }
        }
        if moved {
            return;
        }

        let up = self.pos + delta + Vec3::new(0.0, self.cfg.max_step_height, 0.0);
        if !self.blocked_grounded(world, up) {
            log::debug!(target: "physics", "step up to {:?}", up);
            self.pos = up;
        }
    }

    /// Creeps toward the target while the floor drop stays under the cliff limit.
    fn edge_walk<L: ChunkLookup + ?Sized>(&mut self, world: &L, delta: Vec3, here: f32) {
        let dist = delta.horizontal_length();
        let dir = delta.horizontal_normalized();
        let inc = self.cfg.edge_increment;
        let mut travelled = 0.0;
        log::trace!(target: "physics", "edge mode at {:?}", self.pos);
        while travelled < dist {
            let step = (dist - travelled).min(inc);
            let candidate = self.pos + dir * step;
            if self.blocked_grounded(world, candidate) {
                break;
            }
            self.pos = candidate;
            travelled += step;
            if here - self.ground(world, PointSet::Standard) >= self.cfg.cliff_max_drop {
                break;
            }
        }
    }

    fn move_airborne<L: ChunkLookup + ?Sized>(&mut self, world: &L, delta: Vec3) {
        let full = self.pos + delta;
        if !check_collision(world, full, &self.body, PointSet::Standard) {
            self.pos = full;
            return;
        }
        for axis in [Vec3::new(delta.x, 0.0, 0.0), Vec3::new(0.0, 0.0, delta.z)] {
            if axis == Vec3::ZERO {
                continue;
            }
            let candidate = self.pos + axis;
            if !check_collision(world, candidate, &self.body, PointSet::Standard) {
                self.pos = candidate;
            }
        }
    }
}
