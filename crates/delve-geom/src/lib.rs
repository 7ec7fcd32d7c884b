//! Minimal geometry types for the simulation crates (no renderer dependency).
#![forbid(unsafe_code)]

use core::f32::consts::TAU;
use core::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
    pub const UP: Vec3 = Vec3 {
        x: 0.0,
        y: 1.0,
        z: 0.0,
    };

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn dot(self, rhs: Vec3) -> f32 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    #[inline]
    pub fn normalized(self) -> Vec3 {
        let len = self.length();
        if len > 0.0 { self / len } else { self }
    }

    #[inline]
    pub fn with_y(self, y: f32) -> Vec3 {
        Vec3 { y, ..self }
    }

    /// Projection onto the XZ plane.
    #[inline]
    pub fn horizontal(self) -> Vec3 {
        Vec3::new(self.x, 0.0, self.z)
    }

    #[inline]
    pub fn horizontal_length(self) -> f32 {
        (self.x * self.x + self.z * self.z).sqrt()
    }

    /// Unit vector in the XZ plane, or zero when there is no horizontal component.
    #[inline]
    pub fn horizontal_normalized(self) -> Vec3 {
        self.horizontal().normalized()
    }

    #[inline]
    pub fn lerp(self, to: Vec3, t: f32) -> Vec3 {
        self + (to - self) * t
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Integer block coordinate containing this point.
    #[inline]
    pub fn block(self) -> (i32, i32, i32) {
        (
            self.x.floor() as i32,
            self.y.floor() as i32,
            self.z.floor() as i32,
        )
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    #[inline]
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec3) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    #[inline]
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl SubAssign for Vec3 {
    #[inline]
    fn sub_assign(&mut self, rhs: Vec3) {
        self.x -= rhs.x;
        self.y -= rhs.y;
        self.z -= rhs.z;
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    #[inline]
    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Div<f32> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn div(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

/// Upright cylinder anchored at its top (the head), used for player collision.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cylinder {
    pub radius: f32,
    pub height: f32,
}

impl Cylinder {
    #[inline]
    pub const fn new(radius: f32, height: f32) -> Self {
        Self { radius, height }
    }

    /// Center of the bottom disc for a head-anchored position.
    #[inline]
    pub fn bottom(&self, head: Vec3) -> Vec3 {
        Vec3::new(head.x, head.y - self.height, head.z)
    }

    /// `count` points evenly spaced on a horizontal circle of radius `r` around `center`.
    pub fn ring(center: Vec3, r: f32, count: usize) -> impl Iterator<Item = Vec3> {
        let n = count.max(1);
        (0..n).map(move |i| {
            let a = TAU * i as f32 / n as f32;
            Vec3::new(center.x + r * a.cos(), center.y, center.z + r * a.sin())
        })
    }

    /// Points on a square `n x n` lattice inscribed in the bottom disc, center excluded.
    pub fn interior_grid(&self, bottom: Vec3, n: usize) -> impl Iterator<Item = Vec3> {
        let n = n.max(2);
        let half = self.radius * core::f32::consts::FRAC_1_SQRT_2;
        let step = 2.0 * half / (n - 1) as f32;
        (0..n * n).filter_map(move |i| {
            let ix = (i % n) as f32;
            let iz = (i / n) as f32;
            let dx = -half + ix * step;
            let dz = -half + iz * step;
            if dx.abs() < 1e-6 && dz.abs() < 1e-6 {
                None
            } else {
                Some(Vec3::new(bottom.x + dx, bottom.y, bottom.z + dz))
            }
        })
    }
}
