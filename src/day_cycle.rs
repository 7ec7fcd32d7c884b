use std::f32::consts::TAU;

use delve_geom::Vec3;

use crate::config::DayConfig;

/// Lighting inputs for one moment of the day, handed to the renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DayLightSample {
    /// Angle around the day in radians; `0` is sunrise, `PI / 2` is noon.
    pub phase: f32,
    /// Overall light level in `[0, 1]`.
    pub brightness: f32,
    pub sun_dir: Vec3,
    pub sun_visible: bool,
}

impl DayLightSample {
    /// Brightness quantised for an 8-bit light uniform.
    #[inline]
    pub fn light_level(&self) -> u8 {
        (self.brightness.clamp(0.0, 1.0) * 255.0).round() as u8
    }
}

#[derive(Clone, Debug)]
pub struct DayCycle {
    time: f32,
    day_length: f32,
}

impl DayCycle {
    pub fn new(day_length: f32) -> Self {
        Self {
            time: 0.0,
            day_length: day_length.max(1.0),
        }
    }

    pub fn from_config(cfg: &DayConfig) -> Self {
        let mut cycle = Self::new(cfg.day_length);
        cycle.time = cfg.start_fraction.rem_euclid(1.0) * cycle.day_length;
        cycle
    }

    /// Time of day as a fraction in `[0, 1)`.
    #[inline]
    pub fn fraction(&self) -> f32 {
        (self.time / self.day_length).rem_euclid(1.0)
    }

    pub fn advance(&mut self, dt: f32) -> DayLightSample {
        self.time = (self.time + dt).rem_euclid(self.day_length);
        self.sample()
    }

    pub fn sample(&self) -> DayLightSample {
        let phase = self.fraction() * TAU;
        let elevation = phase.sin();
        let brightness = (0.5 * (1.0 + elevation)).powf(1.5);
        // Tilted off the XY plane so the sun arcs instead of passing straight overhead.
        let sun_dir = Vec3::new(phase.cos(), elevation, 0.25).normalized();
        DayLightSample {
            phase,
            brightness,
            sun_dir,
            sun_visible: sun_dir.y > 0.0,
        }
    }
}
