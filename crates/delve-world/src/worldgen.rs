use serde::{Deserialize, Deserializer};
use std::error::Error;
use std::fs;
use std::path::Path;

use crate::GenError;
use crate::noise::FractalParams;

#[derive(Clone, Debug, Deserialize)]
pub struct WorldGenConfig {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Prepended to every chunk seed string; empty keeps seeds a pure function of the key.
    #[serde(default)]
    pub seed: String,
    #[serde(default = "default_mode")]
    pub mode: GeneratorMode,
    #[serde(default)]
    pub height: Shape,
    #[serde(default)]
    pub biome: Biome,
    #[serde(default)]
    pub blend: Blend,
    #[serde(default)]
    pub smooth: Smooth,
    #[serde(default)]
    pub classify: Classify,
    #[serde(default)]
    pub volume: Volume,
}

impl Default for WorldGenConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            seed: String::new(),
            mode: default_mode(),
            height: Shape::default(),
            biome: Biome::default(),
            blend: Blend::default(),
            smooth: Smooth::default(),
            classify: Classify::default(),
            volume: Volume::default(),
        }
    }
}

fn default_chunk_size() -> usize {
    crate::CHUNK_SIZE
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorMode {
    HeightField,
    Volumetric,
}

fn default_mode() -> GeneratorMode {
    GeneratorMode::Volumetric
}

/// Surface shape: base level plus layered noise, clamped into `[min_height, max_height]`.
#[derive(Clone, Debug, Deserialize)]
pub struct Shape {
    #[serde(default = "default_base_height")]
    pub base_height: f32,
    #[serde(default = "default_height_scale")]
    pub height_scale: f32,
    #[serde(default = "default_octaves")]
    pub octaves: u32,
    #[serde(default = "default_persistence")]
    pub persistence: f32,
    #[serde(default = "default_lacunarity")]
    pub lacunarity: f32,
    #[serde(default = "default_shape_scale")]
    pub scale: f32,
    #[serde(default = "default_min_height")]
    pub min_height: i32,
    #[serde(default = "default_max_height")]
    pub max_height: i32,
}
fn default_base_height() -> f32 {
    40.0
}
fn default_height_scale() -> f32 {
    18.0
}
fn default_octaves() -> u32 {
    4
}
fn default_persistence() -> f32 {
    0.5
}
fn default_lacunarity() -> f32 {
    2.0
}
fn default_shape_scale() -> f32 {
    32.0
}
fn default_min_height() -> i32 {
    1
}
fn default_max_height() -> i32 {
    120
}
impl Default for Shape {
    fn default() -> Self {
        Self {
            base_height: default_base_height(),
            height_scale: default_height_scale(),
            octaves: default_octaves(),
            persistence: default_persistence(),
            lacunarity: default_lacunarity(),
            scale: default_shape_scale(),
            min_height: default_min_height(),
            max_height: default_max_height(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Biome {
    #[serde(default = "default_biome_scale")]
    pub scale: f32,
    #[serde(default = "default_mountain_thr")]
    pub mountain_threshold: f32,
    #[serde(default = "default_plains_thr")]
    pub plains_threshold: f32,
    #[serde(default = "default_mountain_height")]
    pub mountain_height: f32,
    #[serde(default = "default_valley_depth")]
    pub valley_depth: f32,
}
fn default_biome_scale() -> f32 {
    64.0
}
fn default_mountain_thr() -> f32 {
    0.65
}
fn default_plains_thr() -> f32 {
    0.4
}
fn default_mountain_height() -> f32 {
    20.0
}
fn default_valley_depth() -> f32 {
    10.0
}
impl Default for Biome {
    fn default() -> Self {
        Self {
            scale: default_biome_scale(),
            mountain_threshold: default_mountain_thr(),
            plains_threshold: default_plains_thr(),
            mountain_height: default_mountain_height(),
            valley_depth: default_valley_depth(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Blend {
    #[serde(default = "default_blend_enable")]
    pub enable: bool,
    #[serde(default = "default_blend_margin")]
    pub margin: usize,
}
fn default_blend_enable() -> bool {
    true
}
fn default_blend_margin() -> usize {
    4
}
impl Default for Blend {
    fn default() -> Self {
        Self {
            enable: default_blend_enable(),
            margin: default_blend_margin(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Smooth {
    #[serde(default = "default_smooth_passes")]
    pub passes: u32,
    #[serde(default = "default_smooth_radius")]
    pub radius: usize,
    #[serde(default = "default_smooth_sigma")]
    pub sigma: f32,
}
fn default_smooth_passes() -> u32 {
    1
}
fn default_smooth_radius() -> usize {
    2
}
fn default_smooth_sigma() -> f32 {
    1.0
}
impl Default for Smooth {
    fn default() -> Self {
        Self {
            passes: default_smooth_passes(),
            radius: default_smooth_radius(),
            sigma: default_smooth_sigma(),
        }
    }
}

/// Height thresholds for the height-field column classification.
#[derive(Clone, Debug, Deserialize)]
pub struct Classify {
    #[serde(default = "default_water_below")]
    pub water_below: f32,
    #[serde(default = "default_stone_above")]
    pub stone_above: f32,
    #[serde(default = "default_snow_above")]
    pub snow_above: f32,
    /// Peak threshold shift applied by the secondary surface field.
    #[serde(default = "default_modulation")]
    pub modulation: f32,
    #[serde(default = "default_modulation_scale")]
    pub modulation_scale: f32,
}
fn default_water_below() -> f32 {
    35.0
}
fn default_stone_above() -> f32 {
    55.0
}
fn default_snow_above() -> f32 {
    65.0
}
fn default_modulation() -> f32 {
    3.0
}
fn default_modulation_scale() -> f32 {
    16.0
}
impl Default for Classify {
    fn default() -> Self {
        Self {
            water_below: default_water_below(),
            stone_above: default_stone_above(),
            snow_above: default_snow_above(),
            modulation: default_modulation(),
            modulation_scale: default_modulation_scale(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Volume {
    /// Keys missing from `[volume.surface]` take the volumetric defaults, not the
    /// height-field ones.
    #[serde(
        default = "default_volume_surface",
        deserialize_with = "deserialize_volume_surface"
    )]
    pub surface: Shape,
    #[serde(default = "default_water_level")]
    pub water_level: i32,
    /// Surface cells below `water_level + sand_margin` become sand.
    #[serde(default = "default_sand_margin")]
    pub sand_margin: i32,
    #[serde(default = "default_snow_level")]
    pub snow_level: i32,
    #[serde(default = "default_subsurface_depth")]
    pub subsurface_depth: f32,
    #[serde(default = "default_subsurface_jitter")]
    pub subsurface_jitter: f32,
    #[serde(default = "default_density_scale")]
    pub density_scale: f32,
    #[serde(default)]
    pub caves: Caves,
    #[serde(default)]
    pub ores: Ores,
}
fn default_volume_surface() -> Shape {
    Shape {
        base_height: 30.0,
        height_scale: 10.0,
        min_height: 4,
        max_height: 62,
        ..Shape::default()
    }
}

#[derive(Deserialize)]
#[serde(default)]
struct VolumeSurfaceToml {
    base_height: f32,
    height_scale: f32,
    octaves: u32,
    persistence: f32,
    lacunarity: f32,
    scale: f32,
    min_height: i32,
    max_height: i32,
}

impl Default for VolumeSurfaceToml {
    fn default() -> Self {
        let s = default_volume_surface();
        Self {
            base_height: s.base_height,
            height_scale: s.height_scale,
            octaves: s.octaves,
            persistence: s.persistence,
            lacunarity: s.lacunarity,
            scale: s.scale,
            min_height: s.min_height,
            max_height: s.max_height,
        }
    }
}

fn deserialize_volume_surface<'de, D: Deserializer<'de>>(d: D) -> Result<Shape, D::Error> {
    let t = VolumeSurfaceToml::deserialize(d)?;
    Ok(Shape {
        base_height: t.base_height,
        height_scale: t.height_scale,
        octaves: t.octaves,
        persistence: t.persistence,
        lacunarity: t.lacunarity,
        scale: t.scale,
        min_height: t.min_height,
        max_height: t.max_height,
    })
}
fn default_water_level() -> i32 {
    20
}
fn default_sand_margin() -> i32 {
    2
}
fn default_snow_level() -> i32 {
    50
}
fn default_subsurface_depth() -> f32 {
    3.0
}
fn default_subsurface_jitter() -> f32 {
    1.5
}
fn default_density_scale() -> f32 {
    8.0
}
impl Default for Volume {
    fn default() -> Self {
        Self {
            surface: default_volume_surface(),
            water_level: default_water_level(),
            sand_margin: default_sand_margin(),
            snow_level: default_snow_level(),
            subsurface_depth: default_subsurface_depth(),
            subsurface_jitter: default_subsurface_jitter(),
            density_scale: default_density_scale(),
            caves: Caves::default(),
            ores: Ores::default(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Caves {
    #[serde(default = "default_caves_enable")]
    pub enable: bool,
    #[serde(default = "default_primary_scale")]
    pub primary_scale: f32,
    #[serde(default = "default_detail_scale")]
    pub detail_scale: f32,
    #[serde(default = "default_detail_weight")]
    pub detail_weight: f32,
    #[serde(default = "default_cave_threshold")]
    pub threshold: f32,
    /// Threshold drop at full chunk depth; caves widen further down.
    #[serde(default = "default_depth_falloff")]
    pub depth_falloff: f32,
    #[serde(default = "default_min_threshold")]
    pub min_threshold: f32,
    #[serde(default = "default_min_cave_depth")]
    pub min_depth: i32,
    #[serde(default = "default_water_band")]
    pub water_band: i32,
    #[serde(default = "default_lava_max_y")]
    pub lava_max_y: i32,
    #[serde(default = "default_lava_chance")]
    pub lava_chance: f32,
}
fn default_caves_enable() -> bool {
    true
}
fn default_primary_scale() -> f32 {
    16.0
}
fn default_detail_scale() -> f32 {
    6.0
}
fn default_detail_weight() -> f32 {
    0.3
}
fn default_cave_threshold() -> f32 {
    0.66
}
fn default_depth_falloff() -> f32 {
    0.12
}
fn default_min_threshold() -> f32 {
    0.5
}
fn default_min_cave_depth() -> i32 {
    5
}
fn default_water_band() -> i32 {
    2
}
fn default_lava_max_y() -> i32 {
    12
}
fn default_lava_chance() -> f32 {
    0.1
}
impl Default for Caves {
    fn default() -> Self {
        Self {
            enable: default_caves_enable(),
            primary_scale: default_primary_scale(),
            detail_scale: default_detail_scale(),
            detail_weight: default_detail_weight(),
            threshold: default_cave_threshold(),
            depth_falloff: default_depth_falloff(),
            min_threshold: default_min_threshold(),
            min_depth: default_min_cave_depth(),
            water_band: default_water_band(),
            lava_max_y: default_lava_max_y(),
            lava_chance: default_lava_chance(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Ores {
    #[serde(default = "default_ores_enable")]
    pub enable: bool,
    #[serde(default = "default_ore_chance")]
    pub chance: f32,
    #[serde(default = "default_iron_max_y")]
    pub iron_max_y: i32,
    #[serde(default = "default_gold_max_y")]
    pub gold_max_y: i32,
    #[serde(default = "default_diamond_max_y")]
    pub diamond_max_y: i32,
    #[serde(default = "default_iron_weight")]
    pub iron_weight: f32,
    #[serde(default = "default_gold_weight")]
    pub gold_weight: f32,
    #[serde(default = "default_diamond_weight")]
    pub diamond_weight: f32,
}
fn default_ores_enable() -> bool {
    true
}
fn default_ore_chance() -> f32 {
    0.02
}
fn default_iron_max_y() -> i32 {
    40
}
fn default_gold_max_y() -> i32 {
    24
}
fn default_diamond_max_y() -> i32 {
    12
}
fn default_iron_weight() -> f32 {
    0.3
}
fn default_gold_weight() -> f32 {
    0.12
}
fn default_diamond_weight() -> f32 {
    0.05
}
impl Default for Ores {
    fn default() -> Self {
        Self {
            enable: default_ores_enable(),
            chance: default_ore_chance(),
            iron_max_y: default_iron_max_y(),
            gold_max_y: default_gold_max_y(),
            diamond_max_y: default_diamond_max_y(),
            iron_weight: default_iron_weight(),
            gold_weight: default_gold_weight(),
            diamond_weight: default_diamond_weight(),
        }
    }
}

/// Smallest octave count the surface generator runs, whatever the config says.
pub const MIN_OCTAVES: u32 = 3;

impl Shape {
    pub fn fractal(&self) -> FractalParams {
        FractalParams {
            octaves: self.octaves.max(MIN_OCTAVES),
            persistence: self.persistence,
            lacunarity: self.lacunarity,
            scale: self.scale,
        }
    }
}

impl WorldGenConfig {
    #[inline]
    pub fn chunk_size_i32(&self) -> i32 {
        self.chunk_size as i32
    }

    pub fn validate(&self) -> Result<(), GenError> {
        if self.chunk_size < 2 {
            return Err(GenError::InvalidConfig("chunk_size must be at least 2"));
        }
        for shape in [&self.height, &self.volume.surface] {
            if shape.min_height > shape.max_height {
                return Err(GenError::InvalidConfig("min_height exceeds max_height"));
            }
            if shape.min_height < 0 {
                return Err(GenError::InvalidConfig("min_height must not be negative"));
            }
            if !(shape.base_height.is_finite() && shape.height_scale.is_finite()) {
                return Err(GenError::InvalidConfig("surface shape must be finite"));
            }
        }
        if self.volume.surface.min_height >= self.chunk_size as i32 {
            return Err(GenError::InvalidConfig(
                "volumetric min_height must lie inside the chunk",
            ));
        }
        Ok(())
    }
}

pub fn load_config_from_path(path: &Path) -> Result<WorldGenConfig, Box<dyn Error>> {
    let s = fs::read_to_string(path)?;
    let cfg: WorldGenConfig = toml::from_str(&s)?;
    cfg.validate()?;
    Ok(cfg)
}
