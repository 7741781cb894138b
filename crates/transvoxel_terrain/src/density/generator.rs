//! DensityGenerator - procedural terrain density from fractal noise.
//!
//! ```text
//! planar:  density(p) = p.y                 - height(p.x, p.z) * height_scale - detail(p) * detail_scale
//! planet:  density(p) = |p - center| - R    - height(p.x, p.z) * height_scale - detail(p) * detail_scale
//! ```
//!
//! `height` is 2D fBm, `detail` is 3D fBm. Both are built once from the
//! settings and only read while sampling.

use glam::Vec3;
use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

use super::DensityField;

/// Fractal Brownian motion parameters for one noise layer.
#[derive(Clone, Debug, PartialEq)]
pub struct FbmSettings {
  pub octaves: usize,
  pub frequency: f64,
  pub lacunarity: f64,
  pub persistence: f64,
  /// Strength multiplier applied to the `[-1, 1]` noise output.
  pub scale: f32,
}

impl FbmSettings {
  pub fn new(octaves: usize, frequency: f64, scale: f32) -> Self {
    Self {
      octaves,
      frequency,
      lacunarity: 2.0,
      persistence: 0.5,
      scale,
    }
  }

  pub fn with_lacunarity(mut self, lacunarity: f64) -> Self {
    self.lacunarity = lacunarity;
    self
  }

  pub fn with_persistence(mut self, persistence: f64) -> Self {
    self.persistence = persistence;
    self
  }

  fn build(&self, seed: u32) -> Fbm<Perlin> {
    Fbm::<Perlin>::new(seed)
      .set_octaves(self.octaves.max(1))
      .set_frequency(self.frequency)
      .set_lacunarity(self.lacunarity)
      .set_persistence(self.persistence)
  }
}

/// Base shape the noise layers perturb.
#[derive(Clone, Debug, PartialEq)]
pub enum TerrainShape {
  /// Ground plane at y = 0.
  Planar,
  /// Sphere of `radius` around `center`.
  Planet { center: Vec3, radius: f32 },
}

/// Settings for [`DensityGenerator`].
#[derive(Clone, Debug, PartialEq)]
pub struct DensitySettings {
  pub seed: u32,
  pub heightmap: FbmSettings,
  pub perturbation: FbmSettings,
  pub shape: TerrainShape,
}

impl DensitySettings {
  pub fn new(seed: u32) -> Self {
    Self {
      seed,
      ..Default::default()
    }
  }

  pub fn with_heightmap(mut self, heightmap: FbmSettings) -> Self {
    self.heightmap = heightmap;
    self
  }

  pub fn with_perturbation(mut self, perturbation: FbmSettings) -> Self {
    self.perturbation = perturbation;
    self
  }

  pub fn with_shape(mut self, shape: TerrainShape) -> Self {
    self.shape = shape;
    self
  }
}

impl Default for DensitySettings {
  fn default() -> Self {
    Self {
      seed: 0,
      heightmap: FbmSettings::new(5, 0.004, 48.0),
      perturbation: FbmSettings::new(3, 0.02, 6.0),
      shape: TerrainShape::Planar,
    }
  }
}

/// Planar or planetary terrain density.
#[derive(Clone, Debug)]
pub struct DensityGenerator {
  settings: DensitySettings,
  height: Fbm<Perlin>,
  detail: Fbm<Perlin>,
}

impl DensityGenerator {
  pub fn new(settings: DensitySettings) -> Self {
    let height = settings.heightmap.build(settings.seed);
    let detail = settings.perturbation.build(settings.seed.wrapping_add(1));
    Self {
      settings,
      height,
      detail,
    }
  }

  pub fn settings(&self) -> &DensitySettings {
    &self.settings
  }

  /// Density at `(x, y, z)`.
  pub fn get_value(&self, x: f32, y: f32, z: f32) -> f32 {
    let p = Vec3::new(x, y, z);
    let base = match &self.settings.shape {
      TerrainShape::Planar => y,
      TerrainShape::Planet { center, radius } => (p - *center).length() - radius,
    };

    let mut density = base;
    let height_scale = self.settings.heightmap.scale;
    if height_scale != 0.0 {
      density -= self.height.get([x as f64, z as f64]) as f32 * height_scale;
    }
    let detail_scale = self.settings.perturbation.scale;
    if detail_scale != 0.0 {
      density -= self.detail.get([x as f64, y as f64, z as f64]) as f32 * detail_scale;
    }
    density
  }
}

impl Default for DensityGenerator {
  fn default() -> Self {
    Self::new(DensitySettings::default())
  }
}

impl DensityField for DensityGenerator {
  #[inline]
  fn value(&self, position: Vec3) -> f32 {
    self.get_value(position.x, position.y, position.z)
  }
}

#[cfg(test)]
#[path = "generator_test.rs"]
mod generator_test;
