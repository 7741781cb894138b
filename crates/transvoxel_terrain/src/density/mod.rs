//! Density fields: the scalar function `R³ -> R` the terrain is extracted from.
//!
//! Negative values are inside solid, positive values are air, and the surface
//! is the zero crossing. Fields are sampled concurrently from many chunk
//! tasks, so implementations must be `Send + Sync` and free of mutable state.
//!
//! - [`generator`]: `DensityGenerator` - heightmap + 3D perturbation, planar
//!   or planet shaped, built on `noise` fBm
//! - [`block`]: `DensityBlock` - padded per-chunk sample cube fed to the
//!   mesher

pub mod block;
pub mod generator;

use std::sync::Arc;

use glam::Vec3;

pub use block::DensityBlock;
pub use generator::{DensityGenerator, DensitySettings, FbmSettings, TerrainShape};

/// Signed scalar field sampled by the density stage and the mesher.
pub trait DensityField: Send + Sync {
  /// Density at a world position.
  fn value(&self, position: Vec3) -> f32;

  /// Central-difference gradient with the given step.
  fn gradient(&self, position: Vec3, step: f32) -> Vec3 {
    let dx = Vec3::new(step, 0.0, 0.0);
    let dy = Vec3::new(0.0, step, 0.0);
    let dz = Vec3::new(0.0, 0.0, step);
    Vec3::new(
      self.value(position + dx) - self.value(position - dx),
      self.value(position + dy) - self.value(position - dy),
      self.value(position + dz) - self.value(position - dz),
    ) / (2.0 * step)
  }
}

impl<F: DensityField + ?Sized> DensityField for &F {
  #[inline]
  fn value(&self, position: Vec3) -> f32 {
    (**self).value(position)
  }
}

impl<F: DensityField + ?Sized> DensityField for Box<F> {
  #[inline]
  fn value(&self, position: Vec3) -> f32 {
    (**self).value(position)
  }
}

impl<F: DensityField + ?Sized> DensityField for Arc<F> {
  #[inline]
  fn value(&self, position: Vec3) -> f32 {
    (**self).value(position)
  }
}
