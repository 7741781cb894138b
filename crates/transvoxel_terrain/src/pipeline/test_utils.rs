//! Analytic density fields and fixtures for pipeline and mesher tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use glam::Vec3;

use crate::config::TerrainConfig;
use crate::density::DensityField;

// =============================================================================
// Analytic fields
// =============================================================================

/// Signed distance to a sphere: negative inside.
#[derive(Clone, Copy, Debug)]
pub struct SphereField {
  pub center: Vec3,
  pub radius: f32,
}

impl SphereField {
  pub fn new(center: Vec3, radius: f32) -> Self {
    Self { center, radius }
  }

  pub fn at_origin(radius: f32) -> Self {
    Self::new(Vec3::ZERO, radius)
  }
}

impl DensityField for SphereField {
  fn value(&self, position: Vec3) -> f32 {
    (position - self.center).length() - self.radius
  }
}

/// Half-space `dot(p, normal) < offset` is solid.
#[derive(Clone, Copy, Debug)]
pub struct PlaneField {
  pub normal: Vec3,
  pub offset: f32,
}

impl PlaneField {
  pub fn new(normal: Vec3, offset: f32) -> Self {
    Self {
      normal: normal.normalize(),
      offset,
    }
  }

  /// Ground plane at height `y`.
  pub fn horizontal(y: f32) -> Self {
    Self::new(Vec3::Y, y)
  }
}

impl DensityField for PlaneField {
  fn value(&self, position: Vec3) -> f32 {
    position.dot(self.normal) - self.offset
  }
}

/// Field from a closure.
pub struct FnField<F>(pub F);

impl<F: Fn(Vec3) -> f32 + Send + Sync> DensityField for FnField<F> {
  fn value(&self, position: Vec3) -> f32 {
    (self.0)(position)
  }
}

/// Wraps a field and counts evaluations.
pub struct CountingField<F> {
  inner: F,
  count: AtomicUsize,
}

impl<F: DensityField> CountingField<F> {
  pub fn new(inner: F) -> Self {
    Self {
      inner,
      count: AtomicUsize::new(0),
    }
  }

  pub fn count(&self) -> usize {
    self.count.load(Ordering::Relaxed)
  }
}

impl<F: DensityField> DensityField for CountingField<F> {
  fn value(&self, position: Vec3) -> f32 {
    self.count.fetch_add(1, Ordering::Relaxed);
    self.inner.value(position)
  }
}

// =============================================================================
// Fixtures
// =============================================================================

/// 256-unit world of 32-cell chunks (3 levels).
pub fn small_config() -> TerrainConfig {
  TerrainConfig::new(256, 32).unwrap()
}

/// 1024-unit world of 32-cell chunks (5 levels).
pub fn large_config() -> TerrainConfig {
  TerrainConfig::new(1024, 32).unwrap()
}

/// Ground plane slightly off the cell grid.
pub fn ground() -> PlaneField {
  PlaneField::horizontal(3.3)
}
