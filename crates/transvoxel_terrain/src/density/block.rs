//! DensityBlock - padded cube of density samples for one chunk.
//!
//! ```text
//! sample index:  -1 │ 0  1  2 ... N-1  N │ N+1
//!                pad│     cell corners    │pad
//! ```
//!
//! A chunk of `N` cells needs `N + 1` corner samples per axis. One extra
//! sample on the low side and one on the high side let gradients use central
//! differences at every corner, giving `N + 3` samples per axis. Memory is
//! row-major with Z innermost.

use glam::{IVec3, Vec3};

use super::DensityField;

/// Per-chunk density samples at the chunk's LOD spacing.
#[derive(Clone, Debug)]
pub struct DensityBlock {
  chunk_size: i32,
  side: i32,
  lod: u32,
  spacing: f32,
  origin: Vec3,
  samples: Vec<f32>,
}

impl DensityBlock {
  /// Sample `field` for a chunk whose minimum corner is `origin`.
  pub fn sample<F: DensityField + ?Sized>(field: &F, origin: IVec3, lod: u32, chunk_size: u32) -> Self {
    let spacing = (1u32 << lod) as f32;
    let origin = origin.as_vec3();
    Self::from_fn(chunk_size, origin, lod, |x, y, z| {
      field.value(origin + IVec3::new(x, y, z).as_vec3() * spacing)
    })
  }

  /// Build a block from a function of local sample coordinates (`-1..=N+1`).
  pub fn from_fn(chunk_size: u32, origin: Vec3, lod: u32, mut f: impl FnMut(i32, i32, i32) -> f32) -> Self {
    let chunk_size = chunk_size as i32;
    let side = chunk_size + 3;
    let mut samples = Vec::with_capacity((side * side * side) as usize);
    for x in -1..=chunk_size + 1 {
      for y in -1..=chunk_size + 1 {
        for z in -1..=chunk_size + 1 {
          samples.push(f(x, y, z));
        }
      }
    }
    Self {
      chunk_size,
      side,
      lod,
      spacing: (1u32 << lod) as f32,
      origin,
      samples,
    }
  }

  #[inline]
  pub fn chunk_size(&self) -> i32 {
    self.chunk_size
  }

  /// Samples per axis including padding.
  #[inline]
  pub fn side(&self) -> i32 {
    self.side
  }

  #[inline]
  pub fn lod(&self) -> u32 {
    self.lod
  }

  /// World distance between adjacent samples.
  #[inline]
  pub fn spacing(&self) -> f32 {
    self.spacing
  }

  /// World position of sample (0, 0, 0).
  #[inline]
  pub fn origin(&self) -> Vec3 {
    self.origin
  }

  /// Edge length of the chunk in world units.
  #[inline]
  pub fn world_size(&self) -> f32 {
    self.chunk_size as f32 * self.spacing
  }

  #[inline(always)]
  fn index(&self, x: i32, y: i32, z: i32) -> usize {
    debug_assert!((-1..=self.chunk_size + 1).contains(&x));
    debug_assert!((-1..=self.chunk_size + 1).contains(&y));
    debug_assert!((-1..=self.chunk_size + 1).contains(&z));
    (((x + 1) * self.side + (y + 1)) * self.side + (z + 1)) as usize
  }

  /// Sample at local coordinates (`-1..=N+1`).
  #[inline(always)]
  pub fn get(&self, x: i32, y: i32, z: i32) -> f32 {
    self.samples[self.index(x, y, z)]
  }

  #[inline(always)]
  pub fn get_at(&self, p: IVec3) -> f32 {
    self.get(p.x, p.y, p.z)
  }

  /// Position of a sample relative to the chunk origin.
  #[inline(always)]
  pub fn local_position(&self, p: IVec3) -> Vec3 {
    p.as_vec3() * self.spacing
  }

  /// World position of a sample.
  #[inline(always)]
  pub fn world_position(&self, p: IVec3) -> Vec3 {
    self.origin + self.local_position(p)
  }

  /// Central-difference gradient at a corner sample (`0..=N`).
  #[inline]
  pub fn gradient(&self, p: IVec3) -> Vec3 {
    let (x, y, z) = (p.x, p.y, p.z);
    Vec3::new(
      self.get(x + 1, y, z) - self.get(x - 1, y, z),
      self.get(x, y + 1, z) - self.get(x, y - 1, z),
      self.get(x, y, z + 1) - self.get(x, y, z - 1),
    ) / (2.0 * self.spacing)
  }

  /// True if every corner sample (`0..=N`) has the same sign.
  ///
  /// Padding is excluded: it only feeds normals.
  pub fn is_uniform(&self) -> bool {
    let first_inside = self.get(0, 0, 0) < 0.0;
    for x in 0..=self.chunk_size {
      for y in 0..=self.chunk_size {
        for z in 0..=self.chunk_size {
          if (self.get(x, y, z) < 0.0) != first_inside {
            return false;
          }
        }
      }
    }
    true
  }
}

#[cfg(test)]
#[path = "block_test.rs"]
mod block_test;
