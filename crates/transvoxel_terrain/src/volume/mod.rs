//! Sparse volume store: lazily allocated cubic chunks of voxel values.
//!
//! ```text
//! world voxel p ──floor div──▶ chunk index  c = p.div_euclid(side)
//!               ──floor mod──▶ local offset l = p.rem_euclid(side)
//! ```
//!
//! A chunk is allocated by the first write inside it and never released.
//! Reading from a chunk that was never written returns `T::default()`.
//!
//! Each chunk has its own `RwLock`, so many readers (mesh tasks) can sample
//! while an edit holds the write lock of a different chunk. The chunk map
//! itself is locked for writing only to insert a new chunk.

use std::collections::HashMap;
use std::sync::Arc;

use glam::{IVec3, Vec3};
use parking_lot::{RwLock, RwLockReadGuard};

use crate::density::DensityField;
use crate::error::ConfigError;

/// Quantized density storage for `i8` voxels.
///
/// Maps float density to i8 [-127, +127] with ±10 world unit range.
pub mod density_conversion {
  /// Density range in world units (values outside this clamp to ±127).
  pub const RANGE: f32 = 10.0;

  /// Scale factor: 127 / RANGE = 12.7
  pub const SCALE: f32 = 127.0 / RANGE;

  /// Inverse scale for converting back to float.
  pub const INV_SCALE: f32 = RANGE / 127.0;

  #[inline(always)]
  pub fn to_storage(density: f32) -> i8 {
    (density * SCALE).clamp(-127.0, 127.0).round() as i8
  }

  #[inline(always)]
  pub fn to_float(value: i8) -> f32 {
    value as f32 * INV_SCALE
  }
}

/// A storable voxel value convertible to and from density.
pub trait Voxel: Copy + Default + Send + Sync + 'static {
  fn to_density(self) -> f32;
  fn from_density(density: f32) -> Self;
}

impl Voxel for f32 {
  #[inline(always)]
  fn to_density(self) -> f32 {
    self
  }

  #[inline(always)]
  fn from_density(density: f32) -> Self {
    density
  }
}

impl Voxel for i8 {
  #[inline(always)]
  fn to_density(self) -> f32 {
    density_conversion::to_float(self)
  }

  #[inline(always)]
  fn from_density(density: f32) -> Self {
    density_conversion::to_storage(density)
  }
}

/// Fixed-size cube of voxels, Z innermost.
#[derive(Debug)]
pub struct VolumeChunk<T> {
  side: i32,
  voxels: RwLock<Box<[T]>>,
}

impl<T: Voxel> VolumeChunk<T> {
  fn new(side: i32) -> Self {
    Self {
      side,
      voxels: RwLock::new(vec![T::default(); (side * side * side) as usize].into_boxed_slice()),
    }
  }

  #[inline(always)]
  fn index(&self, local: IVec3) -> usize {
    ((local.x * self.side + local.y) * self.side + local.z) as usize
  }

  /// Voxel at a local offset (`0..side` per axis).
  pub fn get(&self, local: IVec3) -> T {
    self.voxels.read()[self.index(local)]
  }

  /// Hold the read lock across many lookups.
  pub fn read(&self) -> RwLockReadGuard<'_, Box<[T]>> {
    self.voxels.read()
  }

  fn set(&self, local: IVec3, value: T) {
    let index = self.index(local);
    self.voxels.write()[index] = value;
  }
}

/// Sparse, chunked voxel dictionary.
#[derive(Debug)]
pub struct VolumeDictionary<T> {
  chunk_side: i32,
  chunks: RwLock<HashMap<IVec3, Arc<VolumeChunk<T>>>>,
}

impl<T: Voxel> VolumeDictionary<T> {
  /// Create an empty store with chunks of `chunk_side³` voxels.
  pub fn new(chunk_side: u32) -> Result<Self, ConfigError> {
    if !chunk_side.is_power_of_two() {
      return Err(ConfigError::ChunkSizeNotPowerOfTwo(chunk_side));
    }
    Ok(Self {
      chunk_side: chunk_side as i32,
      chunks: RwLock::new(HashMap::new()),
    })
  }

  #[inline]
  pub fn chunk_side(&self) -> i32 {
    self.chunk_side
  }

  /// Chunk index containing a voxel (floor division).
  #[inline]
  pub fn chunk_index(&self, p: IVec3) -> IVec3 {
    p.div_euclid(IVec3::splat(self.chunk_side))
  }

  /// Offset of a voxel inside its chunk (floor modulo).
  #[inline]
  pub fn local_offset(&self, p: IVec3) -> IVec3 {
    p.rem_euclid(IVec3::splat(self.chunk_side))
  }

  pub fn chunk_count(&self) -> usize {
    self.chunks.read().len()
  }

  pub fn contains_chunk(&self, index: IVec3) -> bool {
    self.chunks.read().contains_key(&index)
  }

  pub fn chunk(&self, index: IVec3) -> Option<Arc<VolumeChunk<T>>> {
    self.chunks.read().get(&index).cloned()
  }

  /// Voxel at `p`, or `T::default()` if its chunk was never written.
  pub fn get(&self, p: IVec3) -> T {
    match self.chunk(self.chunk_index(p)) {
      Some(chunk) => chunk.get(self.local_offset(p)),
      None => T::default(),
    }
  }

  /// Write a voxel, allocating its chunk on demand.
  pub fn set(&self, p: IVec3, value: T) {
    let chunk = self.chunk_or_insert(self.chunk_index(p));
    chunk.set(self.local_offset(p), value);
  }

  fn chunk_or_insert(&self, index: IVec3) -> Arc<VolumeChunk<T>> {
    if let Some(chunk) = self.chunk(index) {
      return chunk;
    }
    let side = self.chunk_side;
    self
      .chunks
      .write()
      .entry(index)
      .or_insert_with(|| Arc::new(VolumeChunk::new(side)))
      .clone()
  }

  /// Fill every voxel in `[min, max]` from a density field.
  ///
  /// Each chunk's write lock is held once for all of its voxels in the box.
  pub fn bake<F: DensityField + ?Sized>(&self, field: &F, min: IVec3, max: IVec3) {
    let first = self.chunk_index(min);
    let last = self.chunk_index(max);
    let side = IVec3::splat(self.chunk_side);

    for cx in first.x..=last.x {
      for cy in first.y..=last.y {
        for cz in first.z..=last.z {
          let index = IVec3::new(cx, cy, cz);
          let chunk = self.chunk_or_insert(index);
          let base = index * side;
          let lo = (min - base).max(IVec3::ZERO);
          let hi = (max - base).min(side - IVec3::ONE);

          let mut voxels = chunk.voxels.write();
          for x in lo.x..=hi.x {
            for y in lo.y..=hi.y {
              for z in lo.z..=hi.z {
                let local = IVec3::new(x, y, z);
                let value = T::from_density(field.value((base + local).as_vec3()));
                voxels[chunk.index(local)] = value;
              }
            }
          }
        }
      }
    }
    tracing::debug!(chunks = self.chunk_count(), "baked volume region");
  }
}

/// Trilinear density read of the stored voxels.
impl<T: Voxel> DensityField for VolumeDictionary<T> {
  fn value(&self, position: Vec3) -> f32 {
    let base = position.floor();
    let t = position - base;
    let b = base.as_ivec3();

    let d = |dx: i32, dy: i32, dz: i32| self.get(b + IVec3::new(dx, dy, dz)).to_density();
    let x00 = d(0, 0, 0) + (d(1, 0, 0) - d(0, 0, 0)) * t.x;
    let x10 = d(0, 1, 0) + (d(1, 1, 0) - d(0, 1, 0)) * t.x;
    let x01 = d(0, 0, 1) + (d(1, 0, 1) - d(0, 0, 1)) * t.x;
    let x11 = d(0, 1, 1) + (d(1, 1, 1) - d(0, 1, 1)) * t.x;
    let y0 = x00 + (x10 - x00) * t.y;
    let y1 = x01 + (x11 - x01) * t.y;
    y0 + (y1 - y0) * t.z
  }
}
