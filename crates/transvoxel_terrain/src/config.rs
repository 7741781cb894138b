//! TerrainConfig - world sizing, LOD shells and transition geometry.

use crate::constants::{MAX_OCTREE_DEPTH, MIN_CHUNK_SIZE};
use crate::error::ConfigError;

/// Smallest shell multiplier for which adjacent chunks never differ by more
/// than one LOD.
pub const MIN_LOD_DISTANCE_FACTOR: f32 = 1.5;

/// Validated world/chunk configuration.
///
/// The world is a cube of `world_size` units centered on the origin. Leaf
/// chunks (depth 0) span `chunk_size` units with one unit voxel spacing; a
/// chunk at depth `d` spans `chunk_size << d` units with `1 << d` spacing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerrainConfig {
  /// World edge length. Power of two.
  pub world_size: u32,

  /// Cells per chunk edge. Power of two, at least [`MIN_CHUNK_SIZE`].
  pub chunk_size: u32,

  /// Shell multiplier: a node renders once the target is farther than
  /// `lod_distance_factor * chunk_size * 2^depth` (Chebyshev).
  pub lod_distance_factor: f32,

  /// Extra distance past a face used when probing for neighbors.
  pub probe_margin: i32,

  /// Width of the transition strip as a fraction of a cell.
  pub transition_cell_width: f32,
}

impl TerrainConfig {
  /// Create a config with default shell and transition parameters.
  pub fn new(world_size: u32, chunk_size: u32) -> Result<Self, ConfigError> {
    let config = Self {
      world_size,
      chunk_size,
      lod_distance_factor: 1.5,
      probe_margin: 1,
      transition_cell_width: 0.5,
    };
    config.validate()?;
    Ok(config)
  }

  pub fn with_lod_distance_factor(mut self, factor: f32) -> Result<Self, ConfigError> {
    self.lod_distance_factor = factor;
    self.validate()?;
    Ok(self)
  }

  pub fn with_probe_margin(mut self, margin: i32) -> Self {
    self.probe_margin = margin.max(1);
    self
  }

  pub fn with_transition_cell_width(mut self, width: f32) -> Result<Self, ConfigError> {
    self.transition_cell_width = width;
    self.validate()?;
    Ok(self)
  }

  /// Check every sizing rule. Called by all constructors.
  pub fn validate(&self) -> Result<(), ConfigError> {
    if !self.world_size.is_power_of_two() {
      return Err(ConfigError::WorldSizeNotPowerOfTwo(self.world_size));
    }
    if !self.chunk_size.is_power_of_two() {
      return Err(ConfigError::ChunkSizeNotPowerOfTwo(self.chunk_size));
    }
    if self.chunk_size < MIN_CHUNK_SIZE {
      return Err(ConfigError::ChunkSizeTooSmall {
        size: self.chunk_size,
        min: MIN_CHUNK_SIZE,
      });
    }
    if self.chunk_size > self.world_size {
      return Err(ConfigError::ChunkLargerThanWorld {
        chunk_size: self.chunk_size,
        world_size: self.world_size,
      });
    }
    let depth = self.max_depth();
    if depth > MAX_OCTREE_DEPTH {
      return Err(ConfigError::TreeTooDeep {
        depth,
        max: MAX_OCTREE_DEPTH,
      });
    }
    if !self.lod_distance_factor.is_finite() || self.lod_distance_factor < MIN_LOD_DISTANCE_FACTOR {
      return Err(ConfigError::InvalidDistanceFactor(self.lod_distance_factor));
    }
    if !(self.transition_cell_width > 0.0 && self.transition_cell_width < 1.0) {
      return Err(ConfigError::InvalidTransitionWidth(self.transition_cell_width));
    }
    Ok(())
  }

  /// Depth of the root node (finest leaves are depth 0).
  #[inline]
  pub fn max_depth(&self) -> u32 {
    (self.world_size / self.chunk_size).trailing_zeros()
  }

  /// Edge length of a depth-0 chunk in world units.
  #[inline]
  pub fn leaf_size(&self) -> i32 {
    self.chunk_size as i32
  }

  /// Half the world edge; the root's extents.
  #[inline]
  pub fn world_half_extent(&self) -> i32 {
    (self.world_size / 2) as i32
  }

  /// Edge length of a chunk at the given LOD.
  #[inline]
  pub fn chunk_world_size(&self, lod: u32) -> i32 {
    self.leaf_size() << lod
  }

  /// Voxel spacing at the given LOD.
  #[inline]
  pub fn voxel_spacing(&self, lod: u32) -> f32 {
    (1u32 << lod) as f32
  }

  /// Chebyshev distance beyond which a node at `depth` renders.
  #[inline]
  pub fn lod_threshold(&self, depth: u32) -> f32 {
    self.lod_distance_factor * self.chunk_world_size(depth) as f32
  }
}

impl Default for TerrainConfig {
  fn default() -> Self {
    Self {
      world_size: 1024,
      chunk_size: 32,
      lod_distance_factor: 1.5,
      probe_margin: 1,
      transition_cell_width: 0.5,
    }
  }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
