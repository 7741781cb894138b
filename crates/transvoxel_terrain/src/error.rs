//! Error types.
//!
//! Configuration problems are reported once, at construction. Octree errors
//! mean the partition and the active chunk set have drifted apart; they are
//! propagated out of the update tick and should be treated as fatal.

use thiserror::Error;

/// Invalid world or chunk sizing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
  #[error("world size {0} is not a power of two")]
  WorldSizeNotPowerOfTwo(u32),

  #[error("chunk size {0} is not a power of two")]
  ChunkSizeNotPowerOfTwo(u32),

  #[error("chunk size {size} is below the minimum of {min}")]
  ChunkSizeTooSmall { size: u32, min: u32 },

  #[error("chunk size {chunk_size} exceeds world size {world_size}")]
  ChunkLargerThanWorld { chunk_size: u32, world_size: u32 },

  #[error("octree depth {depth} exceeds the location code limit of {max}")]
  TreeTooDeep { depth: u32, max: u32 },

  #[error("lod distance factor {0} must be finite and at least 1.5")]
  InvalidDistanceFactor(f32),

  #[error("transition cell width {0} must be within (0, 1)")]
  InvalidTransitionWidth(f32),
}

/// Octree / active-set consistency violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OctreeError {
  #[error("node {0:#x} not found")]
  NodeNotFound(u64),

  #[error("cannot split node {0:#x}: it already has children")]
  AlreadySplit(u64),

  #[error("cannot split node {0:#x}: it is at the finest depth")]
  SplitAtFinestDepth(u64),

  #[error("merge of node {parent:#x} is missing child {child:#x}")]
  MissingChild { parent: u64, child: u64 },
}

/// Any error raised by the terrain core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TerrainError {
  #[error(transparent)]
  Config(#[from] ConfigError),

  #[error(transparent)]
  Octree(#[from] OctreeError),
}
