//! Pipeline I/O types.
//!
//! ```text
//!   target ──► ChunkUpdateExecutor ──► Vec<ChunkUpdate>
//!                                          │ Create / Update
//!                                          ▼
//!                              DensityUpdateExecutor ──► DensityResult
//!                                                            │ block (None = uniform)
//!                                                            ▼
//!                                   MeshUpdateExecutor ──► MeshEvent::Ready(ChunkMesh)
//!                                          ▲
//!                                          │ Remove
//!                                          └──────────────► MeshEvent::Teardown
//! ```

use glam::{IVec3, Vec3};

use crate::density::DensityBlock;
use crate::types::{ChunkGeometry, TerrainMeshRenderData};

// =============================================================================
// Diffs
// =============================================================================

/// What happened to a chunk this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UpdateKind {
  /// Chunk became renderable.
  Create,
  /// Chunk stopped being renderable.
  Remove,
  /// Chunk stays, but its neighbor mask changed.
  Update,
}

/// One entry of the per-tick diff list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkUpdate {
  pub kind: UpdateKind,
  /// Node center in world units.
  pub position: IVec3,
  pub lod: u32,
  /// Faces bordering finer chunks (bit `1 << face`).
  pub neighbors_mask: u8,
}

impl ChunkUpdate {
  pub fn create(position: IVec3, lod: u32) -> Self {
    Self {
      kind: UpdateKind::Create,
      position,
      lod,
      neighbors_mask: 0,
    }
  }

  pub fn remove(position: IVec3, lod: u32) -> Self {
    Self {
      kind: UpdateKind::Remove,
      position,
      lod,
      neighbors_mask: 0,
    }
  }

  pub fn update(position: IVec3, lod: u32, neighbors_mask: u8) -> Self {
    Self {
      kind: UpdateKind::Update,
      position,
      lod,
      neighbors_mask,
    }
  }

  #[inline]
  pub fn key(&self) -> ChunkKey {
    ChunkKey {
      position: self.position,
      lod: self.lod,
    }
  }

  /// Minimum corner of the chunk.
  #[inline]
  pub fn origin(&self, chunk_size: u32) -> IVec3 {
    self.position - IVec3::splat(((chunk_size / 2) << self.lod) as i32)
  }

  /// True for diffs that need density and mesh work.
  #[inline]
  pub fn needs_mesh(&self) -> bool {
    matches!(self.kind, UpdateKind::Create | UpdateKind::Update)
  }
}

/// Chunk identity: node center plus LOD.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChunkKey {
  pub position: IVec3,
  pub lod: u32,
}

// =============================================================================
// Stage outputs
// =============================================================================

/// Density stage output for one diff.
#[derive(Clone, Debug)]
pub struct DensityResult {
  pub update: ChunkUpdate,
  /// Sampled block, or `None` when the chunk has no surface.
  pub block: Option<DensityBlock>,
}

/// Meshed chunk, ready for the renderer.
#[derive(Clone, Debug, PartialEq)]
pub struct ChunkMesh {
  pub key: ChunkKey,
  pub kind: UpdateKind,
  pub neighbors_mask: u8,
  /// World position of the chunk's minimum corner; mesh positions are
  /// relative to it.
  pub origin: Vec3,
  pub geometry: ChunkGeometry,
}

impl ChunkMesh {
  #[inline]
  pub fn main(&self) -> &TerrainMeshRenderData {
    &self.geometry.main
  }

  #[inline]
  pub fn transition(&self, face: usize) -> &TerrainMeshRenderData {
    &self.geometry.transitions[face]
  }

  /// Main mesh positions with secondary vertices applied for this chunk's
  /// neighbor mask.
  pub fn secondary_positions(&self) -> Vec<[f32; 3]> {
    self.geometry.main.resolved_positions(self.neighbors_mask)
  }

  pub fn is_empty(&self) -> bool {
    self.geometry.is_empty()
  }
}

/// Output consumed by the external renderer.
#[derive(Clone, Debug, PartialEq)]
pub enum MeshEvent {
  /// Upload (or replace) the chunk's buffers.
  Ready(ChunkMesh),
  /// Release the chunk's buffers.
  Teardown { position: IVec3, lod: u32 },
}

impl MeshEvent {
  pub fn key(&self) -> ChunkKey {
    match self {
      MeshEvent::Ready(mesh) => mesh.key,
      MeshEvent::Teardown { position, lod } => ChunkKey {
        position: *position,
        lod: *lod,
      },
    }
  }
}
