//! Mesh stage: polygonize sampled blocks and translate removals.

use std::sync::Arc;

use rayon::prelude::*;

use super::types::{ChunkMesh, ChunkUpdate, DensityResult, MeshEvent, UpdateKind};
use crate::density::DensityField;
use crate::transvoxel::polygonize;
use crate::types::ChunkGeometry;

/// Turns density results into meshes and `Remove` diffs into teardowns.
pub struct MeshUpdateExecutor<F: ?Sized> {
  field: Arc<F>,
  chunk_size: u32,
  transition_width: f32,
}

impl<F: DensityField + ?Sized> MeshUpdateExecutor<F> {
  pub fn new(field: Arc<F>, chunk_size: u32, transition_width: f32) -> Self {
    Self {
      field,
      chunk_size,
      transition_width,
    }
  }

  /// Mesh one chunk. Uniform chunks produce empty geometry.
  pub fn mesh(&self, result: DensityResult) -> ChunkMesh {
    mesh_chunk(&*self.field, result, self.chunk_size, self.transition_width)
  }

  /// Mesh every result in parallel, keeping input order.
  #[tracing::instrument(skip_all, name = "mesh_update", fields(count = results.len()))]
  pub fn run(&self, results: Vec<DensityResult>) -> Vec<ChunkMesh> {
    results.into_par_iter().map(|r| self.mesh(r)).collect()
  }

  /// Teardown request for a removed chunk.
  pub fn teardown(update: &ChunkUpdate) -> MeshEvent {
    debug_assert_eq!(update.kind, UpdateKind::Remove);
    MeshEvent::Teardown {
      position: update.position,
      lod: update.lod,
    }
  }
}

/// Polygonize one density result.
pub fn mesh_chunk<F: DensityField + ?Sized>(
  field: &F,
  result: DensityResult,
  chunk_size: u32,
  transition_width: f32,
) -> ChunkMesh {
  let update = result.update;
  let geometry = match &result.block {
    Some(block) => polygonize(block, field, update.neighbors_mask, transition_width),
    None => ChunkGeometry::default(),
  };
  ChunkMesh {
    key: update.key(),
    kind: update.kind,
    neighbors_mask: update.neighbors_mask,
    origin: update.origin(chunk_size).as_vec3(),
    geometry,
  }
}
