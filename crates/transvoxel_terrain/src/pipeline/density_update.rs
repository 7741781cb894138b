//! Density stage: sample one padded block per Create/Update diff.

use std::sync::Arc;

use rayon::prelude::*;

use super::types::{ChunkUpdate, DensityResult};
use crate::density::{DensityBlock, DensityField};

/// Samples density blocks for chunk diffs.
pub struct DensityUpdateExecutor<F: ?Sized> {
  field: Arc<F>,
  chunk_size: u32,
}

impl<F: DensityField + ?Sized> DensityUpdateExecutor<F> {
  pub fn new(field: Arc<F>, chunk_size: u32) -> Self {
    Self { field, chunk_size }
  }

  #[inline]
  pub fn field(&self) -> &Arc<F> {
    &self.field
  }

  /// Sample one chunk. Blocks without a sign change come back as `None`.
  pub fn sample(&self, update: &ChunkUpdate) -> DensityResult {
    sample_chunk(&*self.field, update, self.chunk_size)
  }

  /// Sample every diff that needs a mesh, in parallel, keeping diff order.
  #[tracing::instrument(skip_all, name = "density_update", fields(count = updates.len()))]
  pub fn run(&self, updates: &[ChunkUpdate]) -> Vec<DensityResult> {
    updates
      .par_iter()
      .filter(|u| u.needs_mesh())
      .map(|u| self.sample(u))
      .collect()
  }
}

/// Sample the padded block for `update`.
pub fn sample_chunk<F: DensityField + ?Sized>(field: &F, update: &ChunkUpdate, chunk_size: u32) -> DensityResult {
  let block = DensityBlock::sample(field, update.origin(chunk_size), update.lod, chunk_size);
  let block = if block.is_uniform() { None } else { Some(block) };
  DensityResult {
    update: *update,
    block,
  }
}
