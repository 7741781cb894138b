//! Synchronous pipeline: one call per tick runs every stage to completion.
//!
//! ```text
//! tick(target)
//!   ├─ chunk_update    octree diff + neighbor masks (this thread)
//!   ├─ density_update  rayon, one block per Create/Update
//!   └─ mesh_update     rayon, one polygonization per block
//!        └─► Vec<MeshEvent> in diff order (coarse first)
//! ```

use std::sync::Arc;

use glam::Vec3;
use web_time::Instant;

use super::chunk_update::ChunkUpdateExecutor;
use super::density_update::DensityUpdateExecutor;
use super::mesh_update::MeshUpdateExecutor;
use super::types::{MeshEvent, UpdateKind};
use crate::config::TerrainConfig;
use crate::density::DensityField;
use crate::error::TerrainError;

/// Per-tick counters and stage timings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
  pub creates: usize,
  pub removes: usize,
  pub updates: usize,
  /// Chunks that produced geometry.
  pub meshed: usize,
  /// Chunks without geometry (uniform block or no triangles).
  pub uniform: usize,
  pub triangles: usize,
  pub diff_us: u64,
  pub density_us: u64,
  pub mesh_us: u64,
  pub total_us: u64,
}

impl TickStats {
  pub fn diff_count(&self) -> usize {
    self.creates + self.removes + self.updates
  }
}

/// Owns the partition and both work executors for one density field.
pub struct TerrainPipeline<F: ?Sized> {
  chunks: ChunkUpdateExecutor,
  density: DensityUpdateExecutor<F>,
  meshes: MeshUpdateExecutor<F>,
}

impl<F: DensityField + ?Sized> TerrainPipeline<F> {
  pub fn new(config: TerrainConfig, field: Arc<F>) -> Self {
    Self {
      density: DensityUpdateExecutor::new(Arc::clone(&field), config.chunk_size),
      meshes: MeshUpdateExecutor::new(field, config.chunk_size, config.transition_cell_width),
      chunks: ChunkUpdateExecutor::new(config),
    }
  }

  #[inline]
  pub fn config(&self) -> &TerrainConfig {
    self.chunks.config()
  }

  #[inline]
  pub fn chunks(&self) -> &ChunkUpdateExecutor {
    &self.chunks
  }

  /// Run one update cycle for `target`.
  #[tracing::instrument(skip_all, name = "tick")]
  pub fn tick(&mut self, target: Vec3) -> Result<(Vec<MeshEvent>, TickStats), TerrainError> {
    let start = Instant::now();
    let mut stats = TickStats::default();

    let diffs = self.chunks.update(target)?;
    stats.diff_us = start.elapsed().as_micros() as u64;
    for diff in &diffs {
      match diff.kind {
        UpdateKind::Create => stats.creates += 1,
        UpdateKind::Remove => stats.removes += 1,
        UpdateKind::Update => stats.updates += 1,
      }
    }

    let density_start = Instant::now();
    let blocks = self.density.run(&diffs);
    stats.density_us = density_start.elapsed().as_micros() as u64;

    let mesh_start = Instant::now();
    let mut meshes = self.meshes.run(blocks).into_iter();
    stats.mesh_us = mesh_start.elapsed().as_micros() as u64;

    let mut events = Vec::with_capacity(diffs.len());
    for diff in &diffs {
      if !diff.needs_mesh() {
        events.push(MeshUpdateExecutor::<F>::teardown(diff));
        continue;
      }
      let Some(mesh) = meshes.next() else {
        break;
      };
      if mesh.is_empty() {
        stats.uniform += 1;
      } else {
        stats.meshed += 1;
        stats.triangles += mesh.geometry.triangle_count();
      }
      events.push(MeshEvent::Ready(mesh));
    }

    stats.total_us = start.elapsed().as_micros() as u64;
    if stats.diff_count() > 0 {
      tracing::debug!(
        creates = stats.creates,
        removes = stats.removes,
        updates = stats.updates,
        meshed = stats.meshed,
        uniform = stats.uniform,
        triangles = stats.triangles,
        total_us = stats.total_us,
        "tick"
      );
    }
    Ok((events, stats))
  }
}

#[cfg(test)]
#[path = "process_test.rs"]
mod process_test;
