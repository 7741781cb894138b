//! Asynchronous pipeline: one pool task per chunk.
//!
//! ```text
//! update(target) ── diff ──► Remove  ─► in-flight entry dropped, Teardown
//!                        │             queued only if the chunk was delivered
//!                        └─► Create/Update ─► spawn(density ─► mesh)
//!                                             in_flight[key] = task id
//! poll() ──► Teardowns + results whose task id still matches in_flight[key]
//! ```
//!
//! A chunk re-issued while its task runs gets a new task id, so the older
//! result is recognised as stale and dropped when it arrives.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use glam::Vec3;

use super::chunk_update::ChunkUpdateExecutor;
use super::density_update::sample_chunk;
use super::mesh_update::{mesh_chunk, MeshUpdateExecutor};
use super::types::{ChunkKey, ChunkMesh, ChunkUpdate, MeshEvent};
use crate::config::TerrainConfig;
use crate::density::DensityField;
use crate::error::OctreeError;
use crate::threading::{TaskExecutor, TaskId};

/// Non-blocking terrain driver.
pub struct AsyncTerrain<F: ?Sized> {
  chunks: ChunkUpdateExecutor,
  field: Arc<F>,
  executor: TaskExecutor<ChunkMesh>,
  in_flight: HashMap<ChunkKey, TaskId>,
  /// Chunks the caller has received a `Ready` for and not torn down.
  delivered: HashSet<ChunkKey>,
  teardowns: Vec<MeshEvent>,
  discarded: usize,
}

impl<F: DensityField + ?Sized + 'static> AsyncTerrain<F> {
  pub fn new(config: TerrainConfig, field: Arc<F>) -> Self {
    Self {
      chunks: ChunkUpdateExecutor::new(config),
      field,
      executor: TaskExecutor::new(),
      in_flight: HashMap::new(),
      delivered: HashSet::new(),
      teardowns: Vec::new(),
      discarded: 0,
    }
  }

  #[inline]
  pub fn chunks(&self) -> &ChunkUpdateExecutor {
    &self.chunks
  }

  /// Chunks with a task that has not been polled yet.
  pub fn in_flight(&self) -> usize {
    self.in_flight.len()
  }

  /// Chunks currently on the caller's side.
  pub fn delivered(&self) -> usize {
    self.delivered.len()
  }

  /// Stale results thrown away so far.
  pub fn discarded(&self) -> usize {
    self.discarded
  }

  /// Diff the partition and queue work. Returns the number of tasks spawned.
  #[tracing::instrument(skip_all, name = "async_update")]
  pub fn update(&mut self, target: Vec3) -> Result<usize, OctreeError> {
    let diffs = self.chunks.update(target)?;
    let mut spawned = 0;
    for diff in diffs {
      if diff.needs_mesh() {
        let id = self.spawn(diff);
        self.in_flight.insert(diff.key(), id);
        spawned += 1;
      } else {
        self.in_flight.remove(&diff.key());
        if self.delivered.remove(&diff.key()) {
          self.teardowns.push(MeshUpdateExecutor::<F>::teardown(&diff));
        }
      }
    }
    if spawned > 0 {
      tracing::debug!(spawned, pending = self.executor.pending_count(), "queued chunk tasks");
    }
    Ok(spawned)
  }

  fn spawn(&mut self, update: ChunkUpdate) -> TaskId {
    let field = Arc::clone(&self.field);
    let config = *self.chunks.config();
    self.executor.spawn(move || {
      let density = sample_chunk(&*field, &update, config.chunk_size);
      mesh_chunk(&*field, density, config.chunk_size, config.transition_cell_width)
    })
  }

  /// Queued teardowns and every current result that has finished.
  pub fn poll(&mut self) -> Vec<MeshEvent> {
    let mut events = std::mem::take(&mut self.teardowns);
    for (id, mesh) in self.executor.try_drain() {
      self.accept(id, mesh, &mut events);
    }
    events
  }

  /// Block until no task is outstanding, then return everything `poll`
  /// would have.
  pub fn flush(&mut self) -> Vec<MeshEvent> {
    let mut events = std::mem::take(&mut self.teardowns);
    while let Some((id, mesh)) = self.executor.wait() {
      self.accept(id, mesh, &mut events);
    }
    events
  }

  fn accept(&mut self, id: TaskId, mesh: ChunkMesh, events: &mut Vec<MeshEvent>) {
    if self.in_flight.get(&mesh.key) != Some(&id) {
      self.discarded += 1;
      tracing::trace!(position = ?mesh.key.position, lod = mesh.key.lod, "discarding stale chunk");
      return;
    }
    self.in_flight.remove(&mesh.key);
    self.delivered.insert(mesh.key);
    events.push(MeshEvent::Ready(mesh));
  }
}

#[cfg(test)]
#[path = "async_process_test.rs"]
mod async_process_test;
