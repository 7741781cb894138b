//! Chunk update executor: octree diffing and neighbor masks.
//!
//! Each tick walks the octree once from the root:
//!
//! ```text
//!   can_render(node)?
//!     yes ─► active?  no ─► merge children (Remove each active descendant)
//!     │                     activate, emit Create
//!     no  ─► active? yes ─► deactivate, emit Remove
//!            leaf?   yes ─► split
//!            recurse into the 8 children
//! ```
//!
//! A node renders when it is a finest-level node or when the Chebyshev
//! distance from the target to its center exceeds
//! `lod_distance_factor * (chunk_size << depth)`.
//!
//! After the walk, `build_transition_masks` assigns each created chunk a
//! mask of the faces that border finer chunks, and re-checks every active
//! chunk touching a created chunk. A changed mask produces an `Update`
//! diff. The finer side of a mixed-LOD face never carries the bit.

use std::collections::{HashMap, HashSet};

use glam::{IVec3, Vec3};

use super::types::{ChunkUpdate, UpdateKind};
use crate::config::TerrainConfig;
use crate::constants::{face_bit, face_plane_axes, FACE_COUNT, FACE_DIRECTIONS, ROOT_CODE};
use crate::error::OctreeError;
use crate::octree::{child_code, LinearOctree, OctreeNode};

/// Owns the octree, the active chunk set and the per-chunk masks.
///
/// Only the thread calling [`update`](Self::update) touches this state.
#[derive(Clone, Debug)]
pub struct ChunkUpdateExecutor {
  config: TerrainConfig,
  octree: LinearOctree,
  active: HashSet<u64>,
  masks: HashMap<IVec3, u8>,
}

impl ChunkUpdateExecutor {
  pub fn new(config: TerrainConfig) -> Self {
    let octree = LinearOctree::new(&config);
    Self {
      config,
      octree,
      active: HashSet::new(),
      masks: HashMap::new(),
    }
  }

  #[inline]
  pub fn config(&self) -> &TerrainConfig {
    &self.config
  }

  #[inline]
  pub fn octree(&self) -> &LinearOctree {
    &self.octree
  }

  /// Location codes of the renderable nodes.
  #[inline]
  pub fn active(&self) -> &HashSet<u64> {
    &self.active
  }

  /// Current neighbor mask per active chunk center.
  #[inline]
  pub fn masks(&self) -> &HashMap<IVec3, u8> {
    &self.masks
  }

  pub fn mask_at(&self, position: IVec3) -> Option<u8> {
    self.masks.get(&position).copied()
  }

  /// Active nodes, in no particular order.
  pub fn active_nodes(&self) -> impl Iterator<Item = &OctreeNode> + '_ {
    self.active.iter().filter_map(|code| self.octree.get(*code))
  }

  /// True if `node` should render for `target`.
  #[inline]
  pub fn can_render(&self, node: &OctreeNode, target: Vec3) -> bool {
    node.depth == 0 || node.chebyshev_distance(target) > self.config.lod_threshold(node.depth)
  }

  /// Diff the partition against `target`.
  ///
  /// Diffs come back sorted coarse to fine. An `Err` means the octree and
  /// the active set have diverged and the executor must be rebuilt.
  #[tracing::instrument(skip_all, name = "chunk_update")]
  pub fn update(&mut self, target: Vec3) -> Result<Vec<ChunkUpdate>, OctreeError> {
    let mut diffs = Vec::new();
    {
      let _span = tracing::info_span!("octree_diff").entered();
      self.update_node(ROOT_CODE, target, &mut diffs)?;
    }
    self.build_transition_masks(&mut diffs);
    diffs.sort_by(|a, b| b.lod.cmp(&a.lod));

    tracing::trace!(
      diffs = diffs.len(),
      active = self.active.len(),
      nodes = self.octree.len(),
      "chunk update"
    );
    Ok(diffs)
  }

  fn update_node(&mut self, code: u64, target: Vec3, diffs: &mut Vec<ChunkUpdate>) -> Result<(), OctreeError> {
    let node = *self.octree.get(code).ok_or(OctreeError::NodeNotFound(code))?;

    if self.can_render(&node, target) {
      if !self.active.contains(&code) {
        if self.octree.has_children(code) {
          self.merge_children(code, diffs)?;
        }
        self.active.insert(code);
        diffs.push(ChunkUpdate::create(node.position, node.depth));
      }
      return Ok(());
    }

    if self.active.remove(&code) {
      diffs.push(ChunkUpdate::remove(node.position, node.depth));
    }
    if !self.octree.has_children(code) {
      self.octree.split_node(code)?;
    }
    for octant in 0..8 {
      self.update_node(child_code(code, octant), target, diffs)?;
    }
    Ok(())
  }

  /// Remove every descendant of `code`, emitting `Remove` for active ones.
  fn merge_children(&mut self, code: u64, diffs: &mut Vec<ChunkUpdate>) -> Result<(), OctreeError> {
    for octant in 0..8 {
      let child = child_code(code, octant);
      if self.octree.has_children(child) {
        self.merge_children(child, diffs)?;
      }
      let node = self
        .octree
        .remove_node(child)
        .ok_or(OctreeError::MissingChild { parent: code, child })?;
      if self.active.remove(&child) {
        diffs.push(ChunkUpdate::remove(node.position, node.depth));
      }
    }
    Ok(())
  }

  // ===========================================================================
  // Neighbor masks
  // ===========================================================================

  fn build_transition_masks(&mut self, diffs: &mut Vec<ChunkUpdate>) {
    let _span = tracing::info_span!("build_transition_masks").entered();

    for diff in diffs.iter().filter(|d| d.kind == UpdateKind::Remove) {
      self.masks.remove(&diff.position);
    }

    let created: HashSet<IVec3> = diffs
      .iter()
      .filter(|d| d.kind == UpdateKind::Create)
      .map(|d| d.position)
      .collect();

    let mut touched: Vec<u64> = Vec::new();
    let mut seen: HashSet<u64> = HashSet::new();
    for diff in diffs.iter_mut().filter(|d| d.kind == UpdateKind::Create) {
      let node = *self.octree.get_node_at(diff.position.as_vec3());
      let mask = self.compute_mask(&node);
      diff.neighbors_mask = mask;
      self.masks.insert(diff.position, mask);

      for neighbor in self.face_neighbors(&node) {
        if !created.contains(&neighbor.position)
          && self.active.contains(&neighbor.location_code)
          && seen.insert(neighbor.location_code)
        {
          touched.push(neighbor.location_code);
        }
      }
    }

    let mut updates = 0usize;
    for code in touched {
      let Some(node) = self.octree.get(code).copied() else {
        continue;
      };
      let mask = self.compute_mask(&node);
      if self.masks.insert(node.position, mask) != Some(mask) {
        diffs.push(ChunkUpdate::update(node.position, node.depth, mask));
        updates += 1;
      }
    }
    if updates > 0 {
      tracing::trace!(count = updates, "neighbor mask updates");
    }
  }

  /// Faces of `node` whose neighbor is finer.
  pub fn compute_mask(&self, node: &OctreeNode) -> u8 {
    let root = self.octree.root();
    let mut mask = 0;
    for face in 0..FACE_COUNT {
      let probe = node.position + FACE_DIRECTIONS[face] * (node.extents + self.config.probe_margin);
      let probe = probe.as_vec3();
      if !root.contains(probe) {
        continue;
      }
      if self.octree.get_node_at(probe).depth < node.depth {
        mask |= face_bit(face);
      }
    }
    mask
  }

  /// Distinct leaves sharing a face with `node`.
  ///
  /// Probes the four face quadrants, which reaches every neighbor as long
  /// as adjacent LODs differ by at most one.
  pub fn face_neighbors(&self, node: &OctreeNode) -> Vec<OctreeNode> {
    let root = self.octree.root();
    let quarter = node.extents / 2;
    let mut neighbors: Vec<OctreeNode> = Vec::new();
    for face in 0..FACE_COUNT {
      let (ua, va) = face_plane_axes(face);
      let base = node.position + FACE_DIRECTIONS[face] * (node.extents + self.config.probe_margin);
      for (su, sv) in [(-1, -1), (1, -1), (-1, 1), (1, 1)] {
        let mut probe = base;
        probe[ua] += su * quarter;
        probe[va] += sv * quarter;
        let probe = probe.as_vec3();
        if !root.contains(probe) {
          continue;
        }
        let neighbor = *self.octree.get_node_at(probe);
        if !neighbors.iter().any(|n| n.location_code == neighbor.location_code) {
          neighbors.push(neighbor);
        }
      }
    }
    neighbors
  }
}

#[cfg(test)]
#[path = "chunk_update_test.rs"]
mod chunk_update_test;
