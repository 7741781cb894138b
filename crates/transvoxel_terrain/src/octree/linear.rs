//! LinearOctree - hash-mapped octree keyed by location code.
//!
//! No parent/child references are stored; a node's children exist iff
//! `child_code(code, 0)` is present in the map. Nodes are always split into
//! all 8 children at once and children are removed together, so checking the
//! first child is sufficient.

use std::collections::HashMap;

use glam::Vec3;
use smallvec::SmallVec;

use super::node::{child_code, octant_toward, OctreeNode};
use crate::config::TerrainConfig;
use crate::constants::ROOT_CODE;
use crate::error::OctreeError;

/// Sparse octree stored as `location code -> node`.
#[derive(Clone, Debug)]
pub struct LinearOctree {
  nodes: HashMap<u64, OctreeNode>,
}

impl LinearOctree {
  /// Create an octree holding only the root node covering the whole world.
  pub fn new(config: &TerrainConfig) -> Self {
    let root = OctreeNode::root(config.max_depth(), config.world_half_extent());
    let mut nodes = HashMap::new();
    nodes.insert(ROOT_CODE, root);
    Self { nodes }
  }

  #[inline]
  pub fn root(&self) -> &OctreeNode {
    &self.nodes[&ROOT_CODE]
  }

  #[inline]
  pub fn get(&self, code: u64) -> Option<&OctreeNode> {
    self.nodes.get(&code)
  }

  #[inline]
  pub fn contains(&self, code: u64) -> bool {
    self.nodes.contains_key(&code)
  }

  #[inline]
  pub fn has_children(&self, code: u64) -> bool {
    self.nodes.contains_key(&child_code(code, 0))
  }

  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = &OctreeNode> {
    self.nodes.values()
  }

  /// Nodes without children.
  pub fn leaves(&self) -> impl Iterator<Item = &OctreeNode> + '_ {
    self
      .nodes
      .values()
      .filter(move |node| !self.has_children(node.location_code))
  }

  /// Leaf containing `point`, descending from the root by center comparison.
  ///
  /// Points outside the world clamp to the nearest boundary leaf.
  pub fn get_node_at(&self, point: Vec3) -> &OctreeNode {
    let mut node = self.root();
    while let Some(child) = self
      .nodes
      .get(&child_code(node.location_code, octant_toward(node.position, point)))
    {
      node = child;
    }
    node
  }

  /// Split a leaf into its 8 children.
  ///
  /// Rejected if the node is unknown, already split, or at depth 0.
  pub fn split_node(&mut self, code: u64) -> Result<SmallVec<[OctreeNode; 8]>, OctreeError> {
    let node = *self.nodes.get(&code).ok_or(OctreeError::NodeNotFound(code))?;
    if self.has_children(code) {
      return Err(OctreeError::AlreadySplit(code));
    }
    if node.depth == 0 {
      return Err(OctreeError::SplitAtFinestDepth(code));
    }

    let children: SmallVec<[OctreeNode; 8]> = (0..8u8).filter_map(|i| node.child(i)).collect();
    for child in &children {
      self.nodes.insert(child.location_code, *child);
    }
    Ok(children)
  }

  /// Remove a node. Returns the removed node, or None if it was absent.
  ///
  /// The root is never removed.
  pub fn remove_node(&mut self, code: u64) -> Option<OctreeNode> {
    if code == ROOT_CODE {
      return None;
    }
    self.nodes.remove(&code)
  }
}

#[cfg(test)]
#[path = "linear_test.rs"]
mod linear_test;
