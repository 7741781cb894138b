//! Mesh data handed to the external renderer.

use glam::Vec3;

use crate::constants::FACE_COUNT;

/// Axis-aligned bounding box.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MinMaxAABB {
  pub min: [f32; 3],
  pub max: [f32; 3],
}

impl MinMaxAABB {
  /// Create AABB with inverted extents (ready for encapsulation).
  pub fn empty() -> Self {
    Self {
      min: [f32::INFINITY; 3],
      max: [f32::NEG_INFINITY; 3],
    }
  }

  pub fn new(min: [f32; 3], max: [f32; 3]) -> Self {
    Self { min, max }
  }

  /// Expand AABB to include a point.
  #[inline]
  pub fn encapsulate(&mut self, point: [f32; 3]) {
    for i in 0..3 {
      self.min[i] = self.min[i].min(point[i]);
      self.max[i] = self.max[i].max(point[i]);
    }
  }

  /// Check if AABB is valid (min <= max on all axes).
  pub fn is_valid(&self) -> bool {
    self.min[0] <= self.max[0] && self.min[1] <= self.max[1] && self.min[2] <= self.max[2]
  }
}

impl Default for MinMaxAABB {
  fn default() -> Self {
    Self::empty()
  }
}

/// Boundary-adjusted copy of a primary vertex.
///
/// Used in place of `positions[primary_index]` when any face in
/// `boundary_mask` has transition geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SecondaryVertex {
  pub position: [f32; 3],
  /// Faces (bit `1 << face`) this vertex was adjusted for.
  pub boundary_mask: u8,
  pub primary_index: u32,
}

/// One triangle mesh: chunk-local positions, unit normals, CCW triangles.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TerrainMeshRenderData {
  pub positions: Vec<[f32; 3]>,
  pub normals: Vec<[f32; 3]>,
  pub indices: Vec<u32>,
  pub secondary: Vec<SecondaryVertex>,
}

impl TerrainMeshRenderData {
  pub fn new() -> Self {
    Self::default()
  }

  /// Append a vertex and return its index.
  #[inline]
  pub fn push_vertex(&mut self, position: Vec3, normal: Vec3) -> u32 {
    let index = self.positions.len() as u32;
    self.positions.push(position.to_array());
    self.normals.push(normal.to_array());
    index
  }

  #[inline]
  pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
    self.indices.extend_from_slice(&[a, b, c]);
  }

  #[inline]
  pub fn push_secondary(&mut self, primary_index: u32, position: Vec3, boundary_mask: u8) {
    self.secondary.push(SecondaryVertex {
      position: position.to_array(),
      boundary_mask,
      primary_index,
    });
  }

  /// Clear all buffers, preserving capacity.
  pub fn clear(&mut self) {
    self.positions.clear();
    self.normals.clear();
    self.indices.clear();
    self.secondary.clear();
  }

  /// Returns true if no geometry was generated.
  pub fn is_empty(&self) -> bool {
    self.indices.is_empty()
  }

  pub fn vertex_count(&self) -> usize {
    self.positions.len()
  }

  /// Number of triangles in the mesh.
  pub fn triangle_count(&self) -> usize {
    self.indices.len() / 3
  }

  pub fn bounds(&self) -> MinMaxAABB {
    let mut bounds = MinMaxAABB::empty();
    for p in &self.positions {
      bounds.encapsulate(*p);
    }
    bounds
  }

  /// Positions with secondary vertices applied for the faces in `mask`.
  pub fn resolved_positions(&self, mask: u8) -> Vec<[f32; 3]> {
    let mut positions = self.positions.clone();
    for secondary in &self.secondary {
      if secondary.boundary_mask & mask != 0 {
        positions[secondary.primary_index as usize] = secondary.position;
      }
    }
    positions
  }
}

/// Regular mesh plus one transition mesh per face (`-X, +X, -Y, +Y, -Z, +Z`).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChunkGeometry {
  pub main: TerrainMeshRenderData,
  pub transitions: [TerrainMeshRenderData; FACE_COUNT],
}

impl ChunkGeometry {
  pub fn is_empty(&self) -> bool {
    self.main.is_empty() && self.transitions.iter().all(TerrainMeshRenderData::is_empty)
  }

  pub fn triangle_count(&self) -> usize {
    self.main.triangle_count()
      + self
        .transitions
        .iter()
        .map(TerrainMeshRenderData::triangle_count)
        .sum::<usize>()
  }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
