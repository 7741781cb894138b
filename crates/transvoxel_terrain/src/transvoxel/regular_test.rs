use std::collections::HashSet;

use glam::Vec3;

use super::*;
use crate::pipeline::test_utils::{PlaneField, SphereField};

fn mesh_block<F: DensityField>(block: &DensityBlock, field: &F, mask: u8) -> TerrainMeshRenderData {
  let mut mesh = TerrainMeshRenderData::new();
  polygonize_regular(block, field, mask, 0.5, &mut mesh);
  mesh
}

fn position(mesh: &TerrainMeshRenderData, i: u32) -> Vec3 {
  Vec3::from_array(mesh.positions[i as usize])
}

// =============================================================================
// Empty input
// =============================================================================

#[test]
fn test_uniform_blocks_produce_nothing() {
  for value in [1.0f32, -1.0] {
    let block = DensityBlock::from_fn(16, Vec3::ZERO, 0, |_, _, _| value);
    let field = PlaneField::horizontal(-1000.0);
    let mesh = mesh_block(&block, &field, 0);
    assert_eq!(mesh.vertex_count(), 0);
    assert!(mesh.indices.is_empty());
  }
}

// =============================================================================
// Single corner
// =============================================================================

/// One solid corner: one triangle on its three edges, facing the air.
#[test]
fn test_single_corner_triangle() {
  let block = DensityBlock::from_fn(8, Vec3::ZERO, 0, |x, y, z| {
    if (x, y, z) == (0, 0, 0) {
      -1.0
    } else {
      1.0
    }
  });
  let field = PlaneField::horizontal(0.0);
  let mesh = mesh_block(&block, &field, 0);

  assert_eq!(mesh.vertex_count(), 3);
  assert_eq!(mesh.triangle_count(), 1);

  let [a, b, c] = [0, 1, 2].map(|k| position(&mesh, mesh.indices[k]));
  for p in [a, b, c] {
    assert!((p.x + p.y + p.z - 0.5).abs() < 1e-6, "vertex {:?}", p);
  }
  let normal = (b - a).cross(c - a);
  assert!(normal.dot(Vec3::ONE) > 0.0);
}

// =============================================================================
// Closed surfaces
// =============================================================================

/// An interior sphere is closed: every directed edge has its reverse.
#[test]
fn test_sphere_is_watertight() {
  let field = SphereField::new(Vec3::new(16.3, 16.2, 16.1), 6.3);
  let block = DensityBlock::sample(&field, IVec3::ZERO, 0, 32);
  let mesh = mesh_block(&block, &field, 0);
  assert!(mesh.triangle_count() > 100);

  let mut directed = HashSet::new();
  for tri in mesh.indices.chunks_exact(3) {
    for k in 0..3 {
      let edge = (tri[k], tri[(k + 1) % 3]);
      assert!(directed.insert(edge), "edge {:?} used twice in one direction", edge);
    }
  }
  for &(a, b) in &directed {
    assert!(directed.contains(&(b, a)), "edge ({}, {}) has no twin", a, b);
  }
}

/// Triangles wind outward and the enclosed volume matches the sphere.
#[test]
fn test_sphere_orientation_and_volume() {
  let center = Vec3::new(16.3, 16.2, 16.1);
  let radius = 6.3;
  let field = SphereField::new(center, radius);
  let block = DensityBlock::sample(&field, IVec3::ZERO, 0, 32);
  let mesh = mesh_block(&block, &field, 0);

  let mut volume = 0.0f32;
  for tri in mesh.indices.chunks_exact(3) {
    let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| position(&mesh, i) - center);
    volume += a.dot(b.cross(c)) / 6.0;
  }
  let expected = 4.0 / 3.0 * std::f32::consts::PI * radius * radius * radius;
  assert!(
    (volume - expected).abs() / expected < 0.1,
    "volume {} expected {}",
    volume,
    expected
  );

  for (p, n) in mesh.positions.iter().zip(&mesh.normals) {
    let outward = Vec3::from_array(*p) - center;
    assert!(Vec3::from_array(*n).dot(outward) > 0.0);
  }
}

/// No vertex is emitted twice for an edge inside the chunk.
#[test]
fn test_interior_vertices_are_shared() {
  let field = SphereField::new(Vec3::new(16.3, 16.2, 16.1), 6.3);
  let block = DensityBlock::sample(&field, IVec3::ZERO, 0, 32);
  let mesh = mesh_block(&block, &field, 0);

  let mut seen = HashSet::new();
  for p in &mesh.positions {
    let key = p.map(|c| (c * 1024.0).round() as i64);
    assert!(seen.insert(key), "duplicate vertex at {:?}", p);
  }
}

// =============================================================================
// Planes and secondary vertices
// =============================================================================

#[test]
fn test_plane_triangle_count() {
  let field = PlaneField::horizontal(10.5);
  let block = DensityBlock::sample(&field, IVec3::ZERO, 0, 32);
  let mesh = mesh_block(&block, &field, 0);
  assert_eq!(mesh.triangle_count(), 32 * 32 * 2);
  for p in &mesh.positions {
    assert!((p[1] - 10.5).abs() < 1e-5);
  }
  for n in &mesh.normals {
    assert!((Vec3::from_array(*n) - Vec3::Y).length() < 1e-4);
  }
}

/// Secondary vertices appear only near masked faces.
#[test]
fn test_secondary_vertices_follow_mask() {
  let field = PlaneField::horizontal(10.5);
  let block = DensityBlock::sample(&field, IVec3::ZERO, 1, 16);

  let unmasked = mesh_block(&block, &field, 0);
  assert!(unmasked.secondary.is_empty());

  let masked = mesh_block(&block, &field, 0b01);
  let near_face = masked.positions.iter().filter(|p| p[0] < block.spacing()).count();
  assert!(near_face > 0);
  assert_eq!(masked.secondary.len(), near_face);
  for s in &masked.secondary {
    assert_eq!(s.boundary_mask, 0b01);
    let primary = position(&masked, s.primary_index);
    assert!(primary.x < block.spacing());
    assert!(s.position[0] > primary.x);
  }
}

/// Coarse blocks use world-space spacing.
#[test]
fn test_coarse_block_positions_are_chunk_local() {
  let field = PlaneField::horizontal(37.0);
  let origin = IVec3::new(-64, 0, -64);
  let block = DensityBlock::sample(&field, origin, 2, 16);
  let mesh = mesh_block(&block, &field, 0);
  assert_eq!(mesh.triangle_count(), 16 * 16 * 2);
  let bounds = mesh.bounds();
  assert!((bounds.max[0] - 64.0).abs() < 1e-4);
  assert!((bounds.min[1] - 37.0).abs() < 1e-4);
}
