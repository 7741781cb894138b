use super::*;
use crate::constants::{opposite_face, ALL_FACES};
use crate::pipeline::test_utils::FnField;
use crate::transvoxel::regular::polygonize_regular;

const TOLERANCE: f32 = 1e-3;

/// A coarse LOD 1 chunk and a fine LOD 0 chunk sharing the plane at 64
/// along the face axis.
type BoxedField = FnField<Box<dyn Fn(Vec3) -> f32 + Send + Sync>>;

struct Seam {
  face: usize,
  coarse: DensityBlock,
  fine: DensityBlock,
  field: BoxedField,
}

impl Seam {
  fn new(face: usize) -> Self {
    let axis = face_axis(face);
    let (ua, va) = face_plane_axes(face);
    Self::with_field(
      face,
      FnField(Box::new(move |p: Vec3| p[ua] - (13.3 + 0.2 * p[va] + 0.05 * (p[axis] - 64.0)))),
    )
  }

  /// Sphere cut by the shared plane, inside the fine chunk's face.
  fn sphere(face: usize) -> Self {
    let axis = face_axis(face);
    let (ua, va) = face_plane_axes(face);
    let mut center = Vec3::ZERO;
    center[axis] = 64.3;
    center[ua] = 16.3;
    center[va] = 15.7;
    Self::with_field(face, FnField(Box::new(move |p: Vec3| p.distance(center) - 11.2)))
  }

  fn with_field(face: usize, field: BoxedField) -> Self {
    let axis = face_axis(face);
    let mut coarse_origin = IVec3::ZERO;
    let mut fine_origin = IVec3::ZERO;
    if face_is_positive(face) {
      fine_origin[axis] = 64;
    } else {
      coarse_origin[axis] = 64;
      fine_origin[axis] = 32;
    }
    let coarse = DensityBlock::sample(&field, coarse_origin, 1, 32);
    let fine = DensityBlock::sample(&field, fine_origin, 0, 32);
    Self {
      face,
      coarse,
      fine,
      field,
    }
  }

  fn transition_mesh(&self) -> TerrainMeshRenderData {
    let mut mesh = TerrainMeshRenderData::new();
    polygonize_transition(&self.coarse, &self.field, self.face, face_bit(self.face), 0.5, &mut mesh);
    mesh
  }

  fn fine_mesh(&self) -> TerrainMeshRenderData {
    let mut mesh = TerrainMeshRenderData::new();
    polygonize_regular(&self.fine, &self.field, 0, 0.5, &mut mesh);
    mesh
  }
}

fn world_positions(mesh: &TerrainMeshRenderData, origin: Vec3) -> Vec<Vec3> {
  mesh.positions.iter().map(|p| Vec3::from_array(*p) + origin).collect()
}

fn directed_edges(mesh: &TerrainMeshRenderData, world: &[Vec3]) -> Vec<(Vec3, Vec3)> {
  let mut edges = Vec::new();
  for tri in mesh.indices.chunks_exact(3) {
    for k in 0..3 {
      edges.push((world[tri[k] as usize], world[tri[(k + 1) % 3] as usize]));
    }
  }
  edges
}

fn close(a: Vec3, b: Vec3) -> bool {
  (a - b).length() < TOLERANCE
}

// =============================================================================
// Frames
// =============================================================================

#[test]
fn test_mirrored_faces() {
  let mirrored: Vec<bool> = (0..6).map(face_frame_mirrored).collect();
  assert_eq!(mirrored, vec![false, true, true, false, false, true]);
}

// =============================================================================
// Mask gating
// =============================================================================

#[test]
fn test_unmasked_face_produces_nothing() {
  let seam = Seam::new(1);
  for face in 0..6 {
    let mut mesh = TerrainMeshRenderData::new();
    let mask = ALL_FACES & !face_bit(face);
    polygonize_transition(&seam.coarse, &seam.field, face, mask, 0.5, &mut mesh);
    assert!(mesh.is_empty(), "face {}", face);
  }
}

#[test]
fn test_masked_face_produces_geometry() {
  for face in 0..6 {
    let seam = Seam::new(face);
    let mesh = seam.transition_mesh();
    assert!(!mesh.is_empty(), "face {}", face);
    assert!(!mesh.secondary.is_empty(), "face {}", face);
    for s in &mesh.secondary {
      assert!(s.boundary_mask & face_bit(face) != 0);
    }
  }
}

// =============================================================================
// Seam agreement
// =============================================================================

/// Every vertex the fine chunk places on the shared plane also exists in
/// the coarse chunk's transition mesh.
#[test]
fn test_full_res_vertices_match_fine_chunk() {
  for face in 0..6 {
    let seam = Seam::new(face);
    let axis = face_axis(face);
    let transition = world_positions(&seam.transition_mesh(), seam.coarse.origin());
    let fine = world_positions(&seam.fine_mesh(), seam.fine.origin());

    let on_plane: Vec<Vec3> = fine.iter().copied().filter(|p| (p[axis] - 64.0).abs() < 1e-5).collect();
    assert!(!on_plane.is_empty(), "face {}", face);
    for p in on_plane {
      assert!(
        transition.iter().any(|q| close(*q, p)),
        "face {}: fine vertex {:?} has no transition twin",
        face,
        p
      );
    }
  }
}

/// Seam vertices shade identically on both sides of a curved surface.
#[test]
fn test_full_res_normals_match_fine_chunk() {
  for face in 0..6 {
    let seam = Seam::sphere(face);
    let axis = face_axis(face);
    let transition_mesh = seam.transition_mesh();
    let fine_mesh = seam.fine_mesh();
    let transition = world_positions(&transition_mesh, seam.coarse.origin());
    let fine = world_positions(&fine_mesh, seam.fine.origin());

    let mut checked = 0;
    for (i, p) in fine.iter().enumerate() {
      if (p[axis] - 64.0).abs() > 1e-5 {
        continue;
      }
      let twin = transition
        .iter()
        .position(|q| close(*q, *p))
        .unwrap_or_else(|| panic!("face {}: fine vertex {:?} has no transition twin", face, p));
      let a = Vec3::from_array(fine_mesh.normals[i]);
      let b = Vec3::from_array(transition_mesh.normals[twin]);
      assert!((a - b).length() < 1e-5, "face {}: normals {:?} vs {:?} at {:?}", face, a, b, p);
      checked += 1;
    }
    assert!(checked > 8, "face {}: only {} seam vertices", face, checked);
  }
}

/// Seam edges run in opposite directions on the two sides.
#[test]
fn test_seam_winding_is_consistent() {
  for face in 0..6 {
    let seam = Seam::new(face);
    let axis = face_axis(face);
    let transition_mesh = seam.transition_mesh();
    let fine_mesh = seam.fine_mesh();
    let transition = world_positions(&transition_mesh, seam.coarse.origin());
    let fine = world_positions(&fine_mesh, seam.fine.origin());
    let transition_edges = directed_edges(&transition_mesh, &transition);

    let on_plane = |p: Vec3| (p[axis] - 64.0).abs() < 1e-5;
    let mut checked = 0;
    for (a, b) in directed_edges(&fine_mesh, &fine) {
      if !(on_plane(a) && on_plane(b)) {
        continue;
      }
      checked += 1;
      assert!(
        transition_edges.iter().any(|(c, d)| close(*c, b) && close(*d, a)),
        "face {}: seam edge {:?} -> {:?} not reversed on the coarse side",
        face,
        a,
        b
      );
    }
    assert!(checked > 0, "face {}", face);
  }
}

/// Low-res transition vertices share their secondary positions with the
/// coarse chunk's regular mesh.
#[test]
fn test_low_res_vertices_match_regular_mesh() {
  for face in [0, 3, 5] {
    let seam = Seam::new(face);
    let mask = face_bit(face);
    let transition = seam.transition_mesh();
    let mut regular = TerrainMeshRenderData::new();
    polygonize_regular(&seam.coarse, &seam.field, mask, 0.5, &mut regular);

    for s in &transition.secondary {
      let p = Vec3::from_array(s.position);
      assert!(
        regular.secondary.iter().any(|r| close(Vec3::from_array(r.position), p)),
        "face {}: secondary {:?} missing from regular mesh",
        face,
        p
      );
    }
  }
}

/// Opposite faces of the same block produce independent meshes.
#[test]
fn test_opposite_face_independent() {
  let seam = Seam::new(1);
  let face = opposite_face(seam.face);
  let mut mesh = TerrainMeshRenderData::new();
  polygonize_transition(&seam.coarse, &seam.field, face, face_bit(face), 0.5, &mut mesh);
  let near = seam.transition_mesh();
  for p in &mesh.positions {
    assert!(p[0].abs() < 1e-5);
  }
  for p in &near.positions {
    assert!((p[0] - 64.0).abs() < 1e-5);
  }
}
