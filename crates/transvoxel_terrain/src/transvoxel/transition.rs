//! Transition pass: stitch a coarse chunk face to its finer neighbors.
//!
//! ```text
//!  coarse chunk face, one transition cell per face cell (u, v)
//!
//!   6 ─── 7 ─── 8        even samples (0, 2, 6, 8) come from the block,
//!   │     │     │        odd samples are evaluated from the field at the
//!   3 ─── 4 ─── 5        half-step positions the finer side samples at
//!   │     │     │
//!   0 ─── 1 ─── 2  ──► u  low-res corners 9..12 mirror 0, 2, 6, 8 and are
//!         v ▲             pushed inward through secondary vertices
//! ```
//!
//! The cell frame uses the face's two in-plane axes in increasing order
//! as `u` and `v`, with `w` pointing into the chunk. On the +X, -Y and +Z
//! faces that frame is left-handed and the winding is mirrored.

use glam::{IVec3, Vec3};

use super::tables::{transition_table, TRANSITION_LOW_TO_FULL};
use super::vertex::{edge_normal, locate_crossing, regular_edge_vertex, secondary_vertex};
use crate::constants::{face_axis, face_bit, face_is_positive, face_plane_axes, FACE_DIRECTIONS};
use crate::density::{DensityBlock, DensityField};
use crate::types::TerrainMeshRenderData;

const EMPTY: u32 = u32::MAX;

/// Sample index of a 3x3 grid point in the coarse block.
///
/// Only valid for even `(su, sv)`.
#[inline]
fn block_index(face: usize, n: i32, u: i32, v: i32, su: i32, sv: i32) -> IVec3 {
  let (ua, va) = face_plane_axes(face);
  let mut p = IVec3::ZERO;
  p[face_axis(face)] = if face_is_positive(face) { n } else { 0 };
  p[ua] = u + su / 2;
  p[va] = v + sv / 2;
  p
}

/// Chunk-local position of a 3x3 grid point.
#[inline]
fn grid_position(face: usize, n: i32, spacing: f32, u: i32, v: i32, su: i32, sv: i32) -> Vec3 {
  let (ua, va) = face_plane_axes(face);
  let half = spacing * 0.5;
  let mut p = Vec3::ZERO;
  p[face_axis(face)] = if face_is_positive(face) { n as f32 * spacing } else { 0.0 };
  p[ua] = (2 * u + su) as f32 * half;
  p[va] = (2 * v + sv) as f32 * half;
  p
}

/// True when the face's `(u, v, w)` frame has negative determinant.
#[inline]
pub fn face_frame_mirrored(face: usize) -> bool {
  let (ua, va) = face_plane_axes(face);
  let mut u = Vec3::ZERO;
  let mut v = Vec3::ZERO;
  u[ua] = 1.0;
  v[va] = 1.0;
  let w = -FACE_DIRECTIONS[face].as_vec3();
  u.cross(v).dot(w) < 0.0
}

/// Polygonize the transition cells of one face into `mesh`.
///
/// `neighbor_mask` is the chunk's full mask; low-res vertices get secondary
/// positions for every masked face they are near.
#[tracing::instrument(skip_all, name = "transition", fields(face = face))]
pub fn polygonize_transition<F: DensityField + ?Sized>(
  block: &DensityBlock,
  field: &F,
  face: usize,
  neighbor_mask: u8,
  transition_width: f32,
  mesh: &mut TerrainMeshRenderData,
) {
  if neighbor_mask & face_bit(face) == 0 {
    return;
  }

  let table = transition_table();
  let n = block.chunk_size();
  let spacing = block.spacing();
  let world_size = block.world_size();
  let origin = block.origin();
  let full_res_rounds = block.lod().saturating_sub(1);
  let mirrored = face_frame_mirrored(face);

  let mut rows = [vec![[EMPTY; 6]; n as usize], vec![[EMPTY; 6]; n as usize]];
  let mut cell_vertices = [0u32; 12];

  for v in 0..n {
    rows[(v & 1) as usize].fill([EMPTY; 6]);
    for u in 0..n {
      let mut values = [0.0f32; 9];
      let mut case = 0usize;
      for (k, value) in values.iter_mut().enumerate() {
        let (su, sv) = ((k % 3) as i32, (k / 3) as i32);
        *value = if su % 2 == 0 && sv % 2 == 0 {
          block.get_at(block_index(face, n, u, v, su, sv))
        } else {
          field.value(origin + grid_position(face, n, spacing, u, v, su, sv))
        };
        if *value < 0.0 {
          case |= 1 << k;
        }
      }
      if case == 0 || case == 511 {
        continue;
      }

      let (data, class_flip) = table.class(case);
      let present = (u > 0) as u8 | ((v > 0) as u8) << 1;

      for (i, code) in table.vertices(case).iter().enumerate() {
        let dir = code.reuse_dir();
        if dir != 0 && dir & present == dir {
          let cached = if dir & 1 != 0 {
            rows[(v & 1) as usize][(u - 1) as usize][code.slot()]
          } else {
            rows[((v - 1) & 1) as usize][u as usize][code.slot()]
          };
          if cached != EMPTY {
            cell_vertices[i] = cached;
            continue;
          }
        }

        let (a, b) = code.corners();
        let index = if a < 9 {
          // Full-resolution edge on the shared face.
          let (sa, sb) = (a as i32, b as i32);
          let pa = origin + grid_position(face, n, spacing, u, v, sa % 3, sa / 3);
          let pb = origin + grid_position(face, n, spacing, u, v, sb % 3, sb / 3);
          let (world, t) = locate_crossing(field, pa, values[a as usize], pb, values[b as usize], full_res_rounds);
          let normal = edge_normal(field, pa, pb, t, spacing * 0.5);
          mesh.push_vertex(world - origin, normal)
        } else {
          // Low-resolution edge: same vertex as the regular mesh, pushed inward.
          let la = TRANSITION_LOW_TO_FULL[(a - 9) as usize] as i32;
          let lb = TRANSITION_LOW_TO_FULL[(b - 9) as usize] as i32;
          let ia = block_index(face, n, u, v, la % 3, la / 3);
          let ib = block_index(face, n, u, v, lb % 3, lb / 3);
          let (position, normal) = regular_edge_vertex(block, field, ia, ib);
          let index = mesh.push_vertex(position, normal);
          if let Some((shifted, mask)) =
            secondary_vertex(position, normal, world_size, spacing, neighbor_mask, transition_width)
          {
            mesh.push_secondary(index, shifted, mask);
          }
          index
        };
        if code.is_owned() {
          rows[(v & 1) as usize][u as usize][code.slot()] = index;
        }
        cell_vertices[i] = index;
      }

      let flip = class_flip != mirrored;
      for tri in &data.triangles {
        let [a, b, c] = tri.map(|i| cell_vertices[i as usize]);
        if flip {
          mesh.push_triangle(a, c, b);
        } else {
          mesh.push_triangle(a, b, c);
        }
      }
    }
  }
}

#[cfg(test)]
#[path = "transition_test.rs"]
mod transition_test;
