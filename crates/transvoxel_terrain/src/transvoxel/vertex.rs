//! Edge vertex placement shared by the regular and transition passes.
//!
//! ```text
//!   p0 (d0 < 0)                         p1 (d1 >= 0)
//!    ●───────────────┬──────────────────●
//!                    mid: sample field, keep the half with the sign change
//!    ●───────┬───────●
//!            ...     after `rounds` halvings, interpolate linearly
//! ```
//!
//! Endpoints are always given lower coordinate first, so two chunks meshing
//! the same world edge evaluate identical midpoints and land on
//! bit-identical positions.

use glam::{IVec3, Vec3};

use crate::density::{DensityBlock, DensityField};

/// Refine a sign change between `p0` and `p1` by `rounds` bisections, then
/// interpolate linearly between the remaining endpoints.
///
/// A density of exactly zero counts as outside. Returns the world position
/// and its fraction along the original edge.
pub fn locate_crossing<F: DensityField + ?Sized>(
  field: &F,
  p0: Vec3,
  d0: f32,
  p1: Vec3,
  d1: f32,
  rounds: u32,
) -> (Vec3, f32) {
  let start = p0;
  let span = p1 - p0;
  let (mut a, mut da, mut b, mut db) = (p0, d0, p1, d1);
  for _ in 0..rounds {
    let mid = (a + b) * 0.5;
    let dm = field.value(mid);
    if (dm < 0.0) == (da < 0.0) {
      a = mid;
      da = dm;
    } else {
      b = mid;
      db = dm;
    }
  }

  let denom = da - db;
  let t = if denom.abs() > f32::EPSILON { da / denom } else { 0.5 };
  let position = a + (b - a) * t.clamp(0.0, 1.0);
  let length_sq = span.length_squared();
  let fraction = if length_sq > 0.0 {
    ((position - start).dot(span) / length_sq).clamp(0.0, 1.0)
  } else {
    0.0
  };
  (position, fraction)
}

/// Vertex on the block edge `ia -> ib` (sample indices, `ia` lower).
///
/// Returns a chunk-local position and a unit normal blended from the
/// corner gradients.
pub fn regular_edge_vertex<F: DensityField + ?Sized>(
  block: &DensityBlock,
  field: &F,
  ia: IVec3,
  ib: IVec3,
) -> (Vec3, Vec3) {
  let (world, t) = locate_crossing(
    field,
    block.world_position(ia),
    block.get_at(ia),
    block.world_position(ib),
    block.get_at(ib),
    block.lod(),
  );
  let normal = block.gradient(ia).lerp(block.gradient(ib), t).normalize_or(Vec3::Y);
  (world - block.origin(), normal)
}

/// Normal for a crossing at fraction `t` of the edge `p0 -> p1`: central
/// differences at both endpoints with `step`, blended by `t`.
///
/// With `step` equal to a block's spacing and endpoints on its sample grid
/// this matches [`DensityBlock::gradient`] exactly, so a transition face
/// evaluated at the finer spacing shades like the finer chunk.
pub fn edge_normal<F: DensityField + ?Sized>(field: &F, p0: Vec3, p1: Vec3, t: f32, step: f32) -> Vec3 {
  field
    .gradient(p0, step)
    .lerp(field.gradient(p1, step), t)
    .normalize_or(Vec3::Y)
}

/// Boundary-adjusted position of a vertex near transition faces.
///
/// `position` is chunk-local, `world_size` the chunk edge length and
/// `spacing` its cell size. Vertices within one cell of a face in `mask`
/// move inward by up to `width_fraction` of a cell, projected onto the
/// tangent plane of `normal`. Returns `None` when no masked face is near.
pub fn secondary_vertex(
  position: Vec3,
  normal: Vec3,
  world_size: f32,
  spacing: f32,
  mask: u8,
  width_fraction: f32,
) -> Option<(Vec3, u8)> {
  let width = width_fraction * spacing;
  let mut near = 0u8;
  let mut delta = Vec3::ZERO;
  for axis in 0..3 {
    let p = position[axis];
    let low = 1u8 << (axis * 2);
    let high = 1u8 << (axis * 2 + 1);
    if p < spacing {
      near |= low;
      if mask & low != 0 {
        delta[axis] = (1.0 - p / spacing) * width;
      }
    } else if p > world_size - spacing {
      near |= high;
      if mask & high != 0 {
        delta[axis] = -(1.0 - (world_size - p) / spacing) * width;
      }
    }
  }

  let relevant = near & mask;
  if relevant == 0 {
    return None;
  }
  let shifted = position + (delta - normal * normal.dot(delta));
  Some((shifted, relevant))
}

#[cfg(test)]
#[path = "vertex_test.rs"]
mod vertex_test;
