//! Regular pass: one Transvoxel cell per chunk cell.
//!
//! ```text
//! deck x-1          deck x
//! ┌──┬──┬──┐       ┌──┬──┬──┐
//! │  │  │  │       │  │  │  │   each cell stores the vertices on its three
//! ├──┼──┼──┤       ├──┼──┼──┤   edges at corner 7 (slot = axis); later cells
//! │  │  │  │  ──►  │  │▓▓│  │   at +X / +Y / +Z read them back through the
//! └──┴──┴──┘       └──┴──┴──┘   direction bits of the vertex code
//! ```
//!
//! Cells are walked x, then y, then z innermost, so only the current and the
//! previous X deck of the cache are live.

use glam::IVec3;

use super::tables::regular_table;
use super::vertex::{regular_edge_vertex, secondary_vertex};
use crate::constants::CORNER_OFFSETS;
use crate::density::{DensityBlock, DensityField};
use crate::types::TerrainMeshRenderData;

const EMPTY: u32 = u32::MAX;

/// Polygonize every cell of `block` into `mesh`.
///
/// Vertices within one cell of a face in `neighbor_mask` also get a
/// secondary position, shifted by `transition_width` of a cell.
#[tracing::instrument(skip_all, name = "regular")]
pub fn polygonize_regular<F: DensityField + ?Sized>(
  block: &DensityBlock,
  field: &F,
  neighbor_mask: u8,
  transition_width: f32,
  mesh: &mut TerrainMeshRenderData,
) {
  let table = regular_table();
  let n = block.chunk_size();
  let deck_len = (n * n) as usize;
  let mut decks = [vec![[EMPTY; 3]; deck_len], vec![[EMPTY; 3]; deck_len]];
  let world_size = block.world_size();
  let spacing = block.spacing();
  let mut cell_vertices = [0u32; 12];

  for x in 0..n {
    decks[(x & 1) as usize].fill([EMPTY; 3]);
    for y in 0..n {
      for z in 0..n {
        let cell = IVec3::new(x, y, z);
        let mut densities = [0.0f32; 8];
        let mut case = 0usize;
        for (i, offset) in CORNER_OFFSETS.iter().enumerate() {
          densities[i] = block.get_at(cell + *offset);
          if densities[i] < 0.0 {
            case |= 1 << i;
          }
        }
        if case == 0 || case == 255 {
          continue;
        }

        let (data, flip) = table.class(case);
        let present = (x > 0) as u8 | ((y > 0) as u8) << 1 | ((z > 0) as u8) << 2;
        let cell_index = (y * n + z) as usize;

        for (i, code) in table.vertices(case).iter().enumerate() {
          let dir = code.reuse_dir();
          if dir != 0 && dir & present == dir {
            let deck = ((x - (dir & 1) as i32) & 1) as usize;
            let ry = y - ((dir >> 1) & 1) as i32;
            let rz = z - ((dir >> 2) & 1) as i32;
            let cached = decks[deck][(ry * n + rz) as usize][code.slot()];
            if cached != EMPTY {
              cell_vertices[i] = cached;
              continue;
            }
          }

          let (a, b) = code.corners();
          let ia = cell + CORNER_OFFSETS[a as usize];
          let ib = cell + CORNER_OFFSETS[b as usize];
          let (position, normal) = regular_edge_vertex(block, field, ia, ib);
          let index = mesh.push_vertex(position, normal);
          if let Some((shifted, mask)) =
            secondary_vertex(position, normal, world_size, spacing, neighbor_mask, transition_width)
          {
            mesh.push_secondary(index, shifted, mask);
          }
          if code.is_owned() {
            decks[(x & 1) as usize][cell_index][code.slot()] = index;
          }
          cell_vertices[i] = index;
        }

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
}

#[cfg(test)]
#[path = "regular_test.rs"]
mod regular_test;
