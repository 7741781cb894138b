//! Transvoxel polygonizer.
//!
//! Converts one chunk's [`DensityBlock`] into a [`ChunkGeometry`]: the regular
//! mesh over every cell, plus one transition mesh for each face whose bit is
//! set in the chunk's neighbor mask (the faces bordering finer chunks).
//!
//! ```text
//!   DensityBlock ──► regular pass ──────────────► main
//!        │                │ secondary vertices near masked faces
//!        └────────► transition pass (per masked face) ──► transitions[face]
//! ```
//!
//! - [`tables`]: case tables derived at first use
//! - [`vertex`]: bisection refinement and secondary vertex placement
//! - [`regular`]: regular cell pass with a two-deck vertex cache
//! - [`transition`]: transition cell pass with a two-row vertex cache

pub mod regular;
pub mod tables;
pub mod transition;
pub mod vertex;

pub use regular::polygonize_regular;
pub use tables::{regular_table, transition_table, CaseTable, CellData, VertexCode};
pub use transition::polygonize_transition;

use crate::constants::{face_bit, FACE_COUNT};
use crate::density::{DensityBlock, DensityField};
use crate::types::ChunkGeometry;

/// Polygonize a chunk.
///
/// `field` is only evaluated for bisection on coarse chunks and for the
/// half-step transition samples; uniform blocks still walk every cell, so
/// callers skip them up front with [`DensityBlock::is_uniform`].
#[tracing::instrument(skip_all, name = "polygonize", fields(lod = block.lod(), mask = neighbor_mask))]
pub fn polygonize<F: DensityField + ?Sized>(
  block: &DensityBlock,
  field: &F,
  neighbor_mask: u8,
  transition_width: f32,
) -> ChunkGeometry {
  let mut geometry = ChunkGeometry::default();
  polygonize_regular(block, field, neighbor_mask, transition_width, &mut geometry.main);
  for face in 0..FACE_COUNT {
    if neighbor_mask & face_bit(face) != 0 {
      polygonize_transition(
        block,
        field,
        face,
        neighbor_mask,
        transition_width,
        &mut geometry.transitions[face],
      );
    }
  }
  geometry
}
