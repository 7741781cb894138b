//! Case tables for regular and transition cells.
//!
//! Each table maps a corner sign pattern (case code, bit set = corner inside)
//! to:
//!
//! - a **cell class** (`cell_class[case]`): index into `cell_data`, with
//!   [`CLASS_FLIP`] set when the case is the inverse of its class and
//!   triangles must be emitted with reversed winding
//! - **cell data** (`cell_data[class]`): vertex count and triangles as
//!   triples of local vertex indices, counter-clockwise seen from air
//! - **vertex data** (`vertex_data[case]`): one [`VertexCode`] per local
//!   vertex, naming the cell edge it lies on and how it can be reused
//!
//! ```text
//! Regular cell (8 corners)            Transition cell (13 corners)
//!
//!       6──────7                      full-res face (w = 0)   low-res face (w = 1)
//!      /│     /│                        6───7───8               B───────C
//!     4─┼────5 │                        │   │   │               │       │
//!     │ 2────┼─3                        3───4───5               │       │
//!     │/     │/                         │   │   │               │       │
//!     0──────1                          0───1───2               9───────A
//! ```
//!
//! The low-res corners 9, A, B, C carry the samples of 0, 2, 6, 8.
//!
//! # Derivation
//!
//! Tables are built once, on first use, by tracing the isosurface boundary
//! over the faces of the cell polyhedron. On each face the sign changes along
//! its outward-oriented boundary give crossing points. Each crossing where
//! the boundary enters the inside is linked to the exit crossing that closes
//! the same surface segment. On ambiguous faces (diagonal sign pattern) the
//! diagonal containing the face's minimum-coordinate corner is joined, so
//! two cells sharing a face always make the same choice. Linked segments
//! form closed loops, which are fan-triangulated.

use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

use glam::Vec3;
use smallvec::SmallVec;

/// Set in a cell class entry when the winding must be reversed.
pub const CLASS_FLIP: u16 = 0x8000;

/// Reuse flag: vertex belongs to the cell at -X (regular) or -U (transition).
pub const REUSE_NEG_X: u8 = 0x1;
/// Reuse flag: vertex belongs to the cell at -Y (regular) or -V (transition).
pub const REUSE_NEG_Y: u8 = 0x2;
/// Reuse flag: vertex belongs to the cell at -Z (regular only).
pub const REUSE_NEG_Z: u8 = 0x4;
/// Reuse flag: vertex is owned by this cell and stored for later cells.
pub const REUSE_OWNED: u8 = 0x8;

/// Number of corners in a transition cell.
pub const TRANSITION_CORNERS: usize = 13;

/// Full-resolution sample mirrored by each low-res corner (9, A, B, C).
pub const TRANSITION_LOW_TO_FULL: [u8; 4] = [0, 2, 6, 8];

/// Packed cell-edge vertex description.
///
/// ```text
/// bits 12-15  reuse flags (REUSE_*)
/// bits  8-11  cache slot in the owning cell
/// bits  4-7   corner a (lower coordinate)
/// bits  0-3   corner b
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VertexCode(pub u16);

impl VertexCode {
  pub const fn new(a: u8, b: u8, slot: u8, flags: u8) -> Self {
    Self(((flags as u16 & 0xF) << 12) | ((slot as u16 & 0xF) << 8) | ((a as u16 & 0xF) << 4) | (b as u16 & 0xF))
  }

  #[inline(always)]
  pub const fn corners(self) -> (u8, u8) {
    (((self.0 >> 4) & 0xF) as u8, (self.0 & 0xF) as u8)
  }

  #[inline(always)]
  pub const fn slot(self) -> usize {
    ((self.0 >> 8) & 0xF) as usize
  }

  /// Direction bits of the owning cell, zero for owned or unshared edges.
  #[inline(always)]
  pub const fn reuse_dir(self) -> u8 {
    ((self.0 >> 12) & 0x7) as u8
  }

  #[inline(always)]
  pub const fn is_owned(self) -> bool {
    (self.0 >> 12) as u8 & REUSE_OWNED != 0
  }
}

/// Triangulation shared by every case of one class.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct CellData {
  pub vertex_count: u8,
  pub triangles: SmallVec<[[u8; 3]; 12]>,
}

/// Class, triangle and vertex tables for one cell type.
#[derive(Clone, Debug)]
pub struct CaseTable {
  pub cell_class: Vec<u16>,
  pub cell_data: Vec<CellData>,
  pub vertex_data: Vec<SmallVec<[VertexCode; 12]>>,
}

impl CaseTable {
  pub fn case_count(&self) -> usize {
    self.cell_class.len()
  }

  /// Cell data and winding flip for a case code.
  ///
  /// Panics on a code outside the table.
  #[inline]
  pub fn class(&self, case: usize) -> (&CellData, bool) {
    let entry = self.cell_class[case];
    (&self.cell_data[(entry & !CLASS_FLIP) as usize], entry & CLASS_FLIP != 0)
  }

  #[inline]
  pub fn vertices(&self, case: usize) -> &[VertexCode] {
    &self.vertex_data[case]
  }
}

/// Table for the 256 regular cell cases.
pub fn regular_table() -> &'static CaseTable {
  static TABLE: OnceLock<CaseTable> = OnceLock::new();
  TABLE.get_or_init(|| build_table(&CellShape::regular(), 8, regular_reuse))
}

/// Table for the 512 transition cell cases (bit `i` = full-res sample `i`).
pub fn transition_table() -> &'static CaseTable {
  static TABLE: OnceLock<CaseTable> = OnceLock::new();
  TABLE.get_or_init(|| build_table(&CellShape::transition(), 9, transition_reuse))
}

// =============================================================================
// Reuse codes
// =============================================================================

/// Regular cells own the three edges meeting at corner 7 (slot = axis).
/// Any other edge belongs to the earlier cell for which it is such an edge.
fn regular_reuse(a: u8, b: u8) -> (u8, u8) {
  let axis = (a ^ b).trailing_zeros() as u8;
  let mut dir = 0;
  for k in 0..3u8 {
    if k != axis && (a >> k) & 1 == 0 {
      dir |= 1 << k;
    }
  }
  if dir == 0 {
    (axis, REUSE_OWNED)
  } else {
    (axis, dir)
  }
}

/// Transition cells own their +U side (slots 0-2) and +V side (slots 3-5);
/// the -U and -V sides come from the previous cell in the row / column.
fn transition_reuse(a: u8, b: u8) -> (u8, u8) {
  match (a, b) {
    (2, 5) => (0, REUSE_OWNED),
    (5, 8) => (1, REUSE_OWNED),
    (10, 12) => (2, REUSE_OWNED),
    (6, 7) => (3, REUSE_OWNED),
    (7, 8) => (4, REUSE_OWNED),
    (11, 12) => (5, REUSE_OWNED),
    (0, 3) => (0, REUSE_NEG_X),
    (3, 6) => (1, REUSE_NEG_X),
    (9, 11) => (2, REUSE_NEG_X),
    (0, 1) => (3, REUSE_NEG_Y),
    (1, 2) => (4, REUSE_NEG_Y),
    (9, 10) => (5, REUSE_NEG_Y),
    _ => (0, 0),
  }
}

// =============================================================================
// Table construction
// =============================================================================

type Edge = (u8, u8);

/// Convex cell polyhedron used for case derivation.
struct CellShape {
  corners: Vec<Vec3>,
  /// Case bit that decides each corner's sign.
  sign_bit: Vec<u8>,
  /// Faces as corner cycles, counter-clockwise seen from outside.
  faces: Vec<Vec<u8>>,
}

impl CellShape {
  fn regular() -> Self {
    let corners = (0..8u8)
      .map(|i| Vec3::new((i & 1) as f32, ((i >> 1) & 1) as f32, ((i >> 2) & 1) as f32))
      .collect();
    let faces = vec![
      vec![0, 2, 6, 4],
      vec![1, 3, 7, 5],
      vec![0, 1, 5, 4],
      vec![2, 3, 7, 6],
      vec![0, 1, 3, 2],
      vec![4, 5, 7, 6],
    ];
    Self::oriented(corners, (0..8).collect(), faces)
  }

  /// Full-res samples 0-8 on w = 0 at half steps, low-res 9-12 on w = 1.
  fn transition() -> Self {
    let mut corners: Vec<Vec3> = (0..9u8)
      .map(|i| Vec3::new((i % 3) as f32 * 0.5, (i / 3) as f32 * 0.5, 0.0))
      .collect();
    corners.extend([
      Vec3::new(0.0, 0.0, 1.0),
      Vec3::new(1.0, 0.0, 1.0),
      Vec3::new(0.0, 1.0, 1.0),
      Vec3::new(1.0, 1.0, 1.0),
    ]);
    let mut sign_bit: Vec<u8> = (0..9).collect();
    sign_bit.extend(TRANSITION_LOW_TO_FULL);
    let faces = vec![
      vec![0, 1, 4, 3],
      vec![1, 2, 5, 4],
      vec![3, 4, 7, 6],
      vec![4, 5, 8, 7],
      vec![9, 10, 12, 11],
      vec![0, 1, 2, 10, 9],
      vec![2, 5, 8, 12, 10],
      vec![8, 7, 6, 11, 12],
      vec![6, 3, 0, 9, 11],
    ];
    Self::oriented(corners, sign_bit, faces)
  }

  /// Reverse any face whose Newell normal points into the cell.
  fn oriented(corners: Vec<Vec3>, sign_bit: Vec<u8>, mut faces: Vec<Vec<u8>>) -> Self {
    let center = corners.iter().copied().sum::<Vec3>() / corners.len() as f32;
    for face in &mut faces {
      let n = face.len();
      let mut normal = Vec3::ZERO;
      let mut face_center = Vec3::ZERO;
      for k in 0..n {
        let p = corners[face[k] as usize];
        let q = corners[face[(k + 1) % n] as usize];
        normal += p.cross(q);
        face_center += p;
      }
      face_center /= n as f32;
      if normal.dot(face_center - center) < 0.0 {
        face.reverse();
      }
    }
    Self {
      corners,
      sign_bit,
      faces,
    }
  }

  fn min_corner(&self, face: &[u8]) -> u8 {
    let sum = |c: &u8| {
      let p = self.corners[*c as usize];
      p.x + p.y + p.z
    };
    face
      .iter()
      .copied()
      .fold(face[0], |best, c| if sum(&c) < sum(&best) { c } else { best })
  }

  /// Crossing edges in loop order and fan triangles over local indices.
  fn triangulate(&self, case: u32) -> (Vec<Edge>, SmallVec<[[u8; 3]; 12]>) {
    let inside = |c: u8| (case >> self.sign_bit[c as usize]) & 1 != 0;

    let mut links: BTreeMap<Edge, Edge> = BTreeMap::new();
    for face in &self.faces {
      let n = face.len();
      let mut crossings: SmallVec<[(Edge, bool); 4]> = SmallVec::new();
      for k in 0..n {
        let (a, b) = (face[k], face[(k + 1) % n]);
        if inside(a) != inside(b) {
          crossings.push(((a.min(b), a.max(b)), inside(b)));
        }
      }
      let m = crossings.len();
      if m == 0 {
        continue;
      }
      let join_inside = m > 2 && inside(self.min_corner(face));
      for i in 0..m {
        let (edge, entering) = crossings[i];
        if entering {
          let j = if join_inside { (i + m - 1) % m } else { (i + 1) % m };
          links.insert(edge, crossings[j].0);
        }
      }
    }

    let mut edges: Vec<Edge> = Vec::new();
    let mut triangles = SmallVec::new();
    loop {
      let Some(start) = links.first_key_value().map(|(edge, _)| *edge) else {
        break;
      };
      let first = edges.len() as u8;
      let mut current = start;
      edges.push(current);
      while let Some(next) = links.remove(&current) {
        if next == start {
          break;
        }
        edges.push(next);
        current = next;
      }
      let last = edges.len() as u8;
      for i in first + 1..last - 1 {
        triangles.push([first, i, i + 1]);
      }
    }
    (edges, triangles)
  }
}

fn build_table(shape: &CellShape, case_bits: u32, reuse: fn(u8, u8) -> (u8, u8)) -> CaseTable {
  let count = 1usize << case_bits;
  let full = count - 1;

  let mut cell_class = vec![0u16; count];
  let mut cell_data = vec![CellData::default()];
  let mut vertex_data = vec![SmallVec::new(); count];
  let mut lookup: HashMap<CellData, u16> = HashMap::new();
  lookup.insert(CellData::default(), 0);

  for case in 0..count {
    let canonical = case.min(full ^ case);
    if canonical == 0 {
      continue;
    }
    let (edges, triangles) = shape.triangulate(canonical as u32);
    let data = CellData {
      vertex_count: edges.len() as u8,
      triangles,
    };
    let class = match lookup.get(&data) {
      Some(&class) => class,
      None => {
        let class = cell_data.len() as u16;
        lookup.insert(data.clone(), class);
        cell_data.push(data);
        class
      }
    };
    cell_class[case] = if case == canonical { class } else { class | CLASS_FLIP };
    vertex_data[case] = edges
      .iter()
      .map(|&(a, b)| {
        let (slot, flags) = reuse(a, b);
        VertexCode::new(a, b, slot, flags)
      })
      .collect();
  }

  tracing::debug!(cases = count, classes = cell_data.len(), "built case table");
  CaseTable {
    cell_class,
    cell_data,
    vertex_data,
  }
}

#[cfg(test)]
#[path = "tables_test.rs"]
mod tables_test;
