//! Cell, face and octree layout constants shared by the partition and the
//! mesher.
//!
//! # Coordinate System
//!
//! ```text
//!         +Y
//!          │
//!          │
//!          │
//!          └───────── +X
//!         /
//!        /
//!       +Z
//!
//! Cell corner indices (binary: ZYX):
//!   0 = (0,0,0)    4 = (0,0,1)
//!   1 = (1,0,0)    5 = (1,0,1)
//!   2 = (0,1,0)    6 = (0,1,1)
//!   3 = (1,1,0)    7 = (1,1,1)
//! ```
//!
//! # Face Order
//!
//! Faces are indexed `-X, +X, -Y, +Y, -Z, +Z`, so `face >> 1` is the axis,
//! `face & 1` is the sign and `face ^ 1` is the opposite face. Neighbor masks
//! store face `i` in bit `1 << i`.

use glam::IVec3;

/// Smallest accepted chunk edge, in cells.
pub const MIN_CHUNK_SIZE: u32 = 8;

/// Deepest tree a 64-bit location code can address (1 root bit + 3 per level).
pub const MAX_OCTREE_DEPTH: u32 = 21;

/// Location code of the octree root.
pub const ROOT_CODE: u64 = 1;

/// Corner offsets indexed by corner number (bit 0 = X, bit 1 = Y, bit 2 = Z).
pub const CORNER_OFFSETS: [IVec3; 8] = [
  IVec3::new(0, 0, 0),
  IVec3::new(1, 0, 0),
  IVec3::new(0, 1, 0),
  IVec3::new(1, 1, 0),
  IVec3::new(0, 0, 1),
  IVec3::new(1, 0, 1),
  IVec3::new(0, 1, 1),
  IVec3::new(1, 1, 1),
];

/// Number of chunk faces.
pub const FACE_COUNT: usize = 6;

/// Unit offsets for the 6 faces: -X, +X, -Y, +Y, -Z, +Z.
pub const FACE_DIRECTIONS: [IVec3; FACE_COUNT] = [
  IVec3::NEG_X,
  IVec3::X,
  IVec3::NEG_Y,
  IVec3::Y,
  IVec3::NEG_Z,
  IVec3::Z,
];

/// Mask with every face bit set.
pub const ALL_FACES: u8 = 0b11_1111;

/// Mask bit for a face.
#[inline(always)]
pub const fn face_bit(face: usize) -> u8 {
  1 << face
}

/// Face on the other side of the same axis.
#[inline(always)]
pub const fn opposite_face(face: usize) -> usize {
  face ^ 1
}

/// Axis (0 = X, 1 = Y, 2 = Z) a face is perpendicular to.
#[inline(always)]
pub const fn face_axis(face: usize) -> usize {
  face >> 1
}

/// True for the +X, +Y and +Z faces.
#[inline(always)]
pub const fn face_is_positive(face: usize) -> bool {
  face & 1 == 1
}

/// The two in-plane axes of a face, in increasing order.
#[inline(always)]
pub const fn face_plane_axes(face: usize) -> (usize, usize) {
  match face_axis(face) {
    0 => (1, 2),
    1 => (0, 2),
    _ => (0, 1),
  }
}

#[cfg(test)]
#[path = "constants_test.rs"]
mod constants_test;
