//! OctreeNode - value type stored in the linear octree, plus location code
//! math.
//!
//! Depth 0 = finest detail (leaf chunks), depth grows toward the root.
//!
//! # Location Codes
//!
//! ```text
//! root            = 0b1
//! child(code, i)  = code << 3 | i        i = octant, bit 0 = +X, 1 = +Y, 2 = +Z
//! parent(code)    = code >> 3
//! level(code)     = (63 - leading_zeros(code)) / 3     (root = level 0)
//! ```

use glam::{IVec3, Vec3};

use crate::constants::ROOT_CODE;

/// Location code of child `octant` (0-7) of `code`.
#[inline(always)]
pub const fn child_code(code: u64, octant: u8) -> u64 {
  (code << 3) | (octant as u64 & 0b111)
}

/// Location code of the parent, or `None` for the root.
#[inline(always)]
pub const fn parent_code(code: u64) -> Option<u64> {
  if code <= ROOT_CODE {
    None
  } else {
    Some(code >> 3)
  }
}

/// Number of levels below the root encoded by `code`.
#[inline(always)]
pub const fn level_of_code(code: u64) -> u32 {
  (63 - code.leading_zeros()) / 3
}

/// Octant (0-7) a code occupies inside its parent.
#[inline(always)]
pub const fn octant_of_code(code: u64) -> u8 {
  (code & 0b111) as u8
}

/// Octant of `point` relative to `center` (bit set where point >= center).
#[inline]
pub fn octant_toward(center: IVec3, point: Vec3) -> u8 {
  let c = center.as_vec3();
  (point.x >= c.x) as u8 | ((point.y >= c.y) as u8) << 1 | ((point.z >= c.z) as u8) << 2
}

/// Octree node - immutable value type.
///
/// `position` is the node center and `extents` its half-width, both in world
/// units. A node at depth `d` spans `leaf_size << d`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct OctreeNode {
  pub location_code: u64,
  pub depth: u32,
  pub extents: i32,
  pub position: IVec3,
}

impl OctreeNode {
  pub fn new(location_code: u64, depth: u32, extents: i32, position: IVec3) -> Self {
    Self {
      location_code,
      depth,
      extents,
      position,
    }
  }

  /// Root node of a world of half-width `extents` centered on the origin.
  pub fn root(depth: u32, extents: i32) -> Self {
    Self::new(ROOT_CODE, depth, extents, IVec3::ZERO)
  }

  /// Child node for `octant` (depth - 1, half the extents).
  ///
  /// Returns None at depth 0 (cannot subdivide further).
  pub fn child(&self, octant: u8) -> Option<Self> {
    if self.depth == 0 {
      return None;
    }
    let half = self.extents / 2;
    let sign = |bit: u8| if octant & bit != 0 { half } else { -half };
    Some(Self {
      location_code: child_code(self.location_code, octant),
      depth: self.depth - 1,
      extents: half,
      position: self.position + IVec3::new(sign(1), sign(2), sign(4)),
    })
  }

  /// Minimum corner in world units.
  #[inline]
  pub fn min(&self) -> IVec3 {
    self.position - IVec3::splat(self.extents)
  }

  /// Maximum corner in world units.
  #[inline]
  pub fn max(&self) -> IVec3 {
    self.position + IVec3::splat(self.extents)
  }

  /// Edge length in world units.
  #[inline]
  pub fn size(&self) -> i32 {
    self.extents * 2
  }

  /// True if `point` lies in `[min, max)` on every axis.
  #[inline]
  pub fn contains(&self, point: Vec3) -> bool {
    let min = self.min().as_vec3();
    let max = self.max().as_vec3();
    point.cmpge(min).all() && point.cmplt(max).all()
  }

  /// Chebyshev (L-infinity) distance from `target` to the node center.
  #[inline]
  pub fn chebyshev_distance(&self, target: Vec3) -> f32 {
    (target - self.position.as_vec3()).abs().max_element()
  }
}

#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;
