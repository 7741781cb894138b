//! Octree module for LOD-based spatial subdivision.
//!
//! The partition is a linear (hash-mapped) octree: nodes live in a
//! `HashMap<u64, OctreeNode>` keyed by location code, and the tree shape is
//! implied by which codes are present.
//!
//! # LOD Convention
//!
//! Depth 0 = finest detail (leaf chunks), higher depth = coarser. A node's
//! depth is also the LOD of the chunk it renders.
//!
//! ```text
//! Chunk Size = chunk_size * 2^depth
//! Voxel Spacing = 2^depth
//! ```
//!
//! # Module Structure
//!
//! - [`node`]: `OctreeNode` value type and location code math
//! - [`linear`]: `LinearOctree` - point descent, split, remove

pub mod linear;
pub mod node;

// Re-exports
pub use linear::LinearOctree;
pub use node::{child_code, level_of_code, octant_of_code, parent_code, OctreeNode};
