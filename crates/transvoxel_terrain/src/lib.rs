//! transvoxel_terrain - seamless LOD voxel terrain
//!
//! Turns a signed density field into watertight chunk meshes whose
//! resolution falls off with distance from a moving target, stitched across
//! LOD boundaries with Transvoxel transition cells.
//!
//! # Features
//!
//! - **Linear octree partition**: hash-mapped nodes keyed by location code,
//!   diffed against the target every tick
//! - **Neighbor masks**: the coarser side of every mixed-LOD face owns the
//!   transition geometry
//! - **Transvoxel meshing**: regular and transition cells with vertex reuse,
//!   bisection refinement on coarse chunks and secondary vertices for seams
//! - **Density fields**: `noise` fBm terrain (planar or planet) and a sparse
//!   voxel store
//! - **Parallel pipeline**: rayon stages, or one pool task per chunk
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use transvoxel_terrain::{DensityGenerator, DensitySettings, TerrainConfig, TerrainPipeline};
//!
//! let config = TerrainConfig::new(1024, 32)?;
//! let field = Arc::new(DensityGenerator::new(DensitySettings::new(1337)));
//! let mut pipeline = TerrainPipeline::new(config, field);
//!
//! let (events, stats) = pipeline.tick(glam::Vec3::ZERO)?;
//! println!("{} chunks, {} triangles", events.len(), stats.triangles);
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod types;

pub use config::{TerrainConfig, MIN_LOD_DISTANCE_FACTOR};
pub use error::{ConfigError, OctreeError, TerrainError};
pub use types::{ChunkGeometry, MinMaxAABB, SecondaryVertex, TerrainMeshRenderData};

// Density fields and the sparse voxel store
pub mod density;
pub mod volume;
pub use density::{DensityBlock, DensityField, DensityGenerator, DensitySettings, FbmSettings, TerrainShape};
pub use volume::{Voxel, VolumeChunk, VolumeDictionary};

// Spatial partition
pub mod octree;
pub use octree::{LinearOctree, OctreeNode};

// Mesher
pub mod transvoxel;
pub use transvoxel::polygonize;

// Per-tick pipeline
pub mod pipeline;
pub use pipeline::{
  AsyncTerrain, ChunkKey, ChunkMesh, ChunkUpdate, ChunkUpdateExecutor, MeshEvent, TerrainPipeline, TickStats,
  UpdateKind,
};

// Pool task executor
pub mod threading;
pub use threading::{TaskExecutor, TaskId};
