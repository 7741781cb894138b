//! Per-tick terrain pipeline.
//!
//! ```text
//! ┌──────────────┐     ┌────────────────┐     ┌─────────────┐     ┌──────────┐
//! │ Chunk update ├────►│ Density update ├────►│ Mesh update ├────►│ Renderer │
//! └──────────────┘     └────────────────┘     └─────────────┘     └──────────┘
//!        │                     │                     │                  ▲
//!  Vec<ChunkUpdate>      DensityResult           ChunkMesh         MeshEvent
//!  (create/remove/       (block | uniform)                          (Ready |
//!   update + mask)                                                 Teardown)
//! ```
//!
//! # Drivers
//!
//! - [`TerrainPipeline`]: synchronous; each stage is a rayon parallel
//!   iterator and `tick` returns when every chunk is meshed
//! - [`AsyncTerrain`]: one pool task per chunk; `poll` collects finished
//!   chunks and drops results that went stale while in flight

pub mod types;

pub mod async_process;
pub mod chunk_update;
pub mod density_update;
pub mod mesh_update;
pub mod process;

#[cfg(test)]
pub mod test_utils;


pub use async_process::AsyncTerrain;
pub use chunk_update::ChunkUpdateExecutor;
pub use density_update::DensityUpdateExecutor;
pub use mesh_update::MeshUpdateExecutor;
pub use process::{TerrainPipeline, TickStats};
pub use types::{ChunkKey, ChunkMesh, ChunkUpdate, DensityResult, MeshEvent, UpdateKind};
