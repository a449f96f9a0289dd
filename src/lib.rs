//! # vhull-rs: Visual hull reconstruction in Rust
//!
//! This crate reconstructs an approximate 3D shape of an object from a handful of
//! photographs taken on a circle around it (shape-from-silhouette). A voxel grid
//! over `[-1, 1]³` is carved wherever a voxel projects outside the object's
//! silhouette in any view; the survivors are exported as a point cloud.
//!
//! ## Architecture
//!
//! The crate is organized into several modules:
//!
//! - `core`: Fundamental data structures (cameras, voxel grid, point cloud)
//! - `silhouette`: Photo → binary foreground mask
//! - `carve`: The carving engine (parallel over grid slices)
//! - `hull`: Optional convex-hull boundary of the result
//! - `io`: File I/O (numbered images, PLY, OBJ)
//! - `pipeline`: End-to-end reconstruction with a typed result
//!
//! ## Example
//!
//! ```no_run
//! use vhull_rs::{reconstruct, ReconstructionConfig};
//!
//! let config = ReconstructionConfig::default();
//! let result = reconstruct(&config)?;
//! vhull_rs::pipeline::export(&result, &config)?;
//! # Ok::<(), vhull_rs::ReconstructError>(())
//! ```

// Core data structures and geometry
pub mod core;

// Silhouette extraction
pub mod silhouette;

// Voxel carving engine
pub mod carve;

// Optional boundary approximation
pub mod hull;

// I/O operations (images, PLY, OBJ)
pub mod io;

// Run settings
pub mod config;

// End-to-end reconstruction
pub mod pipeline;

// Re-export commonly used types at crate root for convenience
pub use carve::{CarveStats, View, VoxelCarver};
pub use config::ReconstructionConfig;
pub use crate::core::{Camera, CameraRing, PointCloud, VoxelGrid};
pub use io::LoadError;
pub use pipeline::{reconstruct, ReconstructError, Reconstruction, ReconstructionStatus};
pub use silhouette::{extract_silhouette, Silhouette};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
