//! Core data structures and geometry.
//!
//! This module contains the fundamental types used throughout the system:
//! - `Camera`: pinhole camera on a ring around the object
//! - `VoxelGrid`: occupancy flags over `[-1, 1]³`
//! - `PointCloud`: surviving voxel centers
//!
//! All types here are "pure data" - no I/O, no carving logic.

mod camera;
mod grid;
pub mod math;
mod point_cloud;

// Re-export public types
pub use camera::{pinhole_intrinsics, Camera, CameraRing, Pixel, DEPTH_EPSILON};
pub use grid::VoxelGrid;
pub use math::{look_at_basis, unit_linspace};
pub use point_cloud::{Bounds, PointCloud};
