//! Voxel carving: the visual hull as a per-voxel AND over all views.
//!
//! A voxel survives only if its center projects inside the frame, in front of the
//! camera, onto a foreground pixel, for every view. The first failing view
//! carves it and the remaining views are skipped.
//!
//! Each voxel's decision depends only on the read-only views, never on other
//! voxels, so the grid is split into x-slices and carved in parallel with rayon.
//! Workers write disjoint slices; no locking is needed. Parallel and sequential
//! carving produce identical grids.
//!
//! Cost is `O(G³ · N)` projections in the worst case. Runtime grows cubically
//! with the grid resolution.

use crate::core::{unit_linspace, Camera, VoxelGrid};
use crate::silhouette::Silhouette;
use nalgebra::Vector3;
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};

/// One viewpoint: a camera and the silhouette seen from it.
#[derive(Clone, Debug)]
pub struct View {
    /// 0-based position on the camera ring
    pub index: usize,
    pub camera: Camera,
    pub silhouette: Silhouette,
}

impl View {
    pub fn new(index: usize, camera: Camera, silhouette: Silhouette) -> Self {
        Self {
            index,
            camera,
            silhouette,
        }
    }

    /// True if `point` projects onto a foreground pixel of this view.
    pub fn sees(&self, point: &Vector3<f64>) -> bool {
        let Some(px) = self.camera.world_to_pixel(point) else {
            return false;
        };

        // Second guard: the camera's frame may not match the mask exactly.
        if px.x >= self.silhouette.width() || px.y >= self.silhouette.height() {
            return false;
        }

        self.silhouette.get(px.x, px.y)
    }
}

/// Visual-hull membership of one point. No views means nothing survives.
pub fn voxel_survives(point: &Vector3<f64>, views: &[View]) -> bool {
    !views.is_empty() && views.iter().all(|view| view.sees(point))
}

/// Progress checkpoint, emitted after each finished x-slice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CarveProgress {
    pub slices_done: usize,
    pub slices_total: usize,
}

/// Summary of one carving pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CarveStats {
    /// Voxels in the grid (`G³`)
    pub total: usize,

    /// Voxels cleared by this pass
    pub removed: usize,

    /// Voxels still occupied afterwards
    pub surviving: usize,
}

type ProgressFn = dyn Fn(CarveProgress) + Send + Sync;

/// Carves a [`VoxelGrid`] against a set of views.
pub struct VoxelCarver {
    /// Split slices across the rayon pool
    pub parallel: bool,

    progress: Option<Box<ProgressFn>>,
}

impl VoxelCarver {
    /// Parallel carver without progress reporting.
    pub fn new() -> Self {
        Self {
            parallel: true,
            progress: None,
        }
    }

    /// Single-threaded carver, same results.
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            progress: None,
        }
    }

    /// Invoke `f` after each completed x-slice. May be called from worker threads.
    pub fn with_progress(mut self, f: impl Fn(CarveProgress) + Send + Sync + 'static) -> Self {
        self.progress = Some(Box::new(f));
        self
    }

    /// Clear every voxel not seen as foreground by all `views`.
    pub fn carve(&self, grid: &mut VoxelGrid, views: &[View]) -> CarveStats {
        let resolution = grid.resolution();
        let slice_len = grid.slice_len().max(1);
        let total = grid.len();
        let done = AtomicUsize::new(0);

        let carve_one = |(ix, slice): (usize, &mut [bool])| -> usize {
            let removed = carve_slice(slice, ix, resolution, views);
            self.report(&done, resolution);
            removed
        };

        let removed: usize = if self.parallel {
            grid.occupancy_mut()
                .par_chunks_mut(slice_len)
                .enumerate()
                .map(carve_one)
                .sum()
        } else {
            grid.slices_mut().enumerate().map(carve_one).sum()
        };

        let stats = CarveStats {
            total,
            removed,
            surviving: grid.occupied_count(),
        };
        log::info!(
            "carving done: removed {}/{} voxels, {} survive ({} views)",
            stats.removed,
            stats.total,
            stats.surviving,
            views.len()
        );
        stats
    }

    fn report(&self, done: &AtomicUsize, total: usize) {
        let slices_done = done.fetch_add(1, Ordering::Relaxed) + 1;
        log::debug!("slice {slices_done}/{total}");
        if let Some(progress) = &self.progress {
            progress(CarveProgress {
                slices_done,
                slices_total: total,
            });
        }
    }
}

impl Default for VoxelCarver {
    fn default() -> Self {
        Self::new()
    }
}

/// Carve one x-slice (`G²` cells, y-major) in place. Returns cells cleared.
fn carve_slice(slice: &mut [bool], ix: usize, resolution: usize, views: &[View]) -> usize {
    let x = unit_linspace(ix, resolution);
    let mut removed = 0;

    for (i, occupied) in slice.iter_mut().enumerate() {
        if !*occupied {
            continue;
        }
        let iy = i / resolution;
        let iz = i % resolution;
        let center = Vector3::new(x, unit_linspace(iy, resolution), unit_linspace(iz, resolution));

        if !voxel_survives(&center, views) {
            *occupied = false;
            removed += 1;
        }
    }

    removed
}

/// Carve with the default parallel carver.
pub fn carve(grid: &mut VoxelGrid, views: &[View]) -> CarveStats {
    VoxelCarver::new().carve(grid, views)
}
