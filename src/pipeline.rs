//! End-to-end reconstruction: numbered photos in, point cloud out.
//!
//! 1. Load `01.png ..= NN.png` (unreadable files are skipped, not fatal)
//! 2. Extract one silhouette per image and pair it with its ring camera
//! 3. Carve a fresh `G³` grid against all views
//! 4. Collect surviving voxel centers
//! 5. Optionally approximate a boundary surface
//!
//! Views are fully built before carving starts and are never touched again.

use crate::carve::{CarveStats, View, VoxelCarver};
use crate::config::ReconstructionConfig;
use crate::core::{CameraRing, PointCloud, VoxelGrid};
use crate::hull::{BoundaryApproximator, BoundaryMesh, ConvexHull};
use crate::io::{
    load_numbered_images, mask_path, save_mask, save_mesh_ply, save_obj, save_point_ply,
    LoadError, LoadedImage, SkippedImage,
};
use crate::silhouette::{extract_silhouette, SilhouetteOptions};
use nalgebra::Vector3;
use rayon::prelude::*;
use std::path::Path;
use thiserror::Error;

/// Why a reconstruction could not produce a result at all.
#[derive(Debug, Error)]
pub enum ReconstructError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Whether anything survived carving.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReconstructionStatus {
    Populated,
    /// Carving removed every voxel. Valid, but usually means the silhouettes are
    /// too tight, the camera geometry is off, or there are too few views.
    Empty,
}

/// Output of one reconstruction run.
#[derive(Clone, Debug)]
pub struct Reconstruction {
    pub grid: VoxelGrid,
    pub points: PointCloud,
    pub stats: CarveStats,
    /// Images that were expected but not used, with reasons
    pub skipped: Vec<SkippedImage>,
    /// Number of views that took part in carving
    pub views_used: usize,
    /// Boundary mesh, when requested and computable
    pub boundary: Option<BoundaryMesh>,
}

impl Reconstruction {
    pub fn status(&self) -> ReconstructionStatus {
        if self.points.is_empty() {
            ReconstructionStatus::Empty
        } else {
            ReconstructionStatus::Populated
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Pair each loaded image with its ring camera and silhouette.
///
/// Silhouettes are extracted in parallel. Each camera uses its own image's size.
pub fn build_views(
    images: &[LoadedImage],
    ring: &CameraRing,
    options: &SilhouetteOptions,
) -> Vec<View> {
    images
        .par_iter()
        .map(|img| {
            let silhouette = extract_silhouette(&img.image, options);
            log::debug!(
                "view {}: {} foreground px",
                img.number,
                silhouette.foreground_count()
            );
            let camera = ring.camera(img.camera_index(), img.image.width(), img.image.height());
            View::new(img.camera_index(), camera, silhouette)
        })
        .collect()
}

/// Write every view's silhouette to `dir` as `NN_mask.png` (image numbering).
pub fn dump_silhouettes(views: &[View], dir: &Path) -> Result<(), LoadError> {
    for view in views {
        save_mask(&view.silhouette, &mask_path(dir, view.index + 1))?;
    }
    log::info!("wrote {} silhouettes to {}", views.len(), dir.display());
    Ok(())
}

/// Carve a fresh grid of `resolution` against `views` and collect the survivors.
pub fn carve_views(
    views: &[View],
    resolution: usize,
    carver: &VoxelCarver,
) -> (VoxelGrid, CarveStats, PointCloud) {
    let mut grid = VoxelGrid::new(resolution);
    let stats = carver.carve(&mut grid, views);
    let points = PointCloud::from_grid(&grid);
    (grid, stats, points)
}

/// Run an approximator, logging instead of failing when it can't.
pub fn approximate_boundary(
    points: &[Vector3<f32>],
    approximator: &dyn BoundaryApproximator,
) -> Option<BoundaryMesh> {
    match approximator.approximate(points) {
        Ok(mesh) => {
            log::info!(
                "boundary: {} triangles, volume={:.6}",
                mesh.triangle_count(),
                mesh.volume()
            );
            Some(mesh)
        }
        Err(e) => {
            log::warn!("boundary approximation failed ({e}); keeping raw points only");
            None
        }
    }
}

/// Reconstruct from already-decoded images.
pub fn reconstruct_images(
    images: &[LoadedImage],
    config: &ReconstructionConfig,
    carver: &VoxelCarver,
) -> Result<Reconstruction, ReconstructError> {
    config.validate()?;

    if let Some(img) = images
        .iter()
        .find(|img| img.number == 0 || img.number > config.image_count)
    {
        return Err(ReconstructError::InvalidConfig(format!(
            "image number {} is outside 1..={}",
            img.number, config.image_count
        )));
    }

    let views = build_views(images, &config.camera_ring(), &config.silhouette);
    if let Some(dir) = &config.silhouette_dump {
        dump_silhouettes(&views, dir)?;
    }
    let (grid, stats, points) = carve_views(&views, config.grid_resolution, carver);

    if let Some(bounds) = points.bounds() {
        log::info!(
            "{} points, x [{:.3}, {:.3}] y [{:.3}, {:.3}] z [{:.3}, {:.3}]",
            points.len(),
            bounds.min.x,
            bounds.max.x,
            bounds.min.y,
            bounds.max.y,
            bounds.min.z,
            bounds.max.z
        );
    } else {
        log::warn!("every voxel was carved away; the point cloud is empty");
    }

    let boundary = if config.boundary {
        approximate_boundary(points.as_slice(), &ConvexHull)
    } else {
        None
    };

    Ok(Reconstruction {
        grid,
        points,
        stats,
        skipped: Vec::new(),
        views_used: views.len(),
        boundary,
    })
}

/// Load the configured images and reconstruct.
pub fn reconstruct(config: &ReconstructionConfig) -> Result<Reconstruction, ReconstructError> {
    let carver = if config.parallel {
        VoxelCarver::new()
    } else {
        VoxelCarver::sequential()
    };
    reconstruct_with_carver(config, &carver)
}

/// [`reconstruct`] with a caller-supplied carver (e.g. one reporting progress).
pub fn reconstruct_with_carver(
    config: &ReconstructionConfig,
    carver: &VoxelCarver,
) -> Result<Reconstruction, ReconstructError> {
    config.validate()?;

    let loaded = load_numbered_images(&config.images_dir, config.image_count)?;
    let mut reconstruction = reconstruct_images(&loaded.images, config, carver)?;
    reconstruction.skipped = loaded.skipped;
    Ok(reconstruction)
}

/// Write the point cloud, and the boundary mesh if there is one and a path for it.
pub fn export(
    reconstruction: &Reconstruction,
    config: &ReconstructionConfig,
) -> Result<(), ReconstructError> {
    save_point_ply(&reconstruction.points, &config.output)?;

    if let (Some(mesh), Some(path)) = (&reconstruction.boundary, &config.boundary_output) {
        save_boundary(mesh, path)?;
    }
    Ok(())
}

/// Save a boundary mesh as OBJ when the extension says so, PLY otherwise.
pub fn save_boundary(mesh: &BoundaryMesh, path: &Path) -> Result<(), LoadError> {
    let is_obj = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("obj"));
    if is_obj {
        save_obj(mesh, path)
    } else {
        save_mesh_ply(mesh, path)
    }
}
