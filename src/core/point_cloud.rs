//! Point cloud built from surviving voxels.

use crate::core::VoxelGrid;
use nalgebra::Vector3;

/// Axis-aligned bounds of a point set.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: Vector3<f32>,
    pub max: Vector3<f32>,
}

impl Bounds {
    /// Size along each axis.
    pub fn extent(&self) -> Vector3<f32> {
        self.max - self.min
    }
}

/// An ordered list of world-space points.
///
/// Order follows grid traversal and is reproducible, but carries no meaning.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointCloud {
    pub points: Vec<Vector3<f32>>,
}

impl PointCloud {
    /// Create an empty cloud.
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    pub fn from_points(points: Vec<Vector3<f32>>) -> Self {
        Self { points }
    }

    /// One point per occupied voxel, at the voxel center.
    pub fn from_grid(grid: &VoxelGrid) -> Self {
        let points = grid
            .occupied()
            .map(|(ix, iy, iz)| grid.center(ix, iy, iz).cast::<f32>())
            .collect();
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Vector3<f32>> {
        self.points.iter()
    }

    pub fn as_slice(&self) -> &[Vector3<f32>] {
        &self.points
    }

    /// Per-axis min/max, or None for an empty cloud.
    pub fn bounds(&self) -> Option<Bounds> {
        let first = *self.points.first()?;
        let (min, max) = self
            .points
            .iter()
            .fold((first, first), |(lo, hi), p| (lo.inf(p), hi.sup(p)));
        Some(Bounds { min, max })
    }
}

impl<'a> IntoIterator for &'a PointCloud {
    type Item = &'a Vector3<f32>;
    type IntoIter = std::slice::Iter<'a, Vector3<f32>>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
