//! Optional boundary approximation of the carved point set.
//!
//! The carved points are the result; a boundary mesh is only a visual byproduct.
//! Any [`BoundaryApproximator`] may be plugged in. [`ConvexHull`] is the stock one.
//! Callers are expected to fall back to the raw points when it fails.

mod quickhull;

use nalgebra::Vector3;
use thiserror::Error;

pub use quickhull::quickhull;

/// Why a boundary could not be built.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BoundaryError {
    #[error("boundary needs at least 4 points, got {0}")]
    InsufficientPoints(usize),

    #[error("points are degenerate (coincident, collinear or coplanar)")]
    Degenerate,
}

/// Closed triangle mesh; triangles are wound counter-clockwise seen from outside.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BoundaryMesh {
    pub vertices: Vec<Vector3<f32>>,
    pub triangles: Vec<[u32; 3]>,
}

impl BoundaryMesh {
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Enclosed volume (divergence theorem over the triangles).
    pub fn volume(&self) -> f64 {
        self.triangles
            .iter()
            .map(|t| {
                let [a, b, c] = t.map(|i| self.vertices[i as usize].cast::<f64>());
                a.dot(&b.cross(&c))
            })
            .sum::<f64>()
            / 6.0
    }
}

/// Computes a boundary surface from a point set (N ≥ 4), or says why it can't.
pub trait BoundaryApproximator {
    fn approximate(&self, points: &[Vector3<f32>]) -> Result<BoundaryMesh, BoundaryError>;
}

/// Convex hull boundary via QuickHull.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConvexHull;

impl BoundaryApproximator for ConvexHull {
    fn approximate(&self, points: &[Vector3<f32>]) -> Result<BoundaryMesh, BoundaryError> {
        quickhull(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PointCloud, VoxelGrid};
    use approx::assert_relative_eq;

    fn cube_corners() -> Vec<Vector3<f32>> {
        let mut pts = Vec::new();
        for &x in &[-1.0, 1.0] {
            for &y in &[-1.0, 1.0] {
                for &z in &[-1.0, 1.0] {
                    pts.push(Vector3::new(x, y, z));
                }
            }
        }
        pts
    }

    #[test]
    fn test_tetrahedron() {
        let pts = vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(0.0, 0.0, 1.0),
        ];
        let mesh = ConvexHull.approximate(&pts).unwrap();
        assert_eq!(mesh.triangle_count(), 4);
        assert_relative_eq!(mesh.volume(), 1.0 / 6.0, epsilon = 1e-9);
    }

    #[test]
    fn test_cube_with_interior_points() {
        let mut pts = cube_corners();
        pts.push(Vector3::new(0.0, 0.0, 0.0));
        pts.push(Vector3::new(0.5, -0.25, 0.1));
        let mesh = ConvexHull.approximate(&pts).unwrap();

        assert_eq!(mesh.vertices.len(), 8);
        assert_eq!(mesh.triangle_count(), 12);
        assert_relative_eq!(mesh.volume(), 8.0, epsilon = 1e-6);
    }

    #[test]
    fn test_full_voxel_grid_hull_is_the_cube() {
        let cloud = PointCloud::from_grid(&VoxelGrid::new(5));
        let mesh = ConvexHull.approximate(cloud.as_slice()).unwrap();
        assert_relative_eq!(mesh.volume(), 8.0, epsilon = 1e-5);
        assert!(mesh.vertices.len() >= 8);
    }

    #[test]
    fn test_too_few_points() {
        let pts = vec![Vector3::zeros(); 3];
        assert_eq!(
            ConvexHull.approximate(&pts),
            Err(BoundaryError::InsufficientPoints(3))
        );
    }

    #[test]
    fn test_coplanar_points_are_degenerate() {
        let pts: Vec<Vector3<f32>> = (0..10)
            .map(|i| Vector3::new(i as f32, (i * i) as f32, 0.0))
            .collect();
        assert_eq!(ConvexHull.approximate(&pts), Err(BoundaryError::Degenerate));
    }

    #[test]
    fn test_sphere_sample_gives_closed_hull() {
        // Fibonacci sphere: every point is a hull vertex
        let n = 400;
        let golden = std::f64::consts::PI * (3.0 - 5f64.sqrt());
        let pts: Vec<Vector3<f32>> = (0..n)
            .map(|i| {
                let y = 1.0 - 2.0 * (i as f64 + 0.5) / n as f64;
                let r = (1.0 - y * y).sqrt();
                let phi = golden * i as f64;
                Vector3::new(r * phi.cos(), y, r * phi.sin()).cast::<f32>()
            })
            .collect();
        let mesh = ConvexHull.approximate(&pts).unwrap();

        assert_eq!(mesh.vertices.len(), n);
        // Closed triangulated sphere: V - E + F = 2 with E = 3F / 2
        assert_eq!(2 * mesh.vertices.len() - 4, mesh.triangle_count());

        let mut edges = std::collections::HashSet::new();
        for &[a, b, c] in &mesh.triangles {
            for edge in [(a, b), (b, c), (c, a)] {
                assert!(edges.insert(edge), "edge {edge:?} used twice");
            }
        }
        for &(a, b) in &edges {
            assert!(edges.contains(&(b, a)), "edge ({a}, {b}) has no twin");
        }

        for &[a, b, c] in &mesh.triangles {
            let [a, b, c] = [a, b, c].map(|i| mesh.vertices[i as usize].cast::<f64>());
            let normal = (b - a).cross(&(c - a)).normalize();
            for p in &pts {
                assert!(normal.dot(&(p.cast::<f64>() - a)) < 1e-5);
            }
        }

        let sphere = 4.0 / 3.0 * std::f64::consts::PI;
        assert!(mesh.volume() > 0.95 * sphere && mesh.volume() < sphere);
    }
}
