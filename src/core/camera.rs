//! Camera model (pinhole camera placed on a ring around the object).
//!
//! Cameras are used to:
//! - Project voxel centers to silhouette pixels during carving
//! - Decide visibility (behind the camera or outside the frame means "not visible")
//!
//! There is no calibration step: every camera sits on a circle of known radius in
//! the horizontal plane and looks at the world origin.

use crate::core::math::look_at_basis;
use nalgebra::{Matrix3, Vector2, Vector3};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Points closer than this to the image plane (camera-space z) are not visible.
pub const DEPTH_EPSILON: f64 = 1e-6;

/// Integer pixel coordinate that is guaranteed to lie inside the image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pixel {
    pub x: u32,
    pub y: u32,
}

/// A pinhole camera with a look-at orientation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Camera {
    /// Camera center in world coordinates
    pub position: Vector3<f64>,

    /// Orientation; columns are `[right, up, forward]` expressed in world space
    pub basis: Matrix3<f64>,

    /// Intrinsic matrix K (focal length + principal point, in pixels)
    pub intrinsics: Matrix3<f64>,

    /// Image width (pixels)
    pub width: u32,

    /// Image height (pixels)
    pub height: u32,
}

impl Camera {
    /// Create a new camera from explicit pose and intrinsics.
    pub fn new(
        position: Vector3<f64>,
        basis: Matrix3<f64>,
        intrinsics: Matrix3<f64>,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            position,
            basis,
            intrinsics,
            width,
            height,
        }
    }

    /// Create a camera at `position` oriented to look at `target`.
    pub fn look_at(
        position: Vector3<f64>,
        target: Vector3<f64>,
        intrinsics: Matrix3<f64>,
        width: u32,
        height: u32,
    ) -> Self {
        Self::new(position, look_at_basis(&position, &target), intrinsics, width, height)
    }

    /// Camera `index` of `count` evenly spaced on a horizontal circle of `radius`,
    /// looking at the origin.
    ///
    /// θᵢ = 2πi/N, position = (r·cos θᵢ, 0, r·sin θᵢ)
    pub fn on_circle(
        index: usize,
        count: usize,
        radius: f64,
        width: u32,
        height: u32,
        focal_scale: f64,
    ) -> Self {
        let angle = TAU * index as f64 / count.max(1) as f64;
        let position = Vector3::new(radius * angle.cos(), 0.0, radius * angle.sin());

        Self::look_at(
            position,
            Vector3::zeros(),
            pinhole_intrinsics(width, height, focal_scale),
            width,
            height,
        )
    }

    /// Transform a point from world coordinates to camera coordinates.
    ///
    /// p_camera = Rᵀ · (p_world − position)
    pub fn world_to_camera(&self, point_world: &Vector3<f64>) -> Vector3<f64> {
        self.basis.transpose() * (point_world - self.position)
    }

    /// Project a point in camera coordinates to continuous pixel coordinates.
    ///
    /// Returns None if the point is behind or on the camera plane (z <= ε).
    pub fn project(&self, point_camera: &Vector3<f64>) -> Option<Vector2<f64>> {
        if point_camera.z <= DEPTH_EPSILON {
            return None;
        }

        let proj = self.intrinsics * (point_camera / point_camera.z);
        Some(Vector2::new(proj.x, proj.y))
    }

    /// Project a world point to an integer pixel inside the image.
    ///
    /// Coordinates are rounded to the nearest pixel (ties away from zero) and then
    /// checked against `[0, width)` × `[0, height)`. Anything else is "not visible".
    pub fn world_to_pixel(&self, point_world: &Vector3<f64>) -> Option<Pixel> {
        let uv = self.project(&self.world_to_camera(point_world))?;
        let u = uv.x.round();
        let v = uv.y.round();

        // NaN fails both comparisons and is rejected here too
        if !(u >= 0.0 && v >= 0.0 && u < self.width as f64 && v < self.height as f64) {
            return None;
        }

        Some(Pixel {
            x: u as u32,
            y: v as u32,
        })
    }

    /// Unit vector from the camera center towards `point_world`.
    pub fn view_direction(&self, point_world: &Vector3<f64>) -> Vector3<f64> {
        (point_world - self.position).normalize()
    }

    /// Forward axis (third basis column).
    pub fn forward(&self) -> Vector3<f64> {
        self.basis.column(2).into_owned()
    }
}

/// Pinhole intrinsics with `f = focal_scale × width` and the principal point at
/// the image center.
pub fn pinhole_intrinsics(width: u32, height: u32, focal_scale: f64) -> Matrix3<f64> {
    let f = width as f64 * focal_scale;
    let cx = width as f64 / 2.0;
    let cy = height as f64 / 2.0;

    Matrix3::new(
        f, 0.0, cx, //
        0.0, f, cy, //
        0.0, 0.0, 1.0,
    )
}

/// N cameras evenly spaced on a circle, all looking at the origin.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct CameraRing {
    /// Number of viewpoints on the circle
    pub count: usize,

    /// Circle radius (camera distance from the origin)
    pub radius: f64,

    /// Focal length as a multiple of image width
    pub focal_scale: f64,
}

impl CameraRing {
    pub fn new(count: usize, radius: f64, focal_scale: f64) -> Self {
        Self {
            count,
            radius,
            focal_scale,
        }
    }

    /// Camera for viewpoint `index` (0-based) with an image of the given size.
    pub fn camera(&self, index: usize, width: u32, height: u32) -> Camera {
        Camera::on_circle(index, self.count, self.radius, width, height, self.focal_scale)
    }

    /// All cameras of the ring, sharing one image size.
    pub fn cameras(&self, width: u32, height: u32) -> Vec<Camera> {
        (0..self.count)
            .map(|i| self.camera(i, width, height))
            .collect()
    }
}
