//! Geometry helpers (look-at frames, grid coordinate mapping).

use nalgebra::{Matrix3, Vector3};

/// When |forward · up| exceeds this, the world-up reference is swapped for +z.
pub const PARALLEL_THRESHOLD: f64 = 0.999;

/// Build an orthonormal look-at frame from `eye` towards `target`.
///
/// Columns are `[right, up, forward]`:
/// - forward = normalize(target − eye)
/// - right   = normalize(forward × up_ref), up_ref = +y (or +z when forward ∥ +y)
/// - up      = right × forward
///
/// Coincident `eye` and `target` fall back to forward = +z.
pub fn look_at_basis(eye: &Vector3<f64>, target: &Vector3<f64>) -> Matrix3<f64> {
    let offset = target - eye;
    let forward = if offset.norm() < 1e-8 {
        Vector3::z()
    } else {
        offset.normalize()
    };

    let up_ref = if forward.dot(&Vector3::y()).abs() > PARALLEL_THRESHOLD {
        Vector3::z()
    } else {
        Vector3::y()
    };

    let right = forward.cross(&up_ref).normalize();
    let up = right.cross(&forward);

    Matrix3::from_columns(&[right, up, forward])
}

/// Evenly spaced sample `index` of `count` over `[-1, 1]` (endpoints included).
///
/// Matches `linspace(-1, 1, count)`: a single sample sits at -1.
pub fn unit_linspace(index: usize, count: usize) -> f64 {
    if count <= 1 {
        return -1.0;
    }
    -1.0 + 2.0 * index as f64 / (count - 1) as f64
}
