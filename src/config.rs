//! Reconstruction settings.
//!
//! Everything a run needs is passed explicitly in one [`ReconstructionConfig`];
//! there is no process-wide state. Configs can be written by hand as JSON, and
//! any omitted field takes its default:
//!
//! ```json
//! {
//!     "grid_resolution": 48,
//!     "image_count": 8,
//!     "images_dir": "scan_images",
//!     "output": "scan_images/result_visual_hull.ply",
//!     "silhouette": { "kernel_size": 7 }
//! }
//! ```

use crate::core::CameraRing;
use crate::io::LoadError;
use crate::pipeline::ReconstructError;
use crate::silhouette::SilhouetteOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default circle radius of the camera ring.
pub const DEFAULT_CAMERA_RADIUS: f64 = 2.5;

/// Default focal length, as a multiple of image width. Not calibrated; tune freely.
pub const DEFAULT_FOCAL_SCALE: f64 = 1.2;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconstructionConfig {
    /// Voxels per axis (`G`)
    pub grid_resolution: usize,

    /// Number of numbered images, and of ring cameras (`N`)
    pub image_count: usize,

    /// Folder holding `01.png ..= NN.png`
    pub images_dir: PathBuf,

    /// Destination of the point cloud
    pub output: PathBuf,

    /// Launch `viewer` on the output after export
    pub display: bool,

    /// External viewer command; receives the output path as its only argument
    pub viewer: Option<String>,

    /// Camera distance from the origin
    pub camera_radius: f64,

    /// Focal length = `focal_scale × image width`
    pub focal_scale: f64,

    pub silhouette: SilhouetteOptions,

    /// Write each view's mask here as `NN_mask.png` before carving
    pub silhouette_dump: Option<PathBuf>,

    /// Carve x-slices on the rayon pool
    pub parallel: bool,

    /// Also compute the convex-hull boundary of the result
    pub boundary: bool,

    /// Where to write the boundary mesh (`.obj`, anything else is PLY)
    pub boundary_output: Option<PathBuf>,
}

impl Default for ReconstructionConfig {
    fn default() -> Self {
        Self {
            grid_resolution: 40,
            image_count: 8,
            images_dir: PathBuf::from("scan_images"),
            output: PathBuf::from("scan_images/result_visual_hull.ply"),
            display: false,
            viewer: None,
            camera_radius: DEFAULT_CAMERA_RADIUS,
            focal_scale: DEFAULT_FOCAL_SCALE,
            silhouette: SilhouetteOptions::default(),
            silhouette_dump: None,
            parallel: true,
            boundary: false,
            boundary_output: None,
        }
    }
}

impl ReconstructionConfig {
    /// Read a JSON config. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, LoadError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self, LoadError> {
        serde_json::from_str(text).map_err(|e| LoadError::InvalidFormat(format!("config: {e}")))
    }

    /// Reject settings the engine cannot run with.
    pub fn validate(&self) -> Result<(), ReconstructError> {
        let invalid = |msg: String| Err(ReconstructError::InvalidConfig(msg));

        if self.grid_resolution == 0 {
            return invalid("grid_resolution must be at least 1".to_string());
        }
        if self.image_count == 0 {
            return invalid("image_count must be at least 1".to_string());
        }
        if !(self.camera_radius.is_finite() && self.camera_radius > 0.0) {
            return invalid(format!("camera_radius must be positive, got {}", self.camera_radius));
        }
        if !(self.focal_scale.is_finite() && self.focal_scale > 0.0) {
            return invalid(format!("focal_scale must be positive, got {}", self.focal_scale));
        }
        let k = self.silhouette.kernel_size;
        if k == 0 || k % 2 == 0 {
            return invalid(format!("silhouette.kernel_size must be odd, got {k}"));
        }
        if self.silhouette.open_iterations == 0 {
            return invalid("silhouette.open_iterations must be at least 1".to_string());
        }
        if self.silhouette.close_iterations == 0 {
            return invalid("silhouette.close_iterations must be at least 1".to_string());
        }
        Ok(())
    }

    /// The camera arrangement these settings describe.
    pub fn camera_ring(&self) -> CameraRing {
        CameraRing::new(self.image_count, self.camera_radius, self.focal_scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ReconstructionConfig::default();
        assert_eq!(config.grid_resolution, 40);
        assert_eq!(config.image_count, 8);
        assert!(!config.display);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = ReconstructionConfig::from_json_str(
            r#"{ "grid_resolution": 24, "silhouette": { "kernel_size": 7 } }"#,
        )
        .unwrap();
        assert_eq!(config.grid_resolution, 24);
        assert_eq!(config.image_count, 8);
        assert_eq!(config.silhouette.kernel_size, 7);
        assert_eq!(config.silhouette.close_iterations, 2);
    }

    #[test]
    fn test_validate_rejects_zero_grid() {
        let config = ReconstructionConfig {
            grid_resolution: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ReconstructError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_rejects_even_kernel() {
        let mut config = ReconstructionConfig::default();
        config.silhouette.kernel_size = 4;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_morphology_passes() {
        let mut config = ReconstructionConfig::default();
        config.silhouette.open_iterations = 0;
        assert!(matches!(
            config.validate(),
            Err(ReconstructError::InvalidConfig(_))
        ));

        let mut config = ReconstructionConfig::default();
        config.silhouette.close_iterations = 0;
        assert!(matches!(
            config.validate(),
            Err(ReconstructError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_bad_json_is_invalid_format() {
        let err = ReconstructionConfig::from_json_str("{ grid_resolution: }").unwrap_err();
        assert!(matches!(err, LoadError::InvalidFormat(_)));
    }
}
