//! I/O operations for loading and saving data.
//!
//! This module handles all file access:
//! - Numbered input photographs (`01.png`, `02.png`, ...)
//! - ASCII PLY point clouds (write and read back)
//! - Boundary mesh export (PLY with faces, OBJ)

mod images;
mod obj;
mod ply;

use std::path::PathBuf;
use thiserror::Error;

// Re-export public types and functions
pub use images::{
    image_path, load_numbered_images, mask_path, save_mask, LoadedImage, NumberedImages,
    SkippedImage,
};
pub use obj::save_obj;
pub use ply::{load_point_ply, save_mesh_ply, save_point_ply, write_point_ply};

/// Errors that can occur while reading inputs or writing outputs.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid file format: {0}")]
    InvalidFormat(String),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("No input images found in {}", dir.display())]
    NoImages { dir: PathBuf },

    #[error("None of the {attempted} images in {} could be decoded", dir.display())]
    NoReadableImages { dir: PathBuf, attempted: usize },
}
