//! Loading the numbered photographs of one scan.
//!
//! Files are named by a zero-padded 1-based number: `01.png` … `08.png`.
//! Image `k` was taken by ring camera `k − 1`, and that pairing is preserved even
//! when some files are missing or unreadable.

use crate::io::LoadError;
use crate::silhouette::Silhouette;
use image::DynamicImage;
use std::path::{Path, PathBuf};

/// Path of image number `number` (1-based) inside `dir`.
pub fn image_path(dir: &Path, number: usize) -> PathBuf {
    dir.join(format!("{number:02}.png"))
}

/// Path of the extracted mask for image `number` inside `dir`.
pub fn mask_path(dir: &Path, number: usize) -> PathBuf {
    dir.join(format!("{number:02}_mask.png"))
}

/// Write a silhouette as a black/white PNG, creating `path`'s folder if needed.
pub fn save_mask(mask: &Silhouette, path: &Path) -> Result<(), LoadError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    mask.to_image().save(path)?;
    Ok(())
}

/// A decoded input photograph.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    /// 1-based file number
    pub number: usize,
    pub path: PathBuf,
    pub image: DynamicImage,
}

impl LoadedImage {
    /// 0-based index of the ring camera that took this photo.
    pub fn camera_index(&self) -> usize {
        self.number - 1
    }
}

/// An expected image that did not make it into the reconstruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedImage {
    pub number: usize,
    pub path: PathBuf,
    pub reason: String,
}

/// Result of scanning a folder for `01.png ..= NN.png`.
#[derive(Debug, Clone)]
pub struct NumberedImages {
    pub images: Vec<LoadedImage>,
    pub skipped: Vec<SkippedImage>,
}

/// Load images `1..=count` from `dir`.
///
/// Missing and undecodable files are skipped with a warning and listed in
/// `skipped`. Fails only when nothing usable remains:
/// - `NoImages` if none of the files exist
/// - `NoReadableImages` if some exist but none decode
pub fn load_numbered_images(dir: &Path, count: usize) -> Result<NumberedImages, LoadError> {
    let mut images = Vec::with_capacity(count);
    let mut skipped = Vec::new();
    let mut attempted = 0;

    for number in 1..=count {
        let path = image_path(dir, number);

        if !path.is_file() {
            log::warn!("missing image: {}", path.display());
            skipped.push(SkippedImage {
                number,
                path,
                reason: "file not found".to_string(),
            });
            continue;
        }

        attempted += 1;
        match image::open(&path) {
            Ok(image) => {
                log::info!(
                    "loaded {} ({}x{})",
                    path.display(),
                    image.width(),
                    image.height()
                );
                images.push(LoadedImage {
                    number,
                    path,
                    image,
                });
            }
            Err(e) => {
                log::warn!("skipping unreadable image {}: {e}", path.display());
                skipped.push(SkippedImage {
                    number,
                    path,
                    reason: e.to_string(),
                });
            }
        }
    }

    if attempted == 0 {
        return Err(LoadError::NoImages {
            dir: dir.to_path_buf(),
        });
    }
    if images.is_empty() {
        return Err(LoadError::NoReadableImages {
            dir: dir.to_path_buf(),
            attempted,
        });
    }

    log::info!("loaded {}/{} images", images.len(), count);
    Ok(NumberedImages { images, skipped })
}
