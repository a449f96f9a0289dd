//! Silhouette extraction: photo in, binary foreground mask out.
//!
//! Pipeline:
//! 1. Luminance
//! 2. 5×5 Gaussian blur (optional)
//! 3. Otsu threshold (`value > t` is class 1)
//! 4. Polarity correction: if more than half the frame is class 1, invert it.
//!    The rig shoots a dark object against a light backdrop, but exposure can
//!    flip which class is which; the object is assumed to be the minority.
//! 5. Opening then closing with an elliptical kernel
//!
//! Degenerate frames (a single flat color) come out all background. That is an
//! accuracy problem for that view, not an error.

pub mod filter;
pub mod morphology;
pub mod threshold;

use image::{DynamicImage, GrayImage, Luma};
use serde::{Deserialize, Serialize};

pub use filter::{gaussian_blur_5x5, luminance};
pub use morphology::{close, dilate, erode, open, StructuringElement};
pub use threshold::otsu_threshold;

/// Binary mask with the same size as its source image; `true` is foreground.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Silhouette {
    width: u32,
    height: u32,
    mask: Vec<bool>,
}

impl Silhouette {
    /// Wrap a row-major mask. Returns None if the length is not `width × height`.
    pub fn new(width: u32, height: u32, mask: Vec<bool>) -> Option<Self> {
        if mask.len() != width as usize * height as usize {
            return None;
        }
        Some(Self {
            width,
            height,
            mask,
        })
    }

    /// Every pixel set to `value`.
    pub fn filled(width: u32, height: u32, value: bool) -> Self {
        Self {
            width,
            height,
            mask: vec![value; width as usize * height as usize],
        }
    }

    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> bool) -> Self {
        let mut mask = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                mask.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            mask,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Foreground test. Coordinates outside the mask read as background.
    pub fn get(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.mask[y as usize * self.width as usize + x as usize]
    }

    /// Set one pixel. Out-of-range writes are ignored.
    pub fn set(&mut self, x: u32, y: u32, value: bool) {
        if x < self.width && y < self.height {
            self.mask[y as usize * self.width as usize + x as usize] = value;
        }
    }

    /// Swap foreground and background.
    pub fn invert(&mut self) {
        self.mask.iter_mut().for_each(|v| *v = !*v);
    }

    pub fn foreground_count(&self) -> usize {
        self.mask.iter().filter(|&&v| v).count()
    }

    /// Share of foreground pixels in `[0, 1]`; 0 for an empty mask.
    pub fn foreground_fraction(&self) -> f64 {
        if self.mask.is_empty() {
            return 0.0;
        }
        self.foreground_count() as f64 / self.mask.len() as f64
    }

    /// 0/255 grayscale rendering of the mask.
    pub fn to_image(&self) -> GrayImage {
        GrayImage::from_fn(self.width, self.height, |x, y| {
            Luma([if self.get(x, y) { 255 } else { 0 }])
        })
    }
}

/// Tunables for [`extract_silhouette`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SilhouetteOptions {
    /// Apply the 5×5 Gaussian before thresholding
    pub blur: bool,

    /// Elliptical structuring element size (odd)
    pub kernel_size: usize,

    /// Opening passes (speckle removal), at least 1
    pub open_iterations: usize,

    /// Closing passes (hole filling), at least 1
    pub close_iterations: usize,
}

impl Default for SilhouetteOptions {
    fn default() -> Self {
        Self {
            blur: true,
            kernel_size: 5,
            open_iterations: 1,
            close_iterations: 2,
        }
    }
}

/// Binary class-1 mask of an already-thresholded gray image, with polarity fixed.
fn polarized_mask(gray: &GrayImage, threshold: u8) -> Silhouette {
    let mut mask = Silhouette::from_fn(gray.width(), gray.height(), |x, y| {
        gray.get_pixel(x, y)[0] > threshold
    });
    if mask.foreground_fraction() > 0.5 {
        mask.invert();
    }
    mask
}

/// Convert one photograph into its silhouette.
pub fn extract_silhouette(image: &DynamicImage, options: &SilhouetteOptions) -> Silhouette {
    let gray = luminance(image);
    let gray = if options.blur {
        gaussian_blur_5x5(&gray)
    } else {
        gray
    };

    let threshold = otsu_threshold(&gray);
    let mask = polarized_mask(&gray, threshold);

    let kernel = StructuringElement::ellipse(options.kernel_size);
    let mask = open(&mask, &kernel, options.open_iterations);
    let mask = close(&mask, &kernel, options.close_iterations);

    log::debug!(
        "silhouette {}x{}: otsu={} foreground={} px ({:.1}%)",
        mask.width(),
        mask.height(),
        threshold,
        mask.foreground_count(),
        100.0 * mask.foreground_fraction()
    );

    mask
}
