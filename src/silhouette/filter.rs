//! Luminance conversion and the 5×5 Gaussian pre-blur.

use image::{DynamicImage, GrayImage, Luma};

/// Single-channel 8-bit luminance of any decoded image.
pub fn luminance(image: &DynamicImage) -> GrayImage {
    image.to_luma8()
}

/// Separable 5-tap Gaussian, kernel `[1, 4, 6, 4, 1] / 16` per axis.
///
/// Borders replicate the edge pixel. Output is rounded back to `u8`.
pub fn gaussian_blur_5x5(input: &GrayImage) -> GrayImage {
    let (w, h) = input.dimensions();
    let mut out = GrayImage::new(w, h);
    if w == 0 || h == 0 {
        return out;
    }

    let px = |x: u32, y: u32| input.get_pixel(x, y)[0] as f32;
    let mut tmp = vec![0.0f32; (w * h) as usize];

    // horizontal
    for y in 0..h {
        for x in 0..w {
            let xm1 = x.saturating_sub(1);
            let xm2 = x.saturating_sub(2);
            let xp1 = (x + 1).min(w - 1);
            let xp2 = (x + 2).min(w - 1);
            tmp[(y * w + x) as usize] = (px(xm2, y)
                + 4.0 * px(xm1, y)
                + 6.0 * px(x, y)
                + 4.0 * px(xp1, y)
                + px(xp2, y))
                * (1.0 / 16.0);
        }
    }

    // vertical
    let t = |x: u32, y: u32| tmp[(y * w + x) as usize];
    for y in 0..h {
        let ym1 = y.saturating_sub(1);
        let ym2 = y.saturating_sub(2);
        let yp1 = (y + 1).min(h - 1);
        let yp2 = (y + 2).min(h - 1);
        for x in 0..w {
            let v = (t(x, ym2) + 4.0 * t(x, ym1) + 6.0 * t(x, y) + 4.0 * t(x, yp1) + t(x, yp2))
                * (1.0 / 16.0);
            out.put_pixel(x, y, Luma([v.round().clamp(0.0, 255.0) as u8]));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blur_keeps_flat_image_flat() {
        let img = GrayImage::from_pixel(7, 5, Luma([90]));
        let blurred = gaussian_blur_5x5(&img);
        assert!(blurred.pixels().all(|p| p[0] == 90));
    }

    #[test]
    fn test_blur_spreads_single_spike() {
        let mut img = GrayImage::new(9, 9);
        img.put_pixel(4, 4, Luma([255]));
        let blurred = gaussian_blur_5x5(&img);

        // Center weight is (6/16)² of 255 ≈ 35.9
        assert_eq!(blurred.get_pixel(4, 4)[0], 36);
        assert!(blurred.get_pixel(6, 4)[0] > 0);
        assert_eq!(blurred.get_pixel(7, 4)[0], 0);
    }

    #[test]
    fn test_blur_handles_tiny_images() {
        let img = GrayImage::from_pixel(1, 2, Luma([10]));
        let blurred = gaussian_blur_5x5(&img);
        assert_eq!(blurred.dimensions(), (1, 2));
        assert_eq!(blurred.get_pixel(0, 1)[0], 10);
    }
}
