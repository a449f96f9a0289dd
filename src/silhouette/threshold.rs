//! Otsu's automatic global threshold.
//!
//! Picks the gray level `t` maximizing between-class variance
//! `w0 · w1 · (μ0 − μ1)²`, where class 0 is `≤ t` and class 1 is `> t`.
//! The first maximum wins, so a single-valued histogram yields `t = 0`.

use image::GrayImage;

/// 256-bin intensity histogram.
pub fn histogram(image: &GrayImage) -> [u64; 256] {
    let mut hist = [0u64; 256];
    for p in image.pixels() {
        hist[p[0] as usize] += 1;
    }
    hist
}

/// Otsu threshold of an 8-bit image. Pixels strictly above it are class 1.
pub fn otsu_threshold(image: &GrayImage) -> u8 {
    otsu_from_histogram(&histogram(image))
}

pub fn otsu_from_histogram(hist: &[u64; 256]) -> u8 {
    let total: u64 = hist.iter().sum();
    let sum_all: f64 = hist
        .iter()
        .enumerate()
        .map(|(i, &c)| i as f64 * c as f64)
        .sum();

    let mut w0 = 0u64;
    let mut sum0 = 0.0f64;
    let mut best_t = 0u8;
    let mut best_var = 0.0f64;

    for (t, &count) in hist.iter().enumerate() {
        w0 += count;
        sum0 += t as f64 * count as f64;
        if w0 == 0 {
            continue;
        }
        let w1 = total - w0;
        if w1 == 0 {
            break;
        }

        let mu0 = sum0 / w0 as f64;
        let mu1 = (sum_all - sum0) / w1 as f64;
        let var = w0 as f64 * w1 as f64 * (mu0 - mu1) * (mu0 - mu1);
        if var > best_var {
            best_var = var;
            best_t = t as u8;
        }
    }

    best_t
}
