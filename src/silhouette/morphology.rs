//! Binary morphology with an elliptical structuring element.
//!
//! Pixels outside the image never influence the result: erosion ignores them
//! and dilation never grows from them.

use crate::silhouette::Silhouette;

/// Binary structuring element, anchored at its center.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructuringElement {
    size: usize,
    offsets: Vec<(i32, i32)>,
}

impl StructuringElement {
    /// Filled ellipse inscribed in a `size × size` box.
    ///
    /// Row `i` spans columns `c − dx ..= c + dx` with
    /// `dx = round(c · sqrt(1 − ((i − r)/r)²))`, the same raster rule OpenCV uses.
    /// For size 5 that is a 3×5 core with single-pixel caps.
    pub fn ellipse(size: usize) -> Self {
        let size = size.max(1);
        let r = (size / 2) as i32;
        let c = r;
        let inv_r2 = if r > 0 { 1.0 / (r * r) as f64 } else { 0.0 };

        let mut offsets = Vec::new();
        for i in 0..size as i32 {
            let dy = i - r;
            if dy.abs() > r {
                continue;
            }
            let dx = (c as f64 * (((r * r - dy * dy) as f64) * inv_r2).sqrt()).round() as i32;
            let j1 = (c - dx).max(0);
            let j2 = (c + dx + 1).min(size as i32);
            for j in j1..j2 {
                offsets.push((j - c, dy));
            }
        }

        Self { size, offsets }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// `(dx, dy)` offsets of the set pixels relative to the anchor.
    pub fn offsets(&self) -> &[(i32, i32)] {
        &self.offsets
    }
}

fn neighbors<'a>(
    mask: &'a Silhouette,
    kernel: &'a StructuringElement,
    x: u32,
    y: u32,
) -> impl Iterator<Item = bool> + 'a {
    let (w, h) = (mask.width() as i64, mask.height() as i64);
    kernel.offsets.iter().filter_map(move |&(dx, dy)| {
        let nx = x as i64 + dx as i64;
        let ny = y as i64 + dy as i64;
        if nx < 0 || ny < 0 || nx >= w || ny >= h {
            return None;
        }
        Some(mask.get(nx as u32, ny as u32))
    })
}

/// Foreground survives only where every covered in-image pixel is foreground.
pub fn erode(mask: &Silhouette, kernel: &StructuringElement) -> Silhouette {
    Silhouette::from_fn(mask.width(), mask.height(), |x, y| {
        neighbors(mask, kernel, x, y).all(|v| v)
    })
}

/// Foreground wherever any covered pixel is foreground.
pub fn dilate(mask: &Silhouette, kernel: &StructuringElement) -> Silhouette {
    Silhouette::from_fn(mask.width(), mask.height(), |x, y| {
        neighbors(mask, kernel, x, y).any(|v| v)
    })
}

/// `iterations` erosions followed by as many dilations. Removes speckles.
pub fn open(mask: &Silhouette, kernel: &StructuringElement, iterations: usize) -> Silhouette {
    let mut out = mask.clone();
    for _ in 0..iterations {
        out = erode(&out, kernel);
    }
    for _ in 0..iterations {
        out = dilate(&out, kernel);
    }
    out
}

/// `iterations` dilations followed by as many erosions. Fills pinholes.
pub fn close(mask: &Silhouette, kernel: &StructuringElement, iterations: usize) -> Silhouette {
    let mut out = mask.clone();
    for _ in 0..iterations {
        out = dilate(&out, kernel);
    }
    for _ in 0..iterations {
        out = erode(&out, kernel);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ellipse_5x5_shape() {
        let k = StructuringElement::ellipse(5);
        // 1 + 5 + 5 + 5 + 1
        assert_eq!(k.offsets().len(), 17);
        assert!(k.offsets().contains(&(0, -2)));
        assert!(!k.offsets().contains(&(1, -2)));
        assert!(k.offsets().contains(&(-2, 0)));
    }

    #[test]
    fn test_open_removes_speckle() {
        let mut mask = Silhouette::filled(20, 20, false);
        mask.set(3, 3, true);
        let cleaned = open(&mask, &StructuringElement::ellipse(5), 1);
        assert_eq!(cleaned.foreground_count(), 0);
    }

    #[test]
    fn test_close_fills_pinhole() {
        let mut mask = Silhouette::from_fn(21, 21, |x, y| {
            let dx = x as i32 - 10;
            let dy = y as i32 - 10;
            dx * dx + dy * dy <= 49
        });
        mask.set(10, 10, false);
        let filled = close(&mask, &StructuringElement::ellipse(5), 1);
        assert!(filled.get(10, 10));
    }

    #[test]
    fn test_full_mask_is_stable() {
        let mask = Silhouette::filled(6, 4, true);
        let k = StructuringElement::ellipse(5);
        assert_eq!(open(&mask, &k, 1), mask);
        assert_eq!(close(&mask, &k, 2), mask);
    }
}
