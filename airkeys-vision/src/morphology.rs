//! Binary morphology used to clean the segmentation masks.

use crate::mask::Mask;

/// The fixed cleaning chain applied to every cue mask before combination:
/// median blur, then opening, then closing. Removes speckle noise and fills
/// small holes without per-cue tuning.
pub fn clean(mask: &Mask) -> Mask {
    close(&open(&median_blur(mask, 5), 3), 3)
}

/// Median filter on a binary mask: a pixel becomes foreground when the
/// majority of its `kernel x kernel` neighborhood is foreground. Edges are
/// handled by replicating the border pixel.
pub fn median_blur(mask: &Mask, kernel: usize) -> Mask {
    let (w, h) = (mask.width(), mask.height());
    let mut out = Mask::new(w, h);
    let r = (kernel / 2) as i64;
    let majority = (kernel * kernel / 2) as u32;
    for y in 0..h as i64 {
        for x in 0..w as i64 {
            let mut count = 0u32;
            for dy in -r..=r {
                for dx in -r..=r {
                    let nx = (x + dx).clamp(0, w as i64 - 1);
                    let ny = (y + dy).clamp(0, h as i64 - 1);
                    if mask.is_set(nx, ny) {
                        count += 1;
                    }
                }
            }
            out.set(x as usize, y as usize, count > majority);
        }
    }
    out
}

/// Erosion with a 3x3 kernel: foreground survives only where the whole
/// neighborhood is foreground. Pixels outside the mask count as background.
pub fn erode(mask: &Mask) -> Mask {
    let (w, h) = (mask.width(), mask.height());
    let mut out = Mask::new(w, h);
    for y in 0..h as i64 {
        for x in 0..w as i64 {
            let mut all = true;
            'window: for dy in -1..=1 {
                for dx in -1..=1 {
                    if !mask.is_set(x + dx, y + dy) {
                        all = false;
                        break 'window;
                    }
                }
            }
            out.set(x as usize, y as usize, all);
        }
    }
    out
}

/// Dilation with a 3x3 kernel: any foreground neighbor spreads.
pub fn dilate(mask: &Mask) -> Mask {
    let (w, h) = (mask.width(), mask.height());
    let mut out = Mask::new(w, h);
    for y in 0..h as i64 {
        for x in 0..w as i64 {
            let mut any = false;
            'window: for dy in -1..=1 {
                for dx in -1..=1 {
                    if mask.is_set(x + dx, y + dy) {
                        any = true;
                        break 'window;
                    }
                }
            }
            out.set(x as usize, y as usize, any);
        }
    }
    out
}

/// Opening: `iterations` erosions followed by `iterations` dilations.
pub fn open(mask: &Mask, iterations: usize) -> Mask {
    let mut out = mask.clone();
    for _ in 0..iterations {
        out = erode(&out);
    }
    for _ in 0..iterations {
        out = dilate(&out);
    }
    out
}

/// Closing: `iterations` dilations followed by `iterations` erosions.
pub fn close(mask: &Mask, iterations: usize) -> Mask {
    let mut out = mask.clone();
    for _ in 0..iterations {
        out = dilate(&out);
    }
    for _ in 0..iterations {
        out = erode(&out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_removes_speckle() {
        let mut mask = Mask::new(32, 32);
        mask.set(10, 10, true);
        mask.set(20, 5, true);
        assert_eq!(clean(&mask).count_nonzero(), 0);
    }

    #[test]
    fn test_clean_keeps_large_blob() {
        let mut mask = Mask::new(64, 64);
        mask.fill_rect(10, 10, 50, 50);
        let cleaned = clean(&mask);
        assert!(cleaned.is_set(30, 30));
        // The interior survives even if the rim rounds off.
        assert!(cleaned.count_nonzero() >= 34 * 34);
    }

    #[test]
    fn test_close_fills_small_hole() {
        let mut mask = Mask::new(32, 32);
        mask.fill_rect(4, 4, 28, 28);
        mask.set(16, 16, false);
        mask.set(17, 16, false);
        let closed = close(&mask, 3);
        assert!(closed.is_set(16, 16));
        assert!(closed.is_set(17, 16));
    }

    #[test]
    fn test_erode_dilate_are_duals_on_blob_interior() {
        let mut mask = Mask::new(16, 16);
        mask.fill_rect(4, 4, 12, 12);
        let eroded = erode(&mask);
        assert!(!eroded.is_set(4, 4));
        assert!(eroded.is_set(7, 7));
        let dilated = dilate(&mask);
        assert!(dilated.is_set(3, 3));
    }
}
