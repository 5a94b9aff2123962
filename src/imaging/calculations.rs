//! Pure calculation functions for crop geometry.
//!
//! All functions here are pure and testable without any I/O or images.

use super::params::Centering;

/// A crop window in source pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Calculate the largest crop of `source` that has the aspect ratio of
/// `target`, positioned by `centering`.
///
/// Resizing the returned window to `target` fills it exactly with no
/// letterboxing: the "cover" fit.
///
/// # Arguments
/// * `source` - Original image dimensions (width, height)
/// * `target` - Output dimensions (width, height); only the ratio matters here
/// * `centering` - Anchor of the window inside the spare area
///
/// # Examples
/// ```
/// # use stock_review::imaging::{Centering, CropRect, calculate_fit_crop};
/// // Landscape 800x600 to a square: keep the middle 600x600
/// let crop = calculate_fit_crop((800, 600), (500, 500), Centering::center());
/// assert_eq!(crop, CropRect { x: 100, y: 0, width: 600, height: 600 });
/// ```
pub fn calculate_fit_crop(source: (u32, u32), target: (u32, u32), centering: Centering) -> CropRect {
    let (src_w, src_h) = source;
    let (tgt_w, tgt_h) = target;

    if src_w == 0 || src_h == 0 || tgt_w == 0 || tgt_h == 0 {
        return CropRect {
            x: 0,
            y: 0,
            width: src_w,
            height: src_h,
        };
    }

    let src_aspect = src_w as f64 / src_h as f64;
    let tgt_aspect = tgt_w as f64 / tgt_h as f64;

    let (crop_w, crop_h) = if src_aspect > tgt_aspect {
        // Source is wider: full height, trim the sides
        let w = (src_h as f64 * tgt_aspect).round() as u32;
        (w.clamp(1, src_w), src_h)
    } else {
        // Source is taller (or equal): full width, trim top/bottom
        let h = (src_w as f64 / tgt_aspect).round() as u32;
        (src_w, h.clamp(1, src_h))
    };

    let x = ((src_w - crop_w) as f64 * centering.x as f64).round() as u32;
    let y = ((src_h - crop_h) as f64 * centering.y as f64).round() as u32;

    CropRect {
        x,
        y,
        width: crop_w,
        height: crop_h,
    }
}

/// Centered square crop, the window used for catalog images.
pub fn calculate_square_crop(source: (u32, u32), centering: Centering) -> CropRect {
    calculate_fit_crop(source, (1, 1), centering)
}
