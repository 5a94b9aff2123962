//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the high-level [`operations`](super::operations) module
//! (which decides which file to normalize and to what size) and the
//! [`backend`](super::backend) (which does the pixel work).
//!
//! ## Types
//!
//! - [`Quality`]: Lossy encoding quality (1–100, default 85). Clamped on construction.
//! - [`Centering`]: Crop anchor as fractions of the spare width/height (default: exact center).
//! - [`NormalizeParams`]: Everything one normalize needs: source, square edge, anchor.

use std::path::PathBuf;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(85)
    }
}

/// Where the crop window sits inside the source image.
///
/// `x = 0.0` keeps the left edge, `1.0` the right edge; `0.5` cuts equally
/// from both sides. Same for `y`. Values are clamped to `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Centering {
    pub x: f32,
    pub y: f32,
}

impl Centering {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x: x.clamp(0.0, 1.0),
            y: y.clamp(0.0, 1.0),
        }
    }

    pub fn center() -> Self {
        Self { x: 0.5, y: 0.5 }
    }
}

impl Default for Centering {
    fn default() -> Self {
        Self::center()
    }
}

/// Parameters for a normalize operation (crop to square + resize).
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizeParams {
    pub source: PathBuf,
    /// Edge of the square output.
    pub size: u32,
    pub centering: Centering,
}
