//! Image normalization in pure Rust.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Normalize** | center square crop + Lanczos3 `resize_exact` |
//! | **Serve** | JPEG encode of the normalized image |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for crop geometry (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: [`Normalizer`], which resolves catalog references and
//!   turns every failure into [`NormalizedImage::Missing`]

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend};
pub use calculations::{CropRect, calculate_fit_crop, calculate_square_crop};
pub use operations::{NormalizeConfig, NormalizedImage, Normalizer, resolve_image_path};
pub use params::{Centering, NormalizeParams, Quality};
pub use rust_backend::{RustBackend, encode_jpeg};
