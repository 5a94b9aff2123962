//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP) | `image::ImageReader` with content sniffing |
//! | Square crop | `DynamicImage::crop_imm` on the window from [`calculate_square_crop`] |
//! | Resize | `DynamicImage::resize_exact` with the `Lanczos3` filter |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` |

use super::backend::{BackendError, ImageBackend};
use super::calculations::calculate_square_crop;
use super::params::{NormalizeParams, Quality};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use std::path::Path;

/// Pure Rust backend using the `image` crate.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and decode an image from disk.
///
/// The format is sniffed from the content, so a PNG saved as `.jpg` still loads.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)
        .map_err(BackendError::Io)?
        .with_guessed_format()
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })
}

/// Encode an image as JPEG for serving.
///
/// JPEG has no alpha channel, so the image is flattened to RGB first.
pub fn encode_jpeg(img: &DynamicImage, quality: Quality) -> Result<Vec<u8>, BackendError> {
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    let mut buf = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buf, quality.value() as u8);
    rgb.write_with_encoder(encoder)
        .map_err(|e| BackendError::ProcessingFailed(format!("JPEG encode failed: {}", e)))?;
    Ok(buf)
}

impl ImageBackend for RustBackend {
    fn normalize(&self, params: &NormalizeParams) -> Result<DynamicImage, BackendError> {
        let img = load_image(&params.source)?;

        let crop = calculate_square_crop((img.width(), img.height()), params.centering);
        let square = img.crop_imm(crop.x, crop.y, crop.width, crop.height);

        Ok(square.resize_exact(params.size, params.size, FilterType::Lanczos3))
    }
}
