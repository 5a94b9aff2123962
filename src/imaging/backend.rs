//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait is the seam between normalization planning and
//! pixel work. The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate.

use super::params::NormalizeParams;
use image::DynamicImage;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Trait for image processing backends.
pub trait ImageBackend: Send + Sync {
    /// Decode the source, crop it to a square and resize to `params.size`.
    fn normalize(&self, params: &NormalizeParams) -> Result<DynamicImage, BackendError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::imaging::Centering;
    use std::sync::Mutex;

    /// Mock backend that records operations and returns blank images.
    #[derive(Default)]
    pub struct MockBackend {
        pub fail_normalize: bool,
        pub operations: Mutex<Vec<RecordedOp>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Normalize {
            source: String,
            size: u32,
            centering: (f32, f32),
        },
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing() -> Self {
            Self {
                fail_normalize: true,
                ..Self::default()
            }
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }
    }

    impl ImageBackend for MockBackend {
        fn normalize(&self, params: &NormalizeParams) -> Result<DynamicImage, BackendError> {
            self.operations.lock().unwrap().push(RecordedOp::Normalize {
                source: params.source.to_string_lossy().to_string(),
                size: params.size,
                centering: (params.centering.x, params.centering.y),
            });
            if self.fail_normalize {
                return Err(BackendError::ProcessingFailed("mock decode failure".into()));
            }
            Ok(DynamicImage::new_rgb8(params.size, params.size))
        }
    }

    #[test]
    fn mock_records_normalize() {
        let backend = MockBackend::new();

        let img = backend
            .normalize(&NormalizeParams {
                source: "/images/milk.jpg".into(),
                size: 500,
                centering: Centering::center(),
            })
            .unwrap();
        assert_eq!((img.width(), img.height()), (500, 500));

        let ops = backend.get_operations();
        assert_eq!(
            ops,
            vec![RecordedOp::Normalize {
                source: "/images/milk.jpg".to_string(),
                size: 500,
                centering: (0.5, 0.5),
            }]
        );
    }
}
