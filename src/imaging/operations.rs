//! High-level image operations.
//!
//! These functions resolve a catalog image reference against the image
//! store, decide whether there is anything to process, and call the backend.
//! Every failure ends in [`NormalizedImage::Missing`]; nothing here returns
//! an error to the caller.

use super::backend::ImageBackend;
use super::params::{Centering, NormalizeParams};
use image::DynamicImage;
use std::path::{Component, Path, PathBuf};

/// Outcome of normalizing a product image.
#[derive(Debug, Clone)]
pub enum NormalizedImage {
    Found(DynamicImage),
    /// No usable image: empty reference, missing file, or undecodable data.
    Missing,
}

impl NormalizedImage {
    pub fn is_found(&self) -> bool {
        matches!(self, NormalizedImage::Found(_))
    }
}

/// Configuration for normalization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizeConfig {
    /// Edge of the square output in pixels.
    pub size: u32,
    pub centering: Centering,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            size: 500,
            centering: Centering::center(),
        }
    }
}

/// Resolve an image reference to an existing file inside `images_dir`.
///
/// Returns `None` for empty references, references that try to leave the
/// image store (absolute paths, `..`), and files that do not exist.
pub fn resolve_image_path(images_dir: &Path, reference: &str) -> Option<PathBuf> {
    let reference = reference.trim();
    if reference.is_empty() {
        return None;
    }

    let relative = Path::new(reference);
    if !relative
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
    {
        return None;
    }

    let path = images_dir.join(relative);
    path.is_file().then_some(path)
}

/// Plan a normalize operation without executing it.
pub fn plan_normalize(source: &Path, config: &NormalizeConfig) -> NormalizeParams {
    NormalizeParams {
        source: source.to_path_buf(),
        size: config.size,
        centering: config.centering,
    }
}

/// Turns catalog image references into fixed-size square images.
///
/// Re-reads and re-processes the file on every call; nothing is cached.
pub struct Normalizer<B> {
    backend: B,
    images_dir: PathBuf,
    config: NormalizeConfig,
}

impl<B: ImageBackend> Normalizer<B> {
    pub fn new(backend: B, images_dir: impl Into<PathBuf>, config: NormalizeConfig) -> Self {
        Self {
            backend,
            images_dir: images_dir.into(),
            config,
        }
    }

    /// Load, square-crop and resize the image named by `reference`.
    pub fn normalize(&self, reference: &str) -> NormalizedImage {
        let Some(source) = resolve_image_path(&self.images_dir, reference) else {
            if !reference.trim().is_empty() {
                tracing::debug!(reference, "image not found in store");
            }
            return NormalizedImage::Missing;
        };

        let params = plan_normalize(&source, &self.config);
        match self.backend.normalize(&params) {
            Ok(img) => NormalizedImage::Found(img),
            Err(e) => {
                tracing::warn!(image = %source.display(), error = %e, "could not process image");
                NormalizedImage::Missing
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use tempfile::TempDir;

    fn store_with(files: &[&str]) -> TempDir {
        let tmp = TempDir::new().unwrap();
        for f in files {
            std::fs::write(tmp.path().join(f), b"fake").unwrap();
        }
        tmp
    }

    #[test]
    fn resolve_empty_reference_is_none() {
        let tmp = store_with(&["milk.jpg"]);
        assert_eq!(resolve_image_path(tmp.path(), ""), None);
        assert_eq!(resolve_image_path(tmp.path(), "   "), None);
    }

    #[test]
    fn resolve_existing_file() {
        let tmp = store_with(&["milk.jpg"]);
        assert_eq!(
            resolve_image_path(tmp.path(), "milk.jpg"),
            Some(tmp.path().join("milk.jpg"))
        );
    }

    #[test]
    fn resolve_nonexistent_file_is_none() {
        let tmp = store_with(&[]);
        assert_eq!(resolve_image_path(tmp.path(), "bread.jpg"), None);
    }

    #[test]
    fn resolve_rejects_escaping_references() {
        let tmp = store_with(&["milk.jpg"]);
        let inner = tmp.path().join("inner");
        std::fs::create_dir(&inner).unwrap();
        assert_eq!(resolve_image_path(&inner, "../milk.jpg"), None);
        assert_eq!(resolve_image_path(&inner, "/etc/passwd"), None);
    }

    #[test]
    fn resolve_rejects_directories() {
        let tmp = store_with(&[]);
        std::fs::create_dir(tmp.path().join("sub")).unwrap();
        assert_eq!(resolve_image_path(tmp.path(), "sub"), None);
    }

    #[test]
    fn plan_normalize_uses_config() {
        let params = plan_normalize(Path::new("/img/a.jpg"), &NormalizeConfig::default());
        assert_eq!(params.size, 500);
        assert_eq!(params.centering, Centering::center());
        assert_eq!(params.source, PathBuf::from("/img/a.jpg"));
    }

    #[test]
    fn normalize_empty_reference_is_missing_without_backend_call() {
        let tmp = store_with(&[]);
        let normalizer = Normalizer::new(MockBackend::new(), tmp.path(), NormalizeConfig::default());

        assert!(!normalizer.normalize("").is_found());
        assert!(normalizer.backend.get_operations().is_empty());
    }

    #[test]
    fn normalize_missing_file_is_missing() {
        let tmp = store_with(&[]);
        let normalizer = Normalizer::new(MockBackend::new(), tmp.path(), NormalizeConfig::default());

        assert!(matches!(normalizer.normalize("milk.jpg"), NormalizedImage::Missing));
    }

    #[test]
    fn normalize_existing_file_calls_backend() {
        let tmp = store_with(&["milk.jpg"]);
        let config = NormalizeConfig {
            size: 320,
            ..NormalizeConfig::default()
        };
        let normalizer = Normalizer::new(MockBackend::new(), tmp.path(), config);

        let NormalizedImage::Found(img) = normalizer.normalize("milk.jpg") else {
            panic!("expected a normalized image");
        };
        assert_eq!((img.width(), img.height()), (320, 320));

        let ops = normalizer.backend.get_operations();
        assert!(matches!(
            &ops[..],
            [RecordedOp::Normalize { size: 320, centering: (0.5, 0.5), source }]
                if source.ends_with("milk.jpg")
        ));
    }

    #[test]
    fn normalize_backend_failure_degrades_to_missing() {
        let tmp = store_with(&["milk.jpg"]);
        let normalizer =
            Normalizer::new(MockBackend::failing(), tmp.path(), NormalizeConfig::default());

        assert!(matches!(normalizer.normalize("milk.jpg"), NormalizedImage::Missing));
    }
}
