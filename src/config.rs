//! Application configuration module.
//!
//! Handles loading, validating, and merging the `stock-review.toml` file.
//! Stock defaults are serialized to a TOML table and the user's file is
//! merged on top of it, so a config file only needs the keys it changes.
//! Command-line flags (`--catalog`, `--images`, `--bind`) override the merged
//! result in `main`.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [catalog]
//! path = "products.xlsx"     # .xlsx, .xls, .ods or .csv
//!
//! [images]
//! dir = "images"             # Directory the catalog's image references point into
//! size = 500                 # Edge of the normalized square image, in pixels
//! quality = 85               # JPEG quality used when serving images (1-100)
//!
//! [share]
//! # recipient = "48123456789"  # Country code + number, digits only
//! message = "Hi, sending the order from {date}. The PDF is attached."
//!
//! [server]
//! bind = "0.0.0.0:8501"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Placeholder substituted with the order date in [`ShareConfig::message`].
pub const DATE_PLACEHOLDER: &str = "{date}";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Application configuration loaded from `stock-review.toml`.
///
/// All fields have sensible defaults. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Where the product catalog is read from.
    pub catalog: CatalogConfig,
    /// Image store and normalization settings.
    pub images: ImagesConfig,
    /// Share link settings.
    pub share: ShareConfig,
    /// HTTP server settings.
    pub server: ServerConfig,
}

impl AppConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.images.size == 0 {
            return Err(ConfigError::Validation(
                "images.size must be greater than 0".into(),
            ));
        }
        if !(1..=100).contains(&self.images.quality) {
            return Err(ConfigError::Validation(
                "images.quality must be 1-100".into(),
            ));
        }
        let recipient = self.share.recipient.as_deref().unwrap_or("");
        if !recipient.chars().all(|c| c.is_ascii_digit()) {
            return Err(ConfigError::Validation(
                "share.recipient must contain digits only (country code + number)".into(),
            ));
        }
        if !self.share.message.contains(DATE_PLACEHOLDER) {
            return Err(ConfigError::Validation(format!(
                "share.message must contain the {DATE_PLACEHOLDER} placeholder"
            )));
        }
        if self.server.bind.trim().is_empty() {
            return Err(ConfigError::Validation(
                "server.bind must not be empty".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfig {
    /// Path of the tabular catalog file.
    pub path: PathBuf,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("products.xlsx"),
        }
    }
}

/// Image store and normalization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesConfig {
    /// Directory that image references in the catalog are resolved against.
    pub dir: PathBuf,
    /// Edge length of the normalized square image.
    pub size: u32,
    /// JPEG encoding quality for served images (1 = worst, 100 = best).
    pub quality: u32,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("images"),
            size: 500,
            quality: 85,
        }
    }
}

/// Share link settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShareConfig {
    /// Phone number the chat opens with. When absent the messaging app lets
    /// the user pick a contact.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    /// Message template; `{date}` becomes the order date (`DD-MM-YYYY`).
    pub message: String,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            recipient: None,
            message: "Hi, sending the order from {date}. The PDF is attached.".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Socket address the HTTP server listens on.
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8501".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(AppConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<AppConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: AppConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from the given file, falling back to stock defaults when the
/// file is absent.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let overlay = load_raw_config(path)?;
    if overlay.is_none() {
        tracing::debug!(path = %path.display(), "no config file, using stock defaults");
    }
    resolve_config(stock_defaults_value(), overlay)
}

/// Returns a fully-commented stock `stock-review.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# stock-review configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Catalog
# ---------------------------------------------------------------------------
[catalog]
# Spreadsheet (.xlsx, .xls, .ods) or .csv file. The first row holds the
# headers: Name, Category, Unit, ImageReference (Polish headers Nazwa,
# Kategoria, Jednostka, Zdjecie are accepted too).
path = "products.xlsx"

# ---------------------------------------------------------------------------
# Images
# ---------------------------------------------------------------------------
[images]
# Directory the catalog's image references are resolved against.
dir = "images"

# Every product image is center-cropped to a square of this edge (pixels).
size = 500

# JPEG quality used when serving images to the browser (1 = worst, 100 = best).
quality = 85

# ---------------------------------------------------------------------------
# Share link
# ---------------------------------------------------------------------------
[share]
# Phone number the chat opens with: country code + number, digits only.
# Leave commented out to pick the contact in the messaging app.
# recipient = "48123456789"

# Prefilled message. {date} becomes the order date (DD-MM-YYYY).
message = "Hi, sending the order from {date}. The PDF is attached."

# ---------------------------------------------------------------------------
# Server
# ---------------------------------------------------------------------------
[server]
# Address to listen on. 0.0.0.0 lets a phone on the same network connect.
bind = "0.0.0.0:8501"
"##
}
