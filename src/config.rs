//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! overridden by an optional `config.toml` in the project (source) directory.
//!
//! ## Project Layout
//!
//! ```text
//! my-photos/
//! ├── config.toml              # Optional, overrides stock defaults
//! ├── photos.csv               # The catalog
//! ├── originals/               # Source images named in the catalog
//! ├── assets/                  # Optional, copied verbatim to the output root
//! └── templates/               # Optional, overrides built-in templates
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! site_title = "Photographs"
//! catalog = "photos.csv"
//! originals = "originals"
//! assets = "assets"
//! templates = "templates"
//!
//! [images]
//! quality = 85              # JPEG quality (1-100)
//! cache = "mtime"           # "mtime" or "content"
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse; set only the values you want to change:
//!
//! ```toml
//! site_title = "Harbour Walks"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Shown in every page title and on the index page.
    pub site_title: String,
    /// Catalog CSV, relative to the project directory.
    pub catalog: String,
    /// Source image directory, relative to the project directory.
    pub originals: String,
    /// Extra static files copied to the output root, if the directory exists.
    pub assets: String,
    /// Template overrides, if the directory exists.
    pub templates: String,
    /// Derivative encoding and caching.
    pub images: ImagesConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_title: "Photographs".to_string(),
            catalog: "photos.csv".to_string(),
            originals: "originals".to_string(),
            assets: "assets".to_string(),
            templates: "templates".to_string(),
            images: ImagesConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.images.quality) {
            return Err(ConfigError::Validation(
                "images.quality must be 1-100".into(),
            ));
        }
        if self.catalog.trim().is_empty() {
            return Err(ConfigError::Validation("catalog must not be empty".into()));
        }
        if self.originals.trim().is_empty() {
            return Err(ConfigError::Validation(
                "originals must not be empty".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn catalog_path(&self, source: &Path) -> PathBuf {
        source.join(&self.catalog)
    }

    pub fn originals_dir(&self, source: &Path) -> PathBuf {
        source.join(&self.originals)
    }

    pub fn assets_dir(&self, source: &Path) -> PathBuf {
        source.join(&self.assets)
    }

    pub fn templates_dir(&self, source: &Path) -> PathBuf {
        source.join(&self.templates)
    }
}

/// Which derivative validity check to use between builds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheMode {
    /// Derivative is newer than its source.
    #[default]
    Mtime,
    /// Source and encoding parameters hash to the recorded values.
    Content,
}

/// Derivative encoding settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesConfig {
    /// JPEG encoding quality (1 = worst, 100 = best).
    pub quality: u32,
    /// Cache validity strategy.
    pub cache: CacheMode,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            quality: 85,
            cache: CacheMode::Mtime,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel image processing workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
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

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the project directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(dir: &Path) -> Result<SiteConfig, ConfigError> {
    resolve_config(stock_defaults_value(), load_raw_config(dir)?)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Photoshelf Configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Paths are relative to the directory
# holding this file. Unknown keys will cause an error.

# Shown in every page title and on the index page.
site_title = "Photographs"

# The photo catalog (CSV with a fixed header).
catalog = "photos.csv"

# Directory holding the source images named in the catalog.
originals = "originals"

# Extra static files (favicon, fonts) copied verbatim to the output root.
# Skipped when the directory does not exist.
assets = "assets"

# Template overrides. Any of base.html, index.html, gallery.html and
# photo.html found here replaces the built-in template of that name.
templates = "templates"

# ---------------------------------------------------------------------------
# Derivative images
# ---------------------------------------------------------------------------
[images]
# JPEG encoding quality (1 = worst, 100 = best).
quality = 85

# When to re-encode a derivative:
#   "mtime"   - when the source is newer than the derivative
#   "content" - when the source bytes or encoding settings changed
cache = "mtime"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel image-processing workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
