//! Configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! the base layer; a user file only needs the keys it wants to override.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [responsive]
//! min_size = "360x360"      # Quality floor for every thumbnail
//! max_size = "2000x2000"    # Largest thumbnail a breakpoint may request
//! breakpoint_step = 300     # Viewport distance between breakpoints (px)
//!
//! [thumbnails]
//! quality = 85              # JPEG quality (1-100)
//! dir = "thumbnails"        # Output directory, relative to the render target
//! url_prefix = "thumbnails" # Prefix joined with file names in generated URLs
//! ```
//!
//! Sizes accept either a `"<width>x<height>"` token or a `[width, height]`
//! array. Configuration is validated at load time: a malformed size, a
//! minimum larger than the maximum, or a zero step fails before any image is
//! rendered. Unknown keys are rejected to catch typos early.

use crate::calculator::{DEFAULT_BREAKPOINT_STEP, PolicyBoundsError, SizeBounds};
use crate::size::Size;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config bounds error: {0}")]
    Bounds(#[from] PolicyBoundsError),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `config.toml`.
///
/// All fields have defaults. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Size policy: floor, ceiling, breakpoint spacing.
    pub responsive: ResponsiveConfig,
    /// Thumbnail encoding and URL settings.
    pub thumbnails: ThumbnailsConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bounds()?;
        if self.responsive.breakpoint_step == 0 {
            return Err(ConfigError::Validation(
                "responsive.breakpoint_step must be greater than 0".into(),
            ));
        }
        if !(1..=100).contains(&self.thumbnails.quality) {
            return Err(ConfigError::Validation(
                "thumbnails.quality must be 1-100".into(),
            ));
        }
        Ok(())
    }

    /// The configured size bounds, checked for ordering.
    pub fn bounds(&self) -> Result<SizeBounds, PolicyBoundsError> {
        SizeBounds::new(self.responsive.min_size, self.responsive.max_size)
    }
}

/// Size policy settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResponsiveConfig {
    /// Smallest acceptable thumbnail on each axis.
    pub min_size: Size,
    /// Largest thumbnail a breakpoint may request.
    pub max_size: Size,
    /// Viewport distance between consecutive breakpoints, in CSS pixels.
    pub breakpoint_step: u32,
}

impl Default for ResponsiveConfig {
    fn default() -> Self {
        let bounds = SizeBounds::default();
        Self {
            min_size: bounds.min,
            max_size: bounds.max,
            breakpoint_step: DEFAULT_BREAKPOINT_STEP,
        }
    }
}

/// Thumbnail output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThumbnailsConfig {
    /// JPEG encoding quality (1 = worst, 100 = best).
    pub quality: u32,
    /// Directory thumbnails are written to, relative to the render target.
    pub dir: String,
    /// Prefix joined with thumbnail file names to build URLs.
    pub url_prefix: String,
}

impl Default for ThumbnailsConfig {
    fn default() -> Self {
        Self {
            quality: 85,
            dir: "thumbnails".to_string(),
            url_prefix: "thumbnails".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
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

/// Load a `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
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

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Responsive Image Configuration
# ==============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Size policy
# ---------------------------------------------------------------------------
[responsive]
# Quality floor: every thumbnail is at least this large on both axes.
# Accepts "<width>x<height>" or [width, height].
min_size = "360x360"

# Ceiling: breakpoints stop before a thumbnail would exceed this size.
max_size = "2000x2000"

# Viewport distance between consecutive CSS breakpoints, in pixels.
breakpoint_step = 300

# ---------------------------------------------------------------------------
# Thumbnails
# ---------------------------------------------------------------------------
[thumbnails]
# JPEG encoding quality (1 = worst, 100 = best).
quality = 85

# Output directory, relative to the render target.
dir = "thumbnails"

# Prefix joined with thumbnail file names in generated URLs.
url_prefix = "thumbnails"
"##
}
