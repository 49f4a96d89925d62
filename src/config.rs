//! Editor configuration module.
//!
//! Handles loading, validating, and merging `simple-crop.toml`. Stock defaults
//! are overridden by whatever keys the user file sets; everything else keeps
//! its default.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [crop]
//! min_size = 50.0          # Smallest crop extent, display pixels
//! initial_fill = 0.8       # Share of the display box a fresh rectangle covers
//! wheel_step = 0.05        # Modifier+wheel scale step (5%)
//! handle_tolerance = 10.0  # Hit radius around edges and corners, display pixels
//!
//! [export]
//! format = "png"           # png | jpeg | webp
//! quality = 90             # JPEG quality (1-100)
//! filter = "triangle"      # nearest | triangle | catmull-rom | gaussian | lanczos3
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! [export]
//! format = "jpeg"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{ExportFormat, ResampleFilter};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "simple-crop.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Editor configuration loaded from `simple-crop.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    /// Interaction limits for the crop rectangle.
    pub crop: CropConfig,
    /// Output encoding and resampling.
    pub export: ExportConfig,
}

impl EditorConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let crop = &self.crop;
        if !(crop.min_size.is_finite() && crop.min_size > 0.0) {
            return Err(ConfigError::Validation(
                "crop.min_size must be a positive number".into(),
            ));
        }
        if !(crop.initial_fill > 0.0 && crop.initial_fill <= 1.0) {
            return Err(ConfigError::Validation(
                "crop.initial_fill must be in (0, 1]".into(),
            ));
        }
        if !(crop.wheel_step > 0.0 && crop.wheel_step < 1.0) {
            return Err(ConfigError::Validation(
                "crop.wheel_step must be in (0, 1)".into(),
            ));
        }
        if !(crop.handle_tolerance.is_finite() && crop.handle_tolerance >= 0.0) {
            return Err(ConfigError::Validation(
                "crop.handle_tolerance must be zero or positive".into(),
            ));
        }
        if !(1..=100).contains(&self.export.quality) {
            return Err(ConfigError::Validation(
                "export.quality must be 1-100".into(),
            ));
        }
        Ok(())
    }
}

/// Crop interaction settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CropConfig {
    /// Smallest allowed crop width/height in display pixels.
    pub min_size: f64,
    /// Share of the display box a freshly initialized rectangle may cover.
    pub initial_fill: f64,
    /// Relative scale step for modifier+wheel resizing.
    pub wheel_step: f64,
    /// Distance from an edge or corner that still grabs its handle.
    pub handle_tolerance: f64,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            min_size: crate::crop::MIN_SIZE,
            initial_fill: crate::crop::constraint::INITIAL_FILL,
            wheel_step: 0.05,
            handle_tolerance: 10.0,
        }
    }
}

/// Export settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// Output format when the output path has no recognised extension.
    pub format: ExportFormat,
    /// JPEG encoding quality (1 = worst, 100 = best).
    pub quality: u32,
    /// Resampling filter when the output size differs from the sampled region.
    pub filter: ResampleFilter,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: ExportFormat::Png,
            quality: 90,
            filter: ResampleFilter::Triangle,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(EditorConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
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

/// Load a config file as a raw TOML value.
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
) -> Result<EditorConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: EditorConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`, falling back to stock defaults when it is absent.
pub fn load_config(path: &Path) -> Result<EditorConfig, ConfigError> {
    resolve_config(stock_defaults_value()?, load_raw_config(path)?)
}

/// Load config from `path`, which must exist.
pub fn load_config_file(path: &Path) -> Result<EditorConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let overlay: toml::Value = toml::from_str(&content)?;
    resolve_config(stock_defaults_value()?, Some(overlay))
}

/// Returns a fully-commented stock `simple-crop.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# simple-crop configuration
# =========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Crop interaction
# ---------------------------------------------------------------------------
[crop]
# Smallest crop width/height, in display pixels.
min_size = 50.0

# Share of the display box (per axis) a fresh crop rectangle covers.
# A fresh rectangle never exceeds this on either axis.
initial_fill = 0.8

# Relative step for modifier+wheel resizing (0.05 = 5% per notch).
wheel_step = 0.05

# How close (display pixels) the pointer must be to an edge or corner
# to grab its resize handle.
handle_tolerance = 10.0

# ---------------------------------------------------------------------------
# Export
# ---------------------------------------------------------------------------
[export]
# Output format when the output file extension is not recognised.
# One of: png, jpeg, webp
format = "png"

# JPEG quality (1 = worst, 100 = best). Ignored for png and webp.
quality = 90

# Resampling filter used when the output size differs from the cropped
# region (pixel targets and whole-image resizes).
# One of: nearest, triangle, catmull-rom, gaussian, lanczos3
filter = "triangle"
"##
}
