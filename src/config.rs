//! Page processing configuration.
//!
//! Handles loading, validating, and layering `pspcomic.toml` files. Values are
//! resolved in three layers, each overriding the one before:
//!
//! ```text
//! stock defaults  →  config file  →  command-line flags
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [resize]
//! width = 480          # Target box width (0 = derive from height)
//! height = 272         # Target box height (0 = derive from width)
//! policy = "scale"     # scale | stretch | center
//!
//! [margin]
//! trim = true          # Detect and crop uniform page margins
//! threshold = 225      # Lightness at or below this counts as content
//!
//! [output]
//! format = "jpeg"      # jpeg | bmp
//! quality = 90         # JPEG quality (1-100)
//! ```
//!
//! Unknown keys are rejected to catch typos early.
//!
//! `margin.threshold` is deliberately not range-checked: values above 255
//! behave as 255 and negative values match nothing, which is how
//! [`detect_margin`](crate::imaging::detect_margin) treats them.

use crate::imaging::{Dimensions, FitPolicy, OutputFormat, Quality};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "pspcomic.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Full page processing configuration.
///
/// All fields have defaults suited to a 480x272 handheld screen. User config
/// files need only specify the values they want to override.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Target box and fit policy.
    pub resize: ResizeConfig,
    /// Margin detection and trimming.
    pub margin: MarginConfig,
    /// Encoder selection and quality.
    pub output: OutputConfig,
}

impl Config {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output.quality > 100 {
            return Err(ConfigError::Validation(
                "output.quality must be 0-100".into(),
            ));
        }
        Ok(())
    }

    /// Requested target box.
    pub fn target(&self) -> Dimensions {
        Dimensions::new(self.resize.width, self.resize.height)
    }

    /// Encoder quality, clamped to the range the encoder accepts.
    pub fn quality(&self) -> Quality {
        Quality::new(self.output.quality)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResizeConfig {
    pub width: u32,
    pub height: u32,
    pub policy: FitPolicy,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            width: 480,
            height: 272,
            policy: FitPolicy::Scale,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarginConfig {
    /// Crop detected margins before resizing.
    pub trim: bool,
    /// Lightness cutoff (0-255) separating content from paper.
    pub threshold: i32,
}

impl Default for MarginConfig {
    fn default() -> Self {
        Self {
            trim: true,
            threshold: 225,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// JPEG encoding quality (1 = worst, 100 = best). Ignored for BMP.
    pub quality: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Jpeg,
            quality: Quality::default().value(),
        }
    }
}

/// Values supplied on the command line. `None` leaves the lower layer alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub policy: Option<FitPolicy>,
    pub trim: Option<bool>,
    pub threshold: Option<i32>,
    pub format: Option<OutputFormat>,
    pub quality: Option<u32>,
}

impl ConfigOverrides {
    /// Sparse TOML table holding only the values that were set.
    pub fn to_toml(&self) -> toml::Value {
        fn section(entries: Vec<(&str, Option<toml::Value>)>) -> Option<toml::Value> {
            let table: toml::Table = entries
                .into_iter()
                .filter_map(|(key, value)| value.map(|v| (key.to_string(), v)))
                .collect();
            (!table.is_empty()).then_some(toml::Value::Table(table))
        }
        let int = |v: u32| toml::Value::Integer(i64::from(v));

        let sections = [
            (
                "resize",
                section(vec![
                    ("width", self.width.map(int)),
                    ("height", self.height.map(int)),
                    ("policy", self.policy.and_then(to_value)),
                ]),
            ),
            (
                "margin",
                section(vec![
                    ("trim", self.trim.map(toml::Value::Boolean)),
                    (
                        "threshold",
                        self.threshold.map(|t| toml::Value::Integer(i64::from(t))),
                    ),
                ]),
            ),
            (
                "output",
                section(vec![
                    ("format", self.format.and_then(to_value)),
                    ("quality", self.quality.map(int)),
                ]),
            ),
        ];

        toml::Value::Table(
            sections
                .into_iter()
                .filter_map(|(name, table)| table.map(|t| (name.to_string(), t)))
                .collect(),
        )
    }
}

/// Serialize an enum setting the same way the config file spells it.
fn to_value<T: Serialize>(value: T) -> Option<toml::Value> {
    toml::Value::try_from(value).ok()
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(Config::default()).expect("default config must serialize")
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
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge optional layers onto a base value in order, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    layers: impl IntoIterator<Item = Option<toml::Value>>,
) -> Result<Config, ConfigError> {
    let merged = layers.into_iter().flatten().fold(base, merge_toml);
    let config: Config = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path` on top of stock defaults.
///
/// A missing file yields the defaults; unknown keys and out-of-range values
/// are errors.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    resolve_config(stock_defaults_value(), [load_raw_config(path)?])
}

/// Resolve all three layers: defaults, the file at `path`, then `overrides`.
///
/// With `required` set, a missing file is an error instead of being skipped.
pub fn load_layered(
    path: &Path,
    required: bool,
    overrides: &ConfigOverrides,
) -> Result<Config, ConfigError> {
    let file = load_raw_config(path)?;
    if required && file.is_none() {
        return Err(ConfigError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("config file not found: {}", path.display()),
        )));
    }
    resolve_config(stock_defaults_value(), [file, Some(overrides.to_toml())])
}

/// Returns a fully-commented stock `pspcomic.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# pspcomic configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Command-line flags override anything set here.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Resizing
# ---------------------------------------------------------------------------
[resize]
# Target box in pixels. Set one side to 0 to derive it from the other
# using the page's aspect ratio; set both to 0 to skip resizing.
width = 480
height = 272

# How the page maps onto the box:
#   scale   - keep aspect ratio, fit inside the box, never upscale
#   stretch - use the box exactly, distorting the page
#   center  - cover the box, then crop the overflow evenly from both sides
policy = "scale"

# ---------------------------------------------------------------------------
# Margin trimming
# ---------------------------------------------------------------------------
[margin]
# Detect the blank border around the artwork and crop it before resizing.
trim = true

# Pixels with lightness (0-255) at or below this value count as content.
# Lower values treat more of the page as paper. Values above 255 act as 255.
threshold = 225

# ---------------------------------------------------------------------------
# Output
# ---------------------------------------------------------------------------
[output]
# Encoder for the final page: "jpeg" or "bmp".
format = "jpeg"

# JPEG quality (1 = worst, 100 = best). Ignored for BMP.
quality = 90
"##
}
