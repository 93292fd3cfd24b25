//! Parameter types for image operations.
//!
//! These types describe *what* to do, not *how* to do it. They are shared by
//! the pure [`calculations`](super::calculations), the pixel-level modules
//! ([`region`](super::region), [`margin`](super::margin)) and the
//! [`backend`](super::backend) that does the encoding.
//!
//! ## Types
//!
//! - [`Dimensions`]: a width/height pair; `0` in a field means "derive from aspect ratio".
//! - [`Region`]: an origin plus extent inside a raster.
//! - [`FitPolicy`]: how a source maps onto a target box (scale, stretch, center).
//! - [`Quality`]: JPEG encoding quality (1–100, default 90). Clamped on construction.
//! - [`OutputFormat`]: which encoder writes the final page.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A width/height pair in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either side is zero.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl From<(u32, u32)> for Dimensions {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A rectangle inside a raster, origin at the top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// How a source image is mapped onto a requested target box.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum FitPolicy {
    /// Keep the aspect ratio and fit entirely inside the box. Never upscales.
    #[default]
    Scale,
    /// Use the box verbatim, distorting the aspect ratio.
    Stretch,
    /// Scale to cover the tighter side, then center-crop to the box.
    Center,
}

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
        Self(90)
    }
}

/// Encoder used for the final page.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Jpeg,
    /// Uncompressed Windows bitmap; quality is ignored.
    Bmp,
}

impl OutputFormat {
    /// File extension written for this format.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Bmp => "bmp",
        }
    }

    pub(crate) fn image_format(self) -> image::ImageFormat {
        match self {
            OutputFormat::Jpeg => image::ImageFormat::Jpeg,
            OutputFormat::Bmp => image::ImageFormat::Bmp,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Jpeg => f.write_str("jpeg"),
            OutputFormat::Bmp => f.write_str("bmp"),
        }
    }
}
