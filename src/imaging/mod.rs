//! Image processing in pure Rust, on top of the `image` crate.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` (format sniffed from contents) |
//! | **Fit size** | [`calc_size`]: pure dimension math |
//! | **Resize** | [`resize`]: Catmull-Rom resampling + optional center crop |
//! | **Crop** | [`extract`]: bounds-clamped region copy |
//! | **Margins** | [`detect_margin`] / [`cut_margin`]: lightness edge scan |
//! | **Encode** | `JpegEncoder` with quality, `BmpEncoder` |
//!
//! The module is split into:
//! - **Parameters**: Value types shared by every layer
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Region / Margin**: Pixel-level cropping and margin scanning
//! - **Operations**: Compositions such as fit-and-crop resizing
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`] for file I/O

pub mod backend;
mod calculations;
pub mod margin;
pub mod operations;
mod params;
pub mod region;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend};
pub use calculations::{calc_size, center_crop_region};
pub use margin::{
    CropError, CropMargin, Margin, NOT_FOUND, cut_margin, cut_margin_auto, detect_margin,
};
pub use operations::resize;
pub use params::{Dimensions, FitPolicy, OutputFormat, Quality, Region};
pub use region::{extract, extract_region};
pub use rust_backend::{RustBackend, load_image, save_as_bmp, save_as_jpeg};
