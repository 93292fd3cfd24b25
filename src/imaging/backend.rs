//! Image codec backend trait and shared error type.
//!
//! The [`ImageBackend`] trait covers the two things the pipeline needs from a
//! codec layer: load and save. Everything between load and save
//! (margin trimming, resizing) is pure pixel work in this crate and does not
//! go through the backend.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate's pure-Rust decoders and encoders.

use super::params::{OutputFormat, Quality};
use image::DynamicImage;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("No {0} encoder available")]
    EncoderUnavailable(OutputFormat),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Trait for image codec backends.
pub trait ImageBackend {
    /// Decode an image file.
    fn load(&self, path: &Path) -> Result<DynamicImage, BackendError>;

    /// Encode `image` to `path` in `format`. `quality` applies to lossy formats.
    fn save(
        &self,
        image: &DynamicImage,
        path: &Path,
        format: OutputFormat,
        quality: Quality,
    ) -> Result<(), BackendError>;
}
