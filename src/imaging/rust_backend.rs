//! Pure Rust codec backend built on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, BMP, TIFF, WebP) | `image::ImageReader` |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder::new_with_quality` |
//! | Encode → BMP | `image::codecs::bmp::BmpEncoder` |
//!
//! Both encoders take 8-bit gray or RGB; anything else (alpha, 16-bit) is
//! flattened to RGB8 before encoding.

use super::backend::{BackendError, ImageBackend};
use super::params::{OutputFormat, Quality};
use image::codecs::bmp::BmpEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageReader};
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and decode an image from disk.
///
/// The format is sniffed from the file contents, so scans saved with the
/// wrong extension still decode.
pub fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)
        .map_err(BackendError::Io)?
        .with_guessed_format()
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })
}

/// Borrow `image` if the JPEG/BMP encoders accept its layout, else convert to RGB8.
fn encodable(image: &DynamicImage) -> Cow<'_, DynamicImage> {
    match image {
        DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) => Cow::Borrowed(image),
        other => Cow::Owned(DynamicImage::ImageRgb8(other.to_rgb8())),
    }
}

fn ensure_encoder(format: OutputFormat) -> Result<(), BackendError> {
    if format.image_format().writing_enabled() {
        Ok(())
    } else {
        Err(BackendError::EncoderUnavailable(format))
    }
}

/// Encode and save as JPEG at the given quality.
///
/// Fails with [`BackendError::EncoderUnavailable`] when the JPEG writer is not
/// compiled in, and with [`BackendError::Io`] when `path` cannot be created.
pub fn save_as_jpeg(
    image: &DynamicImage,
    path: &Path,
    quality: Quality,
) -> Result<(), BackendError> {
    ensure_encoder(OutputFormat::Jpeg)?;

    let file = File::create(path).map_err(BackendError::Io)?;
    let mut writer = BufWriter::new(file);
    let encoder = JpegEncoder::new_with_quality(&mut writer, quality.value() as u8);

    debug!(path = %path.display(), quality = quality.value(), "Encoding JPEG");
    encodable(image)
        .write_with_encoder(encoder)
        .map_err(|e| BackendError::ProcessingFailed(format!("JPEG encode failed: {}", e)))?;
    writer.flush().map_err(BackendError::Io)
}

/// Encode and save as an uncompressed BMP.
pub fn save_as_bmp(image: &DynamicImage, path: &Path) -> Result<(), BackendError> {
    ensure_encoder(OutputFormat::Bmp)?;

    let file = File::create(path).map_err(BackendError::Io)?;
    let mut writer = BufWriter::new(file);

    debug!(path = %path.display(), "Encoding BMP");
    encodable(image)
        .write_with_encoder(BmpEncoder::new(&mut writer))
        .map_err(|e| BackendError::ProcessingFailed(format!("BMP encode failed: {}", e)))?;
    writer.flush().map_err(BackendError::Io)
}

impl ImageBackend for RustBackend {
    fn load(&self, path: &Path) -> Result<DynamicImage, BackendError> {
        load_image(path)
    }

    fn save(
        &self,
        image: &DynamicImage,
        path: &Path,
        format: OutputFormat,
        quality: Quality,
    ) -> Result<(), BackendError> {
        match format {
            OutputFormat::Jpeg => save_as_jpeg(image, path, quality),
            OutputFormat::Bmp => save_as_bmp(image, path),
        }
    }
}
