//! Page processing pipeline.
//!
//! Turns a scanned comic page into a file sized for a handheld screen:
//!
//! ```text
//! load  →  trim margins (optional)  →  fit to target box  →  encode
//! ```
//!
//! Every step except load and encode is pure pixel work from
//! [`imaging`](crate::imaging); the codec side goes through an
//! [`ImageBackend`] so tests can run the whole pipeline against a mock.
//!
//! ## Untrimmable pages
//!
//! A page with no pixel at or below the threshold (a blank page, or a
//! threshold that is too strict) has no margin to cut. That is not an error:
//! the page is kept whole, a warning is logged, and the report records
//! [`TrimStatus::Skipped`].
//!
//! ## Output naming
//!
//! When no output path is given, pages are written next to their source as
//! `<stem>-psp.<ext>`:
//!
//! ```text
//! scans/
//! ├── 001.png
//! ├── 001-psp.jpg     # processed page
//! ├── 002.tif
//! └── 002-psp.jpg
//! ```

use crate::config::Config;
use crate::imaging::{
    BackendError, CropError, Dimensions, FitPolicy, ImageBackend, Margin, OutputFormat, Quality,
    cut_margin, cut_margin_auto, detect_margin, resize,
};
use image::{DynamicImage, GenericImageView};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image processing failed: {0}")]
    Imaging(#[from] BackendError),
    #[error("Crop failed: {0}")]
    Crop(#[from] CropError),
    #[error("Source page not found: {0}")]
    SourceNotFound(PathBuf),
}

/// What happened to a page's margin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "margin", rename_all = "lowercase")]
pub enum TrimStatus {
    /// Trimming was turned off in the config.
    Disabled,
    /// The detected margin was cropped away.
    Trimmed(Margin),
    /// The margin could not be cropped; the page was kept whole.
    Skipped(Margin),
}

/// Summary of one processed page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageReport {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Dimensions as decoded.
    pub source: Dimensions,
    pub trim: TrimStatus,
    /// Dimensions after margin trimming (equal to `source` when untrimmed).
    pub trimmed: Dimensions,
    /// Dimensions of the written file.
    pub output_dims: Dimensions,
    pub format: OutputFormat,
}

/// `<stem>-psp.<ext>` next to `input`.
pub fn default_output_path(input: &Path, format: OutputFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "page".to_string());
    input.with_file_name(format!("{}-psp.{}", stem, format.extension()))
}

fn dims_of(image: &DynamicImage) -> Dimensions {
    image.dimensions().into()
}

fn ensure_source(input: &Path) -> Result<(), ProcessError> {
    if input.exists() {
        Ok(())
    } else {
        Err(ProcessError::SourceNotFound(input.to_path_buf()))
    }
}

fn ensure_parent(output: &Path) -> Result<(), ProcessError> {
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Crop the auto-detected margin, keeping the page whole when nothing qualifies.
fn trim_page(page: DynamicImage, threshold: i32) -> (DynamicImage, TrimStatus) {
    let margin = detect_margin(&page, threshold);
    match cut_margin(&page, margin) {
        Ok(trimmed) => (trimmed, TrimStatus::Trimmed(margin)),
        Err(e) => {
            warn!(%margin, threshold, "Keeping page untrimmed: {}", e);
            (page, TrimStatus::Skipped(margin))
        }
    }
}

/// Run the full pipeline on one page and write the result to `output`.
pub fn process_page(
    backend: &impl ImageBackend,
    input: &Path,
    output: &Path,
    config: &Config,
) -> Result<PageReport, ProcessError> {
    ensure_source(input)?;
    let page = backend.load(input)?;
    let source = dims_of(&page);

    let (page, trim) = if config.margin.trim {
        trim_page(page, config.margin.threshold)
    } else {
        (page, TrimStatus::Disabled)
    };
    let trimmed = dims_of(&page);

    let fitted = resize(&page, config.target(), config.resize.policy);
    let output_dims = dims_of(&fitted);

    ensure_parent(output)?;
    let format = config.output.format;
    backend.save(&fitted, output, format, config.quality())?;

    info!(
        input = %input.display(),
        output = %output.display(),
        %source,
        %trimmed,
        %output_dims,
        "Processed page"
    );

    Ok(PageReport {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        source,
        trim,
        trimmed,
        output_dims,
        format,
    })
}

/// Load `input` and return its raw detected margin.
pub fn detect_page(
    backend: &impl ImageBackend,
    input: &Path,
    threshold: i32,
) -> Result<Margin, ProcessError> {
    ensure_source(input)?;
    let page = backend.load(input)?;
    Ok(detect_margin(&page, threshold))
}

/// Crop an explicit `margin` off `input` and save it. Returns the written size.
pub fn crop_page(
    backend: &impl ImageBackend,
    input: &Path,
    output: &Path,
    margin: Margin,
    format: OutputFormat,
    quality: Quality,
) -> Result<Dimensions, ProcessError> {
    ensure_source(input)?;
    let page = backend.load(input)?;
    let cropped = cut_margin(&page, margin)?;
    ensure_parent(output)?;
    backend.save(&cropped, output, format, quality)?;
    Ok(dims_of(&cropped))
}

/// Auto-trim `input` at `threshold` and save it, failing on a page with no content.
pub fn trim_page_strict(
    backend: &impl ImageBackend,
    input: &Path,
    output: &Path,
    threshold: i32,
    format: OutputFormat,
    quality: Quality,
) -> Result<Dimensions, ProcessError> {
    ensure_source(input)?;
    let page = backend.load(input)?;
    let cropped = cut_margin_auto(&page, threshold)?;
    ensure_parent(output)?;
    backend.save(&cropped, output, format, quality)?;
    Ok(dims_of(&cropped))
}

/// Fit `input` into `target` under `policy` and save it. Returns the written size.
pub fn resize_page(
    backend: &impl ImageBackend,
    input: &Path,
    output: &Path,
    target: Dimensions,
    policy: FitPolicy,
    format: OutputFormat,
    quality: Quality,
) -> Result<Dimensions, ProcessError> {
    ensure_source(input)?;
    let page = backend.load(input)?;
    let fitted = resize(&page, target, policy);
    ensure_parent(output)?;
    backend.save(&fitted, output, format, quality)?;
    Ok(dims_of(&fitted))
}
