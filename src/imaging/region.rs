//! Rectangular region extraction.
//!
//! [`extract`] copies a sub-rectangle of a raster into a freshly allocated
//! image. Requests that run past the right or bottom edge are clamped; an
//! origin outside the source yields `None` rather than an error, since callers
//! (center crop, margin trimming) can always fall back to the uncropped image.

use super::params::Region;
use image::{DynamicImage, GenericImageView};
use tracing::debug;

/// Copy the `width` x `height` region at `(x, y)` out of `source`.
///
/// Returns `None` when the origin lies outside the source. Otherwise the
/// extent is clamped to the source bounds and the returned image has the same
/// color type as `source`.
pub fn extract(
    source: &DynamicImage,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
) -> Option<DynamicImage> {
    let (src_w, src_h) = source.dimensions();

    if x >= src_w || y >= src_h {
        debug!(x, y, src_w, src_h, "Extraction origin outside source");
        return None;
    }

    let width = width.min(src_w - x);
    let height = height.min(src_h - y);

    Some(source.crop_imm(x, y, width, height))
}

/// [`extract`] taking a [`Region`].
pub fn extract_region(source: &DynamicImage, region: Region) -> Option<DynamicImage> {
    extract(source, region.x, region.y, region.width, region.height)
}
