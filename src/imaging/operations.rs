//! High-level image operations.
//!
//! These functions combine the pure [`calculations`](super::calculations)
//! with pixel work on an in-memory image. They borrow the source and return a
//! new image; the source is never modified.

use super::calculations::{calc_size, center_crop_region};
use super::params::{Dimensions, FitPolicy};
use super::region::extract_region;
use image::DynamicImage;
use image::imageops::FilterType;
use tracing::debug;

/// Resampling filter for every resize: bicubic (Catmull-Rom).
pub const RESIZE_FILTER: FilterType = FilterType::CatmullRom;

/// Resize `source` into the `dest` box under `policy`.
///
/// Returns an unchanged copy of the source when:
/// - the computed size has a zero side (including "no resize" `0x0` requests),
/// - `policy` is [`FitPolicy::Scale`] and the fit would be larger than the
///   source on either axis,
/// - `policy` is [`FitPolicy::Center`] and the box exceeds the source on both
///   axes.
///
/// Under [`FitPolicy::Center`] the resampled image is then center-cropped so it
/// never exceeds the box.
pub fn resize(source: &DynamicImage, dest: Dimensions, policy: FitPolicy) -> DynamicImage {
    let src = Dimensions::new(source.width(), source.height());
    let new = calc_size(src, dest, policy);

    if new.is_empty() {
        debug!(%src, %dest, ?policy, "No resize requested");
        return source.clone();
    }

    let keep_source = match policy {
        FitPolicy::Scale => new.width > src.width || new.height > src.height,
        FitPolicy::Center => dest.width > src.width && dest.height > src.height,
        FitPolicy::Stretch => false,
    };
    if keep_source {
        debug!(%src, %dest, %new, ?policy, "Refusing to upscale, keeping source size");
        return source.clone();
    }

    debug!(%src, %dest, %new, ?policy, "Resizing page");
    let resampled = if new == src {
        source.clone()
    } else {
        source.resize_exact(new.width, new.height, RESIZE_FILTER)
    };

    let needs_crop =
        policy == FitPolicy::Center && new != dest && dest.width != 0 && dest.height != 0;
    if !needs_crop {
        return resampled;
    }

    let region = center_crop_region(new, dest);
    debug!(?region, "Center-cropping to box");
    extract_region(&resampled, region).unwrap_or(resampled)
}
