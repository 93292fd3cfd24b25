//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.
//!
//! Ratios are computed in `f32` and the final pixel count is truncated toward
//! zero, so results can sit one pixel below the exact value. The center-fit
//! branch uses integer arithmetic instead.

use super::params::{Dimensions, FitPolicy, Region};

/// Calculate output dimensions for fitting `source` into `dest` under `policy`.
///
/// A zero field in `dest` is derived from the other one using the source
/// aspect ratio, regardless of policy. Both fields zero returns `0x0`, which
/// callers treat as "do not resize". A zero-sized source also returns `0x0`.
///
/// # Examples
/// ```
/// # use pspcomic::imaging::{Dimensions, FitPolicy, calc_size};
/// // Portrait page into a 480x272 landscape screen: height binds
/// let out = calc_size(
///     Dimensions::new(1000, 1500),
///     Dimensions::new(480, 272),
///     FitPolicy::Scale,
/// );
/// assert_eq!(out, Dimensions::new(181, 272));
/// ```
pub fn calc_size(source: Dimensions, dest: Dimensions, policy: FitPolicy) -> Dimensions {
    if dest.width == 0 && dest.height == 0 {
        return Dimensions::default();
    }
    if source.is_empty() {
        return Dimensions::default();
    }

    let src_w = source.width as f32;
    let src_h = source.height as f32;

    if dest.width == 0 {
        let width = (dest.height as f32 * (src_w / src_h)) as u32;
        return Dimensions::new(width, dest.height);
    }
    if dest.height == 0 {
        let height = (dest.width as f32 * (src_h / src_w)) as u32;
        return Dimensions::new(dest.width, height);
    }

    let dst_w = dest.width as f32;
    let dst_h = dest.height as f32;

    match policy {
        FitPolicy::Stretch => dest,
        FitPolicy::Center => {
            if src_w / dst_w < src_h / dst_h {
                // Width is the tighter side; never grow it past the source
                let width = dest.width.min(source.width);
                let height = scale_integer(source.height, width, source.width);
                Dimensions::new(width, height)
            } else {
                let height = dest.height.min(source.height);
                let width = scale_integer(source.width, height, source.height);
                Dimensions::new(width, height)
            }
        }
        FitPolicy::Scale => {
            if dst_w / dst_h > src_w / src_h {
                // Box is wider than the source: height binds
                let width = (dst_h * (src_w / src_h)) as u32;
                Dimensions::new(width, dest.height)
            } else {
                let height = (dst_w * (src_h / src_w)) as u32;
                Dimensions::new(dest.width, height)
            }
        }
    }
}

/// `value * numerator / denominator` with truncating integer division.
fn scale_integer(value: u32, numerator: u32, denominator: u32) -> u32 {
    let scaled = u64::from(value) * u64::from(numerator) / u64::from(denominator);
    u32::try_from(scaled).unwrap_or(u32::MAX)
}

/// Region to keep when center-cropping a resampled image down to `dest`.
///
/// The origin is `(resampled - dest) / 2` on each axis, clamped to zero when
/// the resampled side is already narrower than the box, and the extent never
/// exceeds either the box or the resampled image.
pub fn center_crop_region(resampled: Dimensions, dest: Dimensions) -> Region {
    let offset = |full: u32, want: u32| ((i64::from(full) - i64::from(want)) / 2).max(0) as u32;

    Region {
        x: offset(resampled.width, dest.width),
        y: offset(resampled.height, dest.height),
        width: dest.width.min(resampled.width),
        height: dest.height.min(resampled.height),
    }
}
