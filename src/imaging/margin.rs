//! Page margin detection and trimming.
//!
//! Scanned comic pages usually sit inside a band of paper white (or scanner
//! black). [`detect_margin`] finds where the drawn content starts on each
//! side by scanning for the first pixel whose lightness is at or below a
//! threshold; [`cut_margin`] and [`cut_margin_auto`] crop that band away.
//!
//! ## Scan order
//!
//! The four scans run in a fixed order and narrow each other:
//!
//! 1. **left**: columns left → right, each column top → bottom
//! 2. **top**: rows top → bottom, columns from `left` to the right edge
//! 3. **right**: columns right → `left + 1`, rows from `top` down
//! 4. **bottom**: rows bottom → `top + 1`, columns `left` through the right
//!    content column
//!
//! A scan that finds nothing leaves its field at [`NOT_FOUND`] (`-1`). Right
//! and bottom also stay `-1` when the content is a single column or row, since
//! their scans stop one short of `left` / `top`. [`Margin::resolve`] turns the
//! raw record into crop offsets.
//!
//! ## Threshold
//!
//! Thresholds above 255 are clamped to 255 (every pixel counts as content).
//! Negative thresholds are passed through unchanged, so no pixel qualifies and
//! every field comes back as `-1`. Callers relying on a lower clamp must apply
//! it themselves.

use super::region::extract;
use image::{DynamicImage, GenericImageView, Rgb};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Sentinel for an edge with no qualifying pixel.
pub const NOT_FOUND: i32 = -1;

/// Highest meaningful threshold; larger values are clamped to it.
pub const MAX_THRESHOLD: i32 = 255;

/// Inward offsets of the page content from each edge, in pixels.
///
/// Fields may be [`NOT_FOUND`]; check with [`Margin::is_complete`] or go
/// through [`Margin::resolve`] before using them as crop offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Margin {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

/// A margin with every side known, ready to crop with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CropMargin {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl Margin {
    /// Every side unknown.
    pub const NOT_FOUND: Margin = Margin::new(NOT_FOUND, NOT_FOUND, NOT_FOUND, NOT_FOUND);

    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Same offset on all four sides.
    pub const fn uniform(width: i32) -> Self {
        Self::new(width, width, width, width)
    }

    /// True when no side carries the sentinel.
    pub fn is_complete(self) -> bool {
        self.left >= 0 && self.top >= 0 && self.right >= 0 && self.bottom >= 0
    }

    /// Convert to crop offsets for an image of `width` x `height`.
    ///
    /// Only the [`NOT_FOUND`] sentinel means "unknown". An unknown `left` or
    /// `top` means there is no content at all. An unknown `right` or `bottom`
    /// means the content is one column or row wide, so that side is measured
    /// from the content's own column or row. Any other negative value is
    /// rejected with [`CropError::NegativeOffset`].
    pub fn resolve(self, width: u32, height: u32) -> Result<CropMargin, CropError> {
        if self.left == NOT_FOUND || self.top == NOT_FOUND {
            return Err(CropError::NoContent(self));
        }
        let offset = |value: i32| u32::try_from(value).map_err(|_| CropError::NegativeOffset(self));

        let left = offset(self.left)?;
        let top = offset(self.top)?;
        let right = match self.right {
            NOT_FOUND => width.saturating_sub(1).saturating_sub(left),
            value => offset(value)?,
        };
        let bottom = match self.bottom {
            NOT_FOUND => height.saturating_sub(1).saturating_sub(top),
            value => offset(value)?,
        };

        Ok(CropMargin {
            left,
            top,
            right,
            bottom,
        })
    }
}

impl From<CropMargin> for Margin {
    /// Offsets past `i32::MAX` saturate; they exceed any image and crop to nothing.
    fn from(crop: CropMargin) -> Self {
        let side = |v: u32| i32::try_from(v).unwrap_or(i32::MAX);
        Self::new(
            side(crop.left),
            side(crop.top),
            side(crop.right),
            side(crop.bottom),
        )
    }
}

impl fmt::Display for Margin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "left={} top={} right={} bottom={}",
            self.left, self.top, self.right, self.bottom
        )
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CropError {
    #[error("no page content found ({0})")]
    NoContent(Margin),
    #[error("margin ({0}) has a negative offset")]
    NegativeOffset(Margin),
    #[error("margin ({margin}) leaves nothing of a {width}x{height} image")]
    EmptyRegion {
        margin: Margin,
        width: u32,
        height: u32,
    },
}

/// Apply the upper clamp to a user threshold. There is no lower clamp.
pub fn clamp_threshold(threshold: i32) -> i32 {
    threshold.min(MAX_THRESHOLD)
}

/// HSL lightness of a pixel on a 0-255 scale: `(max + min) / 2`, truncated.
pub fn lightness(pixel: &Rgb<u8>) -> i32 {
    let [r, g, b] = pixel.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    (i32::from(max) + i32::from(min)) / 2
}

/// Locate the page content inside `source`.
///
/// A pixel counts as content when its [`lightness`] is at or below
/// `threshold`. See the [module docs](self) for scan order and sentinel
/// semantics.
pub fn detect_margin(source: &DynamicImage, threshold: i32) -> Margin {
    let threshold = clamp_threshold(threshold);
    let rgb = source.to_rgb8();
    let (width, height) = rgb.dimensions();
    let ink = |x: u32, y: u32| lightness(rgb.get_pixel(x, y)) <= threshold;

    let mut margin = Margin::NOT_FOUND;

    let Some(left) = (0..width).find(|&x| (0..height).any(|y| ink(x, y))) else {
        debug!(width, height, threshold, "No content pixels found");
        return margin;
    };
    margin.left = left as i32;

    // The left column holds at least one content pixel, so some row has one too
    let Some(top) = (0..height).find(|&y| (left..width).any(|x| ink(x, y))) else {
        return margin;
    };
    margin.top = top as i32;

    let right_col = (left + 1..width)
        .rev()
        .find(|&x| (top..height).any(|y| ink(x, y)));
    if let Some(x) = right_col {
        margin.right = (width - 1 - x) as i32;
    }

    let last_col = right_col.unwrap_or(width - 1);
    let bottom_row = (top + 1..height)
        .rev()
        .find(|&y| (left..=last_col).any(|x| ink(x, y)));
    if let Some(y) = bottom_row {
        margin.bottom = (height - 1 - y) as i32;
    }

    debug!(width, height, threshold, %margin, "Detected page margin");
    margin
}

/// Crop `margin` off each side of `source`.
pub fn cut_margin(source: &DynamicImage, margin: Margin) -> Result<DynamicImage, CropError> {
    let (width, height) = source.dimensions();
    let crop = margin.resolve(width, height)?;

    let empty = CropError::EmptyRegion {
        margin,
        width,
        height,
    };

    let inner_w = width
        .checked_sub(crop.left)
        .and_then(|w| w.checked_sub(crop.right))
        .filter(|&w| w > 0)
        .ok_or(empty)?;
    let inner_h = height
        .checked_sub(crop.top)
        .and_then(|h| h.checked_sub(crop.bottom))
        .filter(|&h| h > 0)
        .ok_or(empty)?;

    extract(source, crop.left, crop.top, inner_w, inner_h).ok_or(empty)
}

/// Detect the margin at `threshold` and crop it off.
pub fn cut_margin_auto(source: &DynamicImage, threshold: i32) -> Result<DynamicImage, CropError> {
    cut_margin(source, detect_margin(source, threshold))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{BLACK, WHITE, blank_page, bordered_page, paint_rect};

    // =========================================================================
    // lightness / threshold
    // =========================================================================

    #[test]
    fn lightness_is_mean_of_extremes() {
        assert_eq!(lightness(&Rgb([255, 255, 255])), 255);
        assert_eq!(lightness(&Rgb([0, 0, 0])), 0);
        assert_eq!(lightness(&Rgb([200, 0, 0])), 100);
        assert_eq!(lightness(&Rgb([255, 0, 0])), 127);
        assert_eq!(lightness(&Rgb([10, 250, 100])), 130);
    }

    #[test]
    fn threshold_only_clamps_upward() {
        assert_eq!(clamp_threshold(300), 255);
        assert_eq!(clamp_threshold(255), 255);
        assert_eq!(clamp_threshold(0), 0);
        assert_eq!(clamp_threshold(-5), -5);
    }

    // =========================================================================
    // detect_margin
    // =========================================================================

    #[test]
    fn detects_two_pixel_white_border() {
        let page = bordered_page(10, 10, 2, WHITE, BLACK);
        assert_eq!(detect_margin(&page, 225), Margin::uniform(2));
    }

    #[test]
    fn detects_border_around_colored_content() {
        // Red ink has lightness 100; light-gray paper 240
        let page = bordered_page(10, 10, 2, Rgb([240, 240, 240]), Rgb([200, 0, 0]));
        assert_eq!(detect_margin(&page, 225), Margin::uniform(2));
    }

    #[test]
    fn detects_border_around_gray_content() {
        let page = bordered_page(10, 10, 2, Rgb([250, 250, 250]), Rgb([128, 128, 128]));
        assert_eq!(detect_margin(&page, 240), Margin::uniform(2));
    }

    #[test]
    fn detects_asymmetric_margins() {
        let mut page = blank_page(20, 16, WHITE);
        // Content spans x 3..=14, y 5..=12
        paint_rect(&mut page, 3, 5, 12, 8, BLACK);
        assert_eq!(detect_margin(&page, 128), Margin::new(3, 5, 5, 3));
    }

    #[test]
    fn threshold_is_inclusive() {
        let page = bordered_page(10, 10, 2, WHITE, Rgb([100, 100, 100]));
        assert_eq!(detect_margin(&page, 100), Margin::uniform(2));
        assert_eq!(detect_margin(&page, 99), Margin::NOT_FOUND);
    }

    #[test]
    fn blank_page_has_no_margin() {
        let page = blank_page(10, 10, WHITE);
        let margin = detect_margin(&page, 225);
        assert_eq!(margin, Margin::NOT_FOUND);
        assert!(!margin.is_complete());
    }

    #[test]
    fn threshold_above_255_treats_everything_as_content() {
        let page = blank_page(10, 10, WHITE);
        assert_eq!(detect_margin(&page, 1000), Margin::uniform(0));
    }

    #[test]
    fn negative_threshold_finds_nothing() {
        let page = bordered_page(10, 10, 2, WHITE, BLACK);
        assert_eq!(detect_margin(&page, -1), Margin::NOT_FOUND);
    }

    #[test]
    fn single_column_content_leaves_right_unknown() {
        let mut page = blank_page(10, 10, WHITE);
        paint_rect(&mut page, 4, 2, 1, 6, BLACK);
        assert_eq!(detect_margin(&page, 128), Margin::new(4, 2, NOT_FOUND, 2));
    }

    #[test]
    fn single_row_content_leaves_bottom_unknown() {
        let mut page = blank_page(10, 10, WHITE);
        paint_rect(&mut page, 2, 3, 6, 1, BLACK);
        assert_eq!(detect_margin(&page, 128), Margin::new(2, 3, 2, NOT_FOUND));
    }

    #[test]
    fn empty_image_has_no_margin() {
        let page = blank_page(0, 0, WHITE);
        assert_eq!(detect_margin(&page, 225), Margin::NOT_FOUND);
    }

    // =========================================================================
    // Margin::resolve
    // =========================================================================

    #[test]
    fn resolve_keeps_known_sides() {
        let crop = Margin::new(1, 2, 3, 4).resolve(10, 10).unwrap();
        assert_eq!(
            crop,
            CropMargin {
                left: 1,
                top: 2,
                right: 3,
                bottom: 4
            }
        );
    }

    #[test]
    fn resolve_rejects_missing_left_or_top() {
        assert!(matches!(
            Margin::NOT_FOUND.resolve(10, 10),
            Err(CropError::NoContent(_))
        ));
        assert!(matches!(
            Margin::new(2, NOT_FOUND, 2, 2).resolve(10, 10),
            Err(CropError::NoContent(_))
        ));
    }

    #[test]
    fn resolve_rejects_negative_offsets_other_than_sentinel() {
        for margin in [
            Margin::new(-5, 0, 0, 0),
            Margin::new(0, -2, 0, 0),
            Margin::new(0, 0, -5, 0),
            Margin::new(2, 0, 0, -3),
        ] {
            assert_eq!(
                margin.resolve(10, 10),
                Err(CropError::NegativeOffset(margin))
            );
        }
    }

    #[test]
    fn crop_margin_converts_back_to_known_margin() {
        let crop = CropMargin {
            left: 1,
            top: 2,
            right: 3,
            bottom: u32::MAX,
        };
        let margin = Margin::from(crop);
        assert_eq!(margin, Margin::new(1, 2, 3, i32::MAX));
        assert!(margin.is_complete());
    }

    #[test]
    fn resolve_measures_unknown_far_sides_from_content() {
        let crop = Margin::new(4, 3, NOT_FOUND, NOT_FOUND)
            .resolve(10, 10)
            .unwrap();
        assert_eq!(crop.right, 5);
        assert_eq!(crop.bottom, 6);
    }

    // =========================================================================
    // cut_margin / cut_margin_auto
    // =========================================================================

    #[test]
    fn cut_explicit_margin() {
        let page = bordered_page(10, 10, 2, WHITE, BLACK);
        let cut = cut_margin(&page, Margin::new(1, 1, 2, 2)).unwrap();
        assert_eq!(cut.dimensions(), (7, 7));
    }

    #[test]
    fn cut_auto_removes_border() {
        let page = bordered_page(10, 10, 2, WHITE, BLACK);
        let cut = cut_margin_auto(&page, 200).unwrap();
        assert_eq!(cut.dimensions(), (6, 6));
    }

    #[test]
    fn cut_auto_then_detect_finds_no_gap() {
        let page = bordered_page(24, 18, 3, WHITE, BLACK);
        let cut = cut_margin_auto(&page, 200).unwrap();
        assert_eq!(cut.dimensions(), (18, 12));
        assert_eq!(detect_margin(&cut, 200), Margin::uniform(0));
    }

    #[test]
    fn cut_auto_keeps_only_content_pixels() {
        let page = bordered_page(12, 12, 3, WHITE, BLACK);
        let cut = cut_margin_auto(&page, 200).unwrap().to_rgb8();
        assert!(cut.pixels().all(|p| *p == BLACK));
    }

    #[test]
    fn cut_auto_on_blank_page_is_no_content() {
        let page = blank_page(10, 10, WHITE);
        assert_eq!(
            cut_margin_auto(&page, 225).unwrap_err(),
            CropError::NoContent(Margin::NOT_FOUND)
        );
    }

    #[test]
    fn cut_auto_single_column_content() {
        let mut page = blank_page(10, 10, WHITE);
        paint_rect(&mut page, 4, 2, 1, 6, BLACK);
        let cut = cut_margin_auto(&page, 128).unwrap();
        assert_eq!(cut.dimensions(), (1, 6));
    }

    #[test]
    fn cut_margin_wider_than_image_is_empty() {
        let page = bordered_page(10, 10, 2, WHITE, BLACK);
        let err = cut_margin(&page, Margin::new(6, 0, 6, 0)).unwrap_err();
        assert!(matches!(
            err,
            CropError::EmptyRegion {
                width: 10,
                height: 10,
                ..
            }
        ));
    }

    #[test]
    fn cut_margin_negative_right_is_rejected() {
        let page = bordered_page(10, 10, 2, WHITE, BLACK);
        let margin = Margin::new(0, 0, -5, 0);
        assert_eq!(
            cut_margin(&page, margin).unwrap_err(),
            CropError::NegativeOffset(margin)
        );
    }

    #[test]
    fn cut_margin_consuming_whole_height_is_empty() {
        let page = bordered_page(10, 10, 2, WHITE, BLACK);
        assert!(cut_margin(&page, Margin::new(0, 5, 0, 5)).is_err());
    }
}
