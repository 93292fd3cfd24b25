//! Shared test utilities for the pspcomic test suite.
//!
//! Builds small synthetic pages so margin, crop and resize tests can assert
//! exact pixel outcomes without fixture files.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! // 10x10 page: 2px white paper around black ink
//! let page = bordered_page(10, 10, 2, WHITE, BLACK);
//! assert_eq!(detect_margin(&page, 225), Margin::uniform(2));
//! ```

use image::{DynamicImage, Rgb, RgbImage};

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

/// A page filled with a single color.
pub fn blank_page(width: u32, height: u32, color: Rgb<u8>) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, color))
}

/// A page of `paper` with a `border`-pixel band on every side and `ink` inside.
pub fn bordered_page(
    width: u32,
    height: u32,
    border: u32,
    paper: Rgb<u8>,
    ink: Rgb<u8>,
) -> DynamicImage {
    let img = RgbImage::from_fn(width, height, |x, y| {
        let inside = x >= border
            && y >= border
            && x < width.saturating_sub(border)
            && y < height.saturating_sub(border);
        if inside { ink } else { paper }
    });
    DynamicImage::ImageRgb8(img)
}

/// A page where every pixel differs from its neighbours, for copy checks.
pub fn gradient_page(width: u32, height: u32) -> DynamicImage {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    DynamicImage::ImageRgb8(img)
}

/// Fill the `width` x `height` rectangle at `(x, y)` with `color`.
///
/// Panics unless `page` is RGB8; every builder here produces RGB8.
pub fn paint_rect(
    page: &mut DynamicImage,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    color: Rgb<u8>,
) {
    let DynamicImage::ImageRgb8(img) = page else {
        panic!("paint_rect expects an RGB8 page");
    };
    for py in y..y + height {
        for px in x..x + width {
            img.put_pixel(px, py, color);
        }
    }
}
