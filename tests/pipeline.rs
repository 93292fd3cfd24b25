//! End-to-end pipeline tests through the real `image` codecs.
//!
//! Pages are built in memory, written with lossless encoders, and pushed
//! through [`RustBackend`] so load, trim, fit and encode all run for real.

use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader, Rgb, RgbImage};
use pspcomic::config::{Config, MarginConfig, OutputConfig, ResizeConfig};
use pspcomic::imaging::{
    CropError, Dimensions, FitPolicy, Margin, OutputFormat, Quality, RustBackend,
    cut_margin_auto, detect_margin, load_image, save_as_jpeg,
};
use pspcomic::process::{self, TrimStatus};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const PAPER: Rgb<u8> = Rgb([250, 250, 245]);
const INK: Rgb<u8> = Rgb([20, 20, 20]);

/// `width` x `height` page with a `border`-pixel paper band around ink.
fn page(width: u32, height: u32, border: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        let inside =
            x >= border && y >= border && x + border < width && y + border < height;
        if inside { INK } else { PAPER }
    }))
}

fn write_png(dir: &Path, name: &str, image: &DynamicImage) -> PathBuf {
    let path = dir.join(name);
    image.save_with_format(&path, ImageFormat::Png).unwrap();
    path
}

fn sniffed_format(path: &Path) -> Option<ImageFormat> {
    ImageReader::open(path)
        .unwrap()
        .with_guessed_format()
        .unwrap()
        .format()
}

#[test]
fn process_page_writes_fitted_jpeg() {
    let tmp = TempDir::new().unwrap();
    let input = write_png(tmp.path(), "001.png", &page(1000, 1500, 100));
    let output = tmp.path().join("001-psp.jpg");

    let report =
        process::process_page(&RustBackend::new(), &input, &output, &Config::default()).unwrap();

    assert_eq!(report.trim, TrimStatus::Trimmed(Margin::uniform(100)));
    assert_eq!(report.trimmed, Dimensions::new(800, 1300));
    assert_eq!(report.output_dims, Dimensions::new(167, 272));

    assert_eq!(sniffed_format(&output), Some(ImageFormat::Jpeg));
    assert_eq!(load_image(&output).unwrap().dimensions(), (167, 272));
}

#[test]
fn process_page_bmp_center_fill() {
    let tmp = TempDir::new().unwrap();
    let input = write_png(tmp.path(), "wide.png", &page(1200, 400, 0));
    let output = tmp.path().join("wide-psp.bmp");

    let config = Config {
        resize: ResizeConfig {
            policy: FitPolicy::Center,
            ..Default::default()
        },
        margin: MarginConfig {
            trim: false,
            ..Default::default()
        },
        output: OutputConfig {
            format: OutputFormat::Bmp,
            quality: 90,
        },
    };
    process::process_page(&RustBackend::new(), &input, &output, &config).unwrap();

    assert_eq!(sniffed_format(&output), Some(ImageFormat::Bmp));
    let written = load_image(&output).unwrap();
    assert_eq!(written.dimensions(), (480, 272));
    // Solid ink survives resampling and a lossless encoder unchanged
    assert!(written.to_rgb8().pixels().all(|p| *p == INK));
}

#[test]
fn small_page_is_written_at_own_size() {
    let tmp = TempDir::new().unwrap();
    let input = write_png(tmp.path(), "002.png", &page(300, 200, 0));
    let output = tmp.path().join("psp/002-psp.jpg");

    let report =
        process::process_page(&RustBackend::new(), &input, &output, &Config::default()).unwrap();

    assert!(output.is_file());
    // 300x200 is already smaller than the box
    assert_eq!(report.output_dims, Dimensions::new(300, 200));
}

#[test]
fn blank_page_passes_through_pipeline() {
    let tmp = TempDir::new().unwrap();
    let blank = DynamicImage::ImageRgb8(RgbImage::from_pixel(96, 54, PAPER));
    let input = write_png(tmp.path(), "blank.png", &blank);
    let output = tmp.path().join("blank-psp.jpg");

    let report =
        process::process_page(&RustBackend::new(), &input, &output, &Config::default()).unwrap();

    assert_eq!(report.trim, TrimStatus::Skipped(Margin::NOT_FOUND));
    assert_eq!(load_image(&output).unwrap().dimensions(), (96, 54));
}

#[test]
fn margin_survives_lossless_round_trip() {
    let tmp = TempDir::new().unwrap();
    let input = write_png(tmp.path(), "p.png", &page(64, 48, 5));

    let decoded = load_image(&input).unwrap();
    assert_eq!(detect_margin(&decoded, 225), Margin::uniform(5));

    let trimmed = cut_margin_auto(&decoded, 225).unwrap();
    assert_eq!(trimmed.dimensions(), (54, 38));
    assert!(trimmed.to_rgb8().pixels().all(|p| *p == INK));
}

#[test]
fn margin_survives_jpeg_round_trip() {
    let tmp = TempDir::new().unwrap();
    // Pure white around pure black; ringing stays within a few levels of each
    let bordered = DynamicImage::ImageRgb8(RgbImage::from_fn(10, 10, |x, y| {
        if (2..8).contains(&x) && (2..8).contains(&y) {
            Rgb([0, 0, 0])
        } else {
            Rgb([255, 255, 255])
        }
    }));

    for quality in [75, 89, 95] {
        let path = tmp.path().join(format!("q{quality}.jpg"));
        save_as_jpeg(&bordered, &path, Quality::new(quality)).unwrap();
        let decoded = load_image(&path).unwrap();

        assert_eq!(detect_margin(&decoded, 225), Margin::uniform(2), "quality {quality}");
        let trimmed = cut_margin_auto(&decoded, 200).unwrap();
        assert_eq!(trimmed.dimensions(), (6, 6), "quality {quality}");
    }
}

#[test]
fn auto_cut_on_blank_decoded_page_is_no_content() {
    let tmp = TempDir::new().unwrap();
    let blank = DynamicImage::ImageRgb8(RgbImage::from_pixel(16, 16, PAPER));
    let input = write_png(tmp.path(), "blank.png", &blank);

    let decoded = load_image(&input).unwrap();
    assert!(matches!(
        cut_margin_auto(&decoded, 225),
        Err(CropError::NoContent(_))
    ));
}

#[test]
fn jpeg_quality_round_trip_keeps_dimensions() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("q.jpg");

    save_as_jpeg(&page(123, 77, 10), &path, Quality::new(40)).unwrap();
    assert_eq!(load_image(&path).unwrap().dimensions(), (123, 77));
}

#[test]
fn crop_and_resize_helpers_write_files() {
    let tmp = TempDir::new().unwrap();
    let backend = RustBackend::new();
    let input = write_png(tmp.path(), "p.png", &page(200, 100, 10));

    let cropped = tmp.path().join("out/cropped.bmp");
    let dims = process::crop_page(
        &backend,
        &input,
        &cropped,
        Margin::uniform(10),
        OutputFormat::Bmp,
        Quality::default(),
    )
    .unwrap();
    assert_eq!(dims, Dimensions::new(180, 80));
    assert_eq!(load_image(&cropped).unwrap().dimensions(), (180, 80));

    let resized = tmp.path().join("out/resized.jpg");
    let dims = process::resize_page(
        &backend,
        &input,
        &resized,
        Dimensions::new(100, 0),
        FitPolicy::Scale,
        OutputFormat::Jpeg,
        Quality::default(),
    )
    .unwrap();
    assert_eq!(dims, Dimensions::new(100, 50));
    assert_eq!(load_image(&resized).unwrap().dimensions(), (100, 50));
}
