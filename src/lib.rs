//! # pspcomic
//!
//! Prepares scanned comic pages for small handheld screens (480x272 by
//! default): the blank paper border is trimmed, the page is fitted to the
//! screen, and the result is re-encoded as JPEG or BMP.
//!
//! # Architecture: One Page, Four Steps
//!
//! ```text
//! load  →  trim   (detect_margin + cut_margin)
//!       →  fit    (calc_size + resize, optional center crop)
//!       →  encode (JPEG with quality, or BMP)
//! ```
//!
//! Only load and encode touch the filesystem. They sit behind the
//! [`imaging::ImageBackend`] trait; everything in between is pure pixel work
//! on an in-memory [`image::DynamicImage`], so the pipeline is tested
//! end-to-end against a mock without encoding a single file.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Size math, region extraction, margin detection, resize, codecs |
//! | [`process`] | The page pipeline and the single-step detect / trim / crop / resize helpers |
//! | [`config`] | Layered `pspcomic.toml` loading: stock defaults → file → CLI flags |
//! | [`output`] | CLI output formatting: pure `format_*` functions plus `print_*` wrappers |
//!
//! # Design Decisions
//!
//! ## Lightness, Not Luma
//!
//! A pixel counts as content when its HSL lightness, `(max + min) / 2` over
//! its RGB channels, is at or below the threshold. Saturated colors such as a
//! pure red panel border (lightness 127) register as content even though
//! their luma is high, which is what a colored comic page needs.
//!
//! ## Never Upscale by Default
//!
//! Under the default `scale` policy a page smaller than the target box is
//! written at its own size. Blowing a low-resolution scan up only adds blur
//! and bytes; the handheld's viewer centers small pages on its own.
//!
//! ## Blank Pages Are Not Errors
//!
//! A page with nothing darker than the threshold has no margin to trim. The
//! pipeline keeps it whole and logs a warning, so a script looping over a
//! chapter does not stop at the first blank page. The strict `trim` command and
//! [`imaging::cut_margin_auto`] still report it as an error.
//!
//! ## Pure-Rust Codecs
//!
//! Decoding and encoding use the `image` crate's pure-Rust codecs. There is no
//! system dependency to install; the binary is self-contained.

pub mod config;
pub mod imaging;
pub mod output;
pub mod process;

#[cfg(test)]
pub(crate) mod test_helpers;
