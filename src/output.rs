//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! The page leads with its file name. Dimensions, margin and output path
//! follow as indented context lines, in pipeline order, so the report reads
//! as a record of what happened at each step.
//!
//! # Output Format
//!
//! ## Process
//!
//! ```text
//! 001.png
//!     Source: 1000x1500
//!     Margin: trimmed (left=100 top=100 right=100 bottom=100)
//!     Trimmed: 800x1300
//!     Output: 001-psp.jpg (167x272 jpeg)
//! ```
//!
//! A blank page:
//!
//! ```text
//! 002.png
//!     Source: 960x544
//!     Margin: none found, kept whole
//!     Output: 002-psp.jpg (480x272 jpeg)
//! ```
//!
//! ## Detect
//!
//! ```text
//! 001.png (threshold 225)
//!     left: 100
//!     top: 100
//!     right: 100
//!     bottom: not found
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::imaging::{Dimensions, Margin, NOT_FOUND, OutputFormat};
use crate::process::{PageReport, TrimStatus};
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// File name of `path`, falling back to the full path.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// A margin field, or `not found` for the sentinel.
fn margin_field(value: i32) -> String {
    if value == NOT_FOUND {
        "not found".to_string()
    } else {
        value.to_string()
    }
}

fn output_line(name: &str, dims: Dimensions, format: OutputFormat) -> String {
    format!("{}Output: {} ({} {})", indent(1), name, dims, format)
}

// ============================================================================
// process
// ============================================================================

/// Format one processed page.
///
/// The `Trimmed:` line only appears when trimming changed the size.
pub fn format_page_report(report: &PageReport) -> Vec<String> {
    let mut lines = vec![
        display_name(&report.input),
        format!("{}Source: {}", indent(1), report.source),
    ];

    let margin = match report.trim {
        TrimStatus::Disabled => "not trimmed".to_string(),
        TrimStatus::Trimmed(m) => format!("trimmed ({})", m),
        TrimStatus::Skipped(_) => "none found, kept whole".to_string(),
    };
    lines.push(format!("{}Margin: {}", indent(1), margin));

    if report.trimmed != report.source {
        lines.push(format!("{}Trimmed: {}", indent(1), report.trimmed));
    }
    lines.push(output_line(
        &display_name(&report.output),
        report.output_dims,
        report.format,
    ));
    lines
}

pub fn print_page_report(report: &PageReport) {
    for line in format_page_report(report) {
        println!("{}", line);
    }
}

// ============================================================================
// detect
// ============================================================================

/// Format a raw detected margin, spelling out sentinel fields.
pub fn format_margin(input: &Path, threshold: i32, margin: Margin) -> Vec<String> {
    vec![
        format!("{} (threshold {})", display_name(input), threshold),
        format!("{}left: {}", indent(1), margin_field(margin.left)),
        format!("{}top: {}", indent(1), margin_field(margin.top)),
        format!("{}right: {}", indent(1), margin_field(margin.right)),
        format!("{}bottom: {}", indent(1), margin_field(margin.bottom)),
    ]
}

pub fn print_margin(input: &Path, threshold: i32, margin: Margin) {
    for line in format_margin(input, threshold, margin) {
        println!("{}", line);
    }
}

// ============================================================================
// crop / resize
// ============================================================================

/// Single-line result for the one-step commands.
pub fn format_written(
    input: &Path,
    output: &Path,
    dims: Dimensions,
    format: OutputFormat,
) -> String {
    format!(
        "{} → {} ({} {})",
        display_name(input),
        output.display(),
        dims,
        format
    )
}
