//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Each photo leads with its positional index and title. The source path,
//! assigned slug and how the served files were produced follow as indented
//! context lines, so the output reads as a photo inventory while still letting
//! users trace entries back to files.
//!
//! # Output Format
//!
//! ## Build
//!
//! ```text
//! Processing 3 photos (optimize)
//!     001 Golden Hour
//!         Source: a/sunset.jpg
//!         Slug: sunset
//!         Variants: encoded
//!     002 sunset
//!         Source: b/sunset.jpg
//!         Slug: sunset-2
//!         Variants: cached
//! Variants: 1 cached, 1 encoded (2 total)
//! Manifest written: site/src/generated/manifest.json (2 items)
//! ```
//!
//! ## Categories
//!
//! ```text
//! landscape
//! portrait
//! ```
//!
//! # Architecture
//!
//! Every `format_*` function is pure and returns `Vec<String>`; the `print_*`
//! wrappers write those lines to stdout.

use crate::optimize::VariantStatus;
use crate::process::{ProcessEvent, ProcessResult};
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn status_label(status: VariantStatus) -> &'static str {
    match status {
        VariantStatus::Cached => "cached",
        VariantStatus::Copied => "copied",
        VariantStatus::Encoded => "encoded",
    }
}

fn photo_count(n: usize) -> String {
    if n == 1 {
        "1 photo".to_string()
    } else {
        format!("{} photos", n)
    }
}

// ============================================================================
// Build progress
// ============================================================================

/// Format a single build progress event as display lines.
pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    match event {
        ProcessEvent::Started { image_count, mode } => {
            vec![format!("Processing {} ({})", photo_count(*image_count), mode)]
        }
        ProcessEvent::ImageProcessed {
            index,
            title,
            slug,
            source_path,
            status,
        } => vec![
            format!("    {} {}", format_index(*index), title),
            format!("        Source: {}", source_path),
            format!("        Slug: {}", slug),
            format!("        Variants: {}", status_label(*status)),
        ],
    }
}

/// Print a build progress event to stdout.
pub fn print_process_event(event: &ProcessEvent) {
    for line in format_process_event(event) {
        println!("{}", line);
    }
}

// ============================================================================
// Build summary
// ============================================================================

/// Format the lines printed after the manifest has been written.
pub fn format_build_summary(result: &ProcessResult, manifest_path: &Path) -> Vec<String> {
    if !result.source_found {
        return vec!["No photos directory yet. Created empty manifest.".to_string()];
    }
    let mut lines = Vec::new();
    if result.cache_stats.total() > 0 {
        lines.push(format!("Variants: {}", result.cache_stats));
    }
    lines.push(format!(
        "Manifest written: {} ({} items)",
        manifest_path.display(),
        result.manifest.len()
    ));
    lines
}

/// Print the build summary to stdout.
pub fn print_build_summary(result: &ProcessResult, manifest_path: &Path) {
    for line in format_build_summary(result, manifest_path) {
        println!("{}", line);
    }
}

// ============================================================================
// Categories
// ============================================================================

/// One category per line; a note when there are none.
pub fn format_categories(categories: &[String]) -> Vec<String> {
    if categories.is_empty() {
        return vec!["No categories".to_string()];
    }
    categories.to_vec()
}

/// Print the category list to stdout.
pub fn print_categories(categories: &[String]) {
    for line in format_categories(categories) {
        println!("{}", line);
    }
}
