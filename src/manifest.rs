//! The manifest artifact: final ordering, persistence, and read-side helpers.
//!
//! ## Ordering
//!
//! ```text
//! 1. Dated entries, date descending (plain string comparison)
//! 2. Undated entries, slug ascending
//! ```
//!
//! Dates are compared as strings, so `2024-05-01` sorts correctly but mixed
//! formats (`May 2024` vs `2024-05`) do not. Entries with equal dates keep
//! traversal order.
//!
//! ## File format
//!
//! A bare JSON array of [`ManifestEntry`] objects, pretty-printed with 2-space
//! indent and a trailing newline. The file is only written once the whole
//! collection has been built, so a failed build never leaves a partial manifest.

use crate::types::{Manifest, ManifestEntry};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Display order of two entries.
pub fn compare_entries(a: &ManifestEntry, b: &ManifestEntry) -> Ordering {
    match (&a.date, &b.date) {
        (Some(da), Some(db)) => db.cmp(da),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.slug.cmp(&b.slug),
    }
}

/// Sort entries into display order (stable).
pub fn sort_entries(entries: &mut [ManifestEntry]) {
    entries.sort_by(compare_entries);
}

/// Serialize a manifest exactly as written to disk.
pub fn to_json(manifest: &Manifest) -> Result<String, serde_json::Error> {
    let mut json = serde_json::to_string_pretty(manifest)?;
    json.push('\n');
    Ok(json)
}

/// Write the manifest, creating parent directories as needed.
pub fn write_manifest(path: &Path, manifest: &Manifest) -> Result<(), ManifestError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, to_json(manifest)?)?;
    Ok(())
}

/// Read a previously written manifest.
pub fn load_manifest(path: &Path) -> Result<Manifest, ManifestError> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Distinct, trimmed, non-empty categories across all entries, sorted.
pub fn category_list(entries: &[ManifestEntry]) -> Vec<String> {
    entries
        .iter()
        .flat_map(|e| e.categories.iter())
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .map(String::from)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
