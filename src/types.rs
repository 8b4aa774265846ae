//! Shared types for the manifest pipeline.
//!
//! [`ManifestEntry`] is the wire format consumed by the site generator, so its
//! serialized field names are fixed (`camelCase`, nullable `date`/`webpUrl`).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One input image found during traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    /// Path on disk.
    pub absolute_path: PathBuf,
    /// Path below the photo root, `/`-separated on every platform.
    pub relative_path: String,
}

impl SourceImage {
    /// Filename without directory or extension (`a/sunset.jpg` → `sunset`).
    pub fn stem(&self) -> String {
        self.absolute_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// One photo in the output manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    pub slug: String,
    pub title: String,
    pub date: Option<String>,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub location: String,
    pub description: String,
    /// Source path relative to the photo root.
    pub asset_path: String,
    pub image_url: String,
    pub webp_url: Option<String>,
    /// Pixel size of the served primary image.
    pub width: u32,
    pub height: u32,
    pub aspect_ratio: f64,
}

/// The ordered collection written as the build artifact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    pub entries: Vec<ManifestEntry>,
}

impl Manifest {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
