//! Manifest construction.
//!
//! Runs every source image through the pipeline, in traversal order:
//!
//! ```text
//! scan ─► for each image (sorted by path):
//!           sidecar metadata ─► slug (hint or stem) ─► unique slug
//!           ─► optimizer (encode / cache / copy) ─► ManifestEntry
//!         ─► sort for display
//! ```
//!
//! Images are handled one at a time. Slug registration depends on that order:
//! the first image to claim `sunset` keeps it, later ones get `sunset-2`,
//! `sunset-3` and so on. Parallelism lives inside the backend, which encodes
//! an image's two variants concurrently.
//!
//! Any error aborts the whole build. Nothing is written here; the caller
//! persists the returned manifest only on success.
//!
//! Progress is reported as [`ProcessEvent`]s over an optional channel so the
//! CLI can print while the build runs.

use crate::cache::CacheStats;
use crate::config::BuildConfig;
use crate::imaging::{ImageBackend, aspect_ratio};
use crate::manifest;
use crate::metadata::{self, MetadataError};
use crate::naming::{slugify, unique_slug};
use crate::optimize::{OptimizeError, Optimizer, VariantStatus, select_optimizer};
use crate::scan::{self, ScanError};
use crate::types::{Manifest, ManifestEntry, SourceImage};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Metadata(#[from] MetadataError),
    #[error(transparent)]
    Optimize(#[from] OptimizeError),
    #[error("Cannot derive a slug for {0}")]
    CannotDeriveSlug(PathBuf),
}

/// Progress reported while the manifest is built.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessEvent {
    Started {
        image_count: usize,
        mode: &'static str,
    },
    ImageProcessed {
        /// 1-based position in traversal order.
        index: usize,
        title: String,
        slug: String,
        source_path: String,
        status: VariantStatus,
    },
}

/// Result of a build: the sorted manifest plus how its assets were produced.
#[derive(Debug)]
pub struct ProcessResult {
    pub manifest: Manifest,
    pub cache_stats: CacheStats,
    /// `false` when the photo root does not exist (a fresh project).
    pub source_found: bool,
}

/// Select an optimizer for `config` and build the manifest.
pub fn process(
    source_root: &Path,
    public_dir: &Path,
    config: &BuildConfig,
    backend: &impl ImageBackend,
    events: Option<Sender<ProcessEvent>>,
) -> Result<ProcessResult, ProcessError> {
    let optimizer = select_optimizer(config, public_dir, backend);
    build_manifest(source_root, optimizer.as_ref(), events)
}

/// Build the manifest with a specific optimizer.
pub fn build_manifest(
    source_root: &Path,
    optimizer: &dyn Optimizer,
    events: Option<Sender<ProcessEvent>>,
) -> Result<ProcessResult, ProcessError> {
    let source_found = source_root.is_dir();
    let images = scan::scan(source_root)?;

    if let Some(tx) = &events {
        tx.send(ProcessEvent::Started {
            image_count: images.len(),
            mode: optimizer.mode(),
        })
        .ok();
    }

    let mut used_slugs = HashSet::new();
    let mut cache_stats = CacheStats::default();
    let mut entries = Vec::with_capacity(images.len());

    for (i, image) in images.iter().enumerate() {
        let (entry, status) = build_entry(image, optimizer, &mut used_slugs)?;
        match status {
            VariantStatus::Cached => cache_stats.hit(),
            VariantStatus::Copied => cache_stats.copy(),
            VariantStatus::Encoded => cache_stats.miss(),
        }

        if let Some(tx) = &events {
            tx.send(ProcessEvent::ImageProcessed {
                index: i + 1,
                title: entry.title.clone(),
                slug: entry.slug.clone(),
                source_path: entry.asset_path.clone(),
                status,
            })
            .ok();
        }
        entries.push(entry);
    }

    manifest::sort_entries(&mut entries);

    Ok(ProcessResult {
        manifest: Manifest { entries },
        cache_stats,
        source_found,
    })
}

/// Slug base for an image: the slugified hint, else the slugified stem.
pub fn derive_slug(hint: Option<&str>, stem: &str) -> Option<String> {
    hint.map(slugify)
        .filter(|s| !s.is_empty())
        .or_else(|| Some(slugify(stem)).filter(|s| !s.is_empty()))
}

fn build_entry(
    image: &SourceImage,
    optimizer: &dyn Optimizer,
    used_slugs: &mut HashSet<String>,
) -> Result<(ManifestEntry, VariantStatus), ProcessError> {
    let meta = metadata::load_for_image(&image.absolute_path)?;
    let stem = image.stem();

    let title =
        metadata::resolve(&[meta.title.as_deref(), Some(&stem)]).unwrap_or_else(|| stem.clone());
    let base = derive_slug(meta.slug.as_deref(), &stem)
        .ok_or_else(|| ProcessError::CannotDeriveSlug(image.absolute_path.clone()))?;
    let slug = unique_slug(&base, used_slugs);

    let optimized = optimizer.optimize(&image.relative_path, &image.absolute_path)?;
    debug!(
        source = %image.relative_path,
        slug = %slug,
        status = ?optimized.status,
        width = optimized.width,
        height = optimized.height,
        "image processed"
    );

    let entry = ManifestEntry {
        slug,
        title,
        date: meta.date,
        categories: meta.categories,
        tags: meta.tags,
        location: meta.location.unwrap_or_default(),
        description: meta.description.unwrap_or_default(),
        asset_path: image.relative_path.clone(),
        image_url: optimized.image_url,
        webp_url: optimized.webp_url,
        width: optimized.width,
        height: optimized.height,
        aspect_ratio: aspect_ratio(optimized.width, optimized.height),
    };
    Ok((entry, optimized.status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::Dimensions;
    use crate::imaging::backend::tests::MockBackend;
    use crate::optimize::{CopyingBackend, OptimizingBackend};
    use crate::test_helpers::write_test_jpeg;
    use std::fs;
    use tempfile::TempDir;

    fn dims(width: u32, height: u32) -> Dimensions {
        Dimensions { width, height }
    }

    // =========================================================================
    // Slug derivation
    // =========================================================================

    #[test]
    fn derive_slug_prefers_hint() {
        assert_eq!(
            derive_slug(Some("Golden Hour!"), "IMG_001"),
            Some("golden-hour".to_string())
        );
    }

    #[test]
    fn derive_slug_falls_back_to_stem() {
        assert_eq!(derive_slug(None, "IMG_001"), Some("img-001".to_string()));
        assert_eq!(derive_slug(Some("!!!"), "IMG_001"), Some("img-001".to_string()));
    }

    #[test]
    fn derive_slug_fails_without_alphanumerics() {
        assert_eq!(derive_slug(Some("--"), "___"), None);
    }

    // =========================================================================
    // Building with the copying optimizer
    // =========================================================================

    #[test]
    fn collisions_follow_traversal_order() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("photos");
        write_test_jpeg(&root.join("a/sunset.jpg"), 20, 10);
        write_test_jpeg(&root.join("b/sunset.jpg"), 10, 20);
        write_test_jpeg(&root.join("c/Sunset.JPG"), 10, 10);

        let config = BuildConfig::default();
        let public = tmp.path().join("public");
        let result =
            build_manifest(&root, &CopyingBackend::new(&config, &public), None).unwrap();

        let by_path: Vec<(&str, &str)> = result
            .manifest
            .entries
            .iter()
            .map(|e| (e.asset_path.as_str(), e.slug.as_str()))
            .collect();
        assert!(by_path.contains(&("a/sunset.jpg", "sunset")));
        assert!(by_path.contains(&("b/sunset.jpg", "sunset-2")));
        assert!(by_path.contains(&("c/Sunset.JPG", "sunset-3")));
    }

    #[test]
    fn entry_fields_from_sidecar_and_defaults() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("photos");
        write_test_jpeg(&root.join("a/sunset.jpg"), 40, 30);
        fs::write(
            root.join("a/sunset.yml"),
            "title: Golden Hour\ndate: 2024-05-01\ncategories: landscape\nlocation: Lisbon\n",
        )
        .unwrap();
        write_test_jpeg(&root.join("b/IMG_7.jpeg"), 30, 40);

        let config = BuildConfig::default();
        let public = tmp.path().join("public");
        let result =
            build_manifest(&root, &CopyingBackend::new(&config, &public), None).unwrap();
        let entries = &result.manifest.entries;

        assert_eq!(entries.len(), 2);
        let first = &entries[0];
        assert_eq!(first.title, "Golden Hour");
        assert_eq!(first.date.as_deref(), Some("2024-05-01"));
        assert_eq!(first.categories, vec!["landscape"]);
        assert_eq!(first.location, "Lisbon");
        assert_eq!(first.description, "");
        assert_eq!(first.image_url, "/photos/a/sunset.jpg");

        let second = &entries[1];
        assert_eq!(second.title, "IMG_7");
        assert_eq!(second.slug, "img-7");
        assert_eq!(second.date, None);
        assert!(second.tags.is_empty());
        assert_eq!((second.width, second.height), (30, 40));
        assert_eq!(second.aspect_ratio, 0.75);
        assert_eq!(result.cache_stats.copies, 2);
        assert!(result.source_found);
    }

    #[test]
    fn missing_root_builds_empty_manifest() {
        let tmp = TempDir::new().unwrap();
        let config = BuildConfig::default();
        let public = tmp.path().join("public");

        let result = build_manifest(
            &tmp.path().join("photos"),
            &CopyingBackend::new(&config, &public),
            None,
        )
        .unwrap();

        assert!(result.manifest.is_empty());
        assert!(!result.source_found);
    }

    #[test]
    fn file_root_aborts_build() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("photos");
        fs::write(&root, b"").unwrap();

        let config = BuildConfig::default();
        let public = tmp.path().join("public");
        let err = build_manifest(&root, &CopyingBackend::new(&config, &public), None)
            .unwrap_err();

        assert!(matches!(err, ProcessError::Scan(ScanError::Io(_))));
    }

    #[test]
    fn unsluggable_image_aborts_build() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("photos");
        write_test_jpeg(&root.join("___.jpg"), 4, 4);

        let config = BuildConfig::default();
        let public = tmp.path().join("public");
        let err = build_manifest(&root, &CopyingBackend::new(&config, &public), None)
            .unwrap_err();

        assert!(matches!(err, ProcessError::CannotDeriveSlug(p) if p.ends_with("___.jpg")));
    }

    #[test]
    fn bad_sidecar_aborts_build() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("photos");
        write_test_jpeg(&root.join("a.jpg"), 4, 4);
        fs::write(root.join("a.yml"), "tags: [unclosed\n").unwrap();

        let config = BuildConfig::default();
        let public = tmp.path().join("public");
        let err = build_manifest(&root, &CopyingBackend::new(&config, &public), None)
            .unwrap_err();

        assert!(matches!(err, ProcessError::Metadata(_)));
    }

    // =========================================================================
    // Building with the mock backend
    // =========================================================================

    #[test]
    fn optimized_build_uses_output_dimensions() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("photos");
        write_test_jpeg(&root.join("wide.jpg"), 40, 20);

        let config = BuildConfig::default();
        let public = tmp.path().join("public");
        let backend = MockBackend::with_dimensions(vec![dims(2560, 1280)]);
        let result = build_manifest(
            &root,
            &OptimizingBackend::new(&config, &public, &backend),
            None,
        )
        .unwrap();

        let entry = &result.manifest.entries[0];
        assert_eq!((entry.width, entry.height), (2560, 1280));
        assert_eq!(entry.aspect_ratio, 2.0);
        assert_eq!(entry.webp_url.as_deref(), Some("/photos/wide.webp"));
        assert_eq!(result.cache_stats.misses, 1);
    }

    #[test]
    fn process_falls_back_to_copy_when_backend_unavailable() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("photos");
        write_test_jpeg(&root.join("a.jpg"), 8, 6);
        write_test_jpeg(&root.join("b.jpg"), 6, 8);

        let backend = MockBackend::unavailable("no encoder");
        let result = process(
            &root,
            &tmp.path().join("public"),
            &BuildConfig::default(),
            &backend,
            None,
        )
        .unwrap();

        assert_eq!(result.cache_stats.copies, 2);
        assert!(result.manifest.entries.iter().all(|e| e.webp_url.is_none()));
        // Probed once, never asked to encode
        assert_eq!(backend.get_operations().len(), 1);
    }

    #[test]
    fn events_report_each_image_in_traversal_order() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("photos");
        write_test_jpeg(&root.join("b.jpg"), 4, 4);
        write_test_jpeg(&root.join("a.jpg"), 4, 4);

        let config = BuildConfig::default();
        let public = tmp.path().join("public");
        let (tx, rx) = std::sync::mpsc::channel();
        build_manifest(&root, &CopyingBackend::new(&config, &public), Some(tx)).unwrap();

        let events: Vec<ProcessEvent> = rx.iter().collect();
        assert_eq!(
            events[0],
            ProcessEvent::Started {
                image_count: 2,
                mode: "copy"
            }
        );
        assert!(matches!(
            &events[1],
            ProcessEvent::ImageProcessed { index: 1, slug, status: VariantStatus::Copied, .. }
                if slug == "a"
        ));
        assert!(matches!(
            &events[2],
            ProcessEvent::ImageProcessed { index: 2, slug, .. } if slug == "b"
        ));
    }
}
