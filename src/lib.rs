//! # Photo Manifest
//!
//! Build-time photo manifest generator for static sites. Point it at a tree of
//! JPEGs with optional YAML sidecars and it produces the served images plus one
//! JSON manifest describing every photo, ready for a site generator to render.
//!
//! # Pipeline
//!
//! ```text
//! photos/              scan          sorted SourceImages
//!   a/sunset.jpg   ───────────►  ──► metadata + slug ──► optimizer ──► ManifestEntry
//!   a/sunset.yml                                          │
//!   b/sunset.jpg                                          ▼
//!                                             site/public/photos/a/sunset.{jpg,webp}
//!
//! entries ──► display order ──► site/src/generated/manifest.json
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Recursive traversal, JPEG extension filter, deterministic path order |
//! | [`metadata`] | YAML sidecar lookup and normalization |
//! | [`naming`] | `slugify` and collision suffixing (`-2`, `-3`, …) |
//! | [`optimize`] | Served-asset strategies: optimize (JPEG + WebP) or copy |
//! | [`imaging`] | Image backend trait, pure-Rust encoder, JPEG header reader |
//! | [`cache`] | Modification-time freshness of optimized outputs |
//! | [`process`] | Orchestrates the per-image pipeline and reports progress |
//! | [`manifest`] | Display ordering, JSON persistence, category listing |
//! | [`config`] | Environment-style build settings |
//! | [`types`] | `SourceImage`, `ManifestEntry`, `Manifest` |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Degrade, Don't Fail
//!
//! Image encoding needs a working codec stack. If the backend cannot encode
//! (probed once per run) or optimization is disabled, originals are copied
//! verbatim and their sizes read straight from the JPEG header, so a build
//! still produces a complete manifest with correct dimensions.
//!
//! ## Fail Fast Everywhere Else
//!
//! A broken sidecar, an undecodable image or a name that yields no slug
//! aborts the build. The manifest is written only after every image
//! succeeded, so consumers never see a partial artifact.
//!
//! ## Deterministic Output
//!
//! Traversal is sorted by path before slugs are assigned, and the final
//! order depends only on dates and slugs. Identical inputs always produce a
//! byte-identical manifest.

pub mod cache;
pub mod config;
pub mod imaging;
pub mod manifest;
pub mod metadata;
pub mod naming;
pub mod optimize;
pub mod output;
pub mod process;
pub mod scan;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
