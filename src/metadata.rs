//! Sidecar metadata resolution.
//!
//! Each image may have a YAML sidecar sharing its stem:
//!
//! ```text
//! photos/a/sunset.jpg
//! photos/a/sunset.yml      ← tried first
//! photos/a/sunset.yaml     ← tried if no .yml exists
//! ```
//!
//! ## Recognized keys
//!
//! | Key | Shape | Notes |
//! |---|---|---|
//! | `title` | scalar | falls back to the filename stem |
//! | `date` | scalar | kept as a string, used for ordering |
//! | `slug` | scalar | slug hint, slugified by [`naming`](crate::naming) |
//! | `categories` | scalar or list | scalar becomes a one-element list |
//! | `tags` | scalar or list | same as categories |
//! | `location` | scalar | |
//! | `description` | scalar | |
//!
//! Unknown keys are ignored. Scalars of any YAML type (string, number, bool)
//! are coerced to strings and trimmed; values that end up empty are treated
//! as absent. A missing sidecar, an empty document, or a document whose top
//! level is not a mapping all resolve to an empty [`Metadata`].

use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

/// Sidecar extensions, in lookup order.
const SIDECAR_EXTENSIONS: &[&str] = &["yml", "yaml"];

/// Descriptive fields for one image, normalized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    pub title: Option<String>,
    pub date: Option<String>,
    pub slug: Option<String>,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub location: Option<String>,
    pub description: Option<String>,
}

/// Resolve a metadata field from multiple sources.
///
/// Takes a list of optional values in priority order and returns the first
/// non-None, non-empty value.
///
/// ```text
/// title:     resolve(&[sidecar_title, filename_stem])
/// slug base: resolve(&[sidecar_slug,  filename_stem])
/// ```
pub fn resolve(sources: &[Option<&str>]) -> Option<String> {
    sources
        .iter()
        .filter_map(|opt| {
            opt.map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
        })
        .next()
}

/// Find the sidecar for an image path with its extension already stripped.
///
/// Given `photos/a/sunset`, returns `photos/a/sunset.yml` or
/// `photos/a/sunset.yaml`, whichever exists first.
pub fn find_sidecar(base_no_ext: &Path) -> Option<PathBuf> {
    SIDECAR_EXTENSIONS
        .iter()
        .map(|ext| {
            let mut candidate = base_no_ext.as_os_str().to_owned();
            candidate.push(".");
            candidate.push(ext);
            PathBuf::from(candidate)
        })
        .find(|candidate| candidate.is_file())
}

/// Load and normalize the sidecar metadata for an image.
///
/// Returns an empty record when no sidecar exists.
pub fn load_for_image(image_path: &Path) -> Result<Metadata, MetadataError> {
    let Some(sidecar) = find_sidecar(&image_path.with_extension("")) else {
        return Ok(Metadata::default());
    };
    let text = std::fs::read_to_string(&sidecar).map_err(|source| MetadataError::Io {
        path: sidecar.clone(),
        source,
    })?;
    parse(&text).map_err(|source| MetadataError::Yaml {
        path: sidecar,
        source,
    })
}

/// Parse sidecar text into normalized metadata.
pub fn parse(text: &str) -> Result<Metadata, serde_yaml::Error> {
    if text.trim().is_empty() {
        return Ok(Metadata::default());
    }
    let value: Value = serde_yaml::from_str(text)?;
    Ok(match value {
        Value::Mapping(map) => from_mapping(&map),
        Value::Tagged(tagged) => match tagged.value {
            Value::Mapping(map) => from_mapping(&map),
            _ => Metadata::default(),
        },
        _ => Metadata::default(),
    })
}

fn from_mapping(map: &Mapping) -> Metadata {
    let field = |key: &str| map.get(key).and_then(scalar_string);
    let list = |key: &str| map.get(key).map(string_list).unwrap_or_default();

    Metadata {
        title: field("title"),
        date: field("date"),
        slug: field("slug"),
        categories: list("categories"),
        tags: list("tags"),
        location: field("location"),
        description: field("description"),
    }
}

/// Coerce a scalar YAML value to a trimmed, non-empty string.
///
/// `null`, sequences and mappings yield `None`.
fn scalar_string(value: &Value) -> Option<String> {
    let raw = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Tagged(tagged) => return scalar_string(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => return None,
    };
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Normalize a list-valued field: a scalar becomes a one-element list,
/// a sequence keeps its non-empty scalar elements in order.
fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Sequence(items) => items.iter().filter_map(scalar_string).collect(),
        Value::Tagged(tagged) => string_list(&tagged.value),
        other => scalar_string(other).into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    // =========================================================================
    // resolve() tests
    // =========================================================================

    #[test]
    fn resolve_picks_first_non_none() {
        assert_eq!(
            resolve(&[Some("Golden Hour"), Some("sunset")]),
            Some("Golden Hour".to_string())
        );
    }

    #[test]
    fn resolve_skips_none_and_blank() {
        assert_eq!(resolve(&[None, Some("sunset")]), Some("sunset".to_string()));
        assert_eq!(
            resolve(&[Some("  \n\t  "), Some("sunset")]),
            Some("sunset".to_string())
        );
    }

    #[test]
    fn resolve_returns_none_when_all_empty() {
        assert_eq!(resolve(&[None, Some("")]), None);
        assert_eq!(resolve(&[]), None);
    }

    // =========================================================================
    // parse() tests
    // =========================================================================

    #[test]
    fn parse_full_record() {
        let meta = parse(
            r#"
title: "  Golden Hour  "
date: "2024-05-01"
slug: golden
categories: [landscape, travel]
tags:
  - golden
  - hour
location: Lisbon
description: Last light over the river.
"#,
        )
        .unwrap();

        assert_eq!(meta.title.as_deref(), Some("Golden Hour"));
        assert_eq!(meta.date.as_deref(), Some("2024-05-01"));
        assert_eq!(meta.slug.as_deref(), Some("golden"));
        assert_eq!(meta.categories, vec!["landscape", "travel"]);
        assert_eq!(meta.tags, vec!["golden", "hour"]);
        assert_eq!(meta.location.as_deref(), Some("Lisbon"));
        assert_eq!(
            meta.description.as_deref(),
            Some("Last light over the river.")
        );
    }

    #[test]
    fn parse_scalar_category_becomes_list() {
        let meta = parse("categories: portrait\n").unwrap();
        assert_eq!(meta.categories, vec!["portrait"]);
    }

    #[test]
    fn parse_list_drops_empty_and_null_items() {
        let meta = parse("tags: [' a ', '', '   ', ~, b]\n").unwrap();
        assert_eq!(meta.tags, vec!["a", "b"]);
    }

    #[test]
    fn parse_coerces_numbers_and_bools() {
        let meta = parse("title: 1999\ntags: [2024, true]\n").unwrap();
        assert_eq!(meta.title.as_deref(), Some("1999"));
        assert_eq!(meta.tags, vec!["2024", "true"]);
    }

    #[test]
    fn parse_unquoted_date_stays_a_string() {
        let meta = parse("date: 2024-05-01\n").unwrap();
        assert_eq!(meta.date.as_deref(), Some("2024-05-01"));
    }

    #[test]
    fn parse_blank_strings_are_absent() {
        let meta = parse("title: '   '\nlocation: ''\ndate:\n").unwrap();
        assert_eq!(meta, Metadata::default());
    }

    #[test]
    fn parse_ignores_unknown_keys_and_nested_scalars() {
        let meta = parse("camera: X100\ntitle: {nested: true}\n").unwrap();
        assert_eq!(meta, Metadata::default());
    }

    #[test]
    fn parse_empty_document_is_empty_record() {
        assert_eq!(parse("").unwrap(), Metadata::default());
        assert_eq!(parse("   \n").unwrap(), Metadata::default());
        assert_eq!(parse("~\n").unwrap(), Metadata::default());
        assert_eq!(parse("# only a comment\n").unwrap(), Metadata::default());
    }

    #[test]
    fn parse_non_mapping_document_is_empty_record() {
        assert_eq!(parse("just a string\n").unwrap(), Metadata::default());
        assert_eq!(parse("- a\n- b\n").unwrap(), Metadata::default());
    }

    #[test]
    fn parse_invalid_yaml_errors() {
        assert!(parse("title: [unclosed\n").is_err());
    }

    // =========================================================================
    // Sidecar lookup tests
    // =========================================================================

    #[test]
    fn find_sidecar_prefers_yml() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("sunset.yml"), "title: A").unwrap();
        fs::write(dir.path().join("sunset.yaml"), "title: B").unwrap();

        assert_eq!(
            find_sidecar(&dir.path().join("sunset")),
            Some(dir.path().join("sunset.yml"))
        );
    }

    #[test]
    fn find_sidecar_falls_back_to_yaml() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("sunset.yaml"), "title: B").unwrap();

        assert_eq!(
            find_sidecar(&dir.path().join("sunset")),
            Some(dir.path().join("sunset.yaml"))
        );
    }

    #[test]
    fn find_sidecar_keeps_dots_in_stem() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("v1.2.final.yml"), "title: A").unwrap();

        assert_eq!(
            find_sidecar(&dir.path().join("v1.2.final")),
            Some(dir.path().join("v1.2.final.yml"))
        );
    }

    #[test]
    fn load_for_image_without_sidecar_is_empty() {
        let dir = TempDir::new().unwrap();
        let img = dir.path().join("sunset.jpg");
        fs::write(&img, b"fake image").unwrap();

        assert_eq!(load_for_image(&img).unwrap(), Metadata::default());
    }

    #[test]
    fn load_for_image_reads_sidecar() {
        let dir = TempDir::new().unwrap();
        let img = dir.path().join("sunset.JPG");
        fs::write(&img, b"fake image").unwrap();
        fs::write(dir.path().join("sunset.yml"), "title: Golden Hour\n").unwrap();

        let meta = load_for_image(&img).unwrap();
        assert_eq!(meta.title.as_deref(), Some("Golden Hour"));
    }

    #[test]
    fn load_for_image_reports_sidecar_path_on_bad_yaml() {
        let dir = TempDir::new().unwrap();
        let img = dir.path().join("sunset.jpg");
        fs::write(&img, b"fake image").unwrap();
        fs::write(dir.path().join("sunset.yaml"), "tags: [oops\n").unwrap();

        match load_for_image(&img) {
            Err(MetadataError::Yaml { path, .. }) => {
                assert_eq!(path, dir.path().join("sunset.yaml"))
            }
            other => panic!("expected YAML error, got {other:?}"),
        }
    }
}
