//! Filesystem traversal.
//!
//! Walks the photo root recursively and returns every JPEG as a
//! [`SourceImage`], sorted by full path. That order decides which image keeps
//! a bare slug when two collide, so it must not depend on directory listing
//! order.
//!
//! ## Directory Structure
//!
//! ```text
//! photos/                  # Photo root (may not exist yet)
//! ├── a/
//! │   ├── sunset.jpg       # Image
//! │   └── sunset.yml       # Optional sidecar
//! └── b/
//!     └── nested/
//!         └── sunset.JPEG  # Any depth
//! ```
//!
//! Recognized extensions are `jpg`, `jpeg`, `JPG` and `JPEG`. Mixed casings
//! such as `Jpg` are not images. A missing root is not an error: it yields an
//! empty list. A root that exists but is not a directory is an error.
//!
//! Symlinked directories are not descended into. Symlinked files are listed
//! like regular files.

use crate::types::SourceImage;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },
}

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "JPG", "JPEG"];

/// Whether a path has one of the recognized JPEG extensions (case-sensitive).
pub fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e))
}

/// Find all images below `root`, sorted by full path.
pub fn scan(root: &Path) -> Result<Vec<SourceImage>, ScanError> {
    match std::fs::metadata(root) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => {
            return Err(ScanError::Io(io::Error::new(
                io::ErrorKind::NotADirectory,
                format!("photo root is not a directory: {}", root.display()),
            )));
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    }

    let mut paths = Vec::new();
    for entry in WalkDir::new(root).min_depth(1) {
        let entry = entry.map_err(|source| ScanError::Walk {
            path: root.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_dir() && is_image(entry.path()) {
            paths.push(entry.into_path());
        }
    }

    let mut images: Vec<SourceImage> = paths
        .into_iter()
        .map(|absolute_path| {
            let relative_path = relative_slash_path(&absolute_path, root);
            SourceImage {
                absolute_path,
                relative_path,
            }
        })
        .collect();

    images.sort_by(|a, b| {
        a.absolute_path
            .to_string_lossy()
            .cmp(&b.absolute_path.to_string_lossy())
    });
    Ok(images)
}

/// Path below `root`, joined with `/` regardless of platform.
fn relative_slash_path(path: &Path, root: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
