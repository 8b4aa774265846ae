//! Output freshness for incremental builds.
//!
//! Encoding is the bottleneck of a manifest build, so optimized variants are
//! reused across runs when they are still fresh. Only the image *files* are
//! cached; the manifest itself is rebuilt from scratch every time, so metadata
//! edits are always picked up.
//!
//! # Freshness rule
//!
//! A source's outputs are fresh when **every** output file exists and none is
//! older than the source:
//!
//! ```text
//! fresh  ⇔  ∀ output: exists(output) ∧ mtime(source) ≤ mtime(output)
//! ```
//!
//! Any change to a configured size or quality therefore requires touching the
//! sources or clearing the served-assets directory.
//!
//! # Known boundary
//!
//! Freshness is timestamp based, not content based. A source whose bytes change
//! without its modification time advancing (some `cp -p` or archive extractions)
//! keeps its stale outputs until they are deleted.

use std::fmt;
use std::io;
use std::path::Path;
use std::time::SystemTime;

fn modified(path: &Path) -> io::Result<Option<SystemTime>> {
    match std::fs::metadata(path) {
        Ok(meta) => meta.modified().map(Some),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// Whether all `outputs` exist and are at least as new as `source`.
pub fn is_fresh(source: &Path, outputs: &[&Path]) -> io::Result<bool> {
    let Some(source_time) = modified(source)? else {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("source image missing: {}", source.display()),
        ));
    };

    for output in outputs {
        match modified(output)? {
            Some(output_time) if output_time >= source_time => {}
            _ => return Ok(false),
        }
    }
    Ok(true)
}

/// Summary of how each image's served files were produced in a build run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStats {
    /// Optimized outputs reused because they were fresh.
    pub hits: u32,
    /// Sources copied verbatim (copy mode).
    pub copies: u32,
    /// Sources re-encoded.
    pub misses: u32,
}

impl CacheStats {
    pub fn hit(&mut self) {
        self.hits += 1;
    }

    pub fn copy(&mut self) {
        self.copies += 1;
    }

    pub fn miss(&mut self) {
        self.misses += 1;
    }

    pub fn total(&self) -> u32 {
        self.hits + self.copies + self.misses
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.copies > 0 && self.hits == 0 && self.misses == 0 {
            return write!(f, "{} copied", self.copies);
        }
        if self.hits > 0 || self.copies > 0 {
            if self.copies > 0 {
                write!(
                    f,
                    "{} cached, {} copied, {} encoded ({} total)",
                    self.hits,
                    self.copies,
                    self.misses,
                    self.total()
                )
            } else {
                write!(
                    f,
                    "{} cached, {} encoded ({} total)",
                    self.hits,
                    self.misses,
                    self.total()
                )
            }
        } else {
            write!(f, "{} encoded", self.misses)
        }
    }
}
