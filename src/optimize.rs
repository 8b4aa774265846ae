//! Served-asset production for each source image.
//!
//! An [`Optimizer`] turns one source image into the files the web server
//! serves and reports their URLs and pixel size. There are two strategies:
//!
//! | Strategy | Output under the public dir | `webp_url` | Dimensions from |
//! |---|---|---|---|
//! | [`OptimizingBackend`] | `<dir>/<stem>.jpg` + `<dir>/<stem>.webp` | set | the written JPEG |
//! | [`CopyingBackend`] | `<dir>/<file>` copied verbatim | `None` | the JPEG header reader |
//!
//! [`select_optimizer`] picks one for the whole run. The image backend is
//! probed exactly once; if it cannot encode, a warning is logged and every
//! image is copied instead. There is no per-image retry.
//!
//! Optimized variants are only re-encoded when stale (see [`crate::cache`]).

use crate::cache;
use crate::config::{BuildConfig, DISABLE_OPTIMIZER_KEY};
use crate::imaging::jpeg::{self, JpegError};
use crate::imaging::{BackendError, EncodeParams, ImageBackend, Quality};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum OptimizeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not read dimensions of optimized output {0}")]
    OptimizationFailed(PathBuf),
    #[error(transparent)]
    Jpeg(#[from] JpegError),
    #[error("Image backend error: {0}")]
    Backend(#[from] BackendError),
}

/// How the served files for one image were produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantStatus {
    /// Existing optimized outputs were fresh and reused.
    Cached,
    /// Both variants were (re)encoded.
    Encoded,
    /// The original was copied verbatim.
    Copied,
}

/// Result of optimizing one image.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizedImage {
    pub image_url: String,
    pub webp_url: Option<String>,
    pub width: u32,
    pub height: u32,
    pub status: VariantStatus,
}

/// Strategy for producing served assets.
pub trait Optimizer {
    /// Short name for progress output.
    fn mode(&self) -> &'static str;

    /// Produce the served files for `absolute` (whose path below the photo
    /// root is `relative`, `/`-separated).
    fn optimize(&self, relative: &str, absolute: &Path) -> Result<OptimizedImage, OptimizeError>;
}

/// `a/sunset.JPEG` → `a/sunset.jpg`
fn with_extension(relative: &str, ext: &str) -> String {
    let file_start = relative.rfind('/').map_or(0, |i| i + 1);
    let stem_end = match relative[file_start..].rfind('.') {
        Some(0) | None => relative.len(),
        Some(i) => file_start + i,
    };
    format!("{}.{}", &relative[..stem_end], ext)
}

fn ensure_parent(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) => std::fs::create_dir_all(parent),
        None => Ok(()),
    }
}

// ============================================================================
// Optimized mode
// ============================================================================

/// Writes a downscaled progressive JPEG and a WebP sibling for every image.
pub struct OptimizingBackend<'a, B: ImageBackend + ?Sized> {
    config: &'a BuildConfig,
    public_dir: &'a Path,
    backend: &'a B,
}

impl<'a, B: ImageBackend + ?Sized> OptimizingBackend<'a, B> {
    pub fn new(config: &'a BuildConfig, public_dir: &'a Path, backend: &'a B) -> Self {
        Self {
            config,
            public_dir,
            backend,
        }
    }
}

impl<B: ImageBackend + ?Sized> Optimizer for OptimizingBackend<'_, B> {
    fn mode(&self) -> &'static str {
        "optimize"
    }

    fn optimize(&self, relative: &str, absolute: &Path) -> Result<OptimizedImage, OptimizeError> {
        let jpeg_relative = with_extension(relative, "jpg");
        let webp_relative = with_extension(relative, "webp");
        let jpeg_output = self.public_dir.join(&jpeg_relative);
        let webp_output = self.public_dir.join(&webp_relative);
        ensure_parent(&jpeg_output)?;

        let status = if cache::is_fresh(absolute, &[&jpeg_output, &webp_output])? {
            debug!(source = %relative, "outputs fresh, skipping encode");
            VariantStatus::Cached
        } else {
            self.backend.encode_variants(&EncodeParams {
                source: absolute.to_path_buf(),
                jpeg_output: jpeg_output.clone(),
                webp_output,
                max_width: self.config.max_width,
                jpeg_quality: Quality::new(self.config.jpeg_quality),
                webp_quality: Quality::new(self.config.webp_quality),
            })?;
            VariantStatus::Encoded
        };

        let dims = match self.backend.identify(&jpeg_output) {
            Ok(dims) if dims.width > 0 && dims.height > 0 => dims,
            Ok(_) => return Err(OptimizeError::OptimizationFailed(jpeg_output)),
            Err(e) => {
                debug!(output = %jpeg_output.display(), error = %e, "identify failed");
                return Err(OptimizeError::OptimizationFailed(jpeg_output));
            }
        };

        Ok(OptimizedImage {
            image_url: self.config.url_for(&jpeg_relative),
            webp_url: Some(self.config.url_for(&webp_relative)),
            width: dims.width,
            height: dims.height,
            status,
        })
    }
}

// ============================================================================
// Degraded mode
// ============================================================================

/// Copies originals verbatim and reads their size from the JPEG header.
pub struct CopyingBackend<'a> {
    config: &'a BuildConfig,
    public_dir: &'a Path,
}

impl<'a> CopyingBackend<'a> {
    pub fn new(config: &'a BuildConfig, public_dir: &'a Path) -> Self {
        Self { config, public_dir }
    }
}

impl Optimizer for CopyingBackend<'_> {
    fn mode(&self) -> &'static str {
        "copy"
    }

    fn optimize(&self, relative: &str, absolute: &Path) -> Result<OptimizedImage, OptimizeError> {
        let target = self.public_dir.join(relative);
        ensure_parent(&target)?;
        std::fs::copy(absolute, &target)?;
        let dims = jpeg::read_file_dimensions(&target)?;

        Ok(OptimizedImage {
            image_url: self.config.url_for(relative),
            webp_url: None,
            width: dims.width,
            height: dims.height,
            status: VariantStatus::Copied,
        })
    }
}

/// Choose the strategy for a whole run.
///
/// Copy mode is used when the config disables optimization or when the
/// backend's probe fails. The probe runs at most once.
pub fn select_optimizer<'a, B: ImageBackend + ?Sized>(
    config: &'a BuildConfig,
    public_dir: &'a Path,
    backend: &'a B,
) -> Box<dyn Optimizer + 'a> {
    if !config.optimize {
        debug!("optimizer disabled by {DISABLE_OPTIMIZER_KEY}");
        return Box::new(CopyingBackend::new(config, public_dir));
    }
    match backend.probe() {
        Ok(()) => Box::new(OptimizingBackend::new(config, public_dir, backend)),
        Err(e) => {
            warn!(error = %e, "image optimizer unavailable, copying originals instead");
            Box::new(CopyingBackend::new(config, public_dir))
        }
    }
}
