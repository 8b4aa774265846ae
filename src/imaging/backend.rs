//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three operations the optimizer
//! needs: a one-time capability probe, identify, and the two-variant encode.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend). Tests use a recording
//! mock so the orchestrator can be exercised without encoding pixels.

use super::params::EncodeParams;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Optimizer unavailable: {0}")]
    Unavailable(String),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Pixel dimensions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image optimization backends.
pub trait ImageBackend: Sync {
    /// Check once, before any image is processed, that the backend can
    /// actually encode. An `Err` here switches the whole run to copy mode.
    fn probe(&self) -> Result<(), BackendError> {
        Ok(())
    }

    /// Get image dimensions.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Decode, orient, downscale and write both output variants.
    fn encode_variants(&self, params: &EncodeParams) -> Result<(), BackendError>;
}
