//! Parameter types for image operations.
//!
//! These structs describe *what* to produce, not *how*. They sit between the
//! [`optimize`](crate::optimize) adapter, which decides paths and sizes, and
//! the [`backend`](super::backend), which does the pixel work. A mock backend
//! can record them without touching any pixels.

use std::path::PathBuf;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

/// One source image in, two sibling outputs out.
///
/// Both outputs are encoded from the same oriented, downscaled pixel buffer:
/// `jpeg_output` as progressive 4:2:0 JPEG, `webp_output` as lossy WebP.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeParams {
    pub source: PathBuf,
    pub jpeg_output: PathBuf,
    pub webp_output: PathBuf,
    /// Upper bound on output width. Images are never upscaled.
    pub max_width: u32,
    pub jpeg_quality: Quality,
    pub webp_quality: Quality,
}
