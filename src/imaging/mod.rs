//! Image processing: frame-size reading, resizing, two-format encoding.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify (no decode)** | custom JPEG marker walk ([`jpeg`]) |
//! | **Identify** | `image::image_dimensions` |
//! | **Orient + resize** | `apply_orientation` + Lanczos3 |
//! | **Encode** | `jpeg-encoder` (progressive JPEG) + `webp` (lossy WebP) |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **JPEG reader**: byte-level SOF lookup used by copy mode

pub mod backend;
mod calculations;
pub mod jpeg;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{aspect_ratio, calculate_fit_dimensions};
pub use jpeg::JpegError;
pub use params::{EncodeParams, Quality};
pub use rust_backend::RustBackend;
