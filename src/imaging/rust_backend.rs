//! Pure Rust decode/resize pipeline with native WebP encoding.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG) | `image` crate decoder |
//! | Orientation | `ImageDecoder::orientation` + `DynamicImage::apply_orientation` |
//! | Resize | `DynamicImage::resize_exact` with `Lanczos3` filter |
//! | Encode → JPEG | `jpeg-encoder` (progressive, 4:2:0, optimized Huffman tables) |
//! | Encode → WebP | `webp` (libwebp, lossy) |
//! | Identify | `image::image_dimensions` |
//!
//! Both encodes read the same prepared RGB buffer and run under `rayon::join`.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::calculate_fit_dimensions;
use super::params::{EncodeParams, Quality};
use image::imageops::FilterType;
use image::{DynamicImage, ImageDecoder, ImageReader, RgbImage};
use jpeg_encoder::{ColorType, Encoder as JpegEncoder, SamplingFactor};
use std::path::Path;

/// Pure Rust backend using the `image` crate ecosystem plus libwebp.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_error(path: &Path, e: impl std::fmt::Display) -> BackendError {
    BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
}

/// Load an image and rotate/flip it according to its EXIF orientation.
fn load_oriented(path: &Path) -> Result<DynamicImage, BackendError> {
    let reader = ImageReader::open(path)?.with_guessed_format()?;
    let mut decoder = reader.into_decoder().map_err(|e| decode_error(path, e))?;
    let orientation = decoder.orientation().map_err(|e| decode_error(path, e))?;
    let mut img = DynamicImage::from_decoder(decoder).map_err(|e| decode_error(path, e))?;
    img.apply_orientation(orientation);
    Ok(img)
}

/// Orient and downscale to `max_width`, returning the shared RGB buffer.
fn prepare(path: &Path, max_width: u32) -> Result<RgbImage, BackendError> {
    let img = load_oriented(path)?;
    let (width, height) = calculate_fit_dimensions((img.width(), img.height()), max_width);
    let img = if (width, height) == (img.width(), img.height()) {
        img
    } else {
        img.resize_exact(width, height, FilterType::Lanczos3)
    };
    Ok(img.to_rgb8())
}

fn jpeg_size(rgb: &RgbImage) -> Result<(u16, u16), BackendError> {
    let too_large = || {
        BackendError::ProcessingFailed(format!(
            "{}x{} exceeds the JPEG size limit",
            rgb.width(),
            rgb.height()
        ))
    };
    let width = u16::try_from(rgb.width()).map_err(|_| too_large())?;
    let height = u16::try_from(rgb.height()).map_err(|_| too_large())?;
    Ok((width, height))
}

fn configure_jpeg<W: jpeg_encoder::JfifWrite>(encoder: &mut JpegEncoder<W>) {
    encoder.set_progressive(true);
    encoder.set_optimized_huffman_tables(true);
    encoder.set_sampling_factor(SamplingFactor::R_4_2_0);
}

/// Encode as progressive 4:2:0 JPEG.
fn save_jpeg(rgb: &RgbImage, path: &Path, quality: Quality) -> Result<(), BackendError> {
    let (width, height) = jpeg_size(rgb)?;
    let mut encoder = JpegEncoder::new_file(path, quality.value() as u8).map_err(|e| {
        BackendError::ProcessingFailed(format!("JPEG encoder for {}: {}", path.display(), e))
    })?;
    configure_jpeg(&mut encoder);
    encoder
        .encode(rgb.as_raw(), width, height, ColorType::Rgb)
        .map_err(|e| BackendError::ProcessingFailed(format!("JPEG encode failed: {}", e)))
}

fn encode_webp(rgb: &RgbImage, quality: Quality) -> Result<Vec<u8>, BackendError> {
    webp::Encoder::from_rgb(rgb.as_raw(), rgb.width(), rgb.height())
        .encode_simple(false, quality.value() as f32)
        .map(|memory| memory.to_vec())
        .map_err(|e| BackendError::ProcessingFailed(format!("WebP encode failed: {:?}", e)))
}

/// Encode as lossy WebP.
fn save_webp(rgb: &RgbImage, path: &Path, quality: Quality) -> Result<(), BackendError> {
    let bytes = encode_webp(rgb, quality)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

impl ImageBackend for RustBackend {
    /// Round-trip a 1x1 pixel through both encoders in memory.
    fn probe(&self) -> Result<(), BackendError> {
        let pixel = RgbImage::from_pixel(1, 1, image::Rgb([128, 128, 128]));

        let mut jpeg = Vec::new();
        let mut encoder = JpegEncoder::new(&mut jpeg, 75);
        configure_jpeg(&mut encoder);
        encoder
            .encode(pixel.as_raw(), 1, 1, ColorType::Rgb)
            .map_err(|e| BackendError::Unavailable(format!("JPEG encoder: {}", e)))?;

        encode_webp(&pixel, Quality::new(75))
            .map_err(|e| BackendError::Unavailable(format!("WebP encoder: {}", e)))?;
        Ok(())
    }

    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = image::image_dimensions(path).map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to read dimensions: {}", e))
        })?;
        Ok(Dimensions { width, height })
    }

    fn encode_variants(&self, params: &EncodeParams) -> Result<(), BackendError> {
        let rgb = prepare(&params.source, params.max_width)?;

        let (jpeg, webp) = rayon::join(
            || save_jpeg(&rgb, &params.jpeg_output, params.jpeg_quality),
            || save_webp(&rgb, &params.webp_output, params.webp_quality),
        );
        jpeg?;
        webp?;
        Ok(())
    }
}
