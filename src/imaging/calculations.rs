//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Calculate output dimensions that fit within a maximum width.
///
/// Preserves the aspect ratio and never upscales: images already at or
/// below `max_width` keep their original size. The height is rounded and
/// never drops below one pixel.
///
/// # Examples
/// ```
/// # use photo_manifest::imaging::calculate_fit_dimensions;
/// // 4000x3000 capped at 2560 → 2560x1920
/// assert_eq!(calculate_fit_dimensions((4000, 3000), 2560), (2560, 1920));
///
/// // Already small enough → unchanged
/// assert_eq!(calculate_fit_dimensions((800, 600), 2560), (800, 600));
/// ```
pub fn calculate_fit_dimensions(original: (u32, u32), max_width: u32) -> (u32, u32) {
    let (orig_w, orig_h) = original;
    if orig_w <= max_width || orig_w == 0 {
        return original;
    }

    let ratio = max_width as f64 / orig_w as f64;
    let height = (orig_h as f64 * ratio).round().max(1.0) as u32;
    (max_width, height)
}

/// Width divided by height, rounded to six fractional digits.
pub fn aspect_ratio(width: u32, height: u32) -> f64 {
    let ratio = width as f64 / height as f64;
    (ratio * 1_000_000.0).round() / 1_000_000.0
}
