//! URL slugs for manifest entries.
//!
//! Every entry gets a slug derived from its metadata `slug` hint or, failing
//! that, its filename stem. Slugs are unique across the whole manifest: the
//! first image to claim a slug keeps it bare, later claimants get `-2`, `-3`,
//! … in processing order.
//!
//! ```text
//! "Golden Hour!"     → "golden-hour"
//! "  __IMG_0042 "    → "img-0042"
//! "日本語"            → ""            (caller falls back to the filename)
//! ```

use std::collections::HashSet;

/// Convert arbitrary text into a URL-safe token.
///
/// - Lowercases and trims
/// - Replaces every run of characters outside `[a-z0-9]` with one dash
/// - Strips leading and trailing dashes
///
/// Returns an empty string when the input has no ASCII alphanumerics.
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut pending_dash = false;

    for c in lowered.trim().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }

    slug
}

/// Register `slug` in `used`, suffixing it with `-2`, `-3`, … on collision.
///
/// Returns the slug that was actually registered.
pub fn unique_slug(slug: &str, used: &mut HashSet<String>) -> String {
    if used.insert(slug.to_string()) {
        return slug.to_string();
    }

    let mut n = 2u32;
    loop {
        let candidate = format!("{slug}-{n}");
        if used.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}
