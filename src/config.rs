//! Build configuration.
//!
//! Settings come from environment-style keys so the build can be driven from
//! a CI job or a `.env` file without a config file in the photo tree:
//!
//! ```text
//! PHOTOS_CDN_BASE_URL=/photos   # Prefix for every served URL
//! PHOTOS_MAX_WIDTH=2560         # Upper bound on output width (never upscales)
//! PHOTOS_JPEG_QUALITY=78        # JPEG quality (0-100, 0 encodes as 1)
//! PHOTOS_WEBP_QUALITY=72        # WebP quality (0-100, 0 encodes as 1)
//! PHOTOS_DISABLE_SHARP=1        # Skip optimization, copy originals verbatim
//! ```
//!
//! Every key is optional. Unset or empty values take the default; values that
//! are set but unparseable fail the build rather than being silently ignored.
//!
//! Both encoders take a quality of 1-100. A configured 0 is accepted and
//! encodes at 1.

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?} is not a non-negative integer")]
    Invalid { key: &'static str, value: String },
    #[error("Config validation error: {0}")]
    Validation(String),
}

pub const BASE_URL_KEY: &str = "PHOTOS_CDN_BASE_URL";
pub const MAX_WIDTH_KEY: &str = "PHOTOS_MAX_WIDTH";
pub const JPEG_QUALITY_KEY: &str = "PHOTOS_JPEG_QUALITY";
pub const WEBP_QUALITY_KEY: &str = "PHOTOS_WEBP_QUALITY";
pub const DISABLE_OPTIMIZER_KEY: &str = "PHOTOS_DISABLE_SHARP";

/// Resolved settings for one manifest build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    /// Prefix joined onto every served path.
    pub base_url: String,
    /// Upper bound on output pixel width.
    pub max_width: u32,
    /// Primary (JPEG) encoder quality.
    pub jpeg_quality: u32,
    /// Secondary (WebP) encoder quality.
    pub webp_quality: u32,
    /// `false` forces copy mode for the whole run.
    pub optimize: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            base_url: "/photos".to_string(),
            max_width: 2560,
            jpeg_quality: 78,
            webp_quality: 72,
            optimize: true,
        }
    }
}

impl BuildConfig {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let config = Self {
            base_url: get(BASE_URL_KEY).unwrap_or(defaults.base_url),
            max_width: parse_number(MAX_WIDTH_KEY, get(MAX_WIDTH_KEY))?
                .unwrap_or(defaults.max_width),
            jpeg_quality: parse_number(JPEG_QUALITY_KEY, get(JPEG_QUALITY_KEY))?
                .unwrap_or(defaults.jpeg_quality),
            webp_quality: parse_number(WEBP_QUALITY_KEY, get(WEBP_QUALITY_KEY))?
                .unwrap_or(defaults.webp_quality),
            optimize: get(DISABLE_OPTIMIZER_KEY).is_none_or(|v| v.trim() != "1"),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_width == 0 {
            return Err(ConfigError::Validation(format!(
                "{MAX_WIDTH_KEY} must be greater than 0"
            )));
        }
        if self.jpeg_quality > 100 {
            return Err(ConfigError::Validation(format!(
                "{JPEG_QUALITY_KEY} must be 0-100"
            )));
        }
        if self.webp_quality > 100 {
            return Err(ConfigError::Validation(format!(
                "{WEBP_QUALITY_KEY} must be 0-100"
            )));
        }
        Ok(())
    }

    /// Join a forward-slash relative path onto the base URL.
    ///
    /// One trailing slash is stripped from the base first, so both `/photos`
    /// and `/photos/` produce `/photos/a/b.jpg`.
    pub fn url_for(&self, relative: &str) -> String {
        let base = self.base_url.strip_suffix('/').unwrap_or(&self.base_url);
        format!("{}/{}", base, relative)
    }
}

fn parse_number(key: &'static str, value: Option<String>) -> Result<Option<u32>, ConfigError> {
    value
        .map(|v| {
            v.trim().parse::<u32>().map_err(|_| ConfigError::Invalid {
                key,
                value: v.clone(),
            })
        })
        .transpose()
}

/// Render the effective settings as `KEY=value` lines with explanations.
///
/// Used by the `gen-config` CLI command.
pub fn env_template(config: &BuildConfig) -> String {
    format!(
        r#"# Photo manifest configuration
# ===========================
# All keys are optional. Values below are the effective settings.

# Prefix for every served image URL (trailing slash is ignored).
{BASE_URL_KEY}={base_url}

# Upper bound on output pixel width. Smaller images are never upscaled.
{MAX_WIDTH_KEY}={max_width}

# Encoder quality for the primary JPEG variant (0-100, 0 encodes as 1).
{JPEG_QUALITY_KEY}={jpeg_quality}

# Encoder quality for the secondary WebP variant (0-100, 0 encodes as 1).
{WEBP_QUALITY_KEY}={webp_quality}

# Set to 1 to copy originals verbatim instead of optimizing them.
{DISABLE_OPTIMIZER_KEY}={disable}
"#,
        base_url = config.base_url,
        max_width = config.max_width,
        jpeg_quality = config.jpeg_quality,
        webp_quality = config.webp_quality,
        disable = if config.optimize { "0" } else { "1" },
    )
}
