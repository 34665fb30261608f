//! Host configuration read from the environment.

use std::path::PathBuf;

use designlite_core::EditorConfig;

/// Public Gemini REST endpoint.
pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com";

/// Model used for proofreading.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Output pixels per canvas pixel for raster exports.
pub const DEFAULT_EXPORT_SCALE: f64 = 2.0;

/// Configuration for an editing session and its services.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// API key for the text service. `None` disables proofreading.
    pub gemini_api_key: Option<String>,
    /// Base URL of the text service.
    pub gemini_url: String,
    /// Model name passed to the text service.
    pub gemini_model: String,
    /// Directory that exports are written into.
    pub export_dir: PathBuf,
    /// Output pixels per canvas pixel for raster exports.
    pub export_scale: f64,
    /// Canvas and element defaults.
    pub editor: EditorConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            gemini_url: DEFAULT_GEMINI_URL.to_string(),
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            export_dir: PathBuf::from("."),
            export_scale: DEFAULT_EXPORT_SCALE,
            editor: EditorConfig::default(),
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment.
    ///
    /// - `GEMINI_API_KEY` (or `API_KEY`): text service key
    /// - `DESIGNLITE_GEMINI_URL`: text service base URL
    /// - `DESIGNLITE_EXPORT_DIR`: export directory
    /// - `DESIGNLITE_EXPORT_SCALE`: raster export scale
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Empty values count as unset. An unparsable or non-positive scale falls
    /// back to the default.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let export_scale = match get("DESIGNLITE_EXPORT_SCALE") {
            Some(raw) => match raw.trim().parse::<f64>() {
                Ok(scale) if scale.is_finite() && scale > 0.0 => scale,
                _ => {
                    tracing::warn!(value = %raw, "ignoring invalid DESIGNLITE_EXPORT_SCALE");
                    defaults.export_scale
                }
            },
            None => defaults.export_scale,
        };

        Self {
            gemini_api_key: get("GEMINI_API_KEY").or_else(|| get("API_KEY")),
            gemini_url: get("DESIGNLITE_GEMINI_URL").unwrap_or(defaults.gemini_url),
            export_dir: get("DESIGNLITE_EXPORT_DIR")
                .map_or(defaults.export_dir, PathBuf::from),
            export_scale,
            ..defaults
        }
    }

    /// Set the text service key.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.gemini_api_key = Some(key.into());
        self
    }

    /// Set the text service base URL.
    #[must_use]
    pub fn with_gemini_url(mut self, url: impl Into<String>) -> Self {
        self.gemini_url = url.into();
        self
    }

    /// Set the export directory.
    #[must_use]
    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = dir.into();
        self
    }
}
