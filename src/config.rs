//! Build configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Default network timeout for asset fetches, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 90;

/// Largest cover the reader will display without scaling.
pub const DEFAULT_COVER_BOUNDS: (u32, u32) = (1563, 2500);

/// Configuration for one archive build.
///
/// # Example
///
/// ```
/// use bindery::ExportConfig;
///
/// let config = ExportConfig::new()
///     .with_site_url("https://books.example.com/my-book/")
///     .with_timeout_secs(10);
/// assert_eq!(config.timeout().as_secs(), 10);
/// assert_eq!(config.archive_extension, "hpub");
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Network timeout for each asset fetch.
    pub timeout_secs: u64,
    /// Source stylesheet. The bundled stylesheet is used when unset.
    pub stylesheet: Option<PathBuf>,
    /// Public URL of the book site; links to other hosts are never internal.
    pub site_url: String,
    /// Directory that relative cover image references resolve against.
    pub media_root: Option<PathBuf>,
    /// Where finished archives are written.
    pub output_dir: PathBuf,
    /// Parent of the transient working directory (system temp dir when unset).
    pub temp_root: Option<PathBuf>,
    /// Maximum cover width and height in pixels.
    pub cover_bounds: (u32, u32),
    pub archive_extension: String,
    /// Deflate level (0-9, default 6).
    pub compression_level: Option<u32>,
    /// User agent sent with asset requests.
    pub user_agent: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            stylesheet: None,
            site_url: String::new(),
            media_root: None,
            output_dir: PathBuf::from("."),
            temp_root: None,
            cover_bounds: DEFAULT_COVER_BOUNDS,
            archive_extension: "hpub".to_string(),
            compression_level: None,
            user_agent: concat!("bindery/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ExportConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_stylesheet(mut self, path: impl Into<PathBuf>) -> Self {
        self.stylesheet = Some(path.into());
        self
    }

    pub fn with_site_url(mut self, url: impl Into<String>) -> Self {
        self.site_url = url.into();
        self
    }

    pub fn with_media_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.media_root = Some(path.into());
        self
    }

    pub fn with_output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = path.into();
        self
    }

    pub fn with_temp_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.temp_root = Some(path.into());
        self
    }

    pub fn with_cover_bounds(mut self, width: u32, height: u32) -> Self {
        self.cover_bounds = (width, height);
        self
    }

    pub fn with_compression_level(mut self, level: u32) -> Self {
        self.compression_level = Some(level);
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Host of `site_url`, lowercased. `None` when no site URL is configured,
    /// in which case the book's own `url` is used.
    pub fn site_host(&self) -> Option<String> {
        crate::knead::url_host(self.site_url.trim())
    }

    /// Reject values that would only fail later in the build.
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(Error::Config("timeout must be at least one second".into()));
        }
        if self.cover_bounds.0 == 0 || self.cover_bounds.1 == 0 {
            return Err(Error::Config("cover bounds must be non-zero".into()));
        }
        if self.compression_level.is_some_and(|l| l > 9) {
            return Err(Error::Config("compression level must be between 0 and 9".into()));
        }
        if self.archive_extension.is_empty() || self.archive_extension.contains(['/', '\\', '.']) {
            return Err(Error::Config(format!(
                "invalid archive extension {:?}",
                self.archive_extension
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExportConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(90));
        assert_eq!(config.cover_bounds, (1563, 2500));
        assert!(config.stylesheet.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: ExportConfig =
            serde_json::from_str(r#"{"site_url": "https://Example.COM/book/", "timeout_secs": 5}"#)
                .unwrap();
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.archive_extension, "hpub");
        assert_eq!(config.site_host().as_deref(), Some("example.com"));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(ExportConfig::new().with_timeout_secs(0).validate().is_err());
        assert!(ExportConfig::new().with_compression_level(12).validate().is_err());
        assert!(ExportConfig::new().with_cover_bounds(0, 10).validate().is_err());
    }

    #[test]
    fn test_site_host_absent() {
        assert_eq!(ExportConfig::new().site_host(), None);
    }
}
