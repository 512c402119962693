//! Configuration file handling for snapcap.
//!
//! Loads configuration from `<config dir>/snapcap/config.toml` or a custom
//! path. The upload endpoint can be overridden by the `SNAPCAP_UPLOAD_URL`
//! environment variable and by `--endpoint`; the result is validated once at
//! start-up.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::preview::{CharSet, RenderOptions};
use crate::session::SessionOptions;
use crate::snapshot::DEFAULT_JPEG_QUALITY;
use crate::upload::{parse_endpoint, DEFAULT_UPLOAD_URL, UPLOAD_URL_ENV};

/// Configuration file structure for snapcap.
#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub upload: UploadConfig,
    #[serde(default)]
    pub capture: CaptureConfig,
    #[serde(default)]
    pub preview: PreviewConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct UploadConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Per-request timeout. Unset means requests may wait indefinitely.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: None,
        }
    }
}

impl UploadConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CaptureConfig {
    #[serde(default = "default_quality")]
    pub jpeg_quality: u8,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            jpeg_quality: default_quality(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PreviewConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_columns")]
    pub columns: u16,
    #[serde(default)]
    pub charset: CharSet,
    #[serde(default)]
    pub invert: bool,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            columns: default_columns(),
            charset: CharSet::default(),
            invert: false,
        }
    }
}

fn default_endpoint() -> String {
    DEFAULT_UPLOAD_URL.to_string()
}

fn default_quality() -> u8 {
    DEFAULT_JPEG_QUALITY
}

fn default_columns() -> u16 {
    60
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file path.
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
                path: path.clone(),
                source: e,
            })?;
            let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.clone(),
                source: e,
            })?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Apply the `SNAPCAP_UPLOAD_URL` override, if set and non-empty.
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(UPLOAD_URL_ENV) {
            if !url.trim().is_empty() {
                self.upload.endpoint = url.trim().to_string();
            }
        }
    }

    /// Check values that would otherwise only fail mid-session.
    pub fn validate(&self) -> Result<(), ConfigError> {
        parse_endpoint(&self.upload.endpoint).map_err(|e| ConfigError::Invalid {
            field: "upload.endpoint",
            reason: e.to_string(),
        })?;

        if !(1..=100).contains(&self.capture.jpeg_quality) {
            return Err(ConfigError::Invalid {
                field: "capture.jpeg_quality",
                reason: format!("must be 1-100, got {}", self.capture.jpeg_quality),
            });
        }

        if self.preview.columns == 0 {
            return Err(ConfigError::Invalid {
                field: "preview.columns",
                reason: "must be at least 1".to_string(),
            });
        }

        if self.upload.timeout_secs == Some(0) {
            return Err(ConfigError::Invalid {
                field: "upload.timeout_secs",
                reason: "must be at least 1 when set".to_string(),
            });
        }

        Ok(())
    }

    /// Session options derived from this configuration.
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            jpeg_quality: self.capture.jpeg_quality,
            render: RenderOptions {
                columns: self.preview.columns,
                charset: self.preview.charset,
                invert: self.preview.invert,
                ..RenderOptions::default()
            },
            show_preview: self.preview.enabled,
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    Invalid {
        field: &'static str,
        reason: String,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError { path, source } => {
                write!(
                    f,
                    "Failed to read config file '{}': {}",
                    path.display(),
                    source
                )
            }
            ConfigError::ParseError { path, source } => {
                write!(
                    f,
                    "Failed to parse config file '{}': {}",
                    path.display(),
                    source
                )
            }
            ConfigError::Invalid { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::IoError { source, .. } => Some(source),
            ConfigError::ParseError { source, .. } => Some(source),
            ConfigError::Invalid { .. } => None,
        }
    }
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("snapcap").join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/snapcap/config.toml")
        })
}

/// Contents written by `snapcap config init`.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# snapcap configuration

[upload]
# Where captured stills are posted (multipart fields: image, caption).
# Overridden by $SNAPCAP_UPLOAD_URL and --endpoint.
endpoint = "http://localhost:5001/images/upload"
# Per-request timeout in seconds. Unset waits indefinitely.
# timeout_secs = 30

[capture]
# JPEG quality for preview and upload (1-100)
jpeg_quality = 50

[preview]
enabled = true
columns = 60
# standard, blocks or minimal
charset = "standard"
invert = false
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.upload.endpoint, DEFAULT_UPLOAD_URL);
        assert_eq!(config.upload.timeout(), None);
        assert_eq!(config.capture.jpeg_quality, 50);
        assert!(config.preview.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_template_parses_to_defaults() {
        let config: Config = toml::from_str(DEFAULT_CONFIG_TEMPLATE).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = toml::from_str("[upload]\ntimeout_secs = 5\n").unwrap();
        assert_eq!(config.upload.endpoint, DEFAULT_UPLOAD_URL);
        assert_eq!(config.upload.timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_validate_rejects_bad_endpoint() {
        let mut config = Config::default();
        config.upload.endpoint = "localhost:5001".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("upload.endpoint"));
    }

    #[test]
    fn test_validate_rejects_quality_out_of_range() {
        let mut config = Config::default();
        config.capture.jpeg_quality = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "capture.jpeg_quality",
                ..
            })
        ));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.upload.timeout_secs = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_session_options_follow_config() {
        let mut config = Config::default();
        config.capture.jpeg_quality = 80;
        config.preview.columns = 40;
        config.preview.enabled = false;
        let options = config.session_options();
        assert_eq!(options.jpeg_quality, 80);
        assert_eq!(options.render.columns, 40);
        assert!(!options.show_preview);
    }
}
