//! Configuration file parser for ~/.config/newsdash/config.toml.
//!
//! The config file is optional: a missing file yields `Config::default()`.
//! Unknown keys are silently ignored by serde, though we log a warning when
//! the file contains potential typos. `NEWSDASH_API_URL` overrides the
//! configured base URL.
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

/// Environment variable that overrides `api_base_url`.
pub const API_URL_ENV: &str = "NEWSDASH_API_URL";

/// Base URL used when neither the file nor the environment provide one.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";

/// Default cap on response body size (10 MB).
pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 10 * 1024 * 1024;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),

    #[error("Invalid API base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

// ============================================================================
// Configuration
// ============================================================================

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the news service, without a trailing slash.
    pub api_base_url: String,

    /// Look-back window forwarded to `/api/news` as `?hours=N`.
    /// `None` leaves the window to the service.
    pub hours_back: Option<u32>,

    /// Maximum accepted response body size in bytes.
    pub max_response_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            hours_back: None,
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: &'static [&'static str] =
        &["api_base_url", "hours_back", "max_response_bytes"];

    /// Default config location: `$HOME/.config/newsdash/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        let home = std::env::var_os("HOME")?;
        Some(
            PathBuf::from(home)
                .join(".config")
                .join("newsdash")
                .join("config.toml"),
        )
    }

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)`
    /// - Unknown keys → accepted, logged as warning
    ///
    /// The base URL is validated and normalised before returning.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let mut config: Config = toml::from_str(&content)?;
        config.api_base_url = normalize_base_url(&config.api_base_url)?;
        tracing::info!(path = %path.display(), api = %config.api_base_url, "Loaded configuration");
        Ok(config)
    }

    /// Apply an environment-provided base URL, which takes precedence over the file.
    pub fn with_env_override(mut self, value: Option<String>) -> Result<Self, ConfigError> {
        if let Some(raw) = value.filter(|v| !v.trim().is_empty()) {
            self.api_base_url = normalize_base_url(&raw)?;
            tracing::debug!(
                api = %self.api_base_url,
                env = API_URL_ENV,
                "API base URL taken from environment"
            );
        }
        Ok(self)
    }

    /// Load from the default location and apply `NEWSDASH_API_URL`.
    pub fn from_environment() -> Result<Self, ConfigError> {
        let config = match Self::default_path() {
            Some(path) => Self::load(&path)?,
            None => {
                tracing::debug!("HOME not set, using default configuration");
                Self::default()
            }
        };
        config.with_env_override(std::env::var(API_URL_ENV).ok())
    }
}

/// Validate a service base URL and strip trailing slashes.
///
/// Only `http` and `https` URLs with a host are accepted.
pub fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let invalid = |reason: &str| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: reason.to_string(),
    };

    let parsed = Url::parse(trimmed).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(invalid("missing host"));
    }
    Ok(trimmed.to_string())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(name: &str, content: &str) -> (PathBuf, PathBuf) {
        let dir = std::env::temp_dir().join(format!("newsdash_config_test_{}", name));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api_base_url, "http://localhost:5000");
        assert!(config.hours_back.is_none());
        assert_eq!(config.max_response_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn test_missing_file_returns_default() {
        let path = Path::new("/tmp/newsdash_test_nonexistent_config.toml");
        let config = Config::load(path).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_whitespace_only_file_returns_default() {
        let (dir, path) = write_config("whitespace", "   \n  \n  ");
        let config = Config::load(&path).unwrap();
        assert_eq!(config, Config::default());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_full_config() {
        let (dir, path) = write_config(
            "full",
            r#"
api_base_url = "https://news.example.com/"
hours_back = 48
max_response_bytes = 2048
"#,
        );

        let config = Config::load(&path).unwrap();
        assert_eq!(config.api_base_url, "https://news.example.com");
        assert_eq!(config.hours_back, Some(48));
        assert_eq!(config.max_response_bytes, 2048);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_unknown_keys_accepted() {
        let (dir, path) = write_config("unknown", "hours_back = 12\ntheme = \"dark\"\n");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.hours_back, Some(12));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let (dir, path) = write_config("invalid", "this is not [valid toml");
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("Invalid TOML"));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_invalid_base_url_in_file_rejected() {
        let (dir, path) = write_config("bad_url", "api_base_url = \"ftp://example.com\"\n");
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBaseUrl { .. }));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_too_large_file_rejected() {
        let (dir, path) = write_config("too_large", &"a".repeat(1_048_577));
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::TooLarge(_)));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_env_override_takes_precedence() {
        let config = Config::default()
            .with_env_override(Some("http://10.0.0.5:8080/".to_string()))
            .unwrap();
        assert_eq!(config.api_base_url, "http://10.0.0.5:8080");
    }

    #[test]
    fn test_empty_env_override_ignored() {
        let config = Config::default()
            .with_env_override(Some("  ".to_string()))
            .unwrap();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);

        let config = Config::default().with_env_override(None).unwrap();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url("http://localhost:5000///").unwrap(),
            "http://localhost:5000"
        );
        assert!(normalize_base_url("not a url").is_err());
        assert!(normalize_base_url("file:///etc/passwd").is_err());
    }
}
