//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use crate::source::DEFAULT_BASE_URL;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub ui: UiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Data source selection
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Serve the seeded fixture dataset instead of calling the remote API
    #[serde(default = "default_use_fixtures")]
    pub use_fixtures: bool,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_use_fixtures() -> bool {
    true
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            use_fixtures: default_use_fixtures(),
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Local storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

fn default_data_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("userdash").to_string_lossy().to_string())
        .unwrap_or_else(|| "./userdash_data".to_string())
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl StorageConfig {
    /// Data directory with a leading `~` expanded to the home directory
    pub fn resolved_data_dir(&self) -> PathBuf {
        match (self.data_dir.strip_prefix("~/"), dirs::home_dir()) {
            (Some(rest), Some(home)) => home.join(rest),
            _ => PathBuf::from(&self.data_dir),
        }
    }
}

/// Presentation settings
#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    /// Rows per page in the users table
    #[serde(default = "default_page_length")]
    pub page_length: usize,
}

fn default_page_length() -> usize {
    8
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            page_length: default_page_length(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from the first default location that exists, or from the
    /// environment alone when there is none
    ///
    /// A config file that exists but cannot be read or parsed is an error;
    /// callers decide whether to fall back to [`Config::from_env`].
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load_first(&default_config_paths())
    }

    /// Load the first of `paths` that exists, with environment overrides
    pub fn load_first(paths: &[PathBuf]) -> Result<Self, ConfigError> {
        match paths.iter().find(|p| p.exists()) {
            Some(path) => {
                let config = Self::load_with_env(path)?;
                tracing::debug!("Loaded config from {:?}", path);
                Ok(config)
            }
            None => Ok(Self::from_env()),
        }
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        // Source overrides
        if let Ok(flag) = std::env::var("USERDASH_USE_FIXTURES") {
            if let Some(b) = parse_bool(&flag) {
                self.source.use_fixtures = b;
            }
        }
        if let Ok(url) = std::env::var("USERDASH_BASE_URL") {
            self.source.base_url = url;
        }

        // Storage overrides
        if let Ok(data_dir) = std::env::var("USERDASH_DATA_DIR") {
            self.storage.data_dir = data_dir;
        }

        // Logging overrides
        if let Ok(level) = std::env::var("USERDASH_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("USERDASH_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Config file candidates, in search order
pub fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("userdash").join("config.toml"));
    }
    paths.push(PathBuf::from("./config.toml"));
    paths
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Userdash Configuration
#
# Environment variables override these settings:
# - USERDASH_USE_FIXTURES
# - USERDASH_BASE_URL
# - USERDASH_DATA_DIR
# - USERDASH_LOG_LEVEL
# - USERDASH_LOG_FORMAT

[source]
# Serve the built-in seed data instead of the remote API
use_fixtures = true

# Remote API base URL (used when use_fixtures = false)
base_url = "https://jsonplaceholder.typicode.com"

# Request timeout in seconds
request_timeout_secs = 30

[storage]
# Directory holding the local overlay database
data_dir = "~/.local/share/userdash"

[ui]
# Rows per page in the users table
page_length = 8

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.source.use_fixtures);
        assert_eq!(config.source.base_url, "https://jsonplaceholder.typicode.com");
        assert_eq!(config.ui.page_length, 8);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config = Config::parse(
            r#"
            [source]
            use_fixtures = false
            "#,
        )
        .unwrap();

        assert!(!config.source.use_fixtures);
        assert_eq!(config.source.request_timeout_secs, 30);
        assert_eq!(config.ui.page_length, 8);
    }

    #[test]
    fn test_generated_config_parses() {
        let config = Config::parse(&generate_default_config()).unwrap();
        assert!(config.source.use_fixtures);
        assert_eq!(config.storage.data_dir, "~/.local/share/userdash");
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/nonexistent/userdash.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[source\nuse_fixtures = ").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_resolved_data_dir() {
        let storage = StorageConfig {
            data_dir: "/var/lib/userdash".to_string(),
        };
        assert_eq!(storage.resolved_data_dir(), PathBuf::from("/var/lib/userdash"));

        let storage = StorageConfig {
            data_dir: "~/.local/share/userdash".to_string(),
        };
        if let Some(home) = dirs::home_dir() {
            assert_eq!(storage.resolved_data_dir(), home.join(".local/share/userdash"));
        }
    }

    #[test]
    fn test_load_first_skips_missing_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[ui]\npage_length = 3\n").unwrap();

        let config = Config::load_first(&[dir.path().join("absent.toml"), path]).unwrap();
        assert_eq!(config.ui.page_length, 3);
    }

    #[test]
    fn test_load_first_reports_broken_file() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("config.toml");
        std::fs::write(&broken, "[ui\npage_length = ").unwrap();

        let err = Config::load_first(&[broken]).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_load_first_without_files_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_first(&[dir.path().join("absent.toml")]).unwrap();
        assert_eq!(config.ui.page_length, 8);
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool(" off "), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
