//! Configuration management for newsdesk.
//!
//! Configuration is read from `~/.config/newsdesk/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.

use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use crate::domain::query::{DEFAULT_COUNTRY, DEFAULT_PAGE_SIZE};

pub const API_KEY_ENV: &str = "NEWS_API_KEY";

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub defaults: DefaultsConfig,
}

/// Connection to the news API.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Serve articles from the built-in mock source instead of the network.
    pub mock: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://newsapi.org/v2".to_string(),
            api_key: None,
            timeout_secs: 10,
            user_agent: "newsdesk/0.1.0".to_string(),
            mock: false,
        }
    }
}

/// Where favorites, likes and comments are kept.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Database file; defaults to `<data dir>/newsdesk/newsdesk.db`.
    pub path: Option<PathBuf>,
    /// Keep everything in memory only.
    pub headless: bool,
}

/// Initial filter values for headline queries.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    pub country: String,
    pub page_size: u32,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            country: DEFAULT_COUNTRY.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// If the config file exists but is invalid, returns an error.
    /// Missing fields in the config file will use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
            return Ok(Self::default().with_env());
        }

        let content = fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: config_path,
            source: e,
        })?;

        Ok(config.with_env())
    }

    /// Get the default config file path: `~/.config/newsdesk/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("newsdesk").join("config.toml"))
    }

    /// `NEWS_API_KEY` takes precedence over the file.
    fn with_env(mut self) -> Self {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.is_empty() {
                self.api.api_key = Some(key);
            }
        }
        self
    }

    fn create_default_config(path: &PathBuf) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.clone(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.clone(),
                source: e,
            })?;

        Ok(())
    }

    fn default_config_content() -> String {
        r##"# newsdesk configuration

[api]
# NewsAPI endpoint and key. NEWS_API_KEY in the environment overrides api_key.
base_url = "https://newsapi.org/v2"
# api_key = "your-key"

# Request timeout in seconds
timeout_secs = 10

user_agent = "newsdesk/0.1.0"

# Use built-in sample articles instead of the network
mock = false

[storage]
# Database for favorites, likes and comments.
# Defaults to the platform data directory.
# path = "/home/me/.local/share/newsdesk/newsdesk.db"

# Keep nothing on disk
headless = false

[defaults]
country = "us"
page_size = 20
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_deserializes() {
        let content = Config::default_config_content();
        let config: Config = toml::from_str(&content).expect("Default config should be valid TOML");

        assert_eq!(config.api.base_url, "https://newsapi.org/v2");
        assert_eq!(config.api.timeout_secs, 10);
        assert!(!config.api.mock);
        assert!(config.storage.path.is_none());
        assert_eq!(config.defaults.page_size, 20);
    }

    #[test]
    fn test_partial_config() {
        let content = r##"
[api]
mock = true

[storage]
headless = true
"##;
        let config: Config = toml::from_str(content).expect("Partial config should work");

        assert!(config.api.mock);
        assert!(config.storage.headless);
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.defaults.country, "us");
    }

    #[test]
    fn test_empty_config() {
        let config: Config = toml::from_str("").expect("Empty config should work");
        assert_eq!(config.api.user_agent, "newsdesk/0.1.0");
        assert!(!config.storage.headless);
    }
}
