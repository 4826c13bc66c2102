//! Configuration management for Brandcast

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{ConfigError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub provider: ProviderConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
}

/// Publishing provider endpoint and credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub base_url: String,
    /// File holding the provider API key, one line.
    pub api_key_file: String,
}

impl ProviderConfig {
    pub fn expand_api_key_file_path(&self) -> Result<PathBuf> {
        Ok(PathBuf::from(
            shellexpand::tilde(&self.api_key_file).to_string(),
        ))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DefaultsConfig {
    /// Platforms used when a publish request does not name any.
    #[serde(default)]
    pub platforms: Vec<String>,
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        let config_path = resolve_config_path()?;
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::ParseError)?;
        Ok(config)
    }

    /// Create a default configuration
    pub fn default_config() -> Self {
        Self {
            database: DatabaseConfig {
                path: "~/.local/share/brandcast/brandcast.db".to_string(),
            },
            provider: ProviderConfig {
                base_url: "https://api.publisher.example.com".to_string(),
                api_key_file: "~/.config/brandcast/provider.key".to_string(),
            },
            defaults: DefaultsConfig {
                platforms: vec!["instagram".to_string(), "facebook".to_string()],
            },
        }
    }
}

/// Resolve the configuration file path following XDG Base Directory spec
pub fn resolve_config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("BRANDCAST_CONFIG") {
        return Ok(PathBuf::from(shellexpand::tilde(&path).to_string()));
    }

    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::MissingField("config directory".to_string()))?;

    Ok(config_dir.join("brandcast").join("config.toml"))
}

/// Resolve the database path, honoring `BRANDCAST_DB_PATH` over the
/// configured value, with an XDG data-dir default.
pub fn resolve_db_path(configured: Option<&str>) -> Result<PathBuf> {
    if let Ok(path) = std::env::var("BRANDCAST_DB_PATH") {
        return Ok(PathBuf::from(shellexpand::tilde(&path).to_string()));
    }

    if let Some(path) = configured {
        return Ok(PathBuf::from(shellexpand::tilde(path).to_string()));
    }

    let data_dir = dirs::data_dir()
        .ok_or_else(|| ConfigError::MissingField("data directory".to_string()))?;

    Ok(data_dir.join("brandcast").join("brandcast.db"))
}
