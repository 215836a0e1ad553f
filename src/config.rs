//! TOML configuration for the inventory store and CLI.
//!
//! ```toml
//! [db]
//! path = "./data/inventory.sqlite"
//! max_connections = 5
//!
//! [photos]
//! max_bytes = 5242880
//!
//! [log]
//! filter = "warn"
//! ```
//!
//! Only `[db].path` is required; every other key has a default.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    #[serde(default)]
    pub photos: PhotoConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

#[derive(Debug, Deserialize, Clone)]
pub struct PhotoConfig {
    #[serde(default = "default_max_photo_bytes")]
    pub max_bytes: u64,
}

impl Default for PhotoConfig {
    fn default() -> Self {
        Self {
            max_bytes: default_max_photo_bytes(),
        }
    }
}

fn default_max_photo_bytes() -> u64 {
    5 * 1024 * 1024
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    "warn".to_string()
}

impl Config {
    /// Built-in configuration used when no config file exists.
    pub fn minimal() -> Self {
        Self::with_db_path("./data/inventory.sqlite")
    }

    /// Default configuration pointing at the given database file.
    pub fn with_db_path(path: impl Into<PathBuf>) -> Self {
        Self {
            db: DbConfig {
                path: path.into(),
                max_connections: default_max_connections(),
            },
            photos: PhotoConfig::default(),
            log: LogConfig::default(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).with_context(|| "Failed to parse config file")?;

    if config.db.path.as_os_str().is_empty() {
        anyhow::bail!("db.path must not be empty");
    }

    if config.db.max_connections == 0 {
        anyhow::bail!("db.max_connections must be >= 1");
    }

    if config.photos.max_bytes == 0 {
        anyhow::bail!("photos.max_bytes must be > 0");
    }

    Ok(config)
}
