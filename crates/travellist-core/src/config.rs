//! Application configuration management.
//!
//! Configuration is stored at `~/.config/travellist/config.json` (or the
//! platform equivalent). A missing file means defaults. The data directory
//! can be overridden with the `TRAVELLIST_DATA_DIR` environment variable.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Application name used for config/data directory paths
const APP_NAME: &str = "travellist";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable that overrides the data directory
pub const DATA_DIR_ENV: &str = "TRAVELLIST_DATA_DIR";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Where the durable tier lives. Defaults to the platform data dir.
    pub data_dir: Option<PathBuf>,
    /// Default for "remember me" when logging in.
    pub remember_me: bool,
    /// Also write logs to a file in the data directory.
    pub log_to_file: bool,
    /// Store argon2 hashes instead of plaintext secrets.
    pub secure_credentials: bool,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Resolve the data directory: environment, then config, then platform
    /// default.
    pub fn data_dir(&self) -> Result<PathBuf> {
        self.resolve_data_dir(std::env::var_os(DATA_DIR_ENV).map(PathBuf::from))
    }

    fn resolve_data_dir(&self, env_override: Option<PathBuf>) -> Result<PathBuf> {
        if let Some(dir) = env_override.filter(|d| !d.as_os_str().is_empty()) {
            return Ok(dir);
        }
        if let Some(ref dir) = self.data_dir {
            return Ok(dir.clone());
        }
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }
}
