//! Configuration management with YAML support

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Storage layout configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the capsule database and managed media files
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

fn default_data_dir() -> String {
    "~/.local/share/keepsake".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    /// Searches in order:
    /// 1. Provided path
    /// 2. ./keepsake.yaml (current directory)
    /// 3. ~/.config/keepsake/keepsake.yaml
    pub fn load(path: &str) -> Result<Self> {
        let search_paths = vec![
            shellexpand::tilde(path).to_string(),
            "keepsake.yaml".to_string(),
            shellexpand::tilde("~/.config/keepsake/keepsake.yaml").to_string(),
        ];

        for search_path in &search_paths {
            if std::path::Path::new(search_path).exists() {
                let content = std::fs::read_to_string(search_path)?;
                let config: Config = serde_yaml::from_str(&content)?;
                return Ok(config);
            }
        }

        // No config file found, use defaults
        Ok(Config::default())
    }

    /// Get the data directory, expanding ~ to home directory
    pub fn data_dir(&self) -> PathBuf {
        let expanded = shellexpand::tilde(&self.storage.data_dir).to_string();
        PathBuf::from(expanded)
    }

    /// SQLite database holding the capsule collection
    pub fn database_path(&self) -> PathBuf {
        self.data_dir().join("keepsake.db")
    }

    /// Managed directory for permanent media files
    pub fn media_dir(&self) -> PathBuf {
        self.data_dir().join("capsules")
    }
}
