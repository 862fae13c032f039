//! Editor configuration.
//!
//! ## Learning: Serde for Serialization
//!
//! `#[derive(Serialize, Deserialize)]` generates the code to convert
//! these structs to and from TOML. `#[serde(default)]` fills missing
//! fields from `Default::default()`, so a config file only has to name
//! the settings it changes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tabba_buffer::DeviceClass;

use crate::tab::DEFAULT_TAB_NAME;

/// Main editor configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Editor behavior settings
    pub editor: EditorConfig,

    /// Where tabs are stored
    pub storage: StorageConfig,

    /// Keyboard settings
    pub keyboard: KeyboardConfig,
}

impl Config {
    /// Loads config from the default location.
    pub fn load() -> Self {
        match Self::load_from_default_path() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// Loads config from a file.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Loads from the default config path.
    fn load_from_default_path() -> Result<Self, ConfigError> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Returns the default config file path.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("tabba").join("config.toml"))
    }

    /// Returns the directory holding the tab store.
    pub fn storage_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.storage.dir {
            Some(dir) => Ok(dir.clone()),
            None => {
                let data_dir = dirs::data_dir().ok_or(ConfigError::NoDataDir)?;
                Ok(data_dir.join("tabba"))
            }
        }
    }
}

/// Editor behavior configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Device class: row width and key interception
    pub device: DeviceClass,

    /// Name of a tab when nothing is stored yet
    pub default_tab_name: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            device: DeviceClass::Wide,
            default_tab_name: DEFAULT_TAB_NAME.to_string(),
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Store directory (None = platform data dir)
    pub dir: Option<PathBuf>,
}

/// Keyboard configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyboardConfig {
    /// Extra key bindings: key press (e.g. "ctrl+r") to command id (e.g. "tab.reset")
    pub bindings: BTreeMap<String, String>,
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config directory not found")]
    NoConfigDir,

    #[error("Data directory not found")]
    NoDataDir,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.editor.device, DeviceClass::Wide);
        assert_eq!(config.editor.default_tab_name, "My Tab");
        assert!(config.storage.dir.is_none());
    }

    #[test]
    fn test_partial_config() {
        let config: Config = toml::from_str(
            r#"
            [editor]
            device = "narrow"

            [keyboard.bindings]
            "ctrl+r" = "tab.reset"
            "#,
        )
        .unwrap();

        assert_eq!(config.editor.device, DeviceClass::Narrow);
        assert_eq!(config.editor.default_tab_name, "My Tab");
        assert_eq!(config.keyboard.bindings["ctrl+r"], "tab.reset");
    }

    #[test]
    fn test_config_file_storage_dir() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let store = dir.path().join("store");
        std::fs::write(&path, format!("[storage]\ndir = {:?}\n", store.display().to_string())).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.storage_dir().unwrap(), dir.path().join("store"));
    }

    #[test]
    fn test_bad_config_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[editor]\ndevice = 7\n").unwrap();

        assert!(matches!(Config::load_from(&path), Err(ConfigError::Parse(_))));
    }
}
