//! CLI configuration.
//!
//! Read from `<config dir>/lookout/config.json`. Every field is optional
//! and a missing file means defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// How many results `search` prints unless told otherwise.
pub const DEFAULT_DISPLAY_LIMIT: usize = 10;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct CliConfig {
    /// Where snapshots live. Defaults to `<data dir>/lookout/store`.
    pub store_path: Option<PathBuf>,
    /// Results shown per search.
    pub display_limit: usize,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            store_path: None,
            display_limit: DEFAULT_DISPLAY_LIMIT,
        }
    }
}

impl CliConfig {
    /// The default config file location.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("lookout").join("config.json"))
    }

    /// Loads the config at `path`, or defaults if it doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Writes the config to `path`, creating parent directories.
    pub fn write_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let text = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, text).map_err(io_err)
    }

    /// Resolves the snapshot store directory.
    pub fn store_dir(&self) -> Option<PathBuf> {
        self.store_path
            .clone()
            .or_else(|| dirs::data_dir().map(|dir| dir.join("lookout").join("store")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = CliConfig::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, CliConfig::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"store_path": "/tmp/lookout"}"#).unwrap();

        let config = CliConfig::load_from(&path).unwrap();
        assert_eq!(config.store_path, Some(PathBuf::from("/tmp/lookout")));
        assert_eq!(config.display_limit, DEFAULT_DISPLAY_LIMIT);
        assert_eq!(config.store_dir(), Some(PathBuf::from("/tmp/lookout")));
    }

    #[test]
    fn test_write_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = CliConfig {
            store_path: None,
            display_limit: 25,
        };
        config.write_to(&path).unwrap();
        assert_eq!(CliConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(
            CliConfig::load_from(&path),
            Err(ConfigError::Json { .. })
        ));
    }
}
