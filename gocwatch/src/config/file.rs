//! Loading and saving `~/.gocwatch/config.ini`.

use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;

use super::defaults::{ENV_HOPPIE_LOGON, ENV_STATION};
use super::settings::ConfigFile;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Failed to write config file
    #[error("Failed to write config file: {0}")]
    WriteError(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    /// Failed to create config directory
    #[error("Failed to create config directory: {0}")]
    DirectoryError(std::io::Error),
}

impl ConfigFile {
    /// Load from the default path. A missing file yields defaults.
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&config_file_path())
    }

    /// Load from a specific path. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        super::parser::parse_ini(&ini)
    }

    /// Save to the default path.
    pub fn save(&self) -> Result<(), ConfigFileError> {
        self.save_to(&config_file_path())
    }

    /// Save to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigFileError::DirectoryError)?;
        }

        let content = super::writer::to_config_string(self);
        std::fs::write(path, content).map_err(|e| ConfigFileError::WriteError(e.to_string()))
    }

    /// Create the default config file if it doesn't exist.
    ///
    /// Returns the path and whether the file was created.
    pub fn ensure_exists() -> Result<(PathBuf, bool), ConfigFileError> {
        let path = config_file_path();
        if path.exists() {
            return Ok((path, false));
        }
        Self::default().save_to(&path)?;
        Ok((path, true))
    }

    /// Overlay `HOPPIE_LOGON` and `GOC_STATION` from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Overlay environment-style overrides from `lookup`. Blank values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(logon) = value(ENV_HOPPIE_LOGON) {
            self.hoppie.logon = Some(logon);
        }
        if let Some(station) = value(ENV_STATION) {
            self.hoppie.station = station.to_uppercase();
        }
    }
}

/// Get the path to the config directory (~/.gocwatch).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".gocwatch")
}

/// Get the path to the config file (~/.gocwatch/config.ini).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = ConfigFile::default();

        assert!(config.hoppie.logon.is_none());
        assert_eq!(config.hoppie.station, "HPFGOC");
        assert_eq!(config.network.fleet_prefix, "HPF");
        assert_eq!(config.watch.poll_interval, DEFAULT_POLL_INTERVAL_SECS);
        assert_eq!(config.watch.arrival_distance_nm, DEFAULT_ARRIVAL_DISTANCE_NM);
        assert!(config.rules.welcome && config.rules.arrival && config.rules.tsat);
        assert!(!config.rules.welcome_requires_ground);
        assert_eq!(config.airports.len(), 3);
        assert!(config.watch.state_dir.ends_with(".gocwatch/state"));
    }

    #[test]
    fn test_load_nonexistent_returns_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = ConfigFile::load_from(&temp_dir.path().join("nonexistent.ini")).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.ini");

        let mut config = ConfigFile::default();
        config.hoppie.logon = Some("abc123".to_string());
        config.watch.poll_interval = 45;
        config.rules.tsat = false;
        config.save_to(&path).unwrap();

        let reloaded = ConfigFile::load_from(&path).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ConfigFile::default();
        config.hoppie.logon = Some("from-file".to_string());

        config.apply_overrides(|key| match key {
            "HOPPIE_LOGON" => Some(" from-env ".to_string()),
            "GOC_STATION" => Some("hpfops".to_string()),
            _ => None,
        });
        assert_eq!(config.hoppie.logon.as_deref(), Some("from-env"));
        assert_eq!(config.hoppie.station, "HPFOPS");

        config.apply_overrides(|_| Some("   ".to_string()));
        assert_eq!(config.hoppie.logon.as_deref(), Some("from-env"));
    }
}
