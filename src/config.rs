//! # Export Settings
//!
//! Settings for the data exporter, loaded from a TOML file by the standalone
//! host and handed to the [`Exporter`](crate::exporter::Exporter) through its
//! host callbacks.
//!
//! ## Example: TOML Configuration
//!
//! ```toml
//! [export]
//! folder = "/home/pi/exportdata"
//! temperature_file = "temperature.txt"
//! status_file = "status.txt"
//!
//! [refresh]
//! interval_secs = 2
//! reload_secs = 10
//!
//! [source]
//! status_json = "/run/printer/status.json"
//! temperatures_json = "/run/printer/temperatures.json"
//! ```
//!
//! Every section and field is optional; missing values fall back to defaults.

// src/config.rs - Exporter settings
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid setting: {0}")]
    Invalid(String),
}

/// Top-level settings file.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub export: ExportSettings,
    #[serde(default)]
    pub refresh: RefreshConfig,
    #[serde(default)]
    pub source: SourceConfig,
}

/// The settings the host exposes for the exporter: where to write and under
/// which names.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ExportSettings {
    #[serde(default = "default_folder")]
    pub folder: PathBuf,
    #[serde(default = "default_temperature_file")]
    pub temperature_file: String,
    #[serde(default = "default_status_file")]
    pub status_file: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            folder: default_folder(),
            temperature_file: default_temperature_file(),
            status_file: default_status_file(),
        }
    }
}

impl ExportSettings {
    pub fn new(
        folder: impl Into<PathBuf>,
        temperature_file: impl Into<String>,
        status_file: impl Into<String>,
    ) -> Self {
        Self {
            folder: folder.into(),
            temperature_file: temperature_file.into(),
            status_file: status_file.into(),
        }
    }

    pub fn temperature_path(&self) -> PathBuf {
        self.folder.join(&self.temperature_file)
    }

    pub fn status_path(&self) -> PathBuf {
        self.folder.join(&self.status_file)
    }

    /// Reject empty folder or file names.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.folder.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("folder must not be empty".to_string()));
        }
        if self.temperature_file.is_empty() {
            return Err(ConfigError::Invalid("temperature_file must not be empty".to_string()));
        }
        if self.status_file.is_empty() {
            return Err(ConfigError::Invalid("status_file must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Timer cadence for the exporter and the host's settings reload.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RefreshConfig {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: f64,
    #[serde(default = "default_reload_secs")]
    pub reload_secs: f64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            reload_secs: default_reload_secs(),
        }
    }
}

impl RefreshConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs_f64(self.interval_secs)
    }

    pub fn reload(&self) -> Duration {
        Duration::from_secs_f64(self.reload_secs)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(self.interval_secs > 0.0) {
            return Err("Refresh interval_secs must be > 0".to_string());
        }
        if !(self.reload_secs > 0.0) {
            return Err("Refresh reload_secs must be > 0".to_string());
        }
        Ok(())
    }
}

/// Where the standalone host reads printer snapshots from. Unset paths mean
/// "nothing to report".
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct SourceConfig {
    #[serde(default)]
    pub status_json: Option<PathBuf>,
    #[serde(default)]
    pub temperatures_json: Option<PathBuf>,
}

// Default value functions
fn default_folder() -> PathBuf { std::env::temp_dir().join("exportdata") }
fn default_temperature_file() -> String { "temperature.txt".to_string() }
fn default_status_file() -> String { "status.txt".to_string() }
fn default_interval_secs() -> f64 { 2.0 }
fn default_reload_secs() -> f64 { 10.0 }

/// Load configuration from a TOML file at the given path.
pub fn load_config(path: &str) -> Result<Config, ConfigError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            tracing::error!("Failed to read config file '{}': {}", path, e);
            return Err(ConfigError::Io(e));
        }
    };
    let config: Config = match toml::from_str(&contents) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to parse config TOML: {}", e);
            return Err(ConfigError::Toml(e));
        }
    };
    config.refresh.validate().map_err(ConfigError::Invalid)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.export.temperature_file, "temperature.txt");
        assert_eq!(config.export.status_file, "status.txt");
        assert!(config.export.folder.ends_with("exportdata"));
        assert_eq!(config.refresh.interval(), Duration::from_secs(2));
        assert!(config.source.status_json.is_none());
    }

    #[test]
    fn test_load_config_success() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("exportdata.toml");
        let mut file = File::create(&file_path).unwrap();
        writeln!(file, "[export]\nfolder = '/srv/export'\nstatus_file = 'printstatus.txt'").unwrap();
        file.flush().unwrap();
        let config = load_config(file_path.to_str().unwrap()).unwrap();
        assert_eq!(config.export.folder, PathBuf::from("/srv/export"));
        assert_eq!(config.export.status_file, "printstatus.txt");
        // Defaults for missing fields
        assert_eq!(config.export.temperature_file, "temperature.txt");
        assert_eq!(config.refresh.reload_secs, 10.0);
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent_exportdata.toml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("bad.toml");
        let mut file = File::create(&file_path).unwrap();
        writeln!(file, "not a valid toml").unwrap();
        file.flush().unwrap();
        let result = load_config(file_path.to_str().unwrap());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_load_config_rejects_zero_interval() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("zero.toml");
        std::fs::write(&file_path, "[refresh]\ninterval_secs = 0.0\n").unwrap();
        let result = load_config(file_path.to_str().unwrap());
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_export_settings_validation() {
        assert!(ExportSettings::default().validate().is_ok());
        assert!(ExportSettings::new("", "t.txt", "s.txt").validate().is_err());
        assert!(ExportSettings::new("/tmp/x", "", "s.txt").validate().is_err());
        assert!(ExportSettings::new("/tmp/x", "t.txt", "").validate().is_err());
    }

    #[test]
    fn test_output_paths() {
        let settings = ExportSettings::new("/srv/export", "t.txt", "s.txt");
        assert_eq!(settings.temperature_path(), PathBuf::from("/srv/export/t.txt"));
        assert_eq!(settings.status_path(), PathBuf::from("/srv/export/s.txt"));
    }
}
