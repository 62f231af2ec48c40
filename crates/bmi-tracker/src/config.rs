//! Configuration management for bmi-tracker.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "bmi-tracker";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "bmi_data.db";

/// Prefix for environment variable overrides.
const ENV_PREFIX: &str = "BMI_TRACKER_";

/// Narrowest chart that still leaves room for the plot area.
const MIN_CHART_WIDTH: usize = 10;

/// Fewest chart rows that still show min, mid and max labels.
const MIN_CHART_HEIGHT: usize = 4;

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `BMI_TRACKER_`)
/// 2. TOML config file at `~/.config/bmi-tracker/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// History view configuration.
    pub history: HistoryConfig,
    /// Trend chart configuration.
    pub chart: ChartConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/bmi-tracker/bmi_data.db`
    pub database_path: Option<PathBuf>,
}

/// History view configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Number of records shown when no limit is given.
    pub limit: usize,
}

/// Trend chart configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Plot area width in characters.
    pub width: usize,
    /// Plot area height in rows.
    pub height: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { limit: 10 }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 60,
            height: 12,
        }
    }
}

impl Config {
    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);
        Self::from_figment(
            Figment::new()
                .merge(Serialized::defaults(Config::default()))
                .merge(Toml::file(&config_file))
                .merge(Env::prefixed(ENV_PREFIX).split("__")),
        )
    }

    /// Extract and validate configuration from a prepared figment.
    fn from_figment(figment: Figment) -> Result<Self> {
        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.history.limit == 0 {
            return Err(Error::ConfigValidation {
                message: "history.limit must be greater than 0".to_string(),
            });
        }

        if self.chart.width < MIN_CHART_WIDTH {
            return Err(Error::ConfigValidation {
                message: format!(
                    "chart.width ({}) must be at least {MIN_CHART_WIDTH}",
                    self.chart.width
                ),
            });
        }

        if self.chart.height < MIN_CHART_HEIGHT {
            return Err(Error::ConfigValidation {
                message: format!(
                    "chart.height ({}) must be at least {MIN_CHART_HEIGHT}",
                    self.chart.height
                ),
            });
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.storage.database_path.is_none());
        assert_eq!(config.history.limit, 10);
        assert_eq!(config.chart.width, 60);
        assert_eq!(config.chart.height, 12);
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_zero_history_limit() {
        let mut config = Config::default();
        config.history.limit = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("history.limit"));
    }

    #[test]
    fn test_validate_narrow_chart() {
        let mut config = Config::default();
        config.chart.width = 3;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("chart.width"));
    }

    #[test]
    fn test_validate_short_chart() {
        let mut config = Config::default();
        config.chart.height = 1;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("chart.height"));
    }

    #[test]
    fn test_database_path_default() {
        let path = Config::default().database_path();
        assert!(path.to_string_lossy().contains("bmi-tracker"));
        assert!(path.to_string_lossy().ends_with("bmi_data.db"));
    }

    #[test]
    fn test_database_path_custom() {
        let mut config = Config::default();
        config.storage.database_path = Some(PathBuf::from("/custom/path/bmi.db"));

        assert_eq!(config.database_path(), PathBuf::from("/custom/path/bmi.db"));
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("bmi-tracker"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        let config = Config::from_figment(
            Figment::new()
                .merge(Serialized::defaults(Config::default()))
                .merge(Toml::file("/nonexistent/config.toml")),
        )
        .unwrap();

        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[storage]\ndatabase_path = \"/data/bmi.db\"\n\n[history]\nlimit = 25\n",
        )
        .unwrap();

        let config = Config::from_figment(
            Figment::new()
                .merge(Serialized::defaults(Config::default()))
                .merge(Toml::file(&path)),
        )
        .unwrap();

        assert_eq!(config.database_path(), PathBuf::from("/data/bmi.db"));
        assert_eq!(config.history.limit, 25);
        assert_eq!(config.chart, ChartConfig::default());
    }

    #[test]
    fn test_load_rejects_invalid_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[chart]\nheight = 2\n").unwrap();

        let err = Config::from_figment(
            Figment::new()
                .merge(Serialized::defaults(Config::default()))
                .merge(Toml::file(&path)),
        )
        .unwrap_err();

        assert!(matches!(err, Error::ConfigValidation { .. }));
    }

    #[test]
    fn test_config_serialize() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(json.contains("database_path"));
        assert!(json.contains("limit"));
        assert!(json.contains("width"));
    }

    #[test]
    fn test_config_deserialize_partial() {
        let json = r#"{"chart": {"width": 40}}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.chart.width, 40);
        assert_eq!(config.chart.height, 12);
        assert_eq!(config.history.limit, 10);
    }
}
