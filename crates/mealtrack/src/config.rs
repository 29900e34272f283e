//! Configuration management for mealtrack.
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
use crate::export::{CsvExporter, ExportLocale, EXPORT_FILE_NAME};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "mealtrack";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "meals.db";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `MEALTRACK_`)
/// 2. TOML config file at `~/.config/mealtrack/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Export configuration.
    pub export: ExportConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/mealtrack/meals.db`
    pub database_path: Option<PathBuf>,
}

/// Export-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Language of headers and yes/no tokens.
    pub locale: ExportLocale,
    /// Double quotes embedded in fields.
    pub escape_quotes: bool,
    /// File name used when no output path is given.
    pub file_name: String,
    /// Directory the export is written to. Defaults to the current directory.
    pub directory: Option<PathBuf>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            locale: ExportLocale::default(),
            escape_quotes: true,
            file_name: EXPORT_FILE_NAME.to_string(),
            directory: None,
        }
    }
}

impl Config {
    /// Load configuration, reading the TOML file at `config_path` or the
    /// default location.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("MEALTRACK_").split("__"));

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
        let name = self.export.file_name.trim();
        if name.is_empty() {
            return Err(Error::config_validation("export.file_name must not be empty"));
        }
        if name.contains('/') || name.contains('\\') {
            return Err(Error::config_validation(format!(
                "export.file_name must be a plain file name, got {name}; use export.directory for the location"
            )));
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

    /// Where `export` writes when no output path is given.
    #[must_use]
    pub fn export_path(&self) -> PathBuf {
        self.export
            .directory
            .clone()
            .unwrap_or_default()
            .join(&self.export.file_name)
    }

    /// Exporter configured from the export section.
    #[must_use]
    pub fn exporter(&self) -> CsvExporter {
        CsvExporter {
            locale: self.export.locale,
            escape_quotes: self.export.escape_quotes,
        }
    }
}
