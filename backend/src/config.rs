//! Application configuration.
//!
//! The data directory comes from `OWNEDIT_DATA_DIR`, falling back to
//! `<Documents>/OwnedIt`. An optional `config.yaml` inside it overrides the
//! defaults below.

use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::pdf::ReportSettings;

pub const DATA_DIR_ENV: &str = "OWNEDIT_DATA_DIR";
pub const CONFIG_FILE_NAME: &str = "config.yaml";
pub const DEFAULT_BARCODE_ENDPOINT: &str = "https://api.upcitemdb.com/prod/trial/lookup";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding the database and config file; never read from YAML
    #[serde(skip)]
    pub data_directory: PathBuf,
    pub database_file: String,
    pub bind_address: String,
    pub undo_window_secs: u64,
    pub barcode_endpoint: String,
    pub currency_symbol: String,
    pub app_name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_directory: PathBuf::from("OwnedIt"),
            database_file: "inventory.db".to_string(),
            bind_address: "127.0.0.1:3000".to_string(),
            undo_window_secs: 4,
            barcode_endpoint: DEFAULT_BARCODE_ENDPOINT.to_string(),
            currency_symbol: "$".to_string(),
            app_name: "OwnedIt".to_string(),
        }
    }
}

impl AppConfig {
    /// Resolve the data directory from the environment and load its config file
    pub fn load() -> Result<Self> {
        let data_directory = resolve_data_directory(std::env::var(DATA_DIR_ENV).ok());
        Self::load_from_dir(&data_directory)
    }

    /// Load `config.yaml` from `data_directory`; a missing file yields defaults
    pub fn load_from_dir(data_directory: &Path) -> Result<Self> {
        let config_path = data_directory.join(CONFIG_FILE_NAME);

        let mut config = if config_path.exists() {
            let yaml_content = fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config file: {:?}", config_path))?;
            let config: AppConfig = serde_yaml::from_str(&yaml_content)
                .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;
            info!("Loaded configuration from {:?}", config_path);
            config
        } else {
            info!("No config file at {:?}, using defaults", config_path);
            AppConfig::default()
        };

        config.data_directory = data_directory.to_path_buf();
        Ok(config)
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_directory.join(&self.database_file)
    }

    pub fn undo_window(&self) -> Duration {
        Duration::from_secs(self.undo_window_secs)
    }

    pub fn report_settings(&self) -> ReportSettings {
        ReportSettings {
            app_name: self.app_name.clone(),
            currency_symbol: self.currency_symbol.clone(),
        }
    }
}

/// Explicit directory if given, else `<Documents>/OwnedIt`, else `./OwnedIt`
pub fn resolve_data_directory(explicit: Option<String>) -> PathBuf {
    if let Some(dir) = explicit.filter(|d| !d.trim().is_empty()) {
        return PathBuf::from(dir.trim());
    }
    match dirs::document_dir() {
        Some(documents) => documents.join("OwnedIt"),
        None => PathBuf::from("OwnedIt"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_config_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = AppConfig::load_from_dir(temp_dir.path()).expect("Failed to load config");

        assert_eq!(config.data_directory, temp_dir.path());
        assert_eq!(config.database_path(), temp_dir.path().join("inventory.db"));
        assert_eq!(config.undo_window(), Duration::from_secs(4));
        assert_eq!(config.bind_address, "127.0.0.1:3000");
        assert_eq!(config.report_settings(), ReportSettings::default());
    }

    #[test]
    fn test_config_file_overrides_some_fields() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join(CONFIG_FILE_NAME),
            "undo_window_secs: 10\ncurrency_symbol: \"€\"\n",
        )
        .unwrap();

        let config = AppConfig::load_from_dir(temp_dir.path()).expect("Failed to load config");
        assert_eq!(config.undo_window_secs, 10);
        assert_eq!(config.currency_symbol, "€");
        assert_eq!(config.app_name, "OwnedIt");
        assert_eq!(config.barcode_endpoint, DEFAULT_BARCODE_ENDPOINT);
    }

    #[test]
    fn test_malformed_config_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), "undo_window_secs: [not a number\n").unwrap();
        assert!(AppConfig::load_from_dir(temp_dir.path()).is_err());
    }

    #[test]
    fn test_resolve_data_directory() {
        assert_eq!(
            resolve_data_directory(Some(" /tmp/inventory ".to_string())),
            PathBuf::from("/tmp/inventory")
        );
        let fallback = resolve_data_directory(None);
        assert!(fallback.ends_with("OwnedIt"));
        assert_eq!(resolve_data_directory(Some("  ".to_string())), fallback);
    }
}
