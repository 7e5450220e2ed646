//! Store configuration
//!
//! Loaded from `config.yaml` in the taskmgr home directory. Every field has a
//! default, so an empty or partial file is valid.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors related to loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// How CSV export quotes fields and separates rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CsvStyle {
    /// Bare comma joins, rows separated by the two characters `\n`
    #[default]
    Legacy,
    /// Quoted fields where needed, rows separated by real newlines
    Rfc4180,
}

/// Configuration for a [`crate::TaskStore`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Maximum number of notifications kept
    pub notification_capacity: usize,
    /// Categories known before any task is added
    pub seed_categories: Vec<String>,
    /// Category for tasks added without one
    pub default_category: String,
    pub csv_style: CsvStyle,
    /// Give imported tasks whose id is already taken a fresh id
    pub remap_ids_on_import: bool,
    /// Register unknown categories set through `update_task`
    pub register_categories_on_update: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            notification_capacity: 50,
            seed_categories: vec![
                "work".to_string(),
                "personal".to_string(),
                "urgent".to_string(),
            ],
            default_category: crate::models::DEFAULT_CATEGORY.to_string(),
            csv_style: CsvStyle::default(),
            remap_ids_on_import: false,
            register_categories_on_update: false,
        }
    }
}

impl StoreConfig {
    /// Parse a configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(StoreConfig::default());
        }
        let config: StoreConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file, falling back to defaults if it is missing
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::debug!("No config at {:?}, using defaults", path);
            return Ok(StoreConfig::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.notification_capacity == 0 {
            return Err(ConfigError::Invalid(
                "notification_capacity must be at least 1".to_string(),
            ));
        }
        if self.default_category.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "default_category must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.notification_capacity, 50);
        assert_eq!(config.seed_categories, vec!["work", "personal", "urgent"]);
        assert_eq!(config.default_category, "personal");
        assert_eq!(config.csv_style, CsvStyle::Legacy);
        assert!(!config.remap_ids_on_import);
        assert!(!config.register_categories_on_update);
    }

    #[test]
    fn test_partial_yaml() {
        let config = StoreConfig::from_yaml("csv_style: rfc4180\nnotification_capacity: 10\n")
            .unwrap();
        assert_eq!(config.csv_style, CsvStyle::Rfc4180);
        assert_eq!(config.notification_capacity, 10);
        assert_eq!(config.default_category, "personal");
    }

    #[test]
    fn test_empty_yaml() {
        assert_eq!(StoreConfig::from_yaml("").unwrap(), StoreConfig::default());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(StoreConfig::from_yaml("notification_capacity: 0").is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let temp = TempDir::new().unwrap();
        let config = StoreConfig::load(&temp.path().join("config.yaml")).unwrap();
        assert_eq!(config, StoreConfig::default());
    }

    #[test]
    fn test_load_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(&path, "remap_ids_on_import: true\n").unwrap();
        let config = StoreConfig::load(&path).unwrap();
        assert!(config.remap_ids_on_import);
    }
}
