//! # Application Configuration
//!
//! Where the backing file lives and the inventory defaults.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command line (highest priority)                                    │
//! │     tally --data-file ./shop.csv                                       │
//! │     TALLY_DATA_FILE=./shop.csv (flag wins over the variable)           │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config PATH, else                                                │
//! │     ~/.config/tally/tally.toml (Linux)                                 │
//! │     ~/Library/Application Support/com.tally.tally/tally.toml (macOS)   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     inventory_data.csv in the working directory                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # tally.toml
//! [storage]
//! data_file = "inventory_data.csv"
//!
//! [inventory]
//! default_category = "General"
//! default_minimum_stock = 5
//! expiring_soon_days = 30
//!
//! [logging]
//! filter = "warn"   # overridden by RUST_LOG
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use tally_core::{DEFAULT_CATEGORY, DEFAULT_EXPIRING_SOON_DAYS, DEFAULT_MINIMUM_STOCK};
use tally_store::StoreConfig;

use crate::error::{AppError, AppResult};

/// Environment variable naming the backing file.
pub const DATA_FILE_ENV: &str = "TALLY_DATA_FILE";

// =============================================================================
// Sections
// =============================================================================

/// Where inventory data is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Backing file path, relative to the working directory unless absolute.
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
}

fn default_data_file() -> PathBuf {
    PathBuf::from("inventory_data.csv")
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            data_file: default_data_file(),
        }
    }
}

/// Defaults applied to new items and status checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySettings {
    #[serde(default = "default_category")]
    pub default_category: String,

    #[serde(default = "default_minimum_stock")]
    pub default_minimum_stock: i64,

    /// Window for the EXP SOON status and the analytics count.
    #[serde(default = "default_expiring_soon_days")]
    pub expiring_soon_days: u32,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

fn default_minimum_stock() -> i64 {
    DEFAULT_MINIMUM_STOCK
}

fn default_expiring_soon_days() -> u32 {
    DEFAULT_EXPIRING_SOON_DAYS
}

impl Default for InventorySettings {
    fn default() -> Self {
        InventorySettings {
            default_category: default_category(),
            default_minimum_stock: default_minimum_stock(),
            expiring_soon_days: default_expiring_soon_days(),
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    "warn".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            filter: default_log_filter(),
        }
    }
}

// =============================================================================
// App Config
// =============================================================================

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub inventory: InventorySettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

impl AppConfig {
    /// Loads configuration from file and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`config_path`, else the platform default if present)
    ///
    /// `--data-file` and `TALLY_DATA_FILE` are applied by the caller.
    /// An explicitly named config file must exist.
    pub fn load(config_path: Option<PathBuf>) -> AppResult<Self> {
        let explicit = config_path.is_some();
        let mut config = match config_path.or_else(Self::default_config_path) {
            Some(path) if explicit || path.exists() => Self::from_file(&path)?,
            Some(path) => {
                debug!(?path, "Config file not found, using defaults");
                Self::default()
            }
            None => Self::default(),
        };

        config.validate()?;

        Ok(config)
    }

    /// Reads and parses one TOML file.
    pub fn from_file(path: &Path) -> AppResult<Self> {
        info!(?path, "Loading config from file");
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> AppResult<()> {
        if self.storage.data_file.as_os_str().is_empty() {
            return Err(AppError::config("storage.data_file must not be empty"));
        }

        if self.inventory.default_category.trim().is_empty() {
            return Err(AppError::config(
                "inventory.default_category must not be empty",
            ));
        }

        if self.inventory.default_minimum_stock < 0 {
            return Err(AppError::config(
                "inventory.default_minimum_stock cannot be negative",
            ));
        }

        Ok(())
    }

    /// Store configuration derived from these settings.
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::new(&self.storage.data_file)
            .default_category(self.inventory.default_category.clone())
            .default_minimum_stock(self.inventory.default_minimum_stock)
            .expiring_soon_days(self.inventory.expiring_soon_days)
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "tally", "tally")
            .map(|dirs| dirs.config_dir().join("tally.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.storage.data_file, PathBuf::from("inventory_data.csv"));
        assert_eq!(config.inventory.default_category, "General");
        assert_eq!(config.inventory.default_minimum_stock, 5);
        assert_eq!(config.inventory.expiring_soon_days, 30);
        assert_eq!(config.logging.filter, "warn");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [inventory]
            default_minimum_stock = 0
            "#,
        )
        .unwrap();

        assert_eq!(config.inventory.default_minimum_stock, 0);
        assert_eq!(config.inventory.default_category, "General");
        assert_eq!(config.storage, StorageSettings::default());
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tally.toml");
        std::fs::write(
            &path,
            "[storage]\ndata_file = \"shop.csv\"\n[logging]\nfilter = \"debug\"\n",
        )
        .unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.storage.data_file, PathBuf::from("shop.csv"));
        assert_eq!(config.logging.filter, "debug");
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = AppConfig::load(Some(dir.path().join("absent.toml")));
        assert!(matches!(result, Err(AppError::Io(_))));
    }

    #[test]
    fn test_bad_toml_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tally.toml");
        std::fs::write(&path, "[inventory]\ndefault_minimum_stock = \"five\"\n").unwrap();

        assert!(matches!(
            AppConfig::from_file(&path),
            Err(AppError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_validation() {
        let mut config = AppConfig::default();
        config.inventory.default_minimum_stock = -1;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.inventory.default_category = "  ".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.storage.data_file = PathBuf::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_store_config() {
        let mut config = AppConfig::default();
        config.inventory.expiring_soon_days = 7;

        let store = config.store_config();
        assert_eq!(store.data_path, Some(PathBuf::from("inventory_data.csv")));
        assert_eq!(store.expiring_soon_days, 7);
    }
}
