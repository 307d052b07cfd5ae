use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main BuildForge configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BuildForgeConfig {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub logging: LoggingSettings,
}

/// SQLite storage settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database file; relative paths resolve against the working directory
    #[serde(default = "default_db_path")]
    pub path: PathBuf,

    /// Connection pool size
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,

    /// How long a writer waits for the database lock, milliseconds
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            pool_size: default_pool_size(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

/// Catalog bootstrap settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CatalogConfig {
    /// Load the demonstration catalog when the catalog is empty
    #[serde(default)]
    pub seed_on_start: bool,
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// trace, debug, info, warn or error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit one JSON object per event instead of human-readable lines
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("buildforge.db")
}

fn default_pool_size() -> u32 {
    4
}

fn default_busy_timeout_ms() -> u64 {
    5_000
}

fn default_log_level() -> String {
    "warn".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BuildForgeConfig::default();
        assert_eq!(config.database.pool_size, 4);
        assert_eq!(config.database.path, PathBuf::from("buildforge.db"));
        assert!(!config.catalog.seed_on_start);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_partial_document_fills_defaults() {
        let config: BuildForgeConfig =
            serde_json::from_str(r#"{"database": {"pool_size": 8}}"#).unwrap();
        assert_eq!(config.database.pool_size, 8);
        assert_eq!(config.database.busy_timeout_ms, 5_000);
        assert!(!config.logging.json);
    }
}
