use anyhow::{Context, Result};
use domain::config::BuildForgeConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

use super::validator::ConfigValidator;

/// Where the effective configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Default,
}

/// Values read from `BUILDFORGE_*` environment variables
///
/// `BUILDFORGE_DB_PATH`, `BUILDFORGE_POOL_SIZE`, `BUILDFORGE_LOG_LEVEL`,
/// `BUILDFORGE_LOG_JSON`, `BUILDFORGE_SEED_ON_START`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnvOverrides {
    pub db_path: Option<PathBuf>,
    pub pool_size: Option<u32>,
    pub log_level: Option<String>,
    pub log_json: Option<bool>,
    pub seed_on_start: Option<bool>,
}

impl EnvOverrides {
    pub fn apply(self, config: &mut BuildForgeConfig) {
        if let Some(path) = self.db_path {
            config.database.path = path;
        }
        if let Some(size) = self.pool_size {
            config.database.pool_size = size;
        }
        if let Some(level) = self.log_level {
            config.logging.level = level;
        }
        if let Some(json) = self.log_json {
            config.logging.json = json;
        }
        if let Some(seed) = self.seed_on_start {
            config.catalog.seed_on_start = seed;
        }
    }
}

pub struct ConfigLoader {
    explicit_path: Option<PathBuf>,
    config_paths: Vec<PathBuf>,
    env_prefix: String,
    read_env: bool,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            explicit_path: None,
            config_paths: Self::default_config_paths(),
            env_prefix: "BUILDFORGE_".to_string(),
            read_env: true,
        }
    }

    /// A file that must exist; loading fails otherwise
    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.explicit_path = Some(path);
        self
    }

    /// Replace the search list used when no explicit path is given
    pub fn with_search_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.config_paths = paths;
        self
    }

    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    pub fn without_env(mut self) -> Self {
        self.read_env = false;
        self
    }

    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("buildforge.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("buildforge").join("config.toml"));
        }

        // ~/.config is not the platform config dir on macOS
        if let Some(home_dir) = dirs::home_dir() {
            let path = home_dir.join(".config").join("buildforge").join("config.toml");
            if !paths.contains(&path) {
                paths.push(path);
            }
        }

        paths
    }

    pub async fn load(&self) -> Result<(BuildForgeConfig, ConfigSource)> {
        let (mut config, source) = match self.locate()? {
            Some(path) => {
                let config = self
                    .load_file(&path)
                    .await
                    .with_context(|| format!("Failed to load config from {}", path.display()))?;
                info!("Loaded configuration from: {}", path.display());
                (config, ConfigSource::File(path))
            }
            None => {
                debug!("No config file found, using defaults");
                (BuildForgeConfig::default(), ConfigSource::Default)
            }
        };

        if self.read_env {
            let overrides = self.env_overrides()?;
            debug!(?overrides, "Applying environment overrides");
            overrides.apply(&mut config);
        }

        ConfigValidator::new().validate(&config)?;
        Ok((config, source))
    }

    fn locate(&self) -> Result<Option<PathBuf>> {
        if let Some(path) = &self.explicit_path {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            return Ok(Some(path.clone()));
        }

        Ok(self.config_paths.iter().find(|p| p.exists()).cloned())
    }

    pub fn env_overrides(&self) -> Result<EnvOverrides> {
        envy::prefixed(self.env_prefix.as_str())
            .from_env::<EnvOverrides>()
            .with_context(|| format!("Invalid {}* environment variable", self.env_prefix))
    }

    async fn load_file(&self, path: &Path) -> Result<BuildForgeConfig> {
        let content = fs::read_to_string(path)
            .await
            .context("Failed to read config file")?;

        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");

        match extension {
            "json" => serde_json::from_str(&content).context("Failed to parse JSON config"),
            _ => toml::from_str(&content).context("Failed to parse TOML config"),
        }
    }

    pub async fn save_config(&self, config: &BuildForgeConfig, path: &Path) -> Result<()> {
        let content = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::to_string_pretty(config)?,
            _ => toml::to_string_pretty(config)?,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        fs::write(path, content).await?;
        info!("Configuration saved to: {}", path.display());

        Ok(())
    }

    pub fn generate_example_config() -> String {
        toml::to_string_pretty(&BuildForgeConfig::default())
            .unwrap_or_else(|_| "Failed to generate example config".to_string())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
