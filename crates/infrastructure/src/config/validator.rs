use anyhow::{bail, Result};
use domain::config::*;
use tracing::warn;

const VALID_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, config: &BuildForgeConfig) -> Result<()> {
        self.validate_database_config(&config.database)?;
        self.validate_logging_config(&config.logging)?;
        Ok(())
    }

    fn validate_database_config(&self, config: &DatabaseConfig) -> Result<()> {
        if config.pool_size == 0 {
            bail!("database.pool_size must be greater than 0");
        }

        if config.path.as_os_str().is_empty() {
            bail!("database.path must not be empty");
        }

        if config.busy_timeout_ms == 0 {
            warn!("database.busy_timeout_ms is 0, concurrent writers will fail immediately");
        }

        Ok(())
    }

    fn validate_logging_config(&self, config: &LoggingSettings) -> Result<()> {
        let level = config.level.to_lowercase();
        if !VALID_LEVELS.contains(&level.as_str()) {
            bail!(
                "Invalid log level: {}. Must be one of: {:?}",
                config.level,
                VALID_LEVELS
            );
        }
        Ok(())
    }
}

impl Default for ConfigValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ConfigValidator::new()
            .validate(&BuildForgeConfig::default())
            .is_ok());
    }

    #[test]
    fn test_zero_pool_rejected() {
        let mut config = BuildForgeConfig::default();
        config.database.pool_size = 0;
        let err = ConfigValidator::new().validate(&config).unwrap_err();
        assert!(err.to_string().contains("pool_size"));
    }

    #[test]
    fn test_level_case_insensitive() {
        let mut config = BuildForgeConfig::default();
        config.logging.level = "DEBUG".to_string();
        assert!(ConfigValidator::new().validate(&config).is_ok());

        config.logging.level = "loud".to_string();
        assert!(ConfigValidator::new().validate(&config).is_err());
    }
}
