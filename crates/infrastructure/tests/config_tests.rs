use domain::config::BuildForgeConfig;
use infrastructure::config::{ConfigLoader, ConfigSource, EnvOverrides};
use std::path::PathBuf;
use tempfile::TempDir;
use tokio::fs;

fn isolated_loader() -> ConfigLoader {
    ConfigLoader::new().with_search_paths(Vec::new()).without_env()
}

#[tokio::test]
async fn test_defaults_when_no_file() -> anyhow::Result<()> {
    let (config, source) = isolated_loader().load().await?;

    assert_eq!(source, ConfigSource::Default);
    assert_eq!(config, BuildForgeConfig::default());
    Ok(())
}

#[tokio::test]
async fn test_config_loader_from_toml() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let config_path = temp_dir.path().join("buildforge.toml");

    let toml_content = r#"
[database]
path = "/tmp/forge.db"
pool_size = 2

[catalog]
seed_on_start = true

[logging]
level = "debug"
"#;

    fs::write(&config_path, toml_content).await?;

    let (config, source) = isolated_loader()
        .with_path(config_path.clone())
        .load()
        .await?;

    assert_eq!(source, ConfigSource::File(config_path));
    assert_eq!(config.database.path, PathBuf::from("/tmp/forge.db"));
    assert_eq!(config.database.pool_size, 2);
    assert_eq!(config.database.busy_timeout_ms, 5_000);
    assert!(config.catalog.seed_on_start);
    assert_eq!(config.logging.level, "debug");

    Ok(())
}

#[tokio::test]
async fn test_config_loader_from_json() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let config_path = temp_dir.path().join("buildforge.json");

    fs::write(&config_path, r#"{"logging": {"json": true}}"#).await?;

    let (config, _) = isolated_loader().with_path(config_path).load().await?;

    assert!(config.logging.json);
    assert_eq!(config.database.pool_size, 4);
    Ok(())
}

#[tokio::test]
async fn test_first_existing_search_path_wins() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let missing = temp_dir.path().join("missing.toml");
    let present = temp_dir.path().join("config.toml");
    fs::write(&present, "[database]\npool_size = 9\n").await?;

    let (config, source) = isolated_loader()
        .with_search_paths(vec![missing, present.clone()])
        .load()
        .await?;

    assert_eq!(source, ConfigSource::File(present));
    assert_eq!(config.database.pool_size, 9);
    Ok(())
}

#[tokio::test]
async fn test_explicit_missing_path_is_an_error() {
    let result = isolated_loader()
        .with_path(PathBuf::from("/nonexistent/buildforge.toml"))
        .load()
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_invalid_config_rejected() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let config_path = temp_dir.path().join("buildforge.toml");
    fs::write(&config_path, "[database]\npool_size = 0\n").await?;

    let result = isolated_loader().with_path(config_path).load().await;

    assert!(result.is_err());
    Ok(())
}

#[test]
fn test_env_overrides_apply_only_set_fields() {
    let mut config = BuildForgeConfig::default();
    let overrides = EnvOverrides {
        db_path: Some(PathBuf::from("other.db")),
        log_json: Some(true),
        ..EnvOverrides::default()
    };

    overrides.apply(&mut config);

    assert_eq!(config.database.path, PathBuf::from("other.db"));
    assert!(config.logging.json);
    assert_eq!(config.database.pool_size, 4);
    assert_eq!(config.logging.level, "warn");
}

#[tokio::test]
async fn test_save_and_reload() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let config_path = temp_dir.path().join("nested").join("config.toml");

    let mut config = BuildForgeConfig::default();
    config.catalog.seed_on_start = true;

    let loader = isolated_loader();
    loader.save_config(&config, &config_path).await?;

    let (reloaded, _) = isolated_loader().with_path(config_path).load().await?;
    assert_eq!(reloaded, config);
    Ok(())
}

#[test]
fn test_example_config_parses() {
    let example = ConfigLoader::generate_example_config();
    let parsed: BuildForgeConfig = toml::from_str(&example).unwrap();
    assert_eq!(parsed, BuildForgeConfig::default());
}

#[tokio::test]
async fn test_prefixed_env_overrides_reach_loaded_config() -> anyhow::Result<()> {
    // Prefix unique to this test so parallel tests never see these variables
    std::env::set_var("BFTEST_ENV_POOL_SIZE", "7");
    std::env::set_var("BFTEST_ENV_LOG_LEVEL", "debug");

    let loader = ConfigLoader::new()
        .with_search_paths(Vec::new())
        .with_env_prefix("BFTEST_ENV_");

    let overrides = loader.env_overrides()?;
    assert_eq!(overrides.pool_size, Some(7));
    assert!(overrides.db_path.is_none());

    let (config, source) = loader.load().await?;
    assert_eq!(source, ConfigSource::Default);
    assert_eq!(config.database.pool_size, 7);
    assert_eq!(config.logging.level, "debug");

    std::env::remove_var("BFTEST_ENV_POOL_SIZE");
    std::env::remove_var("BFTEST_ENV_LOG_LEVEL");
    Ok(())
}
