use anyhow::Result;
use clap::{Args, Subcommand};
use colored::*;
use domain::BuildForgeConfig;
use infrastructure::{ConfigLoader, ConfigSource};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    command: ConfigSubcommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum ConfigSubcommand {
    /// Print the effective configuration and where it came from
    #[command(name = "show")]
    Show,
    /// Write the effective configuration to a file (TOML, or JSON by extension)
    #[command(name = "init")]
    Init {
        #[arg(default_value = "buildforge.toml")]
        path: PathBuf,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

impl ConfigCommand {
    pub async fn execute(self, config: &BuildForgeConfig, source: &ConfigSource) -> Result<()> {
        match self.command {
            ConfigSubcommand::Show => {
                match source {
                    ConfigSource::File(path) => {
                        println!("{} Loaded from {}", "ℹ".blue(), path.display())
                    }
                    ConfigSource::Default => println!("{} Built-in defaults", "ℹ".blue()),
                }
                println!("{}", serde_json::to_string_pretty(config)?);
            }
            ConfigSubcommand::Init { path, force } => {
                if path.exists() && !force {
                    anyhow::bail!("{} already exists, pass --force to overwrite", path.display());
                }
                ConfigLoader::new().save_config(config, &path).await?;
                println!("{} Configuration written to {}", "✓".green(), path.display());
            }
        }
        Ok(())
    }
}
