use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use colored::*;
use common::{init_structured_logging, LoggingConfig};
use domain::{BuildForgeConfig, DomainError, ErrorCategory};
use infrastructure::ConfigLoader;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use workbench::WorkbenchService;

mod commands;
mod render;

use commands::{
    BuildCommand, CatalogCommand, ConfigCommand, MarketCommand, ReviewCommand, UserCommand,
    WishlistCommand,
};

#[derive(Parser)]
#[command(name = "buildforge")]
#[command(about = "BuildForge - plan PC builds against a component catalog")]
#[command(version)]
struct Cli {
    /// Config file (default: ./buildforge.toml, then ~/.config/buildforge/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// SQLite database file, overrides database.path
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    json_logs: bool,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage user accounts
    User(UserCommand),
    /// Browse and maintain the component catalog
    Catalog(CatalogCommand),
    /// Create builds and place components into them
    Build(BuildCommand),
    /// Component reviews
    Review(ReviewCommand),
    /// Per-user wishlist
    Wishlist(WishlistCommand),
    /// Second-hand marketplace
    Market(MarketCommand),
    /// Inspect or write configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report_error(&e),
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = cli.config.clone() {
        loader = loader.with_path(path);
    }
    let (mut config, source) = loader.load().await?;
    apply_cli_overrides(&mut config, &cli);

    let logging = LoggingConfig::from_level_str(&config.logging.level, config.logging.json)?;
    init_structured_logging(logging)?;
    debug!(?source, db = %config.database.path.display(), "Configuration resolved");

    let command = match cli.command {
        Commands::Config(cmd) => return cmd.execute(&config, &source).await,
        other => other,
    };

    let service = WorkbenchService::open(&config).await?;
    match command {
        Commands::User(cmd) => cmd.execute(&service).await,
        Commands::Catalog(cmd) => cmd.execute(&service).await,
        Commands::Build(cmd) => cmd.execute(&service).await,
        Commands::Review(cmd) => cmd.execute(&service).await,
        Commands::Wishlist(cmd) => cmd.execute(&service).await,
        Commands::Market(cmd) => cmd.execute(&service).await,
        Commands::Config(cmd) => cmd.execute(&config, &source).await,
    }
}

fn apply_cli_overrides(config: &mut BuildForgeConfig, cli: &Cli) {
    if let Some(db) = &cli.db {
        config.database.path = db.clone();
    }
    if cli.json_logs {
        config.logging.json = true;
    }
    let level = match cli.verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    };
    if let Some(level) = level {
        config.logging.level = level.to_string();
    }
}

/// Print the failure and pick the exit status: 2 for missing records, 1 otherwise
fn report_error(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<DomainError>() {
        Some(domain) => {
            eprintln!("{} {}", "✗".red(), domain);
            if domain.category() == ErrorCategory::NotFound {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
        None => {
            eprintln!("{} {:#}", "✗".red(), err);
            ExitCode::FAILURE
        }
    }
}
