//! SQLite-backed persistence and the application service for BuildForge

use anyhow::Result;
use domain::config::BuildForgeConfig;
use std::path::Path;

pub mod service;
pub mod store;

pub use service::WorkbenchService;
pub use store::SqliteStore;

/// Open a service on `db_path` with default pool settings
///
/// # Example
/// ```no_run
/// use workbench::create_default_service;
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let service = create_default_service("builds.db").await?;
///     service.seed(false).await?;
///     service.create_user("alice", None).await?;
///     Ok(())
/// }
/// ```
pub async fn create_default_service<P: AsRef<Path>>(db_path: P) -> Result<WorkbenchService> {
    let mut config = BuildForgeConfig::default();
    config.database.path = db_path.as_ref().to_path_buf();
    WorkbenchService::open(&config).await
}
