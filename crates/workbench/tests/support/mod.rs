#![allow(dead_code)]

use domain::{CatalogQuery, ComponentCategory, ComponentId, NewBuild};
use tempfile::TempDir;
use workbench::{create_default_service, WorkbenchService};

/// Service on a throwaway database with the demo catalog and one user
pub struct Fixture {
    pub service: WorkbenchService,
    _dir: TempDir,
}

pub async fn fixture() -> Fixture {
    let dir = TempDir::new().expect("failed to create temp dir");
    let service = create_default_service(dir.path().join("test.db"))
        .await
        .expect("failed to open service");
    service.seed(false).await.expect("seed failed");
    service
        .create_user("alice", None)
        .await
        .expect("failed to create user");
    Fixture { service, _dir: dir }
}

impl Fixture {
    pub async fn part(&self, category: ComponentCategory, name: &str) -> ComponentId {
        self.service
            .list_components(&CatalogQuery::category(category))
            .await
            .expect("list failed")
            .into_iter()
            .find(|c| c.name == name)
            .unwrap_or_else(|| panic!("{name} not in catalog"))
            .id
    }

    pub async fn new_build(&self, owner: &str) -> i64 {
        self.service
            .create_build(NewBuild::new(owner, "Test rig"))
            .await
            .expect("failed to create build")
            .id
    }
}
