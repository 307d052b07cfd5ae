use crate::build::{AllocationOutcome, Build, BuildId, BuildItem, BuildUpdate, NewBuild, RemovalOutcome};
use crate::catalog::ComponentId;
use crate::errors::DomainResult;
use async_trait::async_trait;

/// Persistence of builds and their component associations
#[async_trait]
pub trait BuildRepository: Send + Sync {
    async fn create(&self, build: NewBuild) -> DomainResult<Build>;

    async fn get(&self, id: BuildId) -> DomainResult<Option<Build>>;

    /// Builds of one owner, newest first
    async fn list_for_owner(&self, owner: &str) -> DomainResult<Vec<Build>>;

    async fn update(&self, id: BuildId, update: BuildUpdate) -> DomainResult<Build>;

    /// Delete a build together with its items
    async fn delete(&self, id: BuildId) -> DomainResult<bool>;

    /// Items of a build in insertion order
    async fn items(&self, id: BuildId) -> DomainResult<Vec<BuildItem>>;

    /// Run the slot allocator for `component_id` and persist the result
    /// atomically with respect to other writers of the same build
    async fn add_component(
        &self,
        id: BuildId,
        component_id: ComponentId,
    ) -> DomainResult<AllocationOutcome>;

    async fn remove_component(
        &self,
        id: BuildId,
        component_id: ComponentId,
    ) -> DomainResult<RemovalOutcome>;
}
