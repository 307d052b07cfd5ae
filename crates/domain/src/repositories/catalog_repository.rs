use crate::build::BuildId;
use crate::catalog::{CatalogQuery, Component, ComponentCategory, ComponentId, ImportReport, NewComponent};
use crate::errors::DomainResult;
use async_trait::async_trait;

/// Persistence of catalog components
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Insert or update components keyed by (category, name)
    async fn upsert(&self, components: Vec<NewComponent>) -> DomainResult<ImportReport>;

    async fn get(&self, id: ComponentId) -> DomainResult<Option<Component>>;

    async fn list(&self, query: &CatalogQuery) -> DomainResult<Vec<Component>>;

    /// Components that can still be added to a build: everything except
    /// unique-category parts the build already holds
    async fn available_for(
        &self,
        build_id: BuildId,
        query: &CatalogQuery,
    ) -> DomainResult<Vec<Component>>;

    async fn count(&self, category: Option<ComponentCategory>) -> DomainResult<usize>;

    /// Remove every component; cascades to build items, reviews and wishlists
    async fn clear(&self) -> DomainResult<usize>;
}
