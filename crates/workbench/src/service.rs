use crate::store::SqliteStore;
use anyhow::{Context, Result};
use common::OperationTimer;
use domain::catalog::seed_catalog;
use domain::config::BuildForgeConfig;
use domain::errors::validate_name;
use domain::{
    AllocationOutcome, Build, BuildId, BuildRepository, BuildSummary, BuildUpdate, CatalogQuery,
    CatalogRepository, Comment, CommunityRepository, Component, ComponentCategory, ComponentId,
    DomainError, DomainResult, ImportReport, Listing, ListingDetail, ListingId,
    MarketplaceRepository, NewBuild, NewComponent, NewListing, Rating, RemovalOutcome, Review,
    ReviewSummary, SortOrder, User, WishlistItem,
};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

const MAX_REVIEW_LEN: usize = 5_000;
const MAX_COMMENT_LEN: usize = 2_000;

/// Application service over the repositories
///
/// Enforces ownership and existence rules, then delegates persistence.
#[derive(Clone)]
pub struct WorkbenchService {
    catalog: Arc<dyn CatalogRepository>,
    builds: Arc<dyn BuildRepository>,
    community: Arc<dyn CommunityRepository>,
    market: Arc<dyn MarketplaceRepository>,
}

impl WorkbenchService {
    pub fn new(store: SqliteStore) -> Self {
        let store = Arc::new(store);
        Self {
            catalog: store.clone(),
            builds: store.clone(),
            community: store.clone(),
            market: store,
        }
    }

    /// Open the store described by `config`, seeding an empty catalog when asked to
    pub async fn open(config: &BuildForgeConfig) -> Result<Self> {
        let database = config.database.clone();
        let store = tokio::task::spawn_blocking(move || SqliteStore::open(&database))
            .await
            .context("Store initialisation panicked")??;
        let service = Self::new(store);

        if config.catalog.seed_on_start && service.catalog.count(None).await? == 0 {
            let report = service.seed(false).await?;
            info!(created = report.created, "Seeded empty catalog");
        }

        Ok(service)
    }

    // ---- users ----

    #[instrument(skip(self, bio))]
    pub async fn create_user(&self, username: &str, bio: Option<String>) -> DomainResult<User> {
        User::validate_username(username)?;
        self.community.create_user(username, bio).await
    }

    pub async fn user(&self, username: &str) -> DomainResult<User> {
        self.community
            .get_user(username)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(username.to_string()))
    }

    /// Remove an account; reviews stay, attributed to no one
    #[instrument(skip(self))]
    pub async fn delete_user(&self, username: &str) -> DomainResult<()> {
        if !self.community.delete_user(username).await? {
            return Err(DomainError::UserNotFound(username.to_string()));
        }
        info!(username, "User deleted");
        Ok(())
    }

    // ---- catalog ----

    /// Load the demonstration catalog; `reset` wipes the catalog first
    #[instrument(skip(self))]
    pub async fn seed(&self, reset: bool) -> DomainResult<ImportReport> {
        let timer = OperationTimer::new("catalog_seed");
        if reset {
            let removed = self.catalog.clear().await?;
            warn!(removed, "Catalog reset before seeding");
        }
        let result = self.catalog.upsert(seed_catalog()).await;
        timer.finish_with_result(&result);
        result
    }

    /// Import a JSON array of flat component objects into `category`
    ///
    /// Entries without a name are skipped, malformed entries are reported
    /// in `ImportReport::failed` and the rest is still imported.
    #[instrument(skip(self, document))]
    pub async fn import_json(
        &self,
        category: ComponentCategory,
        document: &str,
    ) -> DomainResult<ImportReport> {
        let mut timer = OperationTimer::new("catalog_import");
        timer.add_field("category", category.as_str());

        let value: Value = serde_json::from_str(document)
            .map_err(|e| DomainError::InvalidImport(e.to_string()))?;
        let (components, mut report) = parse_import(category, value)?;

        let result = self.catalog.upsert(components).await;
        timer.finish_with_result(&result);
        report.merge(result?);

        info!(
            category = %category,
            created = report.created,
            updated = report.updated,
            skipped = report.skipped,
            failed = report.failed.len(),
            "Catalog import finished"
        );
        Ok(report)
    }

    pub async fn import_file(
        &self,
        category: ComponentCategory,
        path: &Path,
    ) -> Result<ImportReport> {
        let document = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(self.import_json(category, &document).await?)
    }

    pub async fn list_components(&self, query: &CatalogQuery) -> DomainResult<Vec<Component>> {
        self.catalog.list(query).await
    }

    pub async fn component(&self, id: ComponentId) -> DomainResult<Component> {
        self.catalog
            .get(id)
            .await?
            .ok_or(DomainError::ComponentNotFound(id))
    }

    pub async fn component_reviews(&self, id: ComponentId) -> DomainResult<ReviewSummary> {
        let component = self.component(id).await?;
        let reviews = self.community.reviews_for(id).await?;
        Ok(ReviewSummary { component, reviews })
    }

    // ---- builds ----

    #[instrument(skip(self, build), fields(owner = %build.owner))]
    pub async fn create_build(&self, build: NewBuild) -> DomainResult<Build> {
        build.validate()?;
        self.builds.create(build).await
    }

    /// Builds of `owner`, newest first
    pub async fn builds_for(&self, owner: &str) -> DomainResult<Vec<Build>> {
        self.user(owner).await?;
        self.builds.list_for_owner(owner).await
    }

    async fn owned_build(&self, user: &str, id: BuildId) -> DomainResult<Build> {
        let build = self
            .builds
            .get(id)
            .await?
            .ok_or(DomainError::BuildNotFound(id))?;
        if build.owner != user {
            return Err(DomainError::NotOwner {
                user: user.to_string(),
                resource: format!("build {id}"),
            });
        }
        Ok(build)
    }

    pub async fn update_build(
        &self,
        user: &str,
        id: BuildId,
        update: BuildUpdate,
    ) -> DomainResult<Build> {
        update.validate()?;
        self.owned_build(user, id).await?;
        self.builds.update(id, update).await
    }

    #[instrument(skip(self))]
    pub async fn delete_build(&self, user: &str, id: BuildId) -> DomainResult<()> {
        self.owned_build(user, id).await?;
        if !self.builds.delete(id).await? {
            return Err(DomainError::BuildNotFound(id));
        }
        Ok(())
    }

    /// Everything the build page shows: scaffold, advisor output and total
    #[instrument(skip(self))]
    pub async fn build_summary(&self, user: &str, id: BuildId) -> DomainResult<BuildSummary> {
        let timer = OperationTimer::new("build_summary");
        let build = self.owned_build(user, id).await?;
        let items = self.builds.items(id).await;
        timer.finish_with_result(&items);
        Ok(BuildSummary::assemble(build, items?))
    }

    #[instrument(skip(self))]
    pub async fn add_component(
        &self,
        user: &str,
        build_id: BuildId,
        component_id: ComponentId,
    ) -> DomainResult<AllocationOutcome> {
        let mut timer = OperationTimer::new("add_component");
        timer.add_field("build_id", build_id);
        timer.add_field("component_id", component_id);

        self.owned_build(user, build_id).await?;
        let result = self.builds.add_component(build_id, component_id).await;
        timer.finish_with_result(&result);

        match &result {
            Ok(AllocationOutcome::CapacityReached { capacity }) => {
                info!(build_id, component_id, capacity, "Slots full, component not added");
            }
            Ok(AllocationOutcome::Swapped { replaced, trimmed_ram }) if !trimmed_ram.is_empty() => {
                info!(build_id, ?replaced, ?trimmed_ram, "Motherboard swap removed RAM");
            }
            Ok(outcome) => debug!(build_id, ?outcome, "Component added"),
            Err(_) => {}
        }
        result
    }

    #[instrument(skip(self))]
    pub async fn remove_component(
        &self,
        user: &str,
        build_id: BuildId,
        component_id: ComponentId,
    ) -> DomainResult<RemovalOutcome> {
        self.owned_build(user, build_id).await?;
        self.builds.remove_component(build_id, component_id).await
    }

    /// Catalog parts that can still go into the build, sorted by name
    pub async fn available_components(
        &self,
        user: &str,
        build_id: BuildId,
        search: Option<String>,
    ) -> DomainResult<Vec<Component>> {
        self.owned_build(user, build_id).await?;
        let mut query = CatalogQuery::default().sorted_by(SortOrder::Name);
        if let Some(term) = search {
            query = query.with_search(term);
        }
        self.catalog.available_for(build_id, &query).await
    }

    // ---- reviews & wishlist ----

    #[instrument(skip(self, text))]
    pub async fn post_review(
        &self,
        user: &str,
        component_id: ComponentId,
        stars: u8,
        text: &str,
    ) -> DomainResult<Review> {
        let rating = Rating::new(stars)?;
        validate_name("review text", text, MAX_REVIEW_LEN)?;
        self.community
            .post_review(user, component_id, rating, text.trim())
            .await
    }

    /// Returns false when the component was already on the wishlist
    pub async fn wishlist_add(&self, user: &str, component_id: ComponentId) -> DomainResult<bool> {
        self.community.wishlist_add(user, component_id).await
    }

    pub async fn wishlist_remove(
        &self,
        user: &str,
        component_id: ComponentId,
    ) -> DomainResult<bool> {
        self.user(user).await?;
        self.community.wishlist_remove(user, component_id).await
    }

    pub async fn wishlist(&self, user: &str) -> DomainResult<Vec<WishlistItem>> {
        self.community.wishlist(user).await
    }

    // ---- marketplace ----

    #[instrument(skip(self, listing), fields(seller = %listing.seller))]
    pub async fn post_listing(&self, listing: NewListing) -> DomainResult<Listing> {
        listing.validate()?;
        self.market.create_listing(listing).await
    }

    pub async fn listings(&self) -> DomainResult<Vec<Listing>> {
        self.market.available_listings().await
    }

    pub async fn listing(&self, id: ListingId) -> DomainResult<ListingDetail> {
        self.market
            .get_listing(id)
            .await?
            .ok_or(DomainError::ListingNotFound(id))
    }

    /// Only the seller may close a listing
    #[instrument(skip(self))]
    pub async fn mark_sold(&self, user: &str, id: ListingId) -> DomainResult<Listing> {
        let detail = self.listing(id).await?;
        if detail.listing.seller != user {
            return Err(DomainError::NotOwner {
                user: user.to_string(),
                resource: format!("listing {id}"),
            });
        }
        self.market.mark_sold(id).await
    }

    pub async fn comment(&self, user: &str, id: ListingId, text: &str) -> DomainResult<Comment> {
        validate_name("comment", text, MAX_COMMENT_LEN)?;
        self.market.comment(id, user, text.trim()).await
    }
}

/// Turn an import document into components plus the skip/failure tally
fn parse_import(
    category: ComponentCategory,
    document: Value,
) -> DomainResult<(Vec<NewComponent>, ImportReport)> {
    let Value::Array(entries) = document else {
        return Err(DomainError::InvalidImport(
            "expected a JSON array of components".to_string(),
        ));
    };

    let mut report = ImportReport::default();
    let mut components = Vec::with_capacity(entries.len());

    for (index, entry) in entries.into_iter().enumerate() {
        let Value::Object(mut fields) = entry else {
            report
                .failed
                .push((format!("#{index}"), "entry is not an object".to_string()));
            continue;
        };

        let name = fields
            .get("name")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string);
        let Some(name) = name else {
            warn!(index, "Skipping import entry without a name");
            report.skipped += 1;
            continue;
        };

        // The command decides the category, not the file
        fields.insert("category".to_string(), Value::from(category.as_str()));

        match serde_json::from_value::<NewComponent>(Value::Object(fields)) {
            Ok(mut component) => {
                component.name = name;
                components.push(component);
            }
            Err(e) => {
                warn!(index, name = %name, error = %e, "Rejected import entry");
                report.failed.push((name, e.to_string()));
            }
        }
    }

    Ok((components, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_import_skips_and_reports() {
        let document = json!([
            {"name": "Ryzen 5 7600", "manufacturer": "AMD", "price": "229.00",
             "core_count": 6, "clock_speed": 3.8, "socket": "AM5",
             "tdp": 65, "performance_tier": "Mid"},
            {"manufacturer": "Intel", "core_count": 6},
            {"name": "   ", "manufacturer": "Intel"},
            {"name": "Broken", "manufacturer": "AMD", "core_count": "six"},
            42
        ]);

        let (components, report) = parse_import(ComponentCategory::Cpu, document).unwrap();

        assert_eq!(components.len(), 1);
        assert_eq!(components[0].name, "Ryzen 5 7600");
        assert_eq!(components[0].category(), ComponentCategory::Cpu);
        assert_eq!(report.skipped, 2);
        assert_eq!(report.failed.len(), 2);
        assert_eq!(report.failed[0].0, "Broken");
        assert_eq!(report.failed[1].0, "#4");
    }

    #[test]
    fn test_parse_import_category_comes_from_caller() {
        let document = json!([
            {"name": "Vengeance 32GB", "manufacturer": "Corsair", "category": "gpu",
             "capacity_gb": 32, "speed_mhz": 6000}
        ]);

        let (components, report) = parse_import(ComponentCategory::Ram, document).unwrap();

        assert!(report.failed.is_empty());
        assert_eq!(components[0].category(), ComponentCategory::Ram);
    }

    #[test]
    fn test_parse_import_rejects_non_array() {
        let err = parse_import(ComponentCategory::Psu, json!({"name": "x"})).unwrap_err();
        assert!(matches!(err, DomainError::InvalidImport(_)));
    }
}
