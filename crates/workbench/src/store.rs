use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{
    AllocationOutcome, Build, BuildId, BuildItem, BuildRepository, BuildUpdate, CatalogQuery,
    CatalogRepository, Comment, CommunityRepository, Component, ComponentCategory, ComponentId,
    ComponentSpec, DomainError, DomainResult, ImportReport, Listing, ListingDetail, ListingId,
    ListingStatus, MarketplaceRepository, NewBuild, NewComponent, NewListing, PerformanceTier,
    Rating, RemovalOutcome, Review, SlotAllocator, User, WishlistItem,
};
use domain::config::DatabaseConfig;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument};

type DbPool = Pool<SqliteConnectionManager>;

const COMPONENT_COLUMNS: &str =
    "c.id, c.name, c.manufacturer, c.price, c.tdp, c.performance_tier, c.spec";

/// SQLite-backed storage for the catalog, builds and community data
#[derive(Clone)]
pub struct SqliteStore {
    pool: Arc<DbPool>,
}

impl SqliteStore {
    /// Open (or create) the database and apply the schema
    pub fn open(config: &DatabaseConfig) -> Result<Self> {
        let busy_timeout = Duration::from_millis(config.busy_timeout_ms);
        let manager = SqliteConnectionManager::file(&config.path).with_init(move |conn| {
            conn.execute_batch("PRAGMA foreign_keys = ON;")?;
            conn.busy_timeout(busy_timeout)
        });
        let pool = Pool::builder()
            .max_size(config.pool_size)
            .build(manager)
            .context("Failed to create connection pool")?;

        {
            let conn = pool.get()?;
            Self::init_schema(&conn)?;
        }

        info!(path = %config.path.display(), pool_size = config.pool_size, "Store opened");
        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        // journal_mode returns a row, so it cannot go through execute_batch
        conn.query_row("PRAGMA journal_mode = WAL", [], |_| Ok(()))
            .context("Failed to enable WAL")?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                username TEXT PRIMARY KEY,
                bio TEXT,
                joined_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS components (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                category TEXT NOT NULL,
                name TEXT NOT NULL,
                manufacturer TEXT NOT NULL,
                price TEXT,
                tdp INTEGER,
                performance_tier TEXT,
                spec TEXT NOT NULL,
                UNIQUE (category, name)
            );

            CREATE TABLE IF NOT EXISTS builds (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                owner TEXT NOT NULL REFERENCES users(username) ON DELETE CASCADE,
                name TEXT NOT NULL,
                description TEXT,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS build_items (
                build_id INTEGER NOT NULL REFERENCES builds(id) ON DELETE CASCADE,
                component_id INTEGER NOT NULL REFERENCES components(id) ON DELETE CASCADE,
                quantity INTEGER NOT NULL CHECK (quantity >= 1),
                seq INTEGER NOT NULL,
                PRIMARY KEY (build_id, component_id)
            );

            -- reviews outlive their author
            CREATE TABLE IF NOT EXISTS reviews (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                component_id INTEGER NOT NULL REFERENCES components(id) ON DELETE CASCADE,
                author TEXT REFERENCES users(username) ON DELETE SET NULL,
                rating INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5),
                text TEXT NOT NULL,
                posted_at TEXT NOT NULL,
                UNIQUE (author, component_id)
            );

            CREATE TABLE IF NOT EXISTS wishlist (
                username TEXT NOT NULL REFERENCES users(username) ON DELETE CASCADE,
                component_id INTEGER NOT NULL REFERENCES components(id) ON DELETE CASCADE,
                added_at TEXT NOT NULL,
                PRIMARY KEY (username, component_id)
            );

            CREATE TABLE IF NOT EXISTS listings (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                seller TEXT NOT NULL REFERENCES users(username) ON DELETE CASCADE,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'Available',
                listed_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS comments (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                listing_id INTEGER NOT NULL REFERENCES listings(id) ON DELETE CASCADE,
                author TEXT NOT NULL REFERENCES users(username) ON DELETE CASCADE,
                text TEXT NOT NULL,
                posted_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_components_category ON components(category);
            CREATE INDEX IF NOT EXISTS idx_builds_owner ON builds(owner);
            CREATE INDEX IF NOT EXISTS idx_reviews_component ON reviews(component_id);
            CREATE INDEX IF NOT EXISTS idx_listings_status ON listings(status);
            CREATE INDEX IF NOT EXISTS idx_comments_listing ON comments(listing_id);

            PRAGMA synchronous = NORMAL;
            "#,
        )?;

        Ok(())
    }

    /// Run blocking SQLite work on the blocking pool
    async fn with_conn<T, F>(&self, f: F) -> DomainResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
    {
        let pool = Arc::clone(&self.pool);
        tokio::task::spawn_blocking(move || {
            let mut conn = pool
                .get()
                .context("Failed to get connection from pool")?;
            f(&mut conn)
        })
        .await
        .map_err(DomainError::storage)?
        .map_err(DomainError::from)
    }

    fn require_user(conn: &Connection, username: &str) -> Result<()> {
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = ?1)",
            params![username],
            |row| row.get(0),
        )?;
        if !exists {
            return Err(DomainError::UserNotFound(username.to_string()).into());
        }
        Ok(())
    }

    fn require_build(conn: &Connection, id: BuildId) -> Result<Build> {
        Self::load_build(conn, id)?.ok_or_else(|| DomainError::BuildNotFound(id).into())
    }

    fn load_build(conn: &Connection, id: BuildId) -> Result<Option<Build>> {
        let build = conn
            .query_row(
                "SELECT id, owner, name, description, created_at FROM builds WHERE id = ?1",
                params![id],
                Self::parse_build_row,
            )
            .optional()?;
        Ok(build)
    }

    fn load_component(conn: &Connection, id: ComponentId) -> Result<Option<Component>> {
        let raw = conn
            .query_row(
                &format!("SELECT {COMPONENT_COLUMNS} FROM components c WHERE c.id = ?1"),
                params![id],
                |row| RawComponent::from_row(row, 0),
            )
            .optional()?;
        raw.map(RawComponent::into_component).transpose()
    }

    fn require_component(conn: &Connection, id: ComponentId) -> Result<Component> {
        Self::load_component(conn, id)?.ok_or_else(|| DomainError::ComponentNotFound(id).into())
    }

    fn load_items(conn: &Connection, build_id: BuildId) -> Result<Vec<BuildItem>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT bi.quantity, bi.seq, {COMPONENT_COLUMNS}
             FROM build_items bi
             JOIN components c ON c.id = bi.component_id
             WHERE bi.build_id = ?1
             ORDER BY bi.seq"
        ))?;

        let rows = stmt
            .query_map(params![build_id], |row| {
                let quantity: u32 = row.get(0)?;
                let seq: i64 = row.get(1)?;
                Ok((quantity, seq, RawComponent::from_row(row, 2)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(|(quantity, seq, raw)| {
                Ok(BuildItem {
                    component: raw.into_component()?,
                    quantity,
                    seq: seq as u64,
                })
            })
            .collect()
    }

    /// Write the difference between two item sets of one build
    fn sync_items(
        tx: &Transaction<'_>,
        build_id: BuildId,
        before: &[BuildItem],
        after: &[BuildItem],
    ) -> Result<()> {
        let previous: HashMap<ComponentId, (u32, u64)> = before
            .iter()
            .map(|item| (item.component.id, (item.quantity, item.seq)))
            .collect();
        let current: HashSet<ComponentId> = after.iter().map(|item| item.component.id).collect();

        for id in previous.keys().filter(|id| !current.contains(*id)) {
            tx.execute(
                "DELETE FROM build_items WHERE build_id = ?1 AND component_id = ?2",
                params![build_id, id],
            )?;
        }

        let mut upsert = tx.prepare(
            "INSERT INTO build_items (build_id, component_id, quantity, seq)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(build_id, component_id)
             DO UPDATE SET quantity = excluded.quantity, seq = excluded.seq",
        )?;
        for item in after {
            if previous.get(&item.component.id) != Some(&(item.quantity, item.seq)) {
                upsert.execute(params![
                    build_id,
                    item.component.id,
                    item.quantity,
                    item.seq as i64
                ])?;
            }
        }

        Ok(())
    }

    fn parse_build_row(row: &Row) -> rusqlite::Result<Build> {
        Ok(Build {
            id: row.get(0)?,
            owner: row.get(1)?,
            name: row.get(2)?,
            description: row.get(3)?,
            created_at: row.get(4)?,
        })
    }

    fn parse_listing_row(row: &Row) -> rusqlite::Result<(Listing, String)> {
        let status: String = row.get(4)?;
        Ok((
            Listing {
                id: row.get(0)?,
                seller: row.get(1)?,
                title: row.get(2)?,
                description: row.get(3)?,
                status: ListingStatus::Available,
                listed_at: row.get(5)?,
            },
            status,
        ))
    }

    fn finish_listing((mut listing, status): (Listing, String)) -> Result<Listing> {
        listing.status = ListingStatus::from_str(&status)?;
        Ok(listing)
    }

    fn load_listing(conn: &Connection, id: ListingId) -> Result<Option<Listing>> {
        conn.query_row(
            "SELECT id, seller, title, description, status, listed_at
             FROM listings WHERE id = ?1",
            params![id],
            Self::parse_listing_row,
        )
        .optional()?
        .map(Self::finish_listing)
        .transpose()
    }

    fn load_components(conn: &Connection, category: Option<ComponentCategory>) -> Result<Vec<Component>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {COMPONENT_COLUMNS} FROM components c
             WHERE ?1 IS NULL OR c.category = ?1"
        ))?;
        let raw = stmt
            .query_map(params![category.map(|c| c.as_str())], |row| {
                RawComponent::from_row(row, 0)
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        raw.into_iter().map(RawComponent::into_component).collect()
    }
}

/// Component columns as stored, before decoding
struct RawComponent {
    id: ComponentId,
    name: String,
    manufacturer: String,
    price: Option<String>,
    tdp: Option<u32>,
    performance_tier: Option<String>,
    spec: String,
}

impl RawComponent {
    fn from_row(row: &Row, offset: usize) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(offset)?,
            name: row.get(offset + 1)?,
            manufacturer: row.get(offset + 2)?,
            price: row.get(offset + 3)?,
            tdp: row.get(offset + 4)?,
            performance_tier: row.get(offset + 5)?,
            spec: row.get(offset + 6)?,
        })
    }

    fn into_component(self) -> Result<Component> {
        let price = self
            .price
            .map(|p| Decimal::from_str(&p))
            .transpose()
            .with_context(|| format!("Invalid price stored for component {}", self.id))?;
        let performance_tier = self
            .performance_tier
            .map(|t| PerformanceTier::from_str(&t))
            .transpose()?;
        let spec: ComponentSpec = serde_json::from_str(&self.spec)
            .with_context(|| format!("Invalid spec stored for component {}", self.id))?;

        Ok(Component {
            id: self.id,
            name: self.name,
            manufacturer: self.manufacturer,
            price,
            tdp: self.tdp,
            performance_tier,
            spec,
        })
    }
}

#[async_trait]
impl CatalogRepository for SqliteStore {
    #[instrument(skip(self, components), fields(count = components.len()))]
    async fn upsert(&self, components: Vec<NewComponent>) -> DomainResult<ImportReport> {
        self.with_conn(move |conn| {
            let tx = conn.transaction()?;
            let mut report = ImportReport::default();
            {
                let mut find = tx.prepare(
                    "SELECT id FROM components WHERE category = ?1 AND name = ?2",
                )?;
                let mut insert = tx.prepare(
                    "INSERT INTO components
                     (category, name, manufacturer, price, tdp, performance_tier, spec)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                )?;
                let mut update = tx.prepare(
                    "UPDATE components
                     SET manufacturer = ?2, price = ?3, tdp = ?4, performance_tier = ?5, spec = ?6
                     WHERE id = ?1",
                )?;

                for component in components {
                    let category = component.category().as_str();
                    let price = component.price.map(|p| p.to_string());
                    let tier = component.performance_tier.map(|t| t.as_str());
                    let spec = serde_json::to_string(&component.spec)?;

                    let existing: Option<ComponentId> = find
                        .query_row(params![category, component.name], |row| row.get(0))
                        .optional()?;

                    match existing {
                        Some(id) => {
                            update.execute(params![
                                id,
                                component.manufacturer,
                                price,
                                component.tdp,
                                tier,
                                spec
                            ])?;
                            report.updated += 1;
                        }
                        None => {
                            insert.execute(params![
                                category,
                                component.name,
                                component.manufacturer,
                                price,
                                component.tdp,
                                tier,
                                spec
                            ])?;
                            report.created += 1;
                        }
                    }
                }
            }
            tx.commit()?;

            debug!(created = report.created, updated = report.updated, "Catalog upserted");
            Ok(report)
        })
        .await
    }

    async fn get(&self, id: ComponentId) -> DomainResult<Option<Component>> {
        self.with_conn(move |conn| Self::load_component(conn, id)).await
    }

    #[instrument(skip(self))]
    async fn list(&self, query: &CatalogQuery) -> DomainResult<Vec<Component>> {
        let query = query.clone();
        self.with_conn(move |conn| {
            let components = Self::load_components(conn, query.category)?;
            Ok(query.apply(components))
        })
        .await
    }

    #[instrument(skip(self))]
    async fn available_for(
        &self,
        build_id: BuildId,
        query: &CatalogQuery,
    ) -> DomainResult<Vec<Component>> {
        let query = query.clone();
        self.with_conn(move |conn| {
            Self::require_build(conn, build_id)?;
            let installed: HashSet<ComponentId> = Self::load_items(conn, build_id)?
                .into_iter()
                .filter(|item| item.category().is_unique())
                .map(|item| item.component.id)
                .collect();

            let components = Self::load_components(conn, query.category)?
                .into_iter()
                .filter(|c| !installed.contains(&c.id))
                .collect();
            Ok(query.apply(components))
        })
        .await
    }

    async fn count(&self, category: Option<ComponentCategory>) -> DomainResult<usize> {
        self.with_conn(move |conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM components WHERE ?1 IS NULL OR category = ?1",
                params![category.map(|c| c.as_str())],
                |row| row.get(0),
            )?;
            Ok(count as usize)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn clear(&self) -> DomainResult<usize> {
        self.with_conn(|conn| {
            let removed = conn.execute("DELETE FROM components", [])?;
            info!(removed, "Catalog cleared");
            Ok(removed)
        })
        .await
    }
}

#[async_trait]
impl BuildRepository for SqliteStore {
    #[instrument(skip(self, build), fields(owner = %build.owner))]
    async fn create(&self, build: NewBuild) -> DomainResult<Build> {
        self.with_conn(move |conn| {
            Self::require_user(conn, &build.owner)?;
            let created_at = Utc::now();
            conn.execute(
                "INSERT INTO builds (owner, name, description, created_at) VALUES (?1, ?2, ?3, ?4)",
                params![build.owner, build.name, build.description, created_at],
            )?;
            let id = conn.last_insert_rowid();
            debug!(build_id = id, "Build created");

            Ok(Build {
                id,
                owner: build.owner,
                name: build.name,
                description: build.description,
                created_at,
            })
        })
        .await
    }

    async fn get(&self, id: BuildId) -> DomainResult<Option<Build>> {
        self.with_conn(move |conn| Self::load_build(conn, id)).await
    }

    async fn list_for_owner(&self, owner: &str) -> DomainResult<Vec<Build>> {
        let owner = owner.to_string();
        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, owner, name, description, created_at
                 FROM builds WHERE owner = ?1 ORDER BY id DESC",
            )?;
            let builds = stmt
                .query_map(params![owner], Self::parse_build_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(builds)
        })
        .await
    }

    #[instrument(skip(self, update))]
    async fn update(&self, id: BuildId, update: BuildUpdate) -> DomainResult<Build> {
        self.with_conn(move |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let mut build = Self::require_build(&tx, id)?;

            if let Some(name) = update.name {
                build.name = name;
            }
            if let Some(description) = update.description {
                build.description = description;
            }

            tx.execute(
                "UPDATE builds SET name = ?2, description = ?3 WHERE id = ?1",
                params![id, build.name, build.description],
            )?;
            tx.commit()?;
            Ok(build)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: BuildId) -> DomainResult<bool> {
        self.with_conn(move |conn| {
            let removed = conn.execute("DELETE FROM builds WHERE id = ?1", params![id])?;
            Ok(removed > 0)
        })
        .await
    }

    async fn items(&self, id: BuildId) -> DomainResult<Vec<BuildItem>> {
        self.with_conn(move |conn| {
            Self::require_build(conn, id)?;
            Self::load_items(conn, id)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn add_component(
        &self,
        id: BuildId,
        component_id: ComponentId,
    ) -> DomainResult<AllocationOutcome> {
        self.with_conn(move |conn| {
            // Write lock is taken before the snapshot read
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            Self::require_build(&tx, id)?;
            let component = Self::require_component(&tx, component_id)?;

            let before = Self::load_items(&tx, id)?;
            let mut after = before.clone();
            let outcome = SlotAllocator::add(&mut after, component);

            if outcome.changed() {
                Self::sync_items(&tx, id, &before, &after)?;
            }
            tx.commit()?;

            debug!(build_id = id, component_id, ?outcome, "Allocation applied");
            Ok(outcome)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn remove_component(
        &self,
        id: BuildId,
        component_id: ComponentId,
    ) -> DomainResult<RemovalOutcome> {
        self.with_conn(move |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            Self::require_build(&tx, id)?;

            let before = Self::load_items(&tx, id)?;
            let mut after = before.clone();
            let outcome = SlotAllocator::remove(&mut after, component_id);

            if outcome != RemovalOutcome::NotPresent {
                Self::sync_items(&tx, id, &before, &after)?;
            }
            tx.commit()?;
            Ok(outcome)
        })
        .await
    }
}

#[async_trait]
impl CommunityRepository for SqliteStore {
    #[instrument(skip(self, bio))]
    async fn create_user(&self, username: &str, bio: Option<String>) -> DomainResult<User> {
        let username = username.to_string();
        self.with_conn(move |conn| {
            let joined_at = Utc::now();
            let inserted = conn.execute(
                "INSERT INTO users (username, bio, joined_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(username) DO NOTHING",
                params![username, bio, joined_at],
            )?;
            if inserted == 0 {
                return Err(DomainError::UserExists(username).into());
            }
            Ok(User {
                username,
                bio,
                joined_at,
            })
        })
        .await
    }

    async fn get_user(&self, username: &str) -> DomainResult<Option<User>> {
        let username = username.to_string();
        self.with_conn(move |conn| {
            let user = conn
                .query_row(
                    "SELECT username, bio, joined_at FROM users WHERE username = ?1",
                    params![username],
                    |row| {
                        Ok(User {
                            username: row.get(0)?,
                            bio: row.get(1)?,
                            joined_at: row.get(2)?,
                        })
                    },
                )
                .optional()?;
            Ok(user)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn delete_user(&self, username: &str) -> DomainResult<bool> {
        let username = username.to_string();
        self.with_conn(move |conn| {
            let removed = conn.execute("DELETE FROM users WHERE username = ?1", params![username])?;
            Ok(removed > 0)
        })
        .await
    }

    #[instrument(skip(self, text))]
    async fn post_review(
        &self,
        author: &str,
        component_id: ComponentId,
        rating: Rating,
        text: &str,
    ) -> DomainResult<Review> {
        let author = author.to_string();
        let text = text.to_string();
        self.with_conn(move |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            Self::require_user(&tx, &author)?;
            Self::require_component(&tx, component_id)?;

            let duplicate: bool = tx.query_row(
                "SELECT EXISTS(SELECT 1 FROM reviews WHERE author = ?1 AND component_id = ?2)",
                params![author, component_id],
                |row| row.get(0),
            )?;
            if duplicate {
                return Err(DomainError::DuplicateReview {
                    user: author,
                    component: component_id,
                }
                .into());
            }

            let posted_at = Utc::now();
            tx.execute(
                "INSERT INTO reviews (component_id, author, rating, text, posted_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![component_id, author, rating.stars(), text, posted_at],
            )?;
            let id = tx.last_insert_rowid();
            tx.commit()?;

            Ok(Review {
                id,
                component_id,
                author: Some(author),
                rating,
                text,
                posted_at,
            })
        })
        .await
    }

    async fn reviews_for(&self, component_id: ComponentId) -> DomainResult<Vec<Review>> {
        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, component_id, author, rating, text, posted_at
                 FROM reviews WHERE component_id = ?1 ORDER BY id DESC",
            )?;
            let rows = stmt
                .query_map(params![component_id], |row| {
                    let stars: u8 = row.get(3)?;
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, ComponentId>(1)?,
                        row.get::<_, Option<String>>(2)?,
                        stars,
                        row.get::<_, String>(4)?,
                        row.get::<_, DateTime<Utc>>(5)?,
                    ))
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            rows.into_iter()
                .map(|(id, component_id, author, stars, text, posted_at)| {
                    Ok(Review {
                        id,
                        component_id,
                        author,
                        rating: Rating::new(stars)?,
                        text,
                        posted_at,
                    })
                })
                .collect()
        })
        .await
    }

    async fn wishlist_add(&self, username: &str, component_id: ComponentId) -> DomainResult<bool> {
        let username = username.to_string();
        self.with_conn(move |conn| {
            Self::require_user(conn, &username)?;
            Self::require_component(conn, component_id)?;
            let inserted = conn.execute(
                "INSERT OR IGNORE INTO wishlist (username, component_id, added_at)
                 VALUES (?1, ?2, ?3)",
                params![username, component_id, Utc::now()],
            )?;
            Ok(inserted > 0)
        })
        .await
    }

    async fn wishlist_remove(
        &self,
        username: &str,
        component_id: ComponentId,
    ) -> DomainResult<bool> {
        let username = username.to_string();
        self.with_conn(move |conn| {
            let removed = conn.execute(
                "DELETE FROM wishlist WHERE username = ?1 AND component_id = ?2",
                params![username, component_id],
            )?;
            Ok(removed > 0)
        })
        .await
    }

    async fn wishlist(&self, username: &str) -> DomainResult<Vec<WishlistItem>> {
        let username = username.to_string();
        self.with_conn(move |conn| {
            Self::require_user(conn, &username)?;
            let mut stmt = conn.prepare(&format!(
                "SELECT w.added_at, {COMPONENT_COLUMNS}
                 FROM wishlist w
                 JOIN components c ON c.id = w.component_id
                 WHERE w.username = ?1
                 ORDER BY w.added_at DESC, w.rowid DESC"
            ))?;
            let rows = stmt
                .query_map(params![username], |row| {
                    let added_at: DateTime<Utc> = row.get(0)?;
                    Ok((added_at, RawComponent::from_row(row, 1)?))
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            rows.into_iter()
                .map(|(added_at, raw)| {
                    Ok(WishlistItem {
                        component: raw.into_component()?,
                        added_at,
                    })
                })
                .collect()
        })
        .await
    }
}

#[async_trait]
impl MarketplaceRepository for SqliteStore {
    #[instrument(skip(self, listing), fields(seller = %listing.seller))]
    async fn create_listing(&self, listing: NewListing) -> DomainResult<Listing> {
        self.with_conn(move |conn| {
            Self::require_user(conn, &listing.seller)?;
            let listed_at = Utc::now();
            conn.execute(
                "INSERT INTO listings (seller, title, description, status, listed_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    listing.seller,
                    listing.title,
                    listing.description,
                    ListingStatus::Available.as_str(),
                    listed_at
                ],
            )?;

            Ok(Listing {
                id: conn.last_insert_rowid(),
                seller: listing.seller,
                title: listing.title,
                description: listing.description,
                status: ListingStatus::Available,
                listed_at,
            })
        })
        .await
    }

    async fn get_listing(&self, id: ListingId) -> DomainResult<Option<ListingDetail>> {
        self.with_conn(move |conn| {
            let Some(listing) = Self::load_listing(conn, id)? else {
                return Ok(None);
            };

            let mut stmt = conn.prepare(
                "SELECT id, listing_id, author, text, posted_at
                 FROM comments WHERE listing_id = ?1 ORDER BY id",
            )?;
            let comments = stmt
                .query_map(params![id], |row| {
                    Ok(Comment {
                        id: row.get(0)?,
                        listing_id: row.get(1)?,
                        author: row.get(2)?,
                        text: row.get(3)?,
                        posted_at: row.get(4)?,
                    })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            Ok(Some(ListingDetail { listing, comments }))
        })
        .await
    }

    async fn available_listings(&self) -> DomainResult<Vec<Listing>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, seller, title, description, status, listed_at
                 FROM listings WHERE status = ?1 ORDER BY id DESC",
            )?;
            let rows = stmt
                .query_map(
                    params![ListingStatus::Available.as_str()],
                    Self::parse_listing_row,
                )?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            rows.into_iter().map(Self::finish_listing).collect()
        })
        .await
    }

    #[instrument(skip(self))]
    async fn mark_sold(&self, id: ListingId) -> DomainResult<Listing> {
        self.with_conn(move |conn| {
            let updated = conn.execute(
                "UPDATE listings SET status = ?2 WHERE id = ?1",
                params![id, ListingStatus::Sold.as_str()],
            )?;
            if updated == 0 {
                return Err(DomainError::ListingNotFound(id).into());
            }
            Self::load_listing(conn, id)?.ok_or_else(|| DomainError::ListingNotFound(id).into())
        })
        .await
    }

    #[instrument(skip(self, text))]
    async fn comment(&self, id: ListingId, author: &str, text: &str) -> DomainResult<Comment> {
        let author = author.to_string();
        let text = text.to_string();
        self.with_conn(move |conn| {
            Self::require_user(conn, &author)?;
            if Self::load_listing(conn, id)?.is_none() {
                return Err(DomainError::ListingNotFound(id).into());
            }

            let posted_at = Utc::now();
            conn.execute(
                "INSERT INTO comments (listing_id, author, text, posted_at) VALUES (?1, ?2, ?3, ?4)",
                params![id, author, text, posted_at],
            )?;

            Ok(Comment {
                id: conn.last_insert_rowid(),
                listing_id: id,
                author,
                text,
                posted_at,
            })
        })
        .await
    }
}
