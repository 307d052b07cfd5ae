//! Domain Layer - BuildForge business logic
//!
//! Contains ONLY pure business logic without dependencies on:
//! - Infrastructure (databases, file systems)
//! - Frameworks (CLI, rendering)
//!
//! Layout:
//! - catalog: hardware components and their category-specific specs
//! - build: builds, slot allocation rules, scaffold projection
//! - advisor: bottleneck detection and PSU sizing
//! - community: users, reviews, wishlists, marketplace listings
//! - repositories: persistence contracts implemented by `workbench`

pub mod advisor;
pub mod build;
pub mod catalog;
pub mod community;
pub mod config;
pub mod errors;
pub mod repositories;

pub use advisor::{detect_bottleneck, recommend_psu, Bottleneck, BottleneckLevel, PsuRecommendation};
pub use build::{
    AllocationOutcome, Build, BuildId, BuildItem, BuildSummary, BuildUpdate, NewBuild,
    RemovalOutcome, Scaffold, SlotAllocator,
};
pub use catalog::{
    CatalogQuery, Component, ComponentCategory, ComponentId, ComponentSpec, FormFactor,
    ImportReport, NewComponent, PerformanceTier, PsuEfficiency, SlotCategory, SortOrder,
    StorageType,
};
pub use community::{
    Comment, Listing, ListingDetail, ListingId, ListingStatus, NewListing, Rating, Review,
    ReviewSummary, User, WishlistItem,
};
pub use config::BuildForgeConfig;
pub use errors::{DomainError, DomainResult, ErrorCategory};
pub use repositories::{
    BuildRepository, CatalogRepository, CommunityRepository, MarketplaceRepository,
};
