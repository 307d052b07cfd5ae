//! Repository abstractions
//!
//! Domain defines the interfaces, `workbench` provides the SQLite
//! implementation.

mod build_repository;
mod catalog_repository;
mod community_repository;

pub use build_repository::BuildRepository;
pub use catalog_repository::CatalogRepository;
pub use community_repository::{CommunityRepository, MarketplaceRepository};
