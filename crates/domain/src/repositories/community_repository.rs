use crate::catalog::ComponentId;
use crate::community::{
    Comment, Listing, ListingDetail, ListingId, NewListing, Rating, Review, User, WishlistItem,
};
use crate::errors::DomainResult;
use async_trait::async_trait;

/// Users, reviews and wishlists
#[async_trait]
pub trait CommunityRepository: Send + Sync {
    async fn create_user(&self, username: &str, bio: Option<String>) -> DomainResult<User>;

    async fn get_user(&self, username: &str) -> DomainResult<Option<User>>;

    /// Deletes the account with its builds, wishlist, listings and comments;
    /// reviews stay with the author cleared
    async fn delete_user(&self, username: &str) -> DomainResult<bool>;

    async fn post_review(
        &self,
        author: &str,
        component_id: ComponentId,
        rating: Rating,
        text: &str,
    ) -> DomainResult<Review>;

    /// Newest first
    async fn reviews_for(&self, component_id: ComponentId) -> DomainResult<Vec<Review>>;

    /// Returns false when the item was already present
    async fn wishlist_add(&self, username: &str, component_id: ComponentId) -> DomainResult<bool>;

    async fn wishlist_remove(&self, username: &str, component_id: ComponentId)
        -> DomainResult<bool>;

    /// Newest first
    async fn wishlist(&self, username: &str) -> DomainResult<Vec<WishlistItem>>;
}

/// Marketplace listings and their comments
#[async_trait]
pub trait MarketplaceRepository: Send + Sync {
    async fn create_listing(&self, listing: NewListing) -> DomainResult<Listing>;

    async fn get_listing(&self, id: ListingId) -> DomainResult<Option<ListingDetail>>;

    /// Available listings, newest first
    async fn available_listings(&self) -> DomainResult<Vec<Listing>>;

    async fn mark_sold(&self, id: ListingId) -> DomainResult<Listing>;

    async fn comment(&self, id: ListingId, author: &str, text: &str) -> DomainResult<Comment>;
}
