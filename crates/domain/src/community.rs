//! Users, reviews, wishlists and marketplace listings

use crate::catalog::{Component, ComponentId};
use crate::errors::{validate_name, DomainError, DomainResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type ListingId = i64;

pub const MAX_USERNAME_LEN: usize = 150;
pub const MAX_LISTING_TITLE_LEN: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub bio: Option<String>,
    pub joined_at: DateTime<Utc>,
}

impl User {
    pub fn validate_username(username: &str) -> DomainResult<()> {
        validate_name("username", username, MAX_USERNAME_LEN)?;
        if username.chars().any(char::is_whitespace) {
            return Err(DomainError::InvalidName {
                field: "username",
                reason: "must not contain whitespace".to_string(),
            });
        }
        Ok(())
    }
}

/// Star rating, 1..=5
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub fn new(stars: u8) -> DomainResult<Self> {
        if (1..=5).contains(&stars) {
            Ok(Self(stars))
        } else {
            Err(DomainError::InvalidRating(stars))
        }
    }

    pub fn stars(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Rating::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 1 {
            write!(f, "1 Star")
        } else {
            write!(f, "{} Stars", self.0)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    pub component_id: ComponentId,
    /// `None` once the author's account is deleted
    pub author: Option<String>,
    pub rating: Rating,
    pub text: String,
    pub posted_at: DateTime<Utc>,
}

impl Review {
    pub fn author_label(&self) -> &str {
        self.author.as_deref().unwrap_or("Deleted User")
    }
}

/// Reviews of one component, newest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewSummary {
    pub component: Component,
    pub reviews: Vec<Review>,
}

impl ReviewSummary {
    pub fn average_rating(&self) -> Option<f64> {
        if self.reviews.is_empty() {
            return None;
        }
        let total: u32 = self
            .reviews
            .iter()
            .map(|r| u32::from(r.rating.stars()))
            .sum();
        Some(f64::from(total) / self.reviews.len() as f64)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WishlistItem {
    pub component: Component,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListingStatus {
    Available,
    Sold,
}

impl ListingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::Available => "Available",
            ListingStatus::Sold => "Sold",
        }
    }
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListingStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Available" => Ok(ListingStatus::Available),
            "Sold" => Ok(ListingStatus::Sold),
            other => Err(DomainError::Storage(format!(
                "unknown listing status '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewListing {
    pub seller: String,
    pub title: String,
    pub description: String,
}

impl NewListing {
    pub fn validate(&self) -> DomainResult<()> {
        validate_name("listing title", &self.title, MAX_LISTING_TITLE_LEN)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub id: ListingId,
    pub seller: String,
    pub title: String,
    pub description: String,
    pub status: ListingStatus,
    pub listed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub listing_id: ListingId,
    pub author: String,
    pub text: String,
    pub posted_at: DateTime<Utc>,
}

/// Listing with its comments, oldest comment first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingDetail {
    pub listing: Listing,
    pub comments: Vec<Comment>,
}
