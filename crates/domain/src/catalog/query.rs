use super::{Component, ComponentCategory};
use crate::errors::DomainError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

/// Ordering of catalog listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    Name,
    PriceAsc,
    PriceDesc,
}

impl FromStr for SortOrder {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(SortOrder::Name),
            "price_asc" | "price" => Ok(SortOrder::PriceAsc),
            "price_desc" => Ok(SortOrder::PriceDesc),
            other => Err(DomainError::InvalidValue {
                field: "sort order",
                value: other.to_string(),
                expected: "name, price_asc or price_desc",
            }),
        }
    }
}

/// Catalog listing filter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogQuery {
    pub category: Option<ComponentCategory>,
    /// Case-insensitive substring of name or manufacturer
    pub search: Option<String>,
    pub sort: SortOrder,
}

impl CatalogQuery {
    pub fn category(category: ComponentCategory) -> Self {
        Self {
            category: Some(category),
            ..Default::default()
        }
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        self.search = if term.trim().is_empty() { None } else { Some(term) };
        self
    }

    pub fn sorted_by(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    pub fn matches(&self, component: &Component) -> bool {
        if let Some(category) = self.category {
            if component.category() != category {
                return false;
            }
        }
        match &self.search {
            Some(term) => {
                let needle = term.trim().to_lowercase();
                component.name.to_lowercase().contains(&needle)
                    || component.manufacturer.to_lowercase().contains(&needle)
            }
            None => true,
        }
    }

    /// Filter and order a batch of components
    pub fn apply(&self, components: Vec<Component>) -> Vec<Component> {
        let mut selected: Vec<Component> =
            components.into_iter().filter(|c| self.matches(c)).collect();

        match self.sort {
            SortOrder::Name => selected.sort_by(by_name),
            // Unpriced parts go last in both directions
            SortOrder::PriceAsc => selected.sort_by(|a, b| match (a.price, b.price) {
                (Some(x), Some(y)) => x.cmp(&y).then_with(|| by_name(a, b)),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => by_name(a, b),
            }),
            SortOrder::PriceDesc => selected.sort_by(|a, b| match (a.price, b.price) {
                (Some(x), Some(y)) => y.cmp(&x).then_with(|| by_name(a, b)),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => by_name(a, b),
            }),
        }
        selected
    }
}

fn by_name(a: &Component, b: &Component) -> Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.id.cmp(&b.id))
}
