//! Builds - user-owned component selections
//!
//! A build owns a set of `BuildItem`s (component + quantity). Mutations go
//! through `SlotAllocator`, reads go through `Scaffold`.

mod allocator;
mod scaffold;

pub use allocator::{
    AllocationOutcome, RemovalOutcome, SlotAllocator, DEFAULT_RAM_SLOTS, STORAGE_SLOTS,
};
pub use scaffold::Scaffold;

use crate::advisor::{detect_bottleneck, recommend_psu, Bottleneck, PsuRecommendation};
use crate::catalog::{Component, ComponentCategory};
use crate::errors::{validate_name, DomainResult};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub type BuildId = i64;

pub const MAX_BUILD_NAME_LEN: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Build {
    pub id: BuildId,
    pub owner: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBuild {
    pub owner: String,
    pub name: String,
    pub description: Option<String>,
}

impl NewBuild {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn validate(&self) -> DomainResult<()> {
        validate_name("build name", &self.name, MAX_BUILD_NAME_LEN)
    }
}

/// Partial update of a build's descriptive fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildUpdate {
    pub name: Option<String>,
    /// `Some(None)` clears the description
    pub description: Option<Option<String>>,
}

impl BuildUpdate {
    pub fn validate(&self) -> DomainResult<()> {
        match &self.name {
            Some(name) => validate_name("build name", name, MAX_BUILD_NAME_LEN),
            None => Ok(()),
        }
    }
}

/// One (component, quantity) association of a build
///
/// `seq` is the insertion ordinal within the build; it never changes when
/// the quantity of an existing row changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildItem {
    pub component: Component,
    pub quantity: u32,
    pub seq: u64,
}

impl BuildItem {
    pub fn category(&self) -> ComponentCategory {
        self.component.category()
    }

    /// Price of all units, if the component is priced
    pub fn line_total(&self) -> Option<Decimal> {
        self.component
            .price
            .map(|price| price * Decimal::from(self.quantity))
    }
}

/// Sum of `price × quantity` over priced items
pub fn total_price(items: &[BuildItem]) -> Decimal {
    items.iter().filter_map(BuildItem::line_total).sum()
}

/// Everything the presentation layer needs to show a build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildSummary {
    pub build: Build,
    pub items: Vec<BuildItem>,
    pub scaffold: Scaffold,
    pub bottleneck: Bottleneck,
    pub psu: PsuRecommendation,
    pub total_price: Decimal,
}

impl BuildSummary {
    pub fn assemble(build: Build, items: Vec<BuildItem>) -> Self {
        let scaffold = Scaffold::project(&items);
        let bottleneck = detect_bottleneck(
            scaffold.cpu.as_ref().map(|item| &item.component),
            scaffold.gpu.as_ref().map(|item| &item.component),
        );
        let psu = recommend_psu(&items);
        let total_price = total_price(&items);

        Self {
            build,
            items,
            scaffold,
            bottleneck,
            psu,
            total_price,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::advisor::BottleneckLevel;
    use crate::catalog::PerformanceTier;

    #[test]
    fn test_total_price_counts_quantity() {
        let items = vec![item(ram(1), 2, 1), item(drive(2), 1, 2)];
        assert_eq!(total_price(&items), Decimal::new(300, 0));
    }

    #[test]
    fn test_total_price_skips_unpriced() {
        let mut unpriced = ram(1);
        unpriced.price = None;
        let items = vec![item(unpriced, 2, 1), item(drive(2), 1, 2)];
        assert_eq!(total_price(&items), Decimal::new(100, 0));
    }

    #[test]
    fn test_summary_feeds_scaffold_into_advisor() {
        let build = Build {
            id: 1,
            owner: "alice".to_string(),
            name: "Rig".to_string(),
            description: None,
            created_at: Utc::now(),
        };
        let items = vec![
            item(cpu(1, Some(PerformanceTier::Mid), Some(200)), 1, 1),
            item(gpu(2, Some(PerformanceTier::Mid), Some(200)), 1, 2),
        ];

        let summary = BuildSummary::assemble(build, items);
        assert_eq!(summary.bottleneck.level, BottleneckLevel::Good);
        assert_eq!(summary.psu.to_string(), "~650W (Estimated Load: 450W)");
        assert_eq!(summary.scaffold.ram.len(), 4);
    }

    #[test]
    fn test_build_name_validation() {
        assert!(NewBuild::new("alice", "My Dream PC").validate().is_ok());
        assert!(NewBuild::new("alice", "").validate().is_err());
        let update = BuildUpdate {
            name: Some(" ".to_string()),
            description: None,
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_new_build_with_description() {
        let build =
            NewBuild::new("alice", "Quiet office box").with_description("Fanless if possible");
        assert_eq!(build.owner, "alice");
        assert_eq!(build.description.as_deref(), Some("Fanless if possible"));
        assert!(build.validate().is_ok());
    }
}
