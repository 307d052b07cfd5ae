//! Slot allocation rules
//!
//! Operates on an in-memory snapshot of a build's items. Callers persist the
//! resulting snapshot; the store does that inside one write transaction so
//! the capacity check and the insert cannot interleave with another writer.

use super::BuildItem;
use crate::catalog::{Component, ComponentCategory, ComponentId, SlotCategory};
use serde::{Deserialize, Serialize};

/// RAM capacity when no motherboard is installed
pub const DEFAULT_RAM_SLOTS: u32 = 4;
/// Fixed number of storage bays
pub const STORAGE_SLOTS: u32 = 2;

/// Result of adding a component to a build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AllocationOutcome {
    /// Unique slot filled; previous occupants were removed
    Swapped {
        replaced: Vec<ComponentId>,
        /// RAM removed because a new motherboard has fewer slots:
        /// `(component, sticks removed)`, most recent first
        trimmed_ram: Vec<(ComponentId, u32)>,
    },
    /// Stackable item added; `quantity` is the row's new quantity
    Stacked { quantity: u32 },
    /// Category already at capacity; nothing changed
    CapacityReached { capacity: u32 },
}

impl AllocationOutcome {
    pub fn changed(&self) -> bool {
        !matches!(self, AllocationOutcome::CapacityReached { .. })
    }
}

/// Result of removing one unit of a component from a build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemovalOutcome {
    Decremented { remaining: u32 },
    Removed,
    NotPresent,
}

pub struct SlotAllocator;

impl SlotAllocator {
    /// RAM slots offered by the installed motherboard, or the default
    pub fn ram_slots(items: &[BuildItem]) -> u32 {
        items
            .iter()
            .find_map(|item| item.component.spec.ram_slots())
            .unwrap_or(DEFAULT_RAM_SLOTS)
    }

    /// Capacity limit of a stackable category; `None` for unique ones
    pub fn capacity(items: &[BuildItem], category: ComponentCategory) -> Option<u32> {
        match category {
            ComponentCategory::Ram => Some(Self::ram_slots(items)),
            ComponentCategory::Storage => Some(STORAGE_SLOTS),
            _ => None,
        }
    }

    /// Units of a category currently installed
    pub fn installed(items: &[BuildItem], category: ComponentCategory) -> u32 {
        items
            .iter()
            .filter(|item| item.category() == category)
            .map(|item| item.quantity)
            .sum()
    }

    fn next_seq(items: &[BuildItem]) -> u64 {
        items.iter().map(|item| item.seq).max().unwrap_or(0) + 1
    }

    /// Place `component` into the build
    pub fn add(items: &mut Vec<BuildItem>, component: Component) -> AllocationOutcome {
        let category = component.category();

        match category.slot_category() {
            SlotCategory::Unique => {
                let seq = Self::next_seq(items);
                let replaced: Vec<ComponentId> = items
                    .iter()
                    .filter(|item| item.category() == category)
                    .map(|item| item.component.id)
                    .collect();
                items.retain(|item| item.category() != category);
                items.push(BuildItem {
                    component,
                    quantity: 1,
                    seq,
                });

                let trimmed_ram = if category == ComponentCategory::Motherboard {
                    Self::trim_ram(items)
                } else {
                    Vec::new()
                };

                AllocationOutcome::Swapped {
                    replaced,
                    trimmed_ram,
                }
            }
            SlotCategory::Stackable => {
                let capacity = Self::capacity(items, category).unwrap_or(u32::MAX);
                if Self::installed(items, category) >= capacity {
                    return AllocationOutcome::CapacityReached { capacity };
                }

                if let Some(existing) = items
                    .iter_mut()
                    .find(|item| item.component.id == component.id)
                {
                    existing.quantity += 1;
                    return AllocationOutcome::Stacked {
                        quantity: existing.quantity,
                    };
                }

                let seq = Self::next_seq(items);
                items.push(BuildItem {
                    component,
                    quantity: 1,
                    seq,
                });
                AllocationOutcome::Stacked { quantity: 1 }
            }
        }
    }

    /// Drop RAM sticks, newest association first, until the total fits the
    /// motherboard's slot count
    fn trim_ram(items: &mut Vec<BuildItem>) -> Vec<(ComponentId, u32)> {
        let limit = Self::ram_slots(items);
        let mut excess = Self::installed(items, ComponentCategory::Ram).saturating_sub(limit);
        let mut trimmed = Vec::new();
        if excess == 0 {
            return trimmed;
        }

        let mut ram_rows: Vec<(u64, ComponentId)> = items
            .iter()
            .filter(|item| item.category() == ComponentCategory::Ram)
            .map(|item| (item.seq, item.component.id))
            .collect();
        ram_rows.sort_by(|a, b| b.0.cmp(&a.0));

        for (_, component_id) in ram_rows {
            if excess == 0 {
                break;
            }
            if let Some(item) = items
                .iter_mut()
                .find(|item| item.component.id == component_id)
            {
                let removed = item.quantity.min(excess);
                item.quantity -= removed;
                excess -= removed;
                trimmed.push((component_id, removed));
            }
        }

        items.retain(|item| item.quantity > 0);
        trimmed
    }

    /// Remove one unit of `component_id`
    pub fn remove(items: &mut Vec<BuildItem>, component_id: ComponentId) -> RemovalOutcome {
        let Some(index) = items
            .iter()
            .position(|item| item.component.id == component_id)
        else {
            return RemovalOutcome::NotPresent;
        };

        if items[index].quantity > 1 {
            items[index].quantity -= 1;
            RemovalOutcome::Decremented {
                remaining: items[index].quantity,
            }
        } else {
            items.remove(index);
            RemovalOutcome::Removed
        }
    }
}
