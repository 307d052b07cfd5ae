use super::allocator::{DEFAULT_RAM_SLOTS, STORAGE_SLOTS};
use super::BuildItem;
use crate::catalog::ComponentCategory;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Fixed-shape slot view of a build
///
/// `ram` always holds exactly `ram_slots()` entries and `storage` exactly
/// `STORAGE_SLOTS`, padded with `None` for empty slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scaffold {
    pub cpu: Option<BuildItem>,
    pub motherboard: Option<BuildItem>,
    pub gpu: Option<BuildItem>,
    pub ram: Vec<Option<BuildItem>>,
    pub storage: Vec<Option<BuildItem>>,
    pub psu: Option<BuildItem>,
    pub case: Option<BuildItem>,
}

impl Scaffold {
    pub fn project(items: &[BuildItem]) -> Self {
        let mut scaffold = Scaffold {
            cpu: None,
            motherboard: None,
            gpu: None,
            ram: Vec::new(),
            storage: Vec::new(),
            psu: None,
            case: None,
        };

        let mut ram = Vec::new();
        let mut storage = Vec::new();

        let mut ordered: Vec<&BuildItem> = items.iter().collect();
        ordered.sort_by_key(|item| item.seq);

        for item in ordered {
            let category = item.category();
            let slot = match category {
                ComponentCategory::Cpu => &mut scaffold.cpu,
                ComponentCategory::Motherboard => &mut scaffold.motherboard,
                ComponentCategory::Gpu => &mut scaffold.gpu,
                ComponentCategory::Psu => &mut scaffold.psu,
                ComponentCategory::Case => &mut scaffold.case,
                ComponentCategory::Ram => {
                    ram.extend((0..item.quantity).map(|_| item.clone()));
                    continue;
                }
                ComponentCategory::Storage => {
                    storage.extend((0..item.quantity).map(|_| item.clone()));
                    continue;
                }
            };

            if let Some(previous) = slot.replace(item.clone()) {
                // Allocation keeps unique slots single; seeing two means the
                // stored rows were edited behind the allocator's back
                warn!(
                    category = %category,
                    kept = item.component.id,
                    dropped = previous.component.id,
                    "unique slot holds more than one component"
                );
            }
        }

        let ram_slots = scaffold
            .motherboard
            .as_ref()
            .and_then(|item| item.component.spec.ram_slots())
            .unwrap_or(DEFAULT_RAM_SLOTS) as usize;

        scaffold.ram = pad(ram, ram_slots);
        scaffold.storage = pad(storage, STORAGE_SLOTS as usize);
        scaffold
    }

    /// Number of RAM slots shown
    pub fn ram_slots(&self) -> usize {
        self.ram.len()
    }

    /// Occupant of a unique slot
    pub fn unique_slot(&self, category: ComponentCategory) -> Option<&BuildItem> {
        match category {
            ComponentCategory::Cpu => self.cpu.as_ref(),
            ComponentCategory::Motherboard => self.motherboard.as_ref(),
            ComponentCategory::Gpu => self.gpu.as_ref(),
            ComponentCategory::Psu => self.psu.as_ref(),
            ComponentCategory::Case => self.case.as_ref(),
            ComponentCategory::Ram | ComponentCategory::Storage => None,
        }
    }
}

fn pad(mut occupants: Vec<BuildItem>, slots: usize) -> Vec<Option<BuildItem>> {
    occupants.truncate(slots);
    let mut padded: Vec<Option<BuildItem>> = occupants.into_iter().map(Some).collect();
    padded.resize(slots, None);
    padded
}
