//! Component catalog - typed hardware parts
//!
//! Every component carries the common attributes (manufacturer, price, TDP,
//! performance tier) plus a `ComponentSpec` variant holding the attributes
//! specific to its category. The category is always derived from the variant.

mod query;
mod seed;

pub use query::{CatalogQuery, SortOrder};
pub use seed::seed_catalog;

use crate::errors::DomainError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Catalog row identifier
pub type ComponentId = i64;

/// Coarse performance classification used by the bottleneck heuristics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PerformanceTier {
    Entry,
    Mid,
    High,
}

impl PerformanceTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            PerformanceTier::Entry => "Entry",
            PerformanceTier::Mid => "Mid",
            PerformanceTier::High => "High",
        }
    }
}

impl fmt::Display for PerformanceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PerformanceTier {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "entry" => Ok(PerformanceTier::Entry),
            "mid" => Ok(PerformanceTier::Mid),
            "high" => Ok(PerformanceTier::High),
            _ => Err(DomainError::InvalidValue {
                field: "performance tier",
                value: s.to_string(),
                expected: "Entry, Mid or High",
            }),
        }
    }
}

/// Whether a category occupies a single slot or stacks into several
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotCategory {
    /// At most one occupant per build; adding swaps the previous one out
    Unique,
    /// Several occupants up to a capacity limit
    Stackable,
}

/// Hardware category of a component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentCategory {
    Cpu,
    Gpu,
    Motherboard,
    Ram,
    Storage,
    Psu,
    Case,
}

impl ComponentCategory {
    pub const ALL: [ComponentCategory; 7] = [
        ComponentCategory::Cpu,
        ComponentCategory::Gpu,
        ComponentCategory::Motherboard,
        ComponentCategory::Ram,
        ComponentCategory::Storage,
        ComponentCategory::Psu,
        ComponentCategory::Case,
    ];

    /// Stable lowercase key, used for storage and CLI arguments
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentCategory::Cpu => "cpu",
            ComponentCategory::Gpu => "gpu",
            ComponentCategory::Motherboard => "motherboard",
            ComponentCategory::Ram => "ram",
            ComponentCategory::Storage => "storage",
            ComponentCategory::Psu => "psu",
            ComponentCategory::Case => "case",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            ComponentCategory::Cpu => "CPU",
            ComponentCategory::Gpu => "GPU",
            ComponentCategory::Motherboard => "Motherboard",
            ComponentCategory::Ram => "RAM",
            ComponentCategory::Storage => "Storage",
            ComponentCategory::Psu => "PSU",
            ComponentCategory::Case => "Case",
        }
    }

    pub fn slot_category(&self) -> SlotCategory {
        match self {
            ComponentCategory::Ram | ComponentCategory::Storage => SlotCategory::Stackable,
            _ => SlotCategory::Unique,
        }
    }

    pub fn is_unique(&self) -> bool {
        self.slot_category() == SlotCategory::Unique
    }

    pub fn unique_categories() -> impl Iterator<Item = ComponentCategory> {
        Self::ALL.into_iter().filter(|c| c.is_unique())
    }
}

impl fmt::Display for ComponentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ComponentCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cpu" => Ok(ComponentCategory::Cpu),
            "gpu" => Ok(ComponentCategory::Gpu),
            "motherboard" | "mobo" => Ok(ComponentCategory::Motherboard),
            "ram" | "memory" => Ok(ComponentCategory::Ram),
            "storage" => Ok(ComponentCategory::Storage),
            "psu" => Ok(ComponentCategory::Psu),
            "case" => Ok(ComponentCategory::Case),
            _ => Err(DomainError::UnknownCategory(s.to_string())),
        }
    }
}

/// Motherboard / case form factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormFactor {
    #[serde(rename = "ATX")]
    Atx,
    #[serde(rename = "Micro-ATX")]
    MicroAtx,
    #[serde(rename = "Mini-ITX")]
    MiniItx,
}

impl fmt::Display for FormFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FormFactor::Atx => "ATX",
            FormFactor::MicroAtx => "Micro-ATX",
            FormFactor::MiniItx => "Mini-ITX",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StorageType {
    #[serde(rename = "SSD")]
    Ssd,
    #[serde(rename = "NVMe")]
    Nvme,
    #[serde(rename = "HDD")]
    Hdd,
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StorageType::Ssd => "Solid State Drive",
            StorageType::Nvme => "NVMe SSD",
            StorageType::Hdd => "Hard Disk Drive",
        })
    }
}

/// 80 PLUS efficiency certification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PsuEfficiency {
    #[serde(rename = "80+")]
    Plus80,
    Bronze,
    Silver,
    Gold,
    Platinum,
    Titanium,
}

impl fmt::Display for PsuEfficiency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PsuEfficiency::Plus80 => f.write_str("80+"),
            PsuEfficiency::Bronze => f.write_str("80+ Bronze"),
            PsuEfficiency::Silver => f.write_str("80+ Silver"),
            PsuEfficiency::Gold => f.write_str("80+ Gold"),
            PsuEfficiency::Platinum => f.write_str("80+ Platinum"),
            PsuEfficiency::Titanium => f.write_str("80+ Titanium"),
        }
    }
}

/// Category-specific attributes; one variant per category
///
/// Serialized internally tagged by `category` so flat import records such as
/// `{"category": "cpu", "core_count": 6, ...}` map straight onto a variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "lowercase")]
pub enum ComponentSpec {
    Cpu {
        core_count: u32,
        /// GHz
        clock_speed: f64,
        socket: String,
    },
    Gpu {
        vram_gb: u32,
        /// MHz
        gpu_clock_speed: f64,
    },
    Motherboard {
        socket: String,
        form_factor: FormFactor,
        ram_slots: u32,
    },
    Ram {
        /// Per stick
        capacity_gb: u32,
        speed_mhz: u32,
    },
    Storage {
        capacity_gb: u32,
        storage_type: StorageType,
    },
    Psu {
        wattage: u32,
        efficiency_rating: PsuEfficiency,
    },
    Case {
        form_factor: FormFactor,
        /// mm
        #[serde(default)]
        max_gpu_length: Option<u32>,
    },
}

impl ComponentSpec {
    pub fn category(&self) -> ComponentCategory {
        match self {
            ComponentSpec::Cpu { .. } => ComponentCategory::Cpu,
            ComponentSpec::Gpu { .. } => ComponentCategory::Gpu,
            ComponentSpec::Motherboard { .. } => ComponentCategory::Motherboard,
            ComponentSpec::Ram { .. } => ComponentCategory::Ram,
            ComponentSpec::Storage { .. } => ComponentCategory::Storage,
            ComponentSpec::Psu { .. } => ComponentCategory::Psu,
            ComponentSpec::Case { .. } => ComponentCategory::Case,
        }
    }

    /// RAM slots declared by a motherboard
    pub fn ram_slots(&self) -> Option<u32> {
        match self {
            ComponentSpec::Motherboard { ram_slots, .. } => Some(*ram_slots),
            _ => None,
        }
    }

    /// One-line attribute summary for listings
    pub fn summary(&self) -> String {
        match self {
            ComponentSpec::Cpu {
                core_count,
                clock_speed,
                socket,
            } => format!("{core_count} cores @ {clock_speed:.2} GHz, {socket}"),
            ComponentSpec::Gpu {
                vram_gb,
                gpu_clock_speed,
            } => format!("{vram_gb} GB VRAM, {gpu_clock_speed:.0} MHz"),
            ComponentSpec::Motherboard {
                socket,
                form_factor,
                ram_slots,
            } => format!("{socket}, {form_factor}, {ram_slots} RAM slots"),
            ComponentSpec::Ram {
                capacity_gb,
                speed_mhz,
            } => format!("{capacity_gb} GB @ {speed_mhz} MHz"),
            ComponentSpec::Storage {
                capacity_gb,
                storage_type,
            } => format!("{capacity_gb} GB {storage_type}"),
            ComponentSpec::Psu {
                wattage,
                efficiency_rating,
            } => format!("{wattage} W, {efficiency_rating}"),
            ComponentSpec::Case {
                form_factor,
                max_gpu_length,
            } => match max_gpu_length {
                Some(len) => format!("{form_factor}, GPU up to {len} mm"),
                None => form_factor.to_string(),
            },
        }
    }
}

/// Catalog component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub id: ComponentId,
    pub name: String,
    pub manufacturer: String,
    pub price: Option<Decimal>,
    /// Thermal Design Power, watts
    pub tdp: Option<u32>,
    pub performance_tier: Option<PerformanceTier>,
    pub spec: ComponentSpec,
}

impl Component {
    pub fn category(&self) -> ComponentCategory {
        self.spec.category()
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.manufacturer, self.name)
    }
}

/// Component that has not been persisted yet
///
/// Also the shape of one entry in a catalog import file: common fields plus
/// the category attributes, all at the top level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewComponent {
    pub name: String,
    pub manufacturer: String,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub tdp: Option<u32>,
    #[serde(default)]
    pub performance_tier: Option<PerformanceTier>,
    #[serde(flatten)]
    pub spec: ComponentSpec,
}

impl NewComponent {
    pub fn category(&self) -> ComponentCategory {
        self.spec.category()
    }

    pub fn with_id(self, id: ComponentId) -> Component {
        Component {
            id,
            name: self.name,
            manufacturer: self.manufacturer,
            price: self.price,
            tdp: self.tdp,
            performance_tier: self.performance_tier,
            spec: self.spec,
        }
    }
}

/// Outcome of a catalog import or seed run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    pub created: usize,
    pub updated: usize,
    /// Entries without a name
    pub skipped: usize,
    /// Entries that could not be parsed, with the reason
    pub failed: Vec<(String, String)>,
}

impl ImportReport {
    pub fn merge(&mut self, other: ImportReport) {
        self.created += other.created;
        self.updated += other.updated;
        self.skipped += other.skipped;
        self.failed.extend(other.failed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_categories() {
        let unique: Vec<_> = ComponentCategory::unique_categories().collect();
        assert_eq!(
            unique,
            vec![
                ComponentCategory::Cpu,
                ComponentCategory::Gpu,
                ComponentCategory::Motherboard,
                ComponentCategory::Psu,
                ComponentCategory::Case,
            ]
        );
        assert_eq!(
            ComponentCategory::Ram.slot_category(),
            SlotCategory::Stackable
        );
        assert_eq!(
            ComponentCategory::Storage.slot_category(),
            SlotCategory::Stackable
        );
    }

    #[test]
    fn test_category_parsing() {
        assert_eq!(
            "CPU".parse::<ComponentCategory>().unwrap(),
            ComponentCategory::Cpu
        );
        assert_eq!(
            "Motherboard".parse::<ComponentCategory>().unwrap(),
            ComponentCategory::Motherboard
        );
        assert!(matches!(
            "toast".parse::<ComponentCategory>(),
            Err(DomainError::UnknownCategory(_))
        ));
    }

    #[test]
    fn test_tier_parsing() {
        assert_eq!("mid".parse::<PerformanceTier>().unwrap(), PerformanceTier::Mid);
        assert!(matches!(
            "ultra".parse::<PerformanceTier>(),
            Err(DomainError::InvalidValue { field: "performance tier", .. })
        ));
    }

    #[test]
    fn test_flat_import_record_parses_into_spec() {
        let json = serde_json::json!({
            "category": "motherboard",
            "name": "B550 Tomahawk",
            "manufacturer": "MSI",
            "price": 170.0,
            "socket": "AM4",
            "form_factor": "ATX",
            "ram_slots": 4
        });

        let parsed: NewComponent = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.category(), ComponentCategory::Motherboard);
        assert_eq!(parsed.spec.ram_slots(), Some(4));
        assert_eq!(parsed.price, Some(Decimal::new(170, 0)));
        assert_eq!(parsed.performance_tier, None);
    }

    #[test]
    fn test_import_keys_for_gpu_psu_and_case() {
        let gpu: NewComponent = serde_json::from_value(serde_json::json!({
            "category": "gpu", "name": "Arc A770", "manufacturer": "Intel",
            "vram_gb": 16, "gpu_clock_speed": 2100.0
        }))
        .unwrap();
        assert_eq!(
            gpu.spec,
            ComponentSpec::Gpu { vram_gb: 16, gpu_clock_speed: 2100.0 }
        );

        let psu: NewComponent = serde_json::from_value(serde_json::json!({
            "category": "psu", "name": "Focus GX-750", "manufacturer": "Seasonic",
            "wattage": 750, "efficiency_rating": "Gold"
        }))
        .unwrap();
        assert!(matches!(
            psu.spec,
            ComponentSpec::Psu { wattage: 750, efficiency_rating: PsuEfficiency::Gold }
        ));

        let case: NewComponent = serde_json::from_value(serde_json::json!({
            "category": "case", "name": "H5 Flow", "manufacturer": "NZXT",
            "form_factor": "ATX", "max_gpu_length": 365
        }))
        .unwrap();
        assert!(matches!(
            case.spec,
            ComponentSpec::Case { max_gpu_length: Some(365), .. }
        ));
    }

    #[test]
    fn test_spec_summary() {
        let spec = ComponentSpec::Storage {
            capacity_gb: 1000,
            storage_type: StorageType::Nvme,
        };
        assert_eq!(spec.summary(), "1000 GB NVMe SSD");
    }
}
