use crate::build::BuildItem;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Draw of parts without a declared TDP (board, RAM, fans)
pub const BASE_LOAD_WATTS: u32 = 50;

/// Common retail PSU sizes, ascending
pub const STANDARD_PSU_SIZES: [u32; 8] = [450, 550, 650, 750, 850, 1000, 1200, 1600];

/// Headroom as a ratio of tenths: 14/10 = 40% on top of the load
const HEADROOM_TENTHS: u64 = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PsuRecommendation {
    /// No component declares a TDP
    Insufficient,
    /// Smallest standard size covering load plus headroom
    Sized { size: u32, load: u32 },
    /// Load plus headroom exceeds the largest standard size
    AboveLargest { load: u32 },
}

impl PsuRecommendation {
    pub fn wattage(&self) -> Option<u32> {
        match self {
            PsuRecommendation::Sized { size, .. } => Some(*size),
            _ => None,
        }
    }

    pub fn load(&self) -> Option<u32> {
        match self {
            PsuRecommendation::Sized { load, .. } | PsuRecommendation::AboveLargest { load } => {
                Some(*load)
            }
            PsuRecommendation::Insufficient => None,
        }
    }
}

impl fmt::Display for PsuRecommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PsuRecommendation::Insufficient => {
                f.write_str("Add components with TDP to estimate wattage.")
            }
            PsuRecommendation::Sized { size, load } => {
                write!(f, "~{size}W (Estimated Load: {load}W)")
            }
            PsuRecommendation::AboveLargest { load } => write!(
                f,
                ">{}W (Estimated Load: {load}W)",
                STANDARD_PSU_SIZES[STANDARD_PSU_SIZES.len() - 1]
            ),
        }
    }
}

/// Additive TDP model: base + Σ tdp × quantity, then 40% headroom rounded up
/// to a standard size
pub fn recommend_psu(items: &[BuildItem]) -> PsuRecommendation {
    let component_load: u64 = items
        .iter()
        .filter_map(|item| match item.component.tdp {
            Some(tdp) if tdp > 0 => Some(u64::from(tdp) * u64::from(item.quantity)),
            _ => None,
        })
        .sum();

    if component_load == 0 {
        return PsuRecommendation::Insufficient;
    }

    let total = u64::from(BASE_LOAD_WATTS) + component_load;
    let load = u32::try_from(total).unwrap_or(u32::MAX);

    // size >= total * 1.4  <=>  size * 10 >= total * 14
    STANDARD_PSU_SIZES
        .iter()
        .find(|size| u64::from(**size) * 10 >= total * HEADROOM_TENTHS)
        .map(|size| PsuRecommendation::Sized { size: *size, load })
        .unwrap_or(PsuRecommendation::AboveLargest { load })
}
