//! Compatibility advisor - pure functions over a build's components
//!
//! Missing data (no tier, no TDP) is reported as an informational result,
//! never as an error.

mod bottleneck;
mod psu;

pub use bottleneck::{detect_bottleneck, tier_ordinal, Bottleneck, BottleneckLevel};
pub use psu::{recommend_psu, PsuRecommendation, BASE_LOAD_WATTS, STANDARD_PSU_SIZES};
