use crate::catalog::{Component, PerformanceTier};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordinals compared by the detector
const TIER_ORDINALS: [(PerformanceTier, u8); 3] = [
    (PerformanceTier::Entry, 1),
    (PerformanceTier::Mid, 2),
    (PerformanceTier::High, 3),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BottleneckLevel {
    /// CPU or GPU slot empty
    None,
    /// Tier missing on one of the parts
    Info,
    Major,
    Minor,
    Good,
}

impl BottleneckLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            BottleneckLevel::None => "none",
            BottleneckLevel::Info => "info",
            BottleneckLevel::Major => "major",
            BottleneckLevel::Minor => "minor",
            BottleneckLevel::Good => "good",
        }
    }
}

impl fmt::Display for BottleneckLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bottleneck {
    pub level: BottleneckLevel,
    pub message: String,
}

impl Bottleneck {
    fn new(level: BottleneckLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// 0 when the tier is unset
pub fn tier_ordinal(tier: Option<PerformanceTier>) -> u8 {
    tier.and_then(|tier| {
        TIER_ORDINALS
            .iter()
            .find(|(t, _)| *t == tier)
            .map(|(_, ordinal)| *ordinal)
    })
    .unwrap_or(0)
}

/// Compare CPU and GPU performance tiers
pub fn detect_bottleneck(cpu: Option<&Component>, gpu: Option<&Component>) -> Bottleneck {
    let (Some(cpu), Some(gpu)) = (cpu, gpu) else {
        return Bottleneck::new(
            BottleneckLevel::None,
            "Select a CPU and GPU to check for bottlenecks.",
        );
    };

    let cpu_tier = tier_ordinal(cpu.performance_tier);
    let gpu_tier = tier_ordinal(gpu.performance_tier);

    if cpu_tier == 0 || gpu_tier == 0 {
        return Bottleneck::new(
            BottleneckLevel::Info,
            "Performance tier not set for CPU or GPU.",
        );
    }

    // (stronger part, weaker part, label of the weaker part)
    let (strong, weak, weak_label) = if cpu_tier > gpu_tier {
        (&cpu.name, &gpu.name, "GPU")
    } else {
        (&gpu.name, &cpu.name, "CPU")
    };

    match cpu_tier.abs_diff(gpu_tier) {
        0 => Bottleneck::new(BottleneckLevel::Good, "CPU and GPU are well-balanced."),
        1 => Bottleneck::new(
            BottleneckLevel::Minor,
            format!(
                "Minor Bottleneck Risk: Your '{strong}' is in a higher performance tier than your '{weak}'. This is generally okay."
            ),
        ),
        _ => Bottleneck::new(
            BottleneckLevel::Major,
            format!(
                "Major Bottleneck: Your '{strong}' is significantly more powerful than your '{weak}'. The {weak_label} will severely limit performance."
            ),
        ),
    }
}
