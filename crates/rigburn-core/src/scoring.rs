//! Score calculation and rank tiers.
//!
//! The GPU score is the final rendered-instance count from the load ramp.
//! Ranks bucket that score into ordered tiers.

use serde::{Deserialize, Serialize};

/// Flavor names for the top tier, chosen by `score % 1000 % len`.
pub const ELITE_FLAVORS: &[&str] = &[
    "NASA Workstation",
    "Render Farm",
    "Silicon Titan",
    "Frame Reactor",
    "Quantum Rig",
    "Overclocked Legend",
];

/// Identity mapping from rendered objects to score, rounded.
pub fn calculate_score(total_objects: f64) -> u64 {
    if !total_objects.is_finite() || total_objects <= 0.0 {
        return 0;
    }
    total_objects.round() as u64
}

/// Mean of the GPU and CPU scores, rounded.
pub fn combined_score(gpu_score: u64, cpu_score: u64) -> u64 {
    ((gpu_score as f64 + cpu_score as f64) / 2.0).round() as u64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankTier {
    Low,
    Mid,
    MidHigh,
    High,
    Elite,
}

impl RankTier {
    /// Lower bound of each tier, highest first.
    const THRESHOLDS: [(u64, RankTier); 4] = [
        (400_000, RankTier::Elite),
        (200_000, RankTier::High),
        (100_000, RankTier::MidHigh),
        (50_000, RankTier::Mid),
    ];

    pub fn from_score(score: u64) -> Self {
        Self::THRESHOLDS
            .iter()
            .find(|(min, _)| score >= *min)
            .map(|(_, tier)| *tier)
            .unwrap_or(RankTier::Low)
    }

    pub fn min_score(&self) -> u64 {
        match self {
            RankTier::Elite => 400_000,
            RankTier::High => 200_000,
            RankTier::MidHigh => 100_000,
            RankTier::Mid => 50_000,
            RankTier::Low => 0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RankTier::Elite => "Elite",
            RankTier::High => "Gaming Machine",
            RankTier::MidHigh => "Solid Performer",
            RankTier::Mid => "Office Warrior",
            RankTier::Low => "Potato PC",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            RankTier::Elite => "🚀",
            RankTier::High => "🎮",
            RankTier::MidHigh => "⚡",
            RankTier::Mid => "💼",
            RankTier::Low => "🥔",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            RankTier::Elite => "purple",
            RankTier::High => "green",
            RankTier::MidHigh => "cyan",
            RankTier::Mid => "blue",
            RankTier::Low => "yellow",
        }
    }

    pub fn gradient(&self) -> &'static str {
        match self {
            RankTier::Elite => "purple-blue-green",
            RankTier::High => "green-blue-green",
            RankTier::MidHigh => "cyan-purple-cyan",
            RankTier::Mid => "blue-purple-blue",
            RankTier::Low => "yellow-orange-yellow",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            RankTier::Elite => "Space-station power. This machine renders anything.",
            RankTier::High => "Hardcore gamer. Ready for AAA titles.",
            RankTier::MidHigh => "Plenty of headroom for most games on high settings.",
            RankTier::Mid => "Fine for daily work. Gaming wants an upgrade.",
            RankTier::Low => "Patience is a virtue. Video playback still works.",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rank {
    pub score: u64,
    pub tier: RankTier,
    pub label: String,
    pub emoji: String,
    pub color: String,
    pub description: String,
}

/// Elite flavor name for a score; same score, same name.
pub fn elite_flavor(score: u64) -> &'static str {
    let idx = (score % 1000) as usize % ELITE_FLAVORS.len();
    ELITE_FLAVORS[idx]
}

pub fn get_rank(score: u64) -> Rank {
    let tier = RankTier::from_score(score);
    let label = match tier {
        RankTier::Elite => elite_flavor(score),
        _ => tier.label(),
    };

    Rank {
        score,
        tier,
        label: label.to_string(),
        emoji: tier.emoji().to_string(),
        color: tier.color().to_string(),
        description: tier.description().to_string(),
    }
}
