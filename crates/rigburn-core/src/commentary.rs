//! Tiered commentary for benchmark results.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::scoring::combined_score;

const GPU_POTATO: &[&str] = &[
    "🥔 Is this a toaster? The bread got crispy but the frames never came.",
    "📽️ If the slideshow is over we can switch the computer off.",
    "🎨 You must really love pixel art.",
    "💀 The GPU is praying: \"Please leave me alone.\"",
    "🧱 Even block games break a sweat on this system.",
];

const GPU_ENTRY: &[&str] = &[
    "🎮 Competitive shooters run fine. Do not try the open-world epics.",
    "💼 Great for office work. For games... well.",
    "📊 The GPU was happy drawing spreadsheet charts.",
    "🌱 Every beginning is hard. This one too.",
    "🎯 Esports titles are fine, the big releases will struggle.",
];

const GPU_MID: &[&str] = &[
    "⚖️ A real price/performance beast. Nothing missing, nothing extra.",
    "🏃 Smooth on High, do not push Ultra.",
    "🎯 The golden middle path. A balanced system.",
    "🎮 Most games hold 60 FPS. No worries.",
    "🚀 Ready for launch, just a little short on rocket fuel.",
];

const GPU_HIGH: &[&str] = &[
    "🚀 This machine flies. Fasten your seatbelt.",
    "🌪️ Is that the fan or a jet engine? Serious power.",
    "👑 Welcome to the high-end club.",
    "🎮 Ultra settings? We are asking for MORE.",
    "💎 Not price/performance. Just performance.",
];

const GPU_GOD: &[&str] = &[
    "🛸 Did you borrow this from a space agency?",
    "💸 The power bill will hurt, but it is worth it.",
    "🌌 Real life is not this smooth.",
    "🏆 We did not break the benchmark, we broke the record.",
    "🔮 Are you from the future? This is not normal.",
];

const CPU_WEAK: &[&str] = &[
    "🧮 Weak at maths, should carry a calculator.",
    "🐢 Brew some tea while the processor thinks.",
    "😴 The processor is dozing. Bring coffee.",
    "⏳ The hourglass got tired of spinning.",
    "🧠 Not a brainstorm, a brain drizzle.",
];

const CPU_AVERAGE: &[&str] = &[
    "📊 An average student. Passes the exam.",
    "💼 Enough for daily work, not for a quiz show.",
    "🏃 Running, but not sprinting.",
    "⚖️ Balanced but unexciting.",
    "🔧 Like a mechanical watch: does the job, not quickly.",
];

const CPU_GOOD: &[&str] = &[
    "🧠 Smart kid. Top of the class.",
    "⚡ Thinks fast, computes fast.",
    "💪 Strong processor, strong will.",
    "🔬 Has scientist potential.",
    "📱 Handles a hundred browser tabs, do not worry.",
];

const CPU_GREAT: &[&str] = &[
    "🌟 Is this a supercomputer?",
    "🏆 Gold medal at the processor olympics.",
    "⚛️ Enough compute to split atoms.",
    "🔥 The thermal paste is melting, it is that fast.",
    "💎 The pride of the valley.",
];

const CPU_GENIUS: &[&str] = &[
    "🧠 Geniuses take notes from this one.",
    "🛸 Even AI envies this speed.",
    "👑 Processor royalty. Kneel.",
    "⚡ One step short of light speed.",
    "🏛️ Research labs want to study this chip.",
];

const TREND_MAJOR_INCREASE: &[&str] = &[
    "📈 That driver update paid off!",
    "💪 The computer hit the gym and gained muscle.",
    "🚀 Liftoff confirmed. Performance is airborne.",
    "⚡ Did you switch on turbo mode?",
    "🏆 New record. Applause.",
];

const TREND_MINOR_INCREASE: &[&str] = &[
    "📊 Nice progress. Growing step by step.",
    "👍 Better than last time, keep going.",
    "✨ A small but welcome gain.",
    "🎯 You are on the right track.",
    "📈 The graph is pointing up.",
];

const TREND_STABLE: &[&str] = &[
    "⚖️ A monument to consistency.",
    "🔒 Solid as a rock.",
    "📊 Unchanged performance means a reliable system.",
    "🧘 Zen mode: calm and steady.",
    "💎 Same quality, same confidence.",
];

const TREND_MINOR_DECREASE: &[&str] = &[
    "↘️ A slight dip, no panic.",
    "🤔 Is something running in the background?",
    "🌡️ Thermals? Check the fans.",
    "💭 Did the system updater run again?",
    "🔍 A small loss, nothing serious.",
];

const TREND_MAJOR_DECREASE: &[&str] = &[
    "💀 Something is off. You did better last time.",
    "🌐 Close those background browser tabs!",
    "🔥 Thermal throttling? Are the fans spinning?",
    "⚠️ Serious drop. Time for a system check.",
    "🧹 Looks like it is cleaning day.",
];

const CULPRIT_CPU: &[&str] = &[
    "🏎️ A race car body with a tractor engine. The processor cannot keep up.",
    "🐎 The GPU wants to gallop, the CPU says slow down.",
    "🔗 The weak link in the chain: CPU.",
    "💔 The GPU is crying: \"Set me free!\"",
    "🐢 Processor: \"I cannot match this pace.\"",
];

const CULPRIT_GPU: &[&str] = &[
    "🎮 The processor computes worlds, the graphics card says it is tired.",
    "🧠 Fast brain, slow hands. GPU bottleneck.",
    "📊 CPU: \"Ready!\" GPU: \"One second...\"",
    "⚡ Processor on turbo, GPU in economy mode.",
    "🔧 Time to think about a graphics upgrade.",
];

const CULPRIT_NONE: &[&str] = &[
    "✅ Perfect balance. That is teamwork.",
    "🤝 CPU and GPU, hand in hand.",
    "⚖️ In harmony like yin and yang.",
    "🎯 Ideal system. No bottleneck.",
    "💪 Both in shape, nobody waits for anybody.",
];

/// Uniform pick from a non-empty option list.
pub fn pick<'a, R: Rng + ?Sized>(options: &[&'a str], rng: &mut R) -> &'a str {
    options[rng.gen_range(0..options.len())]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commentary {
    pub tier: String,
    pub emoji: String,
    pub comment: String,
}

impl Commentary {
    fn new(tier: &str, emoji: &str, comment: &str) -> Self {
        Self {
            tier: tier.to_string(),
            emoji: emoji.to_string(),
            comment: comment.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Culprit {
    Cpu,
    Gpu,
    None,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BottleneckCommentary {
    pub status: String,
    pub emoji: String,
    pub comment: String,
    pub culprit: Culprit,
}

pub fn gpu_comment<R: Rng + ?Sized>(score: u64, rng: &mut R) -> Commentary {
    let (tier, emoji, options) = match score {
        s if s >= 500_000 => ("God Tier", "👑", GPU_GOD),
        s if s >= 300_000 => ("High-End", "🚀", GPU_HIGH),
        s if s >= 150_000 => ("Mid Range", "⚖️", GPU_MID),
        s if s >= 50_000 => ("Entry Level", "🎮", GPU_ENTRY),
        _ => ("Potato Tier", "🥔", GPU_POTATO),
    };
    Commentary::new(tier, emoji, pick(options, rng))
}

pub fn cpu_comment<R: Rng + ?Sized>(score: u64, rng: &mut R) -> Commentary {
    let (tier, emoji, options) = match score {
        s if s >= 250_000 => ("Genius", "🧠", CPU_GENIUS),
        s if s >= 150_000 => ("Great", "🌟", CPU_GREAT),
        s if s >= 80_000 => ("Good", "💪", CPU_GOOD),
        s if s >= 30_000 => ("Average", "📊", CPU_AVERAGE),
        _ => ("Weak at Maths", "🐢", CPU_WEAK),
    };
    Commentary::new(tier, emoji, pick(options, rng))
}

pub fn comparison_comment<R: Rng + ?Sized>(percent_change: f64, rng: &mut R) -> Commentary {
    let (trend, emoji, options) = if percent_change > 15.0 {
        ("Major Increase", "🚀", TREND_MAJOR_INCREASE)
    } else if percent_change > 5.0 {
        ("Increase", "📈", TREND_MINOR_INCREASE)
    } else if percent_change >= -5.0 {
        ("Stable", "⚖️", TREND_STABLE)
    } else if percent_change >= -15.0 {
        ("Decrease", "📉", TREND_MINOR_DECREASE)
    } else {
        ("Major Decrease", "⚠️", TREND_MAJOR_DECREASE)
    };
    Commentary::new(trend, emoji, pick(options, rng))
}

/// Culprit commentary against fixed baselines of 300k (GPU) and 150k (CPU).
pub fn bottleneck_comment<R: Rng + ?Sized>(
    gpu_score: u64,
    cpu_score: u64,
    rng: &mut R,
) -> BottleneckCommentary {
    let normalized_gpu = gpu_score as f64 / 300_000.0;
    let normalized_cpu = cpu_score as f64 / 150_000.0;
    let ratio = normalized_gpu / normalized_cpu;

    let (status, emoji, culprit) = if ratio.is_nan() {
        ("Balanced System", "✅", Culprit::None)
    } else if ratio > 2.0 {
        ("Severe CPU Bottleneck", "🚨", Culprit::Cpu)
    } else if ratio > 1.5 {
        ("CPU Bottleneck", "⚠️", Culprit::Cpu)
    } else if ratio < 0.5 {
        ("Severe GPU Bottleneck", "🚨", Culprit::Gpu)
    } else if ratio < 0.7 {
        ("GPU Bottleneck", "🎮", Culprit::Gpu)
    } else {
        ("Balanced System", "✅", Culprit::None)
    };

    let options = match culprit {
        Culprit::Cpu => CULPRIT_CPU,
        Culprit::Gpu => CULPRIT_GPU,
        Culprit::None => CULPRIT_NONE,
    };

    BottleneckCommentary {
        status: status.to_string(),
        emoji: emoji.to_string(),
        comment: pick(options, rng).to_string(),
        culprit,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullAnalysis {
    pub gpu: Commentary,
    pub cpu: Commentary,
    pub bottleneck: BottleneckCommentary,
    pub comparison: Option<Commentary>,
}

pub fn full_analysis<R: Rng + ?Sized>(
    gpu_score: u64,
    cpu_score: u64,
    previous_combined: Option<u64>,
    rng: &mut R,
) -> FullAnalysis {
    let combined = combined_score(gpu_score, cpu_score) as f64;
    let comparison = previous_combined.filter(|p| *p > 0).map(|prev| {
        let change = (combined - prev as f64) / prev as f64 * 100.0;
        comparison_comment(change, rng)
    });

    FullAnalysis {
        gpu: gpu_comment(gpu_score, rng),
        cpu: cpu_comment(cpu_score, rng),
        bottleneck: bottleneck_comment(gpu_score, cpu_score, rng),
        comparison,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_pick_is_reproducible_with_seed() {
        let mut a = ChaCha8Rng::seed_from_u64(7);
        let mut b = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..20 {
            assert_eq!(pick(GPU_MID, &mut a), pick(GPU_MID, &mut b));
        }
    }

    #[test]
    fn test_pick_covers_all_options() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            seen.insert(pick(CPU_GOOD, &mut rng));
        }
        assert_eq!(seen.len(), CPU_GOOD.len());
    }

    #[test]
    fn test_gpu_tiers() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(gpu_comment(0, &mut rng).tier, "Potato Tier");
        assert_eq!(gpu_comment(50_000, &mut rng).tier, "Entry Level");
        assert_eq!(gpu_comment(150_000, &mut rng).tier, "Mid Range");
        assert_eq!(gpu_comment(300_000, &mut rng).tier, "High-End");
        assert_eq!(gpu_comment(500_000, &mut rng).tier, "God Tier");
        assert!(GPU_GOD.contains(&gpu_comment(750_000, &mut rng).comment.as_str()));
    }

    #[test]
    fn test_cpu_tiers() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(cpu_comment(29_999, &mut rng).tier, "Weak at Maths");
        assert_eq!(cpu_comment(30_000, &mut rng).tier, "Average");
        assert_eq!(cpu_comment(80_000, &mut rng).tier, "Good");
        assert_eq!(cpu_comment(150_000, &mut rng).tier, "Great");
        assert_eq!(cpu_comment(250_000, &mut rng).tier, "Genius");
    }

    #[test]
    fn test_comparison_trends() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(comparison_comment(20.0, &mut rng).tier, "Major Increase");
        assert_eq!(comparison_comment(15.0, &mut rng).tier, "Increase");
        assert_eq!(comparison_comment(5.0, &mut rng).tier, "Stable");
        assert_eq!(comparison_comment(-5.0, &mut rng).tier, "Stable");
        assert_eq!(comparison_comment(-15.0, &mut rng).tier, "Decrease");
        assert_eq!(comparison_comment(-15.1, &mut rng).tier, "Major Decrease");
    }

    #[test]
    fn test_bottleneck_culprit() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        // ratio = (600k/300k) / (50k/150k) = 6.0
        assert_eq!(bottleneck_comment(600_000, 50_000, &mut rng).culprit, Culprit::Cpu);
        // ratio = (30k/300k) / (150k/150k) = 0.1
        assert_eq!(bottleneck_comment(30_000, 150_000, &mut rng).culprit, Culprit::Gpu);
        // ratio = 1.0
        assert_eq!(bottleneck_comment(300_000, 150_000, &mut rng).culprit, Culprit::None);
    }

    #[test]
    fn test_full_analysis_skips_comparison_without_history() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let analysis = full_analysis(200_000, 100, None, &mut rng);
        assert!(analysis.comparison.is_none());

        let analysis = full_analysis(200_000, 100, Some(50_000), &mut rng);
        assert_eq!(analysis.comparison.unwrap().tier, "Major Increase");
    }
}
