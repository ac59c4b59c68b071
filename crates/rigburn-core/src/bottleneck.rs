//! GPU/CPU balance classification.
//!
//! Two threshold tables exist. `Normalized` compares each score against a
//! reference "high-end" score first; `RawRatio` divides the raw scores
//! directly. Callers pick one.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BottleneckStatus {
    Balanced,
    CpuBottleneck,
    GpuBottleneck,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    None,
    Mild,
    Severe,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BottleneckStrategy {
    Normalized { gpu_reference: f64, cpu_reference: f64 },
    RawRatio,
}

impl BottleneckStrategy {
    pub const fn normalized() -> Self {
        BottleneckStrategy::Normalized {
            gpu_reference: 15_000.0,
            cpu_reference: 20_000.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BottleneckStrategy::Normalized { .. } => "normalized",
            BottleneckStrategy::RawRatio => "raw",
        }
    }

    pub fn ratio(&self, gpu_score: u64, cpu_score: u64) -> Option<f64> {
        if cpu_score == 0 {
            return None;
        }
        let ratio = match self {
            BottleneckStrategy::Normalized {
                gpu_reference,
                cpu_reference,
            } => (gpu_score as f64 / gpu_reference) / (cpu_score as f64 / cpu_reference),
            BottleneckStrategy::RawRatio => gpu_score as f64 / cpu_score as f64,
        };
        Some(ratio)
    }
}

impl Default for BottleneckStrategy {
    fn default() -> Self {
        Self::normalized()
    }
}

/// One contiguous interval of the ratio line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    SevereGpu,
    MildGpu,
    Balanced,
    MildCpu,
    SevereCpu,
    Unknown,
}

impl Zone {
    pub fn status(&self) -> BottleneckStatus {
        match self {
            Zone::SevereGpu | Zone::MildGpu => BottleneckStatus::GpuBottleneck,
            Zone::MildCpu | Zone::SevereCpu => BottleneckStatus::CpuBottleneck,
            Zone::Balanced => BottleneckStatus::Balanced,
            Zone::Unknown => BottleneckStatus::Unknown,
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Zone::SevereGpu | Zone::SevereCpu => Severity::Severe,
            Zone::MildGpu | Zone::MildCpu => Severity::Mild,
            Zone::Balanced | Zone::Unknown => Severity::None,
        }
    }
}

/// Map a ratio onto a zone. Total over `[0, inf]`; NaN or negative is `Unknown`.
pub fn classify_ratio(strategy: &BottleneckStrategy, ratio: f64) -> Zone {
    if ratio.is_nan() || ratio < 0.0 {
        return Zone::Unknown;
    }
    match strategy {
        BottleneckStrategy::Normalized { .. } => {
            if ratio < 0.5 {
                Zone::SevereGpu
            } else if ratio < 0.8 {
                Zone::MildGpu
            } else if ratio <= 1.2 {
                Zone::Balanced
            } else if ratio <= 2.0 {
                Zone::MildCpu
            } else {
                Zone::SevereCpu
            }
        }
        BottleneckStrategy::RawRatio => {
            if ratio < 0.7 {
                Zone::SevereGpu
            } else if ratio < 1.5 {
                Zone::MildGpu
            } else if ratio <= 2.5 {
                Zone::Balanced
            } else if ratio <= 3.0 {
                Zone::MildCpu
            } else {
                Zone::SevereCpu
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BottleneckAnalysis {
    pub strategy: BottleneckStrategy,
    pub ratio: Option<f64>,
    pub zone: Zone,
    pub status: BottleneckStatus,
    pub severity: Severity,
    /// Share of the reference score, capped at 100. Only set for `Normalized`.
    pub gpu_percentage: Option<u8>,
    pub cpu_percentage: Option<u8>,
    pub title: String,
    pub description: String,
    pub recommendation: Option<String>,
}

fn percentage(score: u64, reference: f64) -> u8 {
    ((score as f64 / reference) * 100.0).round().min(100.0) as u8
}

pub fn analyze(strategy: BottleneckStrategy, gpu_score: u64, cpu_score: u64) -> BottleneckAnalysis {
    let ratio = strategy.ratio(gpu_score, cpu_score);
    let zone = ratio
        .map(|r| classify_ratio(&strategy, r))
        .unwrap_or(Zone::Unknown);

    let (gpu_percentage, cpu_percentage) = match strategy {
        BottleneckStrategy::Normalized {
            gpu_reference,
            cpu_reference,
        } => (
            Some(percentage(gpu_score, gpu_reference)),
            Some(percentage(cpu_score, cpu_reference)),
        ),
        BottleneckStrategy::RawRatio => (None, None),
    };

    let (title, description, recommendation) = messages(&strategy, zone, gpu_score, cpu_score);

    BottleneckAnalysis {
        strategy,
        ratio,
        zone,
        status: zone.status(),
        severity: zone.severity(),
        gpu_percentage,
        cpu_percentage,
        title: title.to_string(),
        description,
        recommendation: recommendation.map(str::to_string),
    }
}

fn messages(
    strategy: &BottleneckStrategy,
    zone: Zone,
    gpu_score: u64,
    cpu_score: u64,
) -> (&'static str, String, Option<&'static str>) {
    let raw = matches!(strategy, BottleneckStrategy::RawRatio);
    match zone {
        Zone::SevereGpu if raw => (
            "🎮 GPU Insufficient",
            format!(
                "The GPU score ({}) is far behind the CPU score ({}). The graphics card cannot keep up.",
                gpu_score, cpu_score
            ),
            Some("A stronger graphics card would unlock a dramatic performance gain."),
        ),
        Zone::SevereGpu => (
            "🎮 GPU Bottleneck Detected",
            format!(
                "Your processor is strong but the graphics card lags behind. GPU score ({}) trails CPU score ({}).",
                gpu_score, cpu_score
            ),
            Some("A stronger graphics card would unlock a dramatic performance gain."),
        ),
        Zone::MildGpu => (
            "📊 GPU-Limited System",
            "The graphics card is the limiting factor. This is normal for games.".to_string(),
            Some("Tune graphics settings down for higher frame rates."),
        ),
        Zone::Balanced if raw => (
            "✅ Ideal Gaming Balance",
            format!(
                "GPU ({}) and CPU ({}) sit in the sweet spot for gaming workloads.",
                gpu_score, cpu_score
            ),
            None,
        ),
        Zone::Balanced => (
            "✅ Perfect Balance!",
            format!(
                "GPU ({}) and CPU ({}) scores are in harmony. You get the most out of the system.",
                gpu_score, cpu_score
            ),
            None,
        ),
        Zone::MildCpu => (
            "⚡ Mild CPU Bottleneck",
            "The processor cannot fully feed the graphics card. CPU-heavy games may dip.".to_string(),
            Some("Close background applications to lighten the processor load."),
        ),
        Zone::SevereCpu => (
            "⚠️ Critical CPU Bottleneck!",
            format!(
                "The graphics card is powerful but the processor holds it back. GPU score ({}) far exceeds CPU score ({}).",
                gpu_score, cpu_score
            ),
            Some("A processor upgrade would let the graphics card reach its full potential."),
        ),
        Zone::Unknown => (
            "❔ Analysis Unavailable",
            "Both a GPU and a CPU score are needed for a balance analysis.".to_string(),
            None,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STRATEGIES: [BottleneckStrategy; 2] =
        [BottleneckStrategy::normalized(), BottleneckStrategy::RawRatio];

    #[test]
    fn test_every_ratio_lands_in_exactly_one_known_zone() {
        for strategy in STRATEGIES {
            let mut ratio = 0.0;
            let mut previous = Zone::SevereGpu;
            let order = [
                Zone::SevereGpu,
                Zone::MildGpu,
                Zone::Balanced,
                Zone::MildCpu,
                Zone::SevereCpu,
            ];
            while ratio < 10.0 {
                let zone = classify_ratio(&strategy, ratio);
                assert_ne!(zone, Zone::Unknown, "{} at {}", strategy.name(), ratio);
                let idx = order.iter().position(|z| *z == zone).unwrap();
                let prev_idx = order.iter().position(|z| *z == previous).unwrap();
                assert!(idx >= prev_idx, "zones must be contiguous");
                previous = zone;
                ratio += 0.001;
            }
            assert_eq!(classify_ratio(&strategy, f64::INFINITY), Zone::SevereCpu);
        }
    }

    #[test]
    fn test_raw_ratio_boundaries() {
        let s = BottleneckStrategy::RawRatio;
        assert_eq!(classify_ratio(&s, 0.0), Zone::SevereGpu);
        assert_eq!(classify_ratio(&s, 0.69), Zone::SevereGpu);
        assert_eq!(classify_ratio(&s, 0.7), Zone::MildGpu);
        assert_eq!(classify_ratio(&s, 1.49), Zone::MildGpu);
        assert_eq!(classify_ratio(&s, 1.5), Zone::Balanced);
        assert_eq!(classify_ratio(&s, 2.5), Zone::Balanced);
        assert_eq!(classify_ratio(&s, 2.51), Zone::MildCpu);
        assert_eq!(classify_ratio(&s, 3.0), Zone::MildCpu);
        assert_eq!(classify_ratio(&s, 3.01), Zone::SevereCpu);
    }

    #[test]
    fn test_normalized_boundaries() {
        let s = BottleneckStrategy::normalized();
        assert_eq!(classify_ratio(&s, 0.49), Zone::SevereGpu);
        assert_eq!(classify_ratio(&s, 0.5), Zone::MildGpu);
        assert_eq!(classify_ratio(&s, 0.8), Zone::Balanced);
        assert_eq!(classify_ratio(&s, 1.2), Zone::Balanced);
        assert_eq!(classify_ratio(&s, 1.21), Zone::MildCpu);
        assert_eq!(classify_ratio(&s, 2.0), Zone::MildCpu);
        assert_eq!(classify_ratio(&s, 2.01), Zone::SevereCpu);
    }

    #[test]
    fn test_nan_and_zero_cpu_are_unknown() {
        assert_eq!(
            classify_ratio(&BottleneckStrategy::RawRatio, f64::NAN),
            Zone::Unknown
        );
        let analysis = analyze(BottleneckStrategy::RawRatio, 1_000, 0);
        assert_eq!(analysis.status, BottleneckStatus::Unknown);
        assert!(analysis.ratio.is_none());
    }

    #[test]
    fn test_analyze_raw_ideal_balance() {
        let analysis = analyze(BottleneckStrategy::RawRatio, 200_000, 100_000);
        assert_eq!(analysis.ratio, Some(2.0));
        assert_eq!(analysis.status, BottleneckStatus::Balanced);
        assert_eq!(analysis.severity, Severity::None);
        assert!(analysis.recommendation.is_none());
        assert!(analysis.gpu_percentage.is_none());
    }

    #[test]
    fn test_analyze_raw_cpu_bottleneck() {
        let analysis = analyze(BottleneckStrategy::RawRatio, 400_000, 100_000);
        assert_eq!(analysis.status, BottleneckStatus::CpuBottleneck);
        assert_eq!(analysis.severity, Severity::Severe);
        assert!(analysis.recommendation.is_some());
    }

    #[test]
    fn test_analyze_normalized_percentages_are_capped() {
        let analysis = analyze(BottleneckStrategy::normalized(), 30_000, 10_000);
        assert_eq!(analysis.gpu_percentage, Some(100));
        assert_eq!(analysis.cpu_percentage, Some(50));
        // (30000/15000) / (10000/20000) = 4.0
        assert_eq!(analysis.zone, Zone::SevereCpu);
    }
}
