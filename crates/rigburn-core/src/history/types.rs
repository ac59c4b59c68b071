use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::commentary::pick;
use crate::scoring::combined_score;

/// A persisted run. Field names match the stored JSON layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreEntry {
    pub gpu_score: u64,
    pub cpu_score: u64,
    pub combined_score: u64,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browser_info: Option<String>,
}

impl ScoreEntry {
    pub fn new(
        gpu_score: u64,
        cpu_score: u64,
        timestamp: i64,
        date: impl Into<String>,
        browser_info: Option<String>,
    ) -> Self {
        Self {
            gpu_score,
            cpu_score,
            combined_score: combined_score(gpu_score, cpu_score),
            timestamp,
            date: date.into(),
            browser_info,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improved,
    Regressed,
    Stable,
    First,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Improved => "improved",
            Trend::Regressed => "regressed",
            Trend::Stable => "stable",
            Trend::First => "first",
        }
    }
}

const STABLE_MESSAGES: &[&str] = &[
    "⚖️ Perfect stability: performance is consistent and the hardware is reliable.",
    "🎯 Consistent performance! The score is almost identical to last time.",
    "💎 Steady system: deviation is minimal.",
    "🔒 Reliable results: the same performance on every run.",
    "⚡ Constant power: no drift between runs.",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreComparison {
    pub current: ScoreEntry,
    pub previous: Option<ScoreEntry>,
    pub gpu_diff: i64,
    pub cpu_diff: i64,
    pub combined_diff: i64,
    pub gpu_diff_percent: i64,
    pub cpu_diff_percent: i64,
    pub combined_diff_percent: i64,
    pub trend: Trend,
    pub message: String,
}

fn diff_percent(diff: i64, previous: u64) -> i64 {
    if previous == 0 {
        return 0;
    }
    (diff as f64 / previous as f64 * 100.0).round() as i64
}

impl ScoreComparison {
    pub fn between<R: Rng + ?Sized>(
        current: ScoreEntry,
        previous: Option<ScoreEntry>,
        rng: &mut R,
    ) -> Self {
        let Some(prev) = previous else {
            return Self {
                current,
                previous: None,
                gpu_diff: 0,
                cpu_diff: 0,
                combined_diff: 0,
                gpu_diff_percent: 0,
                cpu_diff_percent: 0,
                combined_diff_percent: 0,
                trend: Trend::First,
                message: "🎉 Your first run! The next run will be compared against this one."
                    .to_string(),
            };
        };

        let gpu_diff = current.gpu_score as i64 - prev.gpu_score as i64;
        let cpu_diff = current.cpu_score as i64 - prev.cpu_score as i64;
        let combined_diff = current.combined_score as i64 - prev.combined_score as i64;

        let gpu_diff_percent = diff_percent(gpu_diff, prev.gpu_score);
        let cpu_diff_percent = diff_percent(cpu_diff, prev.cpu_score);
        let combined_diff_percent = diff_percent(combined_diff, prev.combined_score);

        let (trend, message) = if combined_diff_percent > 5 {
            let message = if combined_diff_percent > 20 {
                format!(
                    "🚀 Huge gain! The system is {}% faster than last time.",
                    combined_diff_percent
                )
            } else if combined_diff_percent > 10 {
                format!(
                    "🔥 Great! Performance rose {}%. The driver update or tuning worked.",
                    combined_diff_percent
                )
            } else {
                format!("📈 Nice progress! The system runs {}% faster.", combined_diff_percent)
            };
            (Trend::Improved, message)
        } else if combined_diff_percent < -5 {
            let drop = combined_diff_percent.abs();
            let message = if combined_diff_percent < -20 {
                format!("⚠️ Warning! Performance dropped {}%. Check background applications.", drop)
            } else if combined_diff_percent < -10 {
                format!("📉 Performance drop: {}% slower. Thermal throttling is possible.", drop)
            } else {
                format!("↘️ Slight drop ({}%). Could be normal variation.", drop)
            };
            (Trend::Regressed, message)
        } else {
            (Trend::Stable, pick(STABLE_MESSAGES, rng).to_string())
        };

        Self {
            current,
            previous: Some(prev),
            gpu_diff,
            cpu_diff,
            combined_diff,
            gpu_diff_percent,
            cpu_diff_percent,
            combined_diff_percent,
            trend,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn entry(gpu: u64, cpu: u64) -> ScoreEntry {
        ScoreEntry::new(gpu, cpu, 1_700_000_000_000, "14 Nov 2023 22:13", None)
    }

    #[test]
    fn test_entry_serializes_camel_case() {
        let json = serde_json::to_value(entry(100, 50)).unwrap();
        assert_eq!(json["gpuScore"], 100);
        assert_eq!(json["cpuScore"], 50);
        assert_eq!(json["combinedScore"], 75);
        assert!(json.get("browserInfo").is_none());
    }

    #[test]
    fn test_entry_reads_stored_layout() {
        let raw = r#"{"gpuScore":10,"cpuScore":20,"combinedScore":15,"timestamp":1,"date":"x","browserInfo":"Safari/605.1.15"}"#;
        let parsed: ScoreEntry = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.browser_info.as_deref(), Some("Safari/605.1.15"));
    }

    #[test]
    fn test_first_comparison() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let cmp = ScoreComparison::between(entry(100, 100), None, &mut rng);
        assert_eq!(cmp.trend, Trend::First);
        assert_eq!(cmp.combined_diff_percent, 0);
    }

    #[test]
    fn test_improved_and_regressed() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let cmp = ScoreComparison::between(entry(130, 130), Some(entry(100, 100)), &mut rng);
        assert_eq!(cmp.trend, Trend::Improved);
        assert_eq!(cmp.combined_diff_percent, 30);
        assert_eq!(cmp.gpu_diff, 30);

        let cmp = ScoreComparison::between(entry(80, 80), Some(entry(100, 100)), &mut rng);
        assert_eq!(cmp.trend, Trend::Regressed);
        assert_eq!(cmp.combined_diff_percent, -20);
    }

    #[test]
    fn test_stable_within_five_percent() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let cmp = ScoreComparison::between(entry(105, 105), Some(entry(100, 100)), &mut rng);
        assert_eq!(cmp.trend, Trend::Stable);
        assert!(STABLE_MESSAGES.contains(&cmp.message.as_str()));
    }

    #[test]
    fn test_zero_previous_yields_zero_percent() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let cmp = ScoreComparison::between(entry(100, 0), Some(entry(0, 0)), &mut rng);
        assert_eq!(cmp.gpu_diff_percent, 0);
        assert_eq!(cmp.combined_diff_percent, 0);
        assert_eq!(cmp.trend, Trend::Stable);
    }
}
