// Domain modules
pub mod bottleneck;
pub mod commentary;
pub mod config;
pub mod cpu;
pub mod error;
pub mod gpu;
pub mod history;
pub mod scoring;
pub mod system;

pub use bottleneck::{
    analyze as analyze_bottleneck, classify_ratio, BottleneckAnalysis, BottleneckStatus,
    BottleneckStrategy, Severity, Zone,
};
pub use commentary::{
    full_analysis, BottleneckCommentary, Commentary, Culprit, FullAnalysis,
};
pub use config::{HistoryConfig, RigBurnConfig};
pub use cpu::{CpuBenchmarkResult, CpuSuiteConfig, WorkloadKind, WorkloadScore};
pub use error::{Result, RigBurnError};
pub use gpu::{FinishReason, GpuBenchmarkResult, GpuStressConfig, GrowthPolicy};
pub use history::{ScoreComparison, ScoreEntry, Trend};
pub use scoring::{calculate_score, combined_score, get_rank, Rank, RankTier};
pub use system::{SystemSpecs, UNDETECTABLE};
