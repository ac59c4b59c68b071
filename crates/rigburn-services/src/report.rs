use rand::Rng;
use rigburn_core::{
    analyze_bottleneck, calculate_score, combined_score, full_analysis, get_rank,
    BottleneckAnalysis, BottleneckStrategy, CpuBenchmarkResult, FullAnalysis, GpuBenchmarkResult,
    Rank, ScoreComparison, SystemSpecs,
};
use serde::Serialize;

/// Everything shown after a full run.
#[derive(Debug, Clone, Serialize)]
pub struct ArenaReport {
    pub gpu_score: u64,
    pub cpu_score: u64,
    pub combined_score: u64,
    /// Rank of the GPU score.
    pub rank: Rank,
    pub gpu: GpuBenchmarkResult,
    pub cpu: CpuBenchmarkResult,
    /// Balance analysis under the caller's strategy.
    pub bottleneck: BottleneckAnalysis,
    /// Commentary, including the culprit analysis against fixed baselines.
    pub commentary: FullAnalysis,
    pub comparison: Option<ScoreComparison>,
    pub system: SystemSpecs,
}

impl ArenaReport {
    pub fn build<R: Rng + ?Sized>(
        gpu: GpuBenchmarkResult,
        cpu: CpuBenchmarkResult,
        comparison: Option<ScoreComparison>,
        strategy: BottleneckStrategy,
        system: SystemSpecs,
        rng: &mut R,
    ) -> Self {
        let gpu_score = calculate_score(gpu.total_objects as f64);
        let cpu_score = cpu.score;
        let previous_combined = comparison
            .as_ref()
            .and_then(|c| c.previous.as_ref())
            .map(|p| p.combined_score);

        Self {
            gpu_score,
            cpu_score,
            combined_score: combined_score(gpu_score, cpu_score),
            rank: get_rank(gpu_score),
            bottleneck: analyze_bottleneck(strategy, gpu_score, cpu_score),
            commentary: full_analysis(gpu_score, cpu_score, previous_combined, rng),
            gpu,
            cpu,
            comparison,
            system,
        }
    }
}
