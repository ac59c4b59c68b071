//! Service container
//!
//! Single entry point for the binary: benchmark runs, the shared score
//! history, and the detected host.

use std::sync::Arc;

use rand::Rng;
use rigburn_core::{
    calculate_score, BottleneckStrategy, CpuBenchmarkResult, GpuBenchmarkResult, RigBurnConfig,
    SystemSpecs,
};
use tracing::{info, warn};

use crate::kv_store::{KeyValueStore, MemoryKvStore, SqliteKvStore};
use crate::{detect_system, ArenaReport, BenchmarkService, HistoryStore, ScoreHistory};

pub type SharedHistory = Arc<ScoreHistory<Box<dyn KeyValueStore>>>;

pub struct Services {
    pub benchmark: BenchmarkService,
    pub history: SharedHistory,
    pub system: SystemSpecs,
}

impl Services {
    /// Open the SQLite-backed history at the configured (or default) path.
    ///
    /// If the database cannot be opened the history falls back to process
    /// memory, so runs still complete and compare within this process.
    pub fn new(config: &RigBurnConfig) -> Self {
        match SqliteKvStore::open(config.history.db_path.clone()) {
            Ok(store) => Self::with_store(config, Box::new(store)),
            Err(e) => {
                warn!("Score database unavailable, history will not persist: {}", e);
                Self::in_memory(config)
            }
        }
    }

    /// History that lives only as long as the process.
    pub fn in_memory(config: &RigBurnConfig) -> Self {
        Self::with_store(config, Box::new(MemoryKvStore::new()))
    }

    pub fn with_store(config: &RigBurnConfig, store: Box<dyn KeyValueStore>) -> Self {
        let system = detect_system();
        let history = ScoreHistory::new(store, &config.history).with_host_info(system.platform());

        Self {
            benchmark: BenchmarkService::new(config.gpu.clone(), config.cpu.clone()),
            history: Arc::new(history),
            system,
        }
    }

    /// Compare against the previous run, save this one, and assemble the report.
    pub fn record_run<R: Rng + ?Sized>(
        &self,
        gpu: GpuBenchmarkResult,
        cpu: CpuBenchmarkResult,
        strategy: BottleneckStrategy,
        rng: &mut R,
    ) -> ArenaReport {
        let gpu_score = calculate_score(gpu.total_objects as f64);
        let comparison = self.history.compare(gpu_score, cpu.score, rng);
        self.history.save(gpu_score, cpu.score);
        info!(gpu_score, cpu_score = cpu.score, trend = comparison.trend.as_str(), "Run recorded");

        ArenaReport::build(gpu, cpu, Some(comparison), strategy, self.system.clone(), rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rigburn_core::{FinishReason, Trend};

    fn gpu(total_objects: u64) -> GpuBenchmarkResult {
        GpuBenchmarkResult {
            avg_fps: 30.0,
            min_fps: 14.0,
            max_fps: 60.0,
            total_objects,
            raw_objects: total_objects,
            finish_reason: FinishReason::FpsCollapse,
            elapsed_ms: 20_000.0,
            fps_history: Vec::new(),
        }
    }

    fn cpu(score: u64) -> CpuBenchmarkResult {
        CpuBenchmarkResult {
            score,
            duration_ms: 4_800,
            ops: score as f64 * 1_000.0,
            workloads: Vec::new(),
        }
    }

    #[test]
    fn test_record_run_compares_then_saves() {
        let services = Services::in_memory(&RigBurnConfig::default());
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        let first = services.record_run(gpu(100_000), cpu(50_000), BottleneckStrategy::normalized(), &mut rng);
        assert_eq!(first.comparison.as_ref().unwrap().trend, Trend::First);

        let second = services.record_run(gpu(200_000), cpu(100_000), BottleneckStrategy::normalized(), &mut rng);
        let comparison = second.comparison.unwrap();
        assert_eq!(comparison.trend, Trend::Improved);
        assert_eq!(comparison.previous.unwrap().combined_score, 75_000);

        let entries = services.history.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].combined_score, 150_000);
        assert_eq!(entries[0].browser_info.as_deref(), Some(services.system.platform().as_str()));
    }

    #[test]
    fn test_sqlite_services_use_configured_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut config = RigBurnConfig::default();
        config.history.db_path = Some(dir.path().join("scores.db"));

        let services = Services::new(&config);
        services.history.save(1_000, 1_000);
        drop(services);

        let reopened = Services::new(&config);
        assert_eq!(reopened.history.entries().len(), 1);
    }

    #[test]
    fn test_unopenable_database_falls_back_to_memory() {
        let dir = tempfile::TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"plain file").unwrap();

        let mut config = RigBurnConfig::default();
        config.history.db_path = Some(blocker.join("history.db"));

        let services = Services::new(&config);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let report = services.record_run(gpu(100_000), cpu(50_000), BottleneckStrategy::normalized(), &mut rng);

        assert_eq!(report.comparison.unwrap().trend, Trend::First);
        assert_eq!(services.history.entries().len(), 1);
        assert!(!blocker.join("history.db").exists());
    }
}
