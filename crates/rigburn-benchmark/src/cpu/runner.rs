use std::sync::Arc;
use std::time::{Duration, Instant};

use rigburn_core::{CpuBenchmarkResult, CpuSuiteConfig, Result, RigBurnError, WorkloadKind, WorkloadScore};
use serde::Serialize;
use tokio::sync::mpsc;

use super::workloads::{default_suite, Workload};

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CpuBenchmarkEvent {
    WorkloadStarted { kind: WorkloadKind, current: u32, total: u32 },
    WorkloadComplete { kind: WorkloadKind, score: f64, progress: u32 },
    Done { result: CpuBenchmarkResult },
    Error { message: String },
}

pub struct CpuSuiteRunner {
    config: CpuSuiteConfig,
    workloads: Vec<Arc<dyn Workload>>,
}

impl CpuSuiteRunner {
    pub fn new(config: CpuSuiteConfig) -> Self {
        let workloads = default_suite(&config);
        Self { config, workloads }
    }

    pub fn with_workloads(config: CpuSuiteConfig, workloads: Vec<Arc<dyn Workload>>) -> Self {
        Self { config, workloads }
    }

    pub async fn run(&self) -> Result<CpuBenchmarkResult> {
        self.drive(None).await
    }

    /// Runs every workload in order. The suite cannot be cancelled once started.
    pub async fn run_streaming(&self, tx: mpsc::Sender<CpuBenchmarkEvent>) {
        let event = match self.drive(Some(&tx)).await {
            Ok(result) => CpuBenchmarkEvent::Done { result },
            Err(e) => CpuBenchmarkEvent::Error {
                message: e.to_string(),
            },
        };
        let _ = tx.send(event).await;
    }

    async fn drive(&self, tx: Option<&mpsc::Sender<CpuBenchmarkEvent>>) -> Result<CpuBenchmarkResult> {
        self.config.validate()?;

        let total = self.workloads.len() as u32;
        let budget = Duration::from_millis(self.config.workload_duration_ms);
        let pause = Duration::from_millis(self.config.pause_ms);
        let start = Instant::now();
        let mut scores = Vec::with_capacity(self.workloads.len());

        tracing::info!(workloads = total, "Starting CPU suite");

        for (idx, workload) in self.workloads.iter().enumerate() {
            let kind = workload.kind();
            if let Some(tx) = tx {
                let _ = tx
                    .send(CpuBenchmarkEvent::WorkloadStarted {
                        kind,
                        current: idx as u32 + 1,
                        total,
                    })
                    .await;
            }

            let score = run_workload(Arc::clone(workload), budget).await?;
            tracing::debug!(workload = kind.label(), score = score.score, "Workload complete");

            if let Some(tx) = tx {
                let _ = tx
                    .send(CpuBenchmarkEvent::WorkloadComplete {
                        kind,
                        score: score.score,
                        progress: (idx as u32 + 1) * 100 / total,
                    })
                    .await;
            }
            scores.push(score);

            tokio::time::sleep(pause).await;
        }

        let duration_ms = start.elapsed().as_millis() as u64;
        let result = CpuBenchmarkResult::from_workloads(scores, duration_ms, self.config.score_divisor);
        tracing::info!(score = result.score, ops = result.ops, duration_ms, "CPU suite finished");
        Ok(result)
    }
}

async fn run_workload(workload: Arc<dyn Workload>, budget: Duration) -> Result<WorkloadScore> {
    let kind = workload.kind();
    let started = Instant::now();

    let outcome = tokio::task::spawn_blocking(move || workload.run(budget)).await;
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

    let score = match outcome {
        Ok(Ok(score)) => score,
        Ok(Err(e)) => {
            tracing::warn!(workload = kind.label(), "Workload failed: {}", e);
            return Err(RigBurnError::WorkloadFailed {
                workload: kind.label().to_string(),
                reason: e.to_string(),
            });
        }
        Err(join_err) => {
            tracing::warn!(workload = kind.label(), "Workload panicked: {}", join_err);
            return Err(RigBurnError::WorkloadFailed {
                workload: kind.label().to_string(),
                reason: join_err.to_string(),
            });
        }
    };

    Ok(WorkloadScore {
        kind,
        score,
        elapsed_ms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Fixed {
        kind: WorkloadKind,
        score: f64,
        runs: Arc<AtomicUsize>,
    }

    impl Workload for Fixed {
        fn kind(&self) -> WorkloadKind {
            self.kind
        }
        fn run(&self, _budget: Duration) -> Result<f64> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            Ok(self.score)
        }
    }

    struct Failing;

    impl Workload for Failing {
        fn kind(&self) -> WorkloadKind {
            WorkloadKind::PrimeScan
        }
        fn run(&self, _budget: Duration) -> Result<f64> {
            Err(RigBurnError::Config("boom".into()))
        }
    }

    struct Panicking;

    impl Workload for Panicking {
        fn kind(&self) -> WorkloadKind {
            WorkloadKind::MatrixMultiply
        }
        fn run(&self, _budget: Duration) -> Result<f64> {
            panic!("kernel blew up");
        }
    }

    fn quick() -> CpuSuiteConfig {
        CpuSuiteConfig {
            pause_ms: 1,
            ..Default::default()
        }
    }

    fn fixed_suite(score: f64, runs: &Arc<AtomicUsize>) -> Vec<Arc<dyn Workload>> {
        WorkloadKind::all()
            .iter()
            .map(|&kind| {
                Arc::new(Fixed {
                    kind,
                    score,
                    runs: Arc::clone(runs),
                }) as Arc<dyn Workload>
            })
            .collect()
    }

    #[tokio::test]
    async fn test_four_hundred_k_scores_four_hundred() {
        let runs = Arc::new(AtomicUsize::new(0));
        let runner = CpuSuiteRunner::with_workloads(quick(), fixed_suite(100_000.0, &runs));

        let result = runner.run().await.unwrap();
        assert_eq!(result.score, 400);
        assert_eq!(result.ops, 400_000.0);
        assert_eq!(result.workloads.len(), 4);
        assert_eq!(runs.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_streaming_progress() {
        let runs = Arc::new(AtomicUsize::new(0));
        let runner = CpuSuiteRunner::with_workloads(quick(), fixed_suite(1_000.0, &runs));
        let (tx, mut rx) = mpsc::channel(64);

        runner.run_streaming(tx).await;

        let mut progress = Vec::new();
        let mut done = None;
        while let Some(event) = rx.recv().await {
            match event {
                CpuBenchmarkEvent::WorkloadComplete { progress: p, .. } => progress.push(p),
                CpuBenchmarkEvent::Done { result } => done = Some(result),
                _ => {}
            }
        }
        assert_eq!(progress, vec![25, 50, 75, 100]);
        assert_eq!(done.unwrap().score, 4);
    }

    #[tokio::test]
    async fn test_failure_aborts_suite() {
        let runs = Arc::new(AtomicUsize::new(0));
        let mut workloads = fixed_suite(1_000.0, &runs);
        workloads[1] = Arc::new(Failing);
        let runner = CpuSuiteRunner::with_workloads(quick(), workloads);

        let err = runner.run().await.unwrap_err();
        match err {
            RigBurnError::WorkloadFailed { workload, reason } => {
                assert_eq!(workload, "Prime Search");
                assert!(reason.contains("boom"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        // workloads after the failure never ran
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_panic_aborts_suite_with_error_event() {
        let runs = Arc::new(AtomicUsize::new(0));
        let mut workloads = fixed_suite(1_000.0, &runs);
        workloads[2] = Arc::new(Panicking);
        let runner = CpuSuiteRunner::with_workloads(quick(), workloads);
        let (tx, mut rx) = mpsc::channel(64);

        runner.run_streaming(tx).await;

        let mut last = None;
        while let Some(event) = rx.recv().await {
            last = Some(event);
        }
        match last {
            Some(CpuBenchmarkEvent::Error { message }) => assert!(message.contains("Matrix Multiply")),
            other => panic!("unexpected terminal event: {:?}", other),
        }
        assert_eq!(runs.load(Ordering::SeqCst), 2);
    }
}
