use std::time::{Duration, Instant};

use rigburn_core::{GpuBenchmarkResult, GpuStressConfig, Result, RigBurnError};
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::ramp::{FrameOutcome, LoadRamp};
use super::renderer::InstanceRenderer;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GpuBenchmarkEvent {
    Started { max_instances: u32 },
    Sample { fps: f64, instances: u64, elapsed_ms: f64 },
    Done { result: GpuBenchmarkResult },
    Cancelled,
    Error { message: String },
}

pub struct GpuStressRunner {
    config: GpuStressConfig,
}

impl GpuStressRunner {
    pub fn new(config: GpuStressConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GpuStressConfig {
        &self.config
    }

    pub async fn run<R: InstanceRenderer + ?Sized>(&self, renderer: &mut R) -> Result<GpuBenchmarkResult> {
        self.drive(renderer, &CancellationToken::new(), None).await
    }

    /// Runs the ramp to completion, streaming samples. Exactly one terminal
    /// event (`Done`, `Cancelled` or `Error`) is sent.
    pub async fn run_streaming<R: InstanceRenderer + ?Sized>(
        &self,
        renderer: &mut R,
        cancel_token: CancellationToken,
        tx: mpsc::Sender<GpuBenchmarkEvent>,
    ) {
        let _ = tx
            .send(GpuBenchmarkEvent::Started {
                max_instances: self.config.max_instances,
            })
            .await;

        let event = match self.drive(renderer, &cancel_token, Some(&tx)).await {
            Ok(result) => GpuBenchmarkEvent::Done { result },
            Err(RigBurnError::Cancelled) => GpuBenchmarkEvent::Cancelled,
            Err(e) => GpuBenchmarkEvent::Error {
                message: e.to_string(),
            },
        };
        let _ = tx.send(event).await;
    }

    async fn drive<R: InstanceRenderer + ?Sized>(
        &self,
        renderer: &mut R,
        cancel_token: &CancellationToken,
        tx: Option<&mpsc::Sender<GpuBenchmarkEvent>>,
    ) -> Result<GpuBenchmarkResult> {
        tracing::info!(
            max_instances = self.config.max_instances,
            seed = self.config.seed_instances,
            "Starting GPU load ramp"
        );

        let clock = Instant::now();
        let mut ramp = LoadRamp::start(self.config.clone(), renderer, 0.0)?;

        let frame = Duration::from_secs_f64(1.0 / self.config.frame_rate_cap as f64);
        let mut ticker = tokio::time::interval(frame);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = cancel_token.cancelled() => {
                    renderer.release();
                    tracing::info!("GPU load ramp cancelled");
                    return Err(RigBurnError::Cancelled);
                }
                _ = ticker.tick() => {}
            }

            let now_ms = clock.elapsed().as_secs_f64() * 1000.0;
            let outcome = match ramp.on_frame(now_ms, renderer) {
                Ok(outcome) => outcome,
                Err(e) => {
                    renderer.release();
                    return Err(e);
                }
            };

            match outcome {
                FrameOutcome::Finished(result) => return Ok(result),
                FrameOutcome::Running { sample: Some(sample) } => {
                    tracing::debug!(fps = sample.fps, instances = sample.instances, "FPS sample");
                    if let Some(tx) = tx {
                        let _ = tx
                            .send(GpuBenchmarkEvent::Sample {
                                fps: sample.fps,
                                instances: sample.instances,
                                elapsed_ms: sample.elapsed_ms,
                            })
                            .await;
                    }
                }
                FrameOutcome::Running { sample: None } => {}
            }
        }
    }
}
