use std::future::Future;
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use std::thread;

use tokio::runtime::Runtime;
use tokio::sync::mpsc as tokio_mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument};

use rigburn_benchmark::{
    CpuBenchmarkEvent, CpuSuiteRunner, GpuBenchmarkEvent, GpuStressRunner, SoftwareRenderer,
};
use rigburn_core::{CpuSuiteConfig, GpuStressConfig};

/// Runs benchmarks on a background thread with its own runtime and hands
/// events back over a std channel.
pub struct BenchmarkService {
    gpu: GpuStressConfig,
    cpu: CpuSuiteConfig,
}

impl BenchmarkService {
    pub fn new(gpu: GpuStressConfig, cpu: CpuSuiteConfig) -> Self {
        Self { gpu, cpu }
    }

    /// Start the GPU load ramp on the software renderer.
    #[instrument(skip(self), fields(max_instances = self.gpu.max_instances))]
    pub fn run_gpu_streaming(&self) -> (Receiver<GpuBenchmarkEvent>, Arc<CancellationToken>) {
        info!("Starting streaming GPU benchmark");

        let cancel_token = Arc::new(CancellationToken::new());
        let runner_cancel = (*cancel_token).clone();
        let runner = GpuStressRunner::new(self.gpu.clone());

        let rx = stream_on_thread(
            |message| GpuBenchmarkEvent::Error { message },
            move |tx| async move {
                let mut renderer = SoftwareRenderer::new();
                runner.run_streaming(&mut renderer, runner_cancel, tx).await;
            },
        );

        (rx, cancel_token)
    }

    /// Start the CPU suite. It cannot be cancelled once started.
    #[instrument(skip(self))]
    pub fn run_cpu_streaming(&self) -> Receiver<CpuBenchmarkEvent> {
        info!("Starting streaming CPU benchmark");

        let runner = CpuSuiteRunner::new(self.cpu.clone());
        stream_on_thread(
            |message| CpuBenchmarkEvent::Error { message },
            move |tx| async move {
                runner.run_streaming(tx).await;
            },
        )
    }

    /// Cancel a running GPU benchmark
    pub fn cancel(token: &CancellationToken) {
        info!("Cancelling benchmark");
        token.cancel();
    }
}

fn stream_on_thread<E, F, Fut>(error_event: fn(String) -> E, task: F) -> Receiver<E>
where
    E: Send + 'static,
    F: FnOnce(tokio_mpsc::Sender<E>) -> Fut + Send + 'static,
    Fut: Future<Output = ()>,
{
    let (std_tx, std_rx) = channel();

    thread::spawn(move || {
        let rt = match Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                error!("Failed to create tokio runtime: {}", e);
                let _ = std_tx.send(error_event(format!("Runtime error: {}", e)));
                return;
            }
        };

        rt.block_on(async {
            let (tokio_tx, mut tokio_rx) = tokio_mpsc::channel(100);

            let forward = async {
                while let Some(event) = tokio_rx.recv().await {
                    if std_tx.send(event).is_err() {
                        debug!("Benchmark receiver dropped");
                        break;
                    }
                }
            };

            tokio::join!(task(tokio_tx), forward);
            info!("Benchmark streaming complete");
        });
    });

    std_rx
}
