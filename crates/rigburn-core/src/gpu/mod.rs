mod benchmark_config;
mod types;

pub use benchmark_config::{GpuStressConfig, GrowthPolicy};
pub use types::{FinishReason, GpuBenchmarkResult};
