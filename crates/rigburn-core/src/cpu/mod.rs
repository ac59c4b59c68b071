mod benchmark_config;
mod types;

pub use benchmark_config::CpuSuiteConfig;
pub use types::{CpuBenchmarkResult, WorkloadKind, WorkloadScore};
