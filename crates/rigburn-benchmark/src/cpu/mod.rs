pub mod runner;
pub mod workloads;

pub use runner::{CpuBenchmarkEvent, CpuSuiteRunner};
pub use workloads::{default_suite, ArraySort, Fibonacci, MatrixMultiply, PrimeScan, Workload};
