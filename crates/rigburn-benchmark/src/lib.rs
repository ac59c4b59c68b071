pub mod cpu;
pub mod gpu;

pub use cpu::{CpuBenchmarkEvent, CpuSuiteRunner, Workload};
pub use gpu::{
    GpuBenchmarkEvent, GpuStressRunner, InstanceRenderer, LoadRamp, SoftwareRenderer, TICK_ORDER,
};
