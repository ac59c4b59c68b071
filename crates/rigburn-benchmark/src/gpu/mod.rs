pub mod fps;
pub mod growth;
pub mod ramp;
pub mod renderer;
pub mod runner;

pub use fps::{summarize, FpsSummary, RollingFps};
pub use growth::{instances_to_add, GrowthSchedule};
pub use ramp::{FrameOutcome, LoadRamp, RampSample, TickAction, TICK_ORDER};
pub use renderer::{InstanceRenderer, SoftwareRenderer};
pub use runner::{GpuBenchmarkEvent, GpuStressRunner};
