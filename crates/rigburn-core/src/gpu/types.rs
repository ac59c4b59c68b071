use serde::{Deserialize, Serialize};

/// Why the load ramp stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Rolling FPS stayed under the threshold for consecutive checks.
    FpsCollapse,
    /// The run outlived the hard time cap; the object count gets a bonus.
    TimeCap,
}

impl FinishReason {
    pub fn label(&self) -> &'static str {
        match self {
            FinishReason::FpsCollapse => "FPS threshold reached",
            FinishReason::TimeCap => "Time cap reached (uncapped bonus)",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GpuBenchmarkResult {
    pub avg_fps: f64,
    pub min_fps: f64,
    pub max_fps: f64,
    /// Final object count, including the time-cap bonus.
    pub total_objects: u64,
    /// Live instance count when the ramp stopped.
    pub raw_objects: u64,
    pub finish_reason: FinishReason,
    pub elapsed_ms: f64,
    #[serde(default)]
    pub fps_history: Vec<f64>,
}

impl GpuBenchmarkResult {
    pub fn time_cap_reached(&self) -> bool {
        self.finish_reason == FinishReason::TimeCap
    }
}
