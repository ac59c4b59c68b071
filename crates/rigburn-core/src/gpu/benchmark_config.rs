use serde::{Deserialize, Serialize};

use crate::{Result, RigBurnError};

/// Tiered growth constants for the load ramp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthPolicy {
    /// Below this count a flat step is added.
    pub warmup_limit: u32,
    pub warmup_step: u32,
    /// Below this count a proportional step is added.
    pub acceleration_limit: u32,
    pub acceleration_rate: f64,
    pub acceleration_base: u32,
    pub aggressive_rate: f64,
    pub aggressive_base: u32,
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        Self {
            warmup_limit: 50_000,
            warmup_step: 2_000,
            acceleration_limit: 100_000,
            acceleration_rate: 0.05,
            acceleration_base: 1_000,
            aggressive_rate: 0.10,
            aggressive_base: 2_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GpuStressConfig {
    pub max_instances: u32,
    pub seed_instances: u32,
    pub growth_interval_ms: u64,
    pub sample_interval_ms: u64,
    pub rolling_window: usize,
    pub initial_fps: f64,
    pub fps_threshold: f64,
    pub low_fps_checks: u32,
    pub max_duration_ms: u64,
    pub time_cap_bonus: f64,
    /// Frame pacing for the native loop; mirrors a 60 Hz display refresh.
    pub frame_rate_cap: u32,
    pub growth: GrowthPolicy,
}

impl Default for GpuStressConfig {
    fn default() -> Self {
        Self {
            max_instances: 500_000,
            seed_instances: 2_000,
            growth_interval_ms: 400,
            sample_interval_ms: 500,
            rolling_window: 5,
            initial_fps: 60.0,
            fps_threshold: 15.0,
            low_fps_checks: 3,
            max_duration_ms: 90_000,
            time_cap_bonus: 1.5,
            frame_rate_cap: 60,
            growth: GrowthPolicy::default(),
        }
    }
}

impl GpuStressConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_instances == 0 {
            return Err(RigBurnError::Config("gpu.max_instances must be > 0".into()));
        }
        if self.seed_instances > self.max_instances {
            return Err(RigBurnError::Config(
                "gpu.seed_instances exceeds gpu.max_instances".into(),
            ));
        }
        if self.rolling_window == 0 {
            return Err(RigBurnError::Config("gpu.rolling_window must be > 0".into()));
        }
        if self.low_fps_checks == 0 {
            return Err(RigBurnError::Config("gpu.low_fps_checks must be > 0".into()));
        }
        if self.frame_rate_cap == 0 {
            return Err(RigBurnError::Config("gpu.frame_rate_cap must be > 0".into()));
        }
        if self.time_cap_bonus < 1.0 {
            return Err(RigBurnError::Config("gpu.time_cap_bonus must be >= 1.0".into()));
        }
        Ok(())
    }
}
