use serde::{Deserialize, Serialize};

use crate::{Result, RigBurnError};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CpuSuiteConfig {
    pub workload_duration_ms: u64,
    pub pause_ms: u64,
    pub fibonacci_n: u32,
    pub matrix_size: usize,
    pub sort_length: usize,
    /// Display scaling applied to the raw ops sum.
    pub score_divisor: f64,
    /// Seed for matrix and sort input data; entropy when unset.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for CpuSuiteConfig {
    fn default() -> Self {
        Self {
            workload_duration_ms: 1_000,
            pause_ms: 200,
            fibonacci_n: 25,
            matrix_size: 50,
            sort_length: 10_000,
            score_divisor: 1_000.0,
            seed: None,
        }
    }
}

impl CpuSuiteConfig {
    pub fn validate(&self) -> Result<()> {
        if self.workload_duration_ms == 0 {
            return Err(RigBurnError::Config(
                "cpu.workload_duration_ms must be > 0".into(),
            ));
        }
        if self.matrix_size == 0 || self.sort_length == 0 {
            return Err(RigBurnError::Config(
                "cpu.matrix_size and cpu.sort_length must be > 0".into(),
            ));
        }
        if self.score_divisor <= 0.0 {
            return Err(RigBurnError::Config("cpu.score_divisor must be > 0".into()));
        }
        Ok(())
    }
}
