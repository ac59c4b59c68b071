use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{CpuSuiteConfig, GpuStressConfig, Result, RigBurnError};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RigBurnConfig {
    #[serde(default)]
    pub gpu: GpuStressConfig,
    #[serde(default)]
    pub cpu: CpuSuiteConfig,
    #[serde(default)]
    pub history: HistoryConfig,
}

impl RigBurnConfig {
    /// Read a JSON config file; missing sections fall back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: RigBurnConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.gpu.validate()?;
        self.cpu.validate()?;
        self.history.validate()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub storage_key: String,
    pub max_entries: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_path: Option<PathBuf>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            storage_key: "rigburn_history".to_string(),
            max_entries: 10,
            db_path: None,
        }
    }
}

impl HistoryConfig {
    pub fn validate(&self) -> Result<()> {
        if self.storage_key.is_empty() {
            return Err(RigBurnError::Config("history.storage_key is empty".into()));
        }
        if self.max_entries == 0 {
            return Err(RigBurnError::Config("history.max_entries must be > 0".into()));
        }
        Ok(())
    }
}
