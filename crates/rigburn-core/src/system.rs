//! Host hardware description

use serde::{Deserialize, Serialize};

/// Placeholder shown when a value cannot be detected.
pub const UNDETECTABLE: &str = "hardware undetectable";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemSpecs {
    pub logical_cores: Option<usize>,
    pub physical_cores: Option<usize>,
    pub os: String,
    pub arch: String,
}

impl SystemSpecs {
    pub fn cores_label(&self) -> String {
        match (self.logical_cores, self.physical_cores) {
            (Some(l), Some(p)) if l != p => format!("{} ({} physical)", l, p),
            (Some(l), _) => l.to_string(),
            (None, _) => UNDETECTABLE.to_string(),
        }
    }

    pub fn platform(&self) -> String {
        if self.os.is_empty() {
            return UNDETECTABLE.to_string();
        }
        format!("{}-{}", self.os, self.arch)
    }
}
