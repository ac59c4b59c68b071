use thiserror::Error;

#[derive(Error, Debug)]
pub enum RigBurnError {
    #[error("Renderer unavailable: {0}")]
    RendererUnavailable(String),

    #[error("Workload '{workload}' failed: {reason}")]
    WorkloadFailed { workload: String, reason: String },

    #[error("Benchmark cancelled")]
    Cancelled,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, RigBurnError>;
