mod benchmark;
mod history;
pub mod kv_store;
mod report;
mod services;
mod system;

pub use benchmark::BenchmarkService;
pub use history::{HistoryStore, ScoreHistory};
pub use kv_store::{default_db_path, KeyValueStore, MemoryKvStore, SqliteKvStore, StoreError};
pub use report::ArenaReport;
pub use services::{Services, SharedHistory};
pub use system::detect_system;

// Re-export runner events so the binary only needs this crate for streaming
pub use rigburn_benchmark::{CpuBenchmarkEvent, GpuBenchmarkEvent};
