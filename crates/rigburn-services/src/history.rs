use chrono::{DateTime, Local};
use rand::Rng;
use rigburn_core::{HistoryConfig, ScoreComparison, ScoreEntry};
use tracing::{debug, instrument, warn};

use crate::kv_store::KeyValueStore;

/// Most-recent-first score history. Storage problems never surface to the
/// caller: reads degrade to empty and writes to no-ops.
pub trait HistoryStore: Send + Sync {
    fn entries(&self) -> Vec<ScoreEntry>;

    fn previous(&self) -> Option<ScoreEntry> {
        self.entries().into_iter().next()
    }

    /// Record a run and return the entry that was built for it.
    fn save(&self, gpu_score: u64, cpu_score: u64) -> ScoreEntry;

    fn clear(&self);
}

/// History stored as one JSON array under a single key.
pub struct ScoreHistory<S: KeyValueStore> {
    store: S,
    key: String,
    max_entries: usize,
    host_info: Option<String>,
}

fn entry_date(now: &DateTime<Local>) -> String {
    now.format("%-d %b %Y %H:%M").to_string()
}

impl<S: KeyValueStore> ScoreHistory<S> {
    pub fn new(store: S, config: &HistoryConfig) -> Self {
        Self {
            store,
            key: config.storage_key.clone(),
            max_entries: config.max_entries,
            host_info: None,
        }
    }

    /// Tag saved entries with a host description.
    pub fn with_host_info(mut self, host_info: impl Into<String>) -> Self {
        self.host_info = Some(host_info.into());
        self
    }

    /// Compare a fresh run against the previous entry without saving it.
    pub fn compare<R: Rng + ?Sized>(&self, gpu_score: u64, cpu_score: u64, rng: &mut R) -> ScoreComparison {
        let now = Local::now();
        let current = ScoreEntry::new(
            gpu_score,
            cpu_score,
            now.timestamp_millis(),
            now.format("%-d %b %Y").to_string(),
            None,
        );
        ScoreComparison::between(current, self.previous(), rng)
    }

    /// Formatted date of the previous run, if any.
    pub fn time_since_last(&self) -> Option<String> {
        self.previous().map(|entry| entry.date)
    }

    fn write(&self, entries: &[ScoreEntry]) {
        let json = match serde_json::to_string(entries) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize score history: {}", e);
                return;
            }
        };
        if let Err(e) = self.store.set(&self.key, &json) {
            warn!("Failed to save score history: {}", e);
        }
    }
}

impl<S: KeyValueStore> HistoryStore for ScoreHistory<S> {
    fn entries(&self) -> Vec<ScoreEntry> {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("Score history unavailable: {}", e);
                return Vec::new();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!("Failed to parse score history: {}", e);
            Vec::new()
        })
    }

    #[instrument(skip(self))]
    fn save(&self, gpu_score: u64, cpu_score: u64) -> ScoreEntry {
        let now = Local::now();
        let entry = ScoreEntry::new(
            gpu_score,
            cpu_score,
            now.timestamp_millis(),
            entry_date(&now),
            self.host_info.clone(),
        );

        let mut entries = self.entries();
        entries.insert(0, entry.clone());
        entries.truncate(self.max_entries);
        self.write(&entries);

        debug!(combined = entry.combined_score, stored = entries.len(), "Score saved");
        entry
    }

    fn clear(&self) {
        if let Err(e) = self.store.remove(&self.key) {
            warn!("Failed to clear score history: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv_store::{MemoryKvStore, Result as StoreResult, SqliteKvStore, StoreError};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rigburn_core::Trend;
    use std::sync::Arc;

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> StoreResult<Option<String>> {
            Err(StoreError::Unavailable("disabled".into()))
        }
        fn set(&self, _key: &str, _value: &str) -> StoreResult<()> {
            Err(StoreError::Unavailable("disabled".into()))
        }
        fn remove(&self, _key: &str) -> StoreResult<()> {
            Err(StoreError::Unavailable("disabled".into()))
        }
    }

    fn memory_history() -> ScoreHistory<MemoryKvStore> {
        ScoreHistory::new(MemoryKvStore::new(), &HistoryConfig::default())
    }

    #[test]
    fn test_empty_history() {
        let history = memory_history();
        assert!(history.entries().is_empty());
        assert!(history.previous().is_none());
        assert!(history.time_since_last().is_none());
    }

    #[test]
    fn test_save_then_previous() {
        let history = memory_history().with_host_info("linux-x86_64");
        let saved = history.save(120_000, 45_000);

        let previous = history.previous().unwrap();
        assert_eq!(previous, saved);
        assert_eq!(previous.combined_score, 82_500);
        assert_eq!(previous.browser_info.as_deref(), Some("linux-x86_64"));
        assert_eq!(history.time_since_last(), Some(saved.date));
    }

    #[test]
    fn test_eleven_saves_keep_ten_most_recent() {
        let history = memory_history();
        for i in 0..11u64 {
            history.save(i * 1_000, i * 100);
        }

        let entries = history.entries();
        assert_eq!(entries.len(), 10);
        assert_eq!(entries[0].gpu_score, 10_000);
        // the first save (gpu 0) was evicted
        assert_eq!(entries[9].gpu_score, 1_000);
    }

    #[test]
    fn test_clear() {
        let history = memory_history();
        history.save(1, 1);
        history.clear();
        assert!(history.entries().is_empty());
    }

    #[test]
    fn test_stored_json_layout() {
        let store = Arc::new(MemoryKvStore::new());
        let history = ScoreHistory::new(Arc::clone(&store), &HistoryConfig::default());
        history.save(10, 20);

        let raw = store.get("rigburn_history").unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let first = &value[0];
        assert_eq!(first["gpuScore"], 10);
        assert_eq!(first["cpuScore"], 20);
        assert_eq!(first["combinedScore"], 15);
        assert!(first["timestamp"].is_i64());
        assert!(first.get("browserInfo").is_none());
    }

    #[test]
    fn test_corrupt_data_reads_as_empty() {
        let store = Arc::new(MemoryKvStore::new());
        store.set("rigburn_history", "{not json").unwrap();
        let history = ScoreHistory::new(Arc::clone(&store), &HistoryConfig::default());

        assert!(history.entries().is_empty());
        history.save(5, 5);
        assert_eq!(history.entries().len(), 1);
    }

    #[test]
    fn test_unavailable_storage_degrades() {
        let history = ScoreHistory::new(BrokenStore, &HistoryConfig::default());
        let entry = history.save(100, 200);
        assert_eq!(entry.combined_score, 150);
        assert!(history.entries().is_empty());
        assert!(history.previous().is_none());
        history.clear();
    }

    #[test]
    fn test_compare_against_previous() {
        let history = memory_history();
        let mut rng = ChaCha8Rng::seed_from_u64(9);

        let first = history.compare(100_000, 100_000, &mut rng);
        assert_eq!(first.trend, Trend::First);

        history.save(100_000, 100_000);
        let better = history.compare(130_000, 130_000, &mut rng);
        assert_eq!(better.trend, Trend::Improved);
        assert_eq!(better.combined_diff_percent, 30);

        let same = history.compare(102_000, 100_000, &mut rng);
        assert_eq!(same.trend, Trend::Stable);

        let worse = history.compare(80_000, 80_000, &mut rng);
        assert_eq!(worse.trend, Trend::Regressed);
        // compare never writes
        assert_eq!(history.entries().len(), 1);
    }

    #[test]
    fn test_sqlite_backed_history() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = HistoryConfig::default();
        let path = dir.path().join("history.db");

        ScoreHistory::new(SqliteKvStore::open(Some(path.clone())).unwrap(), &config).save(7, 9);

        let reopened = ScoreHistory::new(SqliteKvStore::open(Some(path)).unwrap(), &config);
        assert_eq!(reopened.previous().unwrap().combined_score, 8);
    }
}
