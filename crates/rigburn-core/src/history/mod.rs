mod types;

pub use types::{ScoreComparison, ScoreEntry, Trend};
