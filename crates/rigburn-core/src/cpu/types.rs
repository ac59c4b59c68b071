use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkloadKind {
    Fibonacci,
    PrimeScan,
    MatrixMultiply,
    ArraySort,
}

impl WorkloadKind {
    pub fn label(&self) -> &'static str {
        match self {
            WorkloadKind::Fibonacci => "Fibonacci",
            WorkloadKind::PrimeScan => "Prime Search",
            WorkloadKind::MatrixMultiply => "Matrix Multiply",
            WorkloadKind::ArraySort => "Array Sort",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            WorkloadKind::Fibonacci => "iter/s",
            WorkloadKind::PrimeScan => "primes",
            WorkloadKind::MatrixMultiply => "flop/s",
            WorkloadKind::ArraySort => "elem/s",
        }
    }

    pub fn all() -> &'static [WorkloadKind] {
        &[
            WorkloadKind::Fibonacci,
            WorkloadKind::PrimeScan,
            WorkloadKind::MatrixMultiply,
            WorkloadKind::ArraySort,
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkloadScore {
    pub kind: WorkloadKind,
    pub score: f64,
    pub elapsed_ms: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CpuBenchmarkResult {
    /// Scaled display score.
    pub score: u64,
    pub duration_ms: u64,
    /// Raw unscaled sum of all sub-scores.
    pub ops: f64,
    pub workloads: Vec<WorkloadScore>,
}

impl CpuBenchmarkResult {
    pub fn from_workloads(workloads: Vec<WorkloadScore>, duration_ms: u64, divisor: f64) -> Self {
        let ops: f64 = workloads.iter().map(|w| w.score).sum();
        Self {
            score: (ops / divisor).round().max(0.0) as u64,
            duration_ms,
            ops,
            workloads,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(kind: WorkloadKind, score: f64) -> WorkloadScore {
        WorkloadScore {
            kind,
            score,
            elapsed_ms: 1000.0,
        }
    }

    #[test]
    fn test_four_equal_scores_scale_to_400() {
        let workloads = WorkloadKind::all()
            .iter()
            .map(|k| score(*k, 100_000.0))
            .collect();
        let result = CpuBenchmarkResult::from_workloads(workloads, 4_800, 1_000.0);
        assert_eq!(result.score, 400);
        assert_eq!(result.ops, 400_000.0);
        assert_eq!(result.duration_ms, 4_800);
    }

    #[test]
    fn test_score_rounds_half_up() {
        let result = CpuBenchmarkResult::from_workloads(
            vec![score(WorkloadKind::Fibonacci, 1_500.0)],
            1_000,
            1_000.0,
        );
        assert_eq!(result.score, 2);
    }
}
