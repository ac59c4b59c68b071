//! Timed single-threaded workloads. Each runs its kernel repeatedly until the
//! budget is spent and reports a throughput figure.

use std::hint::black_box;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rigburn_core::{CpuSuiteConfig, Result, WorkloadKind};

pub trait Workload: Send + Sync {
    fn kind(&self) -> WorkloadKind;

    /// Run for roughly `budget` and return the raw sub-score.
    fn run(&self, budget: Duration) -> Result<f64>;
}

fn data_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

fn per_second(units: f64, start: Instant) -> f64 {
    let secs = start.elapsed().as_secs_f64();
    if secs <= 0.0 {
        return 0.0;
    }
    (units / secs).round()
}

pub struct Fibonacci {
    pub n: u32,
}

fn fib(n: u32) -> u64 {
    if n <= 1 {
        return n as u64;
    }
    fib(n - 1) + fib(n - 2)
}

impl Workload for Fibonacci {
    fn kind(&self) -> WorkloadKind {
        WorkloadKind::Fibonacci
    }

    fn run(&self, budget: Duration) -> Result<f64> {
        let start = Instant::now();
        let mut iterations = 0u64;
        while start.elapsed() < budget {
            black_box(fib(black_box(self.n)));
            iterations += 1;
        }
        Ok(per_second(iterations as f64, start))
    }
}

/// Counts primes found by trial division within the budget. Not a rate.
pub struct PrimeScan;

fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    let mut i = 2;
    while i * i <= n {
        if n % i == 0 {
            return false;
        }
        i += 1;
    }
    true
}

impl Workload for PrimeScan {
    fn kind(&self) -> WorkloadKind {
        WorkloadKind::PrimeScan
    }

    fn run(&self, budget: Duration) -> Result<f64> {
        let start = Instant::now();
        let mut found = 0u64;
        let mut candidate = 2u64;
        while start.elapsed() < budget {
            if is_prime(black_box(candidate)) {
                found += 1;
            }
            candidate += 1;
        }
        Ok(found as f64)
    }
}

pub struct MatrixMultiply {
    pub size: usize,
    pub seed: Option<u64>,
}

fn random_matrix(rng: &mut ChaCha8Rng, size: usize) -> Vec<f64> {
    (0..size * size).map(|_| rng.gen::<f64>()).collect()
}

fn multiply(a: &[f64], b: &[f64], out: &mut [f64], size: usize) {
    out.fill(0.0);
    for i in 0..size {
        for j in 0..size {
            let mut acc = 0.0;
            for k in 0..size {
                acc += a[i * size + k] * b[k * size + j];
            }
            out[i * size + j] = acc;
        }
    }
}

impl Workload for MatrixMultiply {
    fn kind(&self) -> WorkloadKind {
        WorkloadKind::MatrixMultiply
    }

    fn run(&self, budget: Duration) -> Result<f64> {
        let mut rng = data_rng(self.seed);
        let mut out = vec![0.0; self.size * self.size];
        let start = Instant::now();
        let mut multiplications = 0u64;
        while start.elapsed() < budget {
            let a = random_matrix(&mut rng, self.size);
            let b = random_matrix(&mut rng, self.size);
            multiply(&a, &b, &mut out, self.size);
            black_box(&out);
            multiplications += 1;
        }
        let flops = multiplications as f64 * (self.size as f64).powi(3);
        Ok(per_second(flops, start))
    }
}

pub struct ArraySort {
    pub length: usize,
    pub seed: Option<u64>,
}

impl Workload for ArraySort {
    fn kind(&self) -> WorkloadKind {
        WorkloadKind::ArraySort
    }

    fn run(&self, budget: Duration) -> Result<f64> {
        let mut rng = data_rng(self.seed);
        let start = Instant::now();
        let mut sorts = 0u64;
        while start.elapsed() < budget {
            let mut values: Vec<f64> = (0..self.length).map(|_| rng.gen()).collect();
            values.sort_by(f64::total_cmp);
            black_box(&values);
            sorts += 1;
        }
        Ok(per_second((sorts * self.length as u64) as f64, start))
    }
}

/// The four workloads in suite order.
pub fn default_suite(config: &CpuSuiteConfig) -> Vec<Arc<dyn Workload>> {
    vec![
        Arc::new(Fibonacci { n: config.fibonacci_n }),
        Arc::new(PrimeScan),
        Arc::new(MatrixMultiply {
            size: config.matrix_size,
            seed: config.seed,
        }),
        Arc::new(ArraySort {
            length: config.sort_length,
            seed: config.seed,
        }),
    ]
}
