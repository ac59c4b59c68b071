use std::collections::VecDeque;

/// Rolling FPS over the last few frame intervals.
#[derive(Debug, Clone)]
pub struct RollingFps {
    samples: VecDeque<f64>,
    window: usize,
    current: f64,
}

impl RollingFps {
    pub fn new(window: usize, initial_fps: f64) -> Self {
        Self {
            samples: VecDeque::with_capacity(window),
            window: window.max(1),
            current: initial_fps,
        }
    }

    /// Feed one frame delta. Non-positive deltas are ignored.
    pub fn record(&mut self, frame_delta_ms: f64) -> f64 {
        if frame_delta_ms > 0.0 {
            self.samples.push_back(1000.0 / frame_delta_ms);
            if self.samples.len() > self.window {
                self.samples.pop_front();
            }
            let sum: f64 = self.samples.iter().sum();
            self.current = (sum / self.samples.len() as f64).round();
        }
        self.current
    }

    pub fn current(&self) -> f64 {
        self.current
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FpsSummary {
    pub avg: f64,
    pub min: f64,
    pub max: f64,
}

/// Average, min and max over the sampled history; `fallback` when empty.
pub fn summarize(history: &[f64], fallback: f64) -> FpsSummary {
    if history.is_empty() {
        return FpsSummary {
            avg: fallback,
            min: fallback,
            max: fallback,
        };
    }

    let avg = history.iter().sum::<f64>() / history.len() as f64;
    let min = history.iter().copied().fold(f64::INFINITY, f64::min);
    let max = history.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    FpsSummary { avg, min, max }
}
