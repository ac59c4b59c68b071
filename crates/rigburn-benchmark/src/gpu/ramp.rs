use rigburn_core::{FinishReason, GpuBenchmarkResult, GpuStressConfig, Result};
use serde::Serialize;

use super::fps::{summarize, RollingFps};
use super::growth::GrowthSchedule;
use super::renderer::InstanceRenderer;

/// Steps of a single frame, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickAction {
    Grow,
    CheckTimeCap,
    Update,
    Render,
    Measure,
}

pub const TICK_ORDER: [TickAction; 5] = [
    TickAction::Grow,
    TickAction::CheckTimeCap,
    TickAction::Update,
    TickAction::Render,
    TickAction::Measure,
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RampSample {
    pub fps: f64,
    pub instances: u64,
    pub elapsed_ms: f64,
}

#[derive(Debug, Clone)]
pub enum FrameOutcome {
    /// Still ramping. `sample` is set on frames that hit the sampling interval.
    Running { sample: Option<RampSample> },
    Finished(GpuBenchmarkResult),
}

/// Adaptive load ramp: grows the instance count until the frame rate collapses
/// or the time cap fires.
#[derive(Debug)]
pub struct LoadRamp {
    config: GpuStressConfig,
    growth: GrowthSchedule,
    fps: RollingFps,
    history: Vec<f64>,
    low_checks: u32,
    start_ms: f64,
    last_frame_ms: f64,
    last_sample_ms: f64,
    result: Option<GpuBenchmarkResult>,
}

impl LoadRamp {
    /// Allocates the renderer and seeds the starting instances.
    pub fn start<R>(config: GpuStressConfig, renderer: &mut R, start_ms: f64) -> Result<Self>
    where
        R: InstanceRenderer + ?Sized,
    {
        config.validate()?;
        renderer.init(config.max_instances as usize)?;
        let seeded = renderer.add_instances(config.seed_instances as usize);
        tracing::debug!(seeded, capacity = renderer.capacity(), "Load ramp seeded");

        Ok(Self {
            growth: GrowthSchedule::new(
                config.growth.clone(),
                config.growth_interval_ms,
                start_ms,
            ),
            fps: RollingFps::new(config.rolling_window, config.initial_fps),
            history: Vec::new(),
            low_checks: 0,
            start_ms,
            last_frame_ms: start_ms,
            last_sample_ms: start_ms,
            result: None,
            config,
        })
    }

    pub fn current_fps(&self) -> f64 {
        self.fps.current()
    }

    pub fn history(&self) -> &[f64] {
        &self.history
    }

    pub fn is_finished(&self) -> bool {
        self.result.is_some()
    }

    /// Advance one frame at `now_ms`. Once finished, keeps returning the same result.
    pub fn on_frame<R>(&mut self, now_ms: f64, renderer: &mut R) -> Result<FrameOutcome>
    where
        R: InstanceRenderer + ?Sized,
    {
        if let Some(result) = &self.result {
            return Ok(FrameOutcome::Finished(result.clone()));
        }

        let mut sample = None;
        for action in TICK_ORDER {
            match action {
                TickAction::Grow => {
                    let current = renderer.instance_count() as u32;
                    if let Some(step) = self.growth.poll(now_ms, current) {
                        let count = renderer.add_instances(step as usize);
                        tracing::trace!(step, count, "Grew instance buffer");
                    }
                }
                TickAction::CheckTimeCap => {
                    if now_ms - self.start_ms > self.config.max_duration_ms as f64 {
                        return Ok(self.finish(FinishReason::TimeCap, now_ms, renderer));
                    }
                }
                TickAction::Update => renderer.update(),
                TickAction::Render => renderer.render()?,
                TickAction::Measure => {
                    let fps = self.fps.record(now_ms - self.last_frame_ms);
                    self.last_frame_ms = now_ms;

                    if now_ms - self.last_sample_ms < self.config.sample_interval_ms as f64 {
                        continue;
                    }
                    self.last_sample_ms = now_ms;
                    self.history.push(fps);
                    sample = Some(RampSample {
                        fps,
                        instances: renderer.instance_count() as u64,
                        elapsed_ms: now_ms - self.start_ms,
                    });

                    if fps < self.config.fps_threshold {
                        self.low_checks += 1;
                    } else {
                        self.low_checks = 0;
                    }
                    if self.low_checks >= self.config.low_fps_checks {
                        return Ok(self.finish(FinishReason::FpsCollapse, now_ms, renderer));
                    }
                }
            }
        }

        Ok(FrameOutcome::Running { sample })
    }

    fn finish<R>(&mut self, reason: FinishReason, now_ms: f64, renderer: &mut R) -> FrameOutcome
    where
        R: InstanceRenderer + ?Sized,
    {
        let raw_objects = renderer.instance_count() as u64;
        renderer.release();

        let total_objects = match reason {
            FinishReason::TimeCap => (raw_objects as f64 * self.config.time_cap_bonus).floor() as u64,
            FinishReason::FpsCollapse => raw_objects,
        };
        let summary = summarize(&self.history, self.fps.current());

        tracing::info!(
            reason = reason.label(),
            raw_objects,
            total_objects,
            avg_fps = summary.avg,
            "Load ramp finished"
        );

        let result = GpuBenchmarkResult {
            avg_fps: summary.avg,
            min_fps: summary.min,
            max_fps: summary.max,
            total_objects,
            raw_objects,
            finish_reason: reason,
            elapsed_ms: now_ms - self.start_ms,
            fps_history: self.history.clone(),
        };
        self.result = Some(result.clone());
        FrameOutcome::Finished(result)
    }
}
