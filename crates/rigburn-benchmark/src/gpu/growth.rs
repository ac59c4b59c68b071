use rigburn_core::GrowthPolicy;

/// Instances to add on a growth tick, given the live count.
pub fn instances_to_add(policy: &GrowthPolicy, current: u32) -> u32 {
    if current < policy.warmup_limit {
        policy.warmup_step
    } else if current < policy.acceleration_limit {
        ((current as f64 * policy.acceleration_rate).floor() as u32).saturating_add(policy.acceleration_base)
    } else {
        ((current as f64 * policy.aggressive_rate).floor() as u32).saturating_add(policy.aggressive_base)
    }
}

/// Fires a growth step once per interval.
#[derive(Debug, Clone)]
pub struct GrowthSchedule {
    policy: GrowthPolicy,
    interval_ms: f64,
    last_step_ms: f64,
}

impl GrowthSchedule {
    pub fn new(policy: GrowthPolicy, interval_ms: u64, start_ms: f64) -> Self {
        Self {
            policy,
            interval_ms: interval_ms as f64,
            last_step_ms: start_ms,
        }
    }

    /// Returns the step size when the interval has elapsed, and arms the next one.
    pub fn poll(&mut self, now_ms: f64, current: u32) -> Option<u32> {
        if now_ms - self.last_step_ms < self.interval_ms {
            return None;
        }
        self.last_step_ms = now_ms;
        Some(instances_to_add(&self.policy, current))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiered_growth() {
        let p = GrowthPolicy::default();
        assert_eq!(instances_to_add(&p, 2_000), 2_000);
        assert_eq!(instances_to_add(&p, 49_999), 2_000);
        assert_eq!(instances_to_add(&p, 50_000), 3_500);
        assert_eq!(instances_to_add(&p, 99_999), 5_999);
        assert_eq!(instances_to_add(&p, 100_000), 12_000);
        assert_eq!(instances_to_add(&p, 250_000), 27_000);
    }

    #[test]
    fn test_oversized_bases_saturate() {
        let p = GrowthPolicy {
            acceleration_base: u32::MAX,
            aggressive_base: u32::MAX,
            ..Default::default()
        };
        assert_eq!(instances_to_add(&p, 60_000), u32::MAX);
        assert_eq!(instances_to_add(&p, 400_000), u32::MAX);
    }

    #[test]
    fn test_schedule_fires_once_per_interval() {
        let mut schedule = GrowthSchedule::new(GrowthPolicy::default(), 400, 0.0);
        assert_eq!(schedule.poll(100.0, 2_000), None);
        assert_eq!(schedule.poll(399.9, 2_000), None);
        assert_eq!(schedule.poll(400.0, 2_000), Some(2_000));
        assert_eq!(schedule.poll(500.0, 4_000), None);
        assert_eq!(schedule.poll(800.0, 4_000), Some(2_000));
    }
}
