//! Fixed-rate stepping for hosts that tick at a different rate than they step.

use crate::config::SimulationConfig;

/// Upper bound on steps released by one `advance` call.
pub const MAX_STEPS_PER_TICK: u32 = 8;

/// Accumulates frame time and releases whole steps at `steps_per_second`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepClock {
    steps_per_second: f32,
    accumulated: f32,
}

impl StepClock {
    pub fn new(steps_per_second: f32) -> Self {
        StepClock {
            steps_per_second: steps_per_second.max(0.0),
            accumulated: 0.0,
        }
    }

    /// Clock running at the configured `step_rate`.
    pub fn from_config(config: &SimulationConfig) -> Self {
        StepClock::new(config.step_rate)
    }

    /// Pick up a changed `step_rate`, keeping accumulated time.
    pub fn apply_config(&mut self, config: &SimulationConfig) {
        self.set_rate(config.step_rate);
    }

    pub fn steps_per_second(&self) -> f32 {
        self.steps_per_second
    }

    /// Change the rate without discarding accumulated time.
    pub fn set_rate(&mut self, steps_per_second: f32) {
        self.steps_per_second = steps_per_second.max(0.0);
    }

    /// Add `dt` seconds and return how many steps are due now.
    ///
    /// At most [`MAX_STEPS_PER_TICK`] are released; any backlog beyond that
    /// is dropped so a stalled host does not fall further behind.
    pub fn advance(&mut self, dt: f32) -> u32 {
        if self.steps_per_second <= 0.0 || !dt.is_finite() || dt <= 0.0 {
            return 0;
        }
        let interval = 1.0 / self.steps_per_second;
        self.accumulated += dt;

        let mut due = 0;
        while self.accumulated >= interval && due < MAX_STEPS_PER_TICK {
            self.accumulated -= interval;
            due += 1;
        }
        if due == MAX_STEPS_PER_TICK {
            self.accumulated = self.accumulated.min(interval);
        }
        due
    }

    /// Forget accumulated time.
    pub fn reset(&mut self) {
        self.accumulated = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_releases_steps_at_rate() {
        let mut clock = StepClock::new(4.0);
        assert_eq!(clock.advance(0.1), 0);
        assert_eq!(clock.advance(0.2), 1);
        assert_eq!(clock.advance(0.5), 2);
    }

    #[test]
    fn test_caps_backlog() {
        let mut clock = StepClock::new(100.0);
        assert_eq!(clock.advance(10.0), MAX_STEPS_PER_TICK);
        // Backlog was dropped: a short tick releases at most one more step.
        assert!(clock.advance(0.001) <= 1);
    }

    #[test]
    fn test_zero_rate_and_bad_dt() {
        let mut clock = StepClock::new(0.0);
        assert_eq!(clock.advance(5.0), 0);

        let mut clock = StepClock::new(10.0);
        assert_eq!(clock.advance(-1.0), 0);
        assert_eq!(clock.advance(f32::NAN), 0);
        clock.set_rate(20.0);
        assert_eq!(clock.steps_per_second(), 20.0);
    }

    #[test]
    fn test_follows_configured_rate() {
        let config = SimulationConfig::default();
        let mut clock = StepClock::from_config(&config);
        assert_eq!(clock.steps_per_second(), config.step_rate);
        assert_eq!(clock.advance(0.25), 2);

        let faster = SimulationConfig {
            step_rate: 20.0,
            ..config
        };
        clock.apply_config(&faster);
        assert_eq!(clock.steps_per_second(), 20.0);
        assert_eq!(clock.advance(0.5), MAX_STEPS_PER_TICK);
    }

    #[test]
    fn test_reset_clears_accumulator() {
        let mut clock = StepClock::new(1.0);
        assert_eq!(clock.advance(0.9), 0);
        clock.reset();
        assert_eq!(clock.advance(0.2), 0);
    }
}
