//! Time management utilities
//!
//! The simulation advances in fixed steps. [`FixedTimestep`] turns variable
//! frame times into a whole number of steps and [`SimClock`] produces the
//! monotonically increasing timestamps stamped on each step's input snapshot.

use std::time::{Duration, Instant};

/// Accumulator that converts frame time into fixed simulation steps
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step: f32,
    accumulator: f32,
    max_steps_per_frame: u32,
    total_steps: u64,
}

impl FixedTimestep {
    /// Create a fixed-step accumulator running at `tick_rate_hz`
    pub fn new(tick_rate_hz: f32) -> Self {
        Self {
            step: 1.0 / tick_rate_hz.max(1.0),
            accumulator: 0.0,
            max_steps_per_frame: 8,
            total_steps: 0,
        }
    }

    /// Cap the number of steps a single frame may produce
    pub fn with_max_steps_per_frame(mut self, max_steps: u32) -> Self {
        self.max_steps_per_frame = max_steps.max(1);
        self
    }

    /// Length of one step in seconds
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Add `frame_time` seconds and return how many steps should run now
    ///
    /// Time beyond the per-frame cap is dropped so a long stall cannot cause
    /// a spiral of catch-up steps.
    pub fn advance(&mut self, frame_time: f32) -> u32 {
        if frame_time.is_finite() && frame_time > 0.0 {
            self.accumulator += frame_time;
        }

        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_steps_per_frame {
            self.accumulator -= self.step;
            steps += 1;
        }
        if steps == self.max_steps_per_frame {
            self.accumulator = self.accumulator.min(self.step);
        }

        self.total_steps += u64::from(steps);
        steps
    }

    /// Fraction of a step left in the accumulator, for render interpolation
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.step
    }

    /// Total number of steps produced so far
    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }
}

/// Deterministic simulation clock
///
/// Hands out `Instant`s that advance by exactly the simulated time, so
/// timing windows behave the same regardless of wall-clock jitter.
#[derive(Debug, Clone, Copy)]
pub struct SimClock {
    origin: Instant,
    elapsed: Duration,
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SimClock {
    /// Start a clock at the current instant
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Start a clock at a given instant
    pub fn starting_at(origin: Instant) -> Self {
        Self {
            origin,
            elapsed: Duration::ZERO,
        }
    }

    /// Advance by `seconds` and return the new timestamp
    pub fn advance(&mut self, seconds: f32) -> Instant {
        if seconds.is_finite() && seconds > 0.0 {
            self.elapsed += Duration::from_secs_f32(seconds);
        }
        self.now()
    }

    /// Current timestamp
    pub fn now(&self) -> Instant {
        self.origin + self.elapsed
    }

    /// Simulated time since the clock started
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_timestep_accumulates() {
        let mut timestep = FixedTimestep::new(60.0);

        assert_eq!(timestep.advance(0.01), 0);
        assert_eq!(timestep.advance(0.01), 1);
        assert!(timestep.alpha() > 0.0 && timestep.alpha() < 1.0);
        assert_eq!(timestep.total_steps(), 1);
    }

    #[test]
    fn test_fixed_timestep_caps_catch_up() {
        let mut timestep = FixedTimestep::new(60.0).with_max_steps_per_frame(4);

        assert_eq!(timestep.advance(1.0), 4);
        // The backlog is dropped rather than replayed on the next frame
        assert!(timestep.advance(0.0) <= 1);
    }

    #[test]
    fn test_fixed_timestep_ignores_bad_frame_time() {
        let mut timestep = FixedTimestep::new(60.0);
        assert_eq!(timestep.advance(f32::NAN), 0);
        assert_eq!(timestep.advance(-1.0), 0);
    }

    #[test]
    fn test_sim_clock_advances_exactly() {
        let origin = Instant::now();
        let mut clock = SimClock::starting_at(origin);

        let stamp = clock.advance(0.25);
        assert_eq!(stamp - origin, Duration::from_secs_f32(0.25));
        clock.advance(0.0);
        assert_eq!(clock.elapsed(), Duration::from_secs_f32(0.25));
    }
}
