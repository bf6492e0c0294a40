//! Simulation clock.
//!
//! Simulation time is the sum of scaled frame deltas. Each delta is clamped so
//! that a stalled frame (window drag, debugger pause) advances the orbits by
//! at most [`MAX_FRAME_TIME`] instead of jumping ahead.

use std::time::Instant;
use tracing::debug;

/// Longest wall-clock delta counted for a single frame, in seconds.
pub const MAX_FRAME_TIME: f64 = 0.25;

/// Monotonic elapsed simulation seconds since start.
#[derive(Debug, Clone)]
pub struct FrameClock {
    previous_time: Instant,
    time_scale: f64,
    sim_time: f64,
    frame_count: u64,
}

impl FrameClock {
    /// Start a clock now. Negative or non-finite scales are treated as zero.
    pub fn new(time_scale: f64) -> Self {
        Self::starting_at(Instant::now(), time_scale)
    }

    pub fn starting_at(start: Instant, time_scale: f64) -> Self {
        Self {
            previous_time: start,
            time_scale: sanitize_scale(time_scale),
            sim_time: 0.0,
            frame_count: 0,
        }
    }

    /// Advance to the current instant and return the simulation time.
    pub fn tick(&mut self) -> f64 {
        self.tick_at(Instant::now())
    }

    /// Advance to `now` and return the simulation time. Instants earlier than
    /// the previous tick count as zero elapsed time.
    pub fn tick_at(&mut self, now: Instant) -> f64 {
        let mut frame_time = now
            .saturating_duration_since(self.previous_time)
            .as_secs_f64();
        self.previous_time = self.previous_time.max(now);

        if frame_time > MAX_FRAME_TIME {
            debug!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                frame_time * 1000.0,
                MAX_FRAME_TIME * 1000.0
            );
            frame_time = MAX_FRAME_TIME;
        }

        self.sim_time += frame_time * self.time_scale;
        self.frame_count += 1;
        self.sim_time
    }

    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }
}

fn sanitize_scale(time_scale: f64) -> f64 {
    if time_scale.is_finite() && time_scale > 0.0 {
        time_scale
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_tick_accumulates_wall_time() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start, 1.0);
        clock.tick_at(start + Duration::from_millis(100));
        let t = clock.tick_at(start + Duration::from_millis(200));
        assert!((t - 0.2).abs() < 1e-9);
        assert_eq!(clock.frame_count(), 2);
    }

    #[test]
    fn test_time_scale_multiplies_elapsed() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start, 4.0);
        let t = clock.tick_at(start + Duration::from_millis(50));
        assert!((t - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_long_frame_is_clamped() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start, 1.0);
        let t = clock.tick_at(start + Duration::from_secs(10));
        assert!((t - MAX_FRAME_TIME).abs() < 1e-9);
    }

    #[test]
    fn test_time_never_decreases() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start + Duration::from_millis(100), 1.0);
        let t = clock.tick_at(start);
        assert_eq!(t, 0.0);
    }

    #[test]
    fn test_invalid_scale_freezes_time() {
        let start = Instant::now();
        for scale in [-1.0, f64::NAN, f64::INFINITY] {
            let mut clock = FrameClock::starting_at(start, scale);
            assert_eq!(clock.time_scale(), 0.0);
            assert_eq!(clock.tick_at(start + Duration::from_millis(100)), 0.0);
        }
    }
}
