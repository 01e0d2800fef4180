//! Frame timing.
//!
//! The runner owns a [`TimeClock`] and ticks it once per frame; everything
//! else only sees the [`Time`] snapshot.

use std::time::Instant;

/// Longest frame delta handed to the simulation. A stalled frame (window
/// drag, debugger break) must not teleport the camera.
pub const MAX_DELTA: f32 = 0.1;

/// Timing for one frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct Time {
    /// Seconds since the previous frame, clamped to [`MAX_DELTA`].
    pub delta: f32,
    /// Index of this frame, starting at 0.
    pub frame_count: u64,
}

pub struct TimeClock {
    last_tick: Instant,
    frame_count: u64,
}

impl TimeClock {
    pub fn new() -> Self {
        Self { last_tick: Instant::now(), frame_count: 0 }
    }

    /// Advances by one frame and returns its snapshot.
    pub fn tick(&mut self) -> Time {
        let now = Instant::now();
        let time = self.snapshot(now);
        self.last_tick = now;
        self.frame_count += 1;
        time
    }

    fn snapshot(&self, now: Instant) -> Time {
        Time {
            delta: (now - self.last_tick).as_secs_f32().min(MAX_DELTA),
            frame_count: self.frame_count,
        }
    }
}

impl Default for TimeClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_are_counted_from_zero() {
        let mut clock = TimeClock::new();
        assert_eq!(clock.tick().frame_count, 0);
        assert_eq!(clock.tick().frame_count, 1);
    }

    #[test]
    fn delta_is_clamped() {
        let mut clock = TimeClock::new();
        clock.last_tick -= std::time::Duration::from_secs(5);
        let t = clock.tick();
        assert_eq!(t.delta, MAX_DELTA);
    }
}
