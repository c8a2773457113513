//! Frame timing: delta measurement and end-of-frame pacing.

use std::time::{Duration, Instant};

/// High-resolution timer for measuring elapsed time.
#[derive(Debug)]
pub struct Timer {
    start: Instant,
    last_tick: Instant,
}

impl Timer {
    /// Create a new timer, starting from now.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_tick: now,
        }
    }

    /// Get the total elapsed time since the timer was created.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Get the elapsed time in seconds since the timer was created.
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed().as_secs_f64()
    }

    /// Get the time elapsed since the last call to `tick()`.
    /// This is the delta time fed to scene updates.
    pub fn tick(&mut self) -> Duration {
        let now = Instant::now();
        let delta = now - self.last_tick;
        self.last_tick = now;
        delta
    }

    /// Get the delta time in seconds since the last tick.
    pub fn delta_secs(&mut self) -> f64 {
        self.tick().as_secs_f64()
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

/// Sleeps away whatever is left of a fixed frame interval.
///
/// This is a courtesy pacer, not a scheduler: a frame that overruns its budget
/// simply starts the next one immediately.
#[derive(Debug)]
pub struct FrameLimiter {
    interval: Option<Duration>,
    frame_start: Instant,
}

impl FrameLimiter {
    /// A limiter targeting `interval` per frame; `None` disables pacing.
    pub fn new(interval: Option<Duration>) -> Self {
        Self {
            interval,
            frame_start: Instant::now(),
        }
    }

    /// Mark the start of a frame.
    pub fn begin_frame(&mut self) {
        self.frame_start = Instant::now();
    }

    /// Time left in the current frame budget given `spent` so far.
    pub fn remaining(&self, spent: Duration) -> Duration {
        match self.interval {
            Some(interval) => interval.saturating_sub(spent),
            None => Duration::ZERO,
        }
    }

    /// Sleep until the frame budget is used up and return how long we slept.
    pub fn end_frame(&mut self) -> Duration {
        let remaining = self.remaining(self.frame_start.elapsed());
        if !remaining.is_zero() {
            std::thread::sleep(remaining);
        }
        remaining
    }
}
