//! Tick-based software timeouts
//!
//! Lets a task body poll for "n ticks have passed" without blocking, e.g.
//! a console driver waiting for a transmitter to drain. Time is the
//! scheduler's wrapping tick counter.

use crate::task::Ticks;

/// A timeout started at a given tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timeout {
    start: u32,
    duration: u32,
}

impl Timeout {
    /// Timeout expiring `duration` ticks after `now`.
    pub const fn new(now: u32, duration: Ticks) -> Self {
        Self {
            start: now,
            duration: duration as u32,
        }
    }

    /// Whether the timeout has run out. Correct across counter wraparound.
    #[inline]
    pub fn expired(&self, now: u32) -> bool {
        now.wrapping_sub(self.start) >= self.duration
    }

    /// Ticks left before expiry (0 once expired).
    pub fn remaining(&self, now: u32) -> u32 {
        self.duration.saturating_sub(now.wrapping_sub(self.start))
    }

    /// Restart from `now` with the same duration.
    pub fn restart(&mut self, now: u32) {
        self.start = now;
    }
}
