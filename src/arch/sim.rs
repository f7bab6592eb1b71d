//! Software port
//!
//! Stands in for the hardware on a host: nothing fires on its own, the
//! embedding program (or test) calls `Scheduler::tick` to advance time.
//! Records what the scheduler asked of the platform.

use crate::error::{ErrorCode, SchedulerError};

use super::Port;

#[derive(Debug)]
pub struct SimPort {
    /// Interval passed to the last successful `configure_tick`.
    pub interval_ms: Option<u16>,
    /// Whether `enable_tick` has been called.
    pub tick_enabled: bool,
    /// Number of `idle` calls.
    pub idle_calls: u32,
    /// Last code handed to `show_error`.
    pub shown: Option<ErrorCode>,
    /// Active-low LED bank driven from the shown code. `0xFF` is all off.
    pub leds: u8,
    /// Make `configure_tick` fail, to exercise a dead tick source.
    pub fail_configure: bool,
}

impl Default for SimPort {
    fn default() -> Self {
        Self {
            interval_ms: None,
            tick_enabled: false,
            idle_calls: 0,
            shown: None,
            leds: ErrorCode::NoError.led_pattern(),
            fail_configure: false,
        }
    }
}

impl SimPort {
    pub fn new() -> Self {
        Self::default()
    }

    /// A port whose tick source refuses to start.
    pub fn broken() -> Self {
        Self {
            fail_configure: true,
            ..Self::default()
        }
    }
}

impl Port for SimPort {
    fn configure_tick(&mut self, interval_ms: u16) -> Result<(), SchedulerError> {
        if self.fail_configure || interval_ms == 0 {
            return Err(SchedulerError::TickSourceFailed);
        }
        self.interval_ms = Some(interval_ms);
        self.tick_enabled = false;
        Ok(())
    }

    fn enable_tick(&mut self) {
        self.tick_enabled = true;
    }

    fn idle(&mut self) {
        self.idle_calls += 1;
    }

    fn show_error(&mut self, code: ErrorCode) {
        self.shown = Some(code);
        self.leds = code.led_pattern();
    }
}
