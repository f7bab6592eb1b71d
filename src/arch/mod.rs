//! # Architecture Abstraction Layer
//!
//! The hardware boundary of the scheduler. A [`Port`] supplies the tick
//! source, the idle primitive, and optionally an error display. The
//! scheduler never touches registers itself.
//!
//! - [`cortex_m4`]: SysTick-driven port for bare-metal ARM targets
//! - [`sim`]: software port for host simulation and tests

#[cfg(all(target_arch = "arm", target_os = "none"))]
pub mod cortex_m4;
pub mod sim;

use crate::error::{ErrorCode, SchedulerError};

/// Platform services consumed by the scheduler.
pub trait Port {
    /// Program the periodic tick at `interval_ms` and start the timer.
    /// The tick interrupt stays masked until [`Port::enable_tick`].
    fn configure_tick(&mut self, interval_ms: u16) -> Result<(), SchedulerError>;

    /// Unmask the tick interrupt. From here on the tick handler runs.
    fn enable_tick(&mut self);

    /// Low-power wait until the next interrupt. May be a no-op.
    fn idle(&mut self);

    /// Show a changed error code (LEDs, log line). Defaults to nothing.
    fn show_error(&mut self, code: ErrorCode) {
        let _ = code;
    }
}

/// Largest value the 24-bit SysTick reload register accepts.
pub const SYSTICK_MAX_RELOAD: u32 = 0x00FF_FFFF;

/// SysTick reload value for a tick of `interval_ms` at `clock_hz`.
///
/// Returns `None` when the interval is zero or does not fit the counter.
pub const fn systick_reload(clock_hz: u32, interval_ms: u16) -> Option<u32> {
    let cycles = (clock_hz / 1000) as u64 * interval_ms as u64;
    if cycles == 0 || cycles - 1 > SYSTICK_MAX_RELOAD as u64 {
        None
    } else {
        Some((cycles - 1) as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reload_for_common_intervals() {
        assert_eq!(systick_reload(16_000_000, 1), Some(15_999));
        assert_eq!(systick_reload(16_000_000, 5), Some(79_999));
        assert_eq!(systick_reload(84_000_000, 10), Some(839_999));
    }

    #[test]
    fn test_reload_rejects_zero_interval() {
        assert_eq!(systick_reload(16_000_000, 0), None);
        assert_eq!(systick_reload(500, 10), None);
    }

    #[test]
    fn test_reload_rejects_overflow() {
        // 16 MHz: 1048 ms is the longest tick that fits 24 bits.
        assert!(systick_reload(16_000_000, 1048).is_some());
        assert_eq!(systick_reload(16_000_000, 1049), None);
    }
}
