//! # Scheduler Configuration
//!
//! Compile-time constants for the process-wide scheduler instance.
//! All limits are fixed at compile time: no dynamic allocation.

/// Number of task slots in the kernel's task table.
/// Size this to the maximum number of tasks alive at any one time;
/// `add_task` fails once every slot is taken.
pub const MAX_TASKS: usize = 8;

/// Scheduler tick interval in milliseconds. All task delays and periods
/// are expressed in ticks of this length.
pub const TICK_INTERVAL_MS: u16 = 5;

/// Core clock feeding SysTick (STM32F4 HSI at 16 MHz).
pub const SYSTEM_CLOCK_HZ: u32 = 16_000_000;

/// How long an unchanged error stays on the display, in milliseconds.
pub const ERROR_DISPLAY_MS: u32 = 60_000;

/// Dispatch passes an unchanged error stays on the display before it is
/// cleared. The main loop makes one pass per tick, so this is
/// [`ERROR_DISPLAY_MS`] expressed in ticks.
pub const ERROR_DISPLAY_TICKS: u16 = (ERROR_DISPLAY_MS / TICK_INTERVAL_MS as u32) as u16;

/// Self-clearing error display. Enabled with the `error-auto-clear`
/// feature; otherwise the last error is shown until something replaces it.
pub const ERROR_AUTO_CLEAR: Option<u16> = if cfg!(feature = "error-auto-clear") {
    Some(ERROR_DISPLAY_TICKS)
} else {
    None
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_lasts_one_minute() {
        assert_eq!(
            ERROR_DISPLAY_TICKS as u32 * TICK_INTERVAL_MS as u32,
            ERROR_DISPLAY_MS
        );
        assert_eq!(ERROR_DISPLAY_TICKS, 12_000);
    }
}
