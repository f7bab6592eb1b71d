//! # Cortex-M4 Port Layer
//!
//! Drives the scheduler from SysTick.
//!
//! ## Interrupt Model
//!
//! - SysTick runs the tick handler, which only updates countdowns and
//!   due flags under a PRIMASK critical section.
//! - Mainline code (dispatcher, registry calls) runs in Thread mode and
//!   sleeps with `wfi` between ticks.
//! - SysTick is set to the lowest priority so application interrupts are
//!   never delayed by scheduler bookkeeping.
//!
//! ONLY the scheduler tick should wake the core from idle; any other
//! enabled interrupt shortens the sleep and costs power, but does not
//! break timing.

use cortex_m::peripheral::scb::SystemHandler;
use cortex_m::peripheral::syst::SystClkSource;
use cortex_m::peripheral::{SCB, SYST};
use cortex_m_rt::exception;

use crate::error::{ErrorCode, SchedulerError};

use super::{systick_reload, Port};

/// SysTick-backed scheduler port.
pub struct SysTickPort {
    syst: SYST,
    clock_hz: u32,
}

impl SysTickPort {
    /// Take ownership of SysTick; `clock_hz` is the processor clock.
    ///
    /// `scb` is only borrowed to lower the SysTick exception priority.
    pub fn new(syst: SYST, scb: &mut SCB, clock_hz: u32) -> Self {
        // Safety: called before the tick is enabled, so no priority-based
        // critical section can be in progress.
        unsafe {
            scb.set_priority(SystemHandler::SysTick, 0xFF);
        }
        Self { syst, clock_hz }
    }
}

impl Port for SysTickPort {
    fn configure_tick(&mut self, interval_ms: u16) -> Result<(), SchedulerError> {
        let reload = systick_reload(self.clock_hz, interval_ms)
            .ok_or(SchedulerError::TickSourceFailed)?;

        self.syst.disable_interrupt();
        self.syst.set_clock_source(SystClkSource::Core);
        self.syst.set_reload(reload);
        self.syst.clear_current();
        self.syst.enable_counter();
        Ok(())
    }

    fn enable_tick(&mut self) {
        self.syst.enable_interrupt();
    }

    #[inline]
    fn idle(&mut self) {
        cortex_m::asm::wfi();
    }

    fn show_error(&mut self, code: ErrorCode) {
        if code.is_error() {
            crate::log_error!("error display: {}, leds {}", code, code.led_pattern());
        } else {
            crate::log_info!("error display cleared");
        }
    }
}

/// SysTick exception handler: one scheduler tick.
#[exception]
fn SysTick() {
    crate::kernel::tick();
}
