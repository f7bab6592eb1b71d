//! # Kernel
//!
//! The process-wide scheduler instance and the free-function API firmware
//! uses to drive it.
//!
//! ## Startup Sequence
//!
//! ```text
//! reset_handler (cortex-m-rt)
//!   └─► main()
//!         ├─► kernel::init(&mut port)      ← empty table, program tick source
//!         ├─► kernel::add_task(..)  (×N)   ← register initial tasks
//!         ├─► kernel::start(&mut port)     ← unmask tick interrupt
//!         └─► kernel::run(&mut port)       ← dispatch / idle, forever
//!
//! SysTick ─► kernel::tick()                ← countdowns, due flags
//! ```

use crate::arch::Port;
use crate::config::{ERROR_AUTO_CLEAR, MAX_TASKS, TICK_INTERVAL_MS};
use crate::error::{ErrorCode, SchedulerError};
use crate::scheduler::Scheduler;
use crate::task::{Runnable, TaskId, Ticks};
use crate::timer::Timeout;

/// The kernel's scheduler. Shared by the tick interrupt and the main loop;
/// its state sits behind a critical-section mutex.
static SCHEDULER: Scheduler<'static, MAX_TASKS> = Scheduler::new(ERROR_AUTO_CLEAR);

/// Direct access to the kernel's scheduler instance.
pub fn scheduler() -> &'static Scheduler<'static, MAX_TASKS> {
    &SCHEDULER
}

/// Empty the task table and program the tick source at
/// `TICK_INTERVAL_MS`. Must precede every other kernel call.
pub fn init<P: Port>(port: &mut P) -> Result<(), SchedulerError> {
    SCHEDULER.init(port, TICK_INTERVAL_MS)
}

/// Unmask the tick interrupt. Call once the initial tasks are registered.
pub fn start<P: Port>(port: &mut P) {
    SCHEDULER.start(port)
}

/// Register a task. See [`Scheduler::add_task`].
///
/// # Example
/// ```ignore
/// fn blink() { /* toggle LED */ }
/// static BLINK: fn() = blink;
///
/// // First run after 10 ticks, then every 100 ticks.
/// let id = kernel::add_task(&BLINK, 10, 100)?;
/// ```
pub fn add_task(
    routine: &'static dyn Runnable,
    delay: Ticks,
    period: Ticks,
) -> Result<TaskId, SchedulerError> {
    SCHEDULER.add_task(routine, delay, period)
}

/// Remove a task. See [`Scheduler::delete_task`].
pub fn delete_task(id: TaskId) -> Result<(), SchedulerError> {
    SCHEDULER.delete_task(id)
}

/// One scheduler tick. Called from the tick interrupt only.
#[inline]
pub fn tick() {
    SCHEDULER.tick()
}

/// One main-loop iteration: run due tasks, report status, idle.
pub fn dispatch_once<P: Port>(port: &mut P) -> Result<usize, SchedulerError> {
    SCHEDULER.dispatch_once(port)
}

/// The main loop. **Does not return.**
pub fn run<P: Port>(port: &mut P) -> ! {
    loop {
        if let Err(error) = SCHEDULER.dispatch_once(port) {
            crate::log_error!("dispatch failed: {}", error);
        }
    }
}

/// Most recent fault, for logging and telemetry.
pub fn error_code() -> ErrorCode {
    SCHEDULER.error_code()
}

/// Record a fault raised outside the scheduler (console driver, tick source).
pub fn record_error(code: ErrorCode) {
    SCHEDULER.record_error(code)
}

/// Ticks since `init`.
pub fn ticks() -> u32 {
    SCHEDULER.ticks()
}

/// Start a timeout of `duration` ticks from now.
pub fn timeout(duration: Ticks) -> Timeout {
    SCHEDULER.timeout(duration)
}

// ---------------------------------------------------------------------------
// Unit tests (host-only)
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arch::sim::SimPort;
    use core::sync::atomic::{AtomicU32, Ordering};

    static POLLS: AtomicU32 = AtomicU32::new(0);
    static COMMANDS: AtomicU32 = AtomicU32::new(0);

    fn poll_console() {
        POLLS.fetch_add(1, Ordering::Relaxed);
    }
    static POLL_CONSOLE: fn() = poll_console;

    fn process_command() {
        COMMANDS.fetch_add(1, Ordering::Relaxed);
    }
    static PROCESS_COMMAND: fn() = process_command;

    // The kernel instance is process-wide, so everything touching it lives
    // in this one test.
    #[test]
    fn test_kernel_lifecycle() {
        let mut port = SimPort::new();
        init(&mut port).unwrap();
        assert_eq!(port.interval_ms, Some(TICK_INTERVAL_MS));

        let poll = add_task(&POLL_CONSOLE, 5, 2).unwrap();
        let command = add_task(&PROCESS_COMMAND, 10, 2).unwrap();
        assert_eq!(poll, TaskId::new(0));
        assert_eq!(command, TaskId::new(1));

        start(&mut port);
        assert!(port.tick_enabled);

        for _ in 0..14 {
            tick();
            dispatch_once(&mut port).unwrap();
        }
        // Due on ticks 5, 7, 9, 11, 13 and 10, 12.
        assert_eq!(POLLS.load(Ordering::Relaxed), 5);
        assert_eq!(COMMANDS.load(Ordering::Relaxed), 2);
        assert_eq!(ticks(), 14);

        delete_task(command).unwrap();
        assert_eq!(delete_task(command), Err(SchedulerError::CannotDeleteTask));
        assert_eq!(error_code(), ErrorCode::CannotDeleteTask);

        record_error(ErrorCode::UsartTransmit);
        assert_eq!(error_code(), ErrorCode::UsartTransmit);
        assert_eq!(scheduler().task_count(), 1);

        // Re-initializing returns the kernel to a clean slate.
        init(&mut port).unwrap();
        assert_eq!(scheduler().task_count(), 0);
        assert_eq!(error_code(), ErrorCode::NoError);
        assert!(timeout(1).remaining(ticks()) == 1);
    }
}
