//! # ttsched Demo Firmware
//!
//! Runs a small time-triggered system on a Cortex-M4 at a 5 ms tick:
//!
//! | Task | Delay | Period | Behavior |
//! |------|-------|--------|----------|
//! | `poll_console` | 5 | 2 | Services the console every 10 ms |
//! | `process_command` | 10 | 2 | Handles a pending command, if any |
//! | `heartbeat` | 0 | 200 | Logs uptime and the error code once a second |
//! | `announce` | 20 | 0 | One-shot: logs that the system is up |
//!
//! Build with `--features firmware --target thumbv7em-none-eabihf`.
//! Logs go out over RTT through `defmt`.

#![no_std]
#![no_main]

use core::sync::atomic::{AtomicU32, Ordering};

use cortex_m_rt::entry;
use defmt_rtt as _;
use panic_halt as _;

use ttsched::arch::cortex_m4::SysTickPort;
use ttsched::config::SYSTEM_CLOCK_HZ;
use ttsched::kernel;

// ---------------------------------------------------------------------------
// Task bodies
// ---------------------------------------------------------------------------

/// Console polls since boot.
static POLLS: AtomicU32 = AtomicU32::new(0);

/// Commands waiting for `process_command`.
static PENDING: AtomicU32 = AtomicU32::new(0);

fn poll_console() {
    let polls = POLLS.fetch_add(1, Ordering::Relaxed) + 1;
    // Stand-in for received input: one command every 50 polls.
    if polls % 50 == 0 {
        PENDING.fetch_add(1, Ordering::Relaxed);
    }
}
static POLL_CONSOLE: fn() = poll_console;

fn process_command() {
    let pending = PENDING.load(Ordering::Relaxed);
    if pending == 0 {
        return;
    }
    PENDING.store(pending - 1, Ordering::Relaxed);
    defmt::debug!("command handled at tick {}", kernel::ticks());
}
static PROCESS_COMMAND: fn() = process_command;

fn heartbeat() {
    defmt::info!(
        "uptime {} ticks, {} polls, error {}",
        kernel::ticks(),
        POLLS.load(Ordering::Relaxed),
        kernel::error_code()
    );
}
static HEARTBEAT: fn() = heartbeat;

fn announce() {
    defmt::info!("system up, {} tasks scheduled", kernel::scheduler().task_count());
}
static ANNOUNCE: fn() = announce;

// ---------------------------------------------------------------------------
// Main entry point
// ---------------------------------------------------------------------------

/// Timing is in TICKS, not milliseconds.
#[entry]
fn main() -> ! {
    let Some(mut cp) = cortex_m::Peripherals::take() else {
        loop {
            cortex_m::asm::wfi();
        }
    };
    let mut port = SysTickPort::new(cp.SYST, &mut cp.SCB, SYSTEM_CLOCK_HZ);

    if let Err(error) = kernel::init(&mut port) {
        // Without a tick nothing would ever run.
        defmt::error!("scheduler init failed: {}", error);
        loop {
            cortex_m::asm::wfi();
        }
    }

    for (routine, delay, period) in [
        (&POLL_CONSOLE, 5, 2),
        (&PROCESS_COMMAND, 10, 2),
        (&HEARTBEAT, 0, 200),
        (&ANNOUNCE, 20, 0),
    ] {
        if let Err(error) = kernel::add_task(routine, delay, period) {
            defmt::warn!("task not scheduled: {}", error);
        }
    }

    kernel::start(&mut port);
    kernel::run(&mut port)
}
