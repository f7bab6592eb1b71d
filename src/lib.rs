//! # ttsched — Time-Triggered Cooperative Scheduler
//!
//! A static-table task scheduler for single-core microcontrollers,
//! in the time-triggered style: a periodic tick interrupt counts down each
//! task's delay, and a non-preemptive main loop runs whatever fell due.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │                    Application Tasks                    │
//! ├────────────────────────────────────────────────────────┤
//! │                 Kernel API (kernel.rs)                  │
//! │   init() · add_task() · delete_task() · start() · run() │
//! ├──────────────┬────────────────────┬───────────────────┤
//! │  Scheduler   │   Status / Errors  │  Sync Primitives  │
//! │  scheduler.rs│   status.rs        │  sync.rs          │
//! │  ─ tick()    │   error.rs         │  ─ CsGuard        │
//! │  ─ dispatch  │   ─ ErrorCode      │  ─ critical_section│
//! ├──────────────┴────────────────────┴───────────────────┤
//! │        Task Slots (task.rs) · Timeouts (timer.rs)       │
//! ├────────────────────────────────────────────────────────┤
//! │       Port (arch/): SysTick on Cortex-M, sim on host    │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Model
//!
//! - **Fixed table**: `N` slots, first-fit allocation; the slot index is
//!   the task id used for deletion.
//! - **Periodic tasks** (`period > 0`) re-arm after every run.
//! - **One-shot tasks** (`period == 0`) are removed after their single run.
//! - **Cooperative**: bodies run to completion, one after another, in slot
//!   order. Nothing preempts a body except the tick interrupt itself.
//! - **Errors** are returned to the caller and also recorded in a one-byte
//!   error code that the status reporter surfaces on each dispatch pass.
//!
//! ## Memory Model
//!
//! - **No heap**: all state lives in a fixed-size table
//! - **Critical sections**: `critical-section` mutex around the table;
//!   `cortex-m` single-core implementation on target
//! - **Host tests**: plain `cargo test`, with the `std` critical section

#![cfg_attr(not(test), no_std)]

pub mod logging;

pub mod arch;
pub mod config;
pub mod error;
pub mod kernel;
pub mod scheduler;
pub mod status;
pub mod sync;
pub mod task;
pub mod timer;

pub use arch::Port;
pub use error::{ErrorCode, SchedulerError};
pub use scheduler::Scheduler;
pub use task::{Runnable, TaskId, TaskInfo, Ticks};
