//! # Scheduler
//!
//! Time-triggered cooperative scheduler: a fixed table of periodic and
//! one-shot tasks, advanced by a tick interrupt and run to completion by a
//! dispatcher in the main loop.
//!
//! ## Execution Contexts
//!
//! ```text
//!   Tick interrupt                      Main loop
//!   ──────────────                      ─────────
//!   tick()                              dispatch_once(port)
//!     for each occupied slot:             for each slot, in index order:
//!       countdown == 0 → due, re-arm        due? → run body (interrupts ON)
//!       else           → countdown -= 1            clear due
//!                                                  one-shot → free slot
//!                                         report status
//!                                         port.idle()  (until next tick)
//! ```
//!
//! The table is the only state shared between the two contexts. Every
//! access happens inside a critical section, and task bodies are always
//! called outside one, so ticks keep arriving while a body runs and the
//! body may itself add or delete tasks.
//!
//! ## Timing
//!
//! A task added with `(delay = d, period = p)` is first due on tick `d`
//! (counting the first tick after `start` as tick 0), then on every `p`-th
//! tick after that. A task added with `period == 0` runs once.

use core::cell::RefCell;

use critical_section::Mutex;

use crate::arch::Port;
use crate::error::{ErrorCode, SchedulerError};
use crate::status::StatusReporter;
use crate::sync::{self, CsGuard};
use crate::task::{Runnable, Task, TaskId, TaskInfo, Ticks};
use crate::timer::Timeout;

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Everything the tick handler and the main loop share.
struct State<'a, const N: usize> {
    /// The task table. Slot index is the task's identity.
    tasks: [Task<'a>; N],

    /// Most recent fault.
    error: ErrorCode,

    /// Error display bookkeeping.
    reporter: StatusReporter,

    /// Ticks since `init`, wrapping.
    ticks: u32,

    /// A dispatch pass is in progress.
    dispatching: bool,
}

impl<'a, const N: usize> State<'a, N> {
    const fn new(error_timeout: Option<u16>) -> Self {
        Self {
            tasks: [Task::EMPTY; N],
            error: ErrorCode::NoError,
            reporter: StatusReporter::new(error_timeout),
            ticks: 0,
            dispatching: false,
        }
    }

    fn record(&mut self, error: SchedulerError) -> SchedulerError {
        let code = error.code();
        if code.is_error() {
            self.error = code;
        }
        error
    }
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

/// The scheduler context: task table, error code, status reporter and tick
/// counter, owned as one unit.
///
/// All methods take `&self`; the state is guarded by a critical-section
/// mutex, so one instance can be placed in a `static` and shared between
/// the tick interrupt and the main loop (see `kernel`).
///
/// `N` is the table capacity. `'a` bounds the task bodies; the kernel
/// instance uses `'static`.
pub struct Scheduler<'a, const N: usize> {
    state: Mutex<RefCell<State<'a, N>>>,
}

impl<'a, const N: usize> Scheduler<'a, N> {
    /// Table capacity.
    pub const CAPACITY: usize = N;

    /// An empty scheduler. `error_timeout` is the number of dispatch passes
    /// after which an unchanged error code is cleared (`None`: never).
    pub const fn new(error_timeout: Option<u16>) -> Self {
        Self {
            state: Mutex::new(RefCell::new(State::new(error_timeout))),
        }
    }

    /// Prepare the scheduler and start the tick source at `interval_ms`.
    ///
    /// Empties the task table and clears the error code, so it also serves
    /// to re-initialize between test runs. The tick interrupt stays off
    /// until [`Scheduler::start`].
    pub fn init<P: Port>(&self, port: &mut P, interval_ms: u16) -> Result<(), SchedulerError> {
        self.reset();

        if let Err(error) = port.configure_tick(interval_ms) {
            sync::critical_section(|cs| {
                self.state.borrow_ref_mut(cs).record(error);
            });
            crate::log_error!("tick source rejected {} ms interval: {}", interval_ms, error);
            return Err(error);
        }

        crate::log_info!("scheduler ready: {} slots, {} ms tick", N, interval_ms);
        Ok(())
    }

    /// Enable the tick interrupt.
    ///
    /// Call after the initial tasks are registered so their phases line up.
    pub fn start<P: Port>(&self, port: &mut P) {
        port.enable_tick();
        crate::log_info!("scheduler started");
    }

    /// Empty every slot and clear the error code and tick counter.
    pub fn reset(&self) {
        sync::critical_section(|cs| {
            let mut state = self.state.borrow_ref_mut(cs);
            for task in state.tasks.iter_mut() {
                task.clear();
            }
            state.error = ErrorCode::NoError;
            state.reporter.reset();
            state.ticks = 0;
            state.dispatching = false;
        });
    }

    // -----------------------------------------------------------------------
    // Registry
    // -----------------------------------------------------------------------

    /// Schedule `routine` to run after `delay` ticks, then every `period`
    /// ticks (`period == 0`: once).
    ///
    /// Takes the first free slot and returns its index. Fails with
    /// [`SchedulerError::TooManyTasks`] when the table is full, leaving it
    /// unchanged. Mainline context only.
    pub fn add_task(
        &self,
        routine: &'a dyn Runnable,
        delay: Ticks,
        period: Ticks,
    ) -> Result<TaskId, SchedulerError> {
        let guard = CsGuard::acquire();
        let mut state = self.state.borrow_ref_mut(guard.token());

        let free = state.tasks.iter().position(Task::is_empty);
        let Some(index) = free else {
            let error = state.record(SchedulerError::TooManyTasks);
            crate::log_warn!("add_task: all {} slots in use", N);
            return Err(error);
        };

        state.tasks[index].occupy(routine, delay, period);
        crate::log_debug!("add_task: slot {} delay {} period {}", index, delay, period);
        Ok(TaskId::new(index))
    }

    /// Remove a task. The slot is fully reset whatever it held.
    ///
    /// Deleting an empty slot still resets it but reports
    /// [`SchedulerError::CannotDeleteTask`]. An id outside the table is
    /// rejected with [`SchedulerError::InvalidTaskId`] and changes nothing.
    /// Mainline context only.
    pub fn delete_task(&self, id: TaskId) -> Result<(), SchedulerError> {
        let guard = CsGuard::acquire();
        let mut state = self.state.borrow_ref_mut(guard.token());

        let index = id.index();
        if index >= N {
            crate::log_warn!("delete_task: id {} out of range", index);
            return Err(state.record(SchedulerError::InvalidTaskId));
        }

        let was_empty = state.tasks[index].is_empty();
        state.tasks[index].clear();

        if was_empty {
            crate::log_warn!("delete_task: slot {} already empty", index);
            return Err(state.record(SchedulerError::CannotDeleteTask));
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Tick handler
    // -----------------------------------------------------------------------

    /// Advance every task by one tick. Called from the tick interrupt.
    ///
    /// Only countdowns and due flags change. Never runs a task body,
    /// never frees a slot, never logs.
    pub fn tick(&self) {
        sync::critical_section(|cs| {
            let mut state = self.state.borrow_ref_mut(cs);
            state.ticks = state.ticks.wrapping_add(1);
            for task in state.tasks.iter_mut() {
                task.on_tick();
            }
        });
    }

    // -----------------------------------------------------------------------
    // Dispatcher
    // -----------------------------------------------------------------------

    /// Run every due task once, in slot order, then report status.
    ///
    /// Returns the number of task bodies run. A task added during the pass
    /// may or may not run in that same pass. Must not be called from a
    /// task body; that is rejected with
    /// [`SchedulerError::DispatchReentered`].
    pub fn dispatch_tasks<P: Port>(&self, port: &mut P) -> Result<usize, SchedulerError> {
        let entered = sync::critical_section(|cs| {
            let mut state = self.state.borrow_ref_mut(cs);
            !core::mem::replace(&mut state.dispatching, true)
        });
        if !entered {
            crate::log_error!("dispatcher re-entered from a task body");
            return Err(SchedulerError::DispatchReentered);
        }

        let mut ran = 0;
        for index in 0..N {
            let due = sync::critical_section(|cs| {
                let state = self.state.borrow_ref(cs);
                let task = &state.tasks[index];
                if task.due {
                    task.routine.map(|routine| (routine, task.generation))
                } else {
                    None
                }
            });
            let Some((routine, generation)) = due else {
                continue;
            };

            crate::log_trace!("dispatch: slot {}", index);
            routine.run();
            ran += 1;

            sync::critical_section(|cs| {
                let mut state = self.state.borrow_ref_mut(cs);
                let task = &mut state.tasks[index];
                // The body may have deleted itself, and the slot been reused.
                if task.generation == generation {
                    task.due = false;
                    if task.period == 0 {
                        task.clear();
                    }
                }
            });
        }

        self.report_status(port);

        sync::critical_section(|cs| {
            self.state.borrow_ref_mut(cs).dispatching = false;
        });
        Ok(ran)
    }

    /// One main-loop iteration: dispatch, report, then idle until the
    /// next tick.
    pub fn dispatch_once<P: Port>(&self, port: &mut P) -> Result<usize, SchedulerError> {
        let ran = self.dispatch_tasks(port)?;
        port.idle();
        Ok(ran)
    }

    /// Push a changed error code to the port's display and run the
    /// self-clearing timeout.
    pub fn report_status<P: Port>(&self, port: &mut P) {
        let changed = sync::critical_section(|cs| {
            let mut state = self.state.borrow_ref_mut(cs);
            let state = &mut *state;
            state.reporter.update(&mut state.error)
        });

        if let Some(code) = changed {
            if code.is_error() {
                crate::log_warn!("error code now {}", code);
            }
            port.show_error(code);
        }
    }

    // -----------------------------------------------------------------------
    // Error channel and introspection
    // -----------------------------------------------------------------------

    /// Most recent fault.
    pub fn error_code(&self) -> ErrorCode {
        sync::critical_section(|cs| self.state.borrow_ref(cs).error)
    }

    /// Record a fault from outside the scheduler, e.g. a console driver or
    /// the tick source. Safe from interrupt context.
    pub fn record_error(&self, code: ErrorCode) {
        sync::critical_section(|cs| {
            self.state.borrow_ref_mut(cs).error = code;
        });
    }

    /// Ticks since `init`, wrapping.
    pub fn ticks(&self) -> u32 {
        sync::critical_section(|cs| self.state.borrow_ref(cs).ticks)
    }

    /// Start a timeout of `duration` ticks from now.
    pub fn timeout(&self, duration: Ticks) -> Timeout {
        Timeout::new(self.ticks(), duration)
    }

    /// Snapshot of an occupied slot; `None` if empty or out of range.
    pub fn task(&self, id: TaskId) -> Option<TaskInfo> {
        sync::critical_section(|cs| {
            self.state
                .borrow_ref(cs)
                .tasks
                .get(id.index())
                .and_then(Task::info)
        })
    }

    /// Number of occupied slots.
    pub fn task_count(&self) -> usize {
        sync::critical_section(|cs| {
            self.state
                .borrow_ref(cs)
                .tasks
                .iter()
                .filter(|task| !task.is_empty())
                .count()
        })
    }
}

// ---------------------------------------------------------------------------
// Unit tests (host-only)
// ---------------------------------------------------------------------------
