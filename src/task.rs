//! # Task Slots
//!
//! Defines one entry of the scheduler's task table and the callable
//! abstraction that task bodies implement.
//!
//! ## Slot Lifecycle
//!
//! ```text
//!                 add_task()                     countdown == 0
//!   ┌─────────┐ ─────────────► ┌──────────┐ ──────────────────► ┌─────┐
//!   │  Empty  │                │ Counting │                     │ Due │
//!   └─────────┘ ◄───────────── └──────────┘ ◄────────────────── └─────┘
//!        ▲       delete_task()                dispatched,            │
//!        │                                    period > 0             │
//!        └──────────────────────────────────────────────────────────┘
//!                        dispatched, period == 0 (one-shot)
//! ```
//!
//! An empty slot is fully reset: no routine, `period == 0`,
//! `countdown == 0`, `due == false`.

use core::fmt;

/// Scheduler time unit. Delays and periods are counted in ticks.
pub type Ticks = u16;

/// A task body: takes nothing, returns nothing, runs to completion.
///
/// Bodies run in mainline context with the tick interrupt live. They must
/// not block. Any state they keep lives behind `&self`, so it must be
/// interrupt-safe (`Sync`): atomics, `critical_section::Mutex`, or similar.
///
/// Implemented for every `Fn() + Sync`, including plain `fn()` pointers.
pub trait Runnable: Sync {
    fn run(&self);
}

impl<F> Runnable for F
where
    F: Fn() + Sync,
{
    #[inline]
    fn run(&self) {
        self()
    }
}

/// Handle returned by `add_task`: the slot index of the task.
///
/// Indices are reused once a slot is freed, so a stale id may refer to a
/// newer task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TaskId(usize);

impl TaskId {
    /// Build an id from a raw slot index. Range is checked when used.
    #[inline]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Read-only copy of an occupied slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TaskInfo {
    pub period: Ticks,
    pub countdown: Ticks,
    pub due: bool,
}

impl TaskInfo {
    #[inline]
    pub const fn is_one_shot(&self) -> bool {
        self.period == 0
    }
}

/// One slot of the task table.
#[derive(Clone, Copy)]
pub struct Task<'a> {
    /// Task body. `None` marks the slot as free.
    pub routine: Option<&'a dyn Runnable>,

    /// Ticks between successive runs. `0` means run once, then remove.
    pub period: Ticks,

    /// Ticks left until the task is next due.
    pub countdown: Ticks,

    /// Set by the tick handler, cleared by the dispatcher after the run.
    pub due: bool,

    /// Bumped on every `occupy` and `clear`. Tells a slot's tenants apart
    /// even when their routines share an address.
    pub generation: u16,
}

impl<'a> Task<'a> {
    /// A free slot. Used to initialize the table.
    pub const EMPTY: Self = Self {
        routine: None,
        period: 0,
        countdown: 0,
        due: false,
        generation: 0,
    };

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.routine.is_none()
    }

    /// Populate a free slot. The task first becomes due after `delay` ticks.
    pub fn occupy(&mut self, routine: &'a dyn Runnable, delay: Ticks, period: Ticks) {
        self.routine = Some(routine);
        self.countdown = delay;
        self.period = period;
        self.due = false;
        self.generation = self.generation.wrapping_add(1);
    }

    /// Reset every field, whatever the slot held. Only the generation survives,
    /// advanced by one.
    #[inline]
    pub fn clear(&mut self) {
        *self = Self {
            generation: self.generation.wrapping_add(1),
            ..Self::EMPTY
        };
    }

    /// Advance by one tick. Interrupt context: touches `countdown` and `due` only.
    ///
    /// A due task is re-armed so it falls due again `period` ticks later.
    /// One-shot tasks stay due on every tick until the dispatcher removes them.
    #[inline]
    pub fn on_tick(&mut self) {
        if self.routine.is_none() {
            return;
        }
        if self.countdown == 0 {
            self.due = true;
            // The reload tick itself counts as the first of the period.
            self.countdown = self.period.saturating_sub(1);
        } else {
            self.countdown -= 1;
        }
    }

    pub fn info(&self) -> Option<TaskInfo> {
        self.routine.map(|_| TaskInfo {
            period: self.period,
            countdown: self.countdown,
            due: self.due,
        })
    }
}

impl fmt::Debug for Task<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("occupied", &self.routine.is_some())
            .field("period", &self.period)
            .field("countdown", &self.countdown)
            .field("due", &self.due)
            .field("generation", &self.generation)
            .finish()
    }
}

impl Default for Task<'_> {
    fn default() -> Self {
        Self::EMPTY
    }
}

// ---------------------------------------------------------------------------
// Unit tests (host-only)
// ---------------------------------------------------------------------------
