//! # Synchronization Primitives
//!
//! Interrupt-safe critical sections. The task table is shared between the
//! tick interrupt and mainline code, so every access goes through one of
//! these.
//!
//! The backing implementation comes from the `critical-section` crate:
//! `cortex-m`'s single-core implementation (PRIMASK) on target, the `std`
//! implementation in host tests.

use ::critical_section::{CriticalSection, RestoreState};

/// Execute a closure within a critical section (interrupts disabled).
///
/// # Usage
/// ```ignore
/// sync::critical_section(|cs| {
///     // Access shared state safely
/// });
/// ```
#[inline]
pub fn critical_section<F, R>(f: F) -> R
where
    F: FnOnce(CriticalSection<'_>) -> R,
{
    ::critical_section::with(f)
}

/// A critical section which restores the previous interrupt state on drop.
///
/// Used where a function has several exit paths that must all release the
/// section. Guards nest; they must be dropped in reverse order of
/// acquisition, which scoping guarantees.
pub struct CsGuard {
    restore: RestoreState,
}

impl CsGuard {
    /// Enter a critical section.
    #[inline]
    pub fn acquire() -> Self {
        // Safety: released exactly once, in `Drop`.
        let restore = unsafe { ::critical_section::acquire() };
        Self { restore }
    }

    /// Token proving the section is held, valid while the guard is borrowed.
    #[inline]
    pub fn token(&self) -> CriticalSection<'_> {
        // Safety: the section stays held for as long as `self` lives.
        unsafe { CriticalSection::new() }
    }
}

impl Drop for CsGuard {
    #[inline]
    fn drop(&mut self) {
        // Safety: matches the `acquire` in `CsGuard::acquire`.
        unsafe { ::critical_section::release(self.restore) }
    }
}
