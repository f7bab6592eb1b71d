//! # Scheduler Errors
//!
//! Two views of the same faults:
//! - [`SchedulerError`] is returned to the immediate caller.
//! - [`ErrorCode`] is the one-byte side channel holding the most recent
//!   fault, surfaced by the status reporter and readable by telemetry.
//!
//! Recoverable faults never halt the system. The scheduler records the code,
//! hands the error back, and performs no retries of its own.

use core::fmt;

/// Failure returned by scheduler operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SchedulerError {
    /// `add_task` found no free slot in the task table.
    TooManyTasks,
    /// `delete_task` targeted a slot that was already empty.
    CannotDeleteTask,
    /// The task id does not index into this scheduler's table.
    InvalidTaskId,
    /// The tick source could not be configured at the requested interval.
    TickSourceFailed,
    /// `dispatch_once` was called from inside a task body.
    DispatchReentered,
}

impl SchedulerError {
    /// Error code recorded in the side channel for this failure.
    pub const fn code(self) -> ErrorCode {
        match self {
            SchedulerError::TooManyTasks => ErrorCode::TooManyTasks,
            SchedulerError::CannotDeleteTask | SchedulerError::InvalidTaskId => {
                ErrorCode::CannotDeleteTask
            }
            SchedulerError::TickSourceFailed => ErrorCode::TickSourceFailure,
            // Not a fault of the system, only of the caller: nothing to display.
            SchedulerError::DispatchReentered => ErrorCode::NoError,
        }
    }
}

impl fmt::Display for SchedulerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedulerError::TooManyTasks => write!(f, "task table full"),
            SchedulerError::CannotDeleteTask => write!(f, "no task in slot"),
            SchedulerError::InvalidTaskId => write!(f, "task id out of range"),
            SchedulerError::TickSourceFailed => write!(f, "tick source failed"),
            SchedulerError::DispatchReentered => write!(f, "dispatcher re-entered"),
        }
    }
}

/// Most recent fault, as shown on the error display.
///
/// Values are stable: they end up on LEDs and in telemetry frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ErrorCode {
    #[default]
    NoError = 0,
    TooManyTasks = 1,
    CannotDeleteTask = 2,
    TickSourceFailure = 3,
    /// Console transmitter did not become ready.
    UsartTransmit = 21,
    /// Console could not queue a character.
    UsartWriteChar = 22,
}

impl ErrorCode {
    /// Raw byte value.
    #[inline]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Byte to drive onto an active-low LED bank.
    #[inline]
    pub const fn led_pattern(self) -> u8 {
        255 - self as u8
    }

    #[inline]
    pub const fn is_error(self) -> bool {
        !matches!(self, ErrorCode::NoError)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorCode::NoError => "no error",
            ErrorCode::TooManyTasks => "too many tasks",
            ErrorCode::CannotDeleteTask => "cannot delete task",
            ErrorCode::TickSourceFailure => "tick source failure",
            ErrorCode::UsartTransmit => "usart transmit",
            ErrorCode::UsartWriteChar => "usart write char",
        };
        write!(f, "{} (EC{})", name, self.as_u8())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(ErrorCode::NoError.as_u8(), 0);
        assert_eq!(ErrorCode::TooManyTasks.as_u8(), 1);
        assert_eq!(ErrorCode::CannotDeleteTask.as_u8(), 2);
        assert_eq!(ErrorCode::UsartTransmit.as_u8(), 21);
        assert_eq!(ErrorCode::UsartWriteChar.as_u8(), 22);
    }

    #[test]
    fn test_led_pattern_is_active_low() {
        assert_eq!(ErrorCode::NoError.led_pattern(), 0xFF);
        assert_eq!(ErrorCode::CannotDeleteTask.led_pattern(), 0xFD);
    }

    #[test]
    fn test_error_maps_to_code() {
        assert_eq!(SchedulerError::TooManyTasks.code(), ErrorCode::TooManyTasks);
        assert_eq!(SchedulerError::InvalidTaskId.code(), ErrorCode::CannotDeleteTask);
        assert_eq!(
            SchedulerError::TickSourceFailed.code(),
            ErrorCode::TickSourceFailure
        );
        assert!(!SchedulerError::DispatchReentered.code().is_error());
    }

    #[test]
    fn test_display() {
        assert_eq!(SchedulerError::TooManyTasks.to_string(), "task table full");
        assert_eq!(
            ErrorCode::TooManyTasks.to_string(),
            "too many tasks (EC1)"
        );
    }
}
