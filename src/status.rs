//! # Status Reporting
//!
//! Surfaces the error-code side channel once per dispatch pass.
//!
//! A new code is pushed to the display as soon as it changes. With a
//! timeout configured, a code that stays unchanged for that many passes
//! is reset to [`ErrorCode::NoError`], so a transient fault does not
//! linger on the display forever.

use crate::error::ErrorCode;

/// Tracks what is on the display and how long it has been there.
#[derive(Debug, Clone, Copy)]
pub struct StatusReporter {
    /// Code last pushed to the display.
    shown: ErrorCode,
    /// Passes left before the current code is cleared (0 = not counting).
    remaining: u16,
    /// Self-clear timeout in passes, `None` to keep errors indefinitely.
    timeout: Option<u16>,
}

impl StatusReporter {
    pub const fn new(timeout: Option<u16>) -> Self {
        Self {
            shown: ErrorCode::NoError,
            remaining: 0,
            timeout,
        }
    }

    pub fn reset(&mut self) {
        self.shown = ErrorCode::NoError;
        self.remaining = 0;
    }

    pub fn shown(&self) -> ErrorCode {
        self.shown
    }

    /// One reporting step.
    ///
    /// Returns the code to display when it differs from what is shown.
    /// May reset `current` to `NoError` once the timeout runs out; the
    /// cleared code is displayed on the following pass.
    pub fn update(&mut self, current: &mut ErrorCode) -> Option<ErrorCode> {
        if *current != self.shown {
            self.shown = *current;
            self.remaining = match self.timeout {
                Some(ticks) if current.is_error() => ticks,
                _ => 0,
            };
            return Some(*current);
        }

        if self.remaining != 0 {
            self.remaining -= 1;
            if self.remaining == 0 {
                *current = ErrorCode::NoError;
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reports_only_changes() {
        let mut reporter = StatusReporter::new(None);
        let mut code = ErrorCode::NoError;
        assert_eq!(reporter.update(&mut code), None);

        code = ErrorCode::TooManyTasks;
        assert_eq!(reporter.update(&mut code), Some(ErrorCode::TooManyTasks));
        assert_eq!(reporter.update(&mut code), None);
        assert_eq!(reporter.shown(), ErrorCode::TooManyTasks);
    }

    #[test]
    fn test_without_timeout_error_persists() {
        let mut reporter = StatusReporter::new(None);
        let mut code = ErrorCode::CannotDeleteTask;
        reporter.update(&mut code);
        for _ in 0..1000 {
            assert_eq!(reporter.update(&mut code), None);
        }
        assert_eq!(code, ErrorCode::CannotDeleteTask);
    }

    #[test]
    fn test_timeout_clears_unchanged_error() {
        let mut reporter = StatusReporter::new(Some(3));
        let mut code = ErrorCode::TooManyTasks;

        assert_eq!(reporter.update(&mut code), Some(ErrorCode::TooManyTasks));
        assert_eq!(reporter.update(&mut code), None);
        assert_eq!(reporter.update(&mut code), None);
        assert_eq!(code, ErrorCode::TooManyTasks);
        assert_eq!(reporter.update(&mut code), None);
        assert_eq!(code, ErrorCode::NoError);

        // The cleared state reaches the display on the next pass.
        assert_eq!(reporter.update(&mut code), Some(ErrorCode::NoError));
    }

    #[test]
    fn test_new_error_restarts_timeout() {
        let mut reporter = StatusReporter::new(Some(2));
        let mut code = ErrorCode::TooManyTasks;
        reporter.update(&mut code);
        reporter.update(&mut code);

        code = ErrorCode::CannotDeleteTask;
        assert_eq!(reporter.update(&mut code), Some(ErrorCode::CannotDeleteTask));
        reporter.update(&mut code);
        assert_eq!(code, ErrorCode::CannotDeleteTask);
        reporter.update(&mut code);
        assert_eq!(code, ErrorCode::NoError);
    }
}
