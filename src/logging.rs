//! Logging abstraction
//!
//! One set of macros for every build:
//! - `defmt` feature: forwarded to `defmt` (RTT on the demo firmware)
//! - Host tests: printed with a level prefix
//! - Otherwise: no-op; the arguments are still type-checked
//!
//! Format strings must stay within the common subset of `defmt` and
//! `core::fmt` (plain `{}` placeholders).

/// Log informational message
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::info!($($arg)*);

        #[cfg(all(not(feature = "defmt"), test))]
        println!("[INFO] {}", ::core::format_args!($($arg)*));

        #[cfg(all(not(feature = "defmt"), not(test)))]
        let _ = ::core::format_args!($($arg)*);
    }};
}

/// Log warning message
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::warn!($($arg)*);

        #[cfg(all(not(feature = "defmt"), test))]
        println!("[WARN] {}", ::core::format_args!($($arg)*));

        #[cfg(all(not(feature = "defmt"), not(test)))]
        let _ = ::core::format_args!($($arg)*);
    }};
}

/// Log error message
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::error!($($arg)*);

        #[cfg(all(not(feature = "defmt"), test))]
        eprintln!("[ERROR] {}", ::core::format_args!($($arg)*));

        #[cfg(all(not(feature = "defmt"), not(test)))]
        let _ = ::core::format_args!($($arg)*);
    }};
}

/// Log debug message
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::debug!($($arg)*);

        #[cfg(all(not(feature = "defmt"), test))]
        println!("[DEBUG] {}", ::core::format_args!($($arg)*));

        #[cfg(all(not(feature = "defmt"), not(test)))]
        let _ = ::core::format_args!($($arg)*);
    }};
}

/// Log trace message
#[macro_export]
macro_rules! log_trace {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::trace!($($arg)*);

        #[cfg(all(not(feature = "defmt"), test))]
        println!("[TRACE] {}", ::core::format_args!($($arg)*));

        #[cfg(all(not(feature = "defmt"), not(test)))]
        let _ = ::core::format_args!($($arg)*);
    }};
}
