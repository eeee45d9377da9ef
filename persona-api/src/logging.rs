//! Unified logging support for the persona crates
//!
//! These macros forward to the `log` crate when the `log` feature of
//! `persona-api` is enabled. Without it they still type-check their
//! arguments, so parameters only used for logging never trigger unused
//! variable warnings, but nothing is emitted.

#[cfg(feature = "log")]
#[doc(hidden)]
pub use log as __log;

/// Unified trace-level logging
#[cfg(feature = "log")]
#[macro_export]
macro_rules! pna_trace {
    ($($arg:tt)*) => { $crate::logging::__log::trace!($($arg)*) }
}

/// Unified debug-level logging
#[cfg(feature = "log")]
#[macro_export]
macro_rules! pna_debug {
    ($($arg:tt)*) => { $crate::logging::__log::debug!($($arg)*) }
}

/// Unified info-level logging
#[cfg(feature = "log")]
#[macro_export]
macro_rules! pna_info {
    ($($arg:tt)*) => { $crate::logging::__log::info!($($arg)*) }
}

/// Unified warn-level logging
#[cfg(feature = "log")]
#[macro_export]
macro_rules! pna_warn {
    ($($arg:tt)*) => { $crate::logging::__log::warn!($($arg)*) }
}

/// Unified error-level logging
#[cfg(feature = "log")]
#[macro_export]
macro_rules! pna_error {
    ($($arg:tt)*) => { $crate::logging::__log::error!($($arg)*) }
}

#[cfg(not(feature = "log"))]
#[macro_export]
macro_rules! pna_trace {
    ($($arg:tt)*) => {{ let _ = format_args!($($arg)*); }}
}

#[cfg(not(feature = "log"))]
#[macro_export]
macro_rules! pna_debug {
    ($($arg:tt)*) => {{ let _ = format_args!($($arg)*); }}
}

#[cfg(not(feature = "log"))]
#[macro_export]
macro_rules! pna_info {
    ($($arg:tt)*) => {{ let _ = format_args!($($arg)*); }}
}

#[cfg(not(feature = "log"))]
#[macro_export]
macro_rules! pna_warn {
    ($($arg:tt)*) => {{ let _ = format_args!($($arg)*); }}
}

#[cfg(not(feature = "log"))]
#[macro_export]
macro_rules! pna_error {
    ($($arg:tt)*) => {{ let _ = format_args!($($arg)*); }}
}
