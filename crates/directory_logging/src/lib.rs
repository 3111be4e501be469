#![deny(missing_docs)]
//! Shared logging utilities for the directory workspace.
//!
//! This crate provides the `directory_*` logging macros used across the codebase
//! and a minimal test initializer for the global logger. Messages logged while a
//! listing request is active on the current thread are tagged with its sequence
//! number, so a stale response can be told apart from the one that won.

use std::cell::Cell;

#[doc(hidden)]
pub use log as __log;

thread_local! {
    /// Sequence number of the listing request being handled on this thread (0 = none).
    static ACTIVE_REQUEST: Cell<u64> = const { Cell::new(0) };
}

/// Marks `seq` as the active listing request for the current thread.
pub fn set_active_request(seq: u64) {
    ACTIVE_REQUEST.with(|v| v.set(seq));
}

/// Clears the active listing request for the current thread.
pub fn clear_active_request() {
    ACTIVE_REQUEST.with(|v| v.set(0));
}

/// Returns the active listing request for the current thread, if any.
pub fn active_request() -> Option<u64> {
    match ACTIVE_REQUEST.with(|v| v.get()) {
        0 => None,
        seq => Some(seq),
    }
}

/// Guard that tags log output with a request sequence until dropped.
///
/// The previously active request (if any) is restored on drop.
pub struct RequestScope {
    previous: u64,
}

impl Drop for RequestScope {
    fn drop(&mut self) {
        let previous = self.previous;
        ACTIVE_REQUEST.with(|v| v.set(previous));
    }
}

/// Tags log output on the current thread with `seq` for the lifetime of the guard.
pub fn request_scope(seq: u64) -> RequestScope {
    let previous = ACTIVE_REQUEST.with(|v| v.replace(seq));
    RequestScope { previous }
}

#[doc(hidden)]
#[macro_export]
macro_rules! __directory_log {
    ($level:ident, $($arg:tt)*) => {{
        match $crate::active_request() {
            Some(seq) => $crate::__log::$level!("[req {}] {}", seq, format_args!($($arg)*)),
            None => $crate::__log::$level!($($arg)*),
        }
    }};
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! directory_trace {
    ($($arg:tt)*) => {{
        $crate::__directory_log!(trace, $($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! directory_info {
    ($($arg:tt)*) => {{
        $crate::__directory_log!(info, $($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! directory_debug {
    ($($arg:tt)*) => {{
        $crate::__directory_log!(debug, $($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! directory_warn {
    ($($arg:tt)*) => {{
        $crate::__directory_log!(warn, $($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! directory_error {
    ($($arg:tt)*) => {{
        $crate::__directory_log!(error, $($arg)*);
    }};
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Another test may already own the global logger.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
