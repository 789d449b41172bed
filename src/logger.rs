//! Structured logging system with visual formatting.
//!
//! This module provides a logging system designed for rhythmr's visual output
//! style. It includes different log levels and special formatting functions
//! for creating structured output with Unicode box drawing characters.
//!
//! The logger supports runtime enable/disable functionality for quiet
//! operation when the engine is embedded in a host process or under test.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

// Use an AtomicBool instead of thread_local for thread safety
static LOGGING_ENABLED: AtomicBool = AtomicBool::new(true);

/// Main logging interface providing structured output formatting.
///
/// ## Logging Conventions
///
/// - **`log_block_start!`**: initiates a new conceptual block of log
///   information (e.g. "Applying schedule override", "Clearing expired
///   overrides"). Prepends an empty pipe `┃`, then prints `┣ message`.
/// - **`log_decorated!`**: messages that continue an existing block, or
///   simple single-line status messages. Prints `┣ message`.
/// - **`log_indented!`**: nested data or sub-items belonging to a parent
///   message. Prints `┃   message`.
/// - **`log_pipe!`**: a single empty prefixed line (`┃`) for vertical
///   spacing, usually before a warning/error line.
/// - **`log_info!`, `log_warning!`, `log_debug!`**: semantic level macros
///   with a `[LEVEL]` prefix.
pub struct Log;

impl Log {
    /// Enable or disable logging temporarily.
    ///
    /// This is useful for quiet operation when the engine runs inside a host
    /// process that has its own logging, or during tests where log output
    /// would interfere with results.
    pub fn set_enabled(enabled: bool) {
        LOGGING_ENABLED.store(enabled, Ordering::SeqCst);
    }

    /// Check if logging is currently enabled.
    pub fn is_enabled() -> bool {
        LOGGING_ENABLED.load(Ordering::SeqCst)
    }
}

// Public function that routes output (needed by macros)
pub fn write_output(text: &str) {
    print!("{text}");
    let _ = std::io::stdout().flush();
}

// # Logging Macros

/// Log a decorated message, typically as part of an existing block or for standalone emphasis.
#[macro_export]
macro_rules! log_decorated {
    // Format string literal (with or without args) - always pass through format!
    ($fmt:literal $($arg:tt)*) => {{
        use $crate::logger::Log;
        if Log::is_enabled() {
            let message = format!($fmt $($arg)*);
            let formatted = format!("┣ {message}\n");
            $crate::logger::write_output(&formatted);
        }
    }};
    // Non-literal expression - convert to string
    ($expr:expr) => {{
        use $crate::logger::Log;
        if Log::is_enabled() {
            let expr = $expr;
            let formatted = format!("┣ {expr}\n");
            $crate::logger::write_output(&formatted);
        }
    }};
}

/// Log an indented message for sub-items or details within a block.
#[macro_export]
macro_rules! log_indented {
    // Format string literal (with or without args) - always pass through format!
    ($fmt:literal $($arg:tt)*) => {{
        use $crate::logger::Log;
        if Log::is_enabled() {
            let message = format!($fmt $($arg)*);
            let formatted = format!("┃   {message}\n");
            $crate::logger::write_output(&formatted);
        }
    }};
    // Non-literal expression - convert to string
    ($expr:expr) => {{
        use $crate::logger::Log;
        if Log::is_enabled() {
            let expr = $expr;
            let formatted = format!("┃   {expr}\n");
            $crate::logger::write_output(&formatted);
        }
    }};
}

/// Log a visual pipe separator for vertical spacing.
#[macro_export]
macro_rules! log_pipe {
    () => {{
        use $crate::logger::Log;
        if Log::is_enabled() {
            $crate::logger::write_output("┃\n");
        }
    }};
}

/// Log a block start message, initiating a new conceptual block of information.
#[macro_export]
macro_rules! log_block_start {
    // Format string literal (with or without args) - always pass through format!
    ($fmt:literal $($arg:tt)*) => {{
        use $crate::logger::Log;
        if Log::is_enabled() {
            let message = format!($fmt $($arg)*);
            let formatted = format!("┃\n┣ {message}\n");
            $crate::logger::write_output(&formatted);
        }
    }};
    // Non-literal expression - convert to string
    ($expr:expr) => {{
        use $crate::logger::Log;
        if Log::is_enabled() {
            let expr = $expr;
            let formatted = format!("┃\n┣ {expr}\n");
            $crate::logger::write_output(&formatted);
        }
    }};
}

/// Log a warning message with pipe prefix and yellow-colored text.
#[macro_export]
macro_rules! log_warning {
    // Format string literal (with or without args) - always pass through format!
    ($fmt:literal $($arg:tt)*) => {{
        use $crate::logger::Log;
        if Log::is_enabled() {
            let message = format!($fmt $($arg)*);
            let formatted = format!("┣[\x1b[33mWARNING\x1b[0m] {message}\n");
            $crate::logger::write_output(&formatted);
        }
    }};
    // Non-literal expression - convert to string
    ($expr:expr) => {{
        use $crate::logger::Log;
        if Log::is_enabled() {
            let expr = $expr;
            let formatted = format!("┣[\x1b[33mWARNING\x1b[0m] {expr}\n");
            $crate::logger::write_output(&formatted);
        }
    }};
}

/// Log an informational message with pipe prefix.
#[macro_export]
macro_rules! log_info {
    // Format string literal (with or without args) - always pass through format!
    ($fmt:literal $($arg:tt)*) => {{
        use $crate::logger::Log;
        if Log::is_enabled() {
            let message = format!($fmt $($arg)*);
            let formatted = format!("┣[\x1b[32mINFO\x1b[0m] {message}\n");
            $crate::logger::write_output(&formatted);
        }
    }};
    // Non-literal expression - convert to string
    ($expr:expr) => {{
        use $crate::logger::Log;
        if Log::is_enabled() {
            let expr = $expr;
            let formatted = format!("┣[\x1b[32mINFO\x1b[0m] {expr}\n");
            $crate::logger::write_output(&formatted);
        }
    }};
}

/// Log a debug message with pipe prefix.
#[macro_export]
macro_rules! log_debug {
    // Format string literal (with or without args) - always pass through format!
    ($fmt:literal $($arg:tt)*) => {{
        use $crate::logger::Log;
        if Log::is_enabled() {
            let message = format!($fmt $($arg)*);
            let formatted = format!("┣[\x1b[36mDEBUG\x1b[0m] {message}\n");
            $crate::logger::write_output(&formatted);
        }
    }};
    // Non-literal expression - convert to string
    ($expr:expr) => {{
        use $crate::logger::Log;
        if Log::is_enabled() {
            let expr = $expr;
            let formatted = format!("┣[\x1b[36mDEBUG\x1b[0m] {expr}\n");
            $crate::logger::write_output(&formatted);
        }
    }};
}
