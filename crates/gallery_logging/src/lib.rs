#![deny(missing_docs)]
//! Shared logging utilities for the gallery workspace.
//!
//! This crate provides the `gallery_*` logging macros used across the codebase,
//! a URL shortener for log lines and a minimal test initializer for the global
//! logger.

/// Maximum number of characters of a URL written into a single log line.
pub const LOG_URL_CHARS: usize = 50;

/// Returns the first [`LOG_URL_CHARS`] characters of `url`, with `...` appended
/// when the URL was cut.
pub fn short_url(url: &str) -> String {
    match url.char_indices().nth(LOG_URL_CHARS) {
        Some((end, _)) => format!("{}...", &url[..end]),
        None => url.to_string(),
    }
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! gallery_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! gallery_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! gallery_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! gallery_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! gallery_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
