//! Console output
//!
//! All user-facing pipeline output goes through this module so levels stay
//! consistently colored: info is cyan, warnings yellow, errors red.

use colored::Colorize;

/// Output levels for console messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Default,
    Info,
    Warning,
    Error,
}

/// Print a message at the given level
pub fn log(message: &str, level: LogLevel) {
    match level {
        LogLevel::Default => println!("{}", message),
        LogLevel::Info => println!("{}", message.cyan()),
        LogLevel::Warning => println!("{}", message.yellow()),
        LogLevel::Error => eprintln!("{}", message.red()),
    }
}

/// Print a plain message
pub fn plain(message: &str) {
    log(message, LogLevel::Default);
}

/// Print an informational message
pub fn info(message: &str) {
    log(message, LogLevel::Info);
}

/// Print a warning
pub fn warn(message: &str) {
    log(message, LogLevel::Warning);
}

/// Print an error
pub fn error(message: &str) {
    log(message, LogLevel::Error);
}

/// Print a message only when `condition` holds
pub fn log_if(condition: bool, message: &str, level: LogLevel) {
    if condition {
        log(message, level);
    }
}

/// Report an exit code as either of two messages
pub fn log_exit_code(exit_code: i32, ok_message: &str, error_message: &str) {
    if exit_code == 0 {
        info(ok_message);
    } else {
        error(error_message);
    }
}
