/// Galaxy3D Diagnostics - global diagnostic sink for the descriptor tracker
///
/// Holds the process-wide logger behind a RwLock so validation threads can
/// report concurrently. The logger starts as `DefaultLogger` and can be
/// replaced by the embedding layer (e.g. to forward to a debug callback).

use std::sync::{OnceLock, RwLock};
use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};

/// Global logger (initialized with DefaultLogger)
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

fn logger() -> &'static RwLock<Box<dyn Logger>> {
    LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)))
}

/// Entry point for the diagnostic sink
///
/// # Example
///
/// ```no_run
/// use galaxy_3d_descriptor::galaxy3d::{Diagnostics, log::{Logger, LogEntry}};
///
/// struct CallbackLogger;
/// impl Logger for CallbackLogger {
///     fn log(&self, entry: &LogEntry) {
///         // Forward to the debug report callback...
///     }
/// }
///
/// Diagnostics::set_logger(CallbackLogger);
/// ```
pub struct Diagnostics;

impl Diagnostics {
    /// Replace the current logger
    pub fn set_logger<L: Logger + 'static>(logger_impl: L) {
        if let Ok(mut lock) = logger().write() {
            *lock = Box::new(logger_impl);
        }
    }

    /// Reset logger to default (DefaultLogger)
    pub fn reset_logger() {
        if let Ok(mut lock) = logger().write() {
            *lock = Box::new(DefaultLogger);
        }
    }

    /// Hand a fully built report to the current logger
    pub fn emit(entry: LogEntry) {
        if let Ok(lock) = logger().read() {
            lock.log(&entry);
        }
    }

    /// Report with no object, code or location
    ///
    /// Used by descriptor_info!, descriptor_warn!, etc. without an object group.
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        Self::emit(LogEntry::new(severity, source, message));
    }

    /// Report carrying the reporting file and line
    pub fn log_detailed(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        Self::emit(LogEntry::new(severity, source, message).at(file, line));
    }
}
