//! Validation report sink for the Galaxy3D descriptor tracker
//!
//! Every report names the layer that raised it (`"DS"`), and validation
//! failures additionally name the Vulkan object they concern and a stable
//! message code (`DRAWSTATE_*`) that debug callbacks can filter on.

use std::fmt::{self, Write as _};
use std::time::SystemTime;
use chrono::{DateTime, Local};
use colored::*;
use crate::descriptor::{DescriptorSetHandle, DescriptorSetLayoutHandle};

/// Layer prefix attached to every report
pub const LAYER_PREFIX: &str = "DS";

/// Receiver of validation reports
///
/// Validation layers usually route reports to the application's debug
/// callback. Implement this trait to do so.
///
/// # Example
///
/// ```no_run
/// use galaxy_3d_descriptor::galaxy3d::log::{Logger, LogEntry};
///
/// struct CallbackLogger;
///
/// impl Logger for CallbackLogger {
///     fn log(&self, entry: &LogEntry) {
///         // Forward entry.code, entry.object and entry.message to the callback...
///     }
/// }
/// ```
pub trait Logger: Send + Sync {
    fn log(&self, entry: &LogEntry);
}

/// Report severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogSeverity {
    /// Every applied update, when update tracing is on
    Trace,
    Debug,
    Info,
    Warn,
    /// Validation failures
    Error,
}

impl LogSeverity {
    fn label(self) -> ColoredString {
        match self {
            LogSeverity::Trace => "TRACE".bright_black(),
            LogSeverity::Debug => "DEBUG".cyan(),
            LogSeverity::Info => "INFO ".green(),
            LogSeverity::Warn => "WARN ".yellow(),
            LogSeverity::Error => "ERROR".red().bold(),
        }
    }
}

// ===== REPORTED OBJECTS =====

/// Kind of Vulkan object a report concerns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    DescriptorSetLayout,
    DescriptorSet,
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ObjectType::DescriptorSetLayout => "VkDescriptorSetLayout",
            ObjectType::DescriptorSet => "VkDescriptorSet",
        })
    }
}

/// Object a report concerns: its type and raw handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LogObject {
    pub object_type: ObjectType,
    pub handle: u64,
}

impl LogObject {
    pub fn layout(handle: DescriptorSetLayoutHandle) -> Self {
        Self { object_type: ObjectType::DescriptorSetLayout, handle: handle.0 }
    }

    pub fn set(handle: DescriptorSetHandle) -> Self {
        Self { object_type: ObjectType::DescriptorSet, handle: handle.0 }
    }
}

impl fmt::Display for LogObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:#x}", self.object_type, self.handle)
    }
}

/// Stable identifier of a validation message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageCode {
    /// Malformed layout declaration (duplicate binding, bad sampler list)
    InvalidLayout,
    /// Update addresses a binding or index the layout does not declare
    InvalidUpdateIndex,
    /// Update type or slot kind differs from the declared one
    DescriptorTypeMismatch,
    /// Update runs past the end of the set
    DescriptorUpdateOutOfBounds,
    /// Update spills into a binding with other stage flags or type
    DescriptorStageflagsMismatch,
    /// Update payload does not fit its descriptor type
    InvalidUpdateStruct,
    /// Unknown or reused layout/set handle
    InvalidSet,
    /// Set layout cannot stand in for the pipeline's set layout
    PipelineLayoutsIncompatible,
}

impl MessageCode {
    /// Name reported to debug callbacks
    pub fn name(self) -> &'static str {
        match self {
            MessageCode::InvalidLayout => "DRAWSTATE_INVALID_LAYOUT",
            MessageCode::InvalidUpdateIndex => "DRAWSTATE_INVALID_UPDATE_INDEX",
            MessageCode::DescriptorTypeMismatch => "DRAWSTATE_DESCRIPTOR_TYPE_MISMATCH",
            MessageCode::DescriptorUpdateOutOfBounds => "DRAWSTATE_DESCRIPTOR_UPDATE_OUT_OF_BOUNDS",
            MessageCode::DescriptorStageflagsMismatch => "DRAWSTATE_DESCRIPTOR_STAGEFLAGS_MISMATCH",
            MessageCode::InvalidUpdateStruct => "DRAWSTATE_INVALID_UPDATE_STRUCT",
            MessageCode::InvalidSet => "DRAWSTATE_INVALID_SET",
            MessageCode::PipelineLayoutsIncompatible => "DRAWSTATE_PIPELINE_LAYOUTS_INCOMPATIBLE",
        }
    }
}

impl fmt::Display for MessageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ===== ENTRY =====

/// One validation report
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub severity: LogSeverity,
    pub timestamp: SystemTime,
    /// Layer that raised the report (always `LAYER_PREFIX`)
    pub layer_prefix: &'static str,
    /// Reporting component (e.g. "galaxy3d::DescriptorTracker")
    pub source: String,
    /// Object the report concerns, if any
    pub object: Option<LogObject>,
    pub code: Option<MessageCode>,
    pub message: String,
    /// Reporting site, recorded for ERROR reports
    pub file: Option<&'static str>,
    pub line: Option<u32>,
}

impl LogEntry {
    /// Report stamped now, with no object, code or location
    pub fn new(severity: LogSeverity, source: &str, message: String) -> Self {
        Self {
            severity,
            timestamp: SystemTime::now(),
            layer_prefix: LAYER_PREFIX,
            source: source.to_string(),
            object: None,
            code: None,
            message,
            file: None,
            line: None,
        }
    }

    pub fn with_object(mut self, object: LogObject) -> Self {
        self.object = Some(object);
        self
    }

    pub fn with_code(mut self, code: MessageCode) -> Self {
        self.code = Some(code);
        self
    }

    pub fn at(mut self, file: &'static str, line: u32) -> Self {
        self.file = Some(file);
        self.line = Some(line);
        self
    }
}

/// Console logger
///
/// `[time] [SEVERITY] [DS] [source] CODE (object) message (file:line)`, with
/// the code, object and location parts present only when the report has them.
pub struct DefaultLogger;

impl Logger for DefaultLogger {
    fn log(&self, entry: &LogEntry) {
        let datetime: DateTime<Local> = entry.timestamp.into();
        let mut line = format!(
            "[{}] [{}] [{}] [{}]",
            datetime.format("%Y-%m-%d %H:%M:%S%.3f"),
            entry.severity.label(),
            entry.layer_prefix.magenta(),
            entry.source.bright_blue(),
        );

        if let Some(code) = entry.code {
            let _ = write!(line, " {}", code.name().bold());
        }
        if let Some(object) = entry.object {
            let _ = write!(line, " ({})", object);
        }
        let _ = write!(line, " {}", entry.message);
        if let (Some(file), Some(number)) = (entry.file, entry.line) {
            let _ = write!(line, " ({}:{})", file, number);
        }

        println!("{}", line);
    }
}

// ===== LOGGING MACROS =====
//
// Every severity macro takes an optional `[object, code]` group after the
// source: `descriptor_error!(SOURCE, [LogObject::set(h), code], "...", ..)`.

/// Shared expansion of the severity macros (internal)
#[doc(hidden)]
#[macro_export]
macro_rules! __descriptor_report {
    ($severity:ident, $source:expr, [$object:expr, $code:expr], $($arg:tt)*) => {
        $crate::galaxy3d::Diagnostics::emit(
            $crate::galaxy3d::log::LogEntry::new(
                $crate::galaxy3d::log::LogSeverity::$severity,
                $source,
                format!($($arg)*),
            )
            .with_object($object)
            .with_code($code)
        )
    };
    ($severity:ident, $source:expr, $($arg:tt)*) => {
        $crate::galaxy3d::Diagnostics::log(
            $crate::galaxy3d::log::LogSeverity::$severity,
            $source,
            format!($($arg)*)
        )
    };
}

#[macro_export]
macro_rules! descriptor_trace {
    ($source:expr, $($rest:tt)*) => { $crate::__descriptor_report!(Trace, $source, $($rest)*) };
}

#[macro_export]
macro_rules! descriptor_debug {
    ($source:expr, $($rest:tt)*) => { $crate::__descriptor_report!(Debug, $source, $($rest)*) };
}

#[macro_export]
macro_rules! descriptor_info {
    ($source:expr, $($rest:tt)*) => { $crate::__descriptor_report!(Info, $source, $($rest)*) };
}

#[macro_export]
macro_rules! descriptor_warn {
    ($source:expr, $($rest:tt)*) => { $crate::__descriptor_report!(Warn, $source, $($rest)*) };
}

/// Report an ERROR with the reporting file and line
///
/// ```ignore
/// descriptor_error!(SOURCE, [LogObject::layout(handle), MessageCode::InvalidLayout],
///     "{}", warning);
/// ```
#[macro_export]
macro_rules! descriptor_error {
    ($source:expr, [$object:expr, $code:expr], $($arg:tt)*) => {
        $crate::galaxy3d::Diagnostics::emit(
            $crate::galaxy3d::log::LogEntry::new(
                $crate::galaxy3d::log::LogSeverity::Error,
                $source,
                format!($($arg)*),
            )
            .with_object($object)
            .with_code($code)
            .at(file!(), line!())
        )
    };
    ($source:expr, $($arg:tt)*) => {
        $crate::galaxy3d::Diagnostics::log_detailed(
            $crate::galaxy3d::log::LogSeverity::Error,
            $source,
            format!($($arg)*),
            file!(),
            line!()
        )
    };
}

/// Report an ERROR and build the matching `Error` variant
///
/// With an `object =>` prefix the report names that object and carries the
/// variant's message code.
///
/// ```ignore
/// let err = descriptor_err!(SOURCE, LogObject::set(handle) => UnknownHandle,
///     "descriptor set {} was never allocated", handle);
/// ```
#[macro_export]
macro_rules! descriptor_err {
    ($source:expr, $object:expr => $variant:ident, $($arg:tt)*) => {{
        let error = $crate::galaxy3d::Error::$variant(format!($($arg)*));
        $crate::descriptor_error!($source, [$object, error.code()], "{}", error.message());
        error
    }};
    ($source:expr, $variant:ident, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::descriptor_error!($source, "{}", message);
        $crate::galaxy3d::Error::$variant(message)
    }};
}

/// Report an ERROR and return the matching `Error` variant from the current function
#[macro_export]
macro_rules! descriptor_bail {
    ($($arg:tt)*) => {
        return Err($crate::descriptor_err!($($arg)*))
    };
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
