//! Error types for the Galaxy3D descriptor tracker
//!
//! This module defines the errors returned by layout queries, descriptor set
//! updates and the handle-keyed tracker.

use std::fmt;
use crate::log::MessageCode;

/// Result type for descriptor tracker operations
pub type Result<T> = std::result::Result<T, Error>;

/// Descriptor tracker errors
///
/// Every update-validation variant carries the full human-readable message
/// the caller is expected to forward to its diagnostic sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The addressed binding number is not declared by the layout
    NoSuchBinding(String),

    /// The update's declared type differs from the binding's type
    TypeMismatch(String),

    /// The update addresses slots past the end of the set
    OutOfBounds(String),

    /// The update spills into a next binding with different properties
    InconsistentBindings(String),

    /// A targeted slot holds a different descriptor kind than the payload
    KindMismatch(String),

    /// The payload does not match the declared descriptor type
    InvalidPayload(String),

    /// A global index that no binding of the layout covers
    InvalidGlobalIndex(u32),

    /// Two layouts cannot be used interchangeably
    IncompatibleLayouts(String),

    /// A layout or set handle the tracker does not know
    UnknownHandle(String),

    /// A layout or set handle registered twice
    DuplicateHandle(String),

    /// A feature the tracker does not model
    Unsupported(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NoSuchBinding(msg) => write!(f, "No such binding: {}", msg),
            Error::TypeMismatch(msg) => write!(f, "Type mismatch: {}", msg),
            Error::OutOfBounds(msg) => write!(f, "Update exceeds layout bounds: {}", msg),
            Error::InconsistentBindings(msg) => write!(f, "Inconsistent consecutive bindings: {}", msg),
            Error::KindMismatch(msg) => write!(f, "Descriptor kind mismatch: {}", msg),
            Error::InvalidPayload(msg) => write!(f, "Invalid payload: {}", msg),
            Error::InvalidGlobalIndex(index) => write!(f, "Invalid global index: {}", index),
            Error::IncompatibleLayouts(msg) => write!(f, "Incompatible layouts: {}", msg),
            Error::UnknownHandle(msg) => write!(f, "Unknown handle: {}", msg),
            Error::DuplicateHandle(msg) => write!(f, "Duplicate handle: {}", msg),
            Error::Unsupported(msg) => write!(f, "Unsupported: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl Error {
    /// The message without the variant prefix
    pub fn message(&self) -> String {
        match self {
            Error::NoSuchBinding(msg)
            | Error::TypeMismatch(msg)
            | Error::OutOfBounds(msg)
            | Error::InconsistentBindings(msg)
            | Error::KindMismatch(msg)
            | Error::InvalidPayload(msg)
            | Error::IncompatibleLayouts(msg)
            | Error::UnknownHandle(msg)
            | Error::DuplicateHandle(msg)
            | Error::Unsupported(msg) => msg.clone(),
            Error::InvalidGlobalIndex(index) => {
                format!("global index {} is not covered by any binding", index)
            }
        }
    }

    /// Message code reported alongside this error
    pub fn code(&self) -> MessageCode {
        match self {
            Error::NoSuchBinding(_) | Error::InvalidGlobalIndex(_) => MessageCode::InvalidUpdateIndex,
            Error::TypeMismatch(_) | Error::KindMismatch(_) => MessageCode::DescriptorTypeMismatch,
            Error::OutOfBounds(_) => MessageCode::DescriptorUpdateOutOfBounds,
            Error::InconsistentBindings(_) => MessageCode::DescriptorStageflagsMismatch,
            Error::InvalidPayload(_) | Error::Unsupported(_) => MessageCode::InvalidUpdateStruct,
            Error::UnknownHandle(_) | Error::DuplicateHandle(_) => MessageCode::InvalidSet,
            Error::IncompatibleLayouts(_) => MessageCode::PipelineLayoutsIncompatible,
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
