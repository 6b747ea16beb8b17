//! Error types for the leave engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure the core can surface to its callers. Operations whose
//! precondition is simply unmet (removing an assignment that does not exist,
//! deleting a contact type nobody has) are silent no-ops and never produce
//! one of these errors.

use thiserror::Error;

/// Broad classification of an [`EngineError`].
///
/// Callers map these onto their own responses, e.g. a validation problem
/// becomes a "bad request" while a not-found becomes "no such record".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller supplied malformed or inconsistent input.
    Validation,
    /// The referenced record does not exist.
    NotFound,
    /// The engine configuration could not be read.
    Configuration,
}

/// The main error type for the leave engine.
///
/// # Example
///
/// ```
/// use leave_engine::error::{EngineError, ErrorKind};
///
/// let error = EngineError::RequestNotFound {
///     id: "abc".to_string(),
/// };
/// assert_eq!(error.to_string(), "Leave request not found: abc");
/// assert_eq!(error.kind(), ErrorKind::NotFound);
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// A date string could not be parsed.
    #[error("Invalid date '{value}': {message}")]
    InvalidDate {
        /// The raw value that failed to parse.
        value: String,
        /// A description of the parse error.
        message: String,
    },

    /// A leave day identifier of zero was supplied.
    #[error("Invalid leave day identifier: {id}")]
    InvalidDayId {
        /// The rejected identifier.
        id: u32,
    },

    /// A mutation named a field the engine does not know.
    #[error("Unknown field: {field}")]
    InvalidField {
        /// The unrecognised field name.
        field: String,
    },

    /// A field value was present but unusable.
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue {
        /// The field whose value was rejected.
        field: String,
        /// A description of the problem.
        message: String,
    },

    /// A leave request cannot take the requested action from its current status.
    #[error("Cannot {action} a leave request in status {from}")]
    InvalidTransition {
        /// The status the request is currently in.
        from: String,
        /// The action that was attempted.
        action: String,
    },

    /// No leave request has the given id.
    #[error("Leave request not found: {id}")]
    RequestNotFound {
        /// The id that was looked up.
        id: String,
    },

    /// No ledger entry has the given id.
    #[error("Leave day not found: {id}")]
    LeaveNotFound {
        /// The id that was looked up.
        id: u32,
    },

    /// An employee document could not be decoded.
    #[error("Invalid employee document: {message}")]
    Document {
        /// A description of the decode error.
        message: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },
}

impl EngineError {
    /// Returns the broad category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::RequestNotFound { .. } | EngineError::LeaveNotFound { .. } => {
                ErrorKind::NotFound
            }
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => {
                ErrorKind::Configuration
            }
            _ => ErrorKind::Validation,
        }
    }

    /// Builds an [`EngineError::InvalidDate`] from a chrono parse failure.
    pub(crate) fn invalid_date(value: &str, err: chrono::ParseError) -> Self {
        EngineError::InvalidDate {
            value: value.to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
