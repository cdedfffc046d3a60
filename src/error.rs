//! Error types for the pay-run engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur during pay-run generation.

use thiserror::Error;

/// The main error type for the pay-run engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use payrun_engine::error::EngineError;
///
/// let error = EngineError::Validation {
///     field: "timezone".to_string(),
///     message: "unknown IANA timezone 'Mars/Olympus'".to_string(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "Invalid field 'timezone': unknown IANA timezone 'Mars/Olympus'"
/// );
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// A request field was missing, malformed, or out of range.
    #[error("Invalid field '{field}': {message}")]
    Validation {
        /// The offending field.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// The requested mutation collides with existing state, such as a
    /// duplicate pay run for a period or a duplicate rate effective date.
    #[error("Conflict: {message}")]
    Conflict {
        /// A description of the conflicting state.
        message: String,
    },

    /// A mutation was attempted against a finalised pay run.
    #[error("Pay run is finalised: {message}")]
    Immutability {
        /// A description of the rejected mutation.
        message: String,
    },

    /// An employee could not be priced during run generation. The employee
    /// is skipped and the run continues for the rest.
    #[error("Cannot compute pay for employee '{employee_id}': {message}")]
    Computation {
        /// The employee that could not be priced.
        employee_id: String,
        /// A description of the computation failure.
        message: String,
    },

    /// The actor is not permitted to perform the requested mutation.
    #[error("Actor '{actor}' is not permitted to {action}")]
    Forbidden {
        /// The actor that was denied.
        actor: String,
        /// The mutation that was denied.
        action: String,
    },

    /// A referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity (e.g., "pay run", "pay run line").
        entity: String,
        /// The identifier that was not found.
        id: String,
    },

    /// Tenant settings file was not found at the specified path.
    #[error("Tenant settings file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Tenant settings file could not be parsed.
    #[error("Failed to parse tenant settings '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },
}

impl EngineError {
    /// Convenience constructor for [`EngineError::Validation`].
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Convenience constructor for [`EngineError::Conflict`].
    pub fn conflict(message: impl Into<String>) -> Self {
        EngineError::Conflict {
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
