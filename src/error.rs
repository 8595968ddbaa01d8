//! Error types for the payroll compliance engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while calculating, approving
//! and documenting payroll.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The closed set of error kinds surfaced to callers.
///
/// Transport adapters map these to status codes; the engine itself never
/// retries on any of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// A referenced employee, period, entry, config or tenant does not exist.
    NotFound,
    /// The write would violate a uniqueness rule.
    Conflict,
    /// The request is invalid for the current state of the data.
    BadRequest,
    /// Configuration or storage failure not caused by the caller.
    Internal,
}

/// The main error type for the payroll engine.
///
/// # Example
///
/// ```
/// use nomina_engine::error::{EngineError, ErrorKind};
///
/// let error = EngineError::not_found("Payroll period", "42");
/// assert_eq!(error.to_string(), "Payroll period not found: 42");
/// assert_eq!(error.kind(), ErrorKind::NotFound);
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
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

    /// A referenced record does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of record (e.g. "Employee", "Payroll entry").
        entity: String,
        /// The identifier that was looked up.
        id: String,
    },

    /// The write conflicts with an existing record.
    #[error("Conflict: {message}")]
    Conflict {
        /// A description of the conflict.
        message: String,
    },

    /// The request is not valid for the current state.
    #[error("Bad request: {message}")]
    BadRequest {
        /// A description of what was rejected.
        message: String,
    },

    /// The backing store failed.
    #[error("Storage error: {message}")]
    Storage {
        /// A description of the storage failure.
        message: String,
    },
}

impl EngineError {
    /// Builds a [`EngineError::NotFound`] for the given entity and id.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Builds a [`EngineError::BadRequest`] with the given message.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Builds a [`EngineError::Conflict`] with the given message.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Returns the closed kind this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::NotFound { .. } => ErrorKind::NotFound,
            EngineError::Conflict { .. } => ErrorKind::Conflict,
            EngineError::BadRequest { .. } => ErrorKind::BadRequest,
            EngineError::ConfigNotFound { .. }
            | EngineError::ConfigParseError { .. }
            | EngineError::Storage { .. } => ErrorKind::Internal,
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/statutory.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/statutory.yaml"
        );
        assert_eq!(error.kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_not_found_displays_entity_and_id() {
        let error = EngineError::not_found("Employee", "emp-7");
        assert_eq!(error.to_string(), "Employee not found: emp-7");
        assert_eq!(error.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_bad_request_displays_message() {
        let error = EngineError::bad_request("period is not CALCULATED");
        assert_eq!(error.to_string(), "Bad request: period is not CALCULATED");
        assert_eq!(error.kind(), ErrorKind::BadRequest);
    }

    #[test]
    fn test_conflict_kind() {
        let error = EngineError::conflict("document number 123 already registered");
        assert_eq!(error.kind(), ErrorKind::Conflict);
        assert!(error.to_string().contains("123"));
    }

    #[test]
    fn test_error_kind_serialization() {
        assert_eq!(
            serde_json::to_string(&ErrorKind::BadRequest).unwrap(),
            "\"BAD_REQUEST\""
        );
        assert_eq!(
            serde_json::to_string(&ErrorKind::NotFound).unwrap(),
            "\"NOT_FOUND\""
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_not_found() -> EngineResult<()> {
            Err(EngineError::not_found("Payroll entry", "x"))
        }

        fn propagates_error() -> EngineResult<()> {
            returns_not_found()?;
            Ok(())
        }

        assert!(matches!(
            propagates_error(),
            Err(EngineError::NotFound { .. })
        ));
    }
}
