//! # Error Types
//!
//! Structured error types for kamiyat_core. Every failure the engine can report
//! returns control to the user with an actionable message; none is fatal.
//!
//! The variants follow four user-facing kinds:
//!
//! - **Input**: validator failure, surfaced as a list of field-level messages
//! - **Lookup**: reference data or project metadata could not be fetched
//! - **Conflict**: a report already exists for the project and calculation type
//! - **Persistence**: the report store failed on list, create, delete or update
//!
//! ## Example
//!
//! ```rust
//! use kamiyat_core::errors::{EngineError, ErrorKind};
//!
//! let err = EngineError::input(vec!["length: must be greater than 0".to_string()]);
//! assert_eq!(err.kind(), ErrorKind::Input);
//! assert_eq!(err.error_code(), "INPUT_ERROR");
//! assert!(err.is_recoverable());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::calculations::CalculationType;

/// Result type alias for kamiyat_core operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Structured error type for engine operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum EngineError {
    /// Raw input failed validation
    #[error("Invalid input: {}", .errors.join("; "))]
    Input { errors: Vec<String> },

    /// Reference data or project metadata was unavailable or empty
    #[error("Lookup failed: {what} - {reason}")]
    Lookup { what: String, reason: String },

    /// A report for the same project and calculation type already exists
    #[error("Report {existing_report_id} already exists for '{calculation_type}' in project {project_id}")]
    Conflict {
        project_id: String,
        calculation_type: CalculationType,
        existing_report_id: Uuid,
    },

    /// The report store failed
    #[error("Persistence error: {operation} - {reason}")]
    Persistence { operation: String, reason: String },

    /// Store file is locked by another user/process
    #[error("File locked: '{path}' is locked by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    Serialization { reason: String },

    /// Store schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    /// A report session was driven out of order (UI sequencing bug)
    #[error("Cannot {action} while {state}")]
    InvalidTransition { state: String, action: String },
}

/// Coarse classification used by callers to pick a recovery affordance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    Input,
    Lookup,
    Conflict,
    Persistence,
    Programming,
}

impl EngineError {
    /// Create an Input error from a list of violations
    pub fn input(errors: Vec<String>) -> Self {
        EngineError::Input { errors }
    }

    /// Create a Lookup error
    pub fn lookup(what: impl Into<String>, reason: impl Into<String>) -> Self {
        EngineError::Lookup {
            what: what.into(),
            reason: reason.into(),
        }
    }

    /// Create a Conflict error
    pub fn conflict(
        project_id: impl Into<String>,
        calculation_type: CalculationType,
        existing_report_id: Uuid,
    ) -> Self {
        EngineError::Conflict {
            project_id: project_id.into(),
            calculation_type,
            existing_report_id,
        }
    }

    /// Create a Persistence error
    pub fn persistence(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        EngineError::Persistence {
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(
        path: impl Into<String>,
        locked_by: impl Into<String>,
        locked_at: impl Into<String>,
    ) -> Self {
        EngineError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// Create an InvalidTransition error
    pub fn invalid_transition(state: impl Into<String>, action: impl Into<String>) -> Self {
        EngineError::InvalidTransition {
            state: state.into(),
            action: action.into(),
        }
    }

    /// Which of the user-facing kinds this error belongs to
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::Input { .. } => ErrorKind::Input,
            EngineError::Lookup { .. } => ErrorKind::Lookup,
            EngineError::Conflict { .. } => ErrorKind::Conflict,
            EngineError::Persistence { .. }
            | EngineError::FileLocked { .. }
            | EngineError::Serialization { .. }
            | EngineError::VersionMismatch { .. } => ErrorKind::Persistence,
            EngineError::InvalidTransition { .. } => ErrorKind::Programming,
        }
    }

    /// Check if the user can act on this error (fix input, retry, decide)
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            EngineError::InvalidTransition { .. } | EngineError::VersionMismatch { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            EngineError::Input { .. } => "INPUT_ERROR",
            EngineError::Lookup { .. } => "LOOKUP_ERROR",
            EngineError::Conflict { .. } => "CONFLICT",
            EngineError::Persistence { .. } => "PERSISTENCE_ERROR",
            EngineError::FileLocked { .. } => "FILE_LOCKED",
            EngineError::Serialization { .. } => "SERIALIZATION_ERROR",
            EngineError::VersionMismatch { .. } => "VERSION_MISMATCH",
            EngineError::InvalidTransition { .. } => "INVALID_TRANSITION",
        }
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(e: serde_json::Error) -> Self {
        EngineError::Serialization {
            reason: e.to_string(),
        }
    }
}
