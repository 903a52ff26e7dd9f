//! Domain error vocabulary.
//!
//! [`ValidationError`] is raised while building values; [`DomainError`] is
//! the coded, detail-carrying error that crosses port boundaries.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

/// Rejected input for a single field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must not be blank")]
    EmptyField { field: String },

    #[error("{field} exceeds {max} characters ({actual})")]
    TooLong {
        field: String,
        max: usize,
        actual: usize,
    },

    #[error("{field} is malformed: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    pub fn empty_field(field: impl Into<String>) -> Self {
        Self::EmptyField { field: field.into() }
    }

    pub fn too_long(field: impl Into<String>, max: usize, actual: usize) -> Self {
        Self::TooLong {
            field: field.into(),
            max,
            actual,
        }
    }

    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            Self::EmptyField { field }
            | Self::TooLong { field, .. }
            | Self::InvalidFormat { field, .. } => field,
        }
    }
}

/// Stable machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ValidationFailed,
    TodoNotFound,
    TodoAlreadyCompleted,
    TodoNotCompleted,
    NoActiveSession,
    DatabaseError,
    InternalError,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ValidationFailed => "VALIDATION_FAILED",
            Self::TodoNotFound => "TODO_NOT_FOUND",
            Self::TodoAlreadyCompleted => "TODO_ALREADY_COMPLETED",
            Self::TodoNotCompleted => "TODO_NOT_COMPLETED",
            Self::NoActiveSession => "NO_ACTIVE_SESSION",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Codes caused by the caller rather than by the store or runtime.
    pub fn is_client_error(self) -> bool {
        matches!(
            self,
            Self::ValidationFailed
                | Self::TodoNotFound
                | Self::TodoAlreadyCompleted
                | Self::TodoNotCompleted
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coded error with free-form string details.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[{code}] {message}")]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    pub details: BTreeMap<String, String>,
}

impl DomainError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: BTreeMap::new(),
        }
    }

    /// Store failure, prefixed with what was being attempted.
    pub fn database(context: &str, cause: impl fmt::Display) -> Self {
        Self::new(ErrorCode::DatabaseError, format!("{}: {}", context, cause))
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    pub fn detail(&self, key: &str) -> Option<&str> {
        self.details.get(key).map(String::as_str)
    }
}
