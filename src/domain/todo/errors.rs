//! Todo-specific error types.

use crate::domain::foundation::{DomainError, ErrorCode, TodoId, ValidationError};

/// Todo-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoError {
    /// Todo was not found.
    NotFound(TodoId),
    /// Todo is already completed.
    AlreadyCompleted(TodoId),
    /// Todo is not completed.
    NotCompleted(TodoId),
    /// Validation failed.
    ValidationFailed { field: String, message: String },
    /// Code ran outside of any bound session scope.
    NoActiveSession,
    /// Infrastructure error.
    Infrastructure(String),
}

impl TodoError {
    pub fn not_found(id: TodoId) -> Self {
        TodoError::NotFound(id)
    }
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        TodoError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }
    pub fn infrastructure(message: impl Into<String>) -> Self {
        TodoError::Infrastructure(message.into())
    }
    pub fn code(&self) -> ErrorCode {
        match self {
            TodoError::NotFound(_) => ErrorCode::TodoNotFound,
            TodoError::AlreadyCompleted(_) => ErrorCode::TodoAlreadyCompleted,
            TodoError::NotCompleted(_) => ErrorCode::TodoNotCompleted,
            TodoError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            TodoError::NoActiveSession => ErrorCode::NoActiveSession,
            TodoError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }
    pub fn message(&self) -> String {
        match self {
            TodoError::NotFound(id) => format!("Todo not found: {}", id),
            TodoError::AlreadyCompleted(_) => "Todo is already completed".to_string(),
            TodoError::NotCompleted(_) => "Todo is not completed".to_string(),
            TodoError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            TodoError::NoActiveSession => "No active session bound to the current task".to_string(),
            TodoError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for TodoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for TodoError {}

impl From<ValidationError> for TodoError {
    fn from(err: ValidationError) -> Self {
        TodoError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<DomainError> for TodoError {
    fn from(err: DomainError) -> Self {
        let todo_id = err.detail("todo_id").and_then(|id| id.parse::<TodoId>().ok());
        match (err.code, todo_id) {
            (ErrorCode::TodoNotFound, Some(id)) => TodoError::NotFound(id),
            (ErrorCode::TodoAlreadyCompleted, Some(id)) => TodoError::AlreadyCompleted(id),
            (ErrorCode::TodoNotCompleted, Some(id)) => TodoError::NotCompleted(id),
            (ErrorCode::ValidationFailed, _) => TodoError::ValidationFailed {
                field: err.detail("field").unwrap_or("unknown").to_string(),
                message: err.message,
            },
            (ErrorCode::NoActiveSession, _) => TodoError::NoActiveSession,
            _ => TodoError::Infrastructure(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_domain_error_keeps_id() {
        let id = TodoId::new();
        let err = DomainError::new(ErrorCode::TodoNotFound, "missing")
            .with_detail("todo_id", id.to_string());
        assert_eq!(TodoError::from(err), TodoError::NotFound(id));
    }

    #[test]
    fn not_found_without_id_becomes_infrastructure() {
        let err = DomainError::new(ErrorCode::TodoNotFound, "missing");
        assert!(matches!(TodoError::from(err), TodoError::Infrastructure(_)));
    }

    #[test]
    fn no_active_session_is_preserved() {
        let err = DomainError::new(ErrorCode::NoActiveSession, "unbound");
        assert_eq!(TodoError::from(err), TodoError::NoActiveSession);
    }

    #[test]
    fn database_errors_become_infrastructure() {
        let err = DomainError::database("Failed to save todo", "disk full");
        let todo_err = TodoError::from(err);
        assert_eq!(todo_err.code(), ErrorCode::DatabaseError);
        assert!(todo_err.message().contains("disk full"));
    }

    #[test]
    fn validation_error_carries_field() {
        let err = TodoError::from(ValidationError::empty_field("title"));
        assert!(matches!(
            err,
            TodoError::ValidationFailed { ref field, .. } if field == "title"
        ));
    }

    #[test]
    fn codes_match_variants() {
        let id = TodoId::new();
        assert_eq!(TodoError::AlreadyCompleted(id).code(), ErrorCode::TodoAlreadyCompleted);
        assert_eq!(TodoError::NotCompleted(id).code(), ErrorCode::TodoNotCompleted);
    }
}
