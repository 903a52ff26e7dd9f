//! Todo repository port.
//!
//! Defines the contract for persisting and retrieving Todo aggregates.
//!
//! # Design
//!
//! - **Session-bound**: implementations reach the store through the
//!   unit of work bound to the current task, never through a connection of
//!   their own. Calling them outside a scope yields `NoActiveSession`.
//! - **Upsert**: `save` inserts or replaces by identity.

use crate::domain::foundation::{DomainError, ErrorCode, TodoId};
use crate::domain::todo::Todo;
use async_trait::async_trait;

/// Repository port for Todo aggregate persistence.
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Find every todo, oldest first.
    async fn find_all(&self) -> Result<Vec<Todo>, DomainError>;

    /// Find a todo by its ID.
    ///
    /// # Errors
    ///
    /// - `TodoNotFound` if no todo has this ID (the ID is in the `todo_id` detail)
    /// - `DatabaseError` on persistence failure
    async fn find_by_id(&self, id: &TodoId) -> Result<Todo, DomainError>;

    /// Insert the todo, or replace the stored one with the same ID.
    async fn save(&self, todo: &Todo) -> Result<(), DomainError>;

    /// Remove the todo. Removing an absent todo is not an error.
    async fn delete(&self, todo: &Todo) -> Result<(), DomainError>;
}

/// Builds the not-found error every implementation reports.
pub fn todo_not_found(id: &TodoId) -> DomainError {
    DomainError::new(ErrorCode::TodoNotFound, format!("Todo not found: {}", id))
        .with_detail("todo_id", id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn todo_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn TodoRepository) {}
    }

    #[test]
    fn not_found_error_carries_id() {
        let id = TodoId::new();
        let err = todo_not_found(&id);
        assert_eq!(err.code, ErrorCode::TodoNotFound);
        assert_eq!(err.detail("todo_id"), Some(id.to_string().as_str()));
    }
}
