//! Unit-of-work ports - what the session layer needs from a backing store.
//!
//! The context provider only ever talks to a store through these two traits:
//!
//! - `ConnectionSource` hands out one connection per unit of work
//! - `TransactionalConnection` drives transactions and savepoints on it
//!
//! A PostgreSQL pool and the in-memory test store both implement them, so
//! the session and transaction logic is shared between production and tests.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::todo::TodoError;

/// Opaque failure reported by a backing store.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct StoreError(Box<dyn std::error::Error + Send + Sync>);

impl StoreError {
    /// Wraps a store-specific error.
    pub fn new<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self(Box::new(error))
    }

    /// Creates an error from a plain message.
    pub fn message(message: impl Into<String>) -> Self {
        let message: String = message.into();
        Self(message.into())
    }
}

/// Errors raised while opening, binding, or finishing a unit of work.
#[derive(Debug, Error)]
pub enum UnitOfWorkError {
    #[error("no active session bound to the current task")]
    NoActiveSession,

    #[error("failed to acquire connection: {0}")]
    Acquire(#[source] StoreError),

    #[error("failed to begin transaction: {0}")]
    Begin(#[source] StoreError),

    #[error("failed to commit transaction: {0}")]
    Commit(#[source] StoreError),

    #[error("failed to roll back transaction: {0}")]
    Rollback(#[source] StoreError),
}

impl From<UnitOfWorkError> for DomainError {
    fn from(err: UnitOfWorkError) -> Self {
        match err {
            UnitOfWorkError::NoActiveSession => {
                DomainError::new(ErrorCode::NoActiveSession, err.to_string())
            }
            other => DomainError::new(ErrorCode::DatabaseError, other.to_string()),
        }
    }
}

impl From<UnitOfWorkError> for TodoError {
    fn from(err: UnitOfWorkError) -> Self {
        match err {
            UnitOfWorkError::NoActiveSession => TodoError::NoActiveSession,
            other => TodoError::Infrastructure(other.to_string()),
        }
    }
}

/// A single store connection able to run transactions and savepoints.
///
/// Implementations do not track nesting themselves; the session keeps the
/// depth and picks savepoint names.
#[async_trait]
pub trait TransactionalConnection: Send + 'static {
    /// Open a top-level transaction.
    async fn begin(&mut self) -> Result<(), StoreError>;

    /// Commit the top-level transaction, including any unreleased savepoints.
    async fn commit(&mut self) -> Result<(), StoreError>;

    /// Abort the top-level transaction, discarding every savepoint.
    async fn rollback(&mut self) -> Result<(), StoreError>;

    /// Create a named savepoint inside the open transaction.
    async fn savepoint(&mut self, name: &str) -> Result<(), StoreError>;

    /// Fold the savepoint's changes into the enclosing level.
    async fn release_savepoint(&mut self, name: &str) -> Result<(), StoreError>;

    /// Discard every change made since the savepoint was created.
    ///
    /// The savepoint itself stays open.
    async fn rollback_to_savepoint(&mut self, name: &str) -> Result<(), StoreError>;
}

/// Source of connections, typically a pool.
#[async_trait]
pub trait ConnectionSource: Send + Sync + 'static {
    type Connection: TransactionalConnection;

    /// Acquire a connection for the exclusive use of one unit of work.
    async fn acquire(&self) -> Result<Self::Connection, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_active_session_maps_to_its_own_code() {
        let err = DomainError::from(UnitOfWorkError::NoActiveSession);
        assert_eq!(err.code, ErrorCode::NoActiveSession);
    }

    #[test]
    fn store_failures_map_to_database_error() {
        let err = DomainError::from(UnitOfWorkError::Commit(StoreError::message("lost")));
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(err.message.contains("lost"));
    }

    #[test]
    fn todo_error_conversion_keeps_no_active_session() {
        assert_eq!(
            TodoError::from(UnitOfWorkError::NoActiveSession),
            TodoError::NoActiveSession
        );
    }

    #[test]
    fn acquire_error_displays_cause() {
        let err = UnitOfWorkError::Acquire(StoreError::message("pool closed"));
        assert_eq!(err.to_string(), "failed to acquire connection: pool closed");
    }
}
