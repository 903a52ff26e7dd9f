//! In-memory implementation of TodoRepository.
//!
//! Reaches the store through the session bound to the current task, just
//! like the PostgreSQL adapter.

use std::sync::Arc;

use async_trait::async_trait;

use crate::adapters::session::ContextProvider;
use crate::domain::foundation::{DomainError, ErrorCode, TodoId};
use crate::domain::todo::{Todo, TodoRecord};
use crate::ports::{todo_not_found, TodoRepository};

use super::InMemoryDatabase;

/// Session-bound in-memory todo repository.
#[derive(Clone)]
pub struct InMemoryTodoRepository {
    provider: Arc<ContextProvider<InMemoryDatabase>>,
}

impl InMemoryTodoRepository {
    pub fn new(provider: Arc<ContextProvider<InMemoryDatabase>>) -> Self {
        Self { provider }
    }
}

fn record_to_todo(record: TodoRecord) -> Result<Todo, DomainError> {
    Todo::from_record(record).map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Stored todo is invalid: {}", e),
        )
    })
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn find_all(&self) -> Result<Vec<Todo>, DomainError> {
        let session = self.provider.current()?;
        let records = session.connection().await.all().await;
        records.into_iter().map(record_to_todo).collect()
    }

    async fn find_by_id(&self, id: &TodoId) -> Result<Todo, DomainError> {
        let session = self.provider.current()?;
        let record = session.connection().await.get(&id.to_string()).await;
        match record {
            Some(record) => record_to_todo(record),
            None => Err(todo_not_found(id)),
        }
    }

    async fn save(&self, todo: &Todo) -> Result<(), DomainError> {
        let session = self.provider.current()?;
        let mut conn = session.connection().await;
        conn.put(todo.to_record()).await;
        Ok(())
    }

    async fn delete(&self, todo: &Todo) -> Result<(), DomainError> {
        let session = self.provider.current()?;
        let mut conn = session.connection().await;
        conn.remove(&todo.id().to_string()).await;
        Ok(())
    }
}
