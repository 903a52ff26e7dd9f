//! PostgreSQL implementation of TodoRepository.
//!
//! Persists Todo aggregates to the `todos` table through the session bound
//! to the current task.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::Row;

use crate::adapters::session::ContextProvider;
use crate::domain::foundation::{DomainError, ErrorCode, TodoId};
use crate::domain::todo::{Todo, TodoRecord};
use crate::ports::{todo_not_found, TodoRepository};

use super::PgConnectionSource;

/// PostgreSQL implementation of TodoRepository.
#[derive(Clone)]
pub struct PostgresTodoRepository {
    provider: Arc<ContextProvider<PgConnectionSource>>,
}

impl PostgresTodoRepository {
    /// Creates a new PostgresTodoRepository.
    pub fn new(provider: Arc<ContextProvider<PgConnectionSource>>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl TodoRepository for PostgresTodoRepository {
    async fn find_all(&self) -> Result<Vec<Todo>, DomainError> {
        let session = self.provider.current()?;
        let mut guard = session.connection().await;
        let conn = guard
            .executor()
            .map_err(|e| DomainError::database("Connection unavailable", e))?;

        let rows = sqlx::query(
            r#"
            SELECT id, title, description, completed
            FROM todos
            ORDER BY id
            "#,
        )
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| DomainError::database("Failed to fetch todos", e))?;

        rows.into_iter().map(row_to_todo).collect()
    }

    async fn find_by_id(&self, id: &TodoId) -> Result<Todo, DomainError> {
        let session = self.provider.current()?;
        let mut guard = session.connection().await;
        let conn = guard
            .executor()
            .map_err(|e| DomainError::database("Connection unavailable", e))?;

        let row = sqlx::query(
            r#"
            SELECT id, title, description, completed
            FROM todos
            WHERE id = $1
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| DomainError::database("Failed to fetch todo", e))?;

        match row {
            Some(row) => row_to_todo(row),
            None => Err(todo_not_found(id)),
        }
    }

    async fn save(&self, todo: &Todo) -> Result<(), DomainError> {
        let session = self.provider.current()?;
        let mut guard = session.connection().await;
        let conn = guard
            .executor()
            .map_err(|e| DomainError::database("Connection unavailable", e))?;

        sqlx::query(
            r#"
            INSERT INTO todos (id, title, description, completed)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE SET
                title = EXCLUDED.title,
                description = EXCLUDED.description,
                completed = EXCLUDED.completed
            "#,
        )
        .bind(todo.id().to_string())
        .bind(todo.title())
        .bind(todo.description())
        .bind(todo.completed())
        .execute(&mut *conn)
        .await
        .map_err(|e| DomainError::database("Failed to save todo", e))?;

        Ok(())
    }

    async fn delete(&self, todo: &Todo) -> Result<(), DomainError> {
        let session = self.provider.current()?;
        let mut guard = session.connection().await;
        let conn = guard
            .executor()
            .map_err(|e| DomainError::database("Connection unavailable", e))?;

        sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(todo.id().to_string())
            .execute(&mut *conn)
            .await
            .map_err(|e| DomainError::database("Failed to delete todo", e))?;

        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Row mapping
// ════════════════════════════════════════════════════════════════════════════

fn row_to_todo(row: PgRow) -> Result<Todo, DomainError> {
    let record = TodoRecord {
        id: row
            .try_get("id")
            .map_err(|e| DomainError::database("Failed to get id", e))?,
        title: row
            .try_get("title")
            .map_err(|e| DomainError::database("Failed to get title", e))?,
        description: row
            .try_get("description")
            .map_err(|e| DomainError::database("Failed to get description", e))?,
        completed: row
            .try_get("completed")
            .map_err(|e| DomainError::database("Failed to get completed", e))?,
    };

    Todo::from_record(record).map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Stored todo is invalid: {}", e),
        )
    })
}
