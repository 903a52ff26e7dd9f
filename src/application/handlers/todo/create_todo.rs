//! CreateTodoHandler - Command handler for creating todos.
//!
//! A single write, so it relies on the request scope alone and does not go
//! through the transaction runner.

use std::sync::Arc;

use crate::domain::todo::{Todo, TodoError, TodoRecord};
use crate::ports::TodoRepository;

/// Command to create a new todo.
#[derive(Debug, Clone)]
pub struct CreateTodoCommand {
    pub title: String,
    pub description: Option<String>,
}

/// Handler for creating todos.
pub struct CreateTodoHandler {
    repository: Arc<dyn TodoRepository>,
}

impl CreateTodoHandler {
    pub fn new(repository: Arc<dyn TodoRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: CreateTodoCommand) -> Result<TodoRecord, TodoError> {
        // 1. Create domain entity (validates title)
        let todo = Todo::new(cmd.title, cmd.description)?;

        // 2. Persist
        self.repository.save(&todo).await?;

        tracing::debug!(todo_id = %todo.id(), "Todo created");
        Ok(todo.to_record())
    }
}
