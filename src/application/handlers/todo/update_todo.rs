//! UpdateTodoHandler - Command handler for editing a todo.

use std::sync::Arc;

use crate::domain::foundation::TodoId;
use crate::domain::todo::{TodoError, TodoRecord};
use crate::ports::{TodoRepository, TransactionRunner};

/// Command to replace a todo's title and description.
#[derive(Debug, Clone)]
pub struct UpdateTodoCommand {
    pub todo_id: TodoId,
    pub title: String,
    pub description: Option<String>,
}

/// Handler for updating todos.
pub struct UpdateTodoHandler<R: TransactionRunner> {
    repository: Arc<dyn TodoRepository>,
    runner: Arc<R>,
}

impl<R: TransactionRunner> UpdateTodoHandler<R> {
    pub fn new(repository: Arc<dyn TodoRepository>, runner: Arc<R>) -> Self {
        Self { repository, runner }
    }

    pub async fn handle(&self, cmd: UpdateTodoCommand) -> Result<TodoRecord, TodoError> {
        let repository = &self.repository;

        self.runner
            .run(move || async move {
                // 1. Load
                let mut todo = repository.find_by_id(&cmd.todo_id).await?;

                // 2. Edit (completion state is untouched)
                todo.update(cmd.title, cmd.description)?;

                // 3. Persist
                repository.save(&todo).await?;

                Ok(todo.to_record())
            })
            .await
    }
}
