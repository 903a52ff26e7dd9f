//! MarkTodoUncompletedHandler - Command handler for reopening a todo.

use std::sync::Arc;

use crate::domain::foundation::TodoId;
use crate::domain::todo::{TodoError, TodoRecord};
use crate::ports::{TodoRepository, TransactionRunner};

/// Command to reopen a completed todo.
#[derive(Debug, Clone)]
pub struct MarkTodoUncompletedCommand {
    pub todo_id: TodoId,
}

/// Handler for reopening todos.
pub struct MarkTodoUncompletedHandler<R: TransactionRunner> {
    repository: Arc<dyn TodoRepository>,
    runner: Arc<R>,
}

impl<R: TransactionRunner> MarkTodoUncompletedHandler<R> {
    pub fn new(repository: Arc<dyn TodoRepository>, runner: Arc<R>) -> Self {
        Self { repository, runner }
    }

    pub async fn handle(
        &self,
        cmd: MarkTodoUncompletedCommand,
    ) -> Result<TodoRecord, TodoError> {
        let repository = &self.repository;

        self.runner
            .run(move || async move {
                let mut todo = repository.find_by_id(&cmd.todo_id).await?;
                todo.mark_uncompleted()?;
                repository.save(&todo).await?;
                Ok(todo.to_record())
            })
            .await
    }
}
