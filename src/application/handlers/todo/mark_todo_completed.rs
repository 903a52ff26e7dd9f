//! MarkTodoCompletedHandler - Command handler for completing a todo.

use std::sync::Arc;

use crate::domain::foundation::TodoId;
use crate::domain::todo::{TodoError, TodoRecord};
use crate::ports::{TodoRepository, TransactionRunner};

/// Command to mark a todo as completed.
#[derive(Debug, Clone)]
pub struct MarkTodoCompletedCommand {
    pub todo_id: TodoId,
}

/// Handler for completing todos.
pub struct MarkTodoCompletedHandler<R: TransactionRunner> {
    repository: Arc<dyn TodoRepository>,
    runner: Arc<R>,
}

impl<R: TransactionRunner> MarkTodoCompletedHandler<R> {
    pub fn new(repository: Arc<dyn TodoRepository>, runner: Arc<R>) -> Self {
        Self { repository, runner }
    }

    pub async fn handle(&self, cmd: MarkTodoCompletedCommand) -> Result<TodoRecord, TodoError> {
        let repository = &self.repository;

        self.runner
            .run(move || async move {
                let mut todo = repository.find_by_id(&cmd.todo_id).await?;
                todo.mark_completed()?;
                repository.save(&todo).await?;
                Ok(todo.to_record())
            })
            .await
    }
}
