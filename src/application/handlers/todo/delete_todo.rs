//! DeleteTodoHandler - Command handler for removing a todo.

use std::sync::Arc;

use crate::domain::foundation::TodoId;
use crate::domain::todo::TodoError;
use crate::ports::{TodoRepository, TransactionRunner};

/// Command to delete a todo.
#[derive(Debug, Clone)]
pub struct DeleteTodoCommand {
    pub todo_id: TodoId,
}

/// Handler for deleting todos.
///
/// The todo is looked up first, so deleting an unknown id fails with
/// `NotFound` and the repository's delete is never reached.
pub struct DeleteTodoHandler<R: TransactionRunner> {
    repository: Arc<dyn TodoRepository>,
    runner: Arc<R>,
}

impl<R: TransactionRunner> DeleteTodoHandler<R> {
    pub fn new(repository: Arc<dyn TodoRepository>, runner: Arc<R>) -> Self {
        Self { repository, runner }
    }

    pub async fn handle(&self, cmd: DeleteTodoCommand) -> Result<(), TodoError> {
        let repository = &self.repository;

        self.runner
            .run(move || async move {
                let todo = repository.find_by_id(&cmd.todo_id).await?;
                repository.delete(&todo).await?;

                tracing::debug!(todo_id = %cmd.todo_id, "Todo deleted");
                Ok(())
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::todo::test_support::{ImmediateRunner, MockTodoRepository};
    use crate::domain::todo::Todo;

    #[tokio::test]
    async fn deletes_existing_todo() {
        let todo = Todo::new("bye", None).unwrap();
        let repo = Arc::new(MockTodoRepository::with_todo(todo.clone()));
        let runner = Arc::new(ImmediateRunner::new());
        let handler = DeleteTodoHandler::new(repo.clone(), runner.clone());

        handler
            .handle(DeleteTodoCommand { todo_id: *todo.id() })
            .await
            .unwrap();

        assert_eq!(repo.deleted(), vec![*todo.id()]);
        assert!(repo.stored().is_empty());
        assert_eq!(runner.commits(), 1);
    }

    #[tokio::test]
    async fn missing_todo_is_not_found_and_delete_is_never_called() {
        let repo = Arc::new(MockTodoRepository::new());
        let runner = Arc::new(ImmediateRunner::new());
        let handler = DeleteTodoHandler::new(repo.clone(), runner.clone());
        let id = TodoId::new();

        let result = handler.handle(DeleteTodoCommand { todo_id: id }).await;

        assert_eq!(result, Err(TodoError::NotFound(id)));
        assert!(repo.deleted().is_empty());
        assert_eq!(runner.rollbacks(), 1);
    }
}
