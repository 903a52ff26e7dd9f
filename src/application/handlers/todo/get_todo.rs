//! GetTodoHandler - Query handler for a single todo.

use std::sync::Arc;

use crate::domain::foundation::TodoId;
use crate::domain::todo::{TodoError, TodoRecord};
use crate::ports::TodoRepository;

/// Query for one todo by id.
#[derive(Debug, Clone)]
pub struct GetTodoQuery {
    pub todo_id: TodoId,
}

/// Handler for fetching a todo.
pub struct GetTodoHandler {
    repository: Arc<dyn TodoRepository>,
}

impl GetTodoHandler {
    pub fn new(repository: Arc<dyn TodoRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: GetTodoQuery) -> Result<TodoRecord, TodoError> {
        let todo = self.repository.find_by_id(&query.todo_id).await?;
        Ok(todo.to_record())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::todo::test_support::MockTodoRepository;
    use crate::domain::todo::Todo;

    #[tokio::test]
    async fn returns_stored_todo() {
        let todo = Todo::new("read", None).unwrap();
        let repo = Arc::new(MockTodoRepository::with_todo(todo.clone()));
        let handler = GetTodoHandler::new(repo);

        let record = handler
            .handle(GetTodoQuery { todo_id: *todo.id() })
            .await
            .unwrap();

        assert_eq!(record, todo.to_record());
    }

    #[tokio::test]
    async fn missing_todo_is_not_found() {
        let repo = Arc::new(MockTodoRepository::new());
        let handler = GetTodoHandler::new(repo);
        let id = TodoId::new();

        let result = handler.handle(GetTodoQuery { todo_id: id }).await;

        assert_eq!(result, Err(TodoError::NotFound(id)));
    }
}
