//! ListTodosHandler - Query handler for every todo.

use std::sync::Arc;

use crate::domain::todo::{TodoError, TodoRecord};
use crate::ports::TodoRepository;

/// Handler for listing todos.
pub struct ListTodosHandler {
    repository: Arc<dyn TodoRepository>,
}

impl ListTodosHandler {
    pub fn new(repository: Arc<dyn TodoRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self) -> Result<Vec<TodoRecord>, TodoError> {
        let todos = self.repository.find_all().await?;
        Ok(todos.iter().map(|todo| todo.to_record()).collect())
    }
}
