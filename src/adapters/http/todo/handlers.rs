//! HTTP handlers for todo endpoints.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::error_response;
use crate::application::handlers::todo::{
    CreateTodoCommand, CreateTodoHandler, DeleteTodoCommand, DeleteTodoHandler, GetTodoHandler,
    GetTodoQuery, ListTodosHandler, MarkTodoCompletedCommand, MarkTodoCompletedHandler,
    MarkTodoUncompletedCommand, MarkTodoUncompletedHandler, UpdateTodoCommand, UpdateTodoHandler,
};
use crate::domain::foundation::TodoId;
use crate::domain::todo::TodoError;
use crate::ports::{TodoRepository, TransactionRunner};

use super::dto::{CreateTodoRequest, TodoResponse, UpdateTodoRequest};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

pub struct TodoHandlers<R: TransactionRunner> {
    create_handler: Arc<CreateTodoHandler>,
    get_handler: Arc<GetTodoHandler>,
    list_handler: Arc<ListTodosHandler>,
    update_handler: Arc<UpdateTodoHandler<R>>,
    delete_handler: Arc<DeleteTodoHandler<R>>,
    complete_handler: Arc<MarkTodoCompletedHandler<R>>,
    uncomplete_handler: Arc<MarkTodoUncompletedHandler<R>>,
}

impl<R: TransactionRunner> Clone for TodoHandlers<R> {
    fn clone(&self) -> Self {
        Self {
            create_handler: self.create_handler.clone(),
            get_handler: self.get_handler.clone(),
            list_handler: self.list_handler.clone(),
            update_handler: self.update_handler.clone(),
            delete_handler: self.delete_handler.clone(),
            complete_handler: self.complete_handler.clone(),
            uncomplete_handler: self.uncomplete_handler.clone(),
        }
    }
}

impl<R: TransactionRunner> TodoHandlers<R> {
    /// Wire every todo handler onto one repository and runner.
    pub fn new(repository: Arc<dyn TodoRepository>, runner: Arc<R>) -> Self {
        Self {
            create_handler: Arc::new(CreateTodoHandler::new(repository.clone())),
            get_handler: Arc::new(GetTodoHandler::new(repository.clone())),
            list_handler: Arc::new(ListTodosHandler::new(repository.clone())),
            update_handler: Arc::new(UpdateTodoHandler::new(repository.clone(), runner.clone())),
            delete_handler: Arc::new(DeleteTodoHandler::new(repository.clone(), runner.clone())),
            complete_handler: Arc::new(MarkTodoCompletedHandler::new(
                repository.clone(),
                runner.clone(),
            )),
            uncomplete_handler: Arc::new(MarkTodoUncompletedHandler::new(repository, runner)),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /todos - Create a new todo
pub async fn create_todo<R: TransactionRunner + 'static>(
    State(handlers): State<TodoHandlers<R>>,
    body: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => return invalid_body(rejection),
    };

    let cmd = CreateTodoCommand {
        title: req.title,
        description: req.description,
    };

    match handlers.create_handler.handle(cmd).await {
        Ok(record) => (StatusCode::CREATED, Json(TodoResponse::from(record))).into_response(),
        Err(e) => handle_todo_error(e),
    }
}

/// GET /todos - List every todo
pub async fn list_todos<R: TransactionRunner + 'static>(
    State(handlers): State<TodoHandlers<R>>,
) -> Response {
    match handlers.list_handler.handle().await {
        Ok(records) => {
            let response: Vec<TodoResponse> = records.into_iter().map(TodoResponse::from).collect();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_todo_error(e),
    }
}

/// GET /todos/:id - Get one todo
pub async fn get_todo<R: TransactionRunner + 'static>(
    State(handlers): State<TodoHandlers<R>>,
    Path(todo_id): Path<String>,
) -> Response {
    let todo_id = match parse_todo_id(&todo_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers.get_handler.handle(GetTodoQuery { todo_id }).await {
        Ok(record) => (StatusCode::OK, Json(TodoResponse::from(record))).into_response(),
        Err(e) => handle_todo_error(e),
    }
}

/// PUT /todos/:id - Replace title and description
pub async fn update_todo<R: TransactionRunner + 'static>(
    State(handlers): State<TodoHandlers<R>>,
    Path(todo_id): Path<String>,
    body: Result<Json<UpdateTodoRequest>, JsonRejection>,
) -> Response {
    let todo_id = match parse_todo_id(&todo_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => return invalid_body(rejection),
    };

    let cmd = UpdateTodoCommand {
        todo_id,
        title: req.title,
        description: req.description,
    };

    match handlers.update_handler.handle(cmd).await {
        Ok(record) => (StatusCode::OK, Json(TodoResponse::from(record))).into_response(),
        Err(e) => handle_todo_error(e),
    }
}

/// PUT /todos/:id/complete - Mark a todo as completed
pub async fn complete_todo<R: TransactionRunner + 'static>(
    State(handlers): State<TodoHandlers<R>>,
    Path(todo_id): Path<String>,
) -> Response {
    let todo_id = match parse_todo_id(&todo_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let cmd = MarkTodoCompletedCommand { todo_id };

    match handlers.complete_handler.handle(cmd).await {
        Ok(record) => (StatusCode::OK, Json(TodoResponse::from(record))).into_response(),
        Err(e) => handle_todo_error(e),
    }
}

/// PUT /todos/:id/uncomplete - Reopen a completed todo
pub async fn uncomplete_todo<R: TransactionRunner + 'static>(
    State(handlers): State<TodoHandlers<R>>,
    Path(todo_id): Path<String>,
) -> Response {
    let todo_id = match parse_todo_id(&todo_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let cmd = MarkTodoUncompletedCommand { todo_id };

    match handlers.uncomplete_handler.handle(cmd).await {
        Ok(record) => (StatusCode::OK, Json(TodoResponse::from(record))).into_response(),
        Err(e) => handle_todo_error(e),
    }
}

/// DELETE /todos/:id - Remove a todo
pub async fn delete_todo<R: TransactionRunner + 'static>(
    State(handlers): State<TodoHandlers<R>>,
    Path(todo_id): Path<String>,
) -> Response {
    let todo_id = match parse_todo_id(&todo_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers.delete_handler.handle(DeleteTodoCommand { todo_id }).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => handle_todo_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Extraction helpers
// ════════════════════════════════════════════════════════════════════════════

fn parse_todo_id(raw: &str) -> Result<TodoId, Response> {
    raw.parse::<TodoId>()
        .map_err(|_| error_response(StatusCode::BAD_REQUEST, "Invalid todo ID"))
}

fn invalid_body(rejection: JsonRejection) -> Response {
    error_response(StatusCode::BAD_REQUEST, rejection.body_text())
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn handle_todo_error(error: TodoError) -> Response {
    match error {
        TodoError::NotFound(_) => error_response(StatusCode::NOT_FOUND, error.message()),
        TodoError::AlreadyCompleted(_) | TodoError::NotCompleted(_) => {
            error_response(StatusCode::CONFLICT, error.message())
        }
        TodoError::ValidationFailed { .. } => {
            error_response(StatusCode::BAD_REQUEST, error.message())
        }
        TodoError::NoActiveSession => {
            tracing::error!("Todo handler ran outside of a session scope");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
        }
        TodoError::Infrastructure(msg) => {
            tracing::error!(error = %msg, "Todo request failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        let response = handle_todo_error(TodoError::NotFound(TodoId::new()));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn state_guard_violations_map_to_409() {
        let id = TodoId::new();
        assert_eq!(
            handle_todo_error(TodoError::AlreadyCompleted(id)).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            handle_todo_error(TodoError::NotCompleted(id)).status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn validation_failed_maps_to_400() {
        let response = handle_todo_error(TodoError::validation("title", "cannot be empty"));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn missing_session_and_infrastructure_map_to_500() {
        assert_eq!(
            handle_todo_error(TodoError::NoActiveSession).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            handle_todo_error(TodoError::infrastructure("db down")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn malformed_id_is_rejected() {
        let response = parse_todo_id("not-a-uuid").unwrap_err();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
