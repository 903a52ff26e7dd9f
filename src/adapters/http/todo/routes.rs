//! HTTP routes for todo endpoints.

use axum::{
    routing::{get, put},
    Router,
};

use crate::ports::TransactionRunner;

use super::handlers::{
    complete_todo, create_todo, delete_todo, get_todo, list_todos, uncomplete_todo, update_todo,
    TodoHandlers,
};

/// Creates the todo router, to be nested under `/todos`.
pub fn todo_routes<R: TransactionRunner + 'static>(handlers: TodoHandlers<R>) -> Router {
    Router::new()
        .route("/", get(list_todos::<R>).post(create_todo::<R>))
        .route(
            "/:id",
            get(get_todo::<R>)
                .put(update_todo::<R>)
                .delete(delete_todo::<R>),
        )
        .route("/:id/complete", put(complete_todo::<R>))
        .route("/:id/uncomplete", put(uncomplete_todo::<R>))
        .with_state(handlers)
}
