//! HTTP adapter for todo endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{CreateTodoRequest, TodoResponse, UpdateTodoRequest};
pub use handlers::TodoHandlers;
pub use routes::todo_routes;
