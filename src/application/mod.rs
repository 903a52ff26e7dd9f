//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Commands (create, update, delete, complete, reopen) and queries (get, list)
//! have one handler each.

pub mod handlers;

pub use handlers::{
    CreateTodoCommand, CreateTodoHandler, DeleteTodoCommand, DeleteTodoHandler, GetTodoHandler,
    GetTodoQuery, ListTodosHandler, MarkTodoCompletedCommand, MarkTodoCompletedHandler,
    MarkTodoUncompletedCommand, MarkTodoUncompletedHandler, UpdateTodoCommand, UpdateTodoHandler,
};
