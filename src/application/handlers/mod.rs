//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod todo;

pub use todo::{
    CreateTodoCommand, CreateTodoHandler, DeleteTodoCommand, DeleteTodoHandler, GetTodoHandler,
    GetTodoQuery, ListTodosHandler, MarkTodoCompletedCommand, MarkTodoCompletedHandler,
    MarkTodoUncompletedCommand, MarkTodoUncompletedHandler, UpdateTodoCommand, UpdateTodoHandler,
};
