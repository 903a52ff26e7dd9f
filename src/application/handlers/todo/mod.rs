//! Todo command and query handlers.
//!
//! Single-step handlers (create, get, list) rely on the request scope;
//! read-modify-write handlers run inside a `TransactionRunner`.

mod create_todo;
mod delete_todo;
mod get_todo;
mod list_todos;
mod mark_todo_completed;
mod mark_todo_uncompleted;
mod update_todo;

pub use create_todo::{CreateTodoCommand, CreateTodoHandler};
pub use delete_todo::{DeleteTodoCommand, DeleteTodoHandler};
pub use get_todo::{GetTodoHandler, GetTodoQuery};
pub use list_todos::ListTodosHandler;
pub use mark_todo_completed::{MarkTodoCompletedCommand, MarkTodoCompletedHandler};
pub use mark_todo_uncompleted::{MarkTodoUncompletedCommand, MarkTodoUncompletedHandler};
pub use update_todo::{UpdateTodoCommand, UpdateTodoHandler};
