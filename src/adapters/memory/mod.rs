//! In-memory adapters.
//!
//! A transactional in-memory store and a repository on top of it. Used by
//! tests and for running the API without PostgreSQL.

mod database;
mod todo_repository;

pub use database::{InMemoryConnection, InMemoryDatabase};
pub use todo_repository::InMemoryTodoRepository;
