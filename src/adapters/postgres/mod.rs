//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PgConnectionSource` - Pool-backed connections for the session layer
//! - `PostgresTodoRepository` - Todo persistence on the `todos` table

mod connection;
mod todo_repository;

pub use connection::{PgConnectionSource, PostgresConnection};
pub use todo_repository::PostgresTodoRepository;
