//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `session` - Task-bound unit of work and the transaction runner
//! - `memory` - In-memory store and repository
//! - `postgres` - PostgreSQL connection source and repository
//! - `http` - axum router, handlers, and middleware

pub mod http;
pub mod memory;
pub mod postgres;
pub mod session;

pub use memory::{InMemoryDatabase, InMemoryTodoRepository};
pub use postgres::{PgConnectionSource, PostgresTodoRepository};
pub use session::{ContextProvider, ScopedTransactionRunner, Session};
