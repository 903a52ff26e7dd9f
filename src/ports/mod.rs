//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `TodoRepository` - Todo persistence
//! - `TransactionRunner` - Atomic execution of multi-step use cases
//! - `ConnectionSource` / `TransactionalConnection` - What the session layer
//!   needs from a backing store

mod todo_repository;
mod transaction_runner;
mod unit_of_work;

pub use todo_repository::{todo_not_found, TodoRepository};
pub use transaction_runner::TransactionRunner;
pub use unit_of_work::{ConnectionSource, StoreError, TransactionalConnection, UnitOfWorkError};
