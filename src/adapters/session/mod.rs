//! Session layer - request-scoped units of work.
//!
//! - `ContextProvider` - binds one session per task on top of a connection source
//! - `Session` - the bound unit of work, with savepoint-based nesting
//! - `ScopedTransactionRunner` - `TransactionRunner` built on the provider

mod context_provider;
mod transaction_runner;

pub use context_provider::{ConnectionGuard, ContextProvider, Session};
pub use transaction_runner::ScopedTransactionRunner;
