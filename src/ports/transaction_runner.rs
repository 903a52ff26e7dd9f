//! TransactionRunner port - run a unit of work atomically.
//!
//! Multi-step use cases (read-modify-write, delete-with-lookup) wrap their
//! work in `run`. Single-write use cases skip it and rely on the request
//! scope alone.

use std::future::Future;

use async_trait::async_trait;

use super::UnitOfWorkError;

/// Port for running work inside a (possibly nested) transaction.
///
/// Contract:
/// - the work runs exactly once
/// - on `Ok` the transaction opened for it is committed
/// - on `Err` it is rolled back and the error is returned unchanged
/// - failures of the transaction machinery itself come back as
///   `E::from(UnitOfWorkError)`
#[async_trait]
pub trait TransactionRunner: Send + Sync {
    async fn run<F, Fut, T, E>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<T, E>> + Send,
        T: Send,
        E: From<UnitOfWorkError> + Send;
}
