//! Session-backed implementation of the TransactionRunner port.
//!
//! Runs work in a nested transaction on the session bound to the current
//! task (a savepoint inside a request), or in a fresh session when none is
//! bound.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::ports::{ConnectionSource, TransactionRunner, UnitOfWorkError};

use super::ContextProvider;

/// TransactionRunner over a [`ContextProvider`].
pub struct ScopedTransactionRunner<S: ConnectionSource> {
    provider: Arc<ContextProvider<S>>,
}

impl<S: ConnectionSource> ScopedTransactionRunner<S> {
    pub fn new(provider: Arc<ContextProvider<S>>) -> Self {
        Self { provider }
    }
}

impl<S: ConnectionSource> Clone for ScopedTransactionRunner<S> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
        }
    }
}

#[async_trait]
impl<S: ConnectionSource> TransactionRunner for ScopedTransactionRunner<S> {
    async fn run<F, Fut, T, E>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<T, E>> + Send,
        T: Send,
        E: From<UnitOfWorkError> + Send,
    {
        self.provider
            .scope(|session| async move {
                session.begin().await?;

                match work().await {
                    Ok(value) => {
                        if let Err(err) = session.commit().await {
                            session.mark_failure();
                            return Err(err.into());
                        }
                        session.mark_success();
                        Ok(value)
                    }
                    Err(err) => {
                        if let Err(rollback_err) = session.rollback().await {
                            tracing::error!(
                                session_id = %session.id(),
                                error = %rollback_err,
                                "Rollback failed"
                            );
                        }
                        session.mark_failure();
                        Err(err)
                    }
                }
            })
            .await
    }
}
