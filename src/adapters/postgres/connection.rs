//! PostgreSQL connection source for the session layer.
//!
//! Transactions are driven with plain SQL so that the session can nest them
//! with named savepoints on a single pooled connection.

use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::{Executor, PgConnection, PgPool, Postgres};

use crate::ports::{ConnectionSource, StoreError, TransactionalConnection};

/// Hands out pooled connections, one per session.
#[derive(Clone)]
pub struct PgConnectionSource {
    pool: PgPool,
}

impl PgConnectionSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ConnectionSource for PgConnectionSource {
    type Connection = PostgresConnection;

    async fn acquire(&self) -> Result<PostgresConnection, StoreError> {
        let connection = self.pool.acquire().await.map_err(StoreError::new)?;
        Ok(PostgresConnection {
            inner: Some(connection),
            in_transaction: false,
        })
    }
}

/// A pooled connection owned by one session.
///
/// Returned to the pool when the session ends. If it is dropped while a
/// transaction may still be open (the request future was cancelled before
/// the session finished), it is detached from the pool instead so the server
/// aborts the transaction when the socket closes.
pub struct PostgresConnection {
    inner: Option<PoolConnection<Postgres>>,
    in_transaction: bool,
}

impl PostgresConnection {
    /// The live connection queries run on.
    pub fn executor(&mut self) -> Result<&mut PgConnection, StoreError> {
        match self.inner.as_mut() {
            Some(connection) => Ok(&mut **connection),
            None => Err(StoreError::message("connection already released")),
        }
    }

    /// True between a top-level BEGIN and its successful COMMIT or ROLLBACK.
    pub fn in_transaction(&self) -> bool {
        self.in_transaction
    }

    async fn run(&mut self, sql: &str) -> Result<(), StoreError> {
        self.executor()?
            .execute(sql)
            .await
            .map_err(StoreError::new)?;
        Ok(())
    }
}

impl Drop for PostgresConnection {
    fn drop(&mut self) {
        if !self.in_transaction {
            return;
        }
        if let Some(connection) = self.inner.take() {
            tracing::warn!("Connection dropped inside a transaction, discarding it");
            drop(connection.detach());
        }
    }
}

#[async_trait]
impl TransactionalConnection for PostgresConnection {
    async fn begin(&mut self) -> Result<(), StoreError> {
        // Set before sending; a cancelled BEGIN leaves the state unknown.
        self.in_transaction = true;
        self.run("BEGIN").await
    }

    async fn commit(&mut self) -> Result<(), StoreError> {
        self.run("COMMIT").await?;
        self.in_transaction = false;
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), StoreError> {
        self.run("ROLLBACK").await?;
        self.in_transaction = false;
        Ok(())
    }

    async fn savepoint(&mut self, name: &str) -> Result<(), StoreError> {
        self.run(&format!("SAVEPOINT {}", name)).await
    }

    async fn release_savepoint(&mut self, name: &str) -> Result<(), StoreError> {
        self.run(&format!("RELEASE SAVEPOINT {}", name)).await
    }

    async fn rollback_to_savepoint(&mut self, name: &str) -> Result<(), StoreError> {
        self.run(&format!("ROLLBACK TO SAVEPOINT {}", name)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::postgres::PostgresTodoRepository;
    use crate::adapters::session::ContextProvider;
    use crate::domain::todo::Todo;
    use crate::ports::{TodoRepository, UnitOfWorkError};
    use sqlx::postgres::PgPoolOptions;
    use std::sync::Arc;
    use tokio::sync::oneshot;

    async fn single_connection_pool(url: &str) -> PgPool {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect(url)
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        pool
    }

    async fn stored(pool: &PgPool, todo: &Todo) -> bool {
        sqlx::query("SELECT 1 FROM todos WHERE id = $1")
            .bind(todo.id().to_string())
            .fetch_optional(pool)
            .await
            .unwrap()
            .is_some()
    }

    #[tokio::test]
    #[ignore = "Requires PostgreSQL; set TODO_API_TEST_DATABASE_URL"]
    async fn cancelled_scope_does_not_leak_its_writes_to_the_next_session() {
        let url = std::env::var("TODO_API_TEST_DATABASE_URL").unwrap();
        let pool = single_connection_pool(&url).await;
        let provider = Arc::new(ContextProvider::new(PgConnectionSource::new(pool.clone())));
        let repo = PostgresTodoRepository::new(provider.clone());

        let abandoned = Todo::new("abandoned", None).unwrap();
        let (written_tx, written_rx) = oneshot::channel();
        let task = {
            let provider = provider.clone();
            let repo = repo.clone();
            let todo = abandoned.clone();
            tokio::spawn(async move {
                provider
                    .scope(|session| async move {
                        repo.save(&todo).await.unwrap();
                        session.mark_success();
                        let _ = written_tx.send(());
                        std::future::pending::<()>().await;
                        Ok::<_, UnitOfWorkError>(())
                    })
                    .await
            })
        };
        written_rx.await.unwrap();
        task.abort();
        assert!(task.await.unwrap_err().is_cancelled());

        let kept = Todo::new("kept", None).unwrap();
        provider
            .scope(|session| {
                let repo = repo.clone();
                let todo = kept.clone();
                async move {
                    repo.save(&todo).await?;
                    session.mark_success();
                    Ok::<_, crate::domain::foundation::DomainError>(())
                }
            })
            .await
            .unwrap();

        assert!(stored(&pool, &kept).await);
        assert!(!stored(&pool, &abandoned).await);
    }
}
