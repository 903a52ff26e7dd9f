//! Task-bound sessions (unit of work).
//!
//! A [`ContextProvider`] owns a connection source and binds at most one
//! [`Session`] to the current task at a time. Everything awaited inside
//! [`ContextProvider::scope`] sees that same session through
//! [`ContextProvider::current`], so repositories never take a connection
//! parameter and concurrent requests never share one.
//!
//! ```text
//! scope(work)
//!   ├─ session already bound? ──► run work with it (no new transaction)
//!   └─ acquire ─► BEGIN ─► bind ─► work ─► COMMIT if marked successful
//!                                         ROLLBACK otherwise ─► release
//! ```
//!
//! Nesting inside a session is expressed with [`Session::begin`]: the first
//! level is a real transaction, every further level is a savepoint.

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use crate::ports::{ConnectionSource, TransactionalConnection, UnitOfWorkError};

tokio::task_local! {
    static ACTIVE_SESSION: Arc<dyn Any + Send + Sync>;
}

// ════════════════════════════════════════════════════════════════════════════
// Session
// ════════════════════════════════════════════════════════════════════════════

struct Slot<C> {
    connection: C,
    depth: usize,
}

struct SessionState<C> {
    id: Uuid,
    slot: Mutex<Slot<C>>,
    success: AtomicBool,
}

/// Handle to the unit of work bound to a task.
///
/// Clones share the same connection and outcome flag. The outcome starts as
/// failure; only an explicit [`Session::mark_success`] lets the scope commit.
pub struct Session<C> {
    state: Arc<SessionState<C>>,
}

impl<C> Clone for Session<C> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<C> fmt::Debug for Session<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.state.id)
            .field("success", &self.is_marked_successful())
            .finish()
    }
}

/// Exclusive access to a session's connection.
///
/// Hold it only for the duration of one store call.
pub struct ConnectionGuard<'a, C> {
    slot: MutexGuard<'a, Slot<C>>,
}

impl<C> Deref for ConnectionGuard<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        &self.slot.connection
    }
}

impl<C> DerefMut for ConnectionGuard<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        &mut self.slot.connection
    }
}

fn savepoint_name(level: usize) -> String {
    format!("uow_sp_{}", level)
}

impl<C> Session<C> {
    /// Identifier used in log lines.
    pub fn id(&self) -> Uuid {
        self.state.id
    }

    /// True if both handles refer to the same unit of work.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }

    /// Let the enclosing scope commit when it ends.
    pub fn mark_success(&self) {
        self.state.success.store(true, Ordering::SeqCst);
    }

    /// Force the enclosing scope to roll back when it ends.
    pub fn mark_failure(&self) {
        self.state.success.store(false, Ordering::SeqCst);
    }

    pub fn is_marked_successful(&self) -> bool {
        self.state.success.load(Ordering::SeqCst)
    }
}

impl<C: TransactionalConnection> Session<C> {
    fn open(connection: C) -> Self {
        Self {
            state: Arc::new(SessionState {
                id: Uuid::now_v7(),
                slot: Mutex::new(Slot {
                    connection,
                    depth: 0,
                }),
                success: AtomicBool::new(false),
            }),
        }
    }

    /// Borrow the underlying connection.
    pub async fn connection(&self) -> ConnectionGuard<'_, C> {
        ConnectionGuard {
            slot: self.state.slot.lock().await,
        }
    }

    /// Number of open transaction levels (0 = none, 1 = top level).
    pub async fn transaction_depth(&self) -> usize {
        self.state.slot.lock().await.depth
    }

    pub async fn in_transaction(&self) -> bool {
        self.transaction_depth().await > 0
    }

    /// Open a transaction, or a savepoint if one is already open.
    pub async fn begin(&self) -> Result<(), UnitOfWorkError> {
        let mut slot = self.state.slot.lock().await;
        if slot.depth == 0 {
            slot.connection
                .begin()
                .await
                .map_err(UnitOfWorkError::Begin)?;
        } else {
            let name = savepoint_name(slot.depth);
            tracing::debug!(session_id = %self.state.id, savepoint = %name, "Opening nested transaction");
            slot.connection
                .savepoint(&name)
                .await
                .map_err(UnitOfWorkError::Begin)?;
        }
        slot.depth += 1;
        Ok(())
    }

    /// Commit the innermost open level.
    ///
    /// At the top level this is a real COMMIT; deeper levels release their
    /// savepoint into the parent. A no-op when nothing is open.
    pub async fn commit(&self) -> Result<(), UnitOfWorkError> {
        let mut slot = self.state.slot.lock().await;
        match slot.depth {
            0 => Ok(()),
            1 => {
                slot.depth = 0;
                slot.connection
                    .commit()
                    .await
                    .map_err(UnitOfWorkError::Commit)
            }
            depth => {
                slot.depth = depth - 1;
                let name = savepoint_name(depth - 1);
                slot.connection
                    .release_savepoint(&name)
                    .await
                    .map_err(UnitOfWorkError::Commit)
            }
        }
    }

    /// Roll back the innermost open level.
    ///
    /// At the top level this aborts the whole transaction; deeper levels
    /// only discard what happened since their savepoint. The level counts as
    /// closed even if the store reports an error.
    pub async fn rollback(&self) -> Result<(), UnitOfWorkError> {
        let mut slot = self.state.slot.lock().await;
        match slot.depth {
            0 => Ok(()),
            1 => {
                slot.depth = 0;
                slot.connection
                    .rollback()
                    .await
                    .map_err(UnitOfWorkError::Rollback)
            }
            depth => {
                slot.depth = depth - 1;
                let name = savepoint_name(depth - 1);
                slot.connection
                    .rollback_to_savepoint(&name)
                    .await
                    .map_err(UnitOfWorkError::Rollback)?;
                slot.connection
                    .release_savepoint(&name)
                    .await
                    .map_err(UnitOfWorkError::Rollback)
            }
        }
    }

    /// Close the whole transaction according to the outcome flag.
    async fn finish(&self) -> Result<(), UnitOfWorkError> {
        let mut slot = self.state.slot.lock().await;
        if slot.depth == 0 {
            return Ok(());
        }
        slot.depth = 0;

        if self.is_marked_successful() {
            tracing::debug!(session_id = %self.state.id, "Committing session");
            slot.connection
                .commit()
                .await
                .map_err(UnitOfWorkError::Commit)
        } else {
            tracing::debug!(session_id = %self.state.id, "Rolling back session");
            slot.connection
                .rollback()
                .await
                .map_err(UnitOfWorkError::Rollback)
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Context provider
// ════════════════════════════════════════════════════════════════════════════

/// Opens sessions on a connection source and binds them to the current task.
pub struct ContextProvider<S: ConnectionSource> {
    source: S,
}

impl<S: ConnectionSource> ContextProvider<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// The connection source sessions are opened on.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// The session bound to the current task.
    ///
    /// # Errors
    ///
    /// - `NoActiveSession` outside of [`ContextProvider::scope`], or when the
    ///   bound session belongs to a different kind of store
    pub fn current(&self) -> Result<Session<S::Connection>, UnitOfWorkError> {
        ACTIVE_SESSION
            .try_with(|bound| Arc::clone(bound))
            .ok()
            .and_then(|bound| bound.downcast::<SessionState<S::Connection>>().ok())
            .map(|state| Session { state })
            .ok_or(UnitOfWorkError::NoActiveSession)
    }

    /// Run `work` inside a session.
    ///
    /// If the task already has a session, `work` simply receives it and no
    /// transaction boundary is added. Otherwise a connection is acquired, a
    /// transaction begun, and the session bound for the duration of `work`.
    /// When `work` returns, the transaction commits if the session was marked
    /// successful and rolls back otherwise (including when `work` failed);
    /// the connection is then released.
    ///
    /// An error from `work` always wins over an error closing the session.
    pub async fn scope<F, Fut, T, E>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(Session<S::Connection>) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<UnitOfWorkError>,
    {
        if let Ok(existing) = self.current() {
            tracing::debug!(session_id = %existing.id(), "Reusing session bound to current task");
            return work(existing).await;
        }

        let connection = self
            .source
            .acquire()
            .await
            .map_err(UnitOfWorkError::Acquire)?;
        let session = Session::open(connection);
        tracing::debug!(session_id = %session.id(), "Opened session");

        session.begin().await?;

        let bound: Arc<dyn Any + Send + Sync> = session.state.clone();
        let outcome = ACTIVE_SESSION.scope(bound, work(session.clone())).await;
        if outcome.is_err() {
            session.mark_failure();
        }
        let finished = session.finish().await;

        match (outcome, finished) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(err)) => {
                tracing::error!(session_id = %session.id(), error = %err, "Failed to close session");
                Err(err.into())
            }
            (Err(err), Ok(())) => Err(err),
            (Err(err), Err(close_err)) => {
                tracing::error!(session_id = %session.id(), error = %close_err, "Failed to close session after error");
                Err(err)
            }
        }
    }
}
