//! In-memory transactional store.
//!
//! Behaves like a tiny database with one `todos` table: each connection
//! keeps its own stack of uncommitted write layers (one per transaction
//! level), so savepoint and rollback semantics match PostgreSQL closely
//! enough to exercise the session layer without a server.
//!
//! Writes outside a transaction are applied immediately (autocommit).

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::todo::TodoRecord;
use crate::ports::{ConnectionSource, StoreError, TransactionalConnection};

type Table = BTreeMap<String, TodoRecord>;

/// Shared committed state. Clones see the same data.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDatabase {
    todos: Arc<RwLock<Table>>,
    closed: Arc<AtomicBool>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Committed rows, ordered by id.
    pub async fn committed_todos(&self) -> Vec<TodoRecord> {
        self.todos.read().await.values().cloned().collect()
    }

    /// Write rows straight into committed state.
    pub async fn seed(&self, records: impl IntoIterator<Item = TodoRecord>) {
        let mut todos = self.todos.write().await;
        for record in records {
            todos.insert(record.id.clone(), record);
        }
    }

    /// Refuse new connections from now on.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl ConnectionSource for InMemoryDatabase {
    type Connection = InMemoryConnection;

    async fn acquire(&self) -> Result<InMemoryConnection, StoreError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(StoreError::message("in-memory database is closed"));
        }
        Ok(InMemoryConnection {
            todos: Arc::clone(&self.todos),
            layers: Vec::new(),
        })
    }
}

/// Pending writes of one transaction level. `None` marks a deletion.
#[derive(Debug, Default)]
struct Layer {
    savepoint: Option<String>,
    writes: BTreeMap<String, Option<TodoRecord>>,
}

/// One connection to an [`InMemoryDatabase`].
#[derive(Debug)]
pub struct InMemoryConnection {
    todos: Arc<RwLock<Table>>,
    layers: Vec<Layer>,
}

impl InMemoryConnection {
    pub fn in_transaction(&self) -> bool {
        !self.layers.is_empty()
    }

    /// Row as seen by this connection, including its own pending writes.
    pub async fn get(&self, id: &str) -> Option<TodoRecord> {
        for layer in self.layers.iter().rev() {
            if let Some(entry) = layer.writes.get(id) {
                return entry.clone();
            }
        }
        self.todos.read().await.get(id).cloned()
    }

    /// Every row visible to this connection, ordered by id.
    pub async fn all(&self) -> Vec<TodoRecord> {
        let mut visible = self.todos.read().await.clone();
        for layer in &self.layers {
            apply(&mut visible, layer.writes.clone());
        }
        visible.into_values().collect()
    }

    /// Insert or replace a row.
    pub async fn put(&mut self, record: TodoRecord) {
        self.write(record.id.clone(), Some(record)).await;
    }

    /// Delete a row if present.
    pub async fn remove(&mut self, id: &str) {
        self.write(id.to_string(), None).await;
    }

    async fn write(&mut self, id: String, entry: Option<TodoRecord>) {
        match self.layers.last_mut() {
            Some(layer) => {
                layer.writes.insert(id, entry);
            }
            None => {
                let mut todos = self.todos.write().await;
                apply(&mut todos, BTreeMap::from([(id, entry)]));
            }
        }
    }

    fn require_transaction(&self) -> Result<(), StoreError> {
        if self.in_transaction() {
            Ok(())
        } else {
            Err(StoreError::message("no transaction is open"))
        }
    }

    fn savepoint_position(&self, name: &str) -> Result<usize, StoreError> {
        self.layers
            .iter()
            .rposition(|layer| layer.savepoint.as_deref() == Some(name))
            .ok_or_else(|| StoreError::message(format!("savepoint {} does not exist", name)))
    }
}

fn apply(table: &mut Table, writes: BTreeMap<String, Option<TodoRecord>>) {
    for (id, entry) in writes {
        match entry {
            Some(record) => {
                table.insert(id, record);
            }
            None => {
                table.remove(&id);
            }
        }
    }
}

#[async_trait]
impl TransactionalConnection for InMemoryConnection {
    async fn begin(&mut self) -> Result<(), StoreError> {
        if self.in_transaction() {
            return Err(StoreError::message("a transaction is already open"));
        }
        self.layers.push(Layer::default());
        Ok(())
    }

    async fn commit(&mut self) -> Result<(), StoreError> {
        self.require_transaction()?;
        let mut todos = self.todos.write().await;
        for layer in self.layers.drain(..) {
            apply(&mut todos, layer.writes);
        }
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), StoreError> {
        self.require_transaction()?;
        self.layers.clear();
        Ok(())
    }

    async fn savepoint(&mut self, name: &str) -> Result<(), StoreError> {
        self.require_transaction()?;
        self.layers.push(Layer {
            savepoint: Some(name.to_string()),
            writes: BTreeMap::new(),
        });
        Ok(())
    }

    async fn release_savepoint(&mut self, name: &str) -> Result<(), StoreError> {
        let position = self.savepoint_position(name)?;
        let released: Vec<Layer> = self.layers.drain(position..).collect();
        // The base layer never carries a savepoint name, so a parent exists.
        let parent = &mut self.layers[position - 1];
        for layer in released {
            parent.writes.extend(layer.writes);
        }
        Ok(())
    }

    async fn rollback_to_savepoint(&mut self, name: &str) -> Result<(), StoreError> {
        let position = self.savepoint_position(name)?;
        self.layers.truncate(position + 1);
        self.layers[position].writes.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, title: &str) -> TodoRecord {
        TodoRecord {
            id: id.to_string(),
            title: title.to_string(),
            description: None,
            completed: false,
        }
    }

    #[tokio::test]
    async fn writes_outside_transaction_autocommit() {
        let db = InMemoryDatabase::new();
        let mut conn = db.acquire().await.unwrap();

        conn.put(record("a", "first")).await;

        assert_eq!(db.committed_todos().await, vec![record("a", "first")]);
    }

    #[tokio::test]
    async fn uncommitted_writes_are_private_to_the_connection() {
        let db = InMemoryDatabase::new();
        let mut writer = db.acquire().await.unwrap();
        let reader = db.acquire().await.unwrap();

        writer.begin().await.unwrap();
        writer.put(record("a", "first")).await;

        assert!(writer.get("a").await.is_some());
        assert!(reader.get("a").await.is_none());

        writer.commit().await.unwrap();
        assert!(reader.get("a").await.is_some());
    }

    #[tokio::test]
    async fn rollback_discards_everything() {
        let db = InMemoryDatabase::new();
        let mut conn = db.acquire().await.unwrap();

        conn.begin().await.unwrap();
        conn.put(record("a", "first")).await;
        conn.savepoint("sp").await.unwrap();
        conn.put(record("b", "second")).await;
        conn.rollback().await.unwrap();

        assert!(!conn.in_transaction());
        assert!(db.committed_todos().await.is_empty());
    }

    #[tokio::test]
    async fn rollback_to_savepoint_keeps_earlier_writes() {
        let db = InMemoryDatabase::new();
        let mut conn = db.acquire().await.unwrap();

        conn.begin().await.unwrap();
        conn.put(record("a", "first")).await;
        conn.savepoint("sp").await.unwrap();
        conn.put(record("b", "second")).await;
        conn.remove("a").await;
        conn.rollback_to_savepoint("sp").await.unwrap();
        conn.release_savepoint("sp").await.unwrap();
        conn.commit().await.unwrap();

        assert_eq!(db.committed_todos().await, vec![record("a", "first")]);
    }

    #[tokio::test]
    async fn released_savepoint_folds_into_parent() {
        let db = InMemoryDatabase::new();
        let mut conn = db.acquire().await.unwrap();

        conn.begin().await.unwrap();
        conn.savepoint("sp").await.unwrap();
        conn.put(record("a", "first")).await;
        conn.release_savepoint("sp").await.unwrap();
        assert_eq!(conn.all().await.len(), 1);

        conn.rollback().await.unwrap();
        assert!(db.committed_todos().await.is_empty());
    }

    #[tokio::test]
    async fn deletes_shadow_committed_rows() {
        let db = InMemoryDatabase::new();
        let mut conn = db.acquire().await.unwrap();
        conn.put(record("a", "first")).await;

        conn.begin().await.unwrap();
        conn.remove("a").await;

        assert!(conn.get("a").await.is_none());
        assert!(conn.all().await.is_empty());
        assert_eq!(db.committed_todos().await.len(), 1);
    }

    #[tokio::test]
    async fn unknown_savepoint_is_an_error() {
        let db = InMemoryDatabase::new();
        let mut conn = db.acquire().await.unwrap();
        conn.begin().await.unwrap();

        assert!(conn.release_savepoint("missing").await.is_err());
        assert!(conn.rollback_to_savepoint("missing").await.is_err());
    }

    #[tokio::test]
    async fn commit_without_transaction_is_an_error() {
        let db = InMemoryDatabase::new();
        let mut conn = db.acquire().await.unwrap();
        assert!(conn.commit().await.is_err());
    }

    #[tokio::test]
    async fn closed_database_refuses_connections() {
        let db = InMemoryDatabase::new();
        db.close();
        assert!(db.acquire().await.is_err());
    }
}
