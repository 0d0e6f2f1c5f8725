//! The document store as the rest of the system sees it.
//!
//! [`DocumentStore`] is the narrow collaborator interface: single-document
//! reads and writes, equality queries, and a push subscription per
//! collection. [`SqliteDocumentStore`] implements it over one [`Database`]
//! connection.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::database::Database;
use crate::documents::{Document, DocumentUpdate, FieldEq, Fields};
use crate::error::{Result, StoreError};

/// Buffered change notifications per store before slow watchers lag.
const CHANGE_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Modified,
    Removed,
}

/// Emitted after every committed write.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ChangeEvent {
    pub collection: String,
    pub id: String,
    pub kind: ChangeKind,
    /// Document body after the write, or just before removal.
    #[serde(skip)]
    pub fields: Fields,
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get_one(&self, collection: &str, id: &str) -> Result<Option<Document>>;

    /// Documents matching every predicate, in insertion order.
    async fn query(&self, collection: &str, predicates: &[FieldEq]) -> Result<Vec<Document>>;

    /// Apply one logical update. Fails with `NotFound` for a missing document
    /// and `Conflict` when a precondition does not hold.
    async fn update(&self, collection: &str, id: &str, update: DocumentUpdate) -> Result<()>;

    /// Store a new document under a generated ID and return that ID.
    async fn add_document(&self, collection: &str, fields: Fields) -> Result<String>;

    /// Create or replace a document under a known ID.
    async fn set_document(&self, collection: &str, id: &str, fields: Fields) -> Result<()>;

    async fn delete_document(&self, collection: &str, id: &str) -> Result<bool>;

    /// Watch a collection for changes until the returned handle is dropped.
    fn subscribe(&self, collection: &str) -> CollectionWatch;
}

/// Change notifications for one collection.
pub struct CollectionWatch {
    collection: String,
    rx: broadcast::Receiver<ChangeEvent>,
}

impl CollectionWatch {
    /// Next change in this collection, or `None` once the store is gone.
    ///
    /// If the watcher fell behind, the missed events are skipped; the next
    /// delivered event is the signal to refetch.
    pub async fn recv(&mut self) -> Option<ChangeEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) if event.collection == self.collection => return Some(event),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    warn!(collection = %self.collection, missed, "Collection watcher lagged");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

/// [`DocumentStore`] over a single SQLite connection.
///
/// All access goes through one async mutex, so each write is atomic with
/// respect to every other write. Reads followed by separate writes are not.
#[derive(Clone)]
pub struct SqliteDocumentStore {
    db: Arc<Mutex<Database>>,
    changes: broadcast::Sender<ChangeEvent>,
}

impl SqliteDocumentStore {
    pub fn new(db: Database) -> Self {
        let (changes, _rx) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            db: Arc::new(Mutex::new(db)),
            changes,
        }
    }

    fn notify(&self, collection: &str, id: &str, kind: ChangeKind, fields: Fields) {
        debug!(collection, id, ?kind, "Document changed");
        // No receivers is not an error.
        let _ = self.changes.send(ChangeEvent {
            collection: collection.to_string(),
            id: id.to_string(),
            kind,
            fields,
        });
    }
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn get_one(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        self.db.lock().await.get_document(collection, id)
    }

    async fn query(&self, collection: &str, predicates: &[FieldEq]) -> Result<Vec<Document>> {
        self.db.lock().await.query_documents(collection, predicates)
    }

    async fn update(&self, collection: &str, id: &str, update: DocumentUpdate) -> Result<()> {
        let fields = self
            .db
            .lock()
            .await
            .update_document(collection, id, &update)?;
        self.notify(collection, id, ChangeKind::Modified, fields);
        Ok(())
    }

    async fn add_document(&self, collection: &str, fields: Fields) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        self.db
            .lock()
            .await
            .insert_document(collection, &id, &fields)?;
        self.notify(collection, &id, ChangeKind::Added, fields);
        Ok(id)
    }

    async fn set_document(&self, collection: &str, id: &str, fields: Fields) -> Result<()> {
        let existed = {
            let db = self.db.lock().await;
            let existed = db.get_document(collection, id)?.is_some();
            db.put_document(collection, id, &fields)?;
            existed
        };
        let kind = if existed {
            ChangeKind::Modified
        } else {
            ChangeKind::Added
        };
        self.notify(collection, id, kind, fields);
        Ok(())
    }

    async fn delete_document(&self, collection: &str, id: &str) -> Result<bool> {
        let removed = {
            let db = self.db.lock().await;
            let previous = db.get_document(collection, id)?;
            db.delete_document(collection, id)?;
            previous
        };
        let Some(previous) = removed else {
            return Ok(false);
        };
        self.notify(collection, id, ChangeKind::Removed, previous.fields);
        Ok(true)
    }

    fn subscribe(&self, collection: &str) -> CollectionWatch {
        CollectionWatch {
            collection: collection.to_string(),
            rx: self.changes.subscribe(),
        }
    }
}

/// Fetch a document that must exist.
pub async fn require(store: &dyn DocumentStore, collection: &str, id: &str) -> Result<Document> {
    store
        .get_one(collection, id)
        .await?
        .ok_or_else(|| StoreError::not_found(collection, id))
}
