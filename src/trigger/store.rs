//! Persistence seam for pending entries.
//!
//! The database client lives outside this crate. It plugs in through
//! [`StoreConnector`], which is asked for a connection only once an invocation
//! has something to write, and [`DocumentStore`], which creates one document
//! per call. Implementations report unreachable stores as
//! [`TriggerError::Connection`] and failed creates as [`TriggerError::Write`].

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use uuid::Uuid;

use crate::error::{Result, TriggerError};
use crate::types::Document;

/// A connected document store.
pub trait DocumentStore {
    /// Create a new document with a store-assigned id and return that id.
    fn create_document(&mut self, collection: &str, fields: Document) -> Result<String>;
}

/// Factory for store connections.
pub trait StoreConnector {
    type Store: DocumentStore;

    fn connect(&self) -> Result<Self::Store>;
}

/// Document written to a [`MemoryStore`].
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: String,
    pub fields: Document,
}

/// In-process store. Clones share the same collections.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    collections: Arc<Mutex<BTreeMap<String, Vec<StoredDocument>>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Documents of `collection` in creation order.
    pub fn documents(&self, collection: &str) -> Result<Vec<StoredDocument>> {
        Ok(self.lock()?.get(collection).cloned().unwrap_or_default())
    }

    /// Number of documents across all collections.
    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.values().map(Vec::len).sum())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lock()?.values().all(Vec::is_empty))
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<String, Vec<StoredDocument>>>> {
        self.collections.lock().map_err(|_| TriggerError::Connection {
            reason: "memory store lock poisoned".into(),
        })
    }
}

impl DocumentStore for MemoryStore {
    fn create_document(&mut self, collection: &str, fields: Document) -> Result<String> {
        let id = Uuid::new_v4().simple().to_string();
        let mut collections = self.lock().map_err(|err| TriggerError::Write {
            collection: collection.to_string(),
            reason: err.to_string(),
        })?;
        collections
            .entry(collection.to_string())
            .or_default()
            .push(StoredDocument {
                id: id.clone(),
                fields,
            });
        Ok(id)
    }
}

/// Connector handing out handles to one shared [`MemoryStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryConnector {
    store: MemoryStore,
}

impl MemoryConnector {
    #[must_use]
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn store(&self) -> &MemoryStore {
        &self.store
    }
}

impl StoreConnector for MemoryConnector {
    type Store = MemoryStore;

    fn connect(&self) -> Result<MemoryStore> {
        Ok(self.store.clone())
    }
}
