//! In-memory document-table store
//!
//! No persistence. All data lost when the process terminates.
//!
//! # Use Cases
//!
//! - Unit and integration tests (fast, no cleanup needed)
//! - Development and prototyping
//! - Embedders that want a self-contained store behind the adapter
//!
//! Tables are created implicitly on first insert. Per-table insertion order
//! is preserved, which is what gives the adapter its stable "first match"
//! semantics against this backend.

use async_trait::async_trait;
use authstore_core::{Document, DocumentStore, Error, Result, Value, INTERNAL_ID_FIELD};
use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

/// In-memory [`DocumentStore`] backend
///
/// Thread-safe: a single `RwLock` guards the table map, and the store can
/// be shared across tasks behind an `Arc`.
///
/// # Example
///
/// ```ignore
/// let store = Arc::new(MemoryStore::new());
/// let doc = store.insert("session", Document::new()).await?;
/// assert!(doc.internal_id().is_some());
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<String, Vec<Document>>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently held in `table`
    pub fn table_len(&self, table: &str) -> usize {
        self.tables.read().get(table).map_or(0, Vec::len)
    }

    /// Mint a store-internal identifier
    fn mint_internal_id() -> String {
        Uuid::new_v4().simple().to_string()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list_all(&self, table: &str) -> Result<Vec<Document>> {
        Ok(self.tables.read().get(table).cloned().unwrap_or_default())
    }

    async fn insert(&self, table: &str, mut doc: Document) -> Result<Document> {
        doc.insert(INTERNAL_ID_FIELD, Value::String(Self::mint_internal_id()));
        let mut tables = self.tables.write();
        tables
            .entry(table.to_string())
            .or_default()
            .push(doc.clone());
        Ok(doc)
    }

    async fn patch(&self, table: &str, internal_id: &str, patch: Document) -> Result<Document> {
        let mut tables = self.tables.write();
        let docs = tables
            .get_mut(table)
            .ok_or_else(|| Error::DocumentNotFound {
                table: table.to_string(),
                internal_id: internal_id.to_string(),
            })?;

        let doc = docs
            .iter_mut()
            .find(|d| d.internal_id() == Some(internal_id))
            .ok_or_else(|| Error::DocumentNotFound {
                table: table.to_string(),
                internal_id: internal_id.to_string(),
            })?;

        doc.merge(&patch);
        Ok(doc.clone())
    }

    async fn remove(&self, table: &str, internal_id: &str) -> Result<()> {
        let mut tables = self.tables.write();
        let docs = tables
            .get_mut(table)
            .ok_or_else(|| Error::DocumentNotFound {
                table: table.to_string(),
                internal_id: internal_id.to_string(),
            })?;

        let before = docs.len();
        docs.retain(|d| d.internal_id() != Some(internal_id));
        if docs.len() == before {
            return Err(Error::DocumentNotFound {
                table: table.to_string(),
                internal_id: internal_id.to_string(),
            });
        }
        Ok(())
    }
}
