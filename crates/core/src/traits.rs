//! Store trait: the document-table collaborator contract
//!
//! The adapter depends on exactly four primitives of an external document
//! store, addressed by table name. The store owns the data; the adapter
//! holds no cache or state between calls. There is deliberately no
//! server-side filtering primitive - `list_all` is the only read, and every
//! query semantic is applied in adapter memory.

use crate::document::Document;
use crate::error::Result;
use async_trait::async_trait;

/// Document-table store abstraction
///
/// Implementations must be thread-safe (`Send + Sync`) and support async
/// operations. Every document returned by the store carries the
/// store-assigned internal identifier under
/// [`INTERNAL_ID_FIELD`](crate::document::INTERNAL_ID_FIELD).
///
/// Failure semantics: errors are propagated to the adapter unchanged; any
/// retry or timeout policy belongs to the store client, not to callers of
/// this trait.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Return every document in the named table
    ///
    /// Order is store-defined but must be stable across consecutive calls
    /// with no intervening writes; "first match" semantics in the adapter
    /// depend on it.
    ///
    /// # Errors
    ///
    /// Returns an error if the store operation fails.
    async fn list_all(&self, table: &str) -> Result<Vec<Document>>;

    /// Insert a document, returning it with the assigned internal id
    /// attached
    ///
    /// # Errors
    ///
    /// Returns an error if the store operation fails.
    async fn insert(&self, table: &str, doc: Document) -> Result<Document>;

    /// Merge fields into the document at `internal_id`, returning the
    /// updated document
    ///
    /// # Errors
    ///
    /// Returns an error if no document holds `internal_id` or the store
    /// operation fails.
    async fn patch(&self, table: &str, internal_id: &str, patch: Document) -> Result<Document>;

    /// Delete the document at `internal_id`
    ///
    /// # Errors
    ///
    /// Returns an error if no document holds `internal_id` or the store
    /// operation fails.
    async fn remove(&self, table: &str, internal_id: &str) -> Result<()>;
}
