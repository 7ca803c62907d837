//! Authstore - document-store persistence adapter for authentication
//! workloads
//!
//! Authstore implements the generic persistence contract expected by
//! authentication/object-modeling libraries (create, findOne, findMany,
//! count, update, updateMany, delete, deleteMany, transaction) on top of a
//! schemaless document-table store addressed only by table name.
//!
//! # Quick Start
//!
//! ```ignore
//! use authstore::{Clause, Document, DocumentAdapter, MemoryStore};
//! use std::sync::Arc;
//!
//! let adapter = DocumentAdapter::new(Arc::new(MemoryStore::new()));
//!
//! let mut session = Document::new();
//! session.insert("status", "active");
//! session.insert("expiresAt", chrono::Utc::now() + chrono::Duration::hours(1));
//! let created = adapter.create("session", session).await?;
//!
//! let found = adapter
//!     .find_one("session", &[Clause::eq("status", "active")])
//!     .await?;
//! ```
//!
//! # Architecture
//!
//! The adapter is a stateless facade over a [`DocumentStore`]: every
//! operation fetches the full table and applies filtering, ordering, and
//! pagination in memory. Temporal fields are numeric epoch milliseconds in
//! storage and `DateTime` values adapter-side; the
//! [`ModelRegistry`] decides which fields convert, per model.

// Re-export the public API from the member crates
pub use authstore_adapter::{AdapterOps, DocumentAdapter};
pub use authstore_core::{
    Clause, CompareOp, Connector, Document, DocumentStore, Error, FindOptions, ModelRegistry,
    ModelSchema, Result, SortBy, SortDirection, Value, ID_FIELD, INTERNAL_ID_FIELD,
};
pub use authstore_storage::MemoryStore;
