//! Store backends for the authstore adapter
//!
//! The production store is an external collaborator reached through the
//! [`DocumentStore`](authstore_core::DocumentStore) trait. This crate ships
//! the in-memory backend: the test double and the embedded default for
//! callers that want a self-contained store.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod memory;

pub use memory::MemoryStore;
