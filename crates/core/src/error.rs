//! Error types for the adapter and its store backends
//!
//! This module defines all error types used throughout the workspace.
//! We use `thiserror` for automatic `Display` and `Error` trait
//! implementations.
//!
//! Absence is never an error at the adapter layer: an unmatched filter
//! yields `None`, an empty vector, or a zero count depending on the
//! operation. The variants below describe store-level failures and
//! contract violations only.

use thiserror::Error;

/// Result type alias for adapter and store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for adapter and store operations
#[derive(Debug, Error)]
pub enum Error {
    /// Store backend failure (network, unavailable, internal fault).
    ///
    /// Propagated unchanged to the caller; no retry or backoff happens at
    /// this layer.
    #[error("storage backend error: {0}")]
    Backend(String),

    /// A store primitive was addressed with an internal id it does not hold.
    ///
    /// Raised by `patch`/`remove` implementations, never by adapter
    /// filter matching.
    #[error("document not found: {table}/{internal_id}")]
    DocumentNotFound {
        /// Table the lookup ran against
        table: String,
        /// Internal identifier that did not resolve
        internal_id: String,
    },

    /// A stored document violates the store contract (e.g. `list_all`
    /// returned a document without an internal id).
    #[error("invalid document: {0}")]
    InvalidDocument(String),

    /// Serialization/deserialization error at the serde boundary
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
