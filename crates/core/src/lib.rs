//! Core types and traits for the authstore adapter
//!
//! This crate defines the foundational types used throughout the workspace:
//! - Value: unified value enum for all document field types
//! - Document: the schemaless field map, with reserved id fields
//! - Filter types: CompareOp, Connector, Clause, SortBy, FindOptions
//! - ModelRegistry: per-entity temporal field sets and table mapping
//! - DocumentStore: the external store collaborator contract
//! - Error: error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod error;
pub mod filter;
pub mod model;
pub mod traits;
pub mod value;

// Re-export commonly used types and traits
pub use document::{Document, ID_FIELD, INTERNAL_ID_FIELD};
pub use error::{Error, Result};
pub use filter::{Clause, CompareOp, Connector, FindOptions, SortBy, SortDirection};
pub use model::{ModelRegistry, ModelSchema, DEFAULT_TEMPORAL_FIELDS};
pub use traits::DocumentStore;
pub use value::Value;
