//! Persistence adapter over a schemaless document store
//!
//! This crate implements the generic persistence contract an
//! authentication/object-modeling library expects, on top of a store that
//! only knows how to list, insert, patch, and remove documents by table
//! name:
//!
//! - [`normalize`] - field normalization across the storage boundary
//!   (temporal encoding, id synthesis, absent-field dropping)
//! - [`eval`] - the full-scan filter evaluator
//! - [`order`] - sorting and pagination helpers
//! - [`ops`] - the adapter operations composing the above, plus the
//!   non-transactional `transaction` scope

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod eval;
pub mod normalize;
pub mod ops;
pub mod order;

pub use eval::matches;
pub use normalize::{from_storage, generate_id, to_storage};
pub use ops::{AdapterOps, DocumentAdapter};
pub use order::{paginate, sort};
