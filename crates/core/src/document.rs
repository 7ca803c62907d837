//! Document type: the schemaless unit of storage
//!
//! A `Document` is an ordered map from field name to [`Value`]. Two field
//! names are reserved:
//!
//! - [`INTERNAL_ID_FIELD`] (`_id`) - assigned by the store on insert,
//!   addresses the document in `patch`/`remove` calls, and is stripped by
//!   the normalizer before a document crosses back to the adapter-facing
//!   side.
//! - [`ID_FIELD`] (`id`) - the stable, caller-visible identifier. After
//!   normalization every adapter-facing document carries exactly one `id`
//!   holding a non-empty string.
//!
//! The map is a `BTreeMap` so iteration order, serialization, and test
//! assertions are deterministic regardless of insertion order.

use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Field name of the store-assigned internal identifier
pub const INTERNAL_ID_FIELD: &str = "_id";

/// Field name of the caller-visible external identifier
pub const ID_FIELD: &str = "id";

/// A schemaless document: an ordered field-name to value map
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    fields: BTreeMap<String, Value>,
}

impl Document {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True if the document has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Get a field value
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Get a field value, resolving a missing field to the absent sentinel
    pub fn get_or_null(&self, field: &str) -> Value {
        self.fields.get(field).cloned().unwrap_or(Value::Null)
    }

    /// True if the field is present
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Set a field value, returning the previous value if any
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(field.into(), value.into())
    }

    /// Remove a field, returning its value if it was present
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.fields.remove(field)
    }

    /// Merge every field of `patch` into this document, overwriting on
    /// collision
    pub fn merge(&mut self, patch: &Document) {
        for (k, v) in patch.iter() {
            self.fields.insert(k.clone(), v.clone());
        }
    }

    /// The store-assigned internal identifier, if present
    pub fn internal_id(&self) -> Option<&str> {
        self.get(INTERNAL_ID_FIELD).and_then(Value::as_str)
    }

    /// The caller-visible external identifier, if present
    pub fn external_id(&self) -> Option<&str> {
        self.get(ID_FIELD).and_then(Value::as_str)
    }

    /// Iterate over fields in name order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }
}

impl FromIterator<(String, Value)> for Document {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Document {
    type Item = (String, Value);
    type IntoIter = std::collections::btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl From<serde_json::Value> for Document {
    /// Build a document from a JSON object; non-object inputs produce an
    /// empty document.
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Object(obj) => obj
                .into_iter()
                .map(|(k, v)| (k, Value::from(v)))
                .collect(),
            _ => Document::new(),
        }
    }
}
