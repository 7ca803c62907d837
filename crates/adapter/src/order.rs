//! Sorting and pagination helpers
//!
//! The store has no native order, so ordering happens here, after
//! filtering and before pagination. Sorting is stable: equal keys keep
//! their relative input order.
//!
//! Pagination reproduces the contract's falsy-offset quirk: an offset of
//! zero behaves exactly like no offset. Callers must match this behavior,
//! not "fix" it.

use crate::normalize::from_storage;
use authstore_core::{Document, ModelRegistry, SortBy, SortDirection, Value};
use std::cmp::Ordering;

/// Sort key: the reduced field value under a deterministic total order
///
/// Null (and missing) sorts before every defined value; the direction
/// factor is applied after, so descending puts nulls last. Cross-type
/// pairings order by variant rank, keeping the sort total where the source
/// contract leaves it engine-defined.
#[derive(Debug, Clone)]
enum SortKey {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Other,
}

impl SortKey {
    fn rank(&self) -> u8 {
        match self {
            SortKey::Null => 0,
            SortKey::Bool(_) => 1,
            SortKey::Number(_) => 2,
            SortKey::String(_) => 3,
            SortKey::Other => 4,
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Bool(a), SortKey::Bool(b)) => a.cmp(b),
            (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(b),
            (SortKey::String(a), SortKey::String(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

fn sort_key(registry: &ModelRegistry, model: &str, doc: &Document, field: &str) -> SortKey {
    let normalized = from_storage(registry, model, doc.clone());
    match normalized.get_or_null(field) {
        Value::Null => SortKey::Null,
        Value::Bool(b) => SortKey::Bool(b),
        Value::Int(i) => SortKey::Number(i as f64),
        Value::Float(f) => SortKey::Number(f),
        Value::DateTime(dt) => SortKey::Number(dt.timestamp_millis() as f64),
        Value::String(s) => SortKey::String(s),
        Value::Array(_) | Value::Object(_) => SortKey::Other,
    }
}

/// Order stored documents by a field
///
/// With no sort spec the input order is preserved. Date-like values order
/// by their epoch milliseconds.
pub fn sort(
    registry: &ModelRegistry,
    model: &str,
    docs: Vec<Document>,
    sort_by: Option<&SortBy>,
) -> Vec<Document> {
    let Some(spec) = sort_by else {
        return docs;
    };

    let mut keyed: Vec<(SortKey, Document)> = docs
        .into_iter()
        .map(|doc| (sort_key(registry, model, &doc, &spec.field), doc))
        .collect();

    // Vec::sort_by is stable, so equal keys keep input order.
    keyed.sort_by(|(a, _), (b, _)| {
        let ord = a.compare(b);
        match spec.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });

    keyed.into_iter().map(|(_, doc)| doc).collect()
}

/// Slice a result set by offset, then limit
///
/// An offset of zero is treated as "no offset" (falsy-check quirk,
/// reproduced deliberately). Limit truncates after the offset is applied.
pub fn paginate(docs: Vec<Document>, offset: Option<usize>, limit: Option<usize>) -> Vec<Document> {
    let mut docs = match offset {
        Some(skip) if skip > 0 => docs.into_iter().skip(skip).collect(),
        _ => docs,
    };
    if let Some(limit) = limit {
        docs.truncate(limit);
    }
    docs
}
