//! Filter evaluation against stored documents
//!
//! A full-scan predicate: the store offers no query planner, so every
//! clause is evaluated in adapter memory against every document -
//! O(documents x clauses) by design.
//!
//! The stored document is normalized first, so filters are written against
//! adapter-facing types (dates compare with dates). Date/time values on
//! either side of a comparison reduce to their epoch milliseconds before
//! the operator applies.
//!
//! Clause results combine strictly left-to-right: the accumulator starts
//! true under an implicit leading AND, and the connector recorded on clause
//! *i* joins clause *i+1* into the accumulator. There is no precedence
//! grouping.

use crate::normalize::from_storage;
use authstore_core::{Clause, CompareOp, Connector, Document, ModelRegistry, Value};
use std::cmp::Ordering;

/// Evaluate a filter expression against a stored document
///
/// An empty filter matches every document (vacuous truth).
pub fn matches(
    registry: &ModelRegistry,
    model: &str,
    stored: &Document,
    filter: &[Clause],
) -> bool {
    if filter.is_empty() {
        return true;
    }

    let doc = from_storage(registry, model, stored.clone());

    let mut acc = true;
    let mut connector = Connector::And;
    for clause in filter {
        let field_value = reduce(doc.get_or_null(&clause.field));
        let compare_value = reduce(clause.value.clone());
        let result = compare(&field_value, clause.op, &compare_value);
        acc = match connector {
            Connector::And => acc && result,
            Connector::Or => acc || result,
        };
        connector = clause.connector;
    }
    acc
}

/// Reduce date/time values to epoch milliseconds before comparison
///
/// Array elements reduce too, so membership tests work against arrays of
/// dates.
fn reduce(value: Value) -> Value {
    match value {
        Value::DateTime(dt) => Value::Int(dt.timestamp_millis()),
        Value::Array(items) => Value::Array(items.into_iter().map(reduce).collect()),
        v => v,
    }
}

/// Typed ordering of two values
///
/// Defined only for number/number and string/string pairings; everything
/// else is unordered. NaN on either side is unordered.
fn ordered(field: &Value, value: &Value) -> Option<Ordering> {
    match (field, value) {
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (a, b) if a.is_number() && b.is_number() => a.as_f64()?.partial_cmp(&b.as_f64()?),
        _ => None,
    }
}

/// Apply one comparison operator
///
/// Callers are expected to have reduced both operands via [`reduce`].
pub(crate) fn compare(field: &Value, op: CompareOp, value: &Value) -> bool {
    match op {
        // Unrecognized operators degrade to strict equality.
        CompareOp::Eq | CompareOp::Unknown => field == value,
        // Absent never satisfies not-equals.
        CompareOp::Ne => !field.is_null() && !value.is_null() && field != value,
        CompareOp::Lt => matches!(ordered(field, value), Some(Ordering::Less)),
        CompareOp::Lte => matches!(
            ordered(field, value),
            Some(Ordering::Less | Ordering::Equal)
        ),
        CompareOp::Gt => matches!(ordered(field, value), Some(Ordering::Greater)),
        CompareOp::Gte => matches!(
            ordered(field, value),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        CompareOp::In => value
            .as_array()
            .is_some_and(|items| items.iter().any(|item| item == field)),
        // Fails open: a non-array comparison value satisfies not-in.
        CompareOp::NotIn => value
            .as_array()
            .map_or(true, |items| !items.iter().any(|item| item == field)),
        CompareOp::Contains => match (field, value) {
            (Value::String(s), Value::String(sub)) => s.contains(sub.as_str()),
            _ => false,
        },
        CompareOp::StartsWith => match (field, value) {
            (Value::String(s), Value::String(prefix)) => s.starts_with(prefix.as_str()),
            _ => false,
        },
        CompareOp::EndsWith => match (field, value) {
            (Value::String(s), Value::String(suffix)) => s.ends_with(suffix.as_str()),
            _ => false,
        },
    }
}
