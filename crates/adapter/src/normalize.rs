//! Field normalization across the storage boundary
//!
//! Normalization is a pure function applied at every read/write boundary,
//! never persisted as a side effect. No document ever exists partially
//! normalized.
//!
//! Going in ([`to_storage`]): absent fields are dropped, the external id is
//! passed through or synthesized, and temporal fields are encoded to epoch
//! milliseconds. Coming out ([`from_storage`]): the internal id is
//! stripped, numeric temporal fields decode back to date/time values, and
//! an external id is guaranteed present.
//!
//! Unparseable date strings encode to a NaN timestamp and stay numeric on
//! the way back out; every ordered comparison against NaN is false, so
//! such documents silently drop out of date-range filters.

use authstore_core::{Document, ModelRegistry, Value, ID_FIELD, INTERNAL_ID_FIELD};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use uuid::Uuid;

/// Synthesize a fresh external identifier (random hex token)
pub fn generate_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Parse a date string to epoch milliseconds, NaN when unparseable
///
/// Accepts RFC 3339, a naive datetime (taken as UTC), or a bare date
/// (taken as midnight UTC).
fn parse_date_millis(s: &str) -> f64 {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return dt.timestamp_millis() as f64;
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return naive.and_utc().timestamp_millis() as f64;
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_time(NaiveTime::MIN).and_utc().timestamp_millis() as f64;
    }
    f64::NAN
}

/// Encode one temporal field value for storage
fn encode_temporal(value: Value) -> Value {
    match value {
        Value::DateTime(dt) => Value::Int(dt.timestamp_millis()),
        v @ (Value::Int(_) | Value::Float(_)) => v,
        Value::String(s) => {
            let millis = parse_date_millis(&s);
            if millis.is_nan() {
                Value::Float(f64::NAN)
            } else {
                Value::Int(millis as i64)
            }
        }
        v => v,
    }
}

/// Decode one stored temporal field value
///
/// Non-finite or out-of-range numerics pass through unchanged; so does
/// every non-numeric value.
fn decode_temporal(value: Value) -> Value {
    match value {
        Value::Int(millis) => DateTime::<Utc>::from_timestamp_millis(millis)
            .map_or(Value::Int(millis), Value::DateTime),
        Value::Float(f) if f.is_finite() => DateTime::<Utc>::from_timestamp_millis(f as i64)
            .map_or(Value::Float(f), Value::DateTime),
        v => v,
    }
}

/// Normalize an adapter-facing record into storage form
///
/// - Fields holding the absent sentinel are never written.
/// - The external id passes through when it is a non-empty string; any
///   other value (or no value at all) is replaced by a fresh random
///   identifier, so every stored document has a usable id.
/// - Temporal fields of `model` are encoded to epoch milliseconds; all
///   other fields pass through unmodified.
pub fn to_storage(registry: &ModelRegistry, model: &str, record: Document) -> Document {
    let mut out = Document::new();
    for (field, value) in record {
        if value.is_null() {
            continue;
        }
        if field == ID_FIELD {
            let id = match value {
                Value::String(s) if !s.is_empty() => s,
                _ => generate_id(),
            };
            out.insert(ID_FIELD, Value::String(id));
            continue;
        }
        let value = if registry.is_temporal(model, &field) {
            encode_temporal(value)
        } else {
            value
        };
        out.insert(field, value);
    }
    if !out.contains(ID_FIELD) {
        out.insert(ID_FIELD, Value::String(generate_id()));
    }
    out
}

/// Normalize a stored document into its adapter-facing form
///
/// - The store's internal identifier is dropped, never exposed.
/// - Numeric temporal fields decode to date/time values.
/// - An external id is guaranteed present; a stored document without one
///   gets a synthesized id as a defensive fallback.
pub fn from_storage(registry: &ModelRegistry, model: &str, stored: Document) -> Document {
    let mut out = Document::new();
    for (field, value) in stored {
        if field == INTERNAL_ID_FIELD {
            continue;
        }
        let value = if registry.is_temporal(model, &field) {
            decode_temporal(value)
        } else {
            value
        };
        out.insert(field, value);
    }
    if !out.contains(ID_FIELD) {
        out.insert(ID_FIELD, Value::String(generate_id()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    fn registry() -> ModelRegistry {
        ModelRegistry::default()
    }

    #[test]
    fn id_passes_through_when_usable() {
        let mut record = Document::new();
        record.insert("id", "user-42");
        let stored = to_storage(&registry(), "user", record);
        assert_eq!(stored.external_id(), Some("user-42"));
    }

    #[test]
    fn id_synthesized_when_missing_empty_or_non_string() {
        let stored = to_storage(&registry(), "user", Document::new());
        let id = stored.external_id().unwrap();
        assert!(!id.is_empty());

        let mut record = Document::new();
        record.insert("id", "");
        let stored = to_storage(&registry(), "user", record);
        assert!(!stored.external_id().unwrap().is_empty());

        let mut record = Document::new();
        record.insert("id", 42i64);
        let stored = to_storage(&registry(), "user", record);
        assert!(stored.external_id().is_some());
    }

    #[test]
    fn synthesized_ids_differ() {
        let a = to_storage(&registry(), "user", Document::new());
        let b = to_storage(&registry(), "user", Document::new());
        assert_ne!(a.external_id(), b.external_id());
    }

    #[test]
    fn null_fields_are_never_written() {
        let mut record = Document::new();
        record.insert("email", "a@example.com");
        record.insert("image", Value::Null);
        let stored = to_storage(&registry(), "user", record);
        assert!(!stored.contains("image"));
        assert!(stored.contains("email"));
    }

    #[test]
    fn datetime_encodes_to_epoch_millis() {
        let dt = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let mut record = Document::new();
        record.insert("createdAt", dt);
        let stored = to_storage(&registry(), "session", record);
        assert_eq!(stored.get("createdAt"), Some(&Value::Int(1_700_000_000_000)));
    }

    #[test]
    fn numeric_temporal_passes_through_on_write() {
        let mut record = Document::new();
        record.insert("createdAt", 1_700_000_000_000i64);
        let stored = to_storage(&registry(), "session", record);
        assert_eq!(stored.get("createdAt"), Some(&Value::Int(1_700_000_000_000)));
    }

    #[test]
    fn date_string_encodes_to_millis() {
        let mut record = Document::new();
        record.insert("expiresAt", "2024-01-15T10:00:00Z");
        let stored = to_storage(&registry(), "session", record);
        let dt = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();
        assert_eq!(
            stored.get("expiresAt"),
            Some(&Value::Int(dt.timestamp_millis()))
        );

        let mut record = Document::new();
        record.insert("expiresAt", "2024-01-15");
        let stored = to_storage(&registry(), "session", record);
        let midnight = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        assert_eq!(
            stored.get("expiresAt"),
            Some(&Value::Int(midnight.timestamp_millis()))
        );
    }

    #[test]
    fn invalid_date_string_encodes_to_nan() {
        let mut record = Document::new();
        record.insert("expiresAt", "not a date");
        let stored = to_storage(&registry(), "session", record);
        match stored.get("expiresAt") {
            Some(Value::Float(f)) => assert!(f.is_nan()),
            other => panic!("expected NaN float, got {:?}", other),
        }
    }

    #[test]
    fn non_temporal_fields_pass_through_regardless_of_type() {
        let dt = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let mut record = Document::new();
        record.insert("note", dt);
        let stored = to_storage(&registry(), "user", record);
        // "note" is not temporal for user, so the DateTime is kept as-is
        assert_eq!(stored.get("note"), Some(&Value::DateTime(dt)));
    }

    #[test]
    fn from_storage_drops_internal_id() {
        let mut stored = Document::new();
        stored.insert(INTERNAL_ID_FIELD, "k1");
        stored.insert("id", "user-1");
        let record = from_storage(&registry(), "user", stored);
        assert!(!record.contains(INTERNAL_ID_FIELD));
        assert_eq!(record.external_id(), Some("user-1"));
    }

    #[test]
    fn from_storage_decodes_numeric_temporal() {
        let mut stored = Document::new();
        stored.insert("id", "s1");
        stored.insert("expiresAt", 1_700_000_000_000i64);
        let record = from_storage(&registry(), "session", stored);
        let expected = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        assert_eq!(record.get("expiresAt"), Some(&Value::DateTime(expected)));
    }

    #[test]
    fn from_storage_leaves_nan_numeric() {
        let mut stored = Document::new();
        stored.insert("id", "s1");
        stored.insert("expiresAt", f64::NAN);
        let record = from_storage(&registry(), "session", stored);
        match record.get("expiresAt") {
            Some(Value::Float(f)) => assert!(f.is_nan()),
            other => panic!("expected NaN passthrough, got {:?}", other),
        }
    }

    #[test]
    fn from_storage_synthesizes_missing_id() {
        let mut stored = Document::new();
        stored.insert(INTERNAL_ID_FIELD, "k1");
        stored.insert("email", "a@example.com");
        let record = from_storage(&registry(), "user", stored);
        assert!(!record.external_id().unwrap().is_empty());
    }

    proptest! {
        // Round-trip: every temporal field of every built-in model comes
        // back as an equal DateTime for any representable epoch.
        #[test]
        fn temporal_round_trip(millis in -30_610_224_000_000i64..=32_503_680_000_000i64) {
            let registry = registry();
            let dt = Utc.timestamp_millis_opt(millis).unwrap();
            for model in ["user", "session", "account", "verification", "invitation"] {
                for field in registry.temporal_fields(model).to_vec() {
                    let mut record = Document::new();
                    record.insert(field.as_str(), dt);
                    let stored = to_storage(&registry, model, record);
                    let back = from_storage(&registry, model, stored);
                    prop_assert_eq!(back.get(&field), Some(&Value::DateTime(dt)));
                }
            }
        }

        // Non-temporal fields survive the round trip bit-for-bit.
        #[test]
        fn non_temporal_round_trip(n in any::<i64>(), s in "\\PC*") {
            let registry = registry();
            let mut record = Document::new();
            record.insert("id", "fixed");
            record.insert("count", n);
            record.insert("label", s.clone());
            let back = from_storage(&registry, "user", to_storage(&registry, "user", record));
            prop_assert_eq!(back.get("count"), Some(&Value::Int(n)));
            prop_assert_eq!(back.get("label"), Some(&Value::String(s)));
        }
    }
}
