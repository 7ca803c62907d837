//! Adapter operations: the persistence contract over a document store
//!
//! ## Design
//!
//! [`AdapterOps`] is a stateless facade: it holds only an
//! `Arc<dyn DocumentStore>` and an `Arc<ModelRegistry>`. No cache, no
//! local state between invocations. Every operation fetches the entire
//! table (`list_all` is the only read primitive) and applies filtering,
//! ordering, and pagination in memory. This is O(table size) per call - a
//! deliberate simplicity tradeoff appropriate for the small auth
//! bookkeeping tables this adapter serves.
//!
//! [`DocumentAdapter`] adds the `transaction` entry point on top. The
//! callback receives an [`AdapterOps`] - a scope with the same eight
//! operations but no `transaction`, so nesting is unrepresentable. The
//! pass-through is non-transactional: no atomicity, isolation, or
//! rollback; it exists to satisfy the calling library's interface shape.
//!
//! ## Concurrency
//!
//! Bulk mutations run as a sequential awaited loop, one store round trip
//! per matched document. Two callers racing on the same filtered set may
//! interleave arbitrarily; the adapter offers last-writer-wins only.
//! Store-level failures propagate unchanged - no retry, no suppression.

use crate::eval::matches;
use crate::normalize::{from_storage, to_storage};
use crate::order::{paginate, sort};
use authstore_core::{
    Clause, Document, DocumentStore, Error, FindOptions, ModelRegistry, Result, ID_FIELD,
};
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

/// The eight persistence operations, minus `transaction`
///
/// Cloning is cheap (two `Arc`s); `transaction` callbacks receive a clone
/// of this scope.
#[derive(Clone)]
pub struct AdapterOps {
    store: Arc<dyn DocumentStore>,
    registry: Arc<ModelRegistry>,
}

impl AdapterOps {
    fn new(store: Arc<dyn DocumentStore>, registry: Arc<ModelRegistry>) -> Self {
        Self { store, registry }
    }

    /// The registry this scope resolves models against
    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Fetch the full table for `model` and keep the documents matching
    /// `filter`, in store order
    async fn fetch_matches(&self, model: &str, filter: &[Clause]) -> Result<Vec<Document>> {
        let table = self.registry.table(model);
        let docs = self.store.list_all(table).await?;
        Ok(docs
            .into_iter()
            .filter(|doc| matches(&self.registry, model, doc, filter))
            .collect())
    }

    fn internal_id_of<'a>(&self, model: &str, doc: &'a Document) -> Result<&'a str> {
        doc.internal_id().ok_or_else(|| {
            Error::InvalidDocument(format!(
                "document in table {} has no internal id",
                self.registry.table(model)
            ))
        })
    }

    /// Insert a record, returning its adapter-facing view
    pub async fn create(&self, model: &str, data: Document) -> Result<Document> {
        let table = self.registry.table(model);
        let stored = to_storage(&self.registry, model, data);
        let inserted = self.store.insert(table, stored).await?;
        debug!(target: "authstore::adapter", model, "create");
        Ok(from_storage(&self.registry, model, inserted))
    }

    /// Return the first document matching `filter`, or None
    pub async fn find_one(&self, model: &str, filter: &[Clause]) -> Result<Option<Document>> {
        let matched = self.fetch_matches(model, filter).await?;
        debug!(target: "authstore::adapter", model, matched = matched.len(), "find_one");
        Ok(matched
            .into_iter()
            .next()
            .map(|doc| from_storage(&self.registry, model, doc)))
    }

    /// Return every document matching `filter`, ordered and paginated per
    /// `options`
    pub async fn find_many(
        &self,
        model: &str,
        filter: &[Clause],
        options: &FindOptions,
    ) -> Result<Vec<Document>> {
        let matched = self.fetch_matches(model, filter).await?;
        debug!(target: "authstore::adapter", model, matched = matched.len(), "find_many");
        let ordered = sort(&self.registry, model, matched, options.sort_by.as_ref());
        let page = paginate(ordered, options.offset, options.limit);
        Ok(page
            .into_iter()
            .map(|doc| from_storage(&self.registry, model, doc))
            .collect())
    }

    /// Count the documents matching `filter` (no pagination applies)
    pub async fn count(&self, model: &str, filter: &[Clause]) -> Result<usize> {
        let matched = self.fetch_matches(model, filter).await?;
        debug!(target: "authstore::adapter", model, matched = matched.len(), "count");
        Ok(matched.len())
    }

    /// Apply `patch` to every document matching `filter`
    ///
    /// Returns the first matched document merged with the patch in memory
    /// (not a re-fetch), or None when nothing matched. The patch's `id`
    /// field, if any, is stripped: identity is immutable.
    pub async fn update(
        &self,
        model: &str,
        filter: &[Clause],
        patch: Document,
    ) -> Result<Option<Document>> {
        let matched = self.fetch_matches(model, filter).await?;
        debug!(target: "authstore::adapter", model, matched = matched.len(), "update");
        if matched.is_empty() {
            return Ok(None);
        }

        let mut stored_patch = to_storage(&self.registry, model, patch);
        stored_patch.remove(ID_FIELD);

        let table = self.registry.table(model);
        for doc in &matched {
            let internal_id = self.internal_id_of(model, doc)?;
            self.store
                .patch(table, internal_id, stored_patch.clone())
                .await?;
        }

        let Some(mut merged) = matched.into_iter().next() else {
            return Ok(None);
        };
        merged.merge(&stored_patch);
        Ok(Some(from_storage(&self.registry, model, merged)))
    }

    /// Apply `patch` to every document matching `filter`, returning the
    /// match count
    pub async fn update_many(
        &self,
        model: &str,
        filter: &[Clause],
        patch: Document,
    ) -> Result<usize> {
        let matched = self.fetch_matches(model, filter).await?;
        debug!(target: "authstore::adapter", model, matched = matched.len(), "update_many");
        if matched.is_empty() {
            return Ok(0);
        }

        let mut stored_patch = to_storage(&self.registry, model, patch);
        stored_patch.remove(ID_FIELD);

        let table = self.registry.table(model);
        for doc in &matched {
            let internal_id = self.internal_id_of(model, doc)?;
            self.store
                .patch(table, internal_id, stored_patch.clone())
                .await?;
        }
        Ok(matched.len())
    }

    /// Delete every document matching `filter`; no-op on zero matches
    pub async fn delete(&self, model: &str, filter: &[Clause]) -> Result<()> {
        self.delete_many(model, filter).await.map(|_| ())
    }

    /// Delete every document matching `filter`, returning the deleted
    /// count
    pub async fn delete_many(&self, model: &str, filter: &[Clause]) -> Result<usize> {
        let matched = self.fetch_matches(model, filter).await?;
        debug!(target: "authstore::adapter", model, matched = matched.len(), "delete_many");
        let table = self.registry.table(model);
        for doc in &matched {
            let internal_id = self.internal_id_of(model, doc)?;
            self.store.remove(table, internal_id).await?;
        }
        Ok(matched.len())
    }
}

/// Persistence adapter: the eight operations plus `transaction`
///
/// Stateless facade over an external [`DocumentStore`]; safe to clone and
/// share across tasks.
///
/// # Example
///
/// ```ignore
/// let adapter = DocumentAdapter::new(Arc::new(MemoryStore::new()));
///
/// let mut session = Document::new();
/// session.insert("status", "active");
/// session.insert("expiresAt", Utc::now() + Duration::hours(1));
/// adapter.create("session", session).await?;
///
/// let found = adapter
///     .find_one("session", &[Clause::eq("status", "active")])
///     .await?;
/// ```
#[derive(Clone)]
pub struct DocumentAdapter {
    ops: AdapterOps,
}

impl DocumentAdapter {
    /// Build an adapter over `store` with the built-in model registry
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self::with_registry(store, ModelRegistry::default())
    }

    /// Build an adapter over `store` with a custom model registry
    pub fn with_registry(store: Arc<dyn DocumentStore>, registry: ModelRegistry) -> Self {
        Self {
            ops: AdapterOps::new(store, Arc::new(registry)),
        }
    }

    /// Insert a record, returning its adapter-facing view
    pub async fn create(&self, model: &str, data: Document) -> Result<Document> {
        self.ops.create(model, data).await
    }

    /// Return the first document matching `filter`, or None
    pub async fn find_one(&self, model: &str, filter: &[Clause]) -> Result<Option<Document>> {
        self.ops.find_one(model, filter).await
    }

    /// Return every document matching `filter`, ordered and paginated per
    /// `options`
    pub async fn find_many(
        &self,
        model: &str,
        filter: &[Clause],
        options: &FindOptions,
    ) -> Result<Vec<Document>> {
        self.ops.find_many(model, filter, options).await
    }

    /// Count the documents matching `filter`
    pub async fn count(&self, model: &str, filter: &[Clause]) -> Result<usize> {
        self.ops.count(model, filter).await
    }

    /// Patch every match; return the first match's merged view
    pub async fn update(
        &self,
        model: &str,
        filter: &[Clause],
        patch: Document,
    ) -> Result<Option<Document>> {
        self.ops.update(model, filter, patch).await
    }

    /// Patch every match; return the match count
    pub async fn update_many(
        &self,
        model: &str,
        filter: &[Clause],
        patch: Document,
    ) -> Result<usize> {
        self.ops.update_many(model, filter, patch).await
    }

    /// Delete every match
    pub async fn delete(&self, model: &str, filter: &[Clause]) -> Result<()> {
        self.ops.delete(model, filter).await
    }

    /// Delete every match; return the deleted count
    pub async fn delete_many(&self, model: &str, filter: &[Clause]) -> Result<usize> {
        self.ops.delete_many(model, filter).await
    }

    /// Run `f` against a scope exposing the eight operations but no
    /// `transaction`
    ///
    /// Non-transactional pass-through: operations inside the callback hit
    /// the store directly, effects are immediately visible, and an error
    /// from the callback rolls nothing back.
    pub async fn transaction<F, Fut, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(AdapterOps) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        debug!(target: "authstore::adapter", "transaction");
        f(self.ops.clone()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use authstore_core::{ModelSchema, SortBy, Value};
    use authstore_storage::MemoryStore;
    use chrono::{Duration, TimeZone, Utc};

    fn adapter() -> DocumentAdapter {
        DocumentAdapter::new(Arc::new(MemoryStore::new()))
    }

    fn user(name: &str, age: i64) -> Document {
        let mut doc = Document::new();
        doc.insert("name", name);
        doc.insert("age", age);
        doc
    }

    #[tokio::test]
    async fn create_returns_adapter_facing_view() {
        let adapter = adapter();
        let created = adapter.create("user", user("alice", 30)).await.unwrap();

        assert!(created.internal_id().is_none());
        assert!(!created.external_id().unwrap().is_empty());
        assert_eq!(created.get_or_null("name"), Value::from("alice"));
    }

    #[tokio::test]
    async fn find_one_returns_first_match_or_none() {
        let adapter = adapter();
        adapter.create("user", user("alice", 30)).await.unwrap();
        adapter.create("user", user("bob", 30)).await.unwrap();

        let found = adapter
            .find_one("user", &[Clause::eq("age", 30i64)])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.get_or_null("name"), Value::from("alice"));

        let missing = adapter
            .find_one("user", &[Clause::eq("age", 99i64)])
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn find_many_filters_sorts_and_paginates() {
        let adapter = adapter();
        for (name, age) in [("carol", 35), ("alice", 30), ("dave", 40), ("bob", 25)] {
            adapter.create("user", user(name, age)).await.unwrap();
        }

        let options = FindOptions::default().sort(SortBy::asc("age")).offset(1).limit(2);
        let page = adapter
            .find_many("user", &[Clause::gte("age", 30i64)], &options)
            .await
            .unwrap();

        let names: Vec<_> = page.iter().map(|d| d.get_or_null("name")).collect();
        assert_eq!(names, vec![Value::from("carol"), Value::from("dave")]);
    }

    #[tokio::test]
    async fn count_ignores_pagination() {
        let adapter = adapter();
        for i in 0..5 {
            adapter.create("user", user("u", i)).await.unwrap();
        }
        let n = adapter
            .count("user", &[Clause::gte("age", 2i64)])
            .await
            .unwrap();
        assert_eq!(n, 3);

        let all = adapter.count("user", &[]).await.unwrap();
        assert_eq!(all, 5);
    }

    #[tokio::test]
    async fn update_patches_all_matches_returns_first_merged() {
        let adapter = adapter();
        for name in ["a", "b", "c"] {
            adapter.create("user", user(name, 30)).await.unwrap();
        }
        adapter.create("user", user("d", 99)).await.unwrap();

        let mut patch = Document::new();
        patch.insert("age", 31i64);
        let updated = adapter
            .update("user", &[Clause::eq("age", 30i64)], patch)
            .await
            .unwrap()
            .unwrap();

        // First match, post-patch view.
        assert_eq!(updated.get_or_null("name"), Value::from("a"));
        assert_eq!(updated.get_or_null("age"), Value::Int(31));

        // All three were patched in the store.
        let still_30 = adapter.count("user", &[Clause::eq("age", 30i64)]).await.unwrap();
        assert_eq!(still_30, 0);
        let now_31 = adapter.count("user", &[Clause::eq("age", 31i64)]).await.unwrap();
        assert_eq!(now_31, 3);
    }

    #[tokio::test]
    async fn update_with_no_matches_returns_none() {
        let adapter = adapter();
        adapter.create("user", user("a", 30)).await.unwrap();

        let mut patch = Document::new();
        patch.insert("age", 31i64);
        let updated = adapter
            .update("user", &[Clause::eq("age", 99i64)], patch)
            .await
            .unwrap();
        assert!(updated.is_none());
    }

    #[tokio::test]
    async fn update_strips_id_from_patch() {
        let adapter = adapter();
        let created = adapter.create("user", user("a", 30)).await.unwrap();
        let original_id = created.external_id().unwrap().to_string();

        let mut patch = Document::new();
        patch.insert("id", "hijacked");
        patch.insert("age", 31i64);
        adapter
            .update("user", &[Clause::eq("age", 30i64)], patch)
            .await
            .unwrap();

        let after = adapter
            .find_one("user", &[Clause::eq("age", 31i64)])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(after.external_id(), Some(original_id.as_str()));
    }

    #[tokio::test]
    async fn update_many_returns_match_count() {
        let adapter = adapter();
        for name in ["a", "b", "c"] {
            adapter.create("user", user(name, 30)).await.unwrap();
        }

        let mut patch = Document::new();
        patch.insert("age", 31i64);
        let n = adapter
            .update_many("user", &[Clause::eq("age", 30i64)], patch)
            .await
            .unwrap();
        assert_eq!(n, 3);

        let mut patch = Document::new();
        patch.insert("age", 50i64);
        let n = adapter
            .update_many("user", &[Clause::eq("age", 99i64)], patch)
            .await
            .unwrap();
        assert_eq!(n, 0);
    }

    #[tokio::test]
    async fn delete_and_delete_many() {
        let adapter = adapter();
        for i in 0..4 {
            adapter.create("user", user("u", i)).await.unwrap();
        }

        adapter
            .delete("user", &[Clause::eq("age", 0i64)])
            .await
            .unwrap();
        assert_eq!(adapter.count("user", &[]).await.unwrap(), 3);

        // Deleting nothing is a no-op, not an error.
        adapter
            .delete("user", &[Clause::eq("age", 99i64)])
            .await
            .unwrap();

        let n = adapter
            .delete_many("user", &[Clause::gte("age", 2i64)])
            .await
            .unwrap();
        assert_eq!(n, 2);
        assert_eq!(adapter.count("user", &[]).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn transaction_is_a_passthrough_scope() {
        let adapter = adapter();
        let count = adapter
            .transaction(|ops| async move {
                ops.create("user", user("alice", 30)).await?;
                ops.create("user", user("bob", 31)).await?;
                ops.count("user", &[]).await
            })
            .await
            .unwrap();
        assert_eq!(count, 2);

        // Effects visible outside; a failing callback rolled nothing back.
        let result: Result<()> = adapter
            .transaction(|ops| async move {
                ops.create("user", user("carol", 32)).await?;
                Err(Error::Backend("boom".into()))
            })
            .await;
        assert!(result.is_err());
        assert_eq!(adapter.count("user", &[]).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn temporal_fields_survive_create_then_find() {
        let adapter = adapter();
        let expires = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap() + Duration::hours(1);

        let mut session = Document::new();
        session.insert("status", "active");
        session.insert("expiresAt", expires);
        adapter.create("session", session).await.unwrap();

        let found = adapter
            .find_one("session", &[Clause::eq("status", "active")])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.get_or_null("expiresAt"), Value::DateTime(expires));
    }

    #[tokio::test]
    async fn model_table_remapping_is_respected() {
        let store = Arc::new(MemoryStore::new());
        let registry = ModelRegistry::default()
            .register(ModelSchema::new("session").table("auth_sessions"));
        let adapter = DocumentAdapter::with_registry(store.clone(), registry);

        let mut session = Document::new();
        session.insert("status", "active");
        adapter.create("session", session).await.unwrap();

        assert_eq!(store.table_len("auth_sessions"), 1);
        assert_eq!(store.table_len("session"), 0);
    }

    // Failure propagation: a store error surfaces unchanged.
    struct FailingStore;

    #[async_trait]
    impl DocumentStore for FailingStore {
        async fn list_all(&self, _table: &str) -> Result<Vec<Document>> {
            Err(Error::Backend("store unavailable".into()))
        }

        async fn insert(&self, _table: &str, _doc: Document) -> Result<Document> {
            Err(Error::Backend("store unavailable".into()))
        }

        async fn patch(
            &self,
            _table: &str,
            _internal_id: &str,
            _patch: Document,
        ) -> Result<Document> {
            Err(Error::Backend("store unavailable".into()))
        }

        async fn remove(&self, _table: &str, _internal_id: &str) -> Result<()> {
            Err(Error::Backend("store unavailable".into()))
        }
    }

    #[tokio::test]
    async fn store_failures_propagate_unchanged() {
        let adapter = DocumentAdapter::new(Arc::new(FailingStore));

        let err = adapter.create("user", Document::new()).await.unwrap_err();
        assert!(matches!(err, Error::Backend(_)));

        let err = adapter.find_one("user", &[]).await.unwrap_err();
        assert!(matches!(err, Error::Backend(_)));

        let err = adapter.count("user", &[]).await.unwrap_err();
        assert!(matches!(err, Error::Backend(_)));

        let err = adapter.delete_many("user", &[]).await.unwrap_err();
        assert!(matches!(err, Error::Backend(_)));
    }
}
