//! Model registry: per-entity temporal fields and table mapping
//!
//! A *model* is the logical entity name ("session", "user", ...) the
//! calling library addresses operations with. It is distinct from the
//! physical table name, although the two coincide by default.
//!
//! The registry is the single source of truth for which fields are
//! temporal: a temporal field is stored as numeric epoch milliseconds and
//! surfaces adapter-side as [`Value::DateTime`](crate::value::Value).
//! Fields not listed here pass through normalization unmodified regardless
//! of their runtime type. The set is static configuration, not runtime
//! reflection.
//!
//! Built-in models cover the auth bookkeeping tables this adapter serves;
//! unknown models fall back to `createdAt`/`updatedAt`.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Temporal fields assumed for models the registry does not know
pub const DEFAULT_TEMPORAL_FIELDS: &[&str] = &["createdAt", "updatedAt"];

/// Schema entry for one model: its table and temporal field set
#[derive(Debug, Clone)]
pub struct ModelSchema {
    name: String,
    table: String,
    temporal_fields: Vec<String>,
}

impl ModelSchema {
    /// Create a schema for `name`, backed by a table of the same name,
    /// with the default temporal fields
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            table: name.clone(),
            name,
            temporal_fields: DEFAULT_TEMPORAL_FIELDS
                .iter()
                .map(|f| f.to_string())
                .collect(),
        }
    }

    /// Replace the temporal field set
    pub fn temporal(mut self, fields: &[&str]) -> Self {
        self.temporal_fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    /// Back this model with a differently named physical table
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Model name
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Registry mapping model names to their schema entries
///
/// `ModelRegistry::default()` knows the built-in auth models; additional
/// models are registered with [`ModelRegistry::register`].
///
/// # Example
///
/// ```ignore
/// let registry = ModelRegistry::default()
///     .register(ModelSchema::new("apiKey").temporal(&["createdAt", "expiresAt"]))
///     .register(ModelSchema::new("session").table("auth_sessions"));
/// assert!(registry.is_temporal("session", "expiresAt"));
/// ```
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    models: HashMap<String, ModelSchema>,
}

static BUILTIN_MODELS: Lazy<HashMap<String, ModelSchema>> = Lazy::new(|| {
    [
        ModelSchema::new("user"),
        ModelSchema::new("session").temporal(&["createdAt", "updatedAt", "expiresAt"]),
        ModelSchema::new("account").temporal(&[
            "createdAt",
            "updatedAt",
            "accessTokenExpiresAt",
            "refreshTokenExpiresAt",
        ]),
        ModelSchema::new("verification").temporal(&["createdAt", "updatedAt", "expiresAt"]),
        ModelSchema::new("organization").temporal(&["createdAt"]),
        ModelSchema::new("member").temporal(&["createdAt"]),
        ModelSchema::new("invitation").temporal(&["createdAt", "expiresAt"]),
    ]
    .into_iter()
    .map(|m| (m.name.clone(), m))
    .collect()
});

impl Default for ModelRegistry {
    fn default() -> Self {
        Self {
            models: BUILTIN_MODELS.clone(),
        }
    }
}

impl ModelRegistry {
    /// Registry with no built-in models (unknown-model fallback still
    /// applies)
    pub fn empty() -> Self {
        Self {
            models: HashMap::new(),
        }
    }

    /// Add or replace a model schema
    pub fn register(mut self, schema: ModelSchema) -> Self {
        self.models.insert(schema.name.clone(), schema);
        self
    }

    /// Physical table backing `model` (defaults to the model name)
    pub fn table<'a>(&'a self, model: &'a str) -> &'a str {
        self.models
            .get(model)
            .map(|m| m.table.as_str())
            .unwrap_or(model)
    }

    /// Temporal field names of `model`
    pub fn temporal_fields(&self, model: &str) -> &[String] {
        static DEFAULT: Lazy<Vec<String>> = Lazy::new(|| {
            DEFAULT_TEMPORAL_FIELDS
                .iter()
                .map(|f| f.to_string())
                .collect()
        });
        self.models
            .get(model)
            .map(|m| m.temporal_fields.as_slice())
            .unwrap_or(DEFAULT.as_slice())
    }

    /// True if `field` is temporal for `model`
    pub fn is_temporal(&self, model: &str, field: &str) -> bool {
        self.temporal_fields(model).iter().any(|f| f == field)
    }
}
