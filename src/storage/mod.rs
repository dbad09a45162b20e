//! Backing store abstraction
//!
//! The relational persistence mechanics are an external collaborator; the
//! SDK only needs key-value semantics with query-by-predicate on top:
//! records keyed by `(project_name, kind, id)` carrying one JSON payload
//! column each. [`ObjectStore`] is that seam. [`InMemoryStore`] is the
//! bundled implementation used by tests and by embedders without a real
//! database.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::EntityKind;

pub mod memory;

pub use memory::InMemoryStore;

/// Error type for store operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The backing store failed (connection, transaction, lock...).
    #[error("store backend failure: {0}")]
    Backend(String),
}

/// Result type for store operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// The tenancy scope of a query: one project, one entity kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Scope {
    pub project_name: String,
    pub kind: EntityKind,
}

impl Scope {
    pub fn new(project_name: impl Into<String>, kind: EntityKind) -> Self {
        Self { project_name: project_name.into(), kind }
    }
}

/// One stored migration-object record.
///
/// `name` is denormalized out of the payload so stores can index
/// name lookups; `payload` is the full JSON-encoded model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredObject {
    pub id: String,
    pub project_name: String,
    pub kind: EntityKind,
    pub name: Option<String>,
    pub payload: serde_json::Value,
    pub created: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

/// Key-value store with query-by-predicate semantics over
/// [`StoredObject`] records.
///
/// Implementations must apply each call atomically; `upsert` must keep the
/// existing `created` timestamp when a record already exists (everything
/// else is replaced).
pub trait ObjectStore: Send + Sync {
    /// Insert or replace a record. Returns the record as stored.
    fn upsert(&self, record: StoredObject) -> StorageResult<StoredObject>;

    /// Look up one record by id within a scope.
    fn find(&self, scope: &Scope, id: &str) -> StorageResult<Option<StoredObject>>;

    /// Look up the first record with the given display name within a scope.
    fn find_by_name(&self, scope: &Scope, name: &str) -> StorageResult<Option<StoredObject>>;

    /// All records in a scope, ordered by id.
    fn list(&self, scope: &Scope) -> StorageResult<Vec<StoredObject>>;

    /// Delete one record. Returns whether it existed.
    fn delete(&self, scope: &Scope, id: &str) -> StorageResult<bool>;

    /// Delete every record in a scope. Returns the number removed.
    fn delete_all(&self, scope: &Scope) -> StorageResult<usize>;

    /// Number of records in a scope.
    fn count(&self, scope: &Scope) -> StorageResult<u64>;
}
