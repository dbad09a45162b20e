//! Project-scoped repositories
//!
//! A [`Repository<T>`] owns one project's objects of one entity kind. It
//! wraps the backing [`ObjectStore`] with an in-process cache:
//!
//! - `upsert` writes through the store and refreshes the cache entry
//! - `find_model` is cache-first; negative results are never cached
//! - `list_all_model` caches the full scope behind an `all_cached` flag
//! - `delete`/`delete_all` evict; `delete_all` also clears `all_cached`
//!
//! The cache is per-repository-instance and mutex-guarded, so repositories
//! can be shared across threads. Cache consistency is only guaranteed when
//! every mutation goes through the repository.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::json;
use tracing::{debug, error};

use crate::models::{EntityKind, MigrationObject};
use crate::storage::{ObjectStore, Scope, StorageError, StoredObject};

/// Error type for repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Lookup by id failed on the strict (`_or_fail`) path.
    #[error("record '{id}' not found in '{kind}' repository")]
    NotFound { id: String, kind: EntityKind },

    /// The backing store failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A stored payload no longer decodes into the model type.
    #[error("failed to decode stored '{kind}' record '{id}'")]
    Decode {
        id: String,
        kind: EntityKind,
        #[source]
        source: serde_json::Error,
    },

    /// A model failed to serialize into its payload column.
    #[error("failed to encode '{kind}' record '{id}'")]
    Encode {
        id: String,
        kind: EntityKind,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

struct CacheState<T> {
    entries: BTreeMap<String, T>,
    all_cached: bool,
}

impl<T> Default for CacheState<T> {
    fn default() -> Self {
        Self { entries: BTreeMap::new(), all_cached: false }
    }
}

/// Storage abstraction for one project's objects of one kind.
pub struct Repository<T: MigrationObject> {
    store: Arc<dyn ObjectStore>,
    project_name: String,
    cache: Mutex<CacheState<T>>,
}

impl<T: MigrationObject> Repository<T> {
    pub fn new(store: Arc<dyn ObjectStore>, project_name: impl Into<String>) -> Self {
        Self {
            store,
            project_name: project_name.into(),
            cache: Mutex::new(CacheState::default()),
        }
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    fn scope(&self) -> Scope {
        Scope::new(self.project_name.clone(), T::KIND)
    }

    fn lock_cache(&self) -> RepositoryResult<MutexGuard<'_, CacheState<T>>> {
        self.cache
            .lock()
            .map_err(|e| StorageError::Backend(format!("cache lock poisoned: {e}")).into())
    }

    fn decode(&self, record: StoredObject) -> RepositoryResult<T> {
        serde_json::from_value(record.payload).map_err(|source| RepositoryError::Decode {
            id: record.id,
            kind: T::KIND,
            source,
        })
    }

    /// Apply a mutation against the backing store and refresh the cache
    /// entry from the written record.
    ///
    /// The closure receives the currently stored model (if any) and returns
    /// the new one. The repository keeps the original `created` timestamp
    /// on conflict and stamps `last_updated`; the closure does not need to
    /// maintain either.
    pub fn upsert<F>(&self, id: &str, mutate: F) -> RepositoryResult<T>
    where
        F: FnOnce(Option<T>) -> T,
    {
        let scope = self.scope();
        let now = chrono::Utc::now();

        let existing = self.store.find(&scope, id)?;
        let created = existing.as_ref().map(|r| r.created).unwrap_or(now);
        let current = existing.map(|r| self.decode(r)).transpose()?;

        let model = mutate(current);
        let mut payload =
            serde_json::to_value(&model).map_err(|source| RepositoryError::Encode {
                id: id.to_owned(),
                kind: T::KIND,
                source,
            })?;
        // The repository owns identity and timestamps, whatever the
        // mutation produced.
        payload["id"] = json!(id);
        payload["created"] = json!(created);
        payload["lastUpdated"] = json!(now);

        let record = StoredObject {
            id: id.to_owned(),
            project_name: self.project_name.clone(),
            kind: T::KIND,
            name: model.name().map(str::to_owned),
            payload,
            created,
            last_updated: now,
        };
        let stored = self.store.upsert(record)?;
        let fresh = self.decode(stored)?;

        debug!(kind = %T::KIND, id, project = %self.project_name, "upserted record");
        self.lock_cache()?.entries.insert(id.to_owned(), fresh.clone());
        Ok(fresh)
    }

    /// Cache-first lookup by id. Negative results are not cached, so every
    /// miss re-queries the store.
    pub fn find_model(&self, id: &str) -> RepositoryResult<Option<T>> {
        if let Some(hit) = self.lock_cache()?.entries.get(id) {
            return Ok(Some(hit.clone()));
        }

        match self.store.find(&self.scope(), id)? {
            Some(record) => {
                let model = self.decode(record)?;
                self.lock_cache()?.entries.insert(id.to_owned(), model.clone());
                Ok(Some(model))
            }
            None => Ok(None),
        }
    }

    /// Strict lookup by id.
    pub fn find_model_or_fail(&self, id: &str) -> RepositoryResult<T> {
        self.find_model(id)?.ok_or_else(|| {
            error!(kind = %T::KIND, id, project = %self.project_name, "record not found");
            RepositoryError::NotFound { id: id.to_owned(), kind: T::KIND }
        })
    }

    /// Lookup by display name. Always queries the store; names are not a
    /// cache key.
    pub fn find_model_by_name(&self, name: &str) -> RepositoryResult<Option<T>> {
        match self.store.find_by_name(&self.scope(), name)? {
            Some(record) => {
                let model = self.decode(record)?;
                self.lock_cache()?.entries.insert(model.id().to_owned(), model.clone());
                Ok(Some(model))
            }
            None => Ok(None),
        }
    }

    /// All models of this scope, ordered by id. The first call caches the
    /// full set; later calls are served from the cache until a delete
    /// invalidates it.
    pub fn list_all_model(&self) -> RepositoryResult<Vec<T>> {
        {
            let cache = self.lock_cache()?;
            if cache.all_cached {
                return Ok(cache.entries.values().cloned().collect());
            }
        }

        let records = self.store.list(&self.scope())?;
        let mut models = Vec::with_capacity(records.len());
        for record in records {
            models.push(self.decode(record)?);
        }

        let mut cache = self.lock_cache()?;
        for model in &models {
            cache.entries.insert(model.id().to_owned(), model.clone());
        }
        cache.all_cached = true;
        Ok(models)
    }

    /// Models matching an arbitrary predicate. Always queries the store;
    /// matches refresh their cache entries but the scope is not marked
    /// fully cached.
    pub fn list<P>(&self, predicate: P) -> RepositoryResult<Vec<T>>
    where
        P: Fn(&T) -> bool,
    {
        let records = self.store.list(&self.scope())?;
        let mut matches = Vec::new();
        for record in records {
            let model = self.decode(record)?;
            if predicate(&model) {
                matches.push(model);
            }
        }

        let mut cache = self.lock_cache()?;
        for model in &matches {
            cache.entries.insert(model.id().to_owned(), model.clone());
        }
        Ok(matches)
    }

    /// Number of stored models in this scope.
    pub fn count(&self) -> RepositoryResult<u64> {
        Ok(self.store.count(&self.scope())?)
    }

    /// Delete one model, evicting its cache entry.
    pub fn delete(&self, id: &str) -> RepositoryResult<()> {
        self.lock_cache()?.entries.remove(id);
        self.store.delete(&self.scope(), id)?;
        debug!(kind = %T::KIND, id, project = %self.project_name, "deleted record");
        Ok(())
    }

    /// Delete every model in this scope.
    ///
    /// Clears the cache map and the `all_cached` flag together; dropping
    /// only the map would let a later `list_all_model` serve the stale
    /// empty cache as complete.
    pub fn delete_all(&self) -> RepositoryResult<usize> {
        {
            let mut cache = self.lock_cache()?;
            cache.entries.clear();
            cache.all_cached = false;
        }
        let removed = self.store.delete_all(&self.scope())?;
        debug!(kind = %T::KIND, removed, project = %self.project_name, "deleted all records");
        Ok(removed)
    }
}
