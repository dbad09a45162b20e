//! In-memory object store
//!
//! A `Mutex`-guarded ordered map keyed by `(project, kind, id)`. Iteration
//! order is the key order, so `list` is deterministic by id — tests and
//! `validate_all` rely on that.

use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::models::EntityKind;

use super::{ObjectStore, Scope, StorageError, StorageResult, StoredObject};

type Key = (String, EntityKind, String);

/// In-memory [`ObjectStore`] implementation.
#[derive(Default)]
pub struct InMemoryStore {
    records: Mutex<BTreeMap<Key, StoredObject>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> StorageResult<std::sync::MutexGuard<'_, BTreeMap<Key, StoredObject>>> {
        self.records
            .lock()
            .map_err(|e| StorageError::Backend(format!("lock poisoned: {e}")))
    }

    fn key(scope: &Scope, id: &str) -> Key {
        (scope.project_name.clone(), scope.kind, id.to_owned())
    }
}

impl ObjectStore for InMemoryStore {
    fn upsert(&self, mut record: StoredObject) -> StorageResult<StoredObject> {
        let mut records = self.lock()?;
        let key = (record.project_name.clone(), record.kind, record.id.clone());
        // ON CONFLICT: everything is replaced except `created`.
        if let Some(existing) = records.get(&key) {
            record.created = existing.created;
        }
        records.insert(key, record.clone());
        Ok(record)
    }

    fn find(&self, scope: &Scope, id: &str) -> StorageResult<Option<StoredObject>> {
        Ok(self.lock()?.get(&Self::key(scope, id)).cloned())
    }

    fn find_by_name(&self, scope: &Scope, name: &str) -> StorageResult<Option<StoredObject>> {
        Ok(self
            .lock()?
            .range(Self::key(scope, "")..)
            .take_while(|(key, _)| key.0 == scope.project_name && key.1 == scope.kind)
            .map(|(_, record)| record)
            .find(|record| record.name.as_deref() == Some(name))
            .cloned())
    }

    fn list(&self, scope: &Scope) -> StorageResult<Vec<StoredObject>> {
        Ok(self
            .lock()?
            .range(Self::key(scope, "")..)
            .take_while(|(key, _)| key.0 == scope.project_name && key.1 == scope.kind)
            .map(|(_, record)| record.clone())
            .collect())
    }

    fn delete(&self, scope: &Scope, id: &str) -> StorageResult<bool> {
        Ok(self.lock()?.remove(&Self::key(scope, id)).is_some())
    }

    fn delete_all(&self, scope: &Scope) -> StorageResult<usize> {
        let mut records = self.lock()?;
        let keys: Vec<Key> = records
            .range(Self::key(scope, "")..)
            .take_while(|(key, _)| key.0 == scope.project_name && key.1 == scope.kind)
            .map(|(key, _)| key.clone())
            .collect();
        for key in &keys {
            records.remove(key);
        }
        Ok(keys.len())
    }

    fn count(&self, scope: &Scope) -> StorageResult<u64> {
        Ok(self.list(scope)?.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(project: &str, id: &str) -> StoredObject {
        let now = Utc::now();
        StoredObject {
            id: id.to_owned(),
            project_name: project.to_owned(),
            kind: EntityKind::Variable,
            name: None,
            payload: serde_json::json!({"id": id}),
            created: now,
            last_updated: now,
        }
    }

    #[test]
    fn upsert_preserves_created_on_conflict() {
        let store = InMemoryStore::new();
        let scope = Scope::new("p1", EntityKind::Variable);

        let first = store.upsert(record("p1", "v1")).unwrap();
        let mut second = record("p1", "v1");
        second.last_updated = Utc::now();
        let stored = store.upsert(second).unwrap();

        assert_eq!(stored.created, first.created);
        assert_eq!(store.count(&scope).unwrap(), 1);
    }

    #[test]
    fn scopes_are_isolated() {
        let store = InMemoryStore::new();
        store.upsert(record("p1", "v1")).unwrap();
        store.upsert(record("p2", "v1")).unwrap();

        let p1 = Scope::new("p1", EntityKind::Variable);
        let other_kind = Scope::new("p1", EntityKind::Image);

        assert_eq!(store.count(&p1).unwrap(), 1);
        assert_eq!(store.count(&other_kind).unwrap(), 0);
        assert_eq!(store.delete_all(&p1).unwrap(), 1);
        assert!(store.find(&Scope::new("p2", EntityKind::Variable), "v1").unwrap().is_some());
    }

    #[test]
    fn list_is_ordered_by_id() {
        let store = InMemoryStore::new();
        store.upsert(record("p1", "b")).unwrap();
        store.upsert(record("p1", "a")).unwrap();
        store.upsert(record("p1", "c")).unwrap();

        let scope = Scope::new("p1", EntityKind::Variable);
        let ids: Vec<String> = store.list(&scope).unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }
}
