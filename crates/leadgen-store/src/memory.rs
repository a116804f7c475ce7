// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::{KeyValueStore, StorageError};

/// Process-local store. Clones share the same map, so two sessions over
/// clones of one store observe each other's writes.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: Arc<RwLock<BTreeMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.data.read().map(|data| data.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let data = self
            .data
            .read()
            .map_err(|_| StorageError::read(key, "lock poisoned"))?;
        Ok(data.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut data = self
            .data
            .write()
            .map_err(|_| StorageError::write(key, "lock poisoned"))?;
        data.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        let mut data = self
            .data
            .write()
            .map_err(|_| StorageError::delete(key, "lock poisoned"))?;
        data.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryStore;
    use crate::KeyValueStore;

    #[test]
    fn set_get_delete() -> anyhow::Result<()> {
        let store = MemoryStore::new();
        assert_eq!(store.get("authToken")?, None);

        store.set("authToken", "demo-token-1")?;
        store.set("authToken", "demo-token-2")?;
        assert_eq!(store.get("authToken")?.as_deref(), Some("demo-token-2"));
        assert_eq!(store.len(), 1);

        store.delete("authToken")?;
        store.delete("authToken")?;
        assert!(store.is_empty());
        Ok(())
    }

    #[test]
    fn clones_share_data() -> anyhow::Result<()> {
        let store = MemoryStore::new();
        let other = store.clone();
        store.set("user", "{}")?;
        assert_eq!(other.get("user")?.as_deref(), Some("{}"));
        Ok(())
    }
}
