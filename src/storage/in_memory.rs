//! In-memory storage for testing and development

use crate::core::error::{EntityError, StorageError};
use crate::core::{DataService, KeyValueStore, Patchable, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

fn lock_error(kind: &str, e: impl std::fmt::Display) -> StorageError {
    StorageError::Backend(format!("Failed to acquire {} lock: {}", kind, e))
}

/// In-memory key-value store
///
/// Uses RwLock for thread-safe access. Clones share the same map.
#[derive(Clone, Default)]
pub struct InMemoryKeyValueStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.read().map_err(|e| lock_error("read", e))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> Result<()> {
        let mut entries = self.entries.write().map_err(|e| lock_error("write", e))?;
        entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.write().map_err(|e| lock_error("write", e))?;
        entries.remove(key);
        Ok(())
    }
}

/// In-memory data service keeping entities in insertion order
#[derive(Clone)]
pub struct InMemoryDataService<T> {
    entities: Arc<RwLock<Vec<T>>>,
}

impl<T: Patchable> InMemoryDataService<T> {
    pub fn new() -> Self {
        Self::with_entities(Vec::new())
    }

    /// Create a service pre-loaded with `entities`
    pub fn with_entities(entities: Vec<T>) -> Self {
        Self {
            entities: Arc::new(RwLock::new(entities)),
        }
    }
}

impl<T: Patchable> Default for InMemoryDataService<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Patchable> DataService<T> for InMemoryDataService<T> {
    async fn list(&self) -> Result<Vec<T>> {
        let entities = self.entities.read().map_err(|e| lock_error("read", e))?;
        Ok(entities.clone())
    }

    async fn get(&self, id: &str) -> Result<Option<T>> {
        let entities = self.entities.read().map_err(|e| lock_error("read", e))?;
        Ok(entities.iter().find(|e| e.id() == id).cloned())
    }

    async fn create(&self, entity: T) -> Result<T> {
        let mut entities = self.entities.write().map_err(|e| lock_error("write", e))?;

        if entities.iter().any(|e| e.id() == entity.id()) {
            return Err(EntityError::AlreadyExists {
                entity_type: T::resource_name_singular().to_string(),
                id: entity.id().to_string(),
            }
            .into());
        }

        entities.push(entity.clone());
        Ok(entity)
    }

    async fn update(&self, id: &str, patch: T::Patch) -> Result<T> {
        let mut entities = self.entities.write().map_err(|e| lock_error("write", e))?;

        let entity = entities
            .iter_mut()
            .find(|e| e.id() == id)
            .ok_or_else(|| crate::core::BlogError::not_found(T::resource_name_singular(), id))?;

        entity.apply_patch(patch);
        Ok(entity.clone())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut entities = self.entities.write().map_err(|e| lock_error("write", e))?;

        let index = entities
            .iter()
            .position(|e| e.id() == id)
            .ok_or_else(|| crate::core::BlogError::not_found(T::resource_name_singular(), id))?;

        entities.remove(index);
        Ok(())
    }
}
