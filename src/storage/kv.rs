//! Data service persisting a whole collection as one JSON blob

use crate::core::error::{EntityError, StorageError};
use crate::core::{BlogError, DataService, KeyValueStore, Patchable, Result};
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex};

/// Key the post collection is stored under
pub const DEFAULT_POSTS_KEY: &str = "blogflow_posts";

/// Collection stored as a JSON array under a single key
///
/// Every mutation is a read-modify-write of the whole blob, serialised by an
/// internal mutex. A missing key reads as an empty collection; a blob that
/// does not decode is [`StorageError::Corrupt`].
pub struct KvDataService<T, S> {
    store: S,
    key: String,
    write_guard: Arc<Mutex<()>>,
    _entity: PhantomData<fn() -> T>,
}

impl<T, S: Clone> Clone for KvDataService<T, S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            key: self.key.clone(),
            write_guard: Arc::clone(&self.write_guard),
            _entity: PhantomData,
        }
    }
}

impl<T, S> KvDataService<T, S>
where
    T: Patchable + Serialize + DeserializeOwned,
    S: KeyValueStore,
{
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            write_guard: Arc::new(Mutex::new(())),
            _entity: PhantomData,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    fn load(&self) -> Result<Vec<T>> {
        let Some(blob) = self.store.get(&self.key)? else {
            return Ok(Vec::new());
        };
        serde_json::from_str(&blob).map_err(|e| {
            StorageError::Corrupt {
                key: self.key.clone(),
                message: e.to_string(),
            }
            .into()
        })
    }

    fn save(&self, entities: &[T]) -> Result<()> {
        let blob = serde_json::to_string(entities)?;
        self.store.set(&self.key, blob)
    }

    fn mutate<R>(&self, f: impl FnOnce(&mut Vec<T>) -> Result<R>) -> Result<R> {
        let _guard = self
            .write_guard
            .lock()
            .map_err(|e| StorageError::Backend(format!("Failed to acquire write lock: {}", e)))?;
        let mut entities = self.load()?;
        let out = f(&mut entities)?;
        self.save(&entities)?;
        Ok(out)
    }

    /// Write `seed` when nothing is stored yet; returns whether it did
    ///
    /// A corrupt blob is left alone and reported.
    pub fn seed_if_empty(&self, seed: Vec<T>) -> Result<bool> {
        let _guard = self
            .write_guard
            .lock()
            .map_err(|e| StorageError::Backend(format!("Failed to acquire write lock: {}", e)))?;
        if !self.load()?.is_empty() {
            return Ok(false);
        }
        tracing::info!(key = %self.key, count = seed.len(), "seeding empty collection");
        self.save(&seed)?;
        Ok(true)
    }

    /// Drop the stored collection
    pub fn clear(&self) -> Result<()> {
        self.store.remove(&self.key)
    }
}

#[async_trait]
impl<T, S> DataService<T> for KvDataService<T, S>
where
    T: Patchable + Serialize + DeserializeOwned,
    S: KeyValueStore,
{
    async fn list(&self) -> Result<Vec<T>> {
        self.load()
    }

    async fn get(&self, id: &str) -> Result<Option<T>> {
        Ok(self.load()?.into_iter().find(|e| e.id() == id))
    }

    async fn create(&self, entity: T) -> Result<T> {
        self.mutate(|entities| {
            if entities.iter().any(|e| e.id() == entity.id()) {
                return Err(EntityError::AlreadyExists {
                    entity_type: T::resource_name_singular().to_string(),
                    id: entity.id().to_string(),
                }
                .into());
            }
            entities.push(entity.clone());
            Ok(entity)
        })
    }

    async fn update(&self, id: &str, patch: T::Patch) -> Result<T> {
        self.mutate(|entities| {
            let entity = entities
                .iter_mut()
                .find(|e| e.id() == id)
                .ok_or_else(|| BlogError::not_found(T::resource_name_singular(), id))?;
            entity.apply_patch(patch);
            Ok(entity.clone())
        })
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.mutate(|entities| {
            let index = entities
                .iter()
                .position(|e| e.id() == id)
                .ok_or_else(|| BlogError::not_found(T::resource_name_singular(), id))?;
            entities.remove(index);
            Ok(())
        })
    }
}
