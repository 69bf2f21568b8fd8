//! In-process key/value storage.
//!
//! [`MemoryStorage`] plays the role of browser local storage: string keys
//! mapping to serialized collections. It is an explicitly constructed,
//! cloneable handle, so two stores see the same data only when they are
//! given the same handle.

use super::Persistence;
use crate::codec;
use crate::entity::Entity;
use crate::{error::Result, Error};
use async_trait::async_trait;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

#[derive(Debug)]
struct Inner {
    entries: RwLock<HashMap<String, String>>,
    available: AtomicBool,
}

/// Shared string key/value storage.
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    inner: Arc<Inner>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                entries: RwLock::new(HashMap::new()),
                available: AtomicBool::new(true),
            }),
        }
    }

    /// Toggle availability; an unavailable storage rejects reads and writes.
    pub fn set_available(&self, available: bool) {
        self.inner.available.store(available, Ordering::SeqCst);
    }

    pub fn is_available(&self) -> bool {
        self.inner.available.load(Ordering::SeqCst)
    }

    pub async fn get_item(&self, key: &str) -> Option<String> {
        self.inner.entries.read().await.get(key).cloned()
    }

    pub async fn set_item(&self, key: &str, value: impl Into<String>) {
        self.inner
            .entries
            .write()
            .await
            .insert(key.to_string(), value.into());
    }

    pub async fn remove_item(&self, key: &str) -> Option<String> {
        self.inner.entries.write().await.remove(key)
    }

    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<_> = self.inner.entries.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

/// Persists one collection under a single key of a [`MemoryStorage`].
#[derive(Debug, Clone)]
pub struct MemoryAdapter<E> {
    storage: MemoryStorage,
    key: String,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> MemoryAdapter<E> {
    pub fn new(storage: MemoryStorage, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            _entity: PhantomData,
        }
    }
}

#[async_trait]
impl<E: Entity> Persistence<E> for MemoryAdapter<E> {
    fn namespace(&self) -> &str {
        &self.key
    }

    async fn load(&self) -> Result<Vec<E>> {
        if !self.storage.is_available() {
            warn!(key = %self.key, "storage unavailable, cannot read collection");
            return Err(Error::Unavailable(self.key.clone()));
        }

        match self.storage.get_item(&self.key).await {
            Some(raw) => Ok(codec::decode(&raw).or_empty(&self.key)),
            None => {
                debug!(key = %self.key, "nothing stored yet");
                Ok(Vec::new())
            }
        }
    }

    async fn save(&self, entities: &[E]) -> Result<()> {
        if !self.storage.is_available() {
            return Err(Error::Unavailable(self.key.clone()));
        }
        let raw = codec::encode(entities)?;
        self.storage.set_item(&self.key, raw).await;
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        if !self.storage.is_available() {
            return Err(Error::Unavailable(self.key.clone()));
        }
        self.storage.remove_item(&self.key).await;
        Ok(())
    }
}
