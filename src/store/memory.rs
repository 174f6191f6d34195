//! Memory Store Module
//!
//! In-process [`KeyValueStore`] with TTL expiry. Used by tests and local runs in
//! place of a Redis server. Expired entries are dropped lazily when touched.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;

use super::{Connector, KeyValueStore, SetCondition, StoreEntry};
use crate::error::StoreError;

// == Memory Store ==
/// Thread-safe in-process key-value store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, StoreEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, StoreEntry>>, StoreError> {
        self.entries
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }

    /// Returns the live entry for `key`, dropping it first if expired.
    fn live_entry<'a>(
        entries: &'a mut HashMap<String, StoreEntry>,
        key: &str,
    ) -> Option<&'a StoreEntry> {
        if entries.get(key).is_some_and(StoreEntry::is_expired) {
            entries.remove(key);
        }
        entries.get(key)
    }

    fn write(
        &self,
        key: &str,
        value: String,
        ttl: Duration,
        condition: SetCondition,
    ) -> Result<bool, StoreError> {
        let mut entries = self.lock()?;

        if condition == SetCondition::NotExists && Self::live_entry(&mut entries, key).is_some() {
            return Ok(false);
        }

        entries.insert(key.to_string(), StoreEntry::new(value, ttl));
        Ok(true)
    }

    fn remove(&self, key: &str) -> Result<bool, StoreError> {
        let mut entries = self.lock()?;
        let removed = entries.remove(key);
        Ok(removed.is_some_and(|entry| !entry.is_expired()))
    }

    /// TTL that the live entry under `key` was written with.
    pub fn ttl_of(&self, key: &str) -> Option<Duration> {
        let mut entries = self.lock().ok()?;
        Self::live_entry(&mut entries, key).map(|entry| entry.ttl)
    }

    /// Raw stored value under `key`, if live.
    pub fn raw(&self, key: &str) -> Option<String> {
        let mut entries = self.lock().ok()?;
        Self::live_entry(&mut entries, key).map(|entry| entry.value.clone())
    }

    /// Keys of all live entries.
    pub fn keys(&self) -> Vec<String> {
        match self.lock() {
            Ok(mut entries) => {
                entries.retain(|_, entry| !entry.is_expired());
                entries.keys().cloned().collect()
            }
            Err(_) => Vec::new(),
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.keys().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut entries = self.lock()?;
        Ok(Self::live_entry(&mut entries, key).map(|entry| entry.value.clone()))
    }

    async fn set(
        &self,
        key: &str,
        value: String,
        ttl: Duration,
        condition: SetCondition,
    ) -> Result<bool, StoreError> {
        self.write(key, value, ttl, condition)
    }

    fn set_detached(&self, key: String, value: String, ttl: Duration) {
        if let Err(e) = self.write(&key, value, ttl, SetCondition::Always) {
            tracing::warn!("Detached SET failed for {}: {}", key, e);
        }
    }

    async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        self.remove(key)
    }

    fn delete_detached(&self, key: String) {
        if let Err(e) = self.remove(&key) {
            tracing::warn!("Detached DEL failed for {}: {}", key, e);
        }
    }

    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        let mut entries = self.lock()?;
        Ok(Self::live_entry(&mut entries, key).is_some())
    }
}

// == Memory Connector ==
/// Hands out a shared [`MemoryStore`] regardless of the descriptor.
#[derive(Debug, Clone, Default)]
pub struct MemoryConnector {
    store: Arc<MemoryStore>,
}

impl MemoryConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connector handing out an existing store, so tests can inspect it.
    pub fn with_store(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> Arc<MemoryStore> {
        Arc::clone(&self.store)
    }
}

#[async_trait]
impl Connector for MemoryConnector {
    async fn connect(&self, _descriptor: &str) -> Result<Arc<dyn KeyValueStore>, StoreError> {
        let store: Arc<dyn KeyValueStore> = self.store.clone();
        Ok(store)
    }
}
