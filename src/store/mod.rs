//! Store Module
//!
//! The key-value store client contract consumed by the cache repository, plus the
//! Redis-backed client and an in-process store for tests and local runs.

mod descriptor;
mod entry;
mod memory;
mod redis;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::StoreError;

pub use descriptor::{ConnectionDescriptor, DEFAULT_CONNECT_TIMEOUT, DEFAULT_PORT};
pub use entry::StoreEntry;
pub use memory::{MemoryConnector, MemoryStore};
pub use self::redis::{RedisConnector, RedisStore};

// == Set Condition ==
/// Controls whether a write may replace an existing entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetCondition {
    /// Write unconditionally, overwriting any existing entry
    Always,
    /// Write only when the key does not exist yet
    NotExists,
}

// == Key-Value Store ==
/// String key-value store with store-enforced expiry.
///
/// Implementations must be safe for concurrent use; the repository shares a single
/// instance across all callers without additional locking.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the raw value stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Writes `value` with the given TTL. Returns whether the write happened.
    async fn set(
        &self,
        key: &str,
        value: String,
        ttl: Duration,
        condition: SetCondition,
    ) -> Result<bool, StoreError>;

    /// Queues an unconditional write without waiting for acknowledgment.
    ///
    /// Transport failures are logged by the store and never reported.
    fn set_detached(&self, key: String, value: String, ttl: Duration);

    /// Deletes `key`. Returns whether an entry was removed.
    async fn delete(&self, key: &str) -> Result<bool, StoreError>;

    /// Queues a delete without waiting for acknowledgment.
    fn delete_detached(&self, key: String);

    async fn exists(&self, key: &str) -> Result<bool, StoreError>;
}

// == Connector ==
/// Establishes a store connection from a connection descriptor.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, descriptor: &str) -> Result<Arc<dyn KeyValueStore>, StoreError>;
}
