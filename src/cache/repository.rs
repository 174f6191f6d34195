//! Cache Repository Module
//!
//! Namespaced, TTL-bounded access to a remote key-value store. A repository that
//! cannot reach its store behaves like an always-empty cache that accepts writes.

use std::sync::Arc;
use std::time::Duration;

use crate::cache::{ensure_key, Namespace, TtlPolicy};
use crate::config::CacheSettings;
use crate::error::Result;
use crate::logger::Log;
use crate::serializer::{CacheType, JsonSerializer, Serializer};
use crate::store::{Connector, KeyValueStore, RedisConnector, SetCondition};

// == Cache Repository ==
/// Cache client bound to one namespace, one store connection, one serializer.
///
/// Connectivity is attempted once at construction and never re-evaluated. When no
/// connection is held every operation is a no-op or a miss; only argument and
/// encoding faults are ever reported to the caller (plus store faults from
/// [`CacheRepository::add`]).
pub struct CacheRepository<S: Serializer = JsonSerializer> {
    /// Live store connection, `None` while inactive
    store: Option<Arc<dyn KeyValueStore>>,
    namespace: Namespace,
    connection_string: String,
    ttl: TtlPolicy,
    serializer: S,
    logger: Arc<dyn Log>,
    disposed: bool,
}

impl<S: Serializer> CacheRepository<S> {
    // == Constructors ==
    /// Connects to Redis using the settings' connection string.
    pub async fn connect(settings: &CacheSettings, serializer: S, logger: Arc<dyn Log>) -> Self {
        Self::connect_with(&RedisConnector, settings, serializer, logger).await
    }

    /// Connects through the given connector.
    ///
    /// Never fails: an empty connection string or a failed connection attempt
    /// leaves the repository inactive for its whole lifetime.
    pub async fn connect_with<C: Connector + ?Sized>(
        connector: &C,
        settings: &CacheSettings,
        serializer: S,
        logger: Arc<dyn Log>,
    ) -> Self {
        let connection_string = settings.connection_string().to_string();

        let store = if connection_string.trim().is_empty() {
            logger.info("No connection string configured, cache repository inactive");
            None
        } else {
            match connector.connect(&connection_string).await {
                Ok(store) => {
                    logger.info(&format!("Cache repository initialised ({})", settings));
                    Some(store)
                }
                Err(e) => {
                    logger.error_with_cause("Cache repository failed to initialise", &e);
                    None
                }
            }
        };

        Self {
            store,
            namespace: settings.namespace().clone(),
            connection_string,
            ttl: TtlPolicy::default(),
            serializer,
            logger,
            disposed: false,
        }
    }

    // == Accessors ==
    pub fn is_active(&self) -> bool {
        self.store.is_some()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn environment(&self) -> &str {
        self.namespace.environment()
    }

    pub fn functional_area(&self) -> &str {
        self.namespace.functional_area()
    }

    pub fn connection_string(&self) -> &str {
        &self.connection_string
    }

    pub fn default_ttl(&self) -> Duration {
        self.ttl.default_ttl()
    }

    pub fn max_ttl(&self) -> Duration {
        self.ttl.max_ttl()
    }

    /// Store-visible key for `key`.
    pub fn namespaced_key(&self, key: &str) -> Result<String> {
        self.namespace.key(key)
    }

    // == Set ==
    /// Writes `value` unconditionally without waiting for the store.
    ///
    /// Store failures are swallowed by the store client. Blank keys and encoding
    /// failures are returned before anything is dispatched. The key is checked
    /// before the inactive short-circuit, so a blank key is rejected even when no
    /// store is configured; the same holds for every other operation.
    pub fn set<T: CacheType>(&self, key: &str, value: &T, ttl: Option<Duration>) -> Result<()> {
        ensure_key(key)?;
        let Some(store) = &self.store else {
            return Ok(());
        };

        let key = self.namespace.key(key)?;
        let ttl = self.ttl.resolve(ttl);
        let encoded = self.serializer.serialize(value)?;

        store.set_detached(key, encoded, ttl);
        Ok(())
    }

    // == Add ==
    /// Writes `value` only if the key does not exist yet.
    ///
    /// Returns `true` when the entry was created, `false` when one already existed
    /// or the repository is inactive. Store failures propagate.
    pub async fn add<T: CacheType>(
        &self,
        key: &str,
        value: &T,
        ttl: Option<Duration>,
    ) -> Result<bool> {
        ensure_key(key)?;
        let Some(store) = &self.store else {
            return Ok(false);
        };

        let key = self.namespace.key(key)?;
        let ttl = self.ttl.resolve(ttl);
        let encoded = self.serializer.serialize(value)?;

        Ok(store.set(&key, encoded, ttl, SetCondition::NotExists).await?)
    }

    // == Try Get ==
    /// Reads and decodes the value under `key`.
    ///
    /// A value equal to `T::default()` is reported as a miss. Store and decode
    /// failures are logged and reported as a miss; only a blank key is an error.
    pub async fn try_get<T: CacheType>(&self, key: &str) -> Result<Option<T>> {
        ensure_key(key)?;
        let Some(store) = &self.store else {
            return Ok(None);
        };

        let key = self.namespace.key(key)?;
        let value = match self.read::<T>(store.as_ref(), &key).await {
            Ok(value) => value,
            Err(e) => {
                self.logger
                    .error_with_cause(&format!("Cache TryGet failed for key {}", key), &e);
                return Ok(None);
            }
        };

        Ok(value.filter(|v| *v != T::default()))
    }

    async fn read<T: CacheType>(&self, store: &dyn KeyValueStore, key: &str) -> Result<Option<T>> {
        match store.get(key).await? {
            Some(raw) => Ok(Some(self.serializer.deserialize(&raw)?)),
            None => Ok(None),
        }
    }

    // == Remove ==
    /// Deletes `key` without waiting for the store.
    pub fn remove(&self, key: &str) -> Result<()> {
        ensure_key(key)?;
        let Some(store) = &self.store else {
            return Ok(());
        };

        store.delete_detached(self.namespace.key(key)?);
        Ok(())
    }

    // == Contains Key ==
    /// Whether an entry exists under `key`. Store failures are logged and read as `false`.
    pub async fn contains_key(&self, key: &str) -> Result<bool> {
        ensure_key(key)?;
        let Some(store) = &self.store else {
            return Ok(false);
        };

        let key = self.namespace.key(key)?;
        match store.exists(&key).await {
            Ok(exists) => Ok(exists),
            Err(e) => {
                self.logger
                    .error_with_cause(&format!("Cache exists check failed for key {}", key), &e);
                Ok(false)
            }
        }
    }

    // == Dispose ==
    /// Releases the store connection. The repository is inactive afterwards.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.store = None;
        self.disposed = true;
        self.logger.debug("Cache repository disposed");
    }
}

impl<S: Serializer> std::fmt::Debug for CacheRepository<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheRepository")
            .field("namespace", &self.namespace)
            .field("active", &self.is_active())
            .field("disposed", &self.disposed)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
