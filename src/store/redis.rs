//! Redis Store Module
//!
//! [`KeyValueStore`] over a single multiplexed Redis connection. Every command,
//! awaited or detached, is queued on one channel and issued by a single driver
//! task, so the server sees commands in the order callers issued them.

use std::sync::Arc;
use std::time::Duration;

use ::redis::{aio::MultiplexedConnection, Client, Cmd, FromRedisValue, RedisResult, Value};
use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::{ConnectionDescriptor, Connector, KeyValueStore, SetCondition};
use crate::error::StoreError;

// == Queued Command ==
/// A command waiting for the driver, with an optional reply slot.
struct QueuedCommand {
    cmd: Cmd,
    /// `None` for detached commands
    reply: Option<oneshot::Sender<RedisResult<Value>>>,
}

// == Redis Store ==
/// Redis-backed store client.
#[derive(Clone)]
pub struct RedisStore {
    queue: mpsc::UnboundedSender<QueuedCommand>,
}

impl RedisStore {
    // == Connect ==
    /// Opens a multiplexed connection, verifies it with `PING` and starts the
    /// command driver.
    ///
    /// Must be called from within a tokio runtime. The driver stops once every
    /// clone of the store has been dropped.
    pub async fn connect(descriptor: &ConnectionDescriptor) -> Result<Self, StoreError> {
        let client = Client::open(descriptor.connection_info().clone())
            .map_err(|e| StoreError::Connection(format!("failed to create client: {}", e)))?;

        let mut connection = timeout(
            descriptor.connect_timeout(),
            client.get_multiplexed_async_connection(),
        )
        .await
        .map_err(|_| StoreError::Timeout(descriptor.connect_timeout()))?
        .map_err(|e| StoreError::Connection(e.to_string()))?;

        let pong: String = ::redis::cmd("PING")
            .query_async(&mut connection)
            .await
            .map_err(|e| StoreError::Connection(format!("ping failed: {}", e)))?;

        if pong != "PONG" {
            return Err(StoreError::Connection(format!(
                "unexpected ping reply '{}'",
                pong
            )));
        }

        let (queue, commands) = mpsc::unbounded_channel();
        tokio::spawn(drive(connection, commands));

        info!("Redis connection established");
        Ok(Self { queue })
    }

    fn set_command(key: &str, value: &str, ttl: Duration, condition: SetCondition) -> Cmd {
        let mut cmd = ::redis::cmd("SET");
        cmd.arg(key).arg(value).arg("PX").arg(ttl_millis(ttl));
        if condition == SetCondition::NotExists {
            cmd.arg("NX");
        }
        cmd
    }

    /// Queues `cmd` and waits for its reply.
    async fn query<T: FromRedisValue>(&self, cmd: Cmd) -> Result<T, StoreError> {
        let (reply, response) = oneshot::channel();
        self.queue
            .send(QueuedCommand {
                cmd,
                reply: Some(reply),
            })
            .map_err(|_| StoreError::Unavailable("command driver stopped".to_string()))?;

        let value = response
            .await
            .map_err(|_| StoreError::Unavailable("command driver dropped the reply".to_string()))??;
        Ok(T::from_owned_redis_value(value)?)
    }

    /// Queues `cmd` without waiting for its reply.
    fn dispatch(&self, cmd: Cmd, action: &str, key: &str) {
        if self.queue.send(QueuedCommand { cmd, reply: None }).is_err() {
            warn!("Detached {} dropped for {}: command driver stopped", action, key);
        }
    }
}

// == Command Driver ==
/// Issues queued commands one at a time, in queue order.
async fn drive(
    mut connection: MultiplexedConnection,
    mut commands: mpsc::UnboundedReceiver<QueuedCommand>,
) {
    while let Some(QueuedCommand { cmd, reply }) = commands.recv().await {
        let result: RedisResult<Value> = cmd.query_async(&mut connection).await;
        match reply {
            Some(reply) => {
                // The caller may have given up waiting.
                let _ = reply.send(result);
            }
            None => match result {
                Ok(_) => debug!("Detached command applied"),
                Err(e) => warn!("Detached command failed: {}", e),
            },
        }
    }
    debug!("Redis command driver stopped");
}

/// Redis rejects a zero expiry, so sub-millisecond TTLs round up to 1 ms.
fn ttl_millis(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1)
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut cmd = ::redis::cmd("GET");
        cmd.arg(key);
        self.query(cmd).await
    }

    async fn set(
        &self,
        key: &str,
        value: String,
        ttl: Duration,
        condition: SetCondition,
    ) -> Result<bool, StoreError> {
        // NX replies nil when the key already exists.
        let reply: Option<String> = self
            .query(Self::set_command(key, &value, ttl, condition))
            .await?;
        Ok(reply.is_some())
    }

    fn set_detached(&self, key: String, value: String, ttl: Duration) {
        let cmd = Self::set_command(&key, &value, ttl, SetCondition::Always);
        self.dispatch(cmd, "SET", &key);
    }

    async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        let mut cmd = ::redis::cmd("DEL");
        cmd.arg(key);
        let removed: i64 = self.query(cmd).await?;
        Ok(removed > 0)
    }

    fn delete_detached(&self, key: String) {
        let mut cmd = ::redis::cmd("DEL");
        cmd.arg(&key);
        self.dispatch(cmd, "DEL", &key);
    }

    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        let mut cmd = ::redis::cmd("EXISTS");
        cmd.arg(key);
        let count: i64 = self.query(cmd).await?;
        Ok(count > 0)
    }
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore").finish_non_exhaustive()
    }
}

// == Redis Connector ==
/// Connects to Redis from a connection descriptor.
#[derive(Debug, Clone, Copy, Default)]
pub struct RedisConnector;

#[async_trait]
impl Connector for RedisConnector {
    async fn connect(&self, descriptor: &str) -> Result<Arc<dyn KeyValueStore>, StoreError> {
        let descriptor = ConnectionDescriptor::parse(descriptor)?;
        let store: Arc<dyn KeyValueStore> = Arc::new(RedisStore::connect(&descriptor).await?);
        Ok(store)
    }
}
