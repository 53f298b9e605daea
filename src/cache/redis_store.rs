//! Redis Backend Module
//!
//! Network key/value store. Every round trip is bounded by a connect timeout
//! and a response timeout so a degraded Redis answers with an error promptly
//! instead of stalling the request.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{Client, Cmd, FromRedisValue};
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::cache::backend::{KeyValueStore, KvError};
use crate::cache::MAX_TTL;

/// Connection settings for [`RedisStore`].
#[derive(Debug, Clone)]
pub struct RedisSettings {
    pub host: String,
    pub port: u16,
    /// Logical database index
    pub db: i64,
    pub connect_timeout: Duration,
    pub response_timeout: Duration,
}

impl RedisSettings {
    pub fn url(&self) -> String {
        format!("redis://{}:{}/{}", self.host, self.port, self.db)
    }
}

// == Connection Slot ==
/// The shared connection, tagged with the generation that opened it.
///
/// The lock is only held for bookkeeping, never across a network await.
struct ConnectionSlot<C> {
    inner: Mutex<Option<(u64, C)>>,
    next_generation: AtomicU64,
}

impl<C: Clone> ConnectionSlot<C> {
    fn new() -> Self {
        Self {
            inner: Mutex::new(None),
            next_generation: AtomicU64::new(0),
        }
    }

    async fn current(&self) -> Option<(u64, C)> {
        self.inner.lock().await.clone()
    }

    /// Stores `conn` unless another caller got there first, in which case
    /// the stored connection wins and `conn` is dropped.
    async fn install(&self, conn: C) -> (u64, C) {
        let mut slot = self.inner.lock().await;
        if let Some(existing) = slot.as_ref() {
            return existing.clone();
        }
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        *slot = Some((generation, conn.clone()));
        (generation, conn)
    }

    /// Drops the stored connection only if it is still `generation`.
    async fn invalidate(&self, generation: u64) -> bool {
        let mut slot = self.inner.lock().await;
        if slot.as_ref().is_some_and(|(current, _)| *current == generation) {
            *slot = None;
            true
        } else {
            false
        }
    }
}

// == Redis Store ==
/// Redis-backed key/value store.
///
/// Holds one multiplexed connection, opened lazily and dropped after a
/// failed command so the next call reconnects. Concurrent callers that find
/// no connection each dial on their own, so a dead server costs every caller
/// at most one connect timeout.
pub struct RedisStore {
    client: Client,
    slot: ConnectionSlot<MultiplexedConnection>,
    connect_timeout: Duration,
    response_timeout: Duration,
}

impl RedisStore {
    /// Creates a store for the given settings. Does not connect.
    pub fn new(settings: &RedisSettings) -> Result<Self, KvError> {
        let client =
            Client::open(settings.url()).map_err(|e| KvError::Connection(e.to_string()))?;

        Ok(Self {
            client,
            slot: ConnectionSlot::new(),
            connect_timeout: settings.connect_timeout,
            response_timeout: settings.response_timeout,
        })
    }

    async fn connection(&self) -> Result<(u64, MultiplexedConnection), KvError> {
        if let Some(current) = self.slot.current().await {
            return Ok(current);
        }

        let conn = timeout(
            self.connect_timeout,
            self.client.get_multiplexed_async_connection(),
        )
        .await
        .map_err(|_| KvError::Timeout(self.connect_timeout))?
        .map_err(|e| KvError::Connection(e.to_string()))?;

        let (generation, conn) = self.slot.install(conn).await;
        debug!(generation, "Connected to redis");
        Ok((generation, conn))
    }

    async fn run<T>(&self, cmd: Cmd) -> Result<T, KvError>
    where
        T: FromRedisValue + Send,
    {
        let (generation, mut conn) = self.connection().await?;

        match timeout(self.response_timeout, cmd.query_async::<_, T>(&mut conn)).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                warn!(error = %e, generation, "Redis command failed, dropping connection");
                self.slot.invalidate(generation).await;
                Err(KvError::Command(e.to_string()))
            }
            Err(_) => {
                warn!(timeout = ?self.response_timeout, generation, "Redis command timed out, dropping connection");
                self.slot.invalidate(generation).await;
                Err(KvError::Timeout(self.response_timeout))
            }
        }
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KvError> {
        let mut cmd = redis::cmd("GET");
        cmd.arg(key);
        self.run::<Option<Vec<u8>>>(cmd).await
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), KvError> {
        // EX takes whole seconds and rejects zero
        let seconds = ttl.min(MAX_TTL).as_secs().max(1);
        let mut cmd = redis::cmd("SET");
        cmd.arg(key).arg(value).arg("EX").arg(seconds);
        self.run::<()>(cmd).await
    }

    async fn delete(&self, key: &str) -> Result<(), KvError> {
        let mut cmd = redis::cmd("DEL");
        cmd.arg(key);
        self.run::<i64>(cmd).await.map(|_| ())
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}
