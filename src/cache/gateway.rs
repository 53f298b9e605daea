//! Cache Gateway Module
//!
//! Typed get/set/delete over a [`KeyValueStore`]. Reads report a broken
//! store as [`CacheError::Unavailable`] so callers can tell "not cached" from
//! "cache broken". Writes report failures as [`CacheError::WriteFailure`];
//! callers treat those as best-effort and discard them.
//!
//! Every round trip is bounded by the gateway's operation timeout, whatever
//! the backend does internally.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::cache::backend::{KeyValueStore, KvError};
use crate::cache::{codec, DEFAULT_OPERATION_TIMEOUT};

// == Cache Error ==
#[derive(Error, Debug)]
pub enum CacheError {
    /// The store could not answer a read
    #[error("Cache service unavailable: {0}")]
    Unavailable(#[source] KvError),

    /// The store could not apply a set or delete
    #[error("Cache write failed: {0}")]
    WriteFailure(#[source] KvError),

    /// The value could not be serialized
    #[error("Cache snapshot encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

// == Cache Gateway ==
/// Cloneable handle to the cache store.
#[derive(Clone)]
pub struct CacheGateway {
    store: Arc<dyn KeyValueStore>,
    op_timeout: Duration,
}

impl CacheGateway {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            op_timeout: DEFAULT_OPERATION_TIMEOUT,
        }
    }

    /// Replaces the per-operation timeout.
    pub fn with_timeout(mut self, op_timeout: Duration) -> Self {
        self.op_timeout = op_timeout;
        self
    }

    pub fn operation_timeout(&self) -> Duration {
        self.op_timeout
    }

    async fn bounded<T>(
        &self,
        op: impl Future<Output = Result<T, KvError>>,
    ) -> Result<T, KvError> {
        match timeout(self.op_timeout, op).await {
            Ok(result) => result,
            Err(_) => Err(KvError::Timeout(self.op_timeout)),
        }
    }

    /// Fetches and decodes the value stored under `key`.
    ///
    /// A stored payload that does not decode is reported as absent: the store
    /// answered, the snapshot is just unusable.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        let bytes = match self.bounded(self.store.get(key)).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return Ok(None),
            Err(e) => {
                warn!(key, backend = self.store.name(), error = %e, "Cache read failed");
                return Err(CacheError::Unavailable(e));
            }
        };

        match codec::decode(&bytes) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(key, error = %e, "Discarding undecodable cache payload");
                Ok(None)
            }
        }
    }

    /// Encodes `value` and stores it under `key` for `ttl`.
    pub async fn set<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let bytes = codec::encode(value)?;
        self.bounded(self.store.set(key, bytes, ttl))
            .await
            .map_err(CacheError::WriteFailure)?;
        debug!(key, ttl_secs = ttl.as_secs(), "Cache populated");
        Ok(())
    }

    /// Removes `key`.
    pub async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.bounded(self.store.delete(key))
            .await
            .map_err(CacheError::WriteFailure)?;
        debug!(key, "Cache key deleted");
        Ok(())
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.name()
    }
}
