//! Key/Value Backend Module
//!
//! The narrow interface the cache gateway needs from a key/value store.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

// == Backend Error ==
/// Transport-level failure talking to a key/value store.
#[derive(Error, Debug)]
pub enum KvError {
    /// Could not establish a connection to the store
    #[error("connection failed: {0}")]
    Connection(String),

    /// The store was reached but the command failed
    #[error("command failed: {0}")]
    Command(String),

    /// The store did not answer in time
    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

// == Key/Value Store ==
/// A byte-oriented key/value store with per-key expiration.
///
/// Implementations must be safe to share between request tasks.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored bytes, or `None` if the key is absent or expired.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KvError>;

    /// Stores `value` under `key`, expiring after `ttl`.
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), KvError>;

    /// Removes `key`. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<(), KvError>;

    /// Short backend name for log output.
    fn name(&self) -> &'static str;
}
