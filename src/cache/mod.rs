//! Cache Module
//!
//! The cache gateway plus the key/value backends it can sit on: Redis for
//! deployments, an in-process store for local runs and tests.

mod backend;
mod codec;
mod entry;
mod gateway;
mod memory;
mod redis_store;
mod stats;


use std::time::Duration;

// Re-export public types
pub use backend::{KeyValueStore, KvError};
pub use codec::{decode, encode};
pub use entry::CacheEntry;
pub use gateway::{CacheError, CacheGateway};
pub use memory::MemoryStore;
pub use redis_store::{RedisSettings, RedisStore};
pub use stats::{ListingCounters, ListingStats};

// == Public Constants ==
/// Key under which the full book listing snapshot is stored
pub const LISTING_KEY: &str = "all_books";

/// Default lifetime of the listing snapshot
pub const DEFAULT_LISTING_TTL: Duration = Duration::from_secs(3600);

/// Longest lifetime any backend is asked to honour; longer TTLs are clamped
pub const MAX_TTL: Duration = Duration::from_secs(10 * 365 * 24 * 60 * 60);

/// Default bound on a single cache round trip
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_millis(1000);
