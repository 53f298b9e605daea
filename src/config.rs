//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::{RedisSettings, MAX_TTL};

/// Which key/value store backs the listing cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    Redis,
    Memory,
}

impl FromStr for CacheBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redis" => Ok(CacheBackend::Redis),
            "memory" => Ok(CacheBackend::Memory),
            other => Err(format!("unknown cache backend '{}'", other)),
        }
    }
}

/// What the listing read does when the cache cannot be reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadFailurePolicy {
    /// Surface the outage as 503
    FailClosed,
    /// Log the outage and read from the database
    FallThrough,
}

impl FromStr for ReadFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail_closed" => Ok(ReadFailurePolicy::FailClosed),
            "fall_through" => Ok(ReadFailurePolicy::FallThrough),
            other => Err(format!("unknown read failure policy '{}'", other)),
        }
    }
}

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// SQLite database path, or `:memory:`
    pub database_url: String,
    pub cache_backend: CacheBackend,
    pub redis_host: String,
    pub redis_port: u16,
    /// Redis logical database index
    pub redis_db: i64,
    /// Lifetime of the listing snapshot in seconds
    pub cache_ttl: u64,
    /// Connect and response timeout for cache calls in milliseconds
    pub cache_timeout_ms: u64,
    pub read_failure_policy: ReadFailurePolicy,
    /// Memory backend sweep interval in seconds
    pub cleanup_interval: u64,
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 8000)
    /// - `DATABASE_URL` - SQLite path (default: ./book_review.db)
    /// - `CACHE_BACKEND` - `redis` or `memory` (default: redis)
    /// - `REDIS_HOST` / `REDIS_PORT` / `REDIS_DB` - (default: localhost / 6379 / 0)
    /// - `CACHE_TTL` - Listing TTL in seconds (default: 3600)
    /// - `CACHE_TIMEOUT_MS` - Cache connect/response timeout (default: 1000)
    /// - `CACHE_READ_FAILURE_POLICY` - `fail_closed` or `fall_through` (default: fail_closed)
    /// - `CLEANUP_INTERVAL` - Memory backend sweep in seconds (default: 1)
    ///
    /// Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: env_or("SERVER_PORT", defaults.server_port),
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            cache_backend: env_or("CACHE_BACKEND", defaults.cache_backend),
            redis_host: env::var("REDIS_HOST").unwrap_or(defaults.redis_host),
            redis_port: env_or("REDIS_PORT", defaults.redis_port),
            redis_db: env_or("REDIS_DB", defaults.redis_db),
            cache_ttl: env_or("CACHE_TTL", defaults.cache_ttl),
            cache_timeout_ms: env_or("CACHE_TIMEOUT_MS", defaults.cache_timeout_ms),
            read_failure_policy: env_or("CACHE_READ_FAILURE_POLICY", defaults.read_failure_policy),
            cleanup_interval: env_or("CLEANUP_INTERVAL", defaults.cleanup_interval),
        }
    }

    /// Listing TTL, clamped to [`MAX_TTL`].
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl).min(MAX_TTL)
    }

    /// Bound on a single cache round trip.
    pub fn cache_timeout(&self) -> Duration {
        Duration::from_millis(self.cache_timeout_ms)
    }

    pub fn redis_settings(&self) -> RedisSettings {
        let timeout = self.cache_timeout();
        RedisSettings {
            host: self.redis_host.clone(),
            port: self.redis_port,
            db: self.redis_db,
            connect_timeout: timeout,
            response_timeout: timeout,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 8000,
            database_url: "./book_review.db".to_string(),
            cache_backend: CacheBackend::Redis,
            redis_host: "localhost".to_string(),
            redis_port: 6379,
            redis_db: 0,
            cache_ttl: 3600,
            cache_timeout_ms: 1000,
            read_failure_policy: ReadFailurePolicy::FailClosed,
            cleanup_interval: 1,
        }
    }
}
