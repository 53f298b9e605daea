//! Cache Entry Module
//!
//! Defines the structure for individual entries of the in-process backend.

use std::time::{Duration, Instant};

use crate::cache::MAX_TTL;

// == Cache Entry ==
/// A stored value with its expiration deadline.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored bytes
    pub value: Vec<u8>,
    /// Instant after which the entry is no longer served
    pub expires_at: Instant,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry that expires `ttl` from now.
    ///
    /// TTLs beyond [`MAX_TTL`] are clamped to it.
    pub fn new(value: Vec<u8>, ttl: Duration) -> Self {
        let now = Instant::now();
        let expires_at = now.checked_add(ttl.min(MAX_TTL)).unwrap_or(now);
        Self { value, expires_at }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current instant reaches its deadline, so a
    /// zero TTL produces an entry that is never served.
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }

    // == Time To Live ==
    /// Returns the remaining lifetime, saturating at zero.
    pub fn ttl_remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_entry_creation() {
        let entry = CacheEntry::new(b"payload".to_vec(), Duration::from_secs(60));

        assert_eq!(entry.value, b"payload");
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_expiration() {
        let entry = CacheEntry::new(b"payload".to_vec(), Duration::from_millis(50));

        assert!(!entry.is_expired());

        sleep(Duration::from_millis(80));

        assert!(entry.is_expired());
        assert_eq!(entry.ttl_remaining(), Duration::ZERO);
    }

    #[test]
    fn test_ttl_remaining() {
        let entry = CacheEntry::new(Vec::new(), Duration::from_secs(10));

        let remaining = entry.ttl_remaining();
        assert!(remaining <= Duration::from_secs(10));
        assert!(remaining >= Duration::from_secs(9));
    }

    #[test]
    fn test_huge_ttl_is_clamped() {
        let entry = CacheEntry::new(Vec::new(), Duration::from_secs(u64::MAX));

        assert!(!entry.is_expired());
        assert!(entry.ttl_remaining() <= MAX_TTL);
        assert!(entry.ttl_remaining() > MAX_TTL - Duration::from_secs(5));
    }

    #[test]
    fn test_zero_ttl_is_expired_immediately() {
        let entry = CacheEntry::new(Vec::new(), Duration::ZERO);
        assert!(entry.is_expired(), "Entry should be expired at boundary");
    }
}
