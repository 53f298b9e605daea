//! Listing Statistics Module
//!
//! Counts how the book listing cache behaves: hits, misses, and the cache
//! failures that were surfaced or swallowed.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Listing Counters ==
/// Shared, lock-free counters updated by request tasks.
#[derive(Debug, Default)]
pub struct ListingCounters {
    hits: AtomicU64,
    misses: AtomicU64,
    read_failures: AtomicU64,
    populate_failures: AtomicU64,
    invalidation_failures: AtomicU64,
}

impl ListingCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_read_failure(&self) {
        self.read_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_populate_failure(&self) {
        self.populate_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_invalidation_failure(&self) {
        self.invalidation_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time copy of all counters.
    pub fn snapshot(&self) -> ListingStats {
        ListingStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            read_failures: self.read_failures.load(Ordering::Relaxed),
            populate_failures: self.populate_failures.load(Ordering::Relaxed),
            invalidation_failures: self.invalidation_failures.load(Ordering::Relaxed),
        }
    }
}

// == Listing Stats ==
/// Snapshot of [`ListingCounters`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListingStats {
    pub hits: u64,
    pub misses: u64,
    pub read_failures: u64,
    pub populate_failures: u64,
    pub invalidation_failures: u64,
}

impl ListingStats {
    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no reads were answered.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_start_at_zero() {
        let counters = ListingCounters::new();
        assert_eq!(counters.snapshot(), ListingStats::default());
    }

    #[test]
    fn test_counters_record() {
        let counters = ListingCounters::new();
        counters.record_hit();
        counters.record_hit();
        counters.record_miss();
        counters.record_read_failure();
        counters.record_populate_failure();
        counters.record_invalidation_failure();
        counters.record_invalidation_failure();

        let stats = counters.snapshot();
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.read_failures, 1);
        assert_eq!(stats.populate_failures, 1);
        assert_eq!(stats.invalidation_failures, 2);
    }

    #[test]
    fn test_hit_rate_no_requests() {
        assert_eq!(ListingStats::default().hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let stats = ListingStats {
            hits: 1,
            misses: 1,
            ..Default::default()
        };
        assert_eq!(stats.hit_rate(), 0.5);
    }

    #[test]
    fn test_read_failures_do_not_affect_hit_rate() {
        let stats = ListingStats {
            hits: 1,
            read_failures: 10,
            ..Default::default()
        };
        assert_eq!(stats.hit_rate(), 1.0);
    }
}
