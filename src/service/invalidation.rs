//! Listing invalidation
//!
//! Book writes drop the cached listing once the database write has committed.
//! Review writes do not call this: the listing embeds reviews, so after a
//! review write a cached listing can show stale reviews until its TTL runs
//! out or the next book write invalidates it.

use tracing::{debug, warn};

use crate::cache::{CacheGateway, ListingCounters, LISTING_KEY};

/// Deletes the listing snapshot. A cache failure is counted and logged and
/// never reaches the caller; the committed write stands either way.
pub(crate) async fn invalidate_listing(cache: &CacheGateway, counters: &ListingCounters) {
    match cache.delete(LISTING_KEY).await {
        Ok(()) => debug!("Listing cache invalidated"),
        Err(e) => {
            counters.record_invalidation_failure();
            warn!(error = %e, "Listing invalidation failed, cached listing may be stale until TTL");
        }
    }
}
