//! Response DTOs for the book review API
//!
//! Defines the structure of outgoing HTTP response bodies that are not plain
//! entities.

use serde::Serialize;

use crate::cache::ListingStats;

/// Response body for DELETE /books/:book_id and DELETE /books/:book_id/reviews/:review_id
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    /// Id of the deleted entity
    pub id: i64,
}

impl DeleteResponse {
    /// Creates a new DeleteResponse for the given entity kind and id
    pub fn new(kind: &str, id: i64) -> Self {
        Self {
            message: format!("{} {} deleted successfully", kind, id),
            id,
        }
    }
}

/// Response body for DELETE /reset
#[derive(Debug, Clone, Serialize)]
pub struct ResetResponse {
    pub books_deleted: usize,
    pub reviews_deleted: usize,
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Listing reads answered from the cache
    pub hits: u64,
    /// Listing reads that fell through to the database
    pub misses: u64,
    /// Listing reads where the cache could not be reached
    pub read_failures: u64,
    /// Populate attempts the cache rejected
    pub populate_failures: u64,
    /// Invalidations the cache rejected
    pub invalidation_failures: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<ListingStats> for StatsResponse {
    fn from(stats: ListingStats) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            read_failures: stats.read_failures,
            populate_failures: stats.populate_failures,
            invalidation_failures: stats.invalidation_failures,
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
