//! Entities and DTOs for the book review service
//!
//! `book` holds the persistent entities; `requests` and `responses` define
//! the HTTP request and response bodies.

pub mod book;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use book::{Book, Review};
pub use requests::{BookCreate, BookPatch, ReviewCreate, ReviewPatch, MAX_RATING, MIN_RATING};
pub use responses::{
    DeleteResponse, ErrorResponse, HealthResponse, ResetResponse, StatsResponse,
};
