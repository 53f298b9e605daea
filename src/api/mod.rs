//! API Module
//!
//! HTTP handlers and routing for the book review REST API.
//!
//! # Endpoints
//! - `GET /books` - List all books with reviews (cache-aside)
//! - `POST /books` - Create a book
//! - `GET|PUT|PATCH|DELETE /books/:book_id` - Read, replace, update or delete a book
//! - `GET|POST /books/:book_id/reviews` - List or create reviews for a book
//! - `GET|PUT|PATCH|DELETE /books/:book_id/reviews/:review_id` - Single review
//! - `DELETE /reset` - Delete everything
//! - `GET /stats` - Listing cache statistics
//! - `GET /health` - Health check endpoint
//!
//! Every error, including malformed bodies, bad path parameters and unknown
//! routes, renders as `{"error": "..."}`.

pub mod extract;
pub mod handlers;
pub mod routes;

pub use extract::{AppJson, AppPath};
pub use handlers::*;
pub use routes::create_router;
