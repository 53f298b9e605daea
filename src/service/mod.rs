//! Service Module
//!
//! Request-scoped operations over the database and the listing cache.
//!
//! # Services
//! - `BookService`: cache-aside listing and book writes (each invalidates the listing)
//! - `ReviewService`: review reads and writes (never touch the cache)

mod books;
mod invalidation;
mod reviews;

pub use books::BookService;
pub use reviews::ReviewService;
