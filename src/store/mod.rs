//! Persistent Store Module
//!
//! SQLite system of record for books and reviews.

mod books;
mod database;
mod reviews;

pub use database::{Database, StoreError, IN_MEMORY};
