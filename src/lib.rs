//! Book Reviews - A CRUD service for books and their reviews
//!
//! Books and reviews live in SQLite; the full book listing is cached
//! cache-aside in Redis (or an in-process store) and invalidated on every
//! book write.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod store;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use tasks::spawn_cleanup_task;
