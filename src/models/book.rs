//! Persistent entities
//!
//! Books and reviews as they come out of the relational store. These are the
//! shapes that get serialized into the cached listing snapshot.

use serde::{Deserialize, Serialize};

// == Review ==
/// A single review attached to a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    pub book_id: i64,
    pub reviewer_name: String,
    pub content: String,
    /// Always within `MIN_RATING..=MAX_RATING` once persisted
    pub rating: i64,
}

// == Book ==
/// A book together with its reviews, ordered by review id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub reviews: Vec<Review>,
}
