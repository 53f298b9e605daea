//! Request DTOs for the book review API
//!
//! Defines the structure of incoming HTTP request bodies, their validation
//! rules, and the explicit field merges used by partial updates.

use serde::{Deserialize, Deserializer};

use crate::models::{Book, Review};

// == Validation Limits ==
/// Lowest accepted review rating
pub const MIN_RATING: i64 = 1;
/// Highest accepted review rating
pub const MAX_RATING: i64 = 5;

fn check_required(field: &str, value: &str) -> Option<String> {
    if value.trim().is_empty() {
        Some(format!("{} cannot be empty", field))
    } else {
        None
    }
}

fn check_rating(rating: i64) -> Option<String> {
    if (MIN_RATING..=MAX_RATING).contains(&rating) {
        None
    } else {
        Some(format!(
            "Rating must be between {} and {}, got {}",
            MIN_RATING, MAX_RATING, rating
        ))
    }
}

/// Distinguishes an explicit `null` (`Some(None)`) from an absent field
/// (`None`, via `#[serde(default)]`).
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Request body for creating (POST /books) or fully replacing
/// (PUT /books/:book_id) a book.
#[derive(Debug, Clone, Deserialize)]
pub struct BookCreate {
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl BookCreate {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        check_required("Title", &self.title).or_else(|| check_required("Author", &self.author))
    }
}

/// Request body for PATCH /books/:book_id
///
/// Every field is optional; only the ones present are applied. An explicit
/// `"description": null` clears the description.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
}

impl BookPatch {
    pub fn validate(&self) -> Option<String> {
        if let Some(title) = &self.title {
            if let Some(msg) = check_required("Title", title) {
                return Some(msg);
            }
        }
        if let Some(author) = &self.author {
            if let Some(msg) = check_required("Author", author) {
                return Some(msg);
            }
        }
        None
    }

    /// Assigns each present field onto `book`, leaving the others untouched.
    pub fn merge_into(self, book: &mut Book) {
        let BookPatch {
            title,
            author,
            description,
        } = self;

        if let Some(title) = title {
            book.title = title;
        }
        if let Some(author) = author {
            book.author = author;
        }
        if let Some(description) = description {
            book.description = description;
        }
    }
}

/// Request body for creating (POST /books/:book_id/reviews) or fully
/// replacing (PUT /books/:book_id/reviews/:review_id) a review.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewCreate {
    pub reviewer_name: String,
    pub content: String,
    pub rating: i64,
}

impl ReviewCreate {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        check_required("Reviewer name", &self.reviewer_name)
            .or_else(|| check_rating(self.rating))
    }
}

/// Request body for PATCH /books/:book_id/reviews/:review_id
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewPatch {
    #[serde(default)]
    pub reviewer_name: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub rating: Option<i64>,
}

impl ReviewPatch {
    pub fn validate(&self) -> Option<String> {
        if let Some(name) = &self.reviewer_name {
            if let Some(msg) = check_required("Reviewer name", name) {
                return Some(msg);
            }
        }
        self.rating.and_then(check_rating)
    }

    /// Assigns each present field onto `review`, leaving the others untouched.
    pub fn merge_into(self, review: &mut Review) {
        let ReviewPatch {
            reviewer_name,
            content,
            rating,
        } = self;

        if let Some(reviewer_name) = reviewer_name {
            review.reviewer_name = reviewer_name;
        }
        if let Some(content) = content {
            review.content = content;
        }
        if let Some(rating) = rating {
            review.rating = rating;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_book() -> Book {
        Book {
            id: 1,
            title: "Old Title".to_string(),
            author: "Old Author".to_string(),
            description: Some("Old description".to_string()),
            reviews: Vec::new(),
        }
    }

    fn sample_review() -> Review {
        Review {
            id: 4,
            book_id: 1,
            reviewer_name: "sam".to_string(),
            content: "fine".to_string(),
            rating: 3,
        }
    }

    #[test]
    fn test_book_create_deserialize() {
        let json = r#"{"title": "T", "author": "A"}"#;
        let req: BookCreate = serde_json::from_str(json).unwrap();
        assert_eq!(req.title, "T");
        assert!(req.description.is_none());
        assert!(req.validate().is_none());
    }

    #[test]
    fn test_book_create_empty_title() {
        let req = BookCreate {
            title: "  ".to_string(),
            author: "A".to_string(),
            description: None,
        };
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_review_rating_bounds() {
        for (rating, valid) in [(0, false), (1, true), (5, true), (6, false)] {
            let req = ReviewCreate {
                reviewer_name: "r".to_string(),
                content: "c".to_string(),
                rating,
            };
            assert_eq!(req.validate().is_none(), valid, "rating {}", rating);
        }
    }

    #[test]
    fn test_review_patch_rejects_out_of_range_rating() {
        let patch = ReviewPatch {
            rating: Some(6),
            ..Default::default()
        };
        assert!(patch.validate().is_some());

        let patch = ReviewPatch {
            content: Some("better".to_string()),
            ..Default::default()
        };
        assert!(patch.validate().is_none());
    }

    #[test]
    fn test_book_patch_merges_present_fields_only() {
        let mut book = sample_book();
        let patch: BookPatch = serde_json::from_str(r#"{"title": "New Title"}"#).unwrap();
        patch.merge_into(&mut book);

        assert_eq!(book.title, "New Title");
        assert_eq!(book.author, "Old Author");
        assert_eq!(book.description.as_deref(), Some("Old description"));
    }

    #[test]
    fn test_book_patch_null_description_clears_it() {
        let mut book = sample_book();
        let patch: BookPatch = serde_json::from_str(r#"{"description": null}"#).unwrap();
        assert_eq!(patch.description, Some(None));

        patch.merge_into(&mut book);

        assert!(book.description.is_none());
        assert_eq!(book.title, "Old Title");
    }

    #[test]
    fn test_book_patch_sets_description() {
        let mut book = sample_book();
        let patch: BookPatch = serde_json::from_str(r#"{"description": "New"}"#).unwrap();
        patch.merge_into(&mut book);

        assert_eq!(book.description.as_deref(), Some("New"));
    }

    #[test]
    fn test_empty_book_patch_is_noop() {
        let mut book = sample_book();
        BookPatch::default().merge_into(&mut book);
        assert_eq!(book, sample_book());
    }

    #[test]
    fn test_review_patch_merges_present_fields_only() {
        let mut review = sample_review();
        let patch = ReviewPatch {
            rating: Some(5),
            ..Default::default()
        };
        patch.merge_into(&mut review);

        assert_eq!(review.rating, 5);
        assert_eq!(review.content, "fine");
        assert_eq!(review.reviewer_name, "sam");
    }
}
