//! API Handlers
//!
//! HTTP request handlers for each book review endpoint.

use axum::{extract::State, Json};

use super::extract::{AppJson, AppPath};

use crate::cache::CacheGateway;
use crate::config::Config;
use crate::error::{Result, ServiceError};
use crate::models::{
    Book, BookCreate, BookPatch, DeleteResponse, HealthResponse, ResetResponse, Review,
    ReviewCreate, ReviewPatch, StatsResponse,
};
use crate::service::{BookService, ReviewService};
use crate::store::Database;

/// Application state shared across all handlers.
///
/// Built once at startup from the database and cache handles; every clone
/// shares them.
#[derive(Clone)]
pub struct AppState {
    pub books: BookService,
    pub reviews: ReviewService,
}

impl AppState {
    /// Creates a new AppState with default listing TTL and read policy.
    pub fn new(db: Database, cache: CacheGateway) -> Self {
        Self {
            books: BookService::new(db.clone(), cache),
            reviews: ReviewService::new(db),
        }
    }

    /// Creates a new AppState, taking the listing TTL and read policy from
    /// the configuration.
    pub fn from_config(config: &Config, db: Database, cache: CacheGateway) -> Self {
        Self {
            books: BookService::new(db.clone(), cache)
                .with_ttl(config.cache_ttl())
                .with_read_failure_policy(config.read_failure_policy),
            reviews: ReviewService::new(db),
        }
    }
}

// == Books ==

/// Handler for GET /books
pub async fn list_books_handler(State(state): State<AppState>) -> Result<Json<Vec<Book>>> {
    Ok(Json(state.books.list_books().await?))
}

/// Handler for POST /books
pub async fn create_book_handler(
    State(state): State<AppState>,
    AppJson(req): AppJson<BookCreate>,
) -> Result<Json<Book>> {
    Ok(Json(state.books.create_book(req).await?))
}

/// Handler for GET /books/:book_id
pub async fn get_book_handler(
    State(state): State<AppState>,
    AppPath(book_id): AppPath<i64>,
) -> Result<Json<Book>> {
    Ok(Json(state.books.get_book(book_id).await?))
}

/// Handler for PUT /books/:book_id
pub async fn replace_book_handler(
    State(state): State<AppState>,
    AppPath(book_id): AppPath<i64>,
    AppJson(req): AppJson<BookCreate>,
) -> Result<Json<Book>> {
    Ok(Json(state.books.replace_book(book_id, req).await?))
}

/// Handler for PATCH /books/:book_id
pub async fn patch_book_handler(
    State(state): State<AppState>,
    AppPath(book_id): AppPath<i64>,
    AppJson(patch): AppJson<BookPatch>,
) -> Result<Json<Book>> {
    Ok(Json(state.books.patch_book(book_id, patch).await?))
}

/// Handler for DELETE /books/:book_id
pub async fn delete_book_handler(
    State(state): State<AppState>,
    AppPath(book_id): AppPath<i64>,
) -> Result<Json<DeleteResponse>> {
    state.books.delete_book(book_id).await?;
    Ok(Json(DeleteResponse::new("Book", book_id)))
}

/// Handler for DELETE /reset
pub async fn reset_handler(State(state): State<AppState>) -> Result<Json<ResetResponse>> {
    let (books_deleted, reviews_deleted) = state.books.reset().await?;
    Ok(Json(ResetResponse {
        books_deleted,
        reviews_deleted,
    }))
}

// == Reviews ==

/// Handler for GET /books/:book_id/reviews
pub async fn list_reviews_handler(
    State(state): State<AppState>,
    AppPath(book_id): AppPath<i64>,
) -> Result<Json<Vec<Review>>> {
    Ok(Json(state.reviews.list_reviews(book_id).await?))
}

/// Handler for POST /books/:book_id/reviews
pub async fn create_review_handler(
    State(state): State<AppState>,
    AppPath(book_id): AppPath<i64>,
    AppJson(req): AppJson<ReviewCreate>,
) -> Result<Json<Review>> {
    Ok(Json(state.reviews.create_review(book_id, req).await?))
}

/// Handler for GET /books/:book_id/reviews/:review_id
pub async fn get_review_handler(
    State(state): State<AppState>,
    AppPath((book_id, review_id)): AppPath<(i64, i64)>,
) -> Result<Json<Review>> {
    Ok(Json(state.reviews.get_review(book_id, review_id).await?))
}

/// Handler for PUT /books/:book_id/reviews/:review_id
pub async fn replace_review_handler(
    State(state): State<AppState>,
    AppPath((book_id, review_id)): AppPath<(i64, i64)>,
    AppJson(req): AppJson<ReviewCreate>,
) -> Result<Json<Review>> {
    Ok(Json(
        state.reviews.replace_review(book_id, review_id, req).await?,
    ))
}

/// Handler for PATCH /books/:book_id/reviews/:review_id
pub async fn patch_review_handler(
    State(state): State<AppState>,
    AppPath((book_id, review_id)): AppPath<(i64, i64)>,
    AppJson(patch): AppJson<ReviewPatch>,
) -> Result<Json<Review>> {
    Ok(Json(
        state.reviews.patch_review(book_id, review_id, patch).await?,
    ))
}

/// Handler for DELETE /books/:book_id/reviews/:review_id
pub async fn delete_review_handler(
    State(state): State<AppState>,
    AppPath((book_id, review_id)): AppPath<(i64, i64)>,
) -> Result<Json<DeleteResponse>> {
    state.reviews.delete_review(book_id, review_id).await?;
    Ok(Json(DeleteResponse::new("Review", review_id)))
}

/// Fallback for unknown routes
pub async fn not_found_handler() -> ServiceError {
    ServiceError::NotFound("Route".to_string())
}

// == Operational ==

/// Handler for GET /stats
///
/// Returns the listing cache counters.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.books.stats()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryStore;
    use std::sync::Arc;

    fn test_state() -> AppState {
        AppState::new(
            Database::open_in_memory().unwrap(),
            CacheGateway::new(Arc::new(MemoryStore::new())),
        )
    }

    fn book_req(title: &str) -> BookCreate {
        BookCreate {
            title: title.to_string(),
            author: "Test Author".to_string(),
            description: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_list_handler() {
        let state = test_state();

        let created = create_book_handler(State(state.clone()), AppJson(book_req("T")))
            .await
            .unwrap();

        let listed = list_books_handler(State(state)).await.unwrap();
        assert_eq!(listed.0, vec![created.0]);
    }

    #[tokio::test]
    async fn test_get_missing_book_handler() {
        let state = test_state();

        let result = get_book_handler(State(state), AppPath(42)).await;
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_book_handler() {
        let state = test_state();
        let created = create_book_handler(State(state.clone()), AppJson(book_req("T")))
            .await
            .unwrap();

        let response = delete_book_handler(State(state.clone()), AppPath(created.id))
            .await
            .unwrap();
        assert_eq!(response.id, created.id);

        let result = get_book_handler(State(state), AppPath(created.id)).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_review_handlers() {
        let state = test_state();
        let book = create_book_handler(State(state.clone()), AppJson(book_req("T")))
            .await
            .unwrap();

        let review = create_review_handler(
            State(state.clone()),
            AppPath(book.id),
            AppJson(ReviewCreate {
                reviewer_name: "r".to_string(),
                content: "c".to_string(),
                rating: 4,
            }),
        )
        .await
        .unwrap();

        let fetched = get_review_handler(State(state.clone()), AppPath((book.id, review.id)))
            .await
            .unwrap();
        assert_eq!(fetched.0, review.0);

        delete_review_handler(State(state.clone()), AppPath((book.id, review.id)))
            .await
            .unwrap();
        let listed = list_reviews_handler(State(state), AppPath(book.id)).await.unwrap();
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let state = test_state();
        list_books_handler(State(state.clone())).await.unwrap();

        let response = stats_handler(State(state)).await;
        assert_eq!(response.hits, 0);
        assert_eq!(response.misses, 1);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
