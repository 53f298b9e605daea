//! API Routes
//!
//! Configures the Axum router with all book review endpoints.

use axum::{
    routing::{delete, get},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    create_book_handler, create_review_handler, delete_book_handler, delete_review_handler,
    get_book_handler, get_review_handler, health_handler, list_books_handler,
    list_reviews_handler, not_found_handler, patch_book_handler, patch_review_handler,
    replace_book_handler, replace_review_handler, reset_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET|POST /books` - List (cache-aside) or create books
/// - `GET|PUT|PATCH|DELETE /books/:book_id` - Single book
/// - `GET|POST /books/:book_id/reviews` - List or create reviews
/// - `GET|PUT|PATCH|DELETE /books/:book_id/reviews/:review_id` - Single review
/// - `DELETE /reset` - Delete all books and reviews
/// - `GET /stats` - Listing cache counters
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/books", get(list_books_handler).post(create_book_handler))
        .route(
            "/books/:book_id",
            get(get_book_handler)
                .put(replace_book_handler)
                .patch(patch_book_handler)
                .delete(delete_book_handler),
        )
        .route(
            "/books/:book_id/reviews",
            get(list_reviews_handler).post(create_review_handler),
        )
        .route(
            "/books/:book_id/reviews/:review_id",
            get(get_review_handler)
                .put(replace_review_handler)
                .patch(patch_review_handler)
                .delete(delete_review_handler),
        )
        .route("/reset", delete(reset_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .fallback(not_found_handler)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
