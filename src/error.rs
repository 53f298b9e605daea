//! Error types for the book review service
//!
//! Provides the HTTP-facing error type using thiserror.

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::cache::CacheError;
use crate::models::ErrorResponse;
use crate::store::StoreError;

// == Service Error Enum ==
/// Unified error type returned by services and handlers.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Book or review id does not exist
    #[error("{0} not found")]
    NotFound(String),

    /// Request body failed validation
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Request could not be extracted (malformed JSON, bad path parameter)
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    /// Cache could not answer a listing read
    #[error(transparent)]
    CacheUnavailable(CacheError),

    /// System of record failed
    #[error("Database error: {0}")]
    Store(#[from] StoreError),
}

impl ServiceError {
    pub fn book_not_found(book_id: i64) -> Self {
        ServiceError::NotFound(format!("Book {}", book_id))
    }

    pub fn review_not_found(review_id: i64) -> Self {
        ServiceError::NotFound(format!("Review {}", review_id))
    }
}

impl From<JsonRejection> for ServiceError {
    fn from(rejection: JsonRejection) -> Self {
        ServiceError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for ServiceError {
    fn from(rejection: PathRejection) -> Self {
        ServiceError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ServiceError::Rejected { status, .. } => *status,
            ServiceError::CacheUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServiceError::Store(e) => {
                error!(error = %e, "Database failure");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let message = match &self {
            ServiceError::CacheUnavailable(_) => "Cache service unavailable".to_string(),
            ServiceError::Store(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for services and handlers.
pub type Result<T> = std::result::Result<T, ServiceError>;
