//! Request Extractors
//!
//! Wrappers around axum's `Json` and `Path` whose rejections render as the
//! service's JSON error body instead of plain text.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::ServiceError;

/// JSON request body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ServiceError))]
pub struct AppJson<T>(pub T);

/// Path parameters.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ServiceError))]
pub struct AppPath<T>(pub T);
