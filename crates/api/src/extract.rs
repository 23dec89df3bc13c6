//! Input extractors
//!
//! Same as axum's `Json` and `Query`, except a body or query string that
//! does not deserialize is rejected with the API error envelope
//! (`VALIDATION_ERROR`, 400) instead of axum's plain-text rejection.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::ApiError;

/// JSON body of a mutation
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Query-string input of a query procedure
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);
