//! API error types and handling

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use init_gateway::GatewayError;
use serde_json::json;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    // Authentication errors
    #[error("Authentication required")]
    Unauthorized,
    #[error("Invalid or expired token")]
    InvalidToken,
    #[error("Insufficient permissions")]
    Forbidden,

    // Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    // Resource errors
    #[error("Resource not found")]
    NotFound,

    // Admin operation errors
    #[error("You cannot perform a destructive action on your own account as a Super Admin")]
    SelfActionForbidden,
    #[error("{0}")]
    UserResolution(String),
    #[error("{0}")]
    LinkGeneration(String),
    #[error("{0}")]
    TokenExtraction(String),

    // Upstream errors
    #[error("{0}")]
    Gateway(GatewayError),

    // Internal errors
    #[error("Internal server error")]
    Internal,
    #[error("Service unavailable")]
    ServiceUnavailable,
}

impl ApiError {
    /// Stable machine-readable code, also used in the response body
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Unauthorized | ApiError::InvalidToken => "UNAUTHORIZED",
            ApiError::Forbidden => "FORBIDDEN",
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::NotFound => "NOT_FOUND",
            ApiError::SelfActionForbidden => "SELF_ACTION_FORBIDDEN",
            ApiError::UserResolution(_) => "USER_RESOLUTION_ERROR",
            ApiError::LinkGeneration(_) => "LINK_GENERATION_ERROR",
            ApiError::TokenExtraction(_) => "TOKEN_EXTRACTION_ERROR",
            ApiError::Gateway(_) => "GATEWAY_ERROR",
            ApiError::Internal => "INTERNAL_ERROR",
            ApiError::ServiceUnavailable => "SERVICE_UNAVAILABLE",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized | ApiError::InvalidToken => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden | ApiError::SelfActionForbidden => StatusCode::FORBIDDEN,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound | ApiError::UserResolution(_) => StatusCode::NOT_FOUND,
            ApiError::LinkGeneration(_)
            | ApiError::TokenExtraction(_)
            | ApiError::Gateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": {
                "code": self.code(),
                "message": self.to_string(),
            }
        }));

        (self.status(), body).into_response()
    }
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::NotFound => ApiError::NotFound,
            other => {
                tracing::error!(error = %other, "Gateway error");
                ApiError::Gateway(other)
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
