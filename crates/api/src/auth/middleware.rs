//! Admin authentication middleware
//!
//! Builds the [`AdminContext`] every admin handler receives. Requests without
//! a valid Supabase session for an admin never reach a handler.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use init_shared::UserId;
use uuid::Uuid;

use super::jwt::{JwtError, JwtManager};
use crate::error::ApiError;

/// Authenticated caller of an admin procedure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminContext {
    pub user_id: UserId,
    pub email: Option<String>,
}

/// State needed by [`require_admin`]
#[derive(Clone)]
pub struct AuthState {
    pub jwt: Arc<JwtManager>,
    pub admin_role: String,
}

fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Require a Supabase session whose `app_metadata.role` is the admin role
pub async fn require_admin(
    State(auth): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(&request).ok_or(ApiError::Unauthorized)?;

    let claims = auth.jwt.validate_supabase_token(token).map_err(|e| {
        tracing::debug!(error = %e, "Rejected admin token");
        match e {
            JwtError::Expired | JwtError::Invalid => ApiError::InvalidToken,
            JwtError::Validation(_) => ApiError::Unauthorized,
        }
    })?;

    let user_id = Uuid::parse_str(&claims.sub)
        .map(UserId)
        .map_err(|_| ApiError::InvalidToken)?;

    if claims.app_metadata.role.as_deref() != Some(auth.admin_role.as_str()) {
        tracing::warn!(%user_id, "Non-admin attempted to call an admin procedure");
        return Err(ApiError::Forbidden);
    }

    request.extensions_mut().insert(AdminContext {
        user_id,
        email: claims.email,
    });

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request as HttpRequest, StatusCode},
        middleware,
        routing::get,
        Extension, Router,
    };
    use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
    use serde_json::json;
    use time::OffsetDateTime;
    use tower::ServiceExt;

    const SECRET: &str = "test-jwt-secret-must-be-at-least-32-characters-long";
    const ADMIN_ID: &str = "5b0c5a43-3f0e-4d4e-8f41-0b0fb0c7a9de";

    async fn whoami(Extension(admin): Extension<AdminContext>) -> String {
        admin.user_id.to_string()
    }

    fn app() -> Router {
        let auth = AuthState {
            jwt: Arc::new(JwtManager::new(SECRET)),
            admin_role: "super-admin".to_string(),
        };
        Router::new()
            .route("/whoami", get(whoami))
            .layer(middleware::from_fn_with_state(auth, require_admin))
    }

    fn token(role: Option<&str>) -> String {
        let exp = OffsetDateTime::now_utc().unix_timestamp() + 3600;
        encode(
            &Header::new(Algorithm::HS256),
            &json!({
                "sub": ADMIN_ID,
                "aud": "authenticated",
                "exp": exp,
                "app_metadata": { "role": role }
            }),
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    async fn call(authorization: Option<String>) -> (StatusCode, String) {
        let mut builder = HttpRequest::builder().uri("/whoami");
        if let Some(value) = authorization {
            builder = builder.header("Authorization", value);
        }
        let response = app()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_missing_token_never_reaches_handler() {
        let (status, _) = call(None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = call(Some("Basic abc".to_string())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_garbage_token_is_rejected() {
        let (status, _) = call(Some("Bearer not-a-jwt".to_string())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_non_admin_is_forbidden() {
        let (status, _) = call(Some(format!("Bearer {}", token(None)))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = call(Some(format!("Bearer {}", token(Some("member"))))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_admin_context_is_attached() {
        let (status, body) = call(Some(format!("Bearer {}", token(Some("super-admin"))))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, ADMIN_ID);
    }
}
