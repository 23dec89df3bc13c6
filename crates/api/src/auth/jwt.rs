//! Supabase JWT validation

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// Claims of a Supabase-issued access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupabaseClaims {
    /// Subject (user ID as string, parsed to UUID by the middleware)
    pub sub: String,
    pub email: Option<String>,
    /// Postgres role (authenticated, anon, service_role)
    pub role: Option<String>,
    pub aud: Option<String>,
    pub iat: Option<i64>,
    pub exp: i64,
    /// Provider-controlled metadata; only the service role can write it
    #[serde(default)]
    pub app_metadata: AppMetadata,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppMetadata {
    pub role: Option<String>,
}

/// Validates tokens signed with the project's JWT secret
#[derive(Clone)]
pub struct JwtManager {
    decoding_key: DecodingKey,
}

impl JwtManager {
    pub fn new(supabase_secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(supabase_secret.as_bytes()),
        }
    }

    /// Validate a Supabase-issued JWT.
    /// Algorithm and audience are pinned.
    pub fn validate_supabase_token(&self, token: &str) -> Result<SupabaseClaims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 60; // 60 second clock skew tolerance
        validation.set_audience(&["authenticated"]);

        match decode::<SupabaseClaims>(token, &self.decoding_key, &validation) {
            Ok(data) => Ok(data.claims),
            Err(e) => match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => Err(JwtError::Expired),
                jsonwebtoken::errors::ErrorKind::InvalidToken
                | jsonwebtoken::errors::ErrorKind::InvalidSignature
                | jsonwebtoken::errors::ErrorKind::InvalidAlgorithm => Err(JwtError::Invalid),
                jsonwebtoken::errors::ErrorKind::InvalidAudience => {
                    tracing::warn!("Supabase JWT audience validation failed - rejecting token");
                    Err(JwtError::Invalid)
                }
                _ => Err(JwtError::Validation(e.to_string())),
            },
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("Token has expired")]
    Expired,
    #[error("Invalid token")]
    Invalid,
    #[error("Token validation failed: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;
    use time::OffsetDateTime;

    const SECRET: &str = "test-jwt-secret-must-be-at-least-32-characters-long";

    fn sign(claims: serde_json::Value, secret: &str) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn expires_in(seconds: i64) -> i64 {
        OffsetDateTime::now_utc().unix_timestamp() + seconds
    }

    #[test]
    fn test_valid_token_exposes_app_metadata_role() {
        let token = sign(
            json!({
                "sub": "5b0c5a43-3f0e-4d4e-8f41-0b0fb0c7a9de",
                "aud": "authenticated",
                "role": "authenticated",
                "email": "admin@example.com",
                "exp": expires_in(3600),
                "app_metadata": { "provider": "email", "role": "super-admin" }
            }),
            SECRET,
        );

        let claims = JwtManager::new(SECRET).validate_supabase_token(&token).unwrap();
        assert_eq!(claims.app_metadata.role.as_deref(), Some("super-admin"));
        assert_eq!(claims.email.as_deref(), Some("admin@example.com"));
    }

    #[test]
    fn test_rejects_wrong_audience_signature_and_expiry() {
        let jwt = JwtManager::new(SECRET);

        let wrong_audience = sign(
            json!({ "sub": "x", "aud": "anon", "exp": expires_in(3600) }),
            SECRET,
        );
        assert!(matches!(
            jwt.validate_supabase_token(&wrong_audience),
            Err(JwtError::Invalid)
        ));

        let wrong_secret = sign(
            json!({ "sub": "x", "aud": "authenticated", "exp": expires_in(3600) }),
            "another-secret-that-is-also-32-characters",
        );
        assert!(matches!(
            jwt.validate_supabase_token(&wrong_secret),
            Err(JwtError::Invalid)
        ));

        let expired = sign(
            json!({ "sub": "x", "aud": "authenticated", "exp": expires_in(-3600) }),
            SECRET,
        );
        assert!(matches!(
            jwt.validate_supabase_token(&expired),
            Err(JwtError::Expired)
        ));
    }
}
