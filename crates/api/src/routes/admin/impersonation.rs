//! Magic-link impersonation
//!
//! A super admin gets a session for another user by generating a magic link
//! for them and reading the session tokens out of the redirect the link
//! answers with. The link is fetched once and never followed.

use axum::{
    extract::{Extension, State},
    http::header::LOCATION,
    Json,
};
use init_gateway::GenerateLinkParams;
use init_shared::{ImpersonationTokens, UserId};
use reqwest::redirect::Policy;
use url::Url;

use super::{
    schema::{UserIdInput, Validate},
    shared::ensure_not_self,
};
use crate::{
    auth::AdminContext,
    error::{ApiError, ApiResult},
    extract::ApiJson,
    state::AppState,
};

const TOKENS_NOT_FOUND: &str = "Error generating magic link. Tokens not found in URL hash.";

/// HTTP client that reports redirects instead of following them
#[derive(Clone)]
pub struct MagicLinkClient {
    client: reqwest::Client,
}

impl MagicLinkClient {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .redirect(Policy::none())
            .build()?;
        Ok(Self { client })
    }

    /// GET the action link and return its absolute `Location`
    pub async fn redirect_location(&self, action_link: &str) -> ApiResult<String> {
        let response = self.client.get(action_link).send().await.map_err(|e| {
            tracing::warn!(error = %e, "Magic link request failed");
            ApiError::TokenExtraction("Error generating magic link".to_string())
        })?;

        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                tracing::warn!(status = %response.status(), "Magic link response had no Location header");
                ApiError::TokenExtraction(
                    "Error generating magic link. Location header not found".to_string(),
                )
            })?;

        // Relative redirects resolve against the link itself
        match Url::parse(action_link).and_then(|base| base.join(location)) {
            Ok(resolved) => Ok(resolved.to_string()),
            Err(_) => Ok(location.to_string()),
        }
    }
}

/// Read the session tokens from the fragment of a redirect target
pub fn extract_session_tokens(location: &str) -> ApiResult<ImpersonationTokens> {
    let url = Url::parse(location)
        .map_err(|_| ApiError::TokenExtraction(TOKENS_NOT_FOUND.to_string()))?;
    let fragment = url
        .fragment()
        .ok_or_else(|| ApiError::TokenExtraction(TOKENS_NOT_FOUND.to_string()))?;

    let mut access_token = None;
    let mut refresh_token = None;
    for (key, value) in url::form_urlencoded::parse(fragment.as_bytes()) {
        match key.as_ref() {
            "access_token" => access_token = Some(value.into_owned()),
            "refresh_token" => refresh_token = Some(value.into_owned()),
            _ => {}
        }
    }

    match (access_token, refresh_token) {
        (Some(access_token), Some(refresh_token))
            if !access_token.is_empty() && !refresh_token.is_empty() =>
        {
            Ok(ImpersonationTokens {
                access_token,
                refresh_token,
            })
        }
        _ => Err(ApiError::TokenExtraction(TOKENS_NOT_FOUND.to_string())),
    }
}

/// Run the impersonation protocol for `user_id` on behalf of `admin`
pub async fn impersonate(
    state: &AppState,
    admin: &AdminContext,
    user_id: UserId,
) -> ApiResult<ImpersonationTokens> {
    ensure_not_self(admin, user_id, "impersonate_user")?;

    let user = state.gateway.get_user_by_id(user_id).await.map_err(|e| {
        tracing::warn!(%user_id, error = %e, "Failed to resolve user for impersonation");
        ApiError::UserResolution("Error fetching user".to_string())
    })?;

    let email = user.sign_in_email().ok_or_else(|| {
        ApiError::UserResolution("User has no email. Cannot impersonate".to_string())
    })?;

    let link = state
        .gateway
        .generate_link(GenerateLinkParams::magic_link(email, state.config.site_root()))
        .await
        .map_err(|e| {
            tracing::warn!(%user_id, error = %e, "Magic link generation failed");
            ApiError::LinkGeneration("Error generating magic link".to_string())
        })?;

    let action_link = link
        .action_link
        .filter(|link| !link.is_empty())
        .ok_or_else(|| ApiError::LinkGeneration("Error generating magic link".to_string()))?;

    let location = state.magic_links.redirect_location(&action_link).await?;
    let tokens = extract_session_tokens(&location)?;

    tracing::info!(admin_id = %admin.user_id, %user_id, "Admin impersonated user");
    Ok(tokens)
}

/// `admin.impersonateUser`
pub async fn impersonate_user(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminContext>,
    ApiJson(input): ApiJson<UserIdInput>,
) -> ApiResult<Json<ImpersonationTokens>> {
    let user_id = input.validate()?;
    Ok(Json(impersonate(&state, &admin, user_id).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_tokens_from_fragment() {
        let tokens = extract_session_tokens("https://x/#access_token=A&refresh_token=B").unwrap();
        assert_eq!(tokens.access_token, "A");
        assert_eq!(tokens.refresh_token, "B");
    }

    #[test]
    fn test_extract_tokens_decodes_form_encoding() {
        let tokens = extract_session_tokens(
            "https://app.test/#expires_in=3600&access_token=a%2Eb+c&refresh_token=r&type=magiclink",
        )
        .unwrap();
        assert_eq!(tokens.access_token, "a.b c");
        assert_eq!(tokens.refresh_token, "r");
    }

    #[test]
    fn test_missing_or_empty_tokens_fail() {
        for location in [
            "https://x/",
            "https://x/#access_token=A",
            "https://x/#access_token=&refresh_token=B",
            "https://x/?access_token=A&refresh_token=B",
            "not a url",
        ] {
            assert!(
                matches!(
                    extract_session_tokens(location),
                    Err(ApiError::TokenExtraction(_))
                ),
                "{location}"
            );
        }
    }
}
