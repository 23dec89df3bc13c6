//! Auth-admin request and response types

use init_shared::BanDuration;
use serde::{Deserialize, Serialize};

/// Attributes accepted by the update-user endpoint.
///
/// Only set fields are sent, so an update never touches anything the
/// caller did not name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ban_duration: Option<BanDuration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_metadata: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_metadata: Option<serde_json::Value>,
}

impl UserAttributes {
    pub fn ban(duration: BanDuration) -> Self {
        Self {
            ban_duration: Some(duration),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    Magiclink,
    Recovery,
}

/// Body of the generate-link endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateLinkParams {
    #[serde(rename = "type")]
    pub link_type: LinkType,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_to: Option<String>,
}

impl GenerateLinkParams {
    pub fn magic_link(email: impl Into<String>, redirect_to: impl Into<String>) -> Self {
        Self {
            link_type: LinkType::Magiclink,
            email: email.into(),
            redirect_to: Some(redirect_to.into()),
        }
    }
}

/// Link properties returned by the generate-link endpoint
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GeneratedLink {
    #[serde(default)]
    pub action_link: Option<String>,
    #[serde(default)]
    pub hashed_token: Option<String>,
    #[serde(default)]
    pub verification_type: Option<String>,
    #[serde(default)]
    pub redirect_to: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ban_attributes_only_carry_duration() {
        let body = serde_json::to_value(UserAttributes::ban(BanDuration::Forever)).unwrap();
        assert_eq!(body, json!({ "ban_duration": "876600h" }));
    }

    #[test]
    fn test_magic_link_params() {
        let params = GenerateLinkParams::magic_link("jane@example.com", "https://app.test/");
        assert_eq!(
            serde_json::to_value(params).unwrap(),
            json!({
                "type": "magiclink",
                "email": "jane@example.com",
                "redirect_to": "https://app.test/"
            })
        );
    }
}
