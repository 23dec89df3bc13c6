//! Application configuration

use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub bind_address: String,
    /// Public URL of the web app; magic links redirect to its root
    pub site_url: String,
    pub cors_allowed_origins: Vec<String>,

    // Supabase
    pub supabase_url: String,
    pub supabase_service_role_key: String,
    pub supabase_jwt_secret: String,

    // Authorization
    /// `app_metadata.role` value that grants access to the admin procedures
    pub admin_role: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let site_url = env::var("SITE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());

        Ok(Self {
            // Server
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .ok()
                .map(|raw| parse_origins(&raw))
                .filter(|origins| !origins.is_empty())
                .unwrap_or_else(|| vec![site_url.trim_end_matches('/').to_string()]),
            site_url,

            // Supabase
            supabase_url: required("SUPABASE_URL")?,
            supabase_service_role_key: required("SUPABASE_SERVICE_ROLE_KEY")?,
            supabase_jwt_secret: {
                let secret = required("SUPABASE_JWT_SECRET")?;
                if secret.len() < 32 {
                    return Err(ConfigError::WeakSecret(
                        "SUPABASE_JWT_SECRET must be at least 32 characters",
                    ));
                }
                secret
            },

            // Authorization
            admin_role: env::var("ADMIN_ROLE")
                .ok()
                .filter(|role| !role.trim().is_empty())
                .unwrap_or_else(|| "super-admin".to_string()),
        })
    }

    /// Root URL of the web app, always ending in `/`
    pub fn site_root(&self) -> String {
        format!("{}/", self.site_url.trim_end_matches('/'))
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or(ConfigError::Missing(name))
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim().trim_end_matches('/'))
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
    #[error("Weak secret: {0}")]
    WeakSecret(&'static str),
}
