//! Shared application state

use std::sync::Arc;

use init_gateway::{DataGateway, SupabaseConfig, SupabaseGateway};

use crate::{
    auth::{AuthState, JwtManager},
    config::Config,
    routes::admin::MagicLinkClient,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub gateway: Arc<dyn DataGateway>,
    pub magic_links: MagicLinkClient,
    pub jwt: Arc<JwtManager>,
}

impl AppState {
    /// Wire the state against the configured Supabase project
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let gateway = SupabaseGateway::new(SupabaseConfig {
            url: config.supabase_url.clone(),
            service_role_key: config.supabase_service_role_key.clone(),
        })?;

        Self::with_gateway(config, Arc::new(gateway))
    }

    /// Build state around any gateway implementation
    pub fn with_gateway(config: Config, gateway: Arc<dyn DataGateway>) -> anyhow::Result<Self> {
        Ok(Self {
            jwt: Arc::new(JwtManager::new(&config.supabase_jwt_secret)),
            magic_links: MagicLinkClient::new()?,
            config: Arc::new(config),
            gateway,
        })
    }

    pub fn auth_state(&self) -> AuthState {
        AuthState {
            jwt: self.jwt.clone(),
            admin_role: self.config.admin_role.clone(),
        }
    }
}
