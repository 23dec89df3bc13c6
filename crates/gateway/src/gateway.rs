//! The seam between the admin service and the hosted backend

use async_trait::async_trait;
use init_shared::{AuthUser, UserId};
use serde_json::Value;

use crate::{
    auth_admin::{GenerateLinkParams, GeneratedLink, UserAttributes},
    error::GatewayResult,
    query::{SelectResponse, TableQuery},
};

/// Operations the admin service needs from the backend.
///
/// Implementations own persistence, auth and row-level security. Nothing is
/// retried here; every error is handed back to the caller unchanged.
#[async_trait]
pub trait DataGateway: Send + Sync {
    /// Read rows (and optionally a count) from a table
    async fn select(&self, query: TableQuery) -> GatewayResult<SelectResponse>;

    /// Delete the rows matching the query filters, returning the raw payload
    async fn delete(&self, query: TableQuery) -> GatewayResult<Option<Value>>;

    /// Call a named remote procedure
    async fn rpc(&self, function: &str, args: Value) -> GatewayResult<Value>;

    async fn get_user_by_id(&self, user_id: UserId) -> GatewayResult<AuthUser>;

    async fn delete_user(&self, user_id: UserId) -> GatewayResult<()>;

    async fn update_user_by_id(
        &self,
        user_id: UserId,
        attributes: UserAttributes,
    ) -> GatewayResult<AuthUser>;

    /// Issue a one-time sign-in link
    async fn generate_link(&self, params: GenerateLinkParams) -> GatewayResult<GeneratedLink>;

    /// Cheap reachability check for readiness probes
    async fn health(&self) -> GatewayResult<()>;
}
