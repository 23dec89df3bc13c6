//! Shared guards and helpers for admin procedures

use init_gateway::GatewayError;
use init_shared::UserId;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    auth::AdminContext,
    error::{ApiError, ApiResult},
};

/// Refuse destructive actions that target the calling admin.
/// Must run before any gateway call.
pub fn ensure_not_self(admin: &AdminContext, target: UserId, action: &'static str) -> ApiResult<()> {
    if admin.user_id == target {
        tracing::warn!(admin_id = %admin.user_id, action, "Admin attempted action on own account");
        return Err(ApiError::SelfActionForbidden);
    }
    Ok(())
}

/// Decode gateway rows into a typed shape
pub fn decode_rows<T: DeserializeOwned>(step: &'static str, rows: Value) -> ApiResult<T> {
    serde_json::from_value(rows).map_err(|e| {
        tracing::error!(step, error = %e, "Gateway returned rows of unexpected shape");
        ApiError::Gateway(GatewayError::Decode(e.to_string()))
    })
}
