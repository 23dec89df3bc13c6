//! Auth-user lifecycle procedures
//!
//! Every destructive procedure refuses to target the calling admin before
//! talking to the gateway.

use axum::{
    extract::{Extension, State},
    http::StatusCode,
    Json,
};
use init_gateway::UserAttributes;
use init_shared::{BanDuration, UserId, UserResponse};

use super::{
    schema::{AccountIdInput, UserIdInput, Validate},
    shared::ensure_not_self,
};
use crate::{
    auth::AdminContext,
    error::ApiResult,
    extract::{ApiJson, ApiQuery},
    state::AppState,
};

/// `admin.getUserById`; the auth user shares its id with the personal account.
/// The record comes back wrapped as `{ "user": ... }`.
pub async fn get_user_by_id(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminContext>,
    ApiQuery(input): ApiQuery<AccountIdInput>,
) -> ApiResult<Json<UserResponse>> {
    let account_id = input.validate()?;
    tracing::debug!(admin_id = %admin.user_id, %account_id, "admin.getUserById");

    let user = state.gateway.get_user_by_id(UserId(account_id.0)).await?;

    Ok(Json(UserResponse { user }))
}

/// `admin.deleteUser`
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminContext>,
    ApiJson(input): ApiJson<UserIdInput>,
) -> ApiResult<StatusCode> {
    let user_id = input.validate()?;
    ensure_not_self(&admin, user_id, "delete_user")?;

    state.gateway.delete_user(user_id).await?;

    tracing::info!(admin_id = %admin.user_id, %user_id, "Admin deleted user");
    Ok(StatusCode::NO_CONTENT)
}

/// `admin.banUser`
pub async fn ban_user(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminContext>,
    ApiJson(input): ApiJson<UserIdInput>,
) -> ApiResult<StatusCode> {
    let user_id = input.validate()?;
    ensure_not_self(&admin, user_id, "ban_user")?;

    set_ban(&state, user_id, BanDuration::Forever).await?;

    tracing::info!(admin_id = %admin.user_id, %user_id, "Admin banned user");
    Ok(StatusCode::NO_CONTENT)
}

/// `admin.reactivateUser`
pub async fn reactivate_user(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminContext>,
    ApiJson(input): ApiJson<UserIdInput>,
) -> ApiResult<StatusCode> {
    let user_id = input.validate()?;
    ensure_not_self(&admin, user_id, "reactivate_user")?;

    set_ban(&state, user_id, BanDuration::None).await?;

    tracing::info!(admin_id = %admin.user_id, %user_id, "Admin reactivated user");
    Ok(StatusCode::NO_CONTENT)
}

/// Update only the ban duration of a user
async fn set_ban(state: &AppState, user_id: UserId, duration: BanDuration) -> ApiResult<()> {
    state
        .gateway
        .update_user_by_id(user_id, UserAttributes::ban(duration))
        .await?;
    Ok(())
}
