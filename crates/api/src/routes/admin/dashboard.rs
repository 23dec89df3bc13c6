//! Admin dashboard counts
//!
//! The four counts are independent, so they run as separate tasks and are
//! joined. The first failure fails the whole call. Tasks that are still in
//! flight at that point are detached, not aborted: they finish against the
//! gateway and their results are dropped.

use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    Json,
};
use init_gateway::{CountStrategy, DataGateway, GatewayResult, Table, TableQuery};
use init_shared::{DashboardData, SubscriptionStatus};
use tokio::task::JoinHandle;

use crate::{
    auth::AdminContext,
    error::{ApiError, ApiResult},
    state::AppState,
};

type CountHandle = JoinHandle<GatewayResult<Option<u64>>>;

async fn estimated_count(
    gateway: Arc<dyn DataGateway>,
    query: TableQuery,
) -> GatewayResult<Option<u64>> {
    let table = query.table;
    let response = gateway
        .select(query.count(CountStrategy::Estimated).head())
        .await?;
    if response.count.is_none() {
        tracing::warn!(%table, "Gateway reported no count");
    }
    Ok(response.count)
}

fn spawn_count(gateway: &Arc<dyn DataGateway>, query: TableQuery) -> CountHandle {
    tokio::spawn(estimated_count(gateway.clone(), query))
}

async fn join_count(step: &'static str, handle: CountHandle) -> ApiResult<Option<u64>> {
    match handle.await {
        Ok(result) => result.map_err(|e| {
            tracing::warn!(step, error = %e, "Dashboard count failed");
            ApiError::from(e)
        }),
        Err(e) => {
            tracing::error!(step, error = %e, "Dashboard count task panicked");
            Err(ApiError::Internal)
        }
    }
}

/// Fan out the four estimated counts and join them
pub async fn load_dashboard(gateway: &Arc<dyn DataGateway>) -> ApiResult<DashboardData> {
    let subscriptions = spawn_count(
        gateway,
        TableQuery::from(Table::Subscriptions).eq("status", SubscriptionStatus::Active.as_str()),
    );
    let trials = spawn_count(
        gateway,
        TableQuery::from(Table::Subscriptions).eq("status", SubscriptionStatus::Trialing.as_str()),
    );
    let accounts = spawn_count(
        gateway,
        TableQuery::from(Table::Accounts).eq("is_personal_account", true),
    );
    let team_accounts = spawn_count(
        gateway,
        TableQuery::from(Table::Accounts).eq("is_personal_account", false),
    );

    let (subscriptions, trials, accounts, team_accounts) = tokio::try_join!(
        join_count("subscriptions", subscriptions),
        join_count("trials", trials),
        join_count("accounts", accounts),
        join_count("team_accounts", team_accounts),
    )?;

    Ok(DashboardData {
        subscriptions,
        trials,
        accounts,
        team_accounts,
    })
}

/// `admin.getDashboardData`
pub async fn get_dashboard_data(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminContext>,
) -> ApiResult<Json<DashboardData>> {
    tracing::debug!(admin_id = %admin.user_id, "admin.getDashboardData");
    Ok(Json(load_dashboard(&state.gateway).await?))
}
