//! Account, membership and subscription procedures

use axum::{
    extract::{Extension, State},
    Json,
};
use init_gateway::{CountStrategy, Table, TableQuery};
use init_shared::{
    AccountMember, AccountWithMemberships, AccountsPage, MembershipWithAccount,
    SubscriptionWithItems,
};
use serde_json::{json, Value};

use super::{
    schema::{AccountIdInput, AccountSlugInput, GetAccountsInput, UserIdInput, Validate},
    shared::decode_rows,
};
use crate::{
    auth::AdminContext,
    error::ApiResult,
    extract::{ApiJson, ApiQuery},
    state::AppState,
};

/// Build the listing query for a validated filter.
///
/// Exactly `per_page` rows are requested starting at the page offset;
/// filters are ANDed.
pub fn accounts_query(filter: &super::schema::AccountsFilter) -> TableQuery {
    let mut query = TableQuery::from(Table::Accounts)
        .select("*")
        .count(CountStrategy::Exact)
        .range(filter.offset(), filter.range_end());

    if let Some(is_personal) = filter.account_type.personal_filter() {
        query = query.eq("is_personal_account", is_personal);
    }

    if let Some(text) = &filter.query {
        query = query.like("name", format!("%{}%", text));
    }

    query
}

/// `admin.getAccount`
pub async fn get_account(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminContext>,
    ApiQuery(input): ApiQuery<AccountIdInput>,
) -> ApiResult<Json<AccountWithMemberships>> {
    let account_id = input.validate()?;
    tracing::debug!(admin_id = %admin.user_id, %account_id, "admin.getAccount");

    let response = state
        .gateway
        .select(
            TableQuery::from(Table::Accounts)
                .select("*, memberships: accounts_memberships (*)")
                .eq("id", account_id)
                .single(),
        )
        .await?;

    Ok(Json(decode_rows("get_account", response.rows)?))
}

/// `admin.getAccounts`
pub async fn get_accounts(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminContext>,
    ApiQuery(input): ApiQuery<GetAccountsInput>,
) -> ApiResult<Json<AccountsPage>> {
    let filter = input.validate()?;
    tracing::debug!(
        admin_id = %admin.user_id,
        page = filter.page,
        per_page = filter.per_page,
        account_type = ?filter.account_type,
        "admin.getAccounts"
    );

    let response = state.gateway.select(accounts_query(&filter)).await?;

    Ok(Json(AccountsPage {
        data: decode_rows("get_accounts", response.rows)?,
        page_count: filter.page_count(response.count.unwrap_or(0)),
    }))
}

/// `admin.deleteAccount`
pub async fn delete_account(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminContext>,
    ApiJson(input): ApiJson<AccountIdInput>,
) -> ApiResult<Json<Option<Value>>> {
    let account_id = input.validate()?;

    let payload = state
        .gateway
        .delete(TableQuery::from(Table::Accounts).eq("id", account_id))
        .await?;

    tracing::info!(admin_id = %admin.user_id, %account_id, "Admin deleted account");

    Ok(Json(payload))
}

/// `admin.getMembers`; slug resolution happens inside the remote procedure
pub async fn get_members(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminContext>,
    ApiQuery(input): ApiQuery<AccountSlugInput>,
) -> ApiResult<Json<Vec<AccountMember>>> {
    let slug = input.validate()?;
    tracing::debug!(admin_id = %admin.user_id, %slug, "admin.getMembers");

    let rows = state
        .gateway
        .rpc("get_account_members", json!({ "account_slug": slug }))
        .await?;

    Ok(Json(decode_rows("get_members", rows)?))
}

/// `admin.getMemberships`
pub async fn get_memberships(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminContext>,
    ApiQuery(input): ApiQuery<UserIdInput>,
) -> ApiResult<Json<Vec<MembershipWithAccount>>> {
    let user_id = input.validate()?;
    tracing::debug!(admin_id = %admin.user_id, %user_id, "admin.getMemberships");

    let response = state
        .gateway
        .select(
            TableQuery::from(Table::AccountsMemberships)
                .select("*, account: account_id !inner (id, name)")
                .eq("user_id", user_id),
        )
        .await?;

    Ok(Json(decode_rows("get_memberships", response.rows)?))
}

/// `admin.getSubscription`; the query itself limits the result to one row
pub async fn get_subscription(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminContext>,
    ApiQuery(input): ApiQuery<AccountIdInput>,
) -> ApiResult<Json<Option<SubscriptionWithItems>>> {
    let account_id = input.validate()?;
    tracing::debug!(admin_id = %admin.user_id, %account_id, "admin.getSubscription");

    let response = state
        .gateway
        .select(
            TableQuery::from(Table::Subscriptions)
                .select("*, subscription_items !inner (*)")
                .eq("account_id", account_id)
                .maybe_single(),
        )
        .await?;

    Ok(Json(decode_rows("get_subscription", response.rows)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::admin::schema::AccountsFilter;
    use init_gateway::FilterOp;
    use init_shared::AccountType;

    fn filter(page: u64, per_page: u64, account_type: AccountType) -> AccountsFilter {
        AccountsFilter {
            page,
            per_page,
            account_type,
            query: None,
        }
    }

    #[test]
    fn test_window_matches_page() {
        for (page, per_page) in [(1, 1), (1, 10), (2, 10), (7, 3), (40, 100)] {
            let query = accounts_query(&filter(page, per_page, AccountType::All));
            let (from, to) = query.range.unwrap();
            assert_eq!(from, (page - 1) * per_page);
            assert_eq!(to - from + 1, per_page);
            assert_eq!(query.count, Some(CountStrategy::Exact));
        }
    }

    #[test]
    fn test_account_type_filter_mapping() {
        let all = accounts_query(&filter(1, 10, AccountType::All));
        assert!(all.filters.is_empty());

        let personal = accounts_query(&filter(1, 10, AccountType::Personal));
        assert_eq!(personal.eq_value("is_personal_account"), Some("true"));

        let team = accounts_query(&filter(1, 10, AccountType::Team));
        assert_eq!(team.eq_value("is_personal_account"), Some("false"));
    }

    #[test]
    fn test_query_text_is_additive_like() {
        let mut f = filter(1, 10, AccountType::Team);
        f.query = Some("acme".to_string());
        let query = accounts_query(&f);

        assert_eq!(query.filters.len(), 2);
        let like = query
            .filters
            .iter()
            .find(|f| f.op == FilterOp::Like)
            .unwrap();
        assert_eq!(like.column, "name");
        assert_eq!(like.value, "%acme%");
    }
}
