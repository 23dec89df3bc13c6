//! Admin procedure inputs
//!
//! Each input struct mirrors what arrives on the wire and validates into the
//! typed request its handler works with. Handlers never see unvalidated
//! input.

use init_shared::{AccountId, AccountType, UserId};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PER_PAGE: u64 = 10;
pub const MAX_PER_PAGE: u64 = 100;
const MAX_ROW_INDEX: u64 = i64::MAX as u64;

/// Conversion of a raw procedure input into its validated form
pub trait Validate {
    type Output;

    fn validate(self) -> ApiResult<Self::Output>;
}

fn parse_uuid(field: &str, raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| ApiError::Validation(format!("{} must be a valid UUID", field)))
}

/// Absent or blank → default; anything else must be an integer ≥ 1
fn parse_positive(field: &str, raw: Option<&str>, default: u64) -> ApiResult<u64> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(default),
        Some(value) => match value.parse::<u64>() {
            Ok(n) if n >= 1 => Ok(n),
            _ => Err(ApiError::Validation(format!(
                "{} must be a positive integer",
                field
            ))),
        },
    }
}

// =============================================================================
// Identifier inputs
// =============================================================================

/// Input of `getAccount`, `getUserById`, `deleteAccount` and `getSubscription`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountIdInput {
    pub account_id: String,
}

impl Validate for AccountIdInput {
    type Output = AccountId;

    fn validate(self) -> ApiResult<AccountId> {
        parse_uuid("accountId", &self.account_id).map(AccountId)
    }
}

/// Input of `deleteUser`, `banUser`, `reactivateUser`, `impersonateUser`
/// and `getMemberships`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdInput {
    pub user_id: String,
}

impl Validate for UserIdInput {
    type Output = UserId;

    fn validate(self) -> ApiResult<UserId> {
        parse_uuid("userId", &self.user_id).map(UserId)
    }
}

/// Input of `getMembers`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSlugInput {
    pub account_slug: String,
}

impl Validate for AccountSlugInput {
    type Output = String;

    fn validate(self) -> ApiResult<String> {
        let slug = self.account_slug.trim();
        if slug.is_empty() {
            return Err(ApiError::Validation("accountSlug is required".to_string()));
        }
        Ok(slug.to_string())
    }
}

// =============================================================================
// Account listing
// =============================================================================

/// Input of `getAccounts`; pagination arrives as strings from the table UI
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GetAccountsInput {
    pub page: Option<String>,
    pub per_page: Option<String>,
    pub account_type: Option<String>,
    pub query: Option<String>,
}

/// Validated account listing request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountsFilter {
    pub page: u64,
    pub per_page: u64,
    pub account_type: AccountType,
    pub query: Option<String>,
}

impl AccountsFilter {
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.per_page)
    }

    /// Inclusive index of the last requested row
    pub fn range_end(&self) -> u64 {
        self.offset()
            .saturating_add(self.per_page)
            .saturating_sub(1)
    }

    pub fn page_count(&self, total: u64) -> u64 {
        total.div_ceil(self.per_page)
    }
}

impl Validate for GetAccountsInput {
    type Output = AccountsFilter;

    fn validate(self) -> ApiResult<AccountsFilter> {
        let page = parse_positive("page", self.page.as_deref(), DEFAULT_PAGE)?;
        let per_page = parse_positive("per_page", self.per_page.as_deref(), DEFAULT_PER_PAGE)?;
        if per_page > MAX_PER_PAGE {
            return Err(ApiError::Validation(format!(
                "per_page must be at most {}",
                MAX_PER_PAGE
            )));
        }

        // The row window must fit the gateway's signed 64-bit offsets
        let last_row = (page - 1)
            .checked_mul(per_page)
            .and_then(|offset| offset.checked_add(per_page - 1))
            .filter(|end| *end <= MAX_ROW_INDEX);
        if last_row.is_none() {
            return Err(ApiError::Validation("page is out of range".to_string()));
        }

        let account_type = match self.account_type.as_deref().map(str::trim) {
            None | Some("") => AccountType::All,
            Some(raw) => raw.parse().map_err(ApiError::Validation)?,
        };

        let query = self
            .query
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty());

        Ok(AccountsFilter {
            page,
            per_page,
            account_type,
            query,
        })
    }
}
