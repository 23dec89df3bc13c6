//! Common types used across the Init admin service

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::OffsetDateTime;
use uuid::Uuid;

// =============================================================================
// ID Wrappers
// =============================================================================

/// Account ID wrapper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub Uuid);

impl From<Uuid> for AccountId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Auth-provider user ID wrapper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

impl From<Uuid> for UserId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// =============================================================================
// Enums
// =============================================================================

/// Account classification used by the admin account listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Personal,
    Team,
    #[default]
    All,
}

impl AccountType {
    /// Value of `is_personal_account` to filter on, `None` for no filter
    pub fn personal_filter(&self) -> Option<bool> {
        match self {
            Self::Personal => Some(true),
            Self::Team => Some(false),
            Self::All => None,
        }
    }
}

impl FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "personal" => Ok(Self::Personal),
            "team" => Ok(Self::Team),
            "all" => Ok(Self::All),
            other => Err(format!(
                "Invalid account type '{}': expected personal, team or all",
                other
            )),
        }
    }
}

/// Subscription status as stored by the billing provider sync
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Trialing,
    PastDue,
    Canceled,
    Unpaid,
    Incomplete,
    IncompleteExpired,
    Paused,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Trialing => "trialing",
            Self::PastDue => "past_due",
            Self::Canceled => "canceled",
            Self::Unpaid => "unpaid",
            Self::Incomplete => "incomplete",
            Self::IncompleteExpired => "incomplete_expired",
            Self::Paused => "paused",
        }
    }
}

/// Ban duration understood by the auth provider.
///
/// The provider has no permanent-ban flag, only a duration, so `Forever`
/// is encoded as 100 years.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BanDuration {
    Forever,
    None,
}

impl BanDuration {
    pub const FOREVER: &'static str = "876600h";
    pub const NONE: &'static str = "none";

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Forever => Self::FOREVER,
            Self::None => Self::NONE,
        }
    }
}

impl Serialize for BanDuration {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BanDuration {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        match raw.as_str() {
            Self::FOREVER => Ok(Self::Forever),
            Self::NONE => Ok(Self::None),
            other => Err(serde::de::Error::custom(format!(
                "unsupported ban duration '{}'",
                other
            ))),
        }
    }
}

// =============================================================================
// Accounts
// =============================================================================

/// Row of the `accounts` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub picture_url: Option<String>,
    pub is_personal_account: bool,
    #[serde(default)]
    pub primary_owner_user_id: Option<UserId>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
    /// Columns not modelled above, passed through unchanged
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Row of the `accounts_memberships` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Membership {
    pub account_id: AccountId,
    pub user_id: UserId,
    pub account_role: String,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
    /// Columns not modelled above, passed through unchanged
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Account with its embedded memberships
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountWithMemberships {
    #[serde(flatten)]
    pub account: Account,
    #[serde(default)]
    pub memberships: Vec<Membership>,
}

/// Minimal account projection embedded in membership listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountSummary {
    pub id: AccountId,
    pub name: String,
}

/// Membership joined with the account it grants access to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MembershipWithAccount {
    #[serde(flatten)]
    pub membership: Membership,
    pub account: AccountSummary,
}

/// Row returned by the `get_account_members` remote procedure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountMember {
    pub id: Uuid,
    pub user_id: UserId,
    pub account_id: AccountId,
    pub role: String,
    #[serde(default)]
    pub role_hierarchy_level: Option<i32>,
    #[serde(default)]
    pub primary_owner_user_id: Option<UserId>,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub picture_url: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
    /// Columns not modelled above, passed through unchanged
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One page of the admin account listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountsPage {
    pub data: Vec<Account>,
    pub page_count: u64,
}

// =============================================================================
// Subscriptions
// =============================================================================

/// Row of the `subscriptions` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: String,
    pub account_id: AccountId,
    pub status: SubscriptionStatus,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub billing_provider: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub cancel_at_period_end: bool,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub period_starts_at: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub period_ends_at: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub trial_starts_at: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub trial_ends_at: Option<OffsetDateTime>,
    /// Columns not modelled above, passed through unchanged
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Row of the `subscription_items` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionItem {
    pub id: String,
    pub subscription_id: String,
    pub product_id: String,
    pub variant_id: String,
    #[serde(default)]
    pub price_amount: Option<f64>,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub interval: Option<String>,
    #[serde(default)]
    pub interval_count: Option<i32>,
    #[serde(rename = "type", default)]
    pub item_type: Option<String>,
    /// Columns not modelled above, passed through unchanged
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Subscription joined with its line items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionWithItems {
    #[serde(flatten)]
    pub subscription: Subscription,
    #[serde(default)]
    pub subscription_items: Vec<SubscriptionItem>,
}

// =============================================================================
// Auth Users
// =============================================================================

/// User record owned by the auth provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: UserId,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub banned_until: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub last_sign_in_at: Option<OffsetDateTime>,
    #[serde(default)]
    pub app_metadata: Value,
    #[serde(default)]
    pub user_metadata: Value,
    /// Columns not modelled above, passed through unchanged
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AuthUser {
    /// Email usable for sign-in links; blank addresses count as missing
    pub fn sign_in_email(&self) -> Option<&str> {
        self.email.as_deref().map(str::trim).filter(|e| !e.is_empty())
    }
}

// =============================================================================
// Admin Responses
// =============================================================================

/// Auth user lookup result, keyed the way the auth provider returns it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    pub user: AuthUser,
}

/// Estimated platform counts shown on the admin dashboard.
/// A count the backend did not report is `null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub subscriptions: Option<u64>,
    pub trials: Option<u64>,
    pub accounts: Option<u64>,
    pub team_accounts: Option<u64>,
}

/// Session credentials obtained by following a magic link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpersonationTokens {
    pub access_token: String,
    pub refresh_token: String,
}
