//! Super-admin procedures
//!
//! - `accounts`: account listing, lookup, deletion, members, memberships and subscriptions
//! - `users`: auth-user lookup, deletion, ban and reactivation
//! - `dashboard`: aggregate counts
//! - `impersonation`: magic-link impersonation
//! - `schema`: procedure inputs and their validation
//! - `shared`: guards and helpers used across procedures
//!
//! Procedures are exposed as `/api/trpc/admin.<name>`. Queries are `GET` with
//! the input in the query string, mutations are `POST` with a JSON body.

pub mod accounts;
pub mod dashboard;
pub mod impersonation;
pub mod schema;
pub mod shared;
pub mod users;

use axum::{
    routing::{get, post},
    Router,
};

pub use impersonation::MagicLinkClient;

use crate::state::AppState;

/// Procedure routes; the caller layers the admin check on top
pub fn admin_router() -> Router<AppState> {
    Router::new()
        // Queries
        .route("/admin.getAccount", get(accounts::get_account))
        .route("/admin.getAccounts", get(accounts::get_accounts))
        .route("/admin.getUserById", get(users::get_user_by_id))
        .route("/admin.getMembers", get(accounts::get_members))
        .route("/admin.getMemberships", get(accounts::get_memberships))
        .route("/admin.getSubscription", get(accounts::get_subscription))
        // Mutations
        .route("/admin.getDashboardData", post(dashboard::get_dashboard_data))
        .route("/admin.deleteAccount", post(accounts::delete_account))
        .route("/admin.deleteUser", post(users::delete_user))
        .route("/admin.banUser", post(users::ban_user))
        .route("/admin.reactivateUser", post(users::reactivate_user))
        .route("/admin.impersonateUser", post(impersonation::impersonate_user))
}
