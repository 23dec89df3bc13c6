//! Authentication module for the admin API

pub mod jwt;
pub mod middleware;

pub use jwt::{JwtError, JwtManager, SupabaseClaims};
pub use middleware::{require_admin, AdminContext, AuthState};
