//! Init admin API library
//!
//! Super-admin procedures over the Supabase-backed data gateway.

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod logging;
pub mod routes;
pub mod state;

pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
