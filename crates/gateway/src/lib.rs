//! Init Remote Data Gateway
//!
//! Typed access to the hosted backend: PostgREST table queries, remote
//! procedures and the auth-admin API. The admin service only talks to the
//! backend through the [`DataGateway`] trait; [`SupabaseGateway`] is the
//! HTTP implementation.

pub mod auth_admin;
pub mod client;
pub mod error;
pub mod gateway;
pub mod query;

pub use auth_admin::{GenerateLinkParams, GeneratedLink, LinkType, UserAttributes};
pub use client::{SupabaseConfig, SupabaseGateway};
pub use error::{GatewayError, GatewayResult};
pub use gateway::DataGateway;
pub use query::{Cardinality, CountStrategy, Filter, FilterOp, SelectResponse, Table, TableQuery};
