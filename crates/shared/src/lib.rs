//! Init Shared Types
//!
//! Row and response types shared by the gateway client and the admin API.

pub mod types;

pub use types::*;
