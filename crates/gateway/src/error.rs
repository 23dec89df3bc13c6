//! Gateway error types

use thiserror::Error;

/// Errors surfaced by the remote data gateway
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Gateway request failed: {0}")]
    Transport(String),

    #[error("Gateway returned {status}: {message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("Resource not found")]
    NotFound,

    #[error("Expected at most one row, gateway returned {0}")]
    MultipleRows(usize),

    #[error("Failed to decode gateway response: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            GatewayError::Decode(err.to_string())
        } else {
            GatewayError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::Decode(err.to_string())
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;
