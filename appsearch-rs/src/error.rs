//! Error types for App Search client operations.

use thiserror::Error;

/// Main error type for client operations.
///
/// Display strings follow the backend's bracketed-status convention:
/// validation failures render as `[400] Missing required parameter: query`
/// and HTTP failures as `[404]`, optionally followed by the detail message
/// the backend returned.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("[400] Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("[{status}]{}", .message.as_deref().map(|m| format!(" {m}")).unwrap_or_default())]
    Http {
        status: u16,
        message: Option<String>,
    },

    #[error("{0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
