//! Ironic client errors

use thiserror::Error;

/// Errors that can occur when interacting with the Ironic API
#[derive(Debug, Error)]
pub enum IronicError {
    /// HTTP request/response error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Ironic API returned an error
    #[error("Ironic API error: {0}")]
    Api(String),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Authentication failed (invalid token, expired, etc.)
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid request (e.g., malformed patch, conflicting fields)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The node's provision state does not allow the operation
    #[error("Invalid provision state: {0}")]
    InvalidState(String),
}
