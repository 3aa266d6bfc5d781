//! Controller-specific error types.
//!
//! Validation errors carry the message reported to the caller verbatim;
//! provider errors keep the Ironic client's own text.

use ironic_client::IronicError;
use node_spec::SpecError;
use thiserror::Error;

/// Errors that can occur while reconciling a node.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Ironic API error
    #[error(transparent)]
    Ironic(#[from] IronicError),

    /// Parameter document could not be loaded or is invalid
    #[error(transparent)]
    Params(#[from] SpecError),

    /// A required parameter is missing; no provider call was made
    #[error("{0}")]
    Validation(String),

    /// Patching an existing node failed
    #[error("Failed to update node, Error: {0}")]
    UpdateFailed(String),

    /// Invalid client configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Client configuration could not be extracted
    #[error("Configuration error: {0}")]
    Config(#[from] figment::Error),
}
