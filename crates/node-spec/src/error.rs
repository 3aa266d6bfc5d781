//! Parameter document errors

use thiserror::Error;

/// Errors raised while loading or validating a parameter document
#[derive(Debug, Error)]
pub enum SpecError {
    /// The document could not be read from disk
    #[error("Failed to read parameters from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid YAML/JSON or does not match the schema
    #[error("Invalid parameter document: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The document parsed but violates a parameter constraint
    #[error("Invalid parameters: {0}")]
    Invalid(String),
}
