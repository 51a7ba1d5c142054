//! Domain-specific error types for franchise-lab

use thiserror::Error;

/// Main error type for the simulation engine.
///
/// These stay internal to the crate's components: at every generation boundary
/// a failure collapses into the deterministic fallback path rather than
/// surfacing to the session.
#[derive(Error, Debug)]
pub enum LabError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Completion endpoint error: {message}")]
    Completion { message: String },

    #[error("Catalog error: {message}")]
    Catalog { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },
}

impl From<anyhow::Error> for LabError {
    fn from(err: anyhow::Error) -> Self {
        LabError::Validation {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for LabError {
    fn from(err: serde_json::Error) -> Self {
        LabError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for LabError {
    fn from(err: reqwest::Error) -> Self {
        LabError::Completion {
            message: format!("HTTP request failed: {err}"),
        }
    }
}

impl From<std::io::Error> for LabError {
    fn from(err: std::io::Error) -> Self {
        LabError::Config {
            message: err.to_string(),
        }
    }
}

/// Result type alias for franchise-lab operations
pub type Result<T> = std::result::Result<T, LabError>;
