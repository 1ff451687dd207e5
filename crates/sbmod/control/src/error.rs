//! Error types for the provisioner

use sbmod_reconcile::{ApplyError, BackendError};
use sbmod_types::ValidationErrors;
use thiserror::Error;

/// Provisioner error type
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// Configuration rejected by the validator
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// Input document could not be parsed
    #[error("Failed to parse {format} document: {message}")]
    Parse {
        format: &'static str,
        message: String,
    },

    /// Input document could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Engine settings could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Observed state could not be read
    #[error("Observed state unavailable: {0}")]
    ObservedState(#[source] BackendError),

    /// Plan application left nodes failed or skipped
    #[error(transparent)]
    Apply(#[from] ApplyError),

    /// Logging could not be initialized
    #[error("Telemetry error: {0}")]
    Telemetry(String),

    /// Builder is missing a required component
    #[error("Missing component: {0}")]
    MissingComponent(&'static str),
}

/// Result type for provisioner operations
pub type Result<T> = std::result::Result<T, ProvisionError>;
