//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The provided URL is invalid or malformed.
    #[error("invalid URL for {field}: {message}")]
    InvalidUrl {
        /// Name of the offending setting.
        field: &'static str,
        /// Parser or scheme error.
        message: String,
    },

    /// A required setting is missing or blank.
    #[error("missing required setting: {0}")]
    MissingSetting(&'static str),

    /// A setting is present but has an unusable value.
    #[error("invalid value for {field}: {message}")]
    InvalidSetting {
        /// Name of the offending setting.
        field: &'static str,
        /// What is wrong with it.
        message: String,
    },
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
