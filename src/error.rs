//! Error types for ricoverage
//!
//! Library code uses `crate::error::Result<T>` which returns `CoverageError`.
//! The binary uses `anyhow::Result<T>` for top-level handling and maps the
//! structured error to an exit code via `crate::exit_codes`.
//!
//! ## Provider errors
//!
//! Every failed AWS call is classified into one of three variants:
//!
//! - `ProviderAuth`: credentials missing, invalid, or expired. Never retried.
//! - `ProviderThrottling`: rate limit exceeded. Retried by `ExponentialBackoffPolicy`.
//! - `Provider`: anything else (network, service unavailable, unsupported region).
//!
//! Classification lives in `crate::aws::errors`.
//!
//! ## Retry Awareness
//!
//! Errors implement `IsRetryable` to indicate whether an operation should be retried.
//! Only `ProviderThrottling` and `Io` are retryable; everything else fails immediately.

use crate::service::ServiceKind;
use thiserror::Error;

/// Main error type for ricoverage
#[derive(Error, Debug)]
pub enum CoverageError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Authentication error: {service} in {region} - {message}")]
    ProviderAuth {
        service: ServiceKind,
        region: String,
        message: String,
    },

    #[error("Throttled: {service} in {region} - {message}")]
    ProviderThrottling {
        service: ServiceKind,
        region: String,
        message: String,
    },

    #[error("Provider error: {service} in {region} - {message}")]
    Provider {
        service: ServiceKind,
        region: String,
        message: String,
    },

    #[error("Retryable error (attempt {attempt}/{max_attempts}): {reason}")]
    Retryable {
        attempt: u32,
        max_attempts: u32,
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Validation error: {field} - {reason}")]
    Validation { field: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Failed to read config {path}: {reason}")]
    ReadError { path: String, reason: String },

    #[error("Failed to parse config: {0}")]
    ParseError(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, CoverageError>;

/// Trait for determining if an error is retryable
///
/// Used by `RetryPolicy` implementations to determine whether an error
/// should trigger a retry attempt.
pub trait IsRetryable {
    fn is_retryable(&self) -> bool;
}

impl IsRetryable for CoverageError {
    fn is_retryable(&self) -> bool {
        matches!(
            self,
            CoverageError::ProviderThrottling { .. } | CoverageError::Io(_)
        )
    }
}

impl CoverageError {
    /// True for credential failures
    pub fn is_auth(&self) -> bool {
        matches!(self, CoverageError::ProviderAuth { .. })
    }
}
