//! Exit code standardization for ricoverage
//!
//! ## Exit Code Convention
//!
//! - `0` = Success
//! - `1` = User error (invalid input, validation failure)
//! - `2` = System error (AWS API failure, throttling, network error)
//! - `3` = Configuration error (bad config file, missing or expired credentials)

use crate::error::CoverageError;

/// Standard exit codes for ricoverage
pub mod codes {
    /// Success
    pub const SUCCESS: i32 = 0;
    /// User error (invalid input, validation failure)
    pub const USER_ERROR: i32 = 1;
    /// System error (AWS API failure, network error)
    pub const SYSTEM_ERROR: i32 = 2;
    /// Configuration error (invalid config, invalid credentials)
    pub const CONFIG_ERROR: i32 = 3;
}

/// Map a CoverageError to an appropriate exit code
pub fn exit_code_for_error(error: &CoverageError) -> i32 {
    use CoverageError::*;
    match error {
        Config(_) => codes::CONFIG_ERROR,
        ProviderAuth { .. } => codes::CONFIG_ERROR,

        Validation { .. } => codes::USER_ERROR,

        ProviderThrottling { .. } => codes::SYSTEM_ERROR,
        Provider { .. } => codes::SYSTEM_ERROR,
        Retryable { .. } => codes::SYSTEM_ERROR,
        Io(_) => codes::SYSTEM_ERROR,
        Json(_) => codes::SYSTEM_ERROR,
    }
}

/// Exit code for a run where some services failed.
///
/// Codes are ordered by severity, so the highest one wins.
pub fn exit_code_for_failures<'a>(errors: impl IntoIterator<Item = &'a CoverageError>) -> i32 {
    errors
        .into_iter()
        .map(exit_code_for_error)
        .max()
        .unwrap_or(codes::SUCCESS)
}
