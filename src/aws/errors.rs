//! Mapping of AWS SDK failures onto `CoverageError`
//!
//! The three SDK crates share one `SdkError` type, so a single generic
//! conversion covers every describe call.

use aws_sdk_ec2::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};

use crate::error::CoverageError;
use crate::service::ServiceKind;

const AUTH_CODES: &[&str] = &[
    "AuthFailure",
    "UnauthorizedOperation",
    "InvalidClientTokenId",
    "InvalidAccessKeyId",
    "SignatureDoesNotMatch",
    "ExpiredToken",
    "ExpiredTokenException",
    "UnrecognizedClientException",
    "AccessDenied",
    "AccessDeniedException",
    "OptInRequired",
];

const THROTTLING_CODES: &[&str] = &[
    "Throttling",
    "ThrottlingException",
    "ThrottledException",
    "RequestLimitExceeded",
    "RequestThrottled",
    "RequestThrottledException",
    "TooManyRequestsException",
    "SlowDown",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    Auth,
    Throttling,
    Other,
}

/// Classify by AWS error code, falling back to the credential chain's message
/// when the request never reached the service.
pub fn classify(code: Option<&str>, message: &str) -> ProviderErrorKind {
    match code {
        Some(code) if AUTH_CODES.contains(&code) => ProviderErrorKind::Auth,
        Some(code) if THROTTLING_CODES.contains(&code) => ProviderErrorKind::Throttling,
        Some(_) => ProviderErrorKind::Other,
        None => {
            let lower = message.to_ascii_lowercase();
            if lower.contains("loading credentials") || lower.contains("provided credentials") {
                ProviderErrorKind::Auth
            } else {
                ProviderErrorKind::Other
            }
        }
    }
}

pub fn provider_error(
    kind: ProviderErrorKind,
    service: ServiceKind,
    region: &str,
    message: String,
) -> CoverageError {
    let region = region.to_string();
    match kind {
        ProviderErrorKind::Auth => CoverageError::ProviderAuth {
            service,
            region,
            message,
        },
        ProviderErrorKind::Throttling => CoverageError::ProviderThrottling {
            service,
            region,
            message,
        },
        ProviderErrorKind::Other => CoverageError::Provider {
            service,
            region,
            message,
        },
    }
}

/// Convert a failed SDK call into the matching provider error
pub fn from_sdk_error<E>(
    service: ServiceKind,
    region: &str,
    operation: &str,
    err: SdkError<E>,
) -> CoverageError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    let code = err.as_service_error().and_then(|e| e.code()).map(str::to_string);
    let message = format!("{} failed: {}", operation, DisplayErrorContext(&err));
    provider_error(classify(code.as_deref(), &message), service, region, message)
}
