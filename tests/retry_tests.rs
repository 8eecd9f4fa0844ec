//! Tests for retry logic
//!
//! Tests verify that throttling is retried with backoff while auth and other
//! provider errors fail on the first attempt.

use ricoverage::error::{CoverageError, IsRetryable};
use ricoverage::exit_codes::{self, codes};
use ricoverage::retry::{ExponentialBackoffPolicy, RetryPolicy};
use ricoverage::ServiceKind;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

fn throttled() -> CoverageError {
    CoverageError::ProviderThrottling {
        service: ServiceKind::Ec2,
        region: "us-east-1".to_string(),
        message: "RequestLimitExceeded".to_string(),
    }
}

fn fast_policy(max_attempts: u32) -> ExponentialBackoffPolicy {
    ExponentialBackoffPolicy::new(max_attempts)
        .with_delays(Duration::from_millis(1), Duration::from_millis(5))
}

#[tokio::test]
async fn test_retry_succeeds_immediately() {
    let policy = fast_policy(3);
    let call_count = AtomicU32::new(0);

    let result = policy
        .execute_with_retry(|| async {
            call_count.fetch_add(1, Ordering::SeqCst);
            Ok::<u32, CoverageError>(7)
        })
        .await;

    assert_eq!(result.unwrap(), 7);
    assert_eq!(call_count.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_throttling_succeeds_after_failures() {
    let policy = fast_policy(3);
    let call_count = AtomicU32::new(0);

    let result = policy
        .execute_with_retry(|| async {
            let count = call_count.fetch_add(1, Ordering::SeqCst);
            if count < 2 {
                Err(throttled())
            } else {
                Ok::<String, CoverageError>("success".to_string())
            }
        })
        .await;

    assert_eq!(result.unwrap(), "success");
    assert_eq!(call_count.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_retry_exhausts_attempts() {
    let policy = fast_policy(3);
    let call_count = AtomicU32::new(0);

    let result = policy
        .execute_with_retry(|| async {
            call_count.fetch_add(1, Ordering::SeqCst);
            Err::<(), CoverageError>(throttled())
        })
        .await;

    let err = result.unwrap_err();
    assert!(matches!(err, CoverageError::Retryable { attempt: 3, max_attempts: 3, .. }));
    assert!(err.to_string().contains("RequestLimitExceeded"));
    assert_eq!(call_count.load(Ordering::SeqCst), 3);
    assert_eq!(exit_codes::exit_code_for_error(&err), codes::SYSTEM_ERROR);
}

#[tokio::test]
async fn test_single_attempt_returns_throttling_error() {
    let policy = fast_policy(1);
    let call_count = AtomicU32::new(0);

    let result = policy
        .execute_with_retry(|| async {
            call_count.fetch_add(1, Ordering::SeqCst);
            Err::<(), CoverageError>(throttled())
        })
        .await;

    assert!(matches!(result, Err(CoverageError::ProviderThrottling { .. })));
    assert_eq!(call_count.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_auth_error_not_retried() {
    let policy = fast_policy(5);
    let call_count = AtomicU32::new(0);

    let result = policy
        .execute_with_retry(|| async {
            call_count.fetch_add(1, Ordering::SeqCst);
            Err::<(), CoverageError>(CoverageError::ProviderAuth {
                service: ServiceKind::Rds,
                region: "eu-west-1".to_string(),
                message: "ExpiredToken".to_string(),
            })
        })
        .await;

    assert!(result.unwrap_err().is_auth());
    assert_eq!(call_count.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_retry_backoff_timing() {
    let policy = ExponentialBackoffPolicy::new(3)
        .with_delays(Duration::from_millis(20), Duration::from_millis(100));
    let call_count = AtomicU32::new(0);
    let start = Instant::now();

    let _result = policy
        .execute_with_retry(|| async {
            let count = call_count.fetch_add(1, Ordering::SeqCst);
            if count < 2 {
                Err(throttled())
            } else {
                Ok::<(), CoverageError>(())
            }
        })
        .await;

    // 20ms then 40ms of backoff before the third call
    assert!(start.elapsed() >= Duration::from_millis(60));
}

#[test]
fn test_is_retryable_trait() {
    assert!(throttled().is_retryable());
    assert!(CoverageError::Io(std::io::Error::other("reset")).is_retryable());

    let provider = CoverageError::Provider {
        service: ServiceKind::ElastiCache,
        region: "us-east-1".to_string(),
        message: "InvalidParameterValue".to_string(),
    };
    assert!(!provider.is_retryable());

    let validation = CoverageError::Validation {
        field: "region".to_string(),
        reason: "empty".to_string(),
    };
    assert!(!validation.is_retryable());
}
