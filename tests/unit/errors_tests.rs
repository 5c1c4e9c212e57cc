/*!
 * Tests for error types and conversions
 */

use std::time::Duration;
use transcript_digest::errors::{AppError, PipelineError, ProviderError, TransformError};

#[test]
fn test_providerError_requestFailed_shouldDisplayCorrectly() {
    let error = ProviderError::RequestFailed("Connection timeout".to_string());
    let display = format!("{}", error);
    assert!(display.contains("API request failed"));
    assert!(display.contains("Connection timeout"));
}

#[test]
fn test_providerError_apiError_shouldDisplayStatusAndMessage() {
    let error = ProviderError::ApiError {
        status_code: 500,
        message: "Internal error".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("500"));
    assert!(display.contains("Internal error"));
}

#[test]
fn test_providerError_fromStatus_shouldMapKnownCodes() {
    assert!(matches!(ProviderError::from_status(401, "bad key"), ProviderError::AuthenticationError(_)));
    assert!(matches!(ProviderError::from_status(403, "forbidden"), ProviderError::AuthenticationError(_)));
    assert!(matches!(ProviderError::from_status(429, "slow down"), ProviderError::RateLimitExceeded(_)));
    assert!(matches!(
        ProviderError::from_status(503, "unavailable"),
        ProviderError::ApiError { status_code: 503, .. }
    ));
}

#[test]
fn test_transformError_fromProviderError_shouldWrap() {
    let error: TransformError = ProviderError::ConnectionError("refused".to_string()).into();
    assert!(matches!(error, TransformError::Provider(ProviderError::ConnectionError(_))));
    assert!(error.to_string().contains("refused"));
}

#[test]
fn test_transformError_timeout_shouldShowDuration() {
    let error = TransformError::Timeout(Duration::from_secs(30));
    assert_eq!(error.to_string(), "Transform call timed out after 30s");
}

#[test]
fn test_pipelineError_messages_shouldDistinguishRejectionFromFailure() {
    let rejected = PipelineError::InputTooShort { length: 10, minimum: 50 }.to_string();
    let failed = PipelineError::AllChunksFailed { chunk_count: 3 }.to_string();

    assert!(rejected.starts_with("Input rejected"));
    assert!(rejected.contains("10"));
    assert!(rejected.contains("50"));
    assert!(failed.starts_with("All chunk transformations failed"));
    assert!(failed.contains('3'));
    assert_ne!(rejected, failed);
}

#[test]
fn test_appError_fromIoError_shouldBeFileError() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.txt");
    let error: AppError = io_error.into();
    assert!(matches!(error, AppError::File(_)));
    assert!(error.to_string().contains("missing.txt"));
}

#[test]
fn test_appError_fromPipelineError_shouldWrap() {
    let error: AppError = PipelineError::Cancelled.into();
    assert!(matches!(error, AppError::Pipeline(PipelineError::Cancelled)));
}

#[test]
fn test_appError_fromAnyhow_shouldKeepMessage() {
    let error: AppError = anyhow::anyhow!("something odd").into();
    assert_eq!(error.to_string(), "Unknown error: something odd");
}
