/*!
 * Error types for the transcript-digest application.
 *
 * This module contains custom error types for the different layers of the
 * application, using the thiserror crate for ergonomic error definitions.
 * Only `PipelineError` ever reaches the caller of a pipeline run, and even
 * then it is folded into a structured `JobResult` rather than propagated.
 */

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

impl ProviderError {
    /// Map a non-success HTTP status to the matching variant
    pub fn from_status(status_code: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status_code {
            401 | 403 => Self::AuthenticationError(message),
            429 => Self::RateLimitExceeded(message),
            _ => Self::ApiError { status_code, message },
        }
    }
}

/// Errors raised by a single transform call
///
/// Every variant is transient from the pipeline's point of view: the chunk
/// processor retries on all of them.
#[derive(Error, Debug)]
pub enum TransformError {
    /// The provider call failed (network, status, auth, parse)
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The call did not finish within the per-call timeout
    #[error("Transform call timed out after {0:?}")]
    Timeout(Duration),

    /// The provider answered but the reply could not be interpreted
    #[error("Malformed transform response: {0}")]
    MalformedResponse(String),
}

/// Job-level errors of a pipeline run
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// Input below the minimum length, rejected before chunking
    #[error("Input rejected: text is too short to process ({length} characters, minimum is {minimum})")]
    InputTooShort {
        /// Length of the received text in characters
        length: usize,
        /// Configured minimum length
        minimum: usize,
    },

    /// Every chunk exhausted its retries
    #[error("All chunk transformations failed ({chunk_count} chunks)")]
    AllChunksFailed {
        /// Number of chunks attempted
        chunk_count: usize,
    },

    /// The run was cancelled by the caller
    #[error("Processing was cancelled")]
    Cancelled,
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from the pipeline
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::Config(error.to_string())
    }
}
