/*!
 * Provider implementations for text generation services.
 *
 * This module contains client implementations for the supported LLM providers:
 * - Gemini: Google Generative Language API
 * - Ollama: Local LLM server
 * - Mock: Scripted in-process provider for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::app_config::GenerationConfig;
use crate::errors::ProviderError;

/// A single prompt completion request, independent of the backend
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Model identifier understood by the provider
    pub model: String,
    /// Full prompt text
    pub prompt: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Top-k sampling
    pub top_k: u32,
    /// Nucleus sampling probability mass
    pub top_p: f32,
    /// Maximum number of tokens to generate
    pub max_output_tokens: u32,
}

impl CompletionRequest {
    /// Create a request with the default generation settings
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self::with_generation(model, prompt, &GenerationConfig::default())
    }

    /// Create a request using the given generation settings
    pub fn with_generation(model: impl Into<String>, prompt: impl Into<String>, generation: &GenerationConfig) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            temperature: generation.temperature,
            top_k: generation.top_k,
            top_p: generation.top_p,
            max_output_tokens: generation.max_output_tokens,
        }
    }

    /// Set the maximum number of generated tokens
    pub fn max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }
}

/// Text produced by a provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionResponse {
    /// The generated text
    pub text: String,
    /// Prompt tokens, when the provider reports them
    pub prompt_tokens: Option<u64>,
    /// Completion tokens, when the provider reports them
    pub completion_tokens: Option<u64>,
}

impl CompletionResponse {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            prompt_tokens: None,
            completion_tokens: None,
        }
    }
}

/// Common trait for all LLM providers
///
/// This trait defines the interface that all provider implementations must follow,
/// allowing them to be shared as `Arc<dyn Provider>` by the transform strategies.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Complete a request using this provider
    ///
    /// # Arguments
    /// * `request` - The request to complete
    ///
    /// # Returns
    /// * `Result<CompletionResponse, ProviderError>` - The response from the provider or an error
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, ProviderError>;

    /// Test the connection to the provider
    ///
    /// # Returns
    /// * `Result<(), ProviderError>` - Ok if the connection is successful, or an error
    async fn test_connection(&self) -> Result<(), ProviderError>;

    /// Short provider name for logs
    fn name(&self) -> &'static str;
}

/// Map a reqwest failure to the matching provider error
///
/// The request URL is dropped from the message.
pub(crate) fn request_error(provider: &str, error: reqwest::Error) -> ProviderError {
    let error = error.without_url();
    if error.is_connect() || error.is_timeout() {
        ProviderError::ConnectionError(format!("{}: {}", provider, error))
    } else {
        ProviderError::RequestFailed(format!("{}: {}", provider, error))
    }
}

pub mod gemini;
pub mod mock;
pub mod ollama;
