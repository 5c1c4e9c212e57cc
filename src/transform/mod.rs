/*!
 * Transform strategies.
 *
 * A transformer turns one piece of text into corrected text and/or a
 * summary. The pipeline only sees the `Transformer` trait; the strategies in
 * this module implement it on top of a `Provider`, differing in prompt and
 * in how the reply is read.
 */

use std::time::Duration;

use async_trait::async_trait;

use crate::errors::TransformError;
use crate::formats::FormatSpec;

pub mod prompts;
pub mod response;
pub mod strategies;

pub use prompts::{PromptKind, PromptTemplate, build_prompt};
pub use strategies::{CorrectAndSummarize, Recondense, SummarizeOnly, chunk_transformer_for_mode};

/// Read-only settings shared by every call of a run
#[derive(Debug, Clone)]
pub struct TransformContext {
    /// Transcript language code, selects the prompt wording
    pub language: String,
    /// Resolved summary format
    pub format: &'static FormatSpec,
    /// Model identifier passed to the provider
    pub model: String,
}

impl TransformContext {
    pub fn new(language: impl Into<String>, format: &'static FormatSpec, model: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            format,
            model: model.into(),
        }
    }
}

/// Output of one transform call; either field may be absent
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformOutput {
    pub corrected_text: Option<String>,
    pub summary: Option<String>,
}

/// A single text-to-text transformation
#[async_trait]
pub trait Transformer: Send + Sync {
    /// Transform `text`
    ///
    /// # Arguments
    /// * `text` - The text to transform
    /// * `context` - Language, format and model for the call
    ///
    /// # Returns
    /// * `Result<TransformOutput, TransformError>` - The parsed output or the reason it failed
    async fn transform(&self, text: &str, context: &TransformContext) -> Result<TransformOutput, TransformError>;

    /// Short strategy name for logs
    fn name(&self) -> &'static str;
}

/// Run one transform call, failing with `TransformError::Timeout` after `limit`
pub async fn invoke_with_timeout(
    transformer: &dyn Transformer,
    text: &str,
    context: &TransformContext,
    limit: Duration,
) -> Result<TransformOutput, TransformError> {
    match tokio::time::timeout(limit, transformer.transform(text, context)).await {
        Ok(result) => result,
        Err(_) => Err(TransformError::Timeout(limit)),
    }
}
