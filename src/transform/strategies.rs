use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, trace};

use super::prompts::{PromptKind, build_prompt};
use super::response::{parse_sectioned, parse_summary};
use super::{TransformContext, TransformOutput, Transformer};
use crate::app_config::{GenerationConfig, ProcessingMode};
use crate::errors::TransformError;
use crate::providers::{CompletionRequest, Provider};

/// Prompt building and provider call shared by the strategies
#[derive(Debug, Clone)]
struct ProviderCall {
    provider: Arc<dyn Provider>,
    generation: GenerationConfig,
}

impl ProviderCall {
    async fn reply(&self, kind: PromptKind, text: &str, context: &TransformContext) -> Result<String, TransformError> {
        let prompt = build_prompt(kind, &context.language, context.format, text);
        let request = CompletionRequest::with_generation(context.model.clone(), prompt, &self.generation);

        let response = self.provider.complete(request).await?;
        debug!(
            "{} replied with {} chars (prompt tokens: {:?}, completion tokens: {:?})",
            self.provider.name(),
            response.text.chars().count(),
            response.prompt_tokens,
            response.completion_tokens
        );
        trace!("Raw reply: {}", response.text);
        Ok(response.text)
    }
}

/// Corrects recognition errors and summarizes the corrected text
#[derive(Debug, Clone)]
pub struct CorrectAndSummarize {
    call: ProviderCall,
}

impl CorrectAndSummarize {
    pub fn new(provider: Arc<dyn Provider>, generation: GenerationConfig) -> Self {
        Self {
            call: ProviderCall { provider, generation },
        }
    }
}

#[async_trait]
impl Transformer for CorrectAndSummarize {
    async fn transform(&self, text: &str, context: &TransformContext) -> Result<TransformOutput, TransformError> {
        let reply = self.call.reply(PromptKind::CorrectAndSummarize, text, context).await?;
        parse_sectioned(&reply)
    }

    fn name(&self) -> &'static str {
        "correct_and_summarize"
    }
}

/// Summarizes text without correcting it
#[derive(Debug, Clone)]
pub struct SummarizeOnly {
    call: ProviderCall,
}

impl SummarizeOnly {
    pub fn new(provider: Arc<dyn Provider>, generation: GenerationConfig) -> Self {
        Self {
            call: ProviderCall { provider, generation },
        }
    }
}

#[async_trait]
impl Transformer for SummarizeOnly {
    async fn transform(&self, text: &str, context: &TransformContext) -> Result<TransformOutput, TransformError> {
        let reply = self.call.reply(PromptKind::SummarizeOnly, text, context).await?;
        parse_summary(&reply)
    }

    fn name(&self) -> &'static str {
        "summarize_only"
    }
}

/// Merges the joined summaries of consecutive chunks into one summary
#[derive(Debug, Clone)]
pub struct Recondense {
    call: ProviderCall,
}

impl Recondense {
    pub fn new(provider: Arc<dyn Provider>, generation: GenerationConfig) -> Self {
        Self {
            call: ProviderCall { provider, generation },
        }
    }
}

#[async_trait]
impl Transformer for Recondense {
    async fn transform(&self, text: &str, context: &TransformContext) -> Result<TransformOutput, TransformError> {
        let reply = self.call.reply(PromptKind::Recondense, text, context).await?;
        parse_summary(&reply)
    }

    fn name(&self) -> &'static str {
        "recondense"
    }
}

/// The per-chunk strategy for a processing mode
pub fn chunk_transformer_for_mode(
    mode: ProcessingMode,
    provider: Arc<dyn Provider>,
    generation: GenerationConfig,
) -> Arc<dyn Transformer> {
    match mode {
        ProcessingMode::Correct => Arc::new(CorrectAndSummarize::new(provider, generation)),
        ProcessingMode::Summarize => Arc::new(SummarizeOnly::new(provider, generation)),
    }
}
