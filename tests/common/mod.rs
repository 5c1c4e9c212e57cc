/*!
 * Common test utilities for the transcript-digest test suite
 */

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use async_trait::async_trait;
use parking_lot::Mutex;
use tempfile::TempDir;

use transcript_digest::app_config::{Config, ProcessingConfig, ProviderKind};
use transcript_digest::errors::TransformError;
use transcript_digest::transform::{TransformContext, TransformOutput, Transformer};

/// Enable log output for a test run (`RUST_LOG=debug cargo test`)
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// `count` paragraphs of about `width` characters, each starting with "pN"
pub fn paragraphs(count: usize, width: usize) -> String {
    (0..count)
        .map(|i| {
            let mut paragraph = format!("p{}", i);
            while paragraph.len() + 5 <= width {
                paragraph.push_str(" word");
            }
            paragraph
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Processing limits without any waiting
pub fn fast_processing() -> ProcessingConfig {
    ProcessingConfig {
        retry_backoff_ms: 0,
        inter_chunk_delay_ms: 0,
        call_timeout_secs: 5,
        sample_seed: Some(7),
        ..ProcessingConfig::default()
    }
}

/// A configuration that passes validation and never waits
pub fn test_config() -> Config {
    let mut config = Config {
        processing: fast_processing(),
        ..Config::default()
    };
    config.provider.active = ProviderKind::Gemini;
    config.provider.active_provider_config_mut().api_key = "test-key".to_string();
    config
}

type Script = dyn Fn(usize, &str) -> Result<TransformOutput, TransformError> + Send + Sync;

/// Transformer driven by a closure of (call index, chunk text)
pub struct ScriptedTransformer {
    script: Box<Script>,
    calls: AtomicUsize,
    inputs: Mutex<Vec<String>>,
}

impl ScriptedTransformer {
    pub fn new(script: impl Fn(usize, &str) -> Result<TransformOutput, TransformError> + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self {
            script: Box::new(script),
            calls: AtomicUsize::new(0),
            inputs: Mutex::new(Vec::new()),
        })
    }

    /// Corrected text is the chunk, summary is its first word
    pub fn echo() -> Arc<Self> {
        Self::new(|_, text| Ok(output(text, text.split_whitespace().next().unwrap_or(""))))
    }

    /// Every call fails with a malformed reply
    pub fn failing() -> Arc<Self> {
        Self::new(|_, _| Err(TransformError::MalformedResponse("scripted failure".to_string())))
    }

    /// Every call returns `summary` as the summary
    pub fn summarizing(summary: String) -> Arc<Self> {
        Self::new(move |_, _| Ok(TransformOutput { corrected_text: None, summary: Some(summary.clone()) }))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn inputs(&self) -> Vec<String> {
        self.inputs.lock().clone()
    }
}

#[async_trait]
impl Transformer for ScriptedTransformer {
    async fn transform(&self, text: &str, _context: &TransformContext) -> Result<TransformOutput, TransformError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.inputs.lock().push(text.to_string());
        (self.script)(call, text)
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// Successful output with both fields set
pub fn output(corrected: &str, summary: &str) -> TransformOutput {
    TransformOutput {
        corrected_text: Some(corrected.to_string()),
        summary: Some(summary.to_string()),
    }
}
