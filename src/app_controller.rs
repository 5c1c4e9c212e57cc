use anyhow::{Result, Context};
use log::{info, warn};
use std::path::Path;
use std::sync::Arc;
use indicatif::{ProgressBar, ProgressStyle};

use crate::app_config::{Config, ProviderKind};
use crate::pipeline::{CancellationFlag, Document, JobResult, ProgressCallback, TranscriptPipeline};
use crate::providers::Provider;
use crate::providers::gemini::Gemini;
use crate::providers::ollama::Ollama;
use crate::transform::{Recondense, chunk_transformer_for_mode};

// @module: Application controller for transcript processing

/// Main application controller: file in, job result out
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Build the client for the active provider
    pub fn build_provider(&self) -> Arc<dyn Provider> {
        let settings = &self.config.provider;
        match settings.active {
            ProviderKind::Gemini => Arc::new(Gemini::new(
                settings.get_api_key(),
                settings.get_endpoint(),
                settings.get_model(),
            )),
            ProviderKind::Ollama => Arc::new(Ollama::from_url(settings.get_endpoint())),
        }
    }

    /// Build a pipeline on top of `provider` using the configured mode and limits
    pub fn build_pipeline(&self, provider: Arc<dyn Provider>) -> TranscriptPipeline {
        let generation = self.config.generation.clone();
        let chunk_transformer = chunk_transformer_for_mode(self.config.mode, provider.clone(), generation.clone());
        let recondenser = Arc::new(Recondense::new(provider, generation));
        TranscriptPipeline::new(
            self.config.processing.clone(),
            self.config.provider.get_model(),
            chunk_transformer,
            recondenser,
        )
    }

    /// Process transcript text with the configured language and format
    pub async fn process_text(
        &self,
        text: String,
        provider: Arc<dyn Provider>,
        cancel: &CancellationFlag,
        progress: Option<ProgressCallback>,
    ) -> JobResult {
        let mut pipeline = self.build_pipeline(provider);
        if let Some(progress) = progress {
            pipeline = pipeline.with_progress(progress);
        }
        let document = Document::new(text, self.config.language.clone(), self.config.format.clone());
        pipeline.run(&document, cancel).await
    }

    /// Run the main workflow with the active provider
    pub async fn run(&self, input_file: &Path, output_file: Option<&Path>, cancel: &CancellationFlag) -> Result<JobResult> {
        let provider = self.build_provider();
        info!(
            "Using {} with model {}",
            self.config.provider.active.display_name(),
            self.config.provider.get_model()
        );
        self.run_with_provider(input_file, output_file, provider, cancel).await
    }

    /// Read `input_file`, process it with `provider` and write the JSON result
    ///
    /// The result goes to `output_file`, or to stdout when no path is given.
    pub async fn run_with_provider(
        &self,
        input_file: &Path,
        output_file: Option<&Path>,
        provider: Arc<dyn Provider>,
        cancel: &CancellationFlag,
    ) -> Result<JobResult> {
        let start_time = std::time::Instant::now();

        if !input_file.exists() {
            return Err(anyhow::anyhow!("Input file does not exist: {:?}", input_file));
        }
        let text = tokio::fs::read_to_string(input_file)
            .await
            .with_context(|| format!("Failed to read transcript: {}", input_file.display()))?;
        info!("Processing {:?} ({} chars)", input_file, text.chars().count());

        let progress_bar = ProgressBar::new(0);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));

        let bar = progress_bar.clone();
        let progress: ProgressCallback = Arc::new(move |done: usize, total: usize| {
            bar.set_length(total as u64);
            bar.set_position(done as u64);
        });

        let result = self.process_text(text, provider, cancel, Some(progress)).await;
        progress_bar.finish_and_clear();

        self.write_result(&result, output_file)?;

        if result.ok {
            info!(
                "Completed in {}: {} chunks, {} failed",
                Self::format_duration(start_time.elapsed()),
                result.chunk_count,
                result.failed_chunks
            );
        } else {
            warn!("Job {:?}: {}", result.status, result.error.as_deref().unwrap_or("unknown error"));
        }

        Ok(result)
    }

    fn write_result(&self, result: &JobResult, output_file: Option<&Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(result).context("Failed to serialize job result")?;
        match output_file {
            Some(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)
                        .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
                }
                std::fs::write(path, json)
                    .with_context(|| format!("Failed to write job result: {}", path.display()))?;
                info!("Result written to {:?}", path);
            }
            None => println!("{}", json),
        }
        Ok(())
    }

    /// Format a duration as "1h 2m 3s", "2m 3s" or "3.4s"
    pub fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{:.1}s", duration.as_secs_f32())
        }
    }
}
