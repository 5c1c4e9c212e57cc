/*!
 * Pipeline orchestrator for a single transcript job.
 *
 * A run moves strictly forward through its phases:
 * 1. Received: length check and format resolution
 * 2. Extracted: important-part filtering, only for oversized input
 * 3. Segmented: boundary segmentation into chunks
 * 4. Processing: per-chunk transformation with retry
 * 5. Aggregated: merge of chunk results
 * 6. Condensed: one re-summarization, only for an oversized summary
 * 7. Done
 *
 * Every path ends in a `JobResult`; no error escapes `run`.
 */

use std::sync::Arc;
use std::time::Instant;

use log::{debug, info, warn};

use super::aggregator::merge;
use super::cancellation::CancellationFlag;
use super::condenser::{CondenseOutcome, condense};
use super::extractor::{RandomSampler, extract};
use super::model::{CondenseStatus, Document, JobResult, JobStatus};
use super::processor::{ChunkProcessor, ProgressCallback};
use super::segmenter::BoundarySegmenter;
use crate::app_config::ProcessingConfig;
use crate::errors::PipelineError;
use crate::formats::FormatRegistry;
use crate::transform::{TransformContext, Transformer};

/// Phases of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PipelinePhase {
    Received,
    Extracted,
    Segmented,
    Processing,
    Aggregated,
    Condensed,
    Done,
}

/// Called on every phase transition
pub type PhaseObserver = Arc<dyn Fn(PipelinePhase) + Send + Sync>;

/// The transcript pipeline: extract, segment, process, merge, condense
pub struct TranscriptPipeline {
    config: ProcessingConfig,
    model: String,
    segmenter: BoundarySegmenter,
    processor: ChunkProcessor,
    recondenser: Arc<dyn Transformer>,
    phase_observer: Option<PhaseObserver>,
}

impl TranscriptPipeline {
    /// Create a pipeline
    ///
    /// # Arguments
    /// * `config` - Limits, retry and pacing settings
    /// * `model` - Model identifier passed to every transform call
    /// * `chunk_transformer` - Strategy applied to each chunk
    /// * `recondenser` - Strategy used once on an oversized merged summary
    pub fn new(
        config: ProcessingConfig,
        model: impl Into<String>,
        chunk_transformer: Arc<dyn Transformer>,
        recondenser: Arc<dyn Transformer>,
    ) -> Self {
        Self {
            segmenter: BoundarySegmenter::new(config.max_chunk_chars),
            processor: ChunkProcessor::from_config(chunk_transformer, &config),
            model: model.into(),
            recondenser,
            phase_observer: None,
            config,
        }
    }

    /// Report chunk progress as (completed, total)
    pub fn with_progress(mut self, progress: ProgressCallback) -> Self {
        self.processor = self.processor.with_progress(progress);
        self
    }

    /// Observe phase transitions
    pub fn with_phase_observer(mut self, observer: PhaseObserver) -> Self {
        self.phase_observer = Some(observer);
        self
    }

    pub fn config(&self) -> &ProcessingConfig {
        &self.config
    }

    fn enter(&self, phase: PipelinePhase) {
        debug!("Pipeline phase: {:?}", phase);
        if let Some(observer) = &self.phase_observer {
            observer(phase);
        }
    }

    /// Process a document to completion
    pub async fn run(&self, document: &Document, cancel: &CancellationFlag) -> JobResult {
        let started = Instant::now();
        self.enter(PipelinePhase::Received);

        let format = FormatRegistry::resolve(&document.format);
        let length = document.char_len();
        if length < self.config.min_input_chars {
            let error = PipelineError::InputTooShort {
                length,
                minimum: self.config.min_input_chars,
            };
            warn!("{}", error);
            return JobResult::from_error(&error, format.key);
        }
        if cancel.is_cancelled() {
            return JobResult::from_error(&PipelineError::Cancelled, format.key);
        }

        let extracted = length > self.config.max_input_chars;
        let text = if extracted {
            self.enter(PipelinePhase::Extracted);
            let mut sampler = RandomSampler::from_seed_option(self.config.sample_seed);
            let reduced = extract(&document.text, self.config.max_input_chars, &mut sampler);
            info!(
                "Input of {} chars exceeds {}, extracted {} chars of important content",
                length,
                self.config.max_input_chars,
                reduced.chars().count()
            );
            reduced
        } else {
            document.text.clone()
        };

        let chunks = self.segmenter.segment(&text);
        self.enter(PipelinePhase::Segmented);
        info!(
            "Split {} chars into {} chunks (max {} chars each)",
            text.chars().count(),
            chunks.len(),
            self.segmenter.max_chunk_chars()
        );

        let context = TransformContext::new(document.language.clone(), format, self.model.clone());

        self.enter(PipelinePhase::Processing);
        let results = match self.processor.process(&chunks, &context, cancel).await {
            Ok(results) => results,
            Err(error) => {
                warn!("{}", error);
                return JobResult::from_error(&error, format.key).with_counts(chunks.len(), 0, extracted);
            }
        };

        let merged = merge(&results);
        self.enter(PipelinePhase::Aggregated);
        if !merged.ok {
            let error = PipelineError::AllChunksFailed {
                chunk_count: chunks.len(),
            };
            warn!("{}", error);
            return JobResult::from_error(&error, format.key).with_counts(chunks.len(), merged.failed, extracted);
        }

        let summary_len = merged.summary.chars().count();
        if summary_len > self.config.max_chunk_chars && cancel.is_cancelled() {
            return JobResult::from_error(&PipelineError::Cancelled, format.key).with_counts(
                chunks.len(),
                merged.failed,
                extracted,
            );
        }

        let outcome = condense(
            merged.summary,
            self.config.max_chunk_chars,
            self.recondenser.as_ref(),
            &context,
            self.config.call_timeout(),
        )
        .await;
        if !matches!(outcome, CondenseOutcome::Unchanged(_)) {
            self.enter(PipelinePhase::Condensed);
        }
        let condense_status: CondenseStatus = outcome.status();
        let summary = outcome.into_text();

        self.enter(PipelinePhase::Done);
        info!(
            "Job finished in {:.2}s: {}/{} chunks succeeded, summary {:?}",
            started.elapsed().as_secs_f32(),
            merged.succeeded,
            chunks.len(),
            condense_status
        );

        JobResult {
            ok: true,
            status: JobStatus::Completed,
            corrected_text: Some(merged.corrected_text).filter(|t| !t.is_empty()),
            summary: Some(summary).filter(|s| !s.is_empty()),
            error: None,
            chunk_count: chunks.len(),
            failed_chunks: merged.failed,
            extracted,
            format: format.key.to_string(),
            condense: condense_status,
        }
    }
}
