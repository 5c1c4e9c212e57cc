/*!
 * Per-chunk transformation with retry.
 *
 * Every chunk gets up to `retry_count + 1` attempts with a linear backoff
 * between them. A chunk that runs out of attempts becomes a
 * `ChunkResult::Failure` and processing moves on; only cancellation stops
 * the loop early. Chunks run one after another by default, spaced by the
 * inter-chunk delay. With `max_concurrent > 1` a bounded number run at once
 * while their starts stay spaced by the same delay.
 */

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use futures::stream::{self, StreamExt};
use log::{debug, error, info, warn};
use parking_lot::Mutex;
use tokio::time::Instant;

use super::cancellation::CancellationFlag;
use super::model::{Chunk, ChunkResult};
use crate::app_config::ProcessingConfig;
use crate::errors::PipelineError;
use crate::transform::{TransformContext, Transformer, invoke_with_timeout};

/// Characters of chunk text kept in a failure record
pub const FAILURE_PREVIEW_CHARS: usize = 100;

/// Called with (completed, total) after each chunk
pub type ProgressCallback = Arc<dyn Fn(usize, usize) + Send + Sync>;

/// Spaces out chunk starts by a fixed delay
struct Pacer {
    delay: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl Pacer {
    fn new(delay: Duration) -> Self {
        Self {
            delay,
            next_slot: Mutex::new(None),
        }
    }

    /// Wait until this caller's start slot
    async fn wait_turn(&self) {
        if self.delay.is_zero() {
            return;
        }
        let slot = {
            let mut next = self.next_slot.lock();
            let now = Instant::now();
            let slot = next.map_or(now, |n| n.max(now));
            *next = Some(slot + self.delay);
            slot
        };
        tokio::time::sleep_until(slot).await;
    }
}

/// Runs the transformer over a list of chunks
pub struct ChunkProcessor {
    transformer: Arc<dyn Transformer>,
    retry_count: u32,
    retry_backoff: Duration,
    inter_chunk_delay: Duration,
    call_timeout: Duration,
    max_concurrent: usize,
    progress: Option<ProgressCallback>,
}

impl ChunkProcessor {
    /// Processor with the default limits
    pub fn new(transformer: Arc<dyn Transformer>) -> Self {
        Self::from_config(transformer, &ProcessingConfig::default())
    }

    /// Processor using the retry, pacing and timeout settings of `config`
    pub fn from_config(transformer: Arc<dyn Transformer>, config: &ProcessingConfig) -> Self {
        Self {
            transformer,
            retry_count: config.retry_count,
            retry_backoff: config.retry_backoff(),
            inter_chunk_delay: config.inter_chunk_delay(),
            call_timeout: config.call_timeout(),
            max_concurrent: config.max_concurrent_chunks.max(1),
            progress: None,
        }
    }

    pub fn retry_count(mut self, retry_count: u32) -> Self {
        self.retry_count = retry_count;
        self
    }

    pub fn retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    pub fn inter_chunk_delay(mut self, delay: Duration) -> Self {
        self.inter_chunk_delay = delay;
        self
    }

    pub fn call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    pub fn with_progress(mut self, progress: ProgressCallback) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Transform every chunk, returning one result per chunk in chunk order
    ///
    /// # Returns
    /// * `Err(PipelineError::Cancelled)` - if the flag was raised before all chunks started
    pub async fn process(
        &self,
        chunks: &[Chunk],
        context: &TransformContext,
        cancel: &CancellationFlag,
    ) -> Result<Vec<ChunkResult>, PipelineError> {
        let results = if self.max_concurrent > 1 && chunks.len() > 1 {
            self.process_concurrent(chunks, context, cancel).await?
        } else {
            self.process_sequential(chunks, context, cancel).await?
        };

        let failed = results.iter().filter(|r| !r.is_success()).count();
        info!(
            "Processed {} chunks with {}: {} succeeded, {} failed",
            results.len(),
            self.transformer.name(),
            results.len() - failed,
            failed
        );
        Ok(results)
    }

    async fn process_sequential(
        &self,
        chunks: &[Chunk],
        context: &TransformContext,
        cancel: &CancellationFlag,
    ) -> Result<Vec<ChunkResult>, PipelineError> {
        let total = chunks.len();
        let mut results = Vec::with_capacity(total);

        for (position, chunk) in chunks.iter().enumerate() {
            if cancel.is_cancelled() {
                return Err(PipelineError::Cancelled);
            }
            if position > 0 && !self.inter_chunk_delay.is_zero() {
                tokio::time::sleep(self.inter_chunk_delay).await;
                if cancel.is_cancelled() {
                    return Err(PipelineError::Cancelled);
                }
            }

            results.push(self.process_chunk(chunk, context, total).await);
            self.report(position + 1, total);
        }

        Ok(results)
    }

    async fn process_concurrent(
        &self,
        chunks: &[Chunk],
        context: &TransformContext,
        cancel: &CancellationFlag,
    ) -> Result<Vec<ChunkResult>, PipelineError> {
        let total = chunks.len();
        let pacer = Pacer::new(self.inter_chunk_delay);
        let completed = AtomicUsize::new(0);
        debug!("Processing {} chunks with up to {} in flight", total, self.max_concurrent);

        // buffer_unordered bounds the number of chunks in flight
        let mut outcomes = stream::iter(chunks.iter().enumerate())
            .map(|(position, chunk)| {
                let pacer = &pacer;
                let completed = &completed;
                async move {
                    pacer.wait_turn().await;
                    if cancel.is_cancelled() {
                        return (position, None);
                    }

                    let result = self.process_chunk(chunk, context, total).await;
                    let current = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    self.report(current, total);
                    (position, Some(result))
                }
            })
            .buffer_unordered(self.max_concurrent)
            .collect::<Vec<_>>()
            .await;

        // Sort results by chunk position to restore the original order
        outcomes.sort_by_key(|(position, _)| *position);

        outcomes
            .into_iter()
            .map(|(_, result)| result.ok_or(PipelineError::Cancelled))
            .collect()
    }

    /// All attempts for a single chunk
    async fn process_chunk(&self, chunk: &Chunk, context: &TransformContext, total: usize) -> ChunkResult {
        let max_attempts = self.retry_count + 1;
        let mut last_error = String::new();

        for attempt in 1..=max_attempts {
            if attempt > 1 {
                let backoff = self.retry_backoff * (attempt - 1);
                debug!("Chunk {} waiting {:?} before attempt {}", chunk.index + 1, backoff, attempt);
                tokio::time::sleep(backoff).await;
            }

            info!(
                "Processing chunk {}/{} ({} chars), attempt {}/{}",
                chunk.index + 1,
                total,
                chunk.char_len(),
                attempt,
                max_attempts
            );

            match invoke_with_timeout(self.transformer.as_ref(), &chunk.text, context, self.call_timeout).await {
                Ok(output) => {
                    return ChunkResult::Success {
                        corrected_text: output.corrected_text,
                        summary: output.summary,
                        attempts: attempt,
                    };
                }
                Err(e) => {
                    warn!("Chunk {} attempt {}/{} failed: {}", chunk.index + 1, attempt, max_attempts, e);
                    last_error = e.to_string();
                }
            }
        }

        error!("Chunk {} failed after {} attempts: {}", chunk.index + 1, max_attempts, last_error);
        ChunkResult::Failure {
            message: last_error,
            attempts: max_attempts,
            preview: chunk.preview(FAILURE_PREVIEW_CHARS),
        }
    }

    fn report(&self, completed: usize, total: usize) {
        if let Some(progress) = &self.progress {
            progress(completed, total);
        }
    }
}
