/*!
 * Chunked transcript processing pipeline.
 *
 * This module provides:
 * - Boundary segmentation of long text into bounded chunks
 * - Importance extraction for input over the length budget
 * - Per-chunk transformation with retry, pacing and cancellation
 * - Merging of chunk results and a final condense step
 */

pub mod aggregator;
pub mod cancellation;
pub mod condenser;
pub mod extractor;
pub mod model;
pub mod orchestrator;
pub mod processor;
pub mod segmenter;

// Re-export main types
pub use aggregator::merge;
pub use cancellation::CancellationFlag;
pub use condenser::{CondenseOutcome, TRUNCATION_NOTICE, condense, truncate_with_notice};
pub use extractor::{ParagraphSampler, RandomSampler, SequentialSampler, extract};
pub use model::{Chunk, ChunkResult, CondenseStatus, Document, JobResult, JobStatus, MergedResult};
pub use orchestrator::{PipelinePhase, TranscriptPipeline};
pub use processor::{ChunkProcessor, ProgressCallback};
pub use segmenter::{BoundarySegmenter, reconstruct, segment};
