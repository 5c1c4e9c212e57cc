/*!
 * # transcript-digest
 *
 * A Rust library that turns long speech-recognition transcripts into a
 * corrected transcript and a bounded-length summary using an LLM provider.
 *
 * ## Features
 *
 * - Boundary-aware chunking (paragraph, sentence, word) with lossless reconstruction
 * - Importance pre-filtering of oversized inputs with a seedable sampler
 * - Per-chunk retries with linear backoff, timeouts and optional bounded concurrency
 * - Order-preserving merge of chunk results
 * - Single-pass summary re-condensing with truncation fallback
 * - Summary formats (standard, bullet points, Q&A, ...) in English and Japanese
 * - Providers:
 *   - Google Gemini API
 *   - Ollama (local LLM)
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `pipeline`: The processing pipeline:
 *   - `pipeline::segmenter`: Splitting text into bounded chunks
 *   - `pipeline::extractor`: Pre-filtering oversized inputs
 *   - `pipeline::processor`: Per-chunk transform with retries
 *   - `pipeline::aggregator`: Merging chunk results
 *   - `pipeline::condenser`: Bringing the merged summary within bounds
 *   - `pipeline::orchestrator`: Running one job end to end
 * - `transform`: Prompt building, provider calls and reply parsing
 * - `formats`: Summary format registry
 * - `providers`: Client implementations for LLM providers:
 *   - `providers::gemini`: Gemini API client
 *   - `providers::ollama`: Ollama API client
 *   - `providers::mock`: Scripted provider for tests
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod formats;
pub mod language_utils;
pub mod pipeline;
pub mod providers;
pub mod transform;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use errors::{AppError, PipelineError, ProviderError, TransformError};
pub use formats::{FormatRegistry, FormatSpec};
pub use pipeline::{CancellationFlag, Document, JobResult, JobStatus, TranscriptPipeline};
pub use transform::{TransformContext, TransformOutput, Transformer};
