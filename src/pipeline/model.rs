/*!
 * Data model shared by the pipeline stages.
 */

use serde::Serialize;

use crate::errors::PipelineError;

/// A transcript submitted for processing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Raw transcript text
    pub text: String,
    /// Language code of the transcript
    pub language: String,
    /// Requested summary format key
    pub format: String,
}

impl Document {
    pub fn new(text: impl Into<String>, language: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language: language.into(),
            format: format.into(),
        }
    }

    /// Length in characters
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// A bounded slice of the segmented input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Zero-based position in the segmentation
    pub index: usize,
    /// Chunk content, sent to the provider as is
    pub text: String,
    /// Original text between this chunk and the next one
    pub separator: String,
}

impl Chunk {
    /// Length in characters, separator excluded
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// The first `limit` characters followed by an ellipsis, for diagnostics
    pub fn preview(&self, limit: usize) -> String {
        let mut preview: String = self.text.chars().take(limit).collect();
        preview.push_str("...");
        preview
    }
}

/// Outcome of transforming one chunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkResult {
    Success {
        corrected_text: Option<String>,
        summary: Option<String>,
        /// Attempts used, 1 when the first call succeeded
        attempts: u32,
    },
    Failure {
        /// Last error seen for the chunk
        message: String,
        /// Attempts made before giving up
        attempts: u32,
        /// Start of the chunk text
        preview: String,
    },
}

impl ChunkResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn attempts(&self) -> u32 {
        match self {
            Self::Success { attempts, .. } | Self::Failure { attempts, .. } => *attempts,
        }
    }
}

/// All chunk results folded into two text streams
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedResult {
    pub ok: bool,
    pub corrected_text: String,
    pub summary: String,
    pub error: Option<String>,
    /// Chunks that produced output
    pub succeeded: usize,
    /// Chunks that exhausted their retries
    pub failed: usize,
}

/// Final state of a job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// At least one chunk succeeded
    Completed,
    /// Input refused before chunking
    Rejected,
    /// No chunk succeeded
    Failed,
    /// Stopped by the caller
    Cancelled,
}

/// What happened to the merged summary at the end of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CondenseStatus {
    /// No summary step was reached
    #[default]
    Skipped,
    /// Small enough already
    Unchanged,
    /// Re-summarized by the provider
    Condensed,
    /// Re-summarizing failed, cut to size with a notice
    Truncated,
}

/// Structured result handed back to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobResult {
    pub ok: bool,
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corrected_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Number of chunks the input was split into
    pub chunk_count: usize,
    /// Chunks that failed after all retries
    pub failed_chunks: usize,
    /// Whether the input was pre-filtered for length
    pub extracted: bool,
    /// Format key actually used
    pub format: String,
    pub condense: CondenseStatus,
}

impl JobResult {
    /// A job that ended without output because of `error`
    pub fn from_error(error: &PipelineError, format: &str) -> Self {
        let status = match error {
            PipelineError::InputTooShort { .. } => JobStatus::Rejected,
            PipelineError::AllChunksFailed { .. } => JobStatus::Failed,
            PipelineError::Cancelled => JobStatus::Cancelled,
        };
        Self {
            ok: false,
            status,
            corrected_text: None,
            summary: None,
            error: Some(error.to_string()),
            chunk_count: 0,
            failed_chunks: 0,
            extracted: false,
            format: format.to_string(),
            condense: CondenseStatus::Skipped,
        }
    }

    /// Attach chunk statistics to an error result
    pub fn with_counts(mut self, chunk_count: usize, failed_chunks: usize, extracted: bool) -> Self {
        self.chunk_count = chunk_count;
        self.failed_chunks = failed_chunks;
        self.extracted = extracted;
        self
    }
}
